//! Boundary Skeleton: the full construction pipeline
//!
//! point cloud → edges → triangles → ... → D-simplices → global assembly
//!
//! Each phase returns an owned value that the next phase borrows, so a
//! phase starts only after the previous one has fully completed.

use ndarray::{Array1, Array2, ArrayView2, ArrayViewD, Ix2};
use tracing::{debug, info};

use crate::config::SkeletonConfig;
use crate::error::{Result, SkeletonError};

use super::assembler::{assemble, verify_ordering, SENTINEL};
use super::edges::{build_edges, validate_points};
use super::higher::build_higher;
use super::level::SimplexLevel;

/// Filtration-sorted boundary skeleton of a point cloud, ready for
/// boundary matrix reduction
#[derive(Debug, Clone)]
pub struct BoundarySkeleton {
    n_vertices: usize,
    boundary: Array2<i64>,
    filtration: Array1<f64>,
    dimensions: Array1<usize>,
    levels: Vec<SimplexLevel>,
}

impl BoundarySkeleton {
    /// Build the skeleton of `points` (one row per point)
    pub fn from_points(points: &Array2<f64>, config: &SkeletonConfig) -> Result<Self> {
        Self::from_view(points.view(), config)
    }

    /// Build from an array of unknown rank; anything but 2-D is rejected
    pub fn from_dyn(points: ArrayViewD<'_, f64>, config: &SkeletonConfig) -> Result<Self> {
        let ndim = points.ndim();
        let points = points
            .into_dimensionality::<Ix2>()
            .map_err(|_| {
                SkeletonError::dimension_mismatch("2-D point cloud", format!("{}-D array", ndim))
            })?;
        Self::from_view(points, config)
    }

    /// Build the skeleton of a borrowed point cloud
    #[tracing::instrument(
        skip(points, config),
        fields(
            n_points = points.nrows(),
            ambient_dim = points.ncols(),
            max_dimension = config.max_dimension
        )
    )]
    pub fn from_view(points: ArrayView2<'_, f64>, config: &SkeletonConfig) -> Result<Self> {
        config.validate()?;
        validate_points(&points)?;

        let n_vertices = points.nrows();
        let mut levels = Vec::with_capacity(config.max_dimension);
        levels.push(build_edges(
            &points,
            config.max_ball_radius,
            config.workers,
            config.candidate_limit,
        )?);

        for dim in 2..=config.max_dimension {
            let next = build_higher(&levels[dim - 2], n_vertices, config)?;
            debug!(dim, simplices = next.len(), "level ready");
            levels.push(next);
        }

        let complex = assemble(n_vertices, &levels, config.tie_break)?;

        info!(
            vertices = n_vertices,
            simplices = complex.boundary.nrows(),
            max_ball_radius = config.max_ball_radius,
            "boundary skeleton built"
        );

        Ok(Self {
            n_vertices,
            boundary: complex.boundary,
            filtration: complex.filtration,
            dimensions: complex.dimensions,
            levels,
        })
    }

    /// Boundary incidence table: row i is global id `n_vertices() + i`
    pub fn boundary(&self) -> &Array2<i64> {
        &self.boundary
    }

    /// Filtration value of every global id, vertices (0.0) first
    pub fn filtration(&self) -> &Array1<f64> {
        &self.filtration
    }

    /// Dimension of every global id, vertices first
    pub fn dimensions(&self) -> &Array1<usize> {
        &self.dimensions
    }

    /// Per-dimension levels, dimension 1 first
    pub fn levels(&self) -> &[SimplexLevel] {
        &self.levels
    }

    /// Facet table of the top dimension, before global reordering
    pub fn top_facets(&self) -> &Array2<i64> {
        // levels is never empty: max_dimension >= 1 is validated
        self.levels[self.levels.len() - 1].facets()
    }

    pub fn max_dimension(&self) -> usize {
        self.levels.len()
    }

    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    /// Number of simplices of every dimension, vertices included
    pub fn n_simplices(&self) -> usize {
        self.filtration.len()
    }

    /// Number of simplices of dimension `dim`
    pub fn count_in_dimension(&self, dim: usize) -> usize {
        match dim {
            0 => self.n_vertices,
            d if d <= self.levels.len() => self.levels[d - 1].len(),
            _ => 0,
        }
    }

    /// Global ids of the facets of `id`; empty for vertices
    pub fn facets_of(&self, id: usize) -> Option<Vec<usize>> {
        if id < self.n_vertices {
            return Some(Vec::new());
        }
        let row = id - self.n_vertices;
        if row >= self.boundary.nrows() {
            return None;
        }
        Some(
            self.boundary
                .row(row)
                .iter()
                .filter(|&&f| f != SENTINEL)
                .map(|&f| f as usize)
                .collect(),
        )
    }

    /// Re-check that every facet precedes the simplex referencing it
    pub fn verify_ordering(&self) -> Result<()> {
        verify_ordering(self.n_vertices, &self.boundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CandidateSource, TieBreak};
    use ndarray::{array, ArrayD, IxDyn};
    use proptest::prelude::*;

    fn unit_square() -> Array2<f64> {
        array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]
    }

    fn check_monotone(skeleton: &BoundarySkeleton) {
        let f = skeleton.filtration();
        for id in 0..skeleton.n_simplices() {
            for facet in skeleton.facets_of(id).unwrap() {
                assert!(facet < id, "facet {} of {} comes later", facet, id);
                assert!(f[facet] <= f[id]);
                assert_eq!(skeleton.dimensions()[facet] + 1, skeleton.dimensions()[id]);
            }
        }
    }

    #[test]
    fn test_unit_square_scenario() {
        let config = SkeletonConfig::new(2, 2.0);
        let skeleton = BoundarySkeleton::from_points(&unit_square(), &config).unwrap();

        assert_eq!(skeleton.count_in_dimension(0), 4);
        assert_eq!(skeleton.count_in_dimension(1), 6);
        assert_eq!(skeleton.count_in_dimension(2), 4);
        assert_eq!(skeleton.n_simplices(), 14);
        assert_eq!(skeleton.boundary().dim(), (10, 6));

        let mut edge_values = skeleton.levels()[0].filtration().to_vec();
        edge_values.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(edge_values, vec![1.0, 1.0, 1.0, 1.0, 2.0, 2.0]);

        // Each triangle holds exactly one diagonal
        let edges = &skeleton.levels()[0];
        let triangles = &skeleton.levels()[1];
        for (row, &f) in triangles.facets().outer_iter().zip(triangles.filtration().iter()) {
            let max = row
                .iter()
                .map(|&e| edges.filtration()[e as usize])
                .fold(0.0, f64::max);
            assert_eq!(f, max);
            assert_eq!(f, 2.0);
        }

        check_monotone(&skeleton);
        assert!(skeleton.verify_ordering().is_ok());
    }

    #[test]
    fn test_zero_radius_scenario() {
        let config = SkeletonConfig::new(2, 0.0);
        let skeleton = BoundarySkeleton::from_points(&unit_square(), &config).unwrap();

        assert_eq!(skeleton.boundary().nrows(), 0);
        assert_eq!(skeleton.filtration().to_vec(), vec![0.0; 4]);
        assert_eq!(skeleton.dimensions().to_vec(), vec![0; 4]);
        assert_eq!(skeleton.count_in_dimension(1), 0);
        assert_eq!(skeleton.count_in_dimension(2), 0);
        assert_eq!(skeleton.top_facets().dim(), (0, 3));
    }

    #[test]
    fn test_top_facets_are_raw_level() {
        let config = SkeletonConfig::new(1, 2.0);
        let skeleton = BoundarySkeleton::from_points(&unit_square(), &config).unwrap();

        assert_eq!(
            skeleton.top_facets(),
            &array![[1i64, 0], [2, 0], [2, 1], [3, 0], [3, 1], [3, 2]]
        );
        assert_eq!(skeleton.boundary().ncols(), 4);
    }

    #[test]
    fn test_tetrahedron_of_square() {
        let config = SkeletonConfig::builder()
            .max_dimension(3)
            .max_ball_radius(2.0)
            .workers(3)
            .build()
            .unwrap();
        let skeleton = BoundarySkeleton::from_points(&unit_square(), &config).unwrap();

        assert_eq!(skeleton.count_in_dimension(3), 1);
        let last = skeleton.n_simplices() - 1;
        assert_eq!(skeleton.dimensions()[last], 3);
        assert_eq!(skeleton.facets_of(last).unwrap().len(), 4);
        check_monotone(&skeleton);
    }

    #[test]
    fn test_single_point() {
        let points = array![[1.0, 2.0, 3.0]];
        let config = SkeletonConfig::new(3, 1.0);
        let skeleton = BoundarySkeleton::from_points(&points, &config).unwrap();

        assert_eq!(skeleton.n_simplices(), 1);
        assert_eq!(skeleton.boundary().dim(), (0, 8));
        assert_eq!(skeleton.facets_of(0), Some(Vec::new()));
        assert_eq!(skeleton.facets_of(1), None);
    }

    #[test]
    fn test_rejects_wrong_rank() {
        let cube = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2]));
        let err = BoundarySkeleton::from_dyn(cube.view(), &SkeletonConfig::default()).unwrap_err();
        assert!(matches!(err, SkeletonError::DimensionMismatch { .. }));

        let flat = unit_square().into_dyn();
        assert!(BoundarySkeleton::from_dyn(flat.view(), &SkeletonConfig::new(2, 2.0)).is_ok());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SkeletonConfig::new(0, 1.0);
        let err = BoundarySkeleton::from_points(&unit_square(), &config).unwrap_err();
        assert!(matches!(err, SkeletonError::InvalidConfig(_)));
    }

    #[test]
    fn test_candidate_limit_covers_edges() {
        let points = Array2::<f64>::zeros((200, 2));
        let config = SkeletonConfig::builder()
            .max_dimension(1)
            .max_ball_radius(1.0)
            .candidate_limit(100)
            .build()
            .unwrap();
        let err = BoundarySkeleton::from_points(&points, &config).unwrap_err();
        assert!(matches!(
            err,
            SkeletonError::CandidateLimitExceeded { dimension: 1, .. }
        ));
    }

    #[test]
    fn test_near_tie_needs_dimension_key() {
        // Edge lengths 1.0 and 1.0000001 sit closer than the default ladder
        let points = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0000001]];
        let default = SkeletonConfig::new(2, 4.0);
        let err = BoundarySkeleton::from_points(&points, &default).unwrap_err();
        assert!(matches!(err, SkeletonError::OrderingViolation(_)));

        let config = SkeletonConfig::builder()
            .max_dimension(2)
            .max_ball_radius(4.0)
            .tie_break(TieBreak::DimensionKey)
            .build()
            .unwrap();
        let skeleton = BoundarySkeleton::from_points(&points, &config).unwrap();
        assert_eq!(skeleton.n_simplices(), 7);
        check_monotone(&skeleton);

        let fine = SkeletonConfig::builder()
            .max_dimension(2)
            .max_ball_radius(4.0)
            .tie_break(TieBreak::Augmented { epsilon: 1e-9 })
            .build()
            .unwrap();
        let augmented = BoundarySkeleton::from_points(&points, &fine).unwrap();
        assert_eq!(augmented.filtration(), skeleton.filtration());
    }

    fn grid_cloud() -> impl Strategy<Value = Array2<f64>> {
        (2usize..8, 1usize..4).prop_flat_map(|(n, m)| {
            proptest::collection::vec(0i32..5, n * m).prop_map(move |coords| {
                Array2::from_shape_vec((n, m), coords.into_iter().map(f64::from).collect()).unwrap()
            })
        })
    }

    proptest! {
        /// Facets precede cofacets and never have a larger value
        #[test]
        fn prop_global_order_and_monotonicity(
            points in grid_cloud(),
            max_dimension in 1usize..4,
            radius in 0.0f64..8.0,
        ) {
            let config = SkeletonConfig::new(max_dimension, radius);
            let skeleton = BoundarySkeleton::from_points(&points, &config).unwrap();

            let f = skeleton.filtration();
            for id in 0..skeleton.n_simplices() {
                if id > 0 {
                    prop_assert!(f[id - 1] <= f[id]);
                }
                for facet in skeleton.facets_of(id).unwrap() {
                    prop_assert!(facet < id);
                    prop_assert!(f[facet] <= f[id]);
                }
            }
        }

        /// Worker count, candidate source and tie-break never change the complex
        #[test]
        fn prop_configurations_agree(
            points in grid_cloud(),
            radius in 0.0f64..8.0,
            workers in 1usize..9,
        ) {
            let base = SkeletonConfig::new(3, radius);
            let reference = BoundarySkeleton::from_points(&points, &base).unwrap();
            let variant = SkeletonConfig::builder()
                .max_dimension(3)
                .max_ball_radius(radius)
                .workers(workers)
                .candidate_source(CandidateSource::VertexSubsets)
                .tie_break(TieBreak::DimensionKey)
                .build()
                .unwrap();
            let other = BoundarySkeleton::from_points(&points, &variant).unwrap();

            prop_assert_eq!(reference.filtration(), other.filtration());
            prop_assert_eq!(reference.dimensions(), other.dimensions());
            for d in 0..=3 {
                prop_assert_eq!(reference.count_in_dimension(d), other.count_in_dimension(d));
            }
        }
    }
}
