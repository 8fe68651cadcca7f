//! Higher-Dimension Boundary Builder
//!
//! A d-simplex (d ≥ 2) is born when the last of its d + 1 facets is born:
//!
//!   filtration(σ) = max { filtration(τ) : τ facet of σ }
//!
//! No radius test happens here. Any simplex whose facets all survived is in
//! the complex, and monotonicity of the max keeps it after its facets.
//!
//! Candidates come from the combination table writer, either as (d+1)-subsets
//! of the surviving (d-1)-simplices or as (d+1)-subsets of the vertices.
//! Either way a candidate is kept only if its facets close up into the
//! boundary of a single simplex.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::debug;

use crate::combinatorics::{
    check_candidate_count, combination_table, rank_unchecked, BinomialTable,
};
use crate::config::{CandidateSource, SkeletonConfig, MAX_COMBINATION_LEN};
use crate::error::{Result, SkeletonError};

use super::level::SimplexLevel;

type Digits = SmallVec<[usize; MAX_COMBINATION_LEN]>;

/// Build the level above `prev` using the configured candidate source
pub fn build_higher(
    prev: &SimplexLevel,
    n_vertices: usize,
    config: &SkeletonConfig,
) -> Result<SimplexLevel> {
    match config.candidate_source {
        CandidateSource::FacetSubsets => {
            build_from_facets(prev, config.workers, config.candidate_limit)
        }
        CandidateSource::VertexSubsets => {
            build_from_vertices(prev, n_vertices, config.workers, config.candidate_limit)
        }
    }
}

/// Enumerate every (d+1)-subset of the level-(d-1) simplices.
///
/// Facet rows hold local indices into `prev`, largest first.
pub fn build_from_facets(
    prev: &SimplexLevel,
    workers: usize,
    candidate_limit: usize,
) -> Result<SimplexLevel> {
    let dimension = prev.dimension() + 1;
    let r = dimension + 1;
    let m = prev.len();

    if r > m {
        debug!(dimension, available = m, "not enough facets, dimension is empty");
        return Ok(SimplexLevel::empty(dimension));
    }
    check_candidate_count(dimension, m, r, candidate_limit)?;

    let candidates = combination_table(m, r, workers)?;
    let prev_vertices = prev.vertices();
    let prev_filtration = prev.filtration();

    let close_up = |row: ArrayView1<'_, i64>| -> Option<(Digits, f64)> {
        let mut union = Digits::new();
        let mut value = f64::NEG_INFINITY;
        for &facet in row.iter() {
            let facet = facet as usize;
            value = value.max(prev_filtration[facet]);
            for &v in prev_vertices.row(facet).iter() {
                if !union.contains(&v) {
                    if union.len() == r {
                        return None;
                    }
                    union.push(v);
                }
            }
        }
        if union.len() != r {
            return None;
        }
        union.sort_unstable_by(|a, b| b.cmp(a));
        Some((union, value))
    };

    let closed: Vec<Option<(Digits, f64)>> = (0..candidates.nrows())
        .into_par_iter()
        .map(|c| close_up(candidates.row(c)))
        .collect();
    let (keep, vertex_rows, filtration) = split_kept(closed);

    debug!(
        dimension,
        candidates = candidates.nrows(),
        surviving = keep.len(),
        "dimension built from facet subsets"
    );

    let facets = candidates.select(Axis(0), &keep);
    let vertices = Array2::from_shape_vec((keep.len(), r), vertex_rows)
        .map_err(|e| SkeletonError::SizeMismatch(e.to_string()))?;

    SimplexLevel::new(dimension, facets, vertices, filtration)
}

/// Enumerate every (d+1)-subset of the vertices and look its facets up in `prev`.
///
/// A facet is found by ranking the vertex set left after deleting one
/// vertex; facet `j` of a row is the one missing the row's `j`-th vertex.
pub fn build_from_vertices(
    prev: &SimplexLevel,
    n_vertices: usize,
    workers: usize,
    candidate_limit: usize,
) -> Result<SimplexLevel> {
    let dimension = prev.dimension() + 1;
    let r = dimension + 1;

    if r > n_vertices || prev.len() < r {
        debug!(dimension, available = prev.len(), "not enough facets, dimension is empty");
        return Ok(SimplexLevel::empty(dimension));
    }
    if let Some(&bad) = prev.vertices().iter().find(|&&v| v >= n_vertices) {
        return Err(SkeletonError::SizeMismatch(format!(
            "vertex {} out of range for {} vertices",
            bad, n_vertices
        )));
    }
    check_candidate_count(dimension, n_vertices, r, candidate_limit)?;

    let facet_table = BinomialTable::build(n_vertices, dimension)?;
    let mut by_rank: Vec<(u64, usize)> = prev
        .vertices()
        .outer_iter()
        .enumerate()
        .map(|(local, row)| {
            let digits: Digits = row.iter().copied().collect();
            (rank_unchecked(&digits, &facet_table), local)
        })
        .collect();
    by_rank.par_sort_unstable();

    let candidates = combination_table(n_vertices, r, workers)?;
    let prev_filtration = prev.filtration();

    let lookup = |row: ArrayView1<'_, i64>| -> Option<(Digits, f64)> {
        let mut facets = Digits::new();
        let mut value = f64::NEG_INFINITY;
        let mut face = Digits::new();
        for skip in 0..r {
            face.clear();
            face.extend(
                row.iter()
                    .enumerate()
                    .filter(|&(j, _)| j != skip)
                    .map(|(_, &v)| v as usize),
            );
            let rank = rank_unchecked(&face, &facet_table);
            let pos = by_rank.binary_search_by_key(&rank, |&(rk, _)| rk).ok()?;
            let local = by_rank[pos].1;
            value = value.max(prev_filtration[local]);
            facets.push(local);
        }
        Some((facets, value))
    };

    let found: Vec<Option<(Digits, f64)>> = (0..candidates.nrows())
        .into_par_iter()
        .map(|c| lookup(candidates.row(c)))
        .collect();
    let (keep, facet_rows, filtration) = split_kept(found);

    debug!(
        dimension,
        candidates = candidates.nrows(),
        surviving = keep.len(),
        "dimension built from vertex subsets"
    );

    let facet_rows: Vec<i64> = facet_rows.into_iter().map(|f| f as i64).collect();
    let facets = Array2::from_shape_vec((keep.len(), r), facet_rows)
        .map_err(|e| SkeletonError::SizeMismatch(e.to_string()))?;
    let vertices = candidates
        .select(Axis(0), &keep)
        .mapv(|v| v as usize);

    SimplexLevel::new(dimension, facets, vertices, filtration)
}

/// Candidate rows that survived, their digits flattened row-major, and
/// their filtration values
fn split_kept(results: Vec<Option<(Digits, f64)>>) -> (Vec<usize>, Vec<usize>, Array1<f64>) {
    let mut keep = Vec::new();
    let mut rows = Vec::new();
    let mut values = Vec::new();
    for (c, (digits, value)) in results
        .into_iter()
        .enumerate()
        .filter_map(|(c, found)| found.map(|hit| (c, hit)))
    {
        keep.push(c);
        rows.extend(digits);
        values.push(value);
    }
    (keep, rows, Array1::from(values))
}
