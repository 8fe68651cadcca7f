//! One dimension of the complex, before global assembly.

use ndarray::{Array1, Array2, Axis};

use crate::error::{Result, SkeletonError};

/// All surviving simplices of a single dimension d ≥ 1
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexLevel {
    dimension: usize,
    /// `(len, d + 1)` facet ids: vertex ids for d = 1, rows of level d - 1 otherwise
    facets: Array2<i64>,
    /// `(len, d + 1)` vertex ids of each simplex, strictly decreasing
    vertices: Array2<usize>,
    /// Filtration value of each simplex
    filtration: Array1<f64>,
}

impl SimplexLevel {
    /// Assemble a level, checking that the three tables line up
    pub fn new(
        dimension: usize,
        facets: Array2<i64>,
        vertices: Array2<usize>,
        filtration: Array1<f64>,
    ) -> Result<Self> {
        let width = dimension + 1;
        if dimension == 0 {
            return Err(SkeletonError::dimension_mismatch(
                "simplex level of dimension >= 1",
                "dimension 0",
            ));
        }
        if facets.ncols() != width || vertices.ncols() != width {
            return Err(SkeletonError::dimension_mismatch(
                format!("{} facet and vertex columns", width),
                format!("{} facet, {} vertex columns", facets.ncols(), vertices.ncols()),
            ));
        }
        if facets.nrows() != filtration.len() || vertices.nrows() != filtration.len() {
            return Err(SkeletonError::SizeMismatch(format!(
                "{} facet rows, {} vertex rows, {} filtration values",
                facets.nrows(),
                vertices.nrows(),
                filtration.len()
            )));
        }

        Ok(Self {
            dimension,
            facets,
            vertices,
            filtration,
        })
    }

    /// Level with no simplices
    pub fn empty(dimension: usize) -> Self {
        let width = dimension + 1;
        Self {
            dimension,
            facets: Array2::zeros((0, width)),
            vertices: Array2::zeros((0, width)),
            filtration: Array1::zeros(0),
        }
    }

    /// Keep only the given rows, in the given order
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            dimension: self.dimension,
            facets: self.facets.select(Axis(0), rows),
            vertices: self.vertices.select(Axis(0), rows),
            filtration: self.filtration.select(Axis(0), rows),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.filtration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtration.is_empty()
    }

    pub fn facets(&self) -> &Array2<i64> {
        &self.facets
    }

    pub fn vertices(&self) -> &Array2<usize> {
        &self.vertices
    }

    pub fn filtration(&self) -> &Array1<f64> {
        &self.filtration
    }
}
