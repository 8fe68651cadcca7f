//! Complex Assembler
//!
//! Merges the per-dimension levels into one filtration-ordered complex:
//!
//! 1. Global ids: vertices are 0..n, then dimension 1, 2, ... in level order.
//!    Level d's facet ids are local to level d-1 and get shifted by that
//!    level's first global id.
//! 2. One sort over every non-vertex simplex by filtration value. Ties must
//!    put facets before cofacets; either the augmentation ladder
//!    `value + ε·2^(d-2)` or the `(value, dimension)` key guarantees it.
//! 3. True values, dimensions and boundary rows are gathered through the
//!    sort permutation; facet ids are remapped through its inverse.
//!
//! The result is checked before it is returned: every facet id precedes the
//! row that references it and filtration values never decrease.

use ndarray::{concatenate, Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;
use tracing::debug;

use crate::config::{tie_break_offset, TieBreak};
use crate::error::{Result, SkeletonError};

use super::level::SimplexLevel;

/// Padding of unused boundary columns
pub const SENTINEL: i64 = -1;

/// Filtration-ordered complex over all dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledComplex {
    /// One row per non-vertex simplex, width 2 (D + 1), padded with `SENTINEL`
    pub boundary: Array2<i64>,
    /// Filtration value per global id, vertices first
    pub filtration: Array1<f64>,
    /// Dimension per global id, vertices first
    pub dimensions: Array1<usize>,
}

/// Assemble levels for dimensions 1..=D over `n_vertices` vertices
pub fn assemble(
    n_vertices: usize,
    levels: &[SimplexLevel],
    tie_break: TieBreak,
) -> Result<AssembledComplex> {
    for (i, level) in levels.iter().enumerate() {
        if level.dimension() != i + 1 {
            return Err(SkeletonError::dimension_mismatch(
                format!("level {} of dimension {}", i, i + 1),
                format!("dimension {}", level.dimension()),
            ));
        }
    }

    let max_dimension = levels.len();
    let width = 2 * (max_dimension + 1);

    // First global id of every level
    let mut starts = Vec::with_capacity(max_dimension + 1);
    starts.push(n_vertices);
    for level in levels {
        let last = starts[starts.len() - 1];
        starts.push(last + level.len());
    }
    let total = starts[max_dimension] - n_vertices;

    let values: Array1<f64> = if levels.is_empty() {
        Array1::zeros(0)
    } else {
        let views: Vec<ArrayView1<'_, f64>> =
            levels.iter().map(|l| l.filtration().view()).collect();
        concatenate(Axis(0), &views).map_err(|e| SkeletonError::SizeMismatch(e.to_string()))?
    };
    let dims: Vec<usize> = levels
        .iter()
        .flat_map(|l| std::iter::repeat(l.dimension()).take(l.len()))
        .collect();

    let perm = sort_permutation(&values, &dims, max_dimension, tie_break)?;

    let mut new_position = vec![0usize; total];
    for (pos, &old) in perm.iter().enumerate() {
        new_position[old] = pos;
    }
    let remap = |global: usize| -> i64 {
        if global < n_vertices {
            global as i64
        } else {
            (n_vertices + new_position[global - n_vertices]) as i64
        }
    };

    let mut cells = vec![SENTINEL; total * width];
    cells
        .par_chunks_mut(width)
        .zip(perm.par_iter())
        .for_each(|(row, &old)| {
            let global = n_vertices + old;
            // Level holding `global`: last start not above it
            let li = starts.partition_point(|&s| s <= global) - 1;
            let level = &levels[li];
            let shift = if li == 0 { 0 } else { starts[li - 1] };
            let facets = level.facets().row(global - starts[li]);
            for (dst, &facet) in row.iter_mut().zip(facets.iter()) {
                *dst = remap(facet as usize + shift);
            }
        });
    let boundary = Array2::from_shape_vec((total, width), cells)
        .map_err(|e| SkeletonError::SizeMismatch(e.to_string()))?;

    let sorted_values: Array1<f64> = values.select(Axis(0), &perm);
    let vertex_values = Array1::<f64>::zeros(n_vertices);
    let filtration = concatenate(Axis(0), &[vertex_values.view(), sorted_values.view()])
        .map_err(|e| SkeletonError::SizeMismatch(e.to_string()))?;
    let dimensions: Array1<usize> = std::iter::repeat(0)
        .take(n_vertices)
        .chain(perm.iter().map(|&old| dims[old]))
        .collect();

    debug!(
        vertices = n_vertices,
        simplices = total,
        width,
        "complex assembled"
    );

    let complex = AssembledComplex {
        boundary,
        filtration,
        dimensions,
    };
    verify_ordering(n_vertices, &complex.boundary)?;
    verify_monotone(&complex.filtration)?;
    Ok(complex)
}

/// Permutation sorting the concatenated non-vertex simplices
fn sort_permutation(
    values: &Array1<f64>,
    dims: &[usize],
    max_dimension: usize,
    tie_break: TieBreak,
) -> Result<Vec<usize>> {
    let mut perm: Vec<usize> = (0..values.len()).collect();

    match tie_break {
        TieBreak::Augmented { epsilon } if max_dimension >= 2 => {
            validate_augmentation(values, epsilon, max_dimension)?;
            let keys = augment(values, dims, epsilon);
            perm.par_sort_unstable_by(|&a, &b| keys[a].total_cmp(&keys[b]));
        }
        TieBreak::Augmented { .. } => {
            perm.par_sort_unstable_by(|&a, &b| values[a].total_cmp(&values[b]));
        }
        TieBreak::DimensionKey => {
            perm.par_sort_unstable_by(|&a, &b| {
                values[a]
                    .total_cmp(&values[b])
                    .then(dims[a].cmp(&dims[b]))
            });
        }
    }

    Ok(perm)
}

/// Add the dimension offset to every value
pub fn augment(values: &Array1<f64>, dims: &[usize], epsilon: f64) -> Array1<f64> {
    Array1::from_iter(
        values
            .iter()
            .zip(dims.iter())
            .map(|(&v, &d)| v + tie_break_offset(epsilon, d)),
    )
}

/// Check the offset ladder separates dimensions without reordering values.
///
/// The top offset must stay below the smallest gap between distinct values,
/// and every step of the ladder must still be visible at the largest value.
pub fn validate_augmentation(
    values: &Array1<f64>,
    epsilon: f64,
    max_dimension: usize,
) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }

    let mut sorted = values.to_vec();
    sorted.par_sort_unstable_by(|a, b| a.total_cmp(b));
    sorted.dedup();

    let peak = sorted[sorted.len() - 1];
    for d in 2..=max_dimension {
        let lower = peak + tie_break_offset(epsilon, d - 1);
        let upper = peak + tie_break_offset(epsilon, d);
        if upper <= lower {
            return Err(SkeletonError::OrderingViolation(format!(
                "tie-break epsilon {:e} cannot separate dimensions {} and {} at value {}",
                epsilon,
                d - 1,
                d,
                peak
            )));
        }
    }

    let top = tie_break_offset(epsilon, max_dimension);
    if let Some(gap) = sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .min_by(|a, b| a.total_cmp(b))
    {
        if top >= gap {
            return Err(SkeletonError::OrderingViolation(format!(
                "tie-break offset {:e} for dimension {} reaches the smallest value gap {:e}",
                top, max_dimension, gap
            )));
        }
    }

    Ok(())
}

/// Every facet id in row `i` must be below `n_vertices + i`
pub fn verify_ordering(n_vertices: usize, boundary: &Array2<i64>) -> Result<()> {
    let bad = (0..boundary.nrows()).into_par_iter().find_any(|&i| {
        boundary
            .row(i)
            .iter()
            .any(|&f| f != SENTINEL && (f < 0 || f as usize >= n_vertices + i))
    });

    match bad {
        Some(i) => Err(SkeletonError::OrderingViolation(format!(
            "row {} (global id {}) references {:?}",
            i,
            n_vertices + i,
            boundary.row(i).to_vec()
        ))),
        None => Ok(()),
    }
}

fn verify_monotone(filtration: &Array1<f64>) -> Result<()> {
    match filtration
        .iter()
        .zip(filtration.iter().skip(1))
        .position(|(a, b)| b < a)
    {
        Some(i) => Err(SkeletonError::OrderingViolation(format!(
            "filtration decreases at global id {}: {} -> {}",
            i + 1,
            filtration[i],
            filtration[i + 1]
        ))),
        None => Ok(()),
    }
}
