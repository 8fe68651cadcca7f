//! Dimension-1 Boundary Builder
//!
//! Edges are every vertex pair, born at their L1 distance. This is the only
//! place the ball radius bound is applied: higher dimensions are built from
//! surviving edges only, so the bound propagates upward.

use ndarray::{Array1, Array2, ArrayView2, Zip};
use rayon::prelude::*;
use tracing::debug;

use crate::combinatorics::{check_candidate_count, combination_table};
use crate::error::{Result, SkeletonError};

use super::level::SimplexLevel;

/// Pairwise L1 distance matrix, one parallel task per cell
pub fn l1_distance_matrix(points: &ArrayView2<f64>) -> Array2<f64> {
    let n = points.nrows();
    let mut dm = Array2::<f64>::zeros((n, n));

    Zip::indexed(&mut dm).par_for_each(|(i, j), d| {
        *d = points
            .row(i)
            .iter()
            .zip(points.row(j).iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
    });

    dm
}

/// Check the point cloud is non-empty and finite
pub(crate) fn validate_points(points: &ArrayView2<f64>) -> Result<()> {
    if points.nrows() == 0 {
        return Err(SkeletonError::SizeMismatch(
            "point cloud must contain at least one point".into(),
        ));
    }
    if let Some(((point, axis), _)) = points.indexed_iter().find(|(_, x)| !x.is_finite()) {
        return Err(SkeletonError::NonFiniteInput { point, axis });
    }
    Ok(())
}

/// Build every edge with L1 length at most `max_radius`.
///
/// Edge rows are `[hi, lo]` vertex pairs in rank order; the subset that
/// survives the radius bound keeps that order. Fails before allocating when
/// C(n, 2) exceeds `candidate_limit`.
pub fn build_edges(
    points: &ArrayView2<f64>,
    max_radius: f64,
    workers: usize,
    candidate_limit: usize,
) -> Result<SimplexLevel> {
    validate_points(points)?;
    if max_radius.is_nan() || max_radius < 0.0 {
        return Err(SkeletonError::InvalidConfig(format!(
            "max_ball_radius must be non-negative, got {}",
            max_radius
        )));
    }

    let n = points.nrows();
    if n < 2 {
        return Ok(SimplexLevel::empty(1));
    }
    check_candidate_count(1, n, 2, candidate_limit)?;

    let pairs = combination_table(n, 2, workers)?;
    let dm = l1_distance_matrix(points);

    let lengths: Vec<f64> = (0..pairs.nrows())
        .into_par_iter()
        .map(|e| dm[[pairs[[e, 0]] as usize, pairs[[e, 1]] as usize]])
        .collect();

    let keep: Vec<usize> = lengths
        .iter()
        .enumerate()
        .filter(|&(_, &len)| len <= max_radius)
        .map(|(e, _)| e)
        .collect();

    debug!(
        candidates = pairs.nrows(),
        surviving = keep.len(),
        max_radius,
        "dimension 1 built"
    );

    let vertices = pairs.mapv(|v| v as usize);
    let level = SimplexLevel::new(1, pairs, vertices, Array1::from(lengths))?;
    Ok(level.select(&keep))
}
