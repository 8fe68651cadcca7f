//! Combination Table Writer
//!
//! Fills rows `row_offset .. row_offset + C(max_n, r)` of a row-major table
//! with every r-combination in rank order. The rank space is cut into
//! `workers` contiguous ranges; each worker decodes its first rank once and
//! walks the rest with `successor`, writing only its own rows. Workers share
//! nothing but the read-only binomial table.

use ndarray::{s, Array2, ArrayViewMut2};
use rayon::prelude::*;
use tracing::trace;

use crate::config::MAX_COMBINATION_LEN;
use crate::error::{Result, SkeletonError};

use super::binomial::{binomial, BinomialTable};
use super::codec::{check_request, decode, successor};

/// Write all r-combinations of {0..max_n-1}, each digit plus `additive`,
/// into `out` starting at `row_offset`. Returns the number of rows written.
///
/// Columns past `r` are left untouched. The write is complete when this
/// returns; the mutable borrow of `out` is the phase barrier.
pub fn write_combinations(
    out: ArrayViewMut2<'_, i64>,
    row_offset: usize,
    additive: i64,
    max_n: usize,
    r: usize,
    workers: usize,
) -> Result<usize> {
    check_request(max_n, r)?;
    if r > MAX_COMBINATION_LEN {
        return Err(SkeletonError::InvalidCombination(format!(
            "combination size {} exceeds supported maximum {}",
            r, MAX_COMBINATION_LEN
        )));
    }
    if workers == 0 {
        return Err(SkeletonError::InvalidConfig("workers must be positive".into()));
    }
    if out.ncols() < r {
        return Err(SkeletonError::SizeMismatch(format!(
            "output region has {} columns, combinations need {}",
            out.ncols(),
            r
        )));
    }

    let count = row_count(max_n, r)?;
    let end = row_offset
        .checked_add(count)
        .filter(|&end| end <= out.nrows())
        .ok_or_else(|| {
            SkeletonError::OrderingViolation(format!(
                "rows {}..{}+{} exceed output capacity {}",
                row_offset,
                row_offset,
                count,
                out.nrows()
            ))
        })?;

    let table = BinomialTable::build(max_n, r)?;

    let width = out.ncols();
    let mut region = out.slice_move(s![row_offset..end, ..]);
    let cells = region.as_slice_mut().ok_or_else(|| {
        SkeletonError::dimension_mismatch("row-major output region", "non-contiguous layout")
    })?;

    let rows_per_worker = ((count + workers - 1) / workers).max(1);

    cells
        .par_chunks_mut(rows_per_worker * width)
        .enumerate()
        .for_each(|(worker, chunk)| {
            let first = worker * rows_per_worker;
            trace!(worker, first, rows = chunk.len() / width, "combination partition");

            let mut digits = [0usize; MAX_COMBINATION_LEN];
            let combo = &mut digits[..r];
            decode(first as u64, max_n, &table, combo);

            for (i, row) in chunk.chunks_mut(width).enumerate() {
                if i > 0 {
                    successor(combo);
                }
                for (dst, &digit) in row[..r].iter_mut().zip(combo.iter()) {
                    *dst = digit as i64 + additive;
                }
            }
        });

    Ok(count)
}

/// Allocate a `C(max_n, r) x r` table and fill it with every r-combination
pub fn combination_table(max_n: usize, r: usize, workers: usize) -> Result<Array2<i64>> {
    check_request(max_n, r)?;
    let rows = row_count(max_n, r)?;

    let mut table = Array2::<i64>::zeros((rows, r));
    write_combinations(table.view_mut(), 0, 0, max_n, r, workers)?;
    Ok(table)
}

/// Reject a dimension whose C(n, r) candidate rows exceed `limit`
pub(crate) fn check_candidate_count(
    dimension: usize,
    n: usize,
    r: usize,
    limit: usize,
) -> Result<()> {
    let candidates = binomial(n as u64, r as u64)?;
    if candidates > limit as u64 {
        return Err(SkeletonError::CandidateLimitExceeded {
            dimension,
            candidates,
            limit,
        });
    }
    Ok(())
}

fn row_count(max_n: usize, r: usize) -> Result<usize> {
    let count = binomial(max_n as u64, r as u64)?;
    usize::try_from(count).map_err(|_| {
        SkeletonError::SizeMismatch(format!(
            "C({}, {}) = {} rows do not fit in memory",
            max_n, r, count
        ))
    })
}
