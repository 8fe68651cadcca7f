//! Combination Codec: Combinatorial Number System
//!
//! Every r-combination of {0, ..., max_n - 1} is written most significant
//! digit first as a strictly decreasing tuple (c₀ > c₁ > ... > c_{r-1}) and
//! identified with its rank
//!
//!   N = C(c₀, r) + C(c₁, r - 1) + ... + C(c_{r-1}, 1)
//!
//! Ranks increase with the lexicographic order of these tuples, so rank 0 is
//! (r-1, ..., 1, 0). `unrank` jumps straight to any rank; `successor` walks
//! from one rank to the next without touching the table. The two are views
//! of the same enumeration: `successor(unrank(N)) == unrank(N + 1)`.

use crate::error::{Result, SkeletonError};

use super::binomial::{binomial, BinomialTable};

/// Decode `rank` into `out`, whose length is the combination size r.
///
/// `table` must cover upper indices below `max_n` and lower indices up to r.
pub fn unrank(rank: u64, max_n: usize, table: &BinomialTable, out: &mut [usize]) -> Result<()> {
    let r = out.len();
    check_request(max_n, r)?;
    if table.max_n() < max_n || table.max_k() < r {
        return Err(SkeletonError::SizeMismatch(format!(
            "binomial table covers n < {}, k <= {}; need n < {}, k <= {}",
            table.max_n(),
            table.max_k(),
            max_n,
            r
        )));
    }
    let count = binomial(max_n as u64, r as u64)?;
    if rank >= count {
        return Err(SkeletonError::InvalidCombination(format!(
            "rank {} out of range for C({}, {}) = {}",
            rank, max_n, r, count
        )));
    }

    decode(rank, max_n, table, out);
    Ok(())
}

/// Unchecked decoding used by workers after the request was validated once
#[inline]
pub(crate) fn decode(mut rank: u64, max_n: usize, table: &BinomialTable, out: &mut [usize]) {
    let r = out.len();
    let mut upper = max_n;

    for (slot, digit) in out.iter_mut().enumerate() {
        let k = r - slot;
        // Largest v in [k - 1, upper) with C(v, k) <= rank; C(k - 1, k) = 0
        let (mut lo, mut hi) = (k - 1, upper);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if table.get(mid, k) <= rank {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        rank -= table.get(lo, k);
        *digit = lo;
        upper = lo;
    }
}

/// Advance `combination` in place to the next rank.
///
/// Finds the least significant digit that can be incremented without
/// reaching its more significant neighbour (the leading digit is unbounded),
/// increments it, and resets every less significant digit to the smallest
/// decreasing run (..., 2, 1, 0). The caller stops before the last rank.
#[inline]
pub fn successor(combination: &mut [usize]) {
    let r = combination.len();
    if r == 0 {
        return;
    }

    let pivot = (1..r)
        .rev()
        .find(|&j| combination[j] + 1 < combination[j - 1])
        .unwrap_or(0);

    combination[pivot] += 1;
    for (i, digit) in combination.iter_mut().enumerate().skip(pivot + 1) {
        *digit = r - 1 - i;
    }
}

/// Rank of a strictly decreasing combination
pub fn rank(combination: &[usize], table: &BinomialTable) -> Result<u64> {
    let r = combination.len();
    if r == 0 || r > table.max_k() {
        return Err(SkeletonError::InvalidCombination(format!(
            "combination of length {} cannot be ranked with lower indices up to {}",
            r,
            table.max_k()
        )));
    }
    if combination.windows(2).any(|w| w[0] <= w[1]) {
        return Err(SkeletonError::OrderingViolation(format!(
            "combination {:?} is not strictly decreasing",
            combination
        )));
    }
    if combination[0] >= table.max_n() {
        return Err(SkeletonError::InvalidCombination(format!(
            "digit {} outside binomial table (n < {})",
            combination[0],
            table.max_n()
        )));
    }

    Ok(rank_unchecked(combination, table))
}

#[inline]
pub(crate) fn rank_unchecked(combination: &[usize], table: &BinomialTable) -> u64 {
    let r = combination.len();
    combination
        .iter()
        .enumerate()
        .map(|(slot, &digit)| table.get(digit, r - slot))
        .sum()
}

pub(crate) fn check_request(max_n: usize, r: usize) -> Result<()> {
    if r == 0 {
        return Err(SkeletonError::InvalidCombination(
            "combination size must be positive".into(),
        ));
    }
    if r > max_n {
        return Err(SkeletonError::InvalidCombination(format!(
            "cannot choose {} of {}",
            r, max_n
        )));
    }
    Ok(())
}
