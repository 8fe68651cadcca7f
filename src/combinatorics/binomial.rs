//! Binomial Coefficient Table
//!
//! Exact C(n, k) over a grid of (n, k) pairs. The table is the lookup the
//! combination codec decodes ranks against; every cell is independent, so it
//! is filled with a flat parallel map over the grid.

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{Result, SkeletonError};

/// Exact binomial coefficient C(n, k).
///
/// Multiplicative formula in increasing `i`: after step `i` the running
/// value is C(n - k + i, i), so each division is exact. Returns
/// `BinomialOverflow` once that value leaves u64.
pub fn binomial(n: u64, k: u64) -> Result<u64> {
    if k > n {
        return Ok(0);
    }
    let j = k.min(n - k);

    let mut acc: u64 = 1;
    for i in 1..=j {
        let wide = acc as u128 * (n - j + i) as u128 / i as u128;
        acc = u64::try_from(wide).map_err(|_| SkeletonError::BinomialOverflow { n, k })?;
    }
    Ok(acc)
}

/// Precomputed C(n, k) for 0 ≤ n < max_n, 1 ≤ k ≤ max_k
#[derive(Debug, Clone)]
pub struct BinomialTable {
    /// `table[[k - 1, n]] == C(n, k)`
    table: Array2<u64>,
}

impl BinomialTable {
    /// Build the table for `max_n` upper indices and `max_k` lower indices
    pub fn build(max_n: usize, max_k: usize) -> Result<Self> {
        let cells: Vec<u64> = (0..max_k * max_n)
            .into_par_iter()
            .map(|idx| {
                let (k, n) = (idx / max_n, idx % max_n);
                binomial(n as u64, (k + 1) as u64)
            })
            .collect::<Result<Vec<u64>>>()?;

        let table = Array2::from_shape_vec((max_k, max_n), cells)
            .map_err(|e| SkeletonError::SizeMismatch(e.to_string()))?;

        Ok(Self { table })
    }

    /// C(n, k); `k == 0` yields 1
    #[inline]
    pub fn get(&self, n: usize, k: usize) -> u64 {
        if k == 0 {
            return 1;
        }
        debug_assert!(k <= self.max_k() && n < self.max_n());
        self.table[[k - 1, n]]
    }

    /// Number of upper indices covered
    pub fn max_n(&self) -> usize {
        self.table.ncols()
    }

    /// Number of lower indices covered
    pub fn max_k(&self) -> usize {
        self.table.nrows()
    }

    /// Raw table, `[[k - 1, n]] == C(n, k)`
    pub fn as_array(&self) -> &Array2<u64> {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values() {
        assert_eq!(binomial(5, 2).unwrap(), 10);
        assert_eq!(binomial(0, 1).unwrap(), 0);
        assert_eq!(binomial(4, 4).unwrap(), 1);
        assert_eq!(binomial(0, 0).unwrap(), 1);
        assert_eq!(binomial(6, 3).unwrap(), 20);
        assert_eq!(binomial(3, 5).unwrap(), 0);
    }

    #[test]
    fn test_large_exact_value() {
        assert_eq!(binomial(64, 32).unwrap(), 1_832_624_140_942_590_534);
        assert_eq!(binomial(4950, 3).unwrap(), 20_202_312_900);
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = binomial(100, 50).unwrap_err();
        assert!(matches!(err, SkeletonError::BinomialOverflow { n: 100, .. }));
    }

    #[test]
    fn test_overflow_reports_requested_k() {
        assert_eq!(
            binomial(100, 60).unwrap_err(),
            SkeletonError::BinomialOverflow { n: 100, k: 60 }
        );
    }

    #[test]
    fn test_table_layout() {
        let table = BinomialTable::build(6, 4).unwrap();
        assert_eq!(table.as_array().dim(), (4, 6));
        assert_eq!(table.max_n(), 6);
        assert_eq!(table.max_k(), 4);

        // table[k][n] == C(n, k + 1)
        assert_eq!(table.as_array()[[1, 5]], 10);
        assert_eq!(table.as_array()[[0, 0]], 0);
        assert_eq!(table.as_array()[[3, 4]], 1);
        assert_eq!(table.get(5, 2), 10);
        assert_eq!(table.get(3, 0), 1);
    }

    #[test]
    fn test_table_satisfies_pascal_rule() {
        let table = BinomialTable::build(20, 6).unwrap();
        for k in 2..=6 {
            for n in 1..20 {
                assert_eq!(
                    table.get(n, k),
                    table.get(n - 1, k) + table.get(n - 1, k - 1),
                    "C({}, {})",
                    n,
                    k
                );
            }
        }
    }

    #[test]
    fn test_empty_table() {
        let table = BinomialTable::build(0, 3).unwrap();
        assert_eq!(table.as_array().len(), 0);
    }
}
