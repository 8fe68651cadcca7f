//! Error Types
//!
//! Every failure of the skeleton pipeline is a precondition or postcondition
//! check. They are raised synchronously, before any parallel work for the
//! failing phase is dispatched, and are never recovered internally.

use thiserror::Error;

/// Result type alias for skeleton construction
pub type Result<T> = std::result::Result<T, SkeletonError>;

/// Errors raised while building a boundary skeleton
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkeletonError {
    /// A buffer or array has the wrong number of rows, columns or elements
    #[error("Size mismatch: {0}")]
    SizeMismatch(String),

    /// An array has the wrong rank or memory layout
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What the operation requires
        expected: String,
        /// What it was given
        found: String,
    },

    /// A positional or ordering constraint does not hold
    #[error("Ordering violation: {0}")]
    OrderingViolation(String),

    /// Invalid (max_n, r, rank) triple for the combinatorial number system
    #[error("Invalid combination request: {0}")]
    InvalidCombination(String),

    /// Exact binomial arithmetic does not fit in 64 bits
    #[error("Binomial coefficient C({n}, {k}) overflows u64")]
    BinomialOverflow {
        /// Upper index
        n: u64,
        /// Lower index
        k: u64,
    },

    /// A coordinate of the point cloud is NaN or infinite
    #[error("Non-finite coordinate at point {point}, axis {axis}")]
    NonFiniteInput {
        /// Row of the offending point
        point: usize,
        /// Column of the offending coordinate
        axis: usize,
    },

    /// A dimension would enumerate more candidates than allowed
    #[error("Dimension {dimension} needs {candidates} candidate rows, limit is {limit}")]
    CandidateLimitExceeded {
        /// Simplex dimension being built
        dimension: usize,
        /// Candidate rows requested
        candidates: u64,
        /// Configured limit
        limit: usize,
    },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SkeletonError {
    pub(crate) fn dimension_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::DimensionMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
