//! Pipeline Configuration
//!
//! Parameters controlling skeleton construction: how far up the dimension
//! ladder to go, the ball radius bound, how the combination tables are
//! partitioned across workers, and how ties between filtration values are
//! broken during the global sort.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkeletonError};

/// Highest simplex dimension the pipeline supports.
///
/// Fixes the size of the stack-local combination buffer each worker uses,
/// so a combination never has more than `MAX_DIMENSION + 1` digits.
pub const MAX_DIMENSION: usize = 15;

/// Longest combination a worker can materialize
pub const MAX_COMBINATION_LEN: usize = MAX_DIMENSION + 1;

/// Source of candidate simplices for dimensions ≥ 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateSource {
    /// Every (d+1)-subset of the surviving (d-1)-simplices
    FacetSubsets,

    /// Every (d+1)-subset of the vertices, facets looked up by rank
    VertexSubsets,
}

impl Default for CandidateSource {
    fn default() -> Self {
        Self::FacetSubsets
    }
}

/// How simplices with equal filtration value are ordered by the global sort.
///
/// `Augmented` is checked against the data before sorting: if two distinct
/// filtration values lie closer than the largest offset of the ladder, the
/// build fails with `OrderingViolation`. Clouds with near-equal distances
/// should use a smaller `epsilon` or `DimensionKey`, which never rejects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TieBreak {
    /// Add `epsilon * 2^(d-2)` to every dimension-d value (d ≥ 2) before sorting
    Augmented {
        /// Offset of dimension 2
        epsilon: f64,
    },

    /// Sort on `(value, dimension)` directly
    DimensionKey,
}

impl TieBreak {
    /// Default augmentation step: single-precision machine epsilon
    pub const DEFAULT_EPSILON: f64 = f32::EPSILON as f64;
}

impl Default for TieBreak {
    fn default() -> Self {
        Self::Augmented {
            epsilon: Self::DEFAULT_EPSILON,
        }
    }
}

/// Configuration for skeleton construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonConfig {
    /// Highest simplex dimension to build (D)
    pub max_dimension: usize,

    /// Edges longer than this (L1) never enter the complex
    pub max_ball_radius: f64,

    /// Number of contiguous rank partitions per combination table
    pub workers: usize,

    /// Candidate enumeration for dimensions ≥ 2
    pub candidate_source: CandidateSource,

    /// Tie-breaking discipline of the global sort; the default ladder
    /// rejects distinct values closer than `f32::EPSILON * 2^(D-2)`
    pub tie_break: TieBreak,

    /// Maximum candidate rows enumerated for a single dimension
    pub candidate_limit: usize,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            max_dimension: 2,
            max_ball_radius: f64::INFINITY,
            workers: rayon::current_num_threads().max(1),
            candidate_source: CandidateSource::default(),
            tie_break: TieBreak::default(),
            candidate_limit: 1 << 28,
        }
    }
}

impl SkeletonConfig {
    /// Config with the two required parameters, everything else default
    pub fn new(max_dimension: usize, max_ball_radius: f64) -> Self {
        Self {
            max_dimension,
            max_ball_radius,
            ..Self::default()
        }
    }

    /// Create a new config builder
    pub fn builder() -> SkeletonConfigBuilder {
        SkeletonConfigBuilder::new()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 || self.max_dimension > MAX_DIMENSION {
            return Err(SkeletonError::InvalidConfig(format!(
                "max_dimension must be in 1..={}, got {}",
                MAX_DIMENSION, self.max_dimension
            )));
        }

        if self.max_ball_radius.is_nan() || self.max_ball_radius < 0.0 {
            return Err(SkeletonError::InvalidConfig(format!(
                "max_ball_radius must be non-negative, got {}",
                self.max_ball_radius
            )));
        }

        if self.workers == 0 {
            return Err(SkeletonError::InvalidConfig(
                "workers must be positive".into(),
            ));
        }

        if self.candidate_limit == 0 {
            return Err(SkeletonError::InvalidConfig(
                "candidate_limit must be positive".into(),
            ));
        }

        if let TieBreak::Augmented { epsilon } = self.tie_break {
            if !epsilon.is_finite() || epsilon <= 0.0 {
                return Err(SkeletonError::InvalidConfig(format!(
                    "tie-break epsilon must be finite and positive, got {}",
                    epsilon
                )));
            }
            // Largest offset of the ladder must stay finite
            let top = tie_break_offset(epsilon, self.max_dimension);
            if !top.is_finite() {
                return Err(SkeletonError::InvalidConfig(format!(
                    "tie-break offset for dimension {} is not finite",
                    self.max_dimension
                )));
            }
        }

        Ok(())
    }
}

/// Tie-break offset added to a dimension-`dim` filtration value.
///
/// Zero for dimensions 0 and 1, `epsilon` for dimension 2, doubling with
/// every further dimension.
pub fn tie_break_offset(epsilon: f64, dim: usize) -> f64 {
    if dim < 2 {
        0.0
    } else {
        epsilon * 2f64.powi((dim - 2) as i32)
    }
}

/// Builder for SkeletonConfig
#[derive(Debug, Default)]
pub struct SkeletonConfigBuilder {
    config: SkeletonConfig,
}

impl SkeletonConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: SkeletonConfig::default(),
        }
    }

    /// Set the highest simplex dimension
    pub fn max_dimension(mut self, dim: usize) -> Self {
        self.config.max_dimension = dim;
        self
    }

    /// Set the ball radius bound
    pub fn max_ball_radius(mut self, radius: f64) -> Self {
        self.config.max_ball_radius = radius;
        self
    }

    /// Set the number of rank partitions
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the candidate source for dimensions ≥ 2
    pub fn candidate_source(mut self, source: CandidateSource) -> Self {
        self.config.candidate_source = source;
        self
    }

    /// Set the tie-break discipline
    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.config.tie_break = tie_break;
        self
    }

    /// Set the per-dimension candidate limit
    pub fn candidate_limit(mut self, limit: usize) -> Self {
        self.config.candidate_limit = limit;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SkeletonConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
