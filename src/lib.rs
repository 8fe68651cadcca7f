//! # TDA-Skeleton
//!
//! Filtration-sorted boundary skeletons of point clouds: the input of a
//! persistent homology boundary matrix reduction.
//!
//! ## Construction
//!
//! For a point cloud X ⊂ ℝᵐ and a ball radius bound ε, the complex grows
//! dimension by dimension:
//!
//! 1. **Edges**: every vertex pair with L1 distance ≤ ε, born at that distance
//! 2. **d-simplices** (d ≥ 2): every vertex set whose d + 1 facets all
//!    exist, born at the largest facet value
//! 3. **Assembly**: one global id space, sorted by filtration value with
//!    facets always before cofacets, emitted as a boundary incidence table
//!
//! ## Combinatorics
//!
//! Candidate simplices are enumerated with the combinatorial number system:
//! every rank N maps directly to the N-th r-combination, so parallel workers
//! each materialize a disjoint, ordered slice of "choose r of n" with no
//! communication.
//!
//! ## Output
//!
//! - Boundary table: one row per non-vertex simplex, width 2 (D + 1),
//!   padded with -1
//! - Filtration values: vertices (0.0) first, then table row order
//! - Dimensions: same order
//!
//! ## References
//!
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - Knuth, TAOCP Vol. 4A, §7.2.1.3 - Generating all combinations
//! - Zomorodian, "Fast construction of the Vietoris-Rips complex" (2010)

pub mod combinatorics;
pub mod complex;
pub mod config;
pub mod error;

// Re-exports from combinatorics
pub use combinatorics::{
    binomial,
    combination_table,
    rank,
    successor,
    unrank,
    write_combinations,
    BinomialTable,
};

// Re-exports from complex
pub use complex::{
    assemble,
    build_edges,
    build_from_facets,
    build_from_vertices,
    build_higher,
    l1_distance_matrix,
    AssembledComplex,
    BoundarySkeleton,
    SimplexLevel,
    SENTINEL,
};

pub use config::{
    CandidateSource,
    SkeletonConfig,
    SkeletonConfigBuilder,
    TieBreak,
    MAX_DIMENSION,
};
pub use error::{Result, SkeletonError};
