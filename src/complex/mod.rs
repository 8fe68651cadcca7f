//! Complex Module: Filtered Simplicial Complex Construction
//!
//! Builds the input of a boundary matrix reduction from a point cloud:
//! - Dimension 1: all vertex pairs within the ball radius (L1 distance)
//! - Dimension d ≥ 2: simplices whose facets all survived, born at the
//!   largest facet value
//! - Assembly: one global id space, one filtration order, one boundary table
//!
//! ## Ordering Guarantee
//!
//! In the assembled complex every simplex comes strictly after each of its
//! facets and filtration values never decrease, so a column reduction over
//! the boundary table in row order is a valid persistence computation.

mod assembler;
mod edges;
mod higher;
mod level;
mod skeleton;

pub use assembler::{
    assemble, augment, validate_augmentation, verify_ordering, AssembledComplex, SENTINEL,
};
pub use edges::{build_edges, l1_distance_matrix};
pub use higher::{build_from_facets, build_from_vertices, build_higher};
pub use level::SimplexLevel;
pub use skeleton::BoundarySkeleton;
