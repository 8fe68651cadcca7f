//! Combinatorics Module: Exact Combination Enumeration
//!
//! Building blocks for materializing "choose r of n" in parallel:
//! - Binomial coefficient table (exact u64 arithmetic)
//! - Combinatorial number system codec (`unrank`, `successor`, `rank`)
//! - Partitioned combination table writer
//!
//! ## Enumeration Order
//!
//! Combinations are stored most significant digit first, as strictly
//! decreasing tuples. Rank N is the N-th such tuple in lexicographic order,
//! so any worker can start at an arbitrary rank and walk forward.

mod binomial;
mod codec;
mod writer;

pub use binomial::{binomial, BinomialTable};
pub use codec::{rank, successor, unrank};
pub use writer::{combination_table, write_combinations};

pub(crate) use codec::rank_unchecked;
pub(crate) use writer::check_candidate_count;
