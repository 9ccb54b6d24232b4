#![warn(missing_docs)]

//! # `gridpair`
//!
//! An exact solver for the minimum-score pairing of cells on a colored, valued rectangular
//! grid. Adjacent, color-compatible cells may be paired; a pair costs the absolute
//! difference of its two values, and every non-black cell left unpaired costs its own value.
//! Build a [`Grid`] with [`Grid::new`] or parse one from the text format with [`parse_grid`],
//! then call [`solve`] for a provably optimal pairing, or [`solve_naive`] for the greedy
//! baseline it is measured against.
//!
//! # Internals
//! The score objective is first rewritten: with C the (constant) sum of values over
//! non-black cells, the score of a matching equals C minus the total "gain"
//! `2 * min(value(u), value(v))` of its pairs, so minimizing the score means maximizing the
//! matched gain. Since every orthogonal step flips the parity of `i + j`, the grid adjacency
//! graph is bipartite, and the maximum-gain matching reduces to
//! [minimum-cost flow](https://en.wikipedia.org/wiki/Minimum-cost_flow_problem) over a
//! unit-capacity network with negated gains as arc costs. The flow is computed by successive
//! shortest augmenting paths with a Bellman-Ford subroutine, which tolerates the negative
//! costs; see [`solve`] for the full write-up.

pub use cell::CellColor;
pub use error::{GridInvalidReason, ParseError, SolverFailure};
pub use grid::Grid;
pub use location::Location;
pub use parse::parse_grid;
pub use solver::{solve, solve_naive, Solution};

pub(crate) mod cell;
pub(crate) mod error;
pub(crate) mod grid;
pub(crate) mod location;
pub(crate) mod network;
pub(crate) mod parse;
pub(crate) mod solver;
mod tests;
