//! Exact travelling-salesman tours with the Held-Karp algorithm.
//!
//! This crate finds a provably optimal tour on a small complete directed
//! graph by dynamic programming over subsets of visited cities. Time is
//! O(n²·2ⁿ) and memory O(n·2ⁿ), so it is meant for instances of up to about
//! 26 cities; 32 is a hard ceiling set by the visited-set bitmask.
//!
//! ## Core idea
//! 1. Load an n×n [`DistanceMatrix`] (any [`MatrixProvider`], e.g.
//!    [`io::TextSource`]).
//! 2. [`HeldKarpSolver::solve`] fills a [`MemoTable`] of
//!    `g(city, visited set)` costs and returns the optimum.
//! 3. [`Solution::tour`] walks the same table backward to recover the
//!    ordered tour, depot (city 0) first and last.
//!
//! ## Quick start
//! ```
//! use held_karp::{io::parse_matrix, HeldKarpSolver};
//!
//! let matrix = parse_matrix("0 1 5\n1 0 2\n5 2 0\n", None).unwrap();
//! let (cost, tour) = HeldKarpSolver::new(&matrix).run().unwrap();
//! assert_eq!(cost, 8);
//! assert_eq!(tour.cities().first(), Some(&0));
//! assert_eq!(tour.cities().last(), Some(&0));
//! ```
//!
//! ## Features
//! - `parallel`: adds [`EvaluationOrder::Parallel`], filling one popcount
//!   level at a time with rayon.
//! - `tracing`: spans and events around the fill and reconstruction.
//! - `cli`: the `held-karp` and `scale_probe` binaries.
//! - `heavy`: enables the long-running 26-city regression tests.

pub mod builder;
pub mod error;
pub mod io;
pub mod matrix;
pub mod memo;
pub mod reconstruct;
pub mod solver;
pub mod traits;
pub mod utils;

pub use crate::builder::{EvaluationOrder, SolverBuilder, SolverConfig};
pub use crate::error::{Error, Result};
pub use crate::matrix::{Cost, DistanceMatrix, INFINITY};
pub use crate::memo::MemoTable;
pub use crate::reconstruct::Tour;
pub use crate::solver::{HeldKarpSolver, Solution};
pub use crate::traits::MatrixProvider;

/// Load a matrix from `provider` and solve it with the default configuration.
pub fn solve<P: MatrixProvider>(provider: &P) -> Result<(Cost, Tour)> {
    let matrix = provider.load()?;
    HeldKarpSolver::new(&matrix).run()
}
