//! Held-Karp dynamic program.
//!
//! `g(c, S)` is the cheapest path that leaves the depot, visits exactly the
//! cities of `S` and stops at `c`:
//!
//! - `g(c, {0, c}) = cost(0, c)`
//! - `g(c, S) = min over c' in S \ {0, c} of g(c', S \ {c}) + cost(c', c)`
//!
//! and the optimal tour closes the cheapest `g(c, Full) + cost(c, 0)`.
//!
//! The solver owns the memo table while filling it and hands it over in a
//! [`Solution`], from which the tour is reconstructed.

use crate::builder::{EvaluationOrder, SolverConfig};
use crate::error::{Error, Result};
use crate::matrix::{extend, Cost, DistanceMatrix, INFINITY};
use crate::memo::MemoTable;
use crate::reconstruct::{reconstruct, Tour};
use crate::utils::{
    cities, depot_masks_of_size, full_mask, without, Mask, DEPOT_BIT, MAX_SUPPORTED_CITIES,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Masks relaxed per parallel batch.
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = 1 << 14;

/// Exact TSP solver over a borrowed distance matrix.
///
/// ```
/// use held_karp::{DistanceMatrix, HeldKarpSolver};
///
/// let m = DistanceMatrix::from_rows(&[
///     vec![0, 1, 5],
///     vec![1, 0, 2],
///     vec![5, 2, 0],
/// ]).unwrap();
/// let (cost, tour) = HeldKarpSolver::new(&m).run().unwrap();
/// assert_eq!(cost, 8);
/// assert_eq!(tour.cities(), &[0, 2, 1, 0]);
/// ```
pub struct HeldKarpSolver<'m> {
    matrix: &'m DistanceMatrix,
    config: SolverConfig,
}

/// Optimum of a solve together with the filled memo table.
#[derive(Debug)]
pub struct Solution {
    cost: Cost,
    table: MemoTable,
}

impl Solution {
    /// Optimal tour cost.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn table(&self) -> &MemoTable {
        &self.table
    }

    /// Walk the table back to an optimal tour.
    ///
    /// `matrix` must be the one this solution was computed from.
    pub fn tour(&self, matrix: &DistanceMatrix) -> Result<Tour> {
        reconstruct(&self.table, matrix, self.cost)
    }
}

impl<'m> HeldKarpSolver<'m> {
    /// Solver with the default configuration.
    pub fn new(matrix: &'m DistanceMatrix) -> Self {
        Self::with_config(matrix, SolverConfig::default())
    }

    pub fn with_config(matrix: &'m DistanceMatrix, config: SolverConfig) -> Self {
        Self { matrix, config }
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        self.matrix
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve and reconstruct in one go.
    ///
    /// Returns `(optimal_cost, tour)`; the tour starts and ends at city 0.
    pub fn run(&self) -> Result<(Cost, Tour)> {
        let solution = self.solve()?;
        let tour = {
            #[cfg(feature = "tracing")]
            let span = tracing::info_span!("reconstruct");
            #[cfg(feature = "tracing")]
            let _enter = span.enter();
            solution.tour(self.matrix)?
        };
        Ok((solution.cost, tour))
    }

    /// Fill the memo table and compute the optimal tour cost.
    pub fn solve(&self) -> Result<Solution> {
        let n = self.matrix.size();
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("held_karp_solve", n, order = ?self.config.order);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        self.check_limits(n)?;
        let mut table = MemoTable::allocate(n, self.config.memory_budget)?;
        self.seed(&mut table);

        let cost = match self.config.order {
            EvaluationOrder::BottomUp => {
                self.fill_bottom_up(&mut table);
                self.close_tour(&table)
            }
            EvaluationOrder::TopDown => {
                for last in 1..n {
                    if self.matrix.is_reachable(last, 0) {
                        self.visit(&mut table, last, full_mask(n));
                    }
                }
                self.close_tour(&table)
            }
            #[cfg(feature = "parallel")]
            EvaluationOrder::Parallel => {
                self.fill_parallel(&mut table);
                self.close_tour(&table)
            }
        }?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            cost,
            filled = table.filled_count(),
            capacity = table.capacity(),
            "memo table complete"
        );

        Ok(Solution { cost, table })
    }

    fn check_limits(&self, n: usize) -> Result<()> {
        let ceiling = self.config.max_cities.min(MAX_SUPPORTED_CITIES);
        if n > ceiling {
            return Err(Error::invalid(format!(
                "{n} cities exceeds the limit of {ceiling}"
            )));
        }
        Ok(())
    }

    /// Base cases: the depot alone, and every `{0, c}` pair.
    fn seed(&self, table: &mut MemoTable) {
        table.set(0, DEPOT_BIT, 0);
        for c in 1..self.matrix.size() {
            table.set(c, DEPOT_BIT | (1 << c), self.matrix.cost(0, c));
        }
    }

    /// Best `g(c, mask)` given that every `g(_, mask \ {c})` is available
    /// through `lookup`.
    #[inline]
    fn relax<F>(&self, c: usize, mask: Mask, mut lookup: F) -> Cost
    where
        F: FnMut(usize, Mask) -> Cost,
    {
        let prev_mask = without(mask, c);
        cities(prev_mask)
            .skip(1)
            .filter(|&p| self.matrix.is_reachable(p, c))
            .filter_map(|p| extend(lookup(p, prev_mask), self.matrix.cost(p, c)))
            .min()
            .unwrap_or(INFINITY)
    }

    fn fill_bottom_up(&self, table: &mut MemoTable) {
        let n = self.matrix.size();
        for size in 3..=n {
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("fill_level", size);
            #[cfg(feature = "tracing")]
            let _enter = span.enter();
            for mask in depot_masks_of_size(n, size) {
                for c in cities(mask).skip(1) {
                    let best = self.relax(c, mask, |p, m| table.get(p, m).unwrap_or(INFINITY));
                    table.set(c, mask, best);
                }
            }
        }
    }

    /// Recursive fill from `(c, mask)`; depth is bounded by the city count.
    fn visit(&self, table: &mut MemoTable, c: usize, mask: Mask) -> Cost {
        if let Some(cost) = table.get(c, mask) {
            return cost;
        }
        let best = self.relax(c, mask, |p, m| self.visit(table, p, m));
        table.set(c, mask, best);
        best
    }

    #[cfg(feature = "parallel")]
    fn fill_parallel(&self, table: &mut MemoTable) {
        self.fill_parallel_chunked(table, PARALLEL_CHUNK);
    }

    /// Level-synchronous fill. Each level is cut into batches of `chunk`
    /// masks; a batch is relaxed in parallel and written back before the
    /// next one starts, so at most `chunk` rows are buffered at a time.
    #[cfg(feature = "parallel")]
    fn fill_parallel_chunked(&self, table: &mut MemoTable, chunk: usize) {
        let n = self.matrix.size();
        let mut batch: Vec<Mask> = Vec::with_capacity(chunk);
        for size in 3..=n {
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("fill_level_parallel", size);
            #[cfg(feature = "tracing")]
            let _enter = span.enter();

            // Level `size` only reads level `size - 1`, which is complete.
            let mut level = depot_masks_of_size(n, size);
            loop {
                batch.clear();
                batch.extend(level.by_ref().take(chunk));
                if batch.is_empty() {
                    break;
                }
                let snapshot = &*table;
                let rows: Vec<(Mask, Vec<(usize, Cost)>)> = batch
                    .par_iter()
                    .map(|&mask| {
                        let row = cities(mask)
                            .skip(1)
                            .map(|c| {
                                let best = self.relax(c, mask, |p, m| {
                                    snapshot.get(p, m).unwrap_or(INFINITY)
                                });
                                (c, best)
                            })
                            .collect();
                        (mask, row)
                    })
                    .collect();
                for (mask, row) in rows {
                    for (c, best) in row {
                        table.set(c, mask, best);
                    }
                }
            }
        }
    }

    fn close_tour(&self, table: &MemoTable) -> Result<Cost> {
        let n = self.matrix.size();
        if n == 1 {
            return Ok(0);
        }
        let full = full_mask(n);
        (1..n)
            .filter_map(|last| extend(table.get(last, full)?, self.matrix.cost(last, 0)))
            .min()
            .ok_or(Error::NoTour)
    }
}
