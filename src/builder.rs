//! Solver configuration.

use crate::matrix::DistanceMatrix;
use crate::solver::HeldKarpSolver;

/// Default ceiling on instance size. At 26 cities the memo table is already
/// around 3.5 GB.
pub const DEFAULT_MAX_CITIES: usize = 26;

/// Order in which the memo table is filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EvaluationOrder {
    /// Iterate visited sets by increasing popcount.
    #[default]
    BottomUp,
    /// Recursive memoization from the full set; only reachable states are
    /// computed.
    TopDown,
    /// Popcount levels computed concurrently with rayon, one level at a time.
    #[cfg(feature = "parallel")]
    Parallel,
}

/// Limits and strategy for a solve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Largest accepted city count.
    pub max_cities: usize,
    /// Upper bound on memo table size in bytes, if any.
    pub memory_budget: Option<usize>,
    pub order: EvaluationOrder,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_cities: DEFAULT_MAX_CITIES,
            memory_budget: None,
            order: EvaluationOrder::default(),
        }
    }
}

pub struct SolverBuilder {
    config: SolverConfig,
}

impl Default for SolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }
    pub fn with_max_cities(mut self, max_cities: usize) -> Self {
        self.config.max_cities = max_cities;
        self
    }
    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.config.memory_budget = Some(bytes);
        self
    }
    pub fn with_order(mut self, order: EvaluationOrder) -> Self {
        self.config.order = order;
        self
    }
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
    pub fn build(self, matrix: &DistanceMatrix) -> HeldKarpSolver<'_> {
        HeldKarpSolver::with_config(matrix, self.config)
    }
}
