//! Validated n×n distance matrix.
//!
//! Costs are non-negative `u32` values; [`INFINITY`] marks a missing edge.
//! Construction rejects any instance whose finite costs could add up to the
//! marker along a tour, which keeps [`INFINITY`] strictly above every
//! achievable path cost.

use crate::error::{Error, Result};

/// Cost of an edge or a (partial) tour.
pub type Cost = u32;

/// Unreachable marker, shared by the matrix and the memo table.
pub const INFINITY: Cost = Cost::MAX;

/// Extend a partial path cost by one edge. `None` if either side is
/// unreachable.
#[inline]
pub(crate) fn extend(path: Cost, edge: Cost) -> Option<Cost> {
    if path == INFINITY || edge == INFINITY {
        return None;
    }
    path.checked_add(edge).filter(|&total| total != INFINITY)
}

/// Row-major travel-cost table. Not necessarily symmetric; the diagonal is
/// never read by the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceMatrix {
    n: usize,
    costs: Vec<Cost>,
}

impl DistanceMatrix {
    /// Wrap a row-major buffer of `n * n` costs.
    pub fn new(n: usize, costs: Vec<Cost>) -> Result<Self> {
        if n == 0 {
            return Err(Error::invalid("matrix must contain at least one city"));
        }
        let expected = n
            .checked_mul(n)
            .ok_or_else(|| Error::invalid(format!("dimension {n} overflows")))?;
        if costs.len() != expected {
            return Err(Error::invalid(format!(
                "expected {expected} entries for a {n}x{n} matrix, got {}",
                costs.len()
            )));
        }

        let max_edge = costs
            .iter()
            .enumerate()
            .filter(|&(idx, &c)| idx / n != idx % n && c != INFINITY)
            .map(|(_, &c)| u64::from(c))
            .max()
            .unwrap_or(0);
        // A tour has n edges; every partial sum must stay below the marker.
        if max_edge.saturating_mul(n as u64) >= u64::from(INFINITY) {
            return Err(Error::invalid(format!(
                "edge cost {max_edge} is too large for {n} cities"
            )));
        }

        Ok(Self { n, costs })
    }

    /// Build from square rows of signed costs. Negative entries are rejected;
    /// use [`from_entries`](Self::from_entries) to mark unreachable edges.
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self> {
        let entries: Vec<Vec<Option<i64>>> = rows
            .iter()
            .map(|row| row.iter().copied().map(Some).collect())
            .collect();
        Self::from_entries(&entries)
    }

    /// Build from square rows of unsigned costs; [`INFINITY`] marks an
    /// unreachable edge.
    pub fn from_rows_u32(rows: &[Vec<Cost>]) -> Result<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(Error::invalid(format!(
                "row {i} has {} entries, expected {n}",
                row.len()
            )));
        }
        Self::new(n, rows.concat())
    }

    /// Build from square rows where `None` marks an unreachable edge.
    pub fn from_entries(rows: &[Vec<Option<i64>>]) -> Result<Self> {
        let n = rows.len();
        let mut costs = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::invalid(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            for (j, entry) in row.iter().enumerate() {
                costs.push(match *entry {
                    None => INFINITY,
                    Some(v) if v < 0 => {
                        return Err(Error::invalid(format!(
                            "negative cost {v} at row {i}, column {j}"
                        )))
                    }
                    Some(v) => Cost::try_from(v)
                        .ok()
                        .filter(|&c| c != INFINITY)
                        .ok_or_else(|| {
                            Error::invalid(format!("cost {v} at row {i}, column {j} is too large"))
                        })?,
                });
            }
        }
        Self::new(n, costs)
    }

    /// Number of cities.
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Direct cost from `from` to `to`, or [`INFINITY`].
    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> Cost {
        self.costs[from * self.n + to]
    }

    #[inline]
    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.cost(from, to) != INFINITY
    }

    /// Outgoing costs of city `i`.
    pub fn row(&self, i: usize) -> &[Cost] {
        &self.costs[i * self.n..(i + 1) * self.n]
    }

    pub fn as_slice(&self) -> &[Cost] {
        &self.costs
    }

    /// True if `cost(i, j) == cost(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.cost(i, j) == self.cost(j, i)))
    }
}
