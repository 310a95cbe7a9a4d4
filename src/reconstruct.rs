//! Tour reconstruction from a filled memo table.
//!
//! The walk starts at the depot with the full visited set and the optimal
//! cost still to account for. At each step it looks for the city `i` that was
//! visited just before `prev`: the one whose `g(i, mask) + cost(i, prev)`
//! equals the remaining cost. Cities are discovered last-to-first and
//! reversed at the end.
//!
//! Ties are broken towards the lowest city index, so the reported tour is
//! reproducible. The total cost is the same whichever optimal tour is chosen.

use std::fmt;

use crate::error::{Error, Result};
use crate::matrix::{extend, Cost, DistanceMatrix};
use crate::memo::MemoTable;
use crate::utils::{cities, full_mask, without, DEPOT_BIT};

/// Closed tour starting and ending at the depot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tour {
    cities: Vec<usize>,
    cost: Cost,
}

impl Tour {
    /// City sequence, depot first and last (`n + 1` entries).
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    pub fn into_cities(self) -> Vec<usize> {
        self.cities
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Same cycle traversed in the opposite direction. Only optimal when the
    /// matrix is symmetric.
    pub fn reversed(&self) -> Tour {
        let cities: Vec<usize> = self.cities.iter().rev().copied().collect();
        Tour {
            cities,
            cost: self.cost,
        }
    }

    /// Sum of edge costs along the sequence under `matrix`, or `None` if an
    /// edge is unreachable.
    pub fn edge_cost(&self, matrix: &DistanceMatrix) -> Option<Cost> {
        self.cities
            .windows(2)
            .try_fold(0, |acc, w| extend(acc, matrix.cost(w[0], w[1])))
    }

    /// Check that this is a Hamiltonian cycle through the depot whose edges
    /// sum to the recorded cost.
    pub fn verify(&self, matrix: &DistanceMatrix) -> Result<()> {
        let n = matrix.size();
        let inconsistent = |msg: String| Err(Error::InconsistentState(msg));
        if self.cities.len() != n + 1 {
            return inconsistent(format!(
                "tour has {} stops, expected {}",
                self.cities.len(),
                n + 1
            ));
        }
        if self.cities.first() != Some(&0) || self.cities.last() != Some(&0) {
            return inconsistent("tour must start and end at the depot".into());
        }
        if n == 1 {
            return Ok(());
        }
        let mut seen = vec![false; n];
        for &c in &self.cities[..n] {
            if c >= n || std::mem::replace(&mut seen[c], true) {
                return inconsistent(format!("city {c} is out of range or repeated"));
            }
        }
        match self.edge_cost(matrix) {
            Some(total) if total == self.cost => Ok(()),
            Some(total) => inconsistent(format!(
                "edges sum to {total}, tour records {}",
                self.cost
            )),
            None => inconsistent("tour uses an unreachable edge".into()),
        }
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.cities.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Recover an optimal tour of cost `optimum` from `table`.
///
/// `table` must have been filled by a solve over `matrix`. Cells that were
/// never computed are not considered as predecessors.
pub fn reconstruct(table: &MemoTable, matrix: &DistanceMatrix, optimum: Cost) -> Result<Tour> {
    let n = matrix.size();
    if table.size() != n {
        return Err(Error::InconsistentState(format!(
            "memo table sized for {} cities, matrix has {n}",
            table.size()
        )));
    }
    if n == 1 {
        return Ok(Tour {
            cities: vec![0, 0],
            cost: 0,
        });
    }

    let mut mask = full_mask(n);
    let mut prev = 0usize;
    let mut remaining = optimum;
    let mut backward = Vec::with_capacity(n + 1);
    backward.push(0);

    while mask != DEPOT_BIT {
        let (city, g) = cities(mask)
            .skip(1)
            .filter_map(|i| table.get(i, mask).map(|g| (i, g)))
            .find(|&(i, g)| extend(g, matrix.cost(i, prev)) == Some(remaining))
            .ok_or_else(|| {
                Error::InconsistentState(format!(
                    "no predecessor of city {prev} in set {mask:#b} accounts for cost {remaining}"
                ))
            })?;
        backward.push(city);
        prev = city;
        remaining = g;
        mask = without(mask, city);
    }

    if matrix.cost(0, prev) != remaining {
        return Err(Error::InconsistentState(format!(
            "first leg 0 -> {prev} costs {}, table expects {remaining}",
            matrix.cost(0, prev)
        )));
    }

    backward.push(0);
    backward.reverse();
    Ok(Tour {
        cities: backward,
        cost: optimum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeldKarpSolver;

    fn square() -> DistanceMatrix {
        // 0-1-2-3 around a unit square, diagonals cost 10.
        DistanceMatrix::from_rows(&[
            vec![0, 1, 10, 1],
            vec![1, 0, 1, 10],
            vec![10, 1, 0, 1],
            vec![1, 10, 1, 0],
        ])
        .unwrap()
    }

    #[test]
    fn lowest_index_breaks_ties() {
        // Both directions around the square cost 4; the backward walk picks
        // city 1 as the last stop first.
        let m = square();
        let (cost, tour) = HeldKarpSolver::new(&m).run().unwrap();
        assert_eq!(cost, 4);
        assert_eq!(tour.cities(), &[0, 3, 2, 1, 0]);
        tour.verify(&m).unwrap();
        tour.reversed().verify(&m).unwrap();
    }

    #[test]
    fn display_uses_arrows() {
        let m = square();
        let (_, tour) = HeldKarpSolver::new(&m).run().unwrap();
        assert_eq!(tour.to_string(), "0 -> 3 -> 2 -> 1 -> 0");
    }

    #[test]
    fn wrong_optimum_is_inconsistent() {
        let m = square();
        let solution = HeldKarpSolver::new(&m).solve().unwrap();
        assert!(matches!(
            reconstruct(solution.table(), &m, 5),
            Err(Error::InconsistentState(_))
        ));
    }

    #[test]
    fn empty_table_is_inconsistent() {
        let m = square();
        let table = MemoTable::allocate(4, None).unwrap();
        let err = reconstruct(&table, &m, 4).unwrap_err();
        assert!(err.to_string().contains("no predecessor"));
    }

    #[test]
    fn mismatched_table_size() {
        let m = square();
        let table = MemoTable::allocate(3, None).unwrap();
        assert!(matches!(
            reconstruct(&table, &m, 4),
            Err(Error::InconsistentState(_))
        ));
    }

    #[test]
    fn verify_rejects_bad_tours() {
        let m = square();
        let repeated = Tour {
            cities: vec![0, 1, 1, 2, 0],
            cost: 4,
        };
        assert!(repeated.verify(&m).is_err());
        let short = Tour {
            cities: vec![0, 1, 2, 0],
            cost: 2,
        };
        assert!(short.verify(&m).is_err());
        let wrong_cost = Tour {
            cities: vec![0, 1, 2, 3, 0],
            cost: 5,
        };
        assert!(wrong_cost.verify(&m).is_err());
        assert_eq!(wrong_cost.edge_cost(&m), Some(4));
    }
}
