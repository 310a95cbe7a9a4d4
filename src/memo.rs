//! Arena-style memo table indexed by `(city, visited-set)`.
//!
//! Only visited sets containing the depot are ever stored, so the table keeps
//! `n × 2^(n-1)` cells addressed by `mask >> 1`, city-major. Every cell has a
//! validity bit next to its value: a computed cost of zero and a cell that was
//! never written are distinct states.

use std::collections::TryReserveError;

use crate::error::{Error, Result};
use crate::matrix::{Cost, INFINITY};
use crate::utils::{table_bytes, Mask, DEPOT_BIT, MAX_SUPPORTED_CITIES};

/// Owned `(city, mask) → cost` table produced by one solve.
#[derive(Clone, Debug)]
pub struct MemoTable {
    n: usize,
    stride: usize,
    values: Vec<Cost>,
    filled: Vec<u64>,
}

impl MemoTable {
    /// Allocate an empty table for `n` cities.
    ///
    /// Fails with [`Error::ResourceExhausted`] if the table would exceed
    /// `budget` bytes or the allocator refuses it.
    pub fn allocate(n: usize, budget: Option<usize>) -> Result<Self> {
        if n == 0 || n > MAX_SUPPORTED_CITIES {
            return Err(Error::invalid(format!(
                "memo table supports 1..={MAX_SUPPORTED_CITIES} cities, got {n}"
            )));
        }
        let requested_bytes = table_bytes(n).ok_or(Error::ResourceExhausted {
            requested_bytes: usize::MAX,
        })?;
        if budget.is_some_and(|limit| requested_bytes > limit) {
            return Err(Error::ResourceExhausted { requested_bytes });
        }

        let stride = 1usize << (n - 1);
        let cells = n * stride;
        let exhausted = |_: TryReserveError| Error::ResourceExhausted { requested_bytes };

        let mut values = Vec::new();
        values.try_reserve_exact(cells).map_err(exhausted)?;
        values.resize(cells, INFINITY);

        let words = cells.div_ceil(64);
        let mut filled = Vec::new();
        filled.try_reserve_exact(words).map_err(exhausted)?;
        filled.resize(words, 0);

        Ok(Self {
            n,
            stride,
            values,
            filled,
        })
    }

    /// Cell index for `(city, mask)`, or `None` if the pair is not one the
    /// table stores: the mask lacks the depot or names cities past `n`.
    #[inline]
    fn slot(&self, city: usize, mask: Mask) -> Option<usize> {
        let column = (mask >> 1) as usize;
        (city < self.n && mask & DEPOT_BIT != 0 && column < self.stride)
            .then_some(city * self.stride + column)
    }

    /// Number of cities the table was sized for.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Computed cost for `(city, mask)`, or `None` if never written or not
    /// a stored state. A computed value may be [`INFINITY`].
    #[inline]
    pub fn get(&self, city: usize, mask: Mask) -> Option<Cost> {
        let slot = self.slot(city, mask)?;
        (self.filled[slot / 64] & (1 << (slot % 64)) != 0).then(|| self.values[slot])
    }

    #[inline]
    pub fn is_filled(&self, city: usize, mask: Mask) -> bool {
        self.get(city, mask).is_some()
    }

    /// Record the cost for `(city, mask)`.
    ///
    /// # Panics
    ///
    /// If `city` is out of range or `mask` lacks the depot or names a city
    /// past the table size.
    #[inline]
    pub fn set(&mut self, city: usize, mask: Mask, cost: Cost) {
        let Some(slot) = self.slot(city, mask) else {
            panic!("({city}, {mask:#b}) is not a state of a {}-city table", self.n);
        };
        self.values[slot] = cost;
        self.filled[slot / 64] |= 1 << (slot % 64);
    }

    /// Number of computed cells.
    pub fn filled_count(&self) -> usize {
        self.filled.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Total number of addressable cells.
    pub fn capacity(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cost_is_not_unset() {
        let mut t = MemoTable::allocate(3, None).unwrap();
        assert_eq!(t.get(1, 0b011), None);
        t.set(1, 0b011, 0);
        assert_eq!(t.get(1, 0b011), Some(0));
        assert!(t.is_filled(1, 0b011));
        // Neighbouring cells are untouched.
        assert_eq!(t.get(2, 0b011), None);
        assert_eq!(t.get(1, 0b111), None);
        assert_eq!(t.filled_count(), 1);
    }

    #[test]
    fn infinity_is_a_computed_value() {
        let mut t = MemoTable::allocate(2, None).unwrap();
        t.set(1, 0b11, INFINITY);
        assert_eq!(t.get(1, 0b11), Some(INFINITY));
    }

    #[test]
    fn layout_covers_all_depot_masks() {
        let n = 5;
        let mut t = MemoTable::allocate(n, None).unwrap();
        assert_eq!(t.capacity(), n << (n - 1));
        let mut written = 0;
        for city in 0..n {
            for mask in (1..=0b11111u32).step_by(2) {
                t.set(city, mask, (city as u32) * 100 + mask);
                written += 1;
            }
        }
        assert_eq!(t.filled_count(), written);
        assert_eq!(t.get(3, 0b10101), Some(321));
    }

    #[test]
    fn masks_outside_the_table_are_not_states() {
        let mut t = MemoTable::allocate(3, None).unwrap();
        t.set(1, 0b011, 5);
        t.set(2, 0b001, 9);
        // 0b010 would share a cell with 0b011 if the depot bit were ignored.
        assert_eq!(t.get(1, 0b010), None);
        // 0b1001 names city 3 and would land in city 2's row.
        assert_eq!(t.get(1, 0b1001), None);
        assert_eq!(t.get(3, 0b011), None);
        assert!(!t.is_filled(1, 0b010));
    }

    #[test]
    #[should_panic(expected = "is not a state")]
    fn writing_a_mask_without_the_depot_panics() {
        let mut t = MemoTable::allocate(3, None).unwrap();
        t.set(1, 0b110, 0);
    }

    #[test]
    fn budget_is_enforced() {
        let need = table_bytes(10).unwrap();
        assert!(MemoTable::allocate(10, Some(need)).is_ok());
        match MemoTable::allocate(10, Some(need - 1)) {
            Err(Error::ResourceExhausted { requested_bytes }) => {
                assert_eq!(requested_bytes, need)
            }
            other => panic!("expected ResourceExhausted, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        assert!(matches!(
            MemoTable::allocate(0, None),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            MemoTable::allocate(33, None),
            Err(Error::InvalidInput(_))
        ));
    }
}
