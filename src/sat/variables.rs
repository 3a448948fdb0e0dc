//! Variable management for SAT encoding

use crate::board::Color;
use crate::error::{PeaceError, PeaceResult};

/// A queen placement: color plus cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub color: Color,
    pub row: usize,
    pub column: usize,
}

/// Bijection between queen placements and SAT variable ids
///
/// Ids are dense in `[1, 2n²]`, color-major, then row-major: white queens
/// occupy `1..=n²` and black queens `n²+1..=2n²`. The indexer is immutable once
/// built; auxiliary variables are handed out by a [`VariableAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableIndexer {
    size: usize,
}

impl VariableIndexer {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Board size n
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells on the board
    pub fn cells(&self) -> usize {
        self.size * self.size
    }

    /// Number of placement variables, 2n²
    pub fn placement_count(&self) -> usize {
        2 * self.cells()
    }

    /// Get the variable id for a queen of `color` on `(row, column)`
    pub fn id_of(&self, color: Color, row: usize, column: usize) -> PeaceResult<i32> {
        if row >= self.size || column >= self.size {
            return Err(PeaceError::OutOfRange {
                row,
                column,
                n: self.size,
            });
        }

        let color_offset = match color {
            Color::White => 0,
            Color::Black => self.cells(),
        };
        Ok((color_offset + row * self.size + column + 1) as i32)
    }

    /// Recover the placement behind a variable id
    ///
    /// Returns `None` for ids outside `[1, 2n²]`, i.e. auxiliary variables.
    pub fn decode(&self, id: i32) -> Option<Placement> {
        if id < 1 || id as usize > self.placement_count() {
            return None;
        }

        let index = id as usize - 1;
        let cells = self.cells();
        let (color, cell) = if index < cells {
            (Color::White, index)
        } else {
            (Color::Black, index - cells)
        };

        Some(Placement {
            color,
            row: cell / self.size,
            column: cell % self.size,
        })
    }

    /// All placement variables of one color, row-major
    pub fn color_variables(&self, color: Color) -> Vec<i32> {
        let first = match color {
            Color::White => 1,
            Color::Black => self.cells() + 1,
        };
        (first..first + self.cells()).map(|id| id as i32).collect()
    }

    /// Allocator for auxiliary variables, starting just past the placement ids
    pub fn allocator(&self) -> VariableAllocator {
        VariableAllocator::new(self.placement_count())
    }
}

/// Hands out fresh variable ids above a reserved range
#[derive(Debug, Clone)]
pub struct VariableAllocator {
    reserved: usize,
    next_id: i32,
}

impl VariableAllocator {
    /// Create an allocator whose first fresh id is `reserved + 1`
    pub fn new(reserved: usize) -> Self {
        Self {
            reserved,
            next_id: reserved as i32 + 1,
        }
    }

    /// Allocate a fresh variable id
    pub fn fresh(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Highest id handed out so far (or the reserved range if none)
    pub fn variable_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    /// Number of fresh ids allocated
    pub fn allocated(&self) -> usize {
        self.variable_count() - self.reserved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_numbering() {
        let indexer = VariableIndexer::new(3);

        assert_eq!(indexer.id_of(Color::White, 0, 0).unwrap(), 1);
        assert_eq!(indexer.id_of(Color::White, 1, 2).unwrap(), 6);
        assert_eq!(indexer.id_of(Color::White, 2, 2).unwrap(), 9);
        assert_eq!(indexer.id_of(Color::Black, 0, 0).unwrap(), 10);
        assert_eq!(indexer.id_of(Color::Black, 2, 2).unwrap(), 18);
    }

    #[test]
    fn test_variable_bounds() {
        let indexer = VariableIndexer::new(2);

        assert!(indexer.id_of(Color::White, 1, 1).is_ok());
        assert!(matches!(
            indexer.id_of(Color::White, 2, 0),
            Err(PeaceError::OutOfRange { row: 2, column: 0, n: 2 })
        ));
        assert!(indexer.id_of(Color::Black, 0, 2).is_err());
    }

    #[test]
    fn test_decode_rejects_auxiliary_ids() {
        let indexer = VariableIndexer::new(2);
        assert_eq!(indexer.decode(0), None);
        assert_eq!(indexer.decode(-3), None);
        assert_eq!(indexer.decode(9), None);
        assert!(indexer.decode(8).is_some());
    }

    #[test]
    fn test_color_variables() {
        let indexer = VariableIndexer::new(2);
        assert_eq!(indexer.color_variables(Color::White), vec![1, 2, 3, 4]);
        assert_eq!(indexer.color_variables(Color::Black), vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_allocator() {
        let indexer = VariableIndexer::new(2);
        let mut allocator = indexer.allocator();

        assert_eq!(allocator.variable_count(), 8);
        assert_eq!(allocator.fresh(), 9);
        assert_eq!(allocator.fresh(), 10);
        assert_eq!(allocator.variable_count(), 10);
        assert_eq!(allocator.allocated(), 2);
    }

    proptest! {
        #[test]
        fn prop_indexing_is_a_bijection(
            (n, row, column) in (1usize..12).prop_flat_map(|n| (Just(n), 0..n, 0..n)),
            white in any::<bool>(),
        ) {
            let indexer = VariableIndexer::new(n);
            let color = if white { Color::White } else { Color::Black };

            let id = indexer.id_of(color, row, column).unwrap();
            prop_assert!(id >= 1 && id as usize <= 2 * n * n);
            prop_assert_eq!(indexer.decode(id), Some(Placement { color, row, column }));
        }
    }
}
