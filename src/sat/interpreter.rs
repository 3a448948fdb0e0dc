//! Mapping solver models back to boards

use super::VariableIndexer;
use crate::board::{Board, Cell, Color};
use crate::error::{PeaceError, PeaceResult};
use std::collections::HashMap;

/// Turns a satisfying assignment into a placement of both armies
#[derive(Debug, Clone, Copy)]
pub struct ModelInterpreter {
    indexer: VariableIndexer,
    k: usize,
}

impl ModelInterpreter {
    pub fn new(indexer: VariableIndexer, k: usize) -> Self {
        Self { indexer, k }
    }

    /// Color every cell whose placement variable is true
    ///
    /// Auxiliary ids are ignored. Fails with [`PeaceError::InconsistentModel`]
    /// when a cell holds both colors or an army does not have exactly k queens.
    pub fn interpret(&self, assignment: &HashMap<i32, bool>) -> PeaceResult<Board> {
        let mut board = Board::new(self.indexer.size());

        let mut true_ids: Vec<i32> = assignment
            .iter()
            .filter(|&(_, &value)| value)
            .map(|(&id, _)| id)
            .collect();
        true_ids.sort_unstable();

        for id in true_ids {
            let Some(placement) = self.indexer.decode(id) else {
                continue;
            };

            match board.get(placement.row, placement.column) {
                Cell::Empty => board.set(placement.row, placement.column, Cell::Queen(placement.color))?,
                Cell::Queen(_) => {
                    return Err(PeaceError::InconsistentModel(format!(
                        "cell ({}, {}) holds both colors",
                        placement.row, placement.column
                    )))
                }
            }
        }

        for color in Color::ALL {
            let count = board.count(color);
            if count != self.k {
                return Err(PeaceError::InconsistentModel(format!(
                    "{} {:?} queens placed, expected {}",
                    count, color, self.k
                )));
            }
        }

        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment_of(ids: &[i32], total: i32) -> HashMap<i32, bool> {
        (1..=total).map(|id| (id, ids.contains(&id))).collect()
    }

    #[test]
    fn test_interpret_valid_model() {
        let indexer = VariableIndexer::new(3);
        let white = indexer.id_of(Color::White, 0, 0).unwrap();
        let black = indexer.id_of(Color::Black, 1, 2).unwrap();
        // 19 and 20 stand in for auxiliary variables and must be skipped
        let assignment = assignment_of(&[white, black, 19, 20], 20);

        let board = ModelInterpreter::new(indexer, 1).interpret(&assignment).unwrap();
        assert_eq!(board.get(0, 0), Cell::Queen(Color::White));
        assert_eq!(board.get(1, 2), Cell::Queen(Color::Black));
        assert_eq!(board.count(Color::White), 1);
        assert_eq!(board.count(Color::Black), 1);
    }

    #[test]
    fn test_interpret_rejects_shared_cell() {
        let indexer = VariableIndexer::new(2);
        let white = indexer.id_of(Color::White, 1, 1).unwrap();
        let black = indexer.id_of(Color::Black, 1, 1).unwrap();
        let assignment = assignment_of(&[white, black], 8);

        let result = ModelInterpreter::new(indexer, 1).interpret(&assignment);
        assert!(matches!(result, Err(PeaceError::InconsistentModel(_))));
    }

    #[test]
    fn test_interpret_rejects_wrong_count() {
        let indexer = VariableIndexer::new(3);
        let white = indexer.id_of(Color::White, 0, 0).unwrap();
        let assignment = assignment_of(&[white], 18);

        let result = ModelInterpreter::new(indexer, 1).interpret(&assignment);
        assert!(matches!(result, Err(PeaceError::InconsistentModel(_))));
    }

    #[test]
    fn test_interpret_empty_model() {
        let indexer = VariableIndexer::new(4);
        let board = ModelInterpreter::new(indexer, 0)
            .interpret(&HashMap::new())
            .unwrap();
        assert!(board.is_empty());
    }
}
