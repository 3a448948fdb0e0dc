//! Independent checks that a board is a peaceful placement

use crate::board::{attacks, Board, Color};
use crate::error::{PeaceError, PeaceResult};
use itertools::iproduct;
use tracing::warn;

/// Validates boards against the peaceable queens rules, without the encoding
#[derive(Debug, Clone, Copy)]
pub struct SolutionValidator {
    k: usize,
}

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub details: ValidationDetails,
}

/// Detailed validation information
#[derive(Debug, Clone, Default)]
pub struct ValidationDetails {
    pub white_count: usize,
    pub black_count: usize,
    pub violations: Vec<AttackViolation>,
}

/// A white and a black queen that see each other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackViolation {
    pub white: (usize, usize),
    pub black: (usize, usize),
}

impl SolutionValidator {
    /// Create a validator expecting `k` queens per army
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Check army sizes and that no opposing pair shares a line
    pub fn validate(&self, board: &Board) -> ValidationResult {
        let white = board.positions(Color::White);
        let black = board.positions(Color::Black);

        let violations: Vec<AttackViolation> = iproduct!(&white, &black)
            .filter(|&(&w, &b)| attacks(w, b))
            .map(|(&white, &black)| AttackViolation { white, black })
            .collect();

        let details = ValidationDetails {
            white_count: white.len(),
            black_count: black.len(),
            violations,
        };

        let is_valid = details.white_count == self.k
            && details.black_count == self.k
            && details.violations.is_empty();
        let error_message = if is_valid {
            None
        } else {
            Some(self.generate_error_message(&details))
        };

        ValidationResult {
            is_valid,
            error_message,
            details,
        }
    }

    /// Like [`validate`](Self::validate), but an invalid board is an error
    pub fn require_valid(&self, board: &Board) -> PeaceResult<()> {
        let result = self.validate(board);
        match result.error_message {
            None => Ok(()),
            Some(message) => {
                warn!(%message, "board failed validation");
                Err(PeaceError::InconsistentModel(message))
            }
        }
    }

    /// Generate a descriptive error message from validation details
    fn generate_error_message(&self, details: &ValidationDetails) -> String {
        let mut message = String::new();

        if details.white_count != self.k {
            message.push_str(&format!(
                "Expected {} white queens, found {}. ",
                self.k, details.white_count
            ));
        }
        if details.black_count != self.k {
            message.push_str(&format!(
                "Expected {} black queens, found {}. ",
                self.k, details.black_count
            ));
        }

        if !details.violations.is_empty() {
            message.push_str(&format!("Found {} attacking pairs. ", details.violations.len()));
            for (i, violation) in details.violations.iter().take(3).enumerate() {
                if i == 0 {
                    message.push_str("Examples: ");
                }
                message.push_str(&format!(
                    "W{:?} attacks B{:?}; ",
                    violation.white, violation.black
                ));
            }
            if details.violations.len() > 3 {
                message.push_str(&format!("... and {} more", details.violations.len() - 3));
            }
        }

        message.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_board_from_string;

    #[test]
    fn test_valid_board() {
        let board = parse_board_from_string("W . . .\nW . . .\n. . . B\n. . B .\n").unwrap();
        // (1,0) and (3,2) share a diagonal
        assert!(!SolutionValidator::new(2).validate(&board).is_valid);

        let board = parse_board_from_string("W W . .\n. . . .\n. . . B\n. . . B\n").unwrap();
        let result = SolutionValidator::new(2).validate(&board);
        assert!(!result.is_valid);
        assert_eq!(result.details.violations.len(), 2);

        let board = parse_board_from_string("W . . .\n. . . B\n. . . .\n. . . .\n").unwrap();
        let result = SolutionValidator::new(1).validate(&board);
        assert!(result.is_valid, "{:?}", result.error_message);
        assert!(SolutionValidator::new(1).require_valid(&board).is_ok());
    }

    #[test]
    fn test_wrong_army_size() {
        let board = parse_board_from_string("W .\n. .\n").unwrap();
        let result = SolutionValidator::new(1).validate(&board);

        assert!(!result.is_valid);
        assert_eq!(result.details.white_count, 1);
        assert_eq!(result.details.black_count, 0);
        assert!(result.error_message.unwrap().contains("black"));
    }

    #[test]
    fn test_attack_reported_as_inconsistent_model() {
        let board = parse_board_from_string("W B\n. .\n").unwrap();
        let validator = SolutionValidator::new(1);

        let result = validator.validate(&board);
        assert_eq!(
            result.details.violations,
            vec![AttackViolation { white: (0, 0), black: (0, 1) }]
        );
        assert!(matches!(
            validator.require_valid(&board),
            Err(PeaceError::InconsistentModel(_))
        ));
    }

    #[test]
    fn test_empty_board_is_valid_for_zero() {
        assert!(SolutionValidator::new(0).validate(&Board::new(3)).is_valid);
    }
}
