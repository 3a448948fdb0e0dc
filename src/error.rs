//! Error kinds surfaced by the encoding core and the solver boundary

use std::time::Duration;
use thiserror::Error;

/// Failures produced while encoding, serializing, solving or decoding
#[derive(Debug, Error)]
pub enum PeaceError {
    /// Board size or army size outside the meaningful domain
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// More queens per army than cells on the board; the instance is UNSAT
    #[error("cannot place {k} queens of one color on {capacity} cells")]
    InfeasibleCardinality { k: usize, capacity: usize },

    /// A cell coordinate outside the board was handed to the indexer
    #[error("cell ({row}, {column}) is outside the {n}x{n} board")]
    OutOfRange { row: usize, column: usize, n: usize },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The solver returned an assignment that does not describe a legal placement
    #[error("inconsistent model: {0}")]
    InconsistentModel(String),

    /// The solver exceeded its time limit and was cancelled
    #[error("solver exceeded the time limit of {0:?}")]
    Timeout(Duration),

    #[error("malformed DIMACS input at line {line}: {message}")]
    Dimacs { line: usize, message: String },

    /// The solver could not be launched or produced unreadable output
    #[error("solver failure: {0}")]
    Solver(String),
}

pub type PeaceResult<T> = std::result::Result<T, PeaceError>;
