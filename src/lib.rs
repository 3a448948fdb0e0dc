//! Peaceable Queens SAT Encoder
//!
//! Decides whether k white and k black queens can share an n×n board with no
//! queen attacking one of the other color, by reduction to CNF satisfiability.

pub mod board;
pub mod config;
pub mod error;
pub mod peaceable;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use error::{PeaceError, PeaceResult};
pub use peaceable::{Instance, PeaceableProblem, Solution, SolveReport, Verdict};

/// Main entry point for deciding a peaceable queens instance
pub async fn solve_instance(instance: Instance, settings: Settings) -> PeaceResult<SolveReport> {
    let problem = PeaceableProblem::new(instance, settings)?;
    problem.solve().await
}
