//! Peaceable queens problem definition and solution handling

pub mod instance;
pub mod problem;
pub mod solution;
pub mod validator;

pub use instance::Instance;
pub use problem::{sweep, PeaceableProblem, SolveReport, SweepReport, Verdict};
pub use solution::Solution;
pub use validator::SolutionValidator;
