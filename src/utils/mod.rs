//! Console output helpers

pub mod display;

pub use display::{ColorOutput, SolutionFormatter, TermColor};
