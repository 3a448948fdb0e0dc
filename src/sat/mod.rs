//! SAT encoding and solving components for peaceable queens

pub mod cardinality;
pub mod constraints;
pub mod dimacs;
pub mod encoder;
pub mod external;
pub mod interpreter;
pub mod solver;
pub mod solver_factory;
pub mod store;
pub mod variables;

pub use cardinality::CardinalityEncoder;
pub use constraints::{AttackConstraintGenerator, Clause, OverlapConstraintGenerator};
pub use encoder::{ComplexityEstimate, ComplexityLevel, FormulaStatistics, PeaceableEncoder};
pub use external::ExternalSolver;
pub use interpreter::ModelInterpreter;
pub use solver::{SatSolver, SolverOutcome, SolverRun, SolverStatistics, SolverStatus};
pub use solver_factory::{EmbeddedSolver, UnifiedSatSolver};
pub use store::{ClauseCounter, ClauseSink, ClauseStore, Formula};
pub use variables::{Placement, VariableAllocator, VariableIndexer};
