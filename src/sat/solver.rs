//! SAT solver integration using CaDiCaL

use super::store::ClauseSink;
use crate::error::{PeaceError, PeaceResult};
use cadical::{Solver, Timeout};
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// What a solver concluded about a formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverOutcome {
    /// Satisfiable, with the model as variable id -> value
    Satisfiable(HashMap<i32, bool>),
    Unsatisfiable,
    /// The solver gave up without an answer
    Unknown,
}

impl SolverOutcome {
    pub fn status(&self) -> SolverStatus {
        match self {
            SolverOutcome::Satisfiable(_) => SolverStatus::Satisfiable,
            SolverOutcome::Unsatisfiable => SolverStatus::Unsatisfiable,
            SolverOutcome::Unknown => SolverStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverStatus {
    Satisfiable,
    Unsatisfiable,
    Unknown,
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverStatus::Satisfiable => write!(f, "SAT"),
            SolverStatus::Unsatisfiable => write!(f, "UNSAT"),
            SolverStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Statistics about the solving process
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_time: Duration,
    /// Free-form statistics reported by the solver (`c` lines)
    pub messages: Vec<String>,
}

/// Outcome of one solver call plus its statistics
#[derive(Debug, Clone)]
pub struct SolverRun {
    pub outcome: SolverOutcome,
    pub statistics: SolverStatistics,
}

/// In-process CaDiCaL instance that accepts clauses as they are generated
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
    timeout: Option<Duration>,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            timeout: None,
        }
    }

    /// Set solving timeout
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Solve the clauses added so far
    ///
    /// When a timeout is set the search is cut off through CaDiCaL's terminate
    /// callback and [`PeaceError::Timeout`] is returned.
    pub fn solve(&mut self) -> PeaceResult<SolverRun> {
        if let Some(timeout) = self.timeout {
            self.solver
                .set_callbacks(Some(Timeout::new(timeout.as_secs_f32())));
        }

        debug!(
            variables = self.variable_count,
            clauses = self.clause_count,
            "starting embedded solver"
        );
        let start_time = Instant::now();
        let result = self.solver.solve();
        let solve_time = start_time.elapsed();

        let outcome = match result {
            Some(true) => SolverOutcome::Satisfiable(self.extract_assignment()),
            Some(false) => SolverOutcome::Unsatisfiable,
            None => match self.timeout {
                Some(timeout) => {
                    warn!(?timeout, "embedded solver hit its time limit");
                    return Err(PeaceError::Timeout(timeout));
                }
                None => SolverOutcome::Unknown,
            },
        };

        Ok(SolverRun {
            outcome,
            statistics: SolverStatistics {
                variable_count: self.variable_count,
                clause_count: self.clause_count,
                solve_time,
                messages: Vec::new(),
            },
        })
    }

    /// Extract variable assignment from the solver
    fn extract_assignment(&self) -> HashMap<i32, bool> {
        let mut assignment = HashMap::new();

        for var in 1..=self.variable_count as i32 {
            if let Some(value) = self.solver.value(var) {
                assignment.insert(var, value);
            }
        }

        assignment
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseSink for SatSolver {
    fn add_clause(&mut self, literals: &[i32]) -> PeaceResult<()> {
        if literals.is_empty() {
            return Err(PeaceError::Solver(
                "cannot add empty clause (unsatisfiable)".to_string(),
            ));
        }

        for &literal in literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(literals.iter().copied());
        self.clause_count += 1;
        Ok(())
    }

    fn declare_variables(&mut self, count: usize) {
        self.variable_count = self.variable_count.max(count);
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        for message in &self.messages {
            writeln!(f, "  c {}", message)?;
        }
        Ok(())
    }
}
