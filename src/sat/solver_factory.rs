//! Factory for creating SAT solver instances based on configuration

use super::encoder::PeaceableEncoder;
use super::external::ExternalSolver;
use super::solver::{SatSolver, SolverRun};
use crate::config::{SolverBackend, SolverConfig};
use crate::error::{PeaceError, PeaceResult};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Unified SAT solver interface that can use different backends
#[derive(Debug, Clone)]
pub enum UnifiedSatSolver {
    External(ExternalSolver),
    Embedded(EmbeddedSolver),
}

impl UnifiedSatSolver {
    /// Create a new solver instance based on the configured backend
    pub fn from_config(config: &SolverConfig) -> Self {
        match config.backend {
            SolverBackend::External => UnifiedSatSolver::External(ExternalSolver::new(
                config.binary.clone(),
                config.args.clone(),
                config.timeout(),
            )),
            SolverBackend::Embedded => UnifiedSatSolver::Embedded(EmbeddedSolver::new(config.timeout())),
        }
    }

    /// Encode and solve one instance
    ///
    /// The external backend reads the formula from `cnf_path`, or from a
    /// temporary file when no path is given.
    pub async fn solve(
        &self,
        encoder: &PeaceableEncoder,
        cnf_path: Option<&Path>,
    ) -> PeaceResult<SolverRun> {
        match self {
            UnifiedSatSolver::External(solver) => match cnf_path {
                Some(path) => {
                    let statistics = encoder.write_dimacs_file(path)?;
                    let mut run = solver.solve_file(path).await?;
                    run.statistics.variable_count = statistics.variable_count;
                    run.statistics.clause_count = statistics.clause_count;
                    Ok(run)
                }
                None => {
                    let file = tempfile::Builder::new()
                        .prefix("peaceable-")
                        .suffix(".cnf")
                        .tempfile()?;
                    let statistics = encoder.write_dimacs(std::io::BufWriter::new(file.as_file()))?;
                    let mut run = solver.solve_file(file.path()).await?;
                    run.statistics.variable_count = statistics.variable_count;
                    run.statistics.clause_count = statistics.clause_count;
                    Ok(run)
                }
            },
            UnifiedSatSolver::Embedded(solver) => solver.solve(*encoder).await,
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSatSolver::External(_) => SolverBackend::External,
            UnifiedSatSolver::Embedded(_) => SolverBackend::Embedded,
        }
    }
}

/// CaDiCaL run on the blocking pool so the async caller is never stalled
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSolver {
    timeout: Duration,
}

impl EmbeddedSolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Stream the encoding straight into a fresh solver and solve it
    pub async fn solve(&self, encoder: PeaceableEncoder) -> PeaceResult<SolverRun> {
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || {
            let mut solver = SatSolver::new();
            solver.set_timeout(timeout);
            let statistics = encoder.encode_into(&mut solver)?;
            debug!(clauses = statistics.clause_count, "loaded embedded solver");
            solver.solve()
        })
        .await
        .map_err(|e| PeaceError::Solver(format!("embedded solver task failed: {}", e)))?
    }
}
