//! Peaceable queens problem definition

use super::{Instance, Solution, SolutionValidator};
use crate::config::Settings;
use crate::error::{PeaceError, PeaceResult};
use crate::sat::{PeaceableEncoder, SolverOutcome, SolverStatistics, UnifiedSatSolver};
use tracing::{debug, info, warn};

/// Answer to one instance
#[derive(Debug, Clone)]
pub enum Verdict {
    Satisfiable(Solution),
    Unsatisfiable,
    /// The solver gave up without deciding
    Unknown,
}

impl Verdict {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Verdict::Satisfiable(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Satisfiable(_) => "SAT",
            Verdict::Unsatisfiable => "UNSAT",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

/// Verdict plus what the solver reported along the way
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub verdict: Verdict,
    /// `None` when no solver call was needed
    pub statistics: Option<SolverStatistics>,
}

/// Represents a peaceable queens problem
pub struct PeaceableProblem {
    instance: Instance,
    settings: Settings,
    encoder: PeaceableEncoder,
    validator: SolutionValidator,
}

impl PeaceableProblem {
    /// Create a new problem for an instance
    pub fn new(instance: Instance, settings: Settings) -> PeaceResult<Self> {
        let encoder = instance.encoder()?.with_comments(settings.encoding.comments);
        let validator = SolutionValidator::new(instance.k);

        Ok(Self {
            instance,
            settings,
            encoder,
            validator,
        })
    }

    pub fn instance(&self) -> Instance {
        self.instance
    }

    /// Get the problem settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn encoder(&self) -> &PeaceableEncoder {
        &self.encoder
    }

    /// Decide the instance
    ///
    /// Armies larger than the board are UNSAT without encoding anything. A
    /// solver time limit surfaces as [`PeaceError::Timeout`].
    pub async fn solve(&self) -> PeaceResult<SolveReport> {
        if !self.instance.is_feasible() {
            info!(instance = %self.instance, "army exceeds board capacity, UNSAT without solving");
            return Ok(SolveReport {
                verdict: Verdict::Unsatisfiable,
                statistics: None,
            });
        }

        let solver = UnifiedSatSolver::from_config(&self.settings.solver);
        info!(instance = %self.instance, backend = ?solver.backend(), "solving");

        let run = solver
            .solve(&self.encoder, self.settings.output.cnf_path.as_deref())
            .await?;
        debug!(solve_time = ?run.statistics.solve_time, "solver returned");

        let verdict = match run.outcome {
            SolverOutcome::Satisfiable(ref assignment) => {
                let board = self.encoder.interpreter().interpret(assignment)?;
                self.validator.require_valid(&board)?;
                let solution = Solution::new(board, self.instance.k, solver.backend()).with_run_info(
                    run.statistics.solve_time,
                    run.statistics.variable_count,
                    run.statistics.clause_count,
                );
                Verdict::Satisfiable(solution)
            }
            SolverOutcome::Unsatisfiable => Verdict::Unsatisfiable,
            SolverOutcome::Unknown => {
                warn!(instance = %self.instance, "solver returned UNKNOWN");
                Verdict::Unknown
            }
        };

        Ok(SolveReport {
            verdict,
            statistics: Some(run.statistics),
        })
    }
}

/// Outcome of searching for the largest peaceful army on one board
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub n: usize,
    /// Largest army size shown feasible, with its witness
    pub best: Option<Solution>,
    /// Smallest army size shown infeasible
    pub first_unsat: Option<usize>,
    /// Army size at which the solver gave up, if it did
    pub undecided: Option<usize>,
}

impl SweepReport {
    /// Whether `best` is proven maximal
    pub fn is_exact(&self) -> bool {
        self.first_unsat.is_some()
    }
}

/// Increase k from 1 until the instance turns UNSAT or the solver gives up
///
/// Feasibility is monotone in k: dropping a queen from each army of a peaceful
/// placement leaves a peaceful placement.
pub async fn sweep(n: usize, settings: &Settings) -> PeaceResult<SweepReport> {
    let mut report = SweepReport {
        n,
        best: None,
        first_unsat: None,
        undecided: None,
    };

    for k in 1..=n * n {
        let instance = Instance::new(n as i64, k as i64)?;
        let problem = PeaceableProblem::new(instance, settings.clone())?;

        let verdict = match problem.solve().await {
            Ok(solve) => solve.verdict,
            Err(PeaceError::Timeout(limit)) => {
                warn!(n, k, ?limit, "sweep stopped by solver time limit");
                report.undecided = Some(k);
                break;
            }
            Err(e) => return Err(e),
        };

        match verdict {
            Verdict::Satisfiable(solution) => {
                info!(n, k, "peaceful placement found");
                report.best = Some(solution);
            }
            Verdict::Unsatisfiable => {
                report.first_unsat = Some(k);
                break;
            }
            Verdict::Unknown => {
                report.undecided = Some(k);
                break;
            }
        }
    }

    Ok(report)
}
