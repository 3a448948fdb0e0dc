//! External SAT solver run as a subprocess
//!
//! The solver receives the path of a DIMACS file and reports in the SAT
//! competition format: an `s` status line, `v` model lines and `c` comment
//! lines on stdout. Exit codes 10 and 20 stand in for a missing status line.

use super::solver::{SolverOutcome, SolverRun, SolverStatistics};
use crate::error::{PeaceError, PeaceResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, warn};

const EXIT_SATISFIABLE: i32 = 10;
const EXIT_UNSATISFIABLE: i32 = 20;

/// Configuration of an external solver invocation
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    binary: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalSolver {
    pub fn new(binary: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            args,
            timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the solver on a DIMACS file
    ///
    /// The child is killed when the time limit expires, and the call fails
    /// with [`PeaceError::Timeout`].
    pub async fn solve_file(&self, cnf_path: &Path) -> PeaceResult<SolverRun> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args)
            .arg(cnf_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(
            solver = %self.binary.display(),
            cnf = %cnf_path.display(),
            timeout = ?self.timeout,
            "launching external solver"
        );
        let start = Instant::now();

        // Dropping the output future on expiry drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(PeaceError::Solver(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    e
                )))
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "external solver timed out and was killed");
                return Err(PeaceError::Timeout(self.timeout));
            }
        };
        let solve_time = start.elapsed();

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(status = ?output.status, stderr = %stderr.trim(), "external solver finished");

        let report = parse_solver_output(&stdout, output.status.code())?;
        let variable_count = match &report.outcome {
            SolverOutcome::Satisfiable(model) => model.keys().copied().max().unwrap_or(0) as usize,
            _ => 0,
        };

        Ok(SolverRun {
            outcome: report.outcome,
            statistics: SolverStatistics {
                variable_count,
                clause_count: 0,
                solve_time,
                messages: report.messages,
            },
        })
    }
}

/// Parsed solver stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverReport {
    pub outcome: SolverOutcome,
    pub messages: Vec<String>,
}

/// Read competition-format solver output
pub fn parse_solver_output(stdout: &str, exit_code: Option<i32>) -> PeaceResult<SolverReport> {
    let mut status: Option<&str> = None;
    let mut model = HashMap::new();
    let mut saw_model = false;
    let mut messages = Vec::new();

    for line in stdout.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("s ") {
            status = Some(rest.trim());
        } else if let Some(rest) = line.strip_prefix("v ") {
            saw_model = true;
            for token in rest.split_whitespace() {
                let lit: i32 = token.parse().map_err(|_| {
                    PeaceError::Solver(format!("invalid literal '{}' in model line", token))
                })?;
                if lit != 0 {
                    model.insert(lit.abs(), lit > 0);
                }
            }
        } else if let Some(rest) = line.strip_prefix('c') {
            messages.push(rest.trim().to_string());
        }
    }

    let satisfiable = match (status, exit_code) {
        (Some("SATISFIABLE"), _) => Some(true),
        (Some("UNSATISFIABLE"), _) => Some(false),
        (Some("UNKNOWN" | "INDETERMINATE"), _) => None,
        (Some(other), _) => {
            return Err(PeaceError::Solver(format!("unrecognized status line 's {}'", other)))
        }
        (None, Some(EXIT_SATISFIABLE)) => Some(true),
        (None, Some(EXIT_UNSATISFIABLE)) => Some(false),
        (None, code) => {
            return Err(PeaceError::Solver(format!(
                "solver reported no status (exit code {:?})",
                code
            )))
        }
    };

    let outcome = match satisfiable {
        Some(true) if !saw_model => {
            return Err(PeaceError::Solver(
                "solver reported SATISFIABLE without a model; pass its model flag".to_string(),
            ))
        }
        Some(true) => SolverOutcome::Satisfiable(model),
        Some(false) => SolverOutcome::Unsatisfiable,
        None => SolverOutcome::Unknown,
    };

    Ok(SolverReport { outcome, messages })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_satisfiable_model() {
        let stdout = "c glucose 4.2\nc restarts : 3\ns SATISFIABLE\nv 1 -2 3\nv -4 0\n";
        let report = parse_solver_output(stdout, Some(10)).unwrap();

        let expected: HashMap<i32, bool> =
            [(1, true), (2, false), (3, true), (4, false)].into_iter().collect();
        assert_eq!(report.outcome, SolverOutcome::Satisfiable(expected));
        assert_eq!(report.messages, vec!["glucose 4.2", "restarts : 3"]);
    }

    #[test]
    fn test_parse_unsatisfiable() {
        let report = parse_solver_output("c done\ns UNSATISFIABLE\n", Some(20)).unwrap();
        assert_eq!(report.outcome, SolverOutcome::Unsatisfiable);
    }

    #[test]
    fn test_parse_unknown() {
        let report = parse_solver_output("s UNKNOWN\n", Some(0)).unwrap();
        assert_eq!(report.outcome, SolverOutcome::Unknown);
    }

    #[test]
    fn test_exit_code_fallback() {
        let report = parse_solver_output("v 1 0\n", Some(10)).unwrap();
        assert!(matches!(report.outcome, SolverOutcome::Satisfiable(_)));

        let report = parse_solver_output("", Some(20)).unwrap();
        assert_eq!(report.outcome, SolverOutcome::Unsatisfiable);

        assert!(parse_solver_output("", Some(1)).is_err());
        assert!(parse_solver_output("", None).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_solver_output("s SATISFIABLE\nv 1 x 0\n", Some(10)).is_err());
        assert!(parse_solver_output("s MAYBE\n", None).is_err());
        assert!(parse_solver_output("s SATISFIABLE\n", Some(10)).is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_solver_error() {
        let solver = ExternalSolver::new(
            "/nonexistent/peaceable-queens-solver",
            Vec::new(),
            Duration::from_secs(5),
        );
        let dir = tempfile::tempdir().unwrap();
        let cnf = dir.path().join("empty.cnf");
        std::fs::write(&cnf, "p cnf 0 0\n").unwrap();

        let result = solver.solve_file(&cnf).await;
        assert!(matches!(result, Err(PeaceError::Solver(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_solver() {
        // The DIMACS path lands in $0 of the shell and is ignored
        let solver = ExternalSolver::new(
            "sh",
            vec!["-c".to_string(), "sleep 30".to_string()],
            Duration::from_millis(200),
        );
        let dir = tempfile::tempdir().unwrap();
        let cnf = dir.path().join("q.cnf");
        std::fs::write(&cnf, "p cnf 0 0\n").unwrap();

        let start = Instant::now();
        let result = solver.solve_file(&cnf).await;
        assert!(matches!(result, Err(PeaceError::Timeout(_))));
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
