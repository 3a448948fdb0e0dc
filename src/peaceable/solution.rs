//! Solution representation for peaceable queens problems

use crate::board::{Board, Color};
use crate::config::SolverBackend;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A verified peaceful placement of both armies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Board size
    pub n: usize,
    /// Queens per army
    pub k: usize,
    pub board: Board,
    /// Backend that found the placement
    pub backend: SolverBackend,
    #[serde(with = "millis")]
    pub solve_time: Duration,
    /// Size of the formula the solver was given
    pub variable_count: usize,
    pub clause_count: usize,
}

impl Solution {
    pub fn new(board: Board, k: usize, backend: SolverBackend) -> Self {
        Self {
            n: board.size,
            k,
            board,
            backend,
            solve_time: Duration::ZERO,
            variable_count: 0,
            clause_count: 0,
        }
    }

    /// Attach solver timing and formula size
    pub fn with_run_info(mut self, solve_time: Duration, variable_count: usize, clause_count: usize) -> Self {
        self.solve_time = solve_time;
        self.variable_count = variable_count;
        self.clause_count = clause_count;
        self
    }

    /// Queen coordinates of one army, row-major
    pub fn positions(&self, color: Color) -> Vec<(usize, usize)> {
        self.board.positions(color)
    }

    /// Board rows as `W`, `B` and `.` separated by spaces
    pub fn render(&self) -> String {
        self.board.to_string()
    }

    /// Get a summary of the solution
    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            n: self.n,
            k: self.k,
            white: self.positions(Color::White),
            black: self.positions(Color::Black),
            solve_time_ms: self.solve_time.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

/// Compact summary of a solution
#[derive(Debug, Clone)]
pub struct SolutionSummary {
    pub n: usize,
    pub k: usize,
    pub white: Vec<(usize, usize)>,
    pub black: Vec<(usize, usize)>,
    pub solve_time_ms: u64,
}

impl std::fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution for n = {}, k = {}:", self.n, self.k)?;
        writeln!(f, "  White: {:?}", self.white)?;
        writeln!(f, "  Black: {:?}", self.black)?;
        writeln!(f, "  Solve time: {}ms", self.solve_time_ms)?;
        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
