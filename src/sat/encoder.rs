//! SAT encoder for the peaceable queens problem

use super::cardinality::CardinalityEncoder;
use super::constraints::{AttackConstraintGenerator, OverlapConstraintGenerator};
use super::dimacs::{write_header, DimacsWriter};
use super::interpreter::ModelInterpreter;
use super::store::{ClauseCounter, ClauseSink, ClauseStore, Formula};
use super::VariableIndexer;
use crate::board::Color;
use crate::error::{PeaceError, PeaceResult};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Builds the CNF formula for placing two k-armies on an n×n board
#[derive(Debug, Clone, Copy)]
pub struct PeaceableEncoder {
    n: usize,
    k: usize,
    indexer: VariableIndexer,
    comments: bool,
}

impl PeaceableEncoder {
    /// Create an encoder for board size `n` and army size `k`
    pub fn new(n: usize, k: usize) -> PeaceResult<Self> {
        if n == 0 {
            return Err(PeaceError::InvalidParameters(
                "board size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            n,
            k,
            indexer: VariableIndexer::new(n),
            comments: false,
        })
    }

    /// Emit `c` comment lines describing the instance ahead of the DIMACS header
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn army_size(&self) -> usize {
        self.k
    }

    pub fn indexer(&self) -> VariableIndexer {
        self.indexer
    }

    /// Whether each army fits on the board at all
    pub fn is_feasible(&self) -> bool {
        self.k <= self.indexer.cells()
    }

    /// Interpreter for models of the formula this encoder produces
    pub fn interpreter(&self) -> ModelInterpreter {
        ModelInterpreter::new(self.indexer, self.k)
    }

    /// Run every generator into `sink`
    ///
    /// White cardinality first, then black, so auxiliary ids are deterministic
    /// across passes. An infeasible `k` is reported before any clause is
    /// written.
    pub fn encode_into<S: ClauseSink + ?Sized>(&self, sink: &mut S) -> PeaceResult<FormulaStatistics> {
        if !self.is_feasible() {
            return Err(PeaceError::InfeasibleCardinality {
                k: self.k,
                capacity: self.indexer.cells(),
            });
        }

        let mut allocator = self.indexer.allocator();
        let mut cardinality_clauses = 0;
        for color in Color::ALL {
            let literals = self.indexer.color_variables(color);
            cardinality_clauses += CardinalityEncoder::new().encode_exactly_k(
                &literals,
                self.k,
                &mut allocator,
                sink,
            )?;
        }

        let attack_clauses = AttackConstraintGenerator::new(self.indexer).generate(sink)?;
        let overlap_clauses = OverlapConstraintGenerator::new(self.indexer).generate(sink)?;

        let variable_count = allocator.variable_count();
        sink.declare_variables(variable_count);

        let statistics = FormulaStatistics {
            n: self.n,
            k: self.k,
            placement_variables: self.indexer.placement_count(),
            auxiliary_variables: allocator.allocated(),
            variable_count,
            cardinality_clauses,
            attack_clauses,
            overlap_clauses,
            clause_count: cardinality_clauses + attack_clauses + overlap_clauses,
        };
        debug!(
            n = self.n,
            k = self.k,
            variables = statistics.variable_count,
            clauses = statistics.clause_count,
            "encoded instance"
        );

        Ok(statistics)
    }

    /// Build the whole formula in memory
    pub fn to_formula(&self) -> PeaceResult<Formula> {
        let mut store = ClauseStore::new();
        self.encode_into(&mut store)?;
        Ok(store.freeze())
    }

    /// Encoding sizes without materializing any clause
    pub fn statistics(&self) -> PeaceResult<FormulaStatistics> {
        self.encode_into(&mut ClauseCounter::default())
    }

    /// Stream the formula as DIMACS into `writer`
    ///
    /// A counting pass fixes the header; the second pass writes each clause as
    /// it is generated, so memory stays flat in the clause count.
    pub fn write_dimacs<W: Write>(&self, mut writer: W) -> PeaceResult<FormulaStatistics> {
        let statistics = self.statistics()?;

        let comments = if self.comments { self.header_comments() } else { Vec::new() };
        write_header(
            &mut writer,
            &comments,
            statistics.variable_count,
            statistics.clause_count,
        )?;

        let mut dimacs = DimacsWriter::new(writer);
        self.encode_into(&mut dimacs)?;
        debug_assert_eq!(dimacs.written(), statistics.clause_count);
        dimacs.finish()?;

        Ok(statistics)
    }

    /// Write the DIMACS formula to `path`, creating parent directories
    pub fn write_dimacs_file<P: AsRef<Path>>(&self, path: P) -> PeaceResult<FormulaStatistics> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let statistics = self.write_dimacs(BufWriter::new(File::create(path)?))?;
        info!(
            path = %path.display(),
            variables = statistics.variable_count,
            clauses = statistics.clause_count,
            "wrote DIMACS formula"
        );
        Ok(statistics)
    }

    fn header_comments(&self) -> Vec<String> {
        let cells = self.indexer.cells();
        vec![
            format!("peaceable queens: n = {}, k = {}", self.n, self.k),
            format!("white queen (r, c) -> r*{} + c + 1, ids 1..{}", self.n, cells),
            format!(
                "black queen (r, c) -> {} + r*{} + c + 1, ids {}..{}",
                cells,
                self.n,
                cells + 1,
                2 * cells
            ),
            format!("ids above {} are counter registers", 2 * cells),
        ]
    }

    /// Rough difficulty estimate from the closed-form encoding sizes
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        let cells = self.indexer.cells();
        let auxiliary = 2 * CardinalityEncoder::expected_auxiliary(cells, self.k);
        let estimated_variables = self.indexer.placement_count() + auxiliary;
        let estimated_clauses = 2 * CardinalityEncoder::expected_clauses(cells, self.k)
            + AttackConstraintGenerator::new(self.indexer).expected_count()
            + cells;

        let complexity_level = if !self.is_feasible() {
            ComplexityLevel::Trivial
        } else if estimated_clauses < 10_000 {
            ComplexityLevel::Low
        } else if estimated_clauses < 200_000 {
            ComplexityLevel::Medium
        } else if estimated_clauses < 2_000_000 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::VeryHigh
        };

        ComplexityEstimate {
            complexity_level,
            estimated_variables,
            estimated_clauses,
            army_density: if cells == 0 { 0.0 } else { (2 * self.k) as f64 / cells as f64 },
            board_cells: cells,
        }
    }
}

/// Sizes of an encoded formula, per constraint family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormulaStatistics {
    pub n: usize,
    pub k: usize,
    pub placement_variables: usize,
    pub auxiliary_variables: usize,
    pub variable_count: usize,
    pub cardinality_clauses: usize,
    pub attack_clauses: usize,
    pub overlap_clauses: usize,
    pub clause_count: usize,
}

/// Complexity estimate for the problem
#[derive(Debug, Clone)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub estimated_variables: usize,
    pub estimated_clauses: usize,
    pub army_density: f64,
    pub board_cells: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexityLevel {
    Trivial,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for FormulaStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Board: {}x{}, {} queens per army", self.n, self.n, self.k)?;
        writeln!(
            f,
            "  Variables: {} ({} placement, {} auxiliary)",
            self.variable_count, self.placement_variables, self.auxiliary_variables
        )?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "    cardinality: {}", self.cardinality_clauses)?;
        writeln!(f, "    attack: {}", self.attack_clauses)?;
        writeln!(f, "    overlap: {}", self.overlap_clauses)?;
        Ok(())
    }
}

impl std::fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Problem Complexity Estimate:")?;
        writeln!(f, "  Complexity level: {:?}", self.complexity_level)?;
        writeln!(f, "  Estimated variables: {}", self.estimated_variables)?;
        writeln!(f, "  Estimated clauses: {}", self.estimated_clauses)?;
        writeln!(f, "  Board size: {} cells", self.board_cells)?;
        writeln!(f, "  Army density: {:.2}%", self.army_density * 100.0)?;

        let recommendation = match self.complexity_level {
            ComplexityLevel::Trivial => "Armies do not fit on the board; no solver call needed",
            ComplexityLevel::Low => "Should solve quickly",
            ComplexityLevel::Medium => "May take some time to solve",
            ComplexityLevel::High => "Likely to be challenging, consider a longer timeout",
            ComplexityLevel::VeryHigh => "Very challenging, expect the solver to hit its time limit",
        };
        writeln!(f, "  Recommendation: {}", recommendation)?;

        Ok(())
    }
}
