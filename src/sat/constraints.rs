//! Constraint generation for the peaceable queens SAT encoding

use super::store::ClauseSink;
use super::VariableIndexer;
use crate::board::{lines, Color};
use crate::error::PeaceResult;
use itertools::iproduct;
use tracing::debug;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// Forbids a white and a black queen on any shared row, column or diagonal
///
/// Cells are grouped by line, and every ordered pair of distinct cells on a
/// line yields one clause `¬W(a) ∨ ¬B(b)`. Two distinct cells share at most
/// one line, so no clause is produced twice, and total work is the sum of
/// squared line lengths, O(n³). The same-cell pair belongs to
/// [`OverlapConstraintGenerator`].
#[derive(Debug, Clone, Copy)]
pub struct AttackConstraintGenerator {
    indexer: VariableIndexer,
}

impl AttackConstraintGenerator {
    pub fn new(indexer: VariableIndexer) -> Self {
        Self { indexer }
    }

    /// Emit every non-attack clause into `sink`, returning how many were written
    pub fn generate<S: ClauseSink + ?Sized>(&self, sink: &mut S) -> PeaceResult<usize> {
        let mut emitted = 0;

        for (_, cells) in lines(self.indexer.size()) {
            if cells.len() < 2 {
                continue;
            }

            for (&(wr, wc), &(br, bc)) in iproduct!(&cells, &cells) {
                if (wr, wc) == (br, bc) {
                    continue;
                }
                let white = self.indexer.id_of(Color::White, wr, wc)?;
                let black = self.indexer.id_of(Color::Black, br, bc)?;
                sink.add_clause(&[-white, -black])?;
                emitted += 1;
            }
        }

        debug!(n = self.indexer.size(), emitted, "generated attack clauses");
        Ok(emitted)
    }

    /// Number of clauses `generate` produces, without generating them
    pub fn expected_count(&self) -> usize {
        lines(self.indexer.size())
            .map(|(_, cells)| cells.len() * cells.len().saturating_sub(1))
            .sum()
    }
}

/// Forbids a white and a black queen on the same cell
#[derive(Debug, Clone, Copy)]
pub struct OverlapConstraintGenerator {
    indexer: VariableIndexer,
}

impl OverlapConstraintGenerator {
    pub fn new(indexer: VariableIndexer) -> Self {
        Self { indexer }
    }

    /// Emit exactly n² clauses `¬W(i,j) ∨ ¬B(i,j)`
    pub fn generate<S: ClauseSink + ?Sized>(&self, sink: &mut S) -> PeaceResult<usize> {
        let n = self.indexer.size();
        for row in 0..n {
            for col in 0..n {
                let white = self.indexer.id_of(Color::White, row, col)?;
                let black = self.indexer.id_of(Color::Black, row, col)?;
                sink.add_clause(&[-white, -black])?;
            }
        }
        Ok(n * n)
    }
}
