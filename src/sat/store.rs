//! Clause sinks: in-memory store, counter and frozen formula
//!
//! Generators never own their output. They write each clause into a
//! [`ClauseSink`] as soon as it is produced, so the same generation pass can
//! fill a [`ClauseStore`], feed a streaming DIMACS writer or load a solver.

use super::constraints::Clause;
use crate::error::PeaceResult;

/// Consumer of generated clauses
pub trait ClauseSink {
    /// Accept one clause; the slice is only borrowed for the call
    fn add_clause(&mut self, literals: &[i32]) -> PeaceResult<()>;

    /// Declare that ids up to `count` exist even if no clause mentions them
    fn declare_variables(&mut self, _count: usize) {}
}

fn max_variable(literals: &[i32]) -> usize {
    literals.iter().map(|lit| lit.unsigned_abs() as usize).max().unwrap_or(0)
}

/// Growable clause list used while a formula is being generated
#[derive(Debug, Clone, Default)]
pub struct ClauseStore {
    variable_count: usize,
    clauses: Vec<Clause>,
}

impl ClauseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Stop accepting clauses and hand the result to the serializer
    pub fn freeze(self) -> Formula {
        Formula {
            variable_count: self.variable_count,
            clauses: self.clauses,
        }
    }
}

impl ClauseSink for ClauseStore {
    fn add_clause(&mut self, literals: &[i32]) -> PeaceResult<()> {
        self.variable_count = self.variable_count.max(max_variable(literals));
        self.clauses.push(Clause::new(literals.to_vec()));
        Ok(())
    }

    fn declare_variables(&mut self, count: usize) {
        self.variable_count = self.variable_count.max(count);
    }
}

/// Immutable CNF formula: variable count and clause sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    variable_count: usize,
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new(variable_count: usize, clauses: Vec<Clause>) -> Self {
        Self {
            variable_count,
            clauses,
        }
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Clauses with sorted literals, themselves sorted; equal for equal multisets
    pub fn normalized_clauses(&self) -> Vec<Vec<i32>> {
        let mut clauses: Vec<Vec<i32>> = self
            .clauses
            .iter()
            .map(|clause| {
                let mut literals = clause.literals.clone();
                literals.sort_unstable();
                literals
            })
            .collect();
        clauses.sort();
        clauses
    }

    /// Whether `assignment` satisfies every clause; unassigned ids count as false
    pub fn is_satisfied_by(&self, assignment: &std::collections::HashMap<i32, bool>) -> bool {
        self.clauses.iter().all(|clause| {
            clause.literals.iter().any(|&lit| {
                let value = assignment.get(&lit.abs()).copied().unwrap_or(false);
                value == (lit > 0)
            })
        })
    }
}

/// Sink that only measures what passes through it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClauseCounter {
    pub variable_count: usize,
    pub clause_count: usize,
    pub literal_count: usize,
}

impl ClauseSink for ClauseCounter {
    fn add_clause(&mut self, literals: &[i32]) -> PeaceResult<()> {
        self.variable_count = self.variable_count.max(max_variable(literals));
        self.clause_count += 1;
        self.literal_count += literals.len();
        Ok(())
    }

    fn declare_variables(&mut self, count: usize) {
        self.variable_count = self.variable_count.max(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_store_tracks_counts() {
        let mut store = ClauseStore::new();
        store.add_clause(&[1, -5, 3]).unwrap();
        assert_eq!(store.variable_count(), 5);

        store.add_clause(&[2, -7]).unwrap();
        assert_eq!(store.variable_count(), 7);
        assert_eq!(store.clause_count(), 2);

        store.declare_variables(10);
        let formula = store.freeze();
        assert_eq!(formula.variable_count(), 10);
        assert_eq!(formula.clauses()[0].literals, vec![1, -5, 3]);
    }

    #[test]
    fn test_counter_matches_store() {
        let mut store = ClauseStore::new();
        let mut counter = ClauseCounter::default();
        for clause in [&[1, 2][..], &[-1][..], &[3, -2, 4][..]] {
            store.add_clause(clause).unwrap();
            counter.add_clause(clause).unwrap();
        }

        assert_eq!(counter.clause_count, store.clause_count());
        assert_eq!(counter.variable_count, store.variable_count());
        assert_eq!(counter.literal_count, 6);
    }

    #[test]
    fn test_normalized_clauses_ignore_order() {
        let a = Formula::new(3, vec![Clause::new(vec![2, 1]), Clause::new(vec![-3])]);
        let b = Formula::new(3, vec![Clause::new(vec![-3]), Clause::new(vec![1, 2])]);
        assert_eq!(a.normalized_clauses(), b.normalized_clauses());
    }

    #[test]
    fn test_is_satisfied_by() {
        let formula = Formula::new(2, vec![Clause::new(vec![1, 2]), Clause::new(vec![-1])]);
        let mut assignment = HashMap::new();
        assignment.insert(1, false);
        assignment.insert(2, true);
        assert!(formula.is_satisfied_by(&assignment));

        assignment.insert(2, false);
        assert!(!formula.is_satisfied_by(&assignment));
    }
}
