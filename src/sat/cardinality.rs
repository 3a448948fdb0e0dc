//! "Exactly k" cardinality constraints via a sequential counter
//!
//! For literals `x[0..m]` the encoder introduces a register row per literal:
//! `s[i][j]` holds iff at least `j + 1` of `x[0..=i]` are true. Each row is
//! defined from the previous one in both directions, so the register is exact
//! and serves at-most-k and at-least-k at once:
//!
//! ```text
//! s[i][j]  <->  s[i-1][j]  ∨  (x[i] ∧ s[i-1][j-1])
//! ```
//!
//! At-most-k forbids `x[i] ∧ s[i-1][k-1]`; at-least-k asserts `s[m-1][k-1]`.
//! Cost is `m·k` auxiliary variables and `4·m·k - 3k + 2` clauses, against
//! `C(m, k+1)` for subset enumeration.

use super::store::ClauseSink;
use super::variables::VariableAllocator;
use crate::error::{PeaceError, PeaceResult};
use std::ops::RangeInclusive;

/// Sequential-counter encoder; remembers which auxiliary ids it allocated
#[derive(Debug, Clone, Default)]
pub struct CardinalityEncoder {
    auxiliary: Option<RangeInclusive<i32>>,
}

impl CardinalityEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Auxiliary variable ids owned by this encoder, if any were needed
    pub fn auxiliary_variables(&self) -> Option<RangeInclusive<i32>> {
        self.auxiliary.clone()
    }

    /// Emit clauses forcing exactly `k` of `literals` to be true
    ///
    /// Fails with [`PeaceError::InfeasibleCardinality`] when `k` exceeds the
    /// number of literals. Returns the number of clauses written.
    pub fn encode_exactly_k<S: ClauseSink + ?Sized>(
        &mut self,
        literals: &[i32],
        k: usize,
        allocator: &mut VariableAllocator,
        sink: &mut S,
    ) -> PeaceResult<usize> {
        let m = literals.len();
        if k > m {
            return Err(PeaceError::InfeasibleCardinality { k, capacity: m });
        }

        if k == 0 || k == m {
            // Every literal is forced one way; no counter needed
            let polarity = if k == 0 { -1 } else { 1 };
            for &x in literals {
                sink.add_clause(&[polarity * x])?;
            }
            return Ok(m);
        }

        let first_auxiliary = allocator.variable_count() as i32 + 1;
        let mut out = Tally { sink, emitted: 0 };

        let mut previous: Vec<i32> = Vec::new();
        for (i, &x) in literals.iter().enumerate() {
            let current: Vec<i32> = (0..k).map(|_| allocator.fresh()).collect();

            if i == 0 {
                out.emit(&[-x, current[0]])?;
                out.emit(&[-current[0], x])?;
                for &unreachable in &current[1..] {
                    out.emit(&[-unreachable])?;
                }
            } else {
                out.emit(&[-x, current[0]])?;
                out.emit(&[-current[0], previous[0], x])?;
                for j in 0..k {
                    out.emit(&[-previous[j], current[j]])?;
                    if j > 0 {
                        out.emit(&[-x, -previous[j - 1], current[j]])?;
                        out.emit(&[-current[j], previous[j], x])?;
                        out.emit(&[-current[j], previous[j], previous[j - 1]])?;
                    }
                }
                // at most k: the counter may not already be full when x is set
                out.emit(&[-x, -previous[k - 1]])?;
            }

            previous = current;
        }

        // at least k
        out.emit(&[previous[k - 1]])?;

        self.auxiliary = Some(first_auxiliary..=allocator.variable_count() as i32);
        Ok(out.emitted)
    }

    /// Clause count of `encode_exactly_k` for `m` literals, without encoding
    pub fn expected_clauses(m: usize, k: usize) -> usize {
        if k == 0 || k >= m {
            return m;
        }
        4 * m * k - 3 * k + 2
    }

    /// Auxiliary variable count of `encode_exactly_k` for `m` literals
    pub fn expected_auxiliary(m: usize, k: usize) -> usize {
        if k == 0 || k >= m {
            0
        } else {
            m * k
        }
    }
}

/// Forwards clauses to a sink while counting them
struct Tally<'s, S: ?Sized> {
    sink: &'s mut S,
    emitted: usize,
}

impl<S: ClauseSink + ?Sized> Tally<'_, S> {
    fn emit(&mut self, clause: &[i32]) -> PeaceResult<()> {
        self.emitted += 1;
        self.sink.add_clause(clause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::store::{ClauseCounter, ClauseStore};
    use std::collections::HashMap;

    /// Every assignment of the `m` input literals, extended through the counter
    /// by brute force over the auxiliaries, is satisfiable iff exactly k are true.
    fn check_exactly_k(m: usize, k: usize) {
        let inputs: Vec<i32> = (1..=m as i32).collect();
        let mut allocator = VariableAllocator::new(m);
        let mut store = ClauseStore::new();
        let mut encoder = CardinalityEncoder::new();
        encoder.encode_exactly_k(&inputs, k, &mut allocator, &mut store).unwrap();
        let formula = store.freeze();

        for mask in 0u32..(1 << m) {
            let mut assignment: HashMap<i32, bool> = HashMap::new();
            for (bit, &x) in inputs.iter().enumerate() {
                assignment.insert(x, mask & (1 << bit) != 0);
            }

            // Registers are determined by the inputs: s[i][j] = count(x[0..=i]) > j
            if let Some(range) = encoder.auxiliary_variables() {
                let mut ids = range;
                let mut count = 0;
                for (bit, _) in inputs.iter().enumerate() {
                    if mask & (1 << bit) != 0 {
                        count += 1;
                    }
                    for j in 0..k {
                        assignment.insert(ids.next().unwrap(), count > j);
                    }
                }
            }

            let expected = mask.count_ones() as usize == k;
            assert_eq!(
                formula.is_satisfied_by(&assignment),
                expected,
                "m={} k={} mask={:b}",
                m,
                k,
                mask
            );
        }
    }

    #[test]
    fn test_counter_semantics_small() {
        for m in 1..=6 {
            for k in 0..=m {
                check_exactly_k(m, k);
            }
        }
    }

    #[test]
    fn test_wrong_register_values_are_rejected() {
        // With x = [true, false, false] and k = 1, claiming s[2][0] false must fail
        let inputs = [1, 2, 3];
        let mut allocator = VariableAllocator::new(3);
        let mut store = ClauseStore::new();
        let mut encoder = CardinalityEncoder::new();
        encoder.encode_exactly_k(&inputs, 1, &mut allocator, &mut store).unwrap();
        let formula = store.freeze();

        let mut assignment = HashMap::new();
        assignment.insert(1, true);
        assignment.insert(2, false);
        assignment.insert(3, false);
        for id in 4..=6 {
            assignment.insert(id, true);
        }
        assert!(formula.is_satisfied_by(&assignment));

        assignment.insert(6, false);
        assert!(!formula.is_satisfied_by(&assignment));
    }

    #[test]
    fn test_edge_cases_need_no_auxiliaries() {
        let inputs = [1, 2, 3, 4];

        let mut allocator = VariableAllocator::new(4);
        let mut store = ClauseStore::new();
        let mut encoder = CardinalityEncoder::new();
        encoder.encode_exactly_k(&inputs, 0, &mut allocator, &mut store).unwrap();
        assert_eq!(allocator.allocated(), 0);
        assert!(encoder.auxiliary_variables().is_none());
        assert!(store.clauses().iter().all(|c| c.is_unit() && c.literals[0] < 0));

        let mut store = ClauseStore::new();
        encoder.encode_exactly_k(&inputs, 4, &mut allocator, &mut store).unwrap();
        assert_eq!(allocator.allocated(), 0);
        assert!(store.clauses().iter().all(|c| c.is_unit() && c.literals[0] > 0));
    }

    #[test]
    fn test_infeasible_cardinality() {
        let mut allocator = VariableAllocator::new(2);
        let mut counter = ClauseCounter::default();
        let result = CardinalityEncoder::new().encode_exactly_k(&[1, 2], 3, &mut allocator, &mut counter);

        assert!(matches!(result, Err(PeaceError::InfeasibleCardinality { k: 3, capacity: 2 })));
        assert_eq!(counter.clause_count, 0);
    }

    #[test]
    fn test_linear_size() {
        for (m, k) in [(16, 1), (16, 5), (64, 8), (100, 99)] {
            let inputs: Vec<i32> = (1..=m as i32).collect();
            let mut allocator = VariableAllocator::new(m);
            let mut counter = ClauseCounter::default();
            let emitted = CardinalityEncoder::new()
                .encode_exactly_k(&inputs, k, &mut allocator, &mut counter)
                .unwrap();

            assert_eq!(emitted, counter.clause_count);
            assert_eq!(emitted, CardinalityEncoder::expected_clauses(m, k));
            assert_eq!(allocator.allocated(), CardinalityEncoder::expected_auxiliary(m, k));
        }
    }

    #[test]
    fn test_two_encoders_do_not_share_auxiliaries() {
        let mut allocator = VariableAllocator::new(8);
        let mut store = ClauseStore::new();
        let mut white = CardinalityEncoder::new();
        let mut black = CardinalityEncoder::new();
        white.encode_exactly_k(&[1, 2, 3, 4], 2, &mut allocator, &mut store).unwrap();
        black.encode_exactly_k(&[5, 6, 7, 8], 2, &mut allocator, &mut store).unwrap();

        let white_range = white.auxiliary_variables().unwrap();
        let black_range = black.auxiliary_variables().unwrap();
        assert_eq!(*white_range.start(), 9);
        assert!(white_range.end() < black_range.start());
        assert_eq!(*black_range.end() as usize, allocator.variable_count());
    }
}
