// Path-count tables used by rank/unrank.
//
// counts[q][len]         = number of words of length `len` leading from q to a final state
// cumulative[q][i][a]    = sum of counts[delta(q, b)][L - i] for every symbol index b < a
//
// `i` is a 1-based word position, so `cumulative` only stores rows for 1..=L.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::dfa::{Delta, StateId};

/// Exact path counts for every state and length up to the slice length.
///
/// Built once by [`PathCounts::build`] and read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct PathCounts {
    max_len: usize,
    state_count: usize,
    symbol_count: usize,
    /// `state_count * (max_len + 1)` cells, row-major by state.
    counts: Vec<BigUint>,
    /// `state_count * max_len * symbol_count` cells, row-major by state then position.
    cumulative: Vec<BigUint>,
}

impl std::fmt::Debug for PathCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathCounts")
            .field("max_len", &self.max_len)
            .field("state_count", &self.state_count)
            .field("symbol_count", &self.symbol_count)
            .finish()
    }
}

impl PathCounts {
    /// Run the dynamic program over `delta` for lengths `0..=max_len`.
    ///
    /// `finals[q]` marks accepting states and must have one entry per state.
    pub fn build(delta: &Delta, finals: &[bool], max_len: usize) -> Self {
        let state_count = delta.state_count();
        let symbol_count = delta.symbol_count();
        let stride = max_len + 1;

        let mut counts = vec![BigUint::zero(); state_count * stride];
        for (state, _) in finals.iter().enumerate().filter(|(_, is_final)| **is_final) {
            counts[state * stride] = BigUint::one();
        }

        for len in 1..=max_len {
            for state in 0..state_count {
                let total: BigUint = delta
                    .row(state as StateId)
                    .iter()
                    .map(|&next| &counts[next as usize * stride + len - 1])
                    .sum();
                counts[state * stride + len] = total;
            }
        }

        let mut cumulative = vec![BigUint::zero(); state_count * max_len * symbol_count];
        for position in 1..=max_len {
            let remaining = max_len - position;
            for state in 0..state_count {
                let base = (state * max_len + position - 1) * symbol_count;
                let mut running = BigUint::zero();
                for (symbol, &next) in delta.row(state as StateId).iter().enumerate() {
                    cumulative[base + symbol] = running.clone();
                    running += &counts[next as usize * stride + remaining];
                }
            }
        }

        log::debug!(
            "built path-count tables: {state_count} states x {symbol_count} symbols, lengths 0..={max_len}"
        );

        Self {
            max_len,
            state_count,
            symbol_count,
            counts,
            cumulative,
        }
    }

    /// Longest length covered by the tables.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of words of length `len` leading from `state` to a final state.
    ///
    /// `None` if `state` or `len` is outside the tables.
    pub fn count(&self, state: StateId, len: usize) -> Option<&BigUint> {
        let state = state as usize;
        if state >= self.state_count || len > self.max_len {
            return None;
        }
        self.counts.get(state * (self.max_len + 1) + len)
    }

    /// Cumulative row for `state` at 1-based `position`: entry `a` is the
    /// number of completions whose symbol at `position` has an index below `a`.
    ///
    /// The row is nondecreasing. Callers guarantee `state < state_count` and
    /// `1 <= position <= max_len`.
    pub(crate) fn cumulative_row(&self, state: StateId, position: usize) -> &[BigUint] {
        let base = (state as usize * self.max_len + position - 1) * self.symbol_count;
        &self.cumulative[base..base + self.symbol_count]
    }
}
