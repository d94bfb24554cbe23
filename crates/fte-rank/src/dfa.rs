// Dense DFA model: state/symbol discovery, validation, transition table.
//
// Construction is two pure passes over the parsed facts:
//   1. discovery -- described-state count, start state, alphabet
//   2. a fold over the transition facts into the dense `Delta`
// followed by the path-count precomputation. Nothing is observable until
// every step has succeeded.

use hashbrown::HashSet;
use num_bigint::BigUint;

use crate::DfaError;
use crate::alphabet::Alphabet;
use crate::format::{self, Fact};
use crate::table::PathCounts;

/// Dense state identifier. Described states are `0..n`; the dead state is `n`.
pub type StateId = u32;

/// Construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfaOptions {
    /// Slice length `L`: tables cover lengths `0..=max_len`, and `rank`/`unrank`
    /// work on words of exactly this length.
    pub max_len: usize,
    /// Reject ranks `>= count_words(L, L)` in `unrank`. When disabled, an
    /// out-of-range rank yields some word of length `L` instead of an error.
    pub check_unrank_range: bool,
}

impl DfaOptions {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            check_unrank_range: true,
        }
    }
}

/// Total transition function, stored row-major: `state_count x symbol_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    state_count: usize,
    symbol_count: usize,
    targets: Vec<StateId>,
}

impl Delta {
    /// A table where every `(state, symbol)` pair leads to `target`.
    pub(crate) fn filled(state_count: usize, symbol_count: usize, target: StateId) -> Self {
        Self {
            state_count,
            symbol_count,
            targets: vec![target; state_count * symbol_count],
        }
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    #[inline]
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Successor of `state` on dense symbol index `symbol`.
    #[inline]
    pub fn target(&self, state: StateId, symbol: usize) -> StateId {
        self.targets[state as usize * self.symbol_count + symbol]
    }

    /// Successors of `state`, indexed by dense symbol index.
    #[inline]
    pub fn row(&self, state: StateId) -> &[StateId] {
        let start = state as usize * self.symbol_count;
        &self.targets[start..start + self.symbol_count]
    }

    pub(crate) fn set(&mut self, state: StateId, symbol: usize, target: StateId) {
        self.targets[state as usize * self.symbol_count + symbol] = target;
    }

    /// Whether every symbol leads `state` to the same successor.
    pub fn is_uniform(&self, state: StateId) -> bool {
        self.row(state).windows(2).all(|pair| pair[0] == pair[1])
    }
}

/// Result of the discovery pass.
struct Prelude {
    /// Number of distinct states named as a transition source or as final.
    described_states: usize,
    /// Raw id of the first transition's source.
    start: i64,
    alphabet: Alphabet,
}

impl Prelude {
    fn discover(facts: &[Fact]) -> Result<Self, DfaError> {
        let mut states = HashSet::new();
        let mut symbols = Vec::new();
        let mut start = None;

        for fact in facts {
            match *fact {
                Fact::Transition { src, symbol_in, .. } => {
                    states.insert(src);
                    symbols.push(symbol_byte(symbol_in)?);
                    start.get_or_insert(src);
                }
                Fact::Final { state } => {
                    states.insert(state);
                }
            }
        }

        let alphabet = Alphabet::from_observed(symbols);
        if alphabet.is_empty() {
            return Err(DfaError::EmptyAlphabet);
        }

        Ok(Self {
            described_states: states.len(),
            start: start.unwrap_or(0),
            alphabet,
        })
    }

    fn dead_state(&self) -> StateId {
        self.described_states as StateId
    }

    /// Validate a raw id against `0..described_states`.
    fn state(&self, id: i64) -> Result<StateId, DfaError> {
        usize::try_from(id)
            .ok()
            .filter(|&state| state < self.described_states)
            .and_then(|state| StateId::try_from(state).ok())
            .ok_or(DfaError::InvalidState {
                state: id,
                count: self.described_states,
            })
    }

    /// Second pass: fold the transition facts into a total transition table.
    fn delta(&self, facts: &[Fact]) -> Result<Delta, DfaError> {
        let dead = self.dead_state();
        let initial = Delta::filled(self.described_states + 1, self.alphabet.len(), dead);

        facts.iter().try_fold(initial, |mut delta, fact| -> Result<Delta, DfaError> {
            if let Fact::Transition {
                src,
                dst,
                symbol_in,
                ..
            } = *fact
            {
                let src = self.state(src)?;
                let dst = self.state(dst)?;
                let byte = symbol_byte(symbol_in)?;
                let symbol = self
                    .alphabet
                    .index_of(byte)
                    .ok_or(DfaError::InvalidSymbol { symbol: symbol_in })?;

                let current = delta.target(src, symbol);
                if current != dead && current != dst {
                    return Err(DfaError::Nondeterministic {
                        state: src,
                        symbol: byte,
                    });
                }
                delta.set(src, symbol, dst);
            }
            Ok(delta)
        })
    }

    fn finals(&self, facts: &[Fact]) -> Result<Vec<bool>, DfaError> {
        let mut finals = vec![false; self.described_states + 1];
        for fact in facts {
            if let Fact::Final { state } = *fact {
                finals[self.state(state)? as usize] = true;
            }
        }
        Ok(finals)
    }
}

fn symbol_byte(symbol: i64) -> Result<u8, DfaError> {
    u8::try_from(symbol).map_err(|_| DfaError::InvalidSymbol { symbol })
}

/// A validated dense DFA together with its path-count tables.
///
/// Immutable once constructed; `rank`, `unrank` and `count_words` only read
/// and may be called concurrently.
pub struct Dfa {
    pub(crate) options: DfaOptions,
    pub(crate) start: StateId,
    pub(crate) alphabet: Alphabet,
    pub(crate) delta: Delta,
    pub(crate) finals: Vec<bool>,
    pub(crate) uniform: Vec<bool>,
    pub(crate) counts: PathCounts,
}

impl std::fmt::Debug for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dfa")
            .field("max_len", &self.options.max_len)
            .field("start", &self.start)
            .field("state_count", &self.delta.state_count())
            .field("symbol_count", &self.alphabet.len())
            .field("final_count", &self.finals.iter().filter(|f| **f).count())
            .finish()
    }
}

impl Dfa {
    /// Build a DFA from its text description with slice length `max_len`.
    pub fn new(description: &str, max_len: usize) -> Result<Self, DfaError> {
        Self::with_options(description, DfaOptions::new(max_len))
    }

    /// Build a DFA from its text description.
    pub fn with_options(description: &str, options: DfaOptions) -> Result<Self, DfaError> {
        let facts = format::parse_description(description)?;
        log::debug!("parsed {} automaton facts", facts.len());
        Self::from_facts(&facts, options)
    }

    /// Build a DFA from already-parsed facts.
    pub fn from_facts(facts: &[Fact], options: DfaOptions) -> Result<Self, DfaError> {
        let prelude = Prelude::discover(facts)?;
        let delta = prelude.delta(facts)?;
        let finals = prelude.finals(facts)?;
        let start = prelude.state(prelude.start)?;

        let uniform = (0..delta.state_count())
            .map(|state| delta.is_uniform(state as StateId))
            .collect();

        log::debug!(
            "automaton: {} states (dead state {}), {} symbols, start {}",
            delta.state_count(),
            prelude.dead_state(),
            prelude.alphabet.len(),
            start
        );

        let counts = PathCounts::build(&delta, &finals, options.max_len);

        Ok(Self {
            options,
            start,
            alphabet: prelude.alphabet,
            delta,
            finals,
            uniform,
            counts,
        })
    }

    pub fn options(&self) -> &DfaOptions {
        &self.options
    }

    /// Slice length `L`.
    pub fn max_len(&self) -> usize {
        self.options.max_len
    }

    pub fn start_state(&self) -> StateId {
        self.start
    }

    /// The implicit non-accepting sink; always the last state.
    pub fn dead_state(&self) -> StateId {
        (self.delta.state_count() - 1) as StateId
    }

    /// Number of states, including the dead state.
    pub fn state_count(&self) -> usize {
        self.delta.state_count()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn delta(&self) -> &Delta {
        &self.delta
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.get(state as usize).copied().unwrap_or(false)
    }

    /// Whether all of `state`'s transitions share one successor.
    pub fn is_uniform(&self, state: StateId) -> bool {
        self.uniform.get(state as usize).copied().unwrap_or(false)
    }

    /// Successor of `state` on `byte`, or `None` if either is unknown.
    pub fn next_state(&self, state: StateId, byte: u8) -> Option<StateId> {
        if state as usize >= self.delta.state_count() {
            return None;
        }
        let symbol = self.alphabet.index_of(byte)?;
        Some(self.delta.target(state, symbol))
    }

    /// Number of words of length `len` that lead from `state` to a final state.
    pub fn path_count(&self, state: StateId, len: usize) -> Option<&BigUint> {
        self.counts.count(state, len)
    }

    /// Plain membership test, for a word of any length.
    pub fn accepts(&self, word: impl AsRef<[u8]>) -> bool {
        word.as_ref()
            .iter()
            .try_fold(self.start, |state, &byte| self.next_state(state, byte))
            .is_some_and(|state| self.is_final(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A_THEN_FINAL: &str = "0\t1\t97\t97\n1\n";

    #[test]
    fn dead_state_is_appended() {
        let dfa = Dfa::new(A_THEN_FINAL, 1).unwrap();
        assert_eq!(dfa.state_count(), 3);
        assert_eq!(dfa.dead_state(), 2);
        assert!(!dfa.is_final(2));
        assert_eq!(dfa.delta().row(2), &[2]);
        // State 1 has no outgoing transitions of its own.
        assert_eq!(dfa.delta().row(1), &[2]);
    }

    #[test]
    fn start_state_is_first_transition_source() {
        let text = "1\t0\t97\t97\n0\t0\t97\t97\n0\n";
        let dfa = Dfa::new(text, 2).unwrap();
        assert_eq!(dfa.start_state(), 1);
    }

    #[test]
    fn final_state_with_outgoing_transitions() {
        let text = "0\t0\t120\t120\n0\n";
        let dfa = Dfa::new(text, 3).unwrap();
        assert!(dfa.is_final(0));
        assert_eq!(dfa.delta().target(0, 0), 0);
    }

    #[test]
    fn alphabet_in_first_seen_order() {
        let text = "0\t1\t99\t99\n0\t1\t97\t97\n1\t1\t98\t98\n1\n";
        let dfa = Dfa::new(text, 1).unwrap();
        assert_eq!(dfa.alphabet().symbols(), b"cab");
        assert_eq!(dfa.next_state(0, b'a'), Some(1));
        assert_eq!(dfa.next_state(0, b'b'), Some(dfa.dead_state()));
        assert_eq!(dfa.next_state(0, b'z'), None);
        assert_eq!(dfa.next_state(9, b'a'), None);
    }

    #[test]
    fn reject_state_gap() {
        // Two described states, but one is labeled 5.
        let err = Dfa::new("0\t5\t97\t97\n5\n", 1).unwrap_err();
        assert_eq!(err, DfaError::InvalidState { state: 5, count: 2 });
    }

    #[test]
    fn reject_reference_to_state_n() {
        // States 0 and 1 are described; the transition targets 2.
        let err = Dfa::new("0\t1\t97\t97\n1\t2\t97\t97\n1\n", 1).unwrap_err();
        assert_eq!(err, DfaError::InvalidState { state: 2, count: 2 });
    }

    #[test]
    fn reject_negative_state() {
        let err = Dfa::new("0\t0\t97\t97\n-1\n", 1).unwrap_err();
        assert!(matches!(err, DfaError::InvalidState { state: -1, .. }));
    }

    #[test]
    fn reject_symbol_out_of_byte_range() {
        let err = Dfa::new("0\t0\t256\t97\n0\n", 1).unwrap_err();
        assert_eq!(err, DfaError::InvalidSymbol { symbol: 256 });

        let err = Dfa::new("0\t0\t-3\t97\n0\n", 1).unwrap_err();
        assert_eq!(err, DfaError::InvalidSymbol { symbol: -3 });
    }

    #[test]
    fn symbol_out_is_not_range_checked() {
        assert!(Dfa::new("0\t0\t97\t1000\n0\n", 1).is_ok());
    }

    #[test]
    fn reject_empty_alphabet() {
        assert_eq!(Dfa::new("0\n", 0).unwrap_err(), DfaError::EmptyAlphabet);
        assert_eq!(Dfa::new("", 0).unwrap_err(), DfaError::EmptyAlphabet);
    }

    #[test]
    fn reject_conflicting_transitions() {
        let text = "0\t1\t97\t97\n0\t0\t97\t97\n1\n";
        let err = Dfa::new(text, 1).unwrap_err();
        assert_eq!(
            err,
            DfaError::Nondeterministic {
                state: 0,
                symbol: b'a'
            }
        );
    }

    #[test]
    fn duplicate_identical_transitions_are_accepted() {
        let text = "0\t1\t97\t97\n0\t1\t97\t97\n1\n";
        assert!(Dfa::new(text, 1).is_ok());
    }

    #[test]
    fn format_errors_abort_construction() {
        let err = Dfa::new("0\t1\t97\t97\n1\t2\n1\n", 1).unwrap_err();
        assert!(matches!(err, DfaError::Format { line: 2, .. }));
    }

    #[test]
    fn uniform_states() {
        // State 0 goes to 1 on both symbols; state 1 only has 'a'.
        let text = "0\t1\t97\t97\n0\t1\t98\t98\n1\t1\t97\t97\n1\n";
        let dfa = Dfa::new(text, 1).unwrap();
        assert!(dfa.is_uniform(0));
        assert!(!dfa.is_uniform(1));
        assert!(dfa.is_uniform(dfa.dead_state()));
        assert!(!dfa.is_uniform(42));
    }

    #[test]
    fn accepts_words_of_any_length() {
        let text = "0\t0\t97\t97\n0\t1\t98\t98\n1\n";
        let dfa = Dfa::new(text, 1).unwrap();
        assert!(dfa.accepts(b"b"));
        assert!(dfa.accepts(b"aaab"));
        assert!(!dfa.accepts(b""));
        assert!(!dfa.accepts(b"ba"));
        assert!(!dfa.accepts(b"ac"));
    }

    #[test]
    fn debug_omits_tables() {
        let dfa = Dfa::new(A_THEN_FINAL, 4).unwrap();
        let text = format!("{dfa:?}");
        assert!(text.starts_with("Dfa {"));
        assert!(text.contains("state_count: 3"));
    }

    #[test]
    fn from_facts_matches_text_construction() {
        let facts = format::parse_description(A_THEN_FINAL).unwrap();
        let dfa = Dfa::from_facts(&facts, DfaOptions::new(1)).unwrap();
        assert_eq!(dfa.path_count(0, 1), Some(&BigUint::from(1u32)));
    }
}
