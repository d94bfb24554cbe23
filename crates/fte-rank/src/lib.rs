//! Rank/unrank engine over fixed-length slices of a regular language.
//!
//! Given a minimised DFA (in the tab-separated AT&T-style text format) and a
//! slice length `L`, this crate provides an exact bijection between the
//! integers `0..count` and the accepted words of length `L`, where `count` is
//! the number of such words. Arbitrary-precision integers are used throughout.
//!
//! # Architecture
//!
//! - [`format`] -- Line-oriented automaton description parsing
//! - [`alphabet`] -- Dense symbol-index / byte bijection
//! - [`dfa`] -- Validated dense automaton, construction options, accessors
//! - [`table`] -- Path-count tables (per-state and cumulative-by-symbol)
//! - [`rank`] -- `rank`, `unrank` and `count_words`
//!
//! # Example
//!
//! ```
//! use fte_rank::{BigUint, Dfa};
//!
//! // One state, final, looping on '0' and '1'.
//! let dfa = Dfa::new("0\t0\t48\t48\n0\t0\t49\t49\n0\n", 2).unwrap();
//! assert_eq!(dfa.count_words(2, 2).unwrap(), BigUint::from(4u32));
//! assert_eq!(dfa.rank(b"10").unwrap(), BigUint::from(2u32));
//! assert_eq!(dfa.unrank(&BigUint::from(3u32)).unwrap(), b"11");
//! ```

pub mod alphabet;
pub mod dfa;
pub mod format;
pub mod rank;
pub mod table;

pub use alphabet::Alphabet;
pub use dfa::{Dfa, DfaOptions, StateId};
pub use num_bigint::BigUint;

/// Error type for automaton construction and ranking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DfaError {
    /// A line of the description has the wrong shape.
    #[error("invalid automaton description at line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// A state id outside `0..count`.
    #[error("invalid state {state}: the automaton describes {count} states, labeled 0..{count}")]
    InvalidState { state: i64, count: usize },

    /// An input symbol outside `0..=255`.
    #[error("invalid symbol {symbol}: symbols must be in the range 0..=255")]
    InvalidSymbol { symbol: i64 },

    #[error("automaton description has no transitions")]
    EmptyAlphabet,

    /// Two transitions leave `state` on `symbol` towards different targets.
    #[error("state {state} has conflicting transitions on symbol {symbol}")]
    Nondeterministic { state: StateId, symbol: u8 },

    #[error("byte 0x{byte:02x} at position {position} is not in the alphabet")]
    SymbolNotInAlphabet { byte: u8, position: usize },

    #[error("input does not end in an accepting state")]
    NotAccepting,

    #[error("input has length {actual}, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("rank {rank} is out of range: the slice holds {count} words")]
    RankOutOfRange { rank: BigUint, count: BigUint },

    #[error("invalid word length range {min}..={max} (maximum length is {max_len})")]
    InvalidLengthRange {
        min: usize,
        max: usize,
        max_len: usize,
    },
}
