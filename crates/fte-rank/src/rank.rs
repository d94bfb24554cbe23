// Ranking engine: rank, unrank and count_words over the path-count tables.
//
// Words of length L are enumerated in lexicographic order of their dense
// symbol indices. At 1-based position i in state q, the cumulative row
// cumulative[q][i] partitions the remaining ranks by the symbol chosen there.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::DfaError;
use crate::dfa::Dfa;

impl Dfa {
    /// Number of accepted words whose length lies in `min_len..=max_len`.
    ///
    /// Requires `min_len <= max_len <= self.max_len()`.
    pub fn count_words(&self, min_len: usize, max_len: usize) -> Result<BigUint, DfaError> {
        if min_len > max_len || max_len > self.options.max_len {
            return Err(DfaError::InvalidLengthRange {
                min: min_len,
                max: max_len,
                max_len: self.options.max_len,
            });
        }

        Ok((min_len..=max_len)
            .filter_map(|len| self.counts.count(self.start, len))
            .sum())
    }

    /// Position of `word` among the accepted words of length `max_len()`.
    ///
    /// The result lies in `0..count_words(L, L)`.
    pub fn rank(&self, word: impl AsRef<[u8]>) -> Result<BigUint, DfaError> {
        let word = word.as_ref();
        if word.len() != self.options.max_len {
            log::trace!("rank: rejected word of length {}", word.len());
            return Err(DfaError::LengthMismatch {
                expected: self.options.max_len,
                actual: word.len(),
            });
        }

        let mut rank = BigUint::zero();
        let mut state = self.start;
        for (i, &byte) in word.iter().enumerate() {
            let symbol = self.alphabet.index_of(byte).ok_or_else(|| {
                log::trace!("rank: byte 0x{byte:02x} at position {i} not in alphabet");
                DfaError::SymbolNotInAlphabet { byte, position: i }
            })?;
            rank += &self.counts.cumulative_row(state, i + 1)[symbol];
            state = self.delta.target(state, symbol);
        }

        if !self.is_final(state) {
            log::trace!("rank: walk ended in non-final state {state}");
            return Err(DfaError::NotAccepting);
        }
        Ok(rank)
    }

    /// The accepted word of length `max_len()` at position `rank`.
    ///
    /// With [`DfaOptions::check_unrank_range`](crate::DfaOptions) set (the
    /// default), ranks outside `0..count_words(L, L)` are rejected.
    pub fn unrank(&self, rank: &BigUint) -> Result<Vec<u8>, DfaError> {
        if self.options.check_unrank_range {
            let max_len = self.options.max_len;
            let in_range = self
                .counts
                .count(self.start, max_len)
                .is_some_and(|count| rank < count);
            if !in_range {
                let count = self.count_words(max_len, max_len)?;
                log::trace!("unrank: rank {rank} out of range 0..{count}");
                return Err(DfaError::RankOutOfRange {
                    rank: rank.clone(),
                    count,
                });
            }
        }

        let mut remainder = rank.clone();
        let mut state = self.start;
        let mut word = Vec::with_capacity(self.options.max_len);
        for position in 1..=self.options.max_len {
            let row = self.counts.cumulative_row(state, position);
            // Largest `symbol` with row[symbol] <= remainder; row[0] is always zero.
            let symbol = row[1..].partition_point(|start| start <= &remainder);
            remainder -= &row[symbol];
            word.extend(self.alphabet.symbol(symbol));
            state = self.delta.target(state, symbol);
        }
        Ok(word)
    }
}
