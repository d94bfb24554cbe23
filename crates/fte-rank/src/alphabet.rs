// Dense alphabet: symbol index <-> byte value.

use hashbrown::HashMap;

/// Bijection between the bytes observed on transitions and the contiguous
/// indices `0..len()`, assigned in first-seen order.
///
/// Index order is the enumeration order used by ranking: a word whose first
/// differing symbol has a smaller index ranks lower.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    /// Maps symbol index to byte.
    symbols: Vec<u8>,
    /// Maps byte to symbol index.
    index: HashMap<u8, usize>,
}

impl Alphabet {
    /// Build an alphabet from bytes in observation order. Repeats are ignored.
    pub fn from_observed<I: IntoIterator<Item = u8>>(bytes: I) -> Self {
        let mut alphabet = Self::default();
        for byte in bytes {
            alphabet.observe(byte);
        }
        alphabet
    }

    fn observe(&mut self, byte: u8) {
        if !self.index.contains_key(&byte) {
            self.index.insert(byte, self.symbols.len());
            self.symbols.push(byte);
        }
    }

    /// Number of symbols (K).
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The dense index of `byte`, if it is in the alphabet.
    #[inline]
    pub fn index_of(&self, byte: u8) -> Option<usize> {
        self.index.get(&byte).copied()
    }

    /// The byte at dense index `index`.
    #[inline]
    pub fn symbol(&self, index: usize) -> Option<u8> {
        self.symbols.get(index).copied()
    }

    /// All symbols, ordered by index.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }
}
