//! Token generation.

use super::source::{RandSource, SeededRandom};
use std::{fmt, sync::Arc};

/// Letters a token is drawn from.
pub const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default token length.
pub const DEFAULT_TOKEN_LENGTH: usize = 6;

// Each draw is split into 6-bit chunks; 2^6 covers the 52-letter alphabet.
const INDEX_BITS: u32 = 6;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;
const CHUNKS_PER_DRAW: u32 = 63 / INDEX_BITS;

/// An immutable fixed-length string of alphabet letters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Generates tokens from a shared [`RandSource`].
///
/// Cloning is cheap and clones share the same source.
///
/// # Example
///
/// ```rust
/// use recent_tokens::token::{TokenGenerator, ALPHABET};
///
/// let generator = TokenGenerator::new(6);
/// let token = generator.next();
/// assert_eq!(token.as_str().len(), 6);
/// assert!(token.as_str().bytes().all(|b| ALPHABET.contains(&b)));
/// ```
#[derive(Clone)]
pub struct TokenGenerator {
    source: Arc<dyn RandSource>,
    length: usize,
}

impl TokenGenerator {
    /// Generator with a time-seeded [`SeededRandom`] source.
    pub fn new(length: usize) -> Self {
        Self::with_source(Arc::new(SeededRandom::from_time()), length)
    }

    pub fn with_source(source: Arc<dyn RandSource>, length: usize) -> Self {
        Self { source, length }
    }

    /// Configured token length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate a token of the configured length.
    pub fn next(&self) -> Token {
        self.generate(self.length)
    }

    /// Generate a token of exactly `length` letters.
    ///
    /// One draw from the source yields up to ten letters; chunks that fall
    /// outside the alphabet are skipped rather than folded, so every letter
    /// is equally likely. Letters are filled from the last position back to
    /// the first. A zero length costs no draw.
    pub fn generate(&self, length: usize) -> Token {
        if length == 0 {
            return Token(String::new());
        }

        let mut buf = vec![0u8; length];
        let mut bits = self.source.next_u63();
        let mut remaining = CHUNKS_PER_DRAW;
        let mut filled = 0;

        while filled < length {
            if remaining == 0 {
                bits = self.source.next_u63();
                remaining = CHUNKS_PER_DRAW;
            }
            let idx = (bits & INDEX_MASK) as usize;
            if let Some(&letter) = ALPHABET.get(idx) {
                filled += 1;
                buf[length - filled] = letter;
            }
            bits >>= INDEX_BITS;
            remaining -= 1;
        }

        // Every byte comes from the ASCII alphabet.
        Token(buf.into_iter().map(char::from).collect())
    }
}

impl fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGenerator")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Replays a fixed list of draws, then zeros.
    struct Scripted {
        draws: Mutex<VecDeque<u64>>,
        calls: Mutex<usize>,
    }

    impl Scripted {
        fn new(draws: &[u64]) -> Arc<Self> {
            Arc::new(Self {
                draws: Mutex::new(draws.iter().copied().collect()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock()
        }
    }

    impl RandSource for Scripted {
        fn next_u63(&self) -> u64 {
            *self.calls.lock() += 1;
            self.draws.lock().pop_front().unwrap_or(0)
        }
    }

    #[test]
    fn test_token_length_and_alphabet() {
        let generator = TokenGenerator::with_source(Arc::new(SeededRandom::from_seed(1)), 6);
        for length in 1..=64 {
            let token = generator.generate(length);
            assert_eq!(token.as_str().len(), length);
            assert!(token.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_next_uses_configured_length() {
        let generator = TokenGenerator::new(DEFAULT_TOKEN_LENGTH);
        assert_eq!(generator.length(), 6);
        assert_eq!(generator.next().as_str().len(), 6);
    }

    #[test]
    fn test_zero_length_is_empty() {
        let source = Scripted::new(&[]);
        let generator = TokenGenerator::with_source(source.clone(), 6);
        assert_eq!(generator.generate(0).as_str(), "");
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_out_of_range_chunks_are_skipped() {
        // chunk 0 = 63 (skipped), chunk 1 = 1 ('b'), then zeros ('a').
        // The first accepted letter lands in the last position.
        let source = Scripted::new(&[63 | (1 << 6)]);
        let generator = TokenGenerator::with_source(source.clone(), 3);
        assert_eq!(generator.next().as_str(), "aab");
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_refills_after_ten_chunks() {
        // Ten rejected chunks exhaust the first draw; the second yields 'Z'.
        let source = Scripted::new(&[u64::MAX >> 1, 51]);
        let generator = TokenGenerator::with_source(source.clone(), 2);
        assert_eq!(generator.next().as_str(), "aZ");
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_one_draw_covers_ten_letters() {
        let source = Scripted::new(&[]);
        let generator = TokenGenerator::with_source(source.clone(), 10);
        assert_eq!(generator.next().as_str(), "aaaaaaaaaa");
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_concurrent_generation() {
        let generator = TokenGenerator::new(6);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || {
                    (0..500)
                        .map(|_| generator.next())
                        .all(|t| t.as_str().len() == 6)
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
