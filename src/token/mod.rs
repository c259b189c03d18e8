//! Pseudo-random token generation.

mod generator;
mod source;

pub use generator::{Token, TokenGenerator, ALPHABET, DEFAULT_TOKEN_LENGTH};
pub use source::{RandSource, SeededRandom};
