//! Correlation tokens linking an async loader script to its DOM slot.

use rand::{Rng, distributions::Alphanumeric, prelude::thread_rng};

use crate::error::MashupError;

/// Draws fresh tokens of a fixed length. Holds no state besides the
/// length: randomness comes from the thread-local generator, so
/// concurrent renders never share a seed or counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenGenerator {
    length: usize,
}

impl TokenGenerator {
    pub fn new(length: usize) -> Result<Self, MashupError> {
        if length == 0 {
            return Err(MashupError::InvalidConfig(
                "token length must be positive".into()))
        }
        Ok(TokenGenerator { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// ASCII alphanumeric, starting with a letter so that it is
    /// usable as a DOM id and CSS selector as is.
    pub fn generate(&self) -> String {
        let mut rng = thread_rng();
        let mut token = String::with_capacity(self.length);
        let first: u8 = rng.gen_range(0..26);
        token.push(char::from(b'a' + first));
        token.extend(
            (&mut rng).sample_iter(&Alphanumeric)
                .take(self.length - 1)
                .map(char::from));
        token
    }
}
