//! Errors of the composition engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MashupError>;

#[derive(Error, Debug)]
pub enum MashupError {
    /// Nested views went deeper than `Config::max_nesting_depth`;
    /// almost certainly a mashup that (indirectly) contains itself.
    #[error("nested mashups exceed depth {depth}, is a mashup referring to itself?")]
    NestingTooDeep { depth: usize },

    #[error("nested mashup produced a body that is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("invalid http request method {0:?}")]
    InvalidMethod(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
