//! Engine configuration: defaults, overridable from the environment.

use std::{env::VarError, str::FromStr, fmt::Display};

use anyhow::{Result, Context, anyhow, bail};
use lazy_static::lazy_static;
use tracing::warn;

use crate::error::MashupError;

/// Default length of the correlation tokens of async views.
pub const TOKEN_LENGTH: usize = 16;

/// How many nested mashups may be entered before a render is aborted
/// as cyclic.
pub const MAX_NESTING_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Every generated token has exactly this many characters.
    pub token_length: usize,
    pub max_nesting_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            token_length: TOKEN_LENGTH,
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

lazy_static! {
    /// Used by `Mashup::render`. Read from the environment on first
    /// use; falls back to the defaults if the env vars are invalid.
    pub static ref DEFAULT_CONFIG: Config = Config::from_env_or_default();
}

impl Config {
    pub fn new(token_length: usize, max_nesting_depth: usize)
               -> Result<Self, MashupError>
    {
        let config = Config { token_length, max_nesting_depth };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MashupError> {
        if self.token_length == 0 {
            return Err(MashupError::InvalidConfig(
                "token_length must be positive".into()))
        }
        if self.max_nesting_depth == 0 {
            return Err(MashupError::InvalidConfig(
                "max_nesting_depth must be positive".into()))
        }
        Ok(())
    }

    /// Read `MASHUP_TOKEN_LENGTH` and `MASHUP_MAX_NESTING_DEPTH`,
    /// falling back to the defaults for unset vars.
    pub fn from_env() -> Result<Self> {
        let config = Config {
            token_length: getenv_parsed("MASHUP_TOKEN_LENGTH", TOKEN_LENGTH)?,
            max_nesting_depth: getenv_parsed("MASHUP_MAX_NESTING_DEPTH",
                                             MAX_NESTING_DEPTH)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// `from_env`, logging a warning and using the defaults on error.
    pub fn from_env_or_default() -> Self {
        match Self::from_env() {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring environment for mashup config: {e:#}");
                Self::default()
            }
        }
    }
}

/// Get an env var as a String; decoding failures are reported as
/// errors.
pub fn getenv(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e {
            VarError::NotPresent => Ok(None),
            VarError::NotUnicode(_) => bail!("{name:?} env var is not unicode"),
        }
    }
}

/// Like `getenv` but with a fallback for when the var is not set.
pub fn getenv_or(name: &str, fallbackvalue: &str) -> Result<String> {
    Ok(getenv(name)?.unwrap_or_else(|| fallbackvalue.to_string()))
}

fn getenv_parsed<T>(name: &str, fallbackvalue: T) -> Result<T>
where T: FromStr,
      T::Err: Display
{
    match getenv(name)? {
        Some(s) => s.trim().parse().map_err(
            |e| anyhow!("{e}")).with_context(
            || anyhow!("parsing {name:?} env var value {s:?}")),
        None => Ok(fallbackvalue)
    }
}
