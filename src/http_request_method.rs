//! The closed set of request methods that view-sets can be keyed on.

// https://developer.mozilla.org/en-US/docs/Web/HTTP/Methods

use std::{fmt::Display, str::FromStr};

use crate::error::MashupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpRequestMethod {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    PATCH,
}

impl HttpRequestMethod {
    pub fn members() -> &'static [Self] {
        &[Self::GET, Self::HEAD, Self::POST, Self::PUT, Self::DELETE,
          Self::CONNECT, Self::OPTIONS, Self::TRACE, Self::PATCH]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::HEAD => "HEAD",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::PATCH => "PATCH",
            Self::DELETE => "DELETE",
            Self::OPTIONS => "OPTIONS",
            Self::CONNECT => "CONNECT",
            Self::TRACE => "TRACE",
        }
    }
}

impl FromStr for HttpRequestMethod {
    type Err = MashupError;

    /// Method names are case-sensitive (RFC 9110), so `get` is
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::members()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| MashupError::InvalidMethod(s.into()))
    }
}

impl Display for HttpRequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
