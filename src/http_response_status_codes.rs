//! The response statuses the HTTP adapter produces.

// https://developer.mozilla.org/en-US/docs/Web/HTTP/Status

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpResponseStatusCode {
    OK200,
    NotFound404,
    MethodNotAllowed405,
    InternalServerError500,
    NotImplemented501,
}

impl HttpResponseStatusCode {
    pub fn code(self) -> u16 {
        match self {
            Self::OK200 => 200,
            Self::NotFound404 => 404,
            Self::MethodNotAllowed405 => 405,
            Self::InternalServerError500 => 500,
            Self::NotImplemented501 => 501,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::OK200 => "OK",
            Self::NotFound404 => "Not Found",
            Self::MethodNotAllowed405 => "Method Not Allowed",
            Self::InternalServerError500 => "Internal Server Error",
            Self::NotImplemented501 => "Not Implemented",
        }
    }

    /// Shown on error pages.
    pub fn desc(self) -> &'static str {
        match self {
            Self::OK200 => "The request succeeded.",
            Self::NotFound404 => "There is nothing at this address.",
            Self::MethodNotAllowed405 =>
                "The request method is not supported by this resource.",
            Self::InternalServerError500 =>
                "The server failed to produce this page.",
            Self::NotImplemented501 =>
                "The request method is not supported by the server.",
        }
    }
}
