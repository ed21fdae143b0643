//! Compose small HTML views into one response body.
//!
//! A [`mashup::Mashup`] holds, per request method, an ordered set of
//! [`view::View`]s and optionally an ordered set of outer containers.
//! Rendering wraps each view's content in its own container (if any),
//! each resulting slot in the outer container at the same position
//! (if any), and concatenates the slots.

pub mod config;
pub mod error;
pub mod handler;
pub mod http_request_method;
pub mod http_response_status_codes;
pub mod mashup;
pub mod placeholder;
pub mod token;
pub mod view;

pub use error::{MashupError, Result};
pub use http_request_method::HttpRequestMethod;
pub use mashup::{Compose, Mashup, MashupBuilder, Rendered};
pub use view::{HtmlView, NestedView, UrlView, View, ViewClass};
