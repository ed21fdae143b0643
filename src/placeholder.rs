//! Placeholder markers, the one substitution operation, and container
//! resolution.

use kstring::KString;

/// Stands for a view's rendered content inside its own container.
pub const CONTENT_MARKER: &str = "{{ content }}";

/// Stands for a slot's wrapped view output inside an outer mashup
/// container.
pub const MASHUP_MARKER: &str = "{{ mashup }}";

/// Stands for the correlation token inside async loader fragments.
pub const TOKEN_MARKER: &str = "{{ token }}";

/// Stands for the target URL inside async loader fragments.
pub const URL_MARKER: &str = "{{ url }}";

/// Replace every occurrence of `marker` in `template` with `value`. A
/// template without the marker comes back unchanged.
pub fn substitute(template: &str, marker: &str, value: &str) -> String {
    template.replace(marker, value)
}

/// Build a container template around `CONTENT_MARKER`, e.g.
/// `container("<div>", "</div>")`.
pub fn container(before: &str, after: &str) -> String {
    format!("{before}{CONTENT_MARKER}{after}")
}

/// Build an outer container template around `MASHUP_MARKER`.
pub fn mashup_container(before: &str, after: &str) -> String {
    format!("{before}{MASHUP_MARKER}{after}")
}

fn non_empty(s: &Option<KString>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// The container of a view: given on the instance, declared as the
/// default of a kind of view, or neither. An empty string counts as
/// not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSpec {
    instance: Option<KString>,
    default: Option<KString>,
}

impl ContainerSpec {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_instance(mut self, template: impl Into<KString>) -> Self {
        self.instance = Some(template.into());
        self
    }

    pub fn with_default(mut self, template: impl Into<KString>) -> Self {
        self.default = Some(template.into());
        self
    }

    /// Instance beats default beats nothing.
    pub fn resolve(&self) -> Option<&str> {
        non_empty(&self.instance).or_else(|| non_empty(&self.default))
    }

    /// Substitute `content` into the resolved container, or pass it
    /// through unwrapped.
    pub fn wrap(&self, content: String) -> String {
        match self.resolve() {
            Some(template) => substitute(template, CONTENT_MARKER, &content),
            None => content
        }
    }
}
