//! The orchestrator: picks the view-set for the request method,
//! renders and wraps each view, wraps each slot in its outer
//! container, concatenates.

use std::{collections::{BTreeMap, BTreeSet}, fmt::Debug, sync::Arc};

use kstring::KString;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{config::{Config, DEFAULT_CONFIG},
            error::Result,
            http_request_method::HttpRequestMethod,
            placeholder::{substitute, CONTENT_MARKER, MASHUP_MARKER},
            view::{RenderContext, View}};

pub type ViewSet = Vec<Arc<dyn View>>;
pub type ContainerSet = Vec<KString>;

/// Anything that renders to a whole body for a given context. Nested
/// views hold one of these.
pub trait Compose: Debug + Send + Sync {
    fn compose(&self, ctx: &RenderContext) -> Result<Vec<u8>>;
}

/// The methods a mashup answers when not told otherwise.
pub const DEFAULT_SUPPORTED_METHODS: &[HttpRequestMethod] =
    &[HttpRequestMethod::GET, HttpRequestMethod::POST];

/// One default entry plus optional per-method entries.
#[derive(Debug, Clone)]
struct PerMethod<T> {
    default: Option<T>,
    by_method: BTreeMap<HttpRequestMethod, T>,
}

impl<T> Default for PerMethod<T> {
    fn default() -> Self {
        PerMethod { default: None, by_method: BTreeMap::new() }
    }
}

impl<T> PerMethod<T> {
    /// `None` means the default entry.
    fn get(&self, method: Option<HttpRequestMethod>) -> Option<&T> {
        match method {
            Some(m) => self.by_method.get(&m).or(self.default.as_ref()),
            None => self.default.as_ref()
        }
    }
}

/// Outcome of a render, for transports that want to distinguish an
/// unsupported method from an empty composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// False if the mashup does not answer the method; `body` is
    /// empty then.
    pub allowed: bool,
    pub body: Vec<u8>,
}

/// A configuration mistake found by `Mashup::check`. None of these
/// stop rendering. `method` is `None` for the default sets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("{} view {index}: container has no {:?} marker",
            method_name(.method), CONTENT_MARKER)]
    ViewContainerWithoutMarker { method: Option<HttpRequestMethod>, index: usize },

    #[error("{} container {index}: has no {:?} marker",
            method_name(.method), MASHUP_MARKER)]
    ContainerWithoutMarker { method: Option<HttpRequestMethod>, index: usize },

    #[error("{} container {index}: uses {:?} instead of {:?}",
            method_name(.method), CONTENT_MARKER, MASHUP_MARKER)]
    ContentMarkerInContainer { method: Option<HttpRequestMethod>, index: usize },

    #[error("{}: {views} views but {containers} containers, \
             unmatched slots stay unwrapped", method_name(.method))]
    ContainerCountMismatch { method: Option<HttpRequestMethod>,
                             views: usize, containers: usize },
}

fn method_name(method: &Option<HttpRequestMethod>) -> &'static str {
    method.map(|m| m.as_str()).unwrap_or("default")
}

#[derive(Debug)]
pub struct Mashup {
    name: KString,
    views: PerMethod<ViewSet>,
    containers: PerMethod<ContainerSet>,
    supported: BTreeSet<HttpRequestMethod>,
}

impl Mashup {
    pub fn builder() -> MashupBuilder {
        MashupBuilder::default()
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn supports(&self, method: HttpRequestMethod) -> bool {
        self.supported.contains(&method)
    }

    pub fn supported_methods(&self) -> impl Iterator<Item = HttpRequestMethod> + '_ {
        self.supported.iter().copied()
    }

    pub fn default_views(&self) -> Option<&[Arc<dyn View>]> {
        self.views.default.as_deref()
    }

    /// The view-set `method` renders: its own, else the default one.
    pub fn views_for(&self, method: HttpRequestMethod) -> Option<&[Arc<dyn View>]> {
        self.views.get(Some(method)).map(|v| v.as_slice())
    }

    pub fn default_containers(&self) -> Option<&[KString]> {
        self.containers.default.as_deref()
    }

    pub fn containers_for(&self, method: HttpRequestMethod) -> Option<&[KString]> {
        self.containers.get(Some(method)).map(|v| v.as_slice())
    }

    /// Render with the process-wide default configuration.
    pub fn render(&self, method: HttpRequestMethod) -> Result<Vec<u8>> {
        self.render_with(&DEFAULT_CONFIG, method)
    }

    pub fn render_with(&self, config: &Config, method: HttpRequestMethod)
                       -> Result<Vec<u8>>
    {
        self.compose(&RenderContext::new(config, method)?)
    }

    pub fn respond(&self, config: &Config, method: HttpRequestMethod)
                   -> Result<Rendered>
    {
        if self.supports(method) {
            Ok(Rendered { allowed: true, body: self.render_with(config, method)? })
        } else {
            Ok(Rendered { allowed: false, body: Vec::new() })
        }
    }

    /// Look for configuration mistakes. An empty result means every
    /// container has its marker and every method has as many outer
    /// containers as views (or none).
    pub fn check(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let viewsets = self.views.default.iter().map(|v| (None, v))
            .chain(self.views.by_method.iter().map(|(m, v)| (Some(*m), v)));
        for (method, views) in viewsets {
            for (index, view) in views.iter().enumerate() {
                if let Some(c) = view.container() {
                    if !c.contains(CONTENT_MARKER) {
                        issues.push(ConfigIssue::ViewContainerWithoutMarker {
                            method, index });
                    }
                }
            }
        }

        let containersets = self.containers.default.iter().map(|c| (None, c))
            .chain(self.containers.by_method.iter().map(|(m, c)| (Some(*m), c)));
        for (method, containers) in containersets {
            for (index, c) in containers.iter().enumerate() {
                if c.contains(CONTENT_MARKER) {
                    issues.push(ConfigIssue::ContentMarkerInContainer { method, index });
                } else if !c.contains(MASHUP_MARKER) {
                    issues.push(ConfigIssue::ContainerWithoutMarker { method, index });
                }
            }
        }

        let mut keys: BTreeSet<Option<HttpRequestMethod>> = BTreeSet::new();
        if self.views.default.is_some() {
            keys.insert(None);
        }
        keys.extend(self.views.by_method.keys().map(|m| Some(*m)));
        keys.extend(self.containers.by_method.keys().map(|m| Some(*m)));
        for method in keys {
            if let (Some(views), Some(containers)) =
                (self.views.get(method), self.containers.get(method))
            {
                if views.len() != containers.len() {
                    issues.push(ConfigIssue::ContainerCountMismatch {
                        method, views: views.len(), containers: containers.len() });
                }
            }
        }
        issues
    }
}

impl Compose for Mashup {
    fn compose(&self, ctx: &RenderContext) -> Result<Vec<u8>> {
        let method = ctx.method();
        if !self.supports(method) {
            debug!(mashup = %self.name, %method, "method not supported, empty body");
            return Ok(Vec::new())
        }
        let views = match self.views.get(Some(method)) {
            Some(views) => views,
            None => return Ok(Vec::new())
        };
        debug!(mashup = %self.name, %method, depth = ctx.depth(),
               views = views.len(), "rendering");

        let mut slots = views.iter()
            .map(|view| view.wrapped(ctx))
            .collect::<Result<Vec<String>>>()?;

        if let Some(containers) = self.containers.get(Some(method)) {
            // Zip to the shorter one: surplus slots stay as they are,
            // surplus containers are unused.
            for (slot, container) in slots.iter_mut().zip(containers) {
                let wrapped = substitute(container, MASHUP_MARKER, slot.as_str());
                *slot = wrapped;
            }
        }
        Ok(slots.concat().into_bytes())
    }
}

#[derive(Debug, Default)]
pub struct MashupBuilder {
    name: Option<KString>,
    views: PerMethod<ViewSet>,
    containers: PerMethod<ContainerSet>,
    supported: Option<BTreeSet<HttpRequestMethod>>,
}

impl MashupBuilder {
    /// Used in log messages only.
    pub fn name(mut self, name: impl Into<KString>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The view-set for every supported method that has none of its
    /// own.
    pub fn views(mut self, views: ViewSet) -> Self {
        self.views.default = Some(views);
        self
    }

    /// Declaring views for a method also makes the mashup support it.
    pub fn method_views(mut self, method: HttpRequestMethod, views: ViewSet) -> Self {
        self.views.by_method.insert(method, views);
        self
    }

    pub fn containers<S: Into<KString>>(
        mut self, containers: impl IntoIterator<Item = S>
    ) -> Self {
        self.containers.default = Some(containers.into_iter().map(Into::into).collect());
        self
    }

    pub fn method_containers<S: Into<KString>>(
        mut self, method: HttpRequestMethod, containers: impl IntoIterator<Item = S>
    ) -> Self {
        self.containers.by_method.insert(
            method, containers.into_iter().map(Into::into).collect());
        self
    }

    /// Replace `DEFAULT_SUPPORTED_METHODS`.
    pub fn supported_methods(
        mut self, methods: impl IntoIterator<Item = HttpRequestMethod>
    ) -> Self {
        self.supported = Some(methods.into_iter().collect());
        self
    }

    /// Configuration mistakes are logged as warnings, see
    /// `Mashup::check`.
    pub fn build(self) -> Mashup {
        let mut supported = self.supported.unwrap_or_else(
            || DEFAULT_SUPPORTED_METHODS.iter().copied().collect());
        supported.extend(self.views.by_method.keys().copied());
        let mashup = Mashup {
            name: self.name.unwrap_or_else(|| KString::from_static("mashup")),
            views: self.views,
            containers: self.containers,
            supported,
        };
        for issue in mashup.check() {
            warn!(mashup = %mashup.name, "{issue}");
        }
        mashup
    }
}
