//! Views: the content-producing units a mashup is made of.

use std::{fmt::Debug, sync::Arc};

use kstring::KString;

use crate::{config::Config,
            error::{MashupError, Result},
            http_request_method::HttpRequestMethod,
            mashup::Compose,
            placeholder::{ContainerSpec, substitute, TOKEN_MARKER, URL_MARKER},
            token::TokenGenerator};

// ------------------------------------------------------------------
// Per-call state

/// Everything a single render call carries down into its views. Lives
/// for the duration of one call; definitions never see it.
#[derive(Debug, Clone)]
pub struct RenderContext<'c> {
    config: &'c Config,
    method: HttpRequestMethod,
    depth: usize,
    tokens: TokenGenerator,
}

impl<'c> RenderContext<'c> {
    pub fn new(config: &'c Config, method: HttpRequestMethod) -> Result<Self> {
        config.validate()?;
        Ok(RenderContext {
            config,
            method,
            depth: 0,
            tokens: TokenGenerator::new(config.token_length)?,
        })
    }

    pub fn method(&self) -> HttpRequestMethod { self.method }
    pub fn depth(&self) -> usize { self.depth }
    pub fn config(&self) -> &'c Config { self.config }

    /// A fresh token, never handed out before.
    pub fn token(&self) -> String {
        self.tokens.generate()
    }

    /// Context for rendering a nested mashup, one level deeper, same
    /// method.
    pub fn nested(&self) -> Result<Self> {
        let depth = self.depth + 1;
        if depth > self.config.max_nesting_depth {
            return Err(MashupError::NestingTooDeep { depth })
        }
        Ok(RenderContext { depth, ..self.clone() })
    }
}

// ------------------------------------------------------------------
// The contract

pub trait View: Debug + Send + Sync {
    /// The view's own content, without any container.
    fn render(&self, ctx: &RenderContext) -> Result<String>;

    fn container_spec(&self) -> &ContainerSpec;

    /// The container template that applies to this view, if any.
    fn container(&self) -> Option<&str> {
        self.container_spec().resolve()
    }

    /// `render` substituted into `container`, or unwrapped if there is
    /// none.
    fn wrapped(&self, ctx: &RenderContext) -> Result<String> {
        Ok(self.container_spec().wrap(self.render(ctx)?))
    }
}

/// Build a `Vec<Arc<dyn View>>` from view values.
#[macro_export]
macro_rules! views {
    [$($view:expr),* $(,)?] => {
        vec![$(std::sync::Arc::new($view) as std::sync::Arc<dyn $crate::view::View>),*]
    }
}

/// What a kind of view declares for all of its instances. Instances
/// can still bring their own container, which wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewClass {
    pub container: Option<&'static str>,
}

impl ViewClass {
    pub const PLAIN: ViewClass = ViewClass { container: None };

    pub const fn with_container(container: &'static str) -> Self {
        ViewClass { container: Some(container) }
    }

    /// Set the class default in `spec`, keeping its instance
    /// container.
    fn apply(&self, spec: ContainerSpec) -> ContainerSpec {
        match self.container {
            Some(c) => spec.with_default(c),
            None => spec
        }
    }
}

// ------------------------------------------------------------------
/// Static content, returned as is.
#[derive(Debug, Clone)]
pub struct HtmlView {
    content: KString,
    container: ContainerSpec,
}

impl HtmlView {
    pub fn new(content: impl Into<KString>) -> Self {
        HtmlView {
            content: content.into(),
            container: ContainerSpec::none(),
        }
    }

    /// Take the default container from `class`; a container given via
    /// `with_container` still wins.
    pub fn with_class(mut self, class: &ViewClass) -> Self {
        self.container = class.apply(self.container);
        self
    }

    pub fn with_container(mut self, container: impl Into<KString>) -> Self {
        self.container = self.container.with_instance(container);
        self
    }

    pub fn content(&self) -> &str { &self.content }
}

impl View for HtmlView {
    fn render(&self, _ctx: &RenderContext) -> Result<String> {
        Ok(self.content.to_string())
    }

    fn container_spec(&self) -> &ContainerSpec {
        &self.container
    }
}

// ------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Target {
    Shared(Arc<dyn Compose>),
    Static(&'static dyn Compose),
}

impl Target {
    fn get(&self) -> &dyn Compose {
        match self {
            Target::Shared(c) => &**c,
            Target::Static(c) => *c,
        }
    }
}

/// The full output of another mashup, rendered for the same method.
#[derive(Debug, Clone)]
pub struct NestedView {
    target: Target,
    container: ContainerSpec,
}

impl NestedView {
    pub fn new<C: Compose + 'static>(target: Arc<C>) -> Self {
        NestedView {
            target: Target::Shared(target),
            container: ContainerSpec::none(),
        }
    }

    /// For mashups living in a `static` (e.g. via `lazy_static!`).
    pub fn of_static<C: Compose>(target: &'static C) -> Self {
        NestedView {
            target: Target::Static(target),
            container: ContainerSpec::none(),
        }
    }

    /// Take the default container from `class`; a container given via
    /// `with_container` still wins.
    pub fn with_class(mut self, class: &ViewClass) -> Self {
        self.container = class.apply(self.container);
        self
    }

    pub fn with_container(mut self, container: impl Into<KString>) -> Self {
        self.container = self.container.with_instance(container);
        self
    }
}

impl View for NestedView {
    fn render(&self, ctx: &RenderContext) -> Result<String> {
        let body = self.target.get().compose(&ctx.nested()?)?;
        Ok(String::from_utf8(body)?)
    }

    fn container_spec(&self) -> &ContainerSpec {
        &self.container
    }
}

// ------------------------------------------------------------------

/// Where the rich loader goes in `LoaderTemplates::detector`.
pub const RICH_LOADER_SLOT: &str = "{{ rich_loader }}";
/// Where the plain loader goes in `LoaderTemplates::detector`.
pub const PLAIN_LOADER_SLOT: &str = "{{ plain_loader }}";

/// The script pieces of an async view. The detector picks one of the
/// two loaders at run time in the browser; both fetch the URL and put
/// the result into the element whose id is the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderTemplates {
    pub detector: &'static str,
    /// Used when jQuery is available.
    pub rich_loader: &'static str,
    pub plain_loader: &'static str,
}

impl LoaderTemplates {
    pub const DEFAULT: LoaderTemplates = LoaderTemplates {
        detector: "<div id=\"{{ token }}\"></div>\
                   <script type=\"text/javascript\">\
                   if (window.jQuery) { {{ rich_loader }} } \
                   else { {{ plain_loader }} }\
                   </script>",
        rich_loader: "jQuery(\"#{{ token }}\").load(\"{{ url }}\");",
        plain_loader: "(function () { \
                       var r = new XMLHttpRequest(); \
                       r.onreadystatechange = function () { \
                       if (r.readyState === 4 && r.status === 200) { \
                       document.getElementById(\"{{ token }}\").innerHTML = r.responseText; \
                       } }; \
                       r.open(\"GET\", \"{{ url }}\", true); \
                       r.send(); \
                       })();",
    };

    /// The detector with both loaders in place, markers unresolved.
    pub fn script_template(&self) -> String {
        substitute(&substitute(self.detector, RICH_LOADER_SLOT, self.rich_loader),
                   PLAIN_LOADER_SLOT, self.plain_loader)
    }

    /// The finished script for `token` and `url`. The URL is put in
    /// after the token, so a URL that happens to contain the token
    /// marker is left alone.
    pub fn script(&self, token: &str, url: &str) -> String {
        substitute(&substitute(&self.script_template(), TOKEN_MARKER, token),
                   URL_MARKER, url)
    }
}

impl Default for LoaderTemplates {
    fn default() -> Self { Self::DEFAULT }
}

/// Content fetched by the browser after the page has loaded: renders
/// to a loader script plus the slot it fills in.
#[derive(Debug, Clone)]
pub struct UrlView {
    url: KString,
    templates: LoaderTemplates,
    container: ContainerSpec,
}

impl UrlView {
    pub fn new(url: impl Into<KString>) -> Self {
        UrlView {
            url: url.into(),
            templates: LoaderTemplates::DEFAULT,
            container: ContainerSpec::none(),
        }
    }

    /// Take the default container from `class`; a container given via
    /// `with_container` still wins.
    pub fn with_class(mut self, class: &ViewClass) -> Self {
        self.container = class.apply(self.container);
        self
    }

    pub fn with_templates(mut self, templates: LoaderTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_container(mut self, container: impl Into<KString>) -> Self {
        self.container = self.container.with_instance(container);
        self
    }

    pub fn url(&self) -> &str { &self.url }
    pub fn templates(&self) -> &LoaderTemplates { &self.templates }
}

impl View for UrlView {
    fn render(&self, ctx: &RenderContext) -> Result<String> {
        Ok(self.templates.script(&ctx.token(), &self.url))
    }

    fn container_spec(&self) -> &ContainerSpec {
        &self.container
    }
}
