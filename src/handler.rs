//! Serving mashups over HTTP with Rouille. The engine itself knows
//! nothing of requests; this maps a request to a method, and a render
//! to a response.

use std::{borrow::Cow, collections::HashMap, fmt::Debug, sync::Arc};

use anyhow::{Result, Context, anyhow};
use kstring::KString;
use rouille::{Request, Response, ResponseBody};
use tracing::{error, info, warn};

use crate::{config::Config,
            http_request_method::HttpRequestMethod,
            http_response_status_codes::HttpResponseStatusCode,
            mashup::{Mashup, Rendered},
            token::TokenGenerator};

const ERROR_ID_LENGTH: usize = 12;

pub trait Handler: Debug + Send + Sync {
    /// Returning Ok(None) means, the handler is refusing to handle
    /// the request (404 for the caller). Err means, the handler
    /// accepted the request but failed to produce a response (500).
    fn call(&self, request: &Request, method: HttpRequestMethod)
            -> Result<Option<Response>>;
}

fn html_headers() -> Vec<(Cow<'static, str>, Cow<'static, str>)> {
    vec![(Cow::from("Content-type"), Cow::from("text/html; charset=utf-8"))]
}

pub fn htmlresponse(status: HttpResponseStatusCode, body: Vec<u8>) -> Response {
    Response {
        status_code: status.code(),
        headers: html_headers(),
        data: ResponseBody::from_data(body),
        upgrade: None,
    }
}

pub fn errorpage(status: HttpResponseStatusCode, explanation: &str) -> Response {
    let title = status.title();
    htmlresponse(
        status,
        format!("<html><head><title>{title}</title></head><body><h1>{title}</h1>\
                 <p>{explanation}</p></body></html>\n").into_bytes())
}

pub fn errorpage_from_status(status: HttpResponseStatusCode) -> Response {
    errorpage(status, status.desc())
}

/// Log `err` under a random id and answer with a 500 page showing
/// only that id.
pub fn errorpage_from_error(err: anyhow::Error) -> Response {
    let errid = TokenGenerator::new(ERROR_ID_LENGTH)
        .map(|g| g.generate())
        .unwrap_or_default();
    error!(%errid, "error in page: {err:#}");
    errorpage(HttpResponseStatusCode::InternalServerError500,
              &format!("An error happened here (error id {errid})."))
}

/// 405 with an empty body, listing what the resource answers.
pub fn method_not_allowed(allowed: impl Iterator<Item = HttpRequestMethod>) -> Response {
    let allow: Vec<&str> = allowed.map(|m| m.as_str()).collect();
    Response {
        status_code: HttpResponseStatusCode::MethodNotAllowed405.code(),
        headers: vec![(Cow::from("Allow"), Cow::from(allow.join(", ")))],
        data: ResponseBody::empty(),
        upgrade: None,
    }
}

/// Same status and headers, no body.
fn without_body(response: Response) -> Response {
    Response { data: ResponseBody::empty(), ..response }
}

// ------------------------------------------------------------------
#[derive(Debug, Clone)]
enum MashupRef {
    Shared(Arc<Mashup>),
    Static(&'static Mashup),
}

impl MashupRef {
    fn get(&self) -> &Mashup {
        match self {
            MashupRef::Shared(m) => &**m,
            MashupRef::Static(m) => *m,
        }
    }
}

/// Serves one mashup at its path.
#[derive(Debug, Clone)]
pub struct MashupHandler {
    mashup: MashupRef,
    config: Arc<Config>,
}

impl MashupHandler {
    pub fn new(mashup: Arc<Mashup>, config: Arc<Config>) -> Self {
        MashupHandler { mashup: MashupRef::Shared(mashup), config }
    }

    /// For mashups living in a `static` (e.g. via `lazy_static!`).
    pub fn of_static(mashup: &'static Mashup, config: Arc<Config>) -> Self {
        MashupHandler { mashup: MashupRef::Static(mashup), config }
    }
}

impl Handler for MashupHandler {
    fn call(&self, _request: &Request, method: HttpRequestMethod)
            -> Result<Option<Response>>
    {
        let mashup = self.mashup.get();
        // HEAD is answered like GET unless the mashup declares it.
        let render_method =
            if method == HttpRequestMethod::HEAD
                && !mashup.supports(HttpRequestMethod::HEAD)
                && mashup.supports(HttpRequestMethod::GET)
            {
                HttpRequestMethod::GET
            } else {
                method
            };
        let Rendered { allowed, body } =
            mashup.respond(&self.config, render_method).with_context(
                || anyhow!("rendering mashup {:?} for {method}", mashup.name()))?;
        if !allowed {
            let mut methods: Vec<HttpRequestMethod> = mashup.supported_methods().collect();
            if mashup.supports(HttpRequestMethod::GET)
                && !mashup.supports(HttpRequestMethod::HEAD)
            {
                methods.push(HttpRequestMethod::HEAD);
                methods.sort();
            }
            return Ok(Some(method_not_allowed(methods.into_iter())))
        }
        let response = htmlresponse(HttpResponseStatusCode::OK200, body);
        if method == HttpRequestMethod::HEAD {
            Ok(Some(without_body(response)))
        } else {
            Ok(Some(response))
        }
    }
}

// ------------------------------------------------------------------
/// A fixed piece of HTML, e.g. the target of an async view.
#[derive(Debug, Clone)]
pub struct FragmentHandler {
    html: KString,
}

impl FragmentHandler {
    pub fn new(html: impl Into<KString>) -> Self {
        FragmentHandler { html: html.into() }
    }
}

impl Handler for FragmentHandler {
    fn call(&self, _request: &Request, method: HttpRequestMethod)
            -> Result<Option<Response>>
    {
        let response = htmlresponse(HttpResponseStatusCode::OK200,
                                    self.html.as_bytes().to_vec());
        match method {
            HttpRequestMethod::GET => Ok(Some(response)),
            HttpRequestMethod::HEAD => Ok(Some(without_body(response))),
            _ => Ok(Some(method_not_allowed(
                [HttpRequestMethod::GET, HttpRequestMethod::HEAD].into_iter())))
        }
    }
}

// ------------------------------------------------------------------
/// Exact-path routing to handlers.
#[derive(Debug, Default)]
pub struct Router {
    routes: HashMap<KString, Arc<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str, handler: Arc<dyn Handler>) -> &mut Self {
        if let Some(_old) = self.routes.insert(KString::from_ref(path), handler) {
            warn!("duplicate entry for path {path:?}, old one dropped");
        }
        self
    }

    pub fn handle_request(&self, request: &Request) -> Response {
        let method = match request.method().parse::<HttpRequestMethod>() {
            Ok(m) => m,
            Err(e) => {
                warn!("{e}");
                return errorpage_from_status(HttpResponseStatusCode::NotImplemented501)
            }
        };
        let path = request.url();
        let response = match self.routes.get(path.as_str()) {
            Some(handler) => match handler.call(request, method) {
                Ok(Some(response)) => response,
                Ok(None) => errorpage_from_status(HttpResponseStatusCode::NotFound404),
                Err(e) => errorpage_from_error(e),
            },
            None => errorpage_from_status(HttpResponseStatusCode::NotFound404),
        };
        info!(%method, %path, status = response.status_code, "request");
        response
    }
}
