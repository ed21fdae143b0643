use std::sync::Arc;

use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use rouille::Server;
use tracing_subscriber::EnvFilter;

use mashup::{views, HtmlView, Mashup, NestedView, UrlView, HttpRequestMethod};
use mashup::config::{Config, getenv_or};
use mashup::handler::{FragmentHandler, MashupHandler, Router};
use mashup::placeholder::{container, mashup_container};

// ------------------------------------------------------------------

lazy_static! {
    static ref FRONT: Mashup = Mashup::builder()
        .name("front")
        .views(views![
            HtmlView::new("<p>This is a bunch of html<p>")
                .with_container(container("<div class='first-mash'>", "</div>")),
            HtmlView::new("<p>This is another bunch of html</p>")
                .with_container(container("<div class='second-mash'>", "</div>")),
        ])
        .build();

    static ref NESTED: Mashup = Mashup::builder()
        .name("nested")
        .views(views![
            NestedView::of_static(&*FRONT)
                .with_container(container("<div class='big-mash-container'>", "</div>")),
            HtmlView::new("<p>A third bunch of HTML</p>"),
        ])
        .build();

    static ref CONTAINED: Mashup = Mashup::builder()
        .name("contained")
        .views(FRONT.default_views().unwrap_or_default().to_vec())
        .containers([mashup_container("<div id=first-view-container>", "</div>"),
                     mashup_container("<div id=second-view-container>", "</div>")])
        .build();

    static ref GETPOST: Mashup = Mashup::builder()
        .name("getpost")
        .method_views(HttpRequestMethod::GET,
                      FRONT.default_views().unwrap_or_default().to_vec())
        .method_views(HttpRequestMethod::POST,
                      NESTED.default_views().unwrap_or_default().to_vec())
        .build();

    static ref ASYNC: Mashup = Mashup::builder()
        .name("async")
        .views(views![
            UrlView::new("/fragment/one")
                .with_container(container("<div class='big-mash-container'>", "</div>")),
            UrlView::new("/fragment/two"),
        ])
        .build();
}

// -----------------------------------------------------------------------------
// Main

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
                         .unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(Config::from_env()?);
    let addr = getenv_or("LISTEN_HTTP", "127.0.0.1:3000")?;

    let serve = |mashup: &'static Mashup| {
        Arc::new(MashupHandler::of_static(mashup, config.clone()))
    };
    let mut router = Router::new();
    router
        .add("/", serve(&*FRONT))
        .add("/nested", serve(&*NESTED))
        .add("/contained", serve(&*CONTAINED))
        .add("/getpost", serve(&*GETPOST))
        .add("/async", serve(&*ASYNC))
        .add("/fragment/one", Arc::new(FragmentHandler::new("<p>first, later</p>")))
        .add("/fragment/two", Arc::new(FragmentHandler::new("<p>second, later</p>")));
    let router = Arc::new(router);

    tracing::info!(%addr, token_length = config.token_length, "listening");
    Server::new(addr, move |request| router.handle_request(request))
        .map_err(|e| anyhow!("can't start server: {e}"))?
        .run();
    Ok(())
}
