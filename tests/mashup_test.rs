use std::sync::Arc;

use lazy_static::lazy_static;

use mashup::{views, HtmlView, Mashup, NestedView, UrlView, HttpRequestMethod::*};
use mashup::config::{Config, DEFAULT_CONFIG};
use mashup::placeholder::{container, mashup_container, CONTENT_MARKER};
use mashup::view::{LoaderTemplates, View};

const FIRST_AND_SECOND: &[u8] =
    b"<div class='first-mash'><p>This is a bunch of html<p></div>\
      <div class='second-mash'><p>This is another bunch of html</p></div>";

const BIG: &[u8] =
    b"<div class='big-mash-container'><div class='first-mash'><p>This is a bunch of html<p></div>\
      <div class='second-mash'><p>This is another bunch of html</p></div></div>\
      <p>A third bunch of HTML</p>";

lazy_static! {
    static ref MY_MASHUP: Mashup = Mashup::builder()
        .views(views![
            HtmlView::new("<p>This is a bunch of html<p>")
                .with_container(container("<div class='first-mash'>", "</div>")),
            HtmlView::new("<p>This is another bunch of html</p>")
                .with_container(container("<div class='second-mash'>", "</div>")),
        ])
        .build();

    static ref MY_SECOND_MASHUP: Mashup = Mashup::builder()
        .views(views![
            NestedView::of_static(&*MY_MASHUP)
                .with_container(container("<div class='big-mash-container'>", "</div>")),
            HtmlView::new("<p>A third bunch of HTML</p>"),
        ])
        .build();

    static ref MY_THIRD_MASHUP: Mashup = Mashup::builder()
        .views(views![
            UrlView::new("/testing/url")
                .with_container(container("<div class='big-mash-container'>", "</div>")),
            UrlView::new("/test/url"),
        ])
        .build();

    static ref MY_MASHUP_CONTAINED: Mashup = Mashup::builder()
        .views(MY_MASHUP.default_views().unwrap().to_vec())
        .containers(first_containers())
        .build();

    static ref MY_SECOND_MASHUP_CONTAINED: Mashup = Mashup::builder()
        .views(MY_SECOND_MASHUP.default_views().unwrap().to_vec())
        .containers(second_containers())
        .build();

    static ref MY_GET_POST_MASHUP: Mashup = Mashup::builder()
        .method_views(GET, MY_MASHUP.default_views().unwrap().to_vec())
        .method_views(POST, MY_SECOND_MASHUP.default_views().unwrap().to_vec())
        .build();

    static ref MY_GET_POST_MASHUP_CONTAINED: Mashup = Mashup::builder()
        .method_views(GET, MY_MASHUP.default_views().unwrap().to_vec())
        .method_views(POST, MY_SECOND_MASHUP.default_views().unwrap().to_vec())
        .method_containers(GET, first_containers())
        .method_containers(POST, second_containers())
        .build();
}

fn first_containers() -> [String; 2] {
    [mashup_container("<div id=first-view-container>", "</div>"),
     mashup_container("<div id=second-view-container>", "</div>")]
}

fn second_containers() -> [String; 2] {
    [mashup_container("<div id=first-second-view-container>", "</div>"),
     mashup_container("<div id=second-second-view-container>", "</div>")]
}

#[test]
fn html_view_mashing() {
    assert_eq!(MY_MASHUP.render(GET).unwrap(), FIRST_AND_SECOND);
    assert!(MY_MASHUP.check().is_empty());
}

#[test]
fn view_view_mashing() {
    assert_eq!(MY_SECOND_MASHUP.render(GET).unwrap(), BIG);
}

#[test]
fn url_view_length() {
    // The tokens are random, so compare lengths, with a dummy token
    // of the right length standing in.
    let dummy_token = " ".repeat(DEFAULT_CONFIG.token_length);
    let mut target_length = 0;
    for view in MY_THIRD_MASHUP.default_views().unwrap() {
        let container_len = view.container()
            .map(|c| c.replace(CONTENT_MARKER, "").len())
            .unwrap_or(0);
        target_length += container_len;
    }
    for url in ["/testing/url", "/test/url"] {
        target_length += LoaderTemplates::DEFAULT.script(&dummy_token, url).len();
    }
    let body = MY_THIRD_MASHUP.render(GET).unwrap();
    assert_eq!(body.len(), target_length);
    let body = String::from_utf8(body).unwrap();
    assert!(body.starts_with("<div class='big-mash-container'><div id=\""));
    assert!(!body.contains("{{"));
}

#[test]
fn url_view_token_length_from_config() {
    let config = Config::new(40, 8).unwrap();
    let body = String::from_utf8(
        Mashup::builder()
            .views(views![UrlView::new("/x")])
            .build()
            .render_with(&config, GET)
            .unwrap())
        .unwrap();
    let token = token_of(&body);
    assert_eq!(token.len(), 40);
    assert!(body.contains(&format!("getElementById(\"{token}\")")));
    assert!(body.contains(&format!("jQuery(\"#{token}\")")));
}

fn token_of(script: &str) -> &str {
    let rest = script.strip_prefix("<div id=\"").expect("script starts with the slot");
    &rest[..rest.find('"').expect("closing quote")]
}

#[test]
fn url_view_concurrent_renders_differ() {
    let view = Arc::new(UrlView::new("/test/url"));
    let tokens: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| {
            let view = view.clone();
            s.spawn(move || {
                let m = Mashup::builder().views(vec![view as Arc<dyn View>]).build();
                let body = String::from_utf8(m.render(GET).unwrap()).unwrap();
                token_of(&body).to_string()
            })
        }).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (i, a) in tokens.iter().enumerate() {
        assert_eq!(a.len(), DEFAULT_CONFIG.token_length);
        for b in &tokens[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn mashup_containers() {
    assert_eq!(
        MY_MASHUP_CONTAINED.render(GET).unwrap(),
        b"<div id=first-view-container><div class='first-mash'><p>This is a bunch of html<p></div></div>\
          <div id=second-view-container><div class='second-mash'><p>This is another bunch of html</p></div></div>");
    assert_eq!(
        MY_SECOND_MASHUP_CONTAINED.render(GET).unwrap(),
        b"<div id=first-second-view-container><div class='big-mash-container'>\
          <div class='first-mash'><p>This is a bunch of html<p></div>\
          <div class='second-mash'><p>This is another bunch of html</p></div></div></div>\
          <div id=second-second-view-container><p>A third bunch of HTML</p></div>");
    assert!(MY_MASHUP_CONTAINED.check().is_empty());
}

#[test]
fn get_vs_post_views() {
    assert_eq!(MY_GET_POST_MASHUP.render(GET).unwrap(), FIRST_AND_SECOND);
    assert_eq!(MY_GET_POST_MASHUP.render(POST).unwrap(), BIG);
    assert_eq!(MY_GET_POST_MASHUP.render(DELETE).unwrap(), b"");
}

#[test]
fn get_vs_post_containers() {
    assert_eq!(
        MY_GET_POST_MASHUP_CONTAINED.render(GET).unwrap(),
        MY_MASHUP_CONTAINED.render(GET).unwrap());
    assert_eq!(
        MY_GET_POST_MASHUP_CONTAINED.render(POST).unwrap(),
        MY_SECOND_MASHUP_CONTAINED.render(GET).unwrap());
    assert!(MY_GET_POST_MASHUP_CONTAINED.check().is_empty());
}

#[test]
fn unsupported_method_is_empty() {
    for m in [DELETE, PUT, PATCH, HEAD, OPTIONS] {
        assert_eq!(MY_MASHUP.render(m).unwrap().len(), 0);
    }
}

#[test]
fn definitions_unchanged_by_rendering() {
    let before = format!("{:?}", *MY_SECOND_MASHUP_CONTAINED);
    for _ in 0..3 {
        MY_SECOND_MASHUP_CONTAINED.render(GET).unwrap();
        MY_SECOND_MASHUP_CONTAINED.render(POST).unwrap();
    }
    assert_eq!(format!("{:?}", *MY_SECOND_MASHUP_CONTAINED), before);
}
