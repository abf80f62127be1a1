use std::sync::Mutex;

use pretty_assertions::assert_eq;
use splash_engine::{base_href, build_document, ScriptSink};

const SOURCE: &str = "https://cdn.example.com/assets/home.html";

#[test]
fn sample_document_round_trips_body_and_extracts_inline_script() {
    let text = "<html><head><title>X</title></head>\
                <body><p>Hi</p><script>window.__x=1</script></body></html>";

    let doc = build_document(text, SOURCE).expect("build ok");

    assert!(doc.html.contains("<p>Hi</p>"));
    assert!(doc.html.contains("<title>X</title>"));
    // The original script element is gone from the assembled markup.
    assert!(!doc.html.contains("window.__x"));
    assert_eq!(doc.inline_scripts, vec!["window.__x=1".to_string()]);
    assert!(doc.external_scripts.is_empty());
}

#[test]
fn base_path_strips_the_trailing_filename() {
    assert_eq!(
        base_href(SOURCE),
        Some("https://cdn.example.com/assets/".to_string())
    );
    assert_eq!(base_href("data:text/html,hello"), None);
    assert_eq!(base_href(""), None);
    assert_eq!(base_href("home.html"), None);
    assert_eq!(
        base_href("pages/sub/home.html"),
        Some("pages/sub/".to_string())
    );
}

#[test]
fn base_tag_and_meta_tags_are_injected() {
    let doc = build_document("<html><head></head><body><p>Hi</p></body></html>", SOURCE)
        .expect("build ok");

    assert_eq!(
        doc.base_href,
        Some("https://cdn.example.com/assets/".to_string())
    );
    assert!(doc
        .html
        .contains("<base href=\"https://cdn.example.com/assets/\">"));
    assert!(doc.html.contains("<meta charset=\"utf-8\">"));
    assert!(doc.html.contains("name=\"viewport\""));
}

#[test]
fn markup_without_a_body_tag_is_treated_as_body_content() {
    let doc = build_document("<p>Hi</p><p>there</p>", SOURCE).expect("build ok");
    assert!(doc.html.contains("<p>Hi</p><p>there</p>"));
}

#[test]
fn external_scripts_are_reemitted_in_head_in_document_order() {
    let text = "<html><head><script src=\"a.js\"></script></head>\
                <body><script>inline()</script><script src=\"b.js\"></script></body></html>";

    let doc = build_document(text, SOURCE).expect("build ok");

    assert_eq!(
        doc.external_scripts,
        vec!["a.js".to_string(), "b.js".to_string()]
    );
    let head_end = doc.html.find("</head>").unwrap();
    let a = doc.html.find("<script src=\"a.js\">").unwrap();
    let b = doc.html.find("<script src=\"b.js\">").unwrap();
    assert!(a < b);
    assert!(b < head_end);
    // The inline body script is extracted, not kept as markup.
    assert!(!doc.html.contains("inline()"));
    assert_eq!(doc.inline_scripts, vec!["inline()".to_string()]);
}

#[test]
fn default_title_is_added_only_when_missing() {
    let with_title =
        build_document("<html><head><title>Mine</title></head><body></body></html>", SOURCE)
            .expect("build ok");
    assert!(!with_title.html.contains("<title>Loaded</title>"));

    let without_title = build_document("<html><head></head><body></body></html>", SOURCE)
        .expect("build ok");
    assert!(without_title.html.contains("<title>Loaded</title>"));
}

#[derive(Default)]
struct RecordingSink {
    seen: Mutex<Vec<String>>,
}

impl ScriptSink for RecordingSink {
    fn on_inline_script(&self, code: &str) {
        self.seen.lock().unwrap().push(code.to_string());
    }
}

#[test]
fn dispatch_hands_inline_scripts_to_the_sink_in_order() {
    let text = "<html><body><script>first()</script><script>second()</script></body></html>";
    let doc = build_document(text, SOURCE).expect("build ok");

    let sink = RecordingSink::default();
    doc.dispatch_scripts(&sink);

    assert_eq!(
        *sink.seen.lock().unwrap(),
        vec!["first()".to_string(), "second()".to_string()]
    );
}
