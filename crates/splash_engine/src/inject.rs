use ego_tree::NodeId;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use splash_logging::splash_info;

/// Replacement document assembled from the fetched target.
///
/// Scripts are stripped from the markup so nothing runs twice: external
/// scripts are re-emitted as fresh elements at the end of the head, in
/// original document order, and inline scripts are extracted for a
/// [`ScriptSink`]. The engine never evaluates fetched code itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedDocument {
    pub html: String,
    pub base_href: Option<String>,
    pub external_scripts: Vec<String>,
    pub inline_scripts: Vec<String>,
}

impl InjectedDocument {
    /// Hands every extracted inline script to the host callback, in order.
    pub fn dispatch_scripts(&self, sink: &dyn ScriptSink) {
        for code in &self.inline_scripts {
            sink.on_inline_script(code);
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InjectError {
    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Host-registered handler for inline scripts found in the injected document.
pub trait ScriptSink: Send + Sync {
    fn on_inline_script(&self, code: &str);
}

/// Default sink: records that a script was seen and drops it.
#[derive(Debug, Default)]
pub struct LoggingScriptSink;

impl ScriptSink for LoggingScriptSink {
    fn on_inline_script(&self, code: &str) {
        splash_info!("inline script handed to host ({} bytes), not evaluated", code.len());
    }
}

/// Builds the replacement document from fetched text.
///
/// Head and body content come from the first `head`/`body` elements; markup
/// with no explicit body is treated entirely as body content. The head gains
/// a `<base>` tag derived from `source_url` so relative assets keep resolving
/// after the swap, plus charset and viewport meta tags.
pub fn build_document(html_text: &str, source_url: &str) -> Result<InjectedDocument, InjectError> {
    let script_sel = selector("script")?;
    let head_sel = selector("head")?;
    let body_sel = selector("body")?;

    let mut doc = Html::parse_document(html_text);

    let mut external_scripts = Vec::new();
    let mut inline_scripts = Vec::new();
    let mut script_ids: Vec<NodeId> = Vec::new();
    for element in doc.select(&script_sel) {
        script_ids.push(element.id());
        match element.value().attr("src") {
            Some(src) => external_scripts.push(src.to_string()),
            None => {
                let code = element.text().collect::<String>();
                if !code.trim().is_empty() {
                    inline_scripts.push(code);
                }
            }
        }
    }
    // Detach the originals so the assembled markup carries no runnable copy.
    for id in script_ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let head_inner = doc
        .select(&head_sel)
        .next()
        .map(|head| head.inner_html())
        .unwrap_or_default();
    let body_inner = doc
        .select(&body_sel)
        .next()
        .map(|body| body.inner_html())
        .unwrap_or_default();

    let base_href = base_href(source_url);

    let mut head = String::new();
    head.push_str(head_inner.trim());
    if let Some(base) = &base_href {
        head.push_str(&format!("<base href=\"{}\">", attr_escape(base)));
    }
    head.push_str("<meta charset=\"utf-8\">");
    head.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">");
    if !head_inner.to_ascii_lowercase().contains("<title") {
        head.push_str("<title>Loaded</title>");
    }
    for src in &external_scripts {
        head.push_str(&format!("<script src=\"{}\"></script>", attr_escape(src)));
    }

    let html = format!(
        "<!DOCTYPE html><html><head>{head}</head><body>{body}</body></html>",
        body = body_inner.trim()
    );

    Ok(InjectedDocument {
        html,
        base_href,
        external_scripts,
        inline_scripts,
    })
}

/// Directory of the source document, used for the injected `<base>` tag.
///
/// `https://cdn.example.com/assets/home.html` maps to
/// `https://cdn.example.com/assets/`. Embedded-data URLs and bare relative
/// names yield no base.
pub fn base_href(source_url: &str) -> Option<String> {
    if source_url.is_empty() || source_url.starts_with("data:") {
        return None;
    }
    if let Ok(url) = Url::parse(source_url) {
        if let Ok(dir) = url.join(".") {
            return Some(dir.to_string());
        }
    }
    // Relative path: keep everything up to the last slash.
    source_url
        .rfind('/')
        .map(|idx| source_url[..=idx].to_string())
}

fn selector(css: &str) -> Result<Selector, InjectError> {
    Selector::parse(css).map_err(|err| InjectError::Selector(err.to_string()))
}

fn attr_escape(value: &str) -> String {
    value.replace('"', "&quot;")
}
