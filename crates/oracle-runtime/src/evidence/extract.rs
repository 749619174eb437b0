//! Readable text from evidence pages.

use scraper::{ElementRef, Html, Node, Selector};

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg", "head"];

fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(elem: ElementRef<'_>, out: &mut Vec<String>) {
    for child in elem.children() {
        match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    out.push(text.to_string());
                }
            }
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

/// Extract the title and visible body text of an HTML document.
///
/// Input that does not look like HTML is returned with whitespace compacted.
pub fn extract_text(raw: &str) -> String {
    let trimmed = raw.trim_start();
    if !trimmed.starts_with('<') {
        return compact_ws(raw);
    }

    let document = Html::parse_document(raw);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next().map(|t| t.text().collect::<String>()))
        .map(|t| compact_ws(&t))
        .filter(|t| !t.is_empty());

    let mut parts = Vec::new();
    if let Some(body) = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
    {
        collect_text(body, &mut parts);
    }
    let body = compact_ws(&parts.join(" "));

    match title {
        Some(title) if body.is_empty() => title,
        Some(title) => format!("{}\n\n{}", title, body),
        None => body,
    }
}
