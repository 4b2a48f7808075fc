//! Markdown to HTML conversion

use pulldown_cmark::{html, Options, Parser};

/// Render markdown to HTML with table support.
/// Fenced code blocks are part of CommonMark and always enabled.
pub fn markdown_to_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(text, options);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
