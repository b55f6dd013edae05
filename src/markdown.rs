//! Minimal markdown-to-HTML transform for release notes.
//!
//! Only what release bodies typically use is supported: ATX headings of
//! level 1 to 3, `**bold**` and `*italic*`. Raw HTML in the body is escaped
//! first, so the only tags in the output are the ones added here.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static H1: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^#[ \t]+(.+)$"));
static H2: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^##[ \t]+(.+)$"));
static H3: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^###[ \t]+(.+)$"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.+?)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| compile(r"\*(.+?)\*"));
static CHANGELOG_HEADING: LazyLock<Regex> =
    LazyLock::new(|| compile(r"##\s*Changelog\s*\n"));

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {pattern}: {e}"),
    }
}

/// Escapes the characters that are significant in HTML.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Converts headings, bold and italic markdown to HTML tags.
pub fn to_html(body: &str) -> String {
    let text = escape_html(body).replace("\r\n", "\n");
    let text = H1.replace_all(&text, "<h1>$1</h1>");
    let text = H2.replace_all(&text, "<h2>$1</h2>");
    let text = H3.replace_all(&text, "<h3>$1</h3>");
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    let text = ITALIC.replace_all(&text, "<em>$1</em>");
    text.into_owned()
}

/// Returns the raw text of the `## Changelog` section, if the body has one.
///
/// The section runs until the next line starting with `##` or the end of
/// the body.
pub fn changelog_section(body: &str) -> Option<String> {
    let text = body.replace("\r\n", "\n");
    let heading = CHANGELOG_HEADING.find(&text)?;
    let rest = &text[heading.end()..];
    let section = match rest.find("\n##") {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(section.to_string())
}

/// Transformed changelog section, or the whole transformed body without one.
pub fn changelog_html(body: &str) -> String {
    match changelog_section(body) {
        Some(section) => to_html(&section),
        None => to_html(body),
    }
}
