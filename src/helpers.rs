//! Shared helpers for writing HTML fragments.
//!
//! Everything inserted into a page comes either from configuration or from an
//! upstream API, so text goes through `escape_html` and query values through
//! `query_value`.

/// Escape the five HTML-significant characters.
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a value for use inside an `href` query string.
pub(crate) fn query_value(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Format a measurement the way the upstream JSON carries it
/// (`19` rather than `19.0`, `17.3` stays `17.3`).
pub(crate) fn fmt_measure(v: f64) -> String {
    if !v.is_finite() {
        tracing::warn!("fmt_measure received non-finite value {}", v);
        return "-".to_string();
    }
    format!("{}", v)
}
