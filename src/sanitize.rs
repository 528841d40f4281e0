//! Read-time output sanitization.
//!
//! Every string field returned by the accessor passes through
//! [`html_output`] so callers can embed it directly in rendered markup.
//! The stored copy is never escaped; sanitization is a read-time transform
//! only, and round-trips through save/get therefore escape exactly once.

/// HTML-escapes a value for safe embedding in markup.
///
/// Escapes the five characters with meaning in HTML text and attribute
/// contexts: `&`, `<`, `>`, `"`, `'`. Everything else passes through
/// unchanged.
///
/// # Examples
///
/// ```rust
/// use metastore::sanitize::html_output;
///
/// assert_eq!(html_output("<script>"), "&lt;script&gt;");
/// assert_eq!(html_output("a & b"), "a &amp; b");
/// assert_eq!(html_output("plain"), "plain");
/// ```
#[must_use]
pub fn html_output(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
