//! HTML rendering of structured data plus Markdown ⇄ HTML.

pub mod list;
pub mod markdown;
pub mod table;
pub mod to_markdown;

pub use list::structured_to_html_list;
pub use markdown::markdown_to_html;
pub use table::{csv_to_html_table, structured_to_html_table};
pub use to_markdown::html_to_markdown;

/// Escape the five characters that matter inside element content and
/// attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// ` class="..."` or nothing.
pub(crate) fn class_attr(class: Option<&str>) -> String {
    match class.map(str::trim).filter(|c| !c.is_empty()) {
        Some(class) => format!(" class=\"{}\"", escape_html(class)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_leaves_slash_alone() {
        assert_eq!(escape_html(r#"<a href='x'>&</a>"#), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_class_attr() {
        assert_eq!(class_attr(Some("grid")), " class=\"grid\"");
        assert_eq!(class_attr(Some("  ")), "");
        assert_eq!(class_attr(None), "");
    }
}
