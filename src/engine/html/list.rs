use crate::config::options::{HtmlListOptions, NO_LIST_ITEMS_PLACEHOLDER};
use crate::engine::format::display_text;
use crate::engine::html::escape_html;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::Validate;
use serde_json::Value;

/// Scalars become `<li>` text, mappings a `<dl>` of key/value pairs, and
/// nested lists recurse. A non-list value is treated as a one-item list.
pub fn structured_to_html_list(value: &Value, options: &HtmlListOptions) -> Result<String> {
    options.validate().map_err(|e| e.in_operation("structuredToHtmlList"))?;

    let items = match value {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };
    if items.is_empty() {
        return Ok(NO_LIST_ITEMS_PLACEHOLDER.to_string());
    }

    let mut html = String::new();
    render_list(items, options, 1, &mut html)?;
    Ok(html)
}

fn render_list(
    items: &[Value],
    options: &HtmlListOptions,
    depth: usize,
    html: &mut String,
) -> Result<()> {
    if depth > options.max_depth {
        return Err(ConvertError::depth_limit(
            "structuredToHtmlList",
            options.max_depth,
        ));
    }

    let tag = if options.ordered { "ol" } else { "ul" };
    html.push_str(&format!("<{}>\n", tag));
    for item in items {
        match item {
            Value::Array(nested) if nested.is_empty() => {
                html.push_str("  <li></li>\n");
            }
            Value::Array(nested) => {
                html.push_str("  <li>\n");
                render_list(nested, options, depth + 1, html)?;
                html.push_str("\n  </li>\n");
            }
            Value::Object(map) => {
                html.push_str("  <li>\n    <dl>\n");
                for (key, value) in map {
                    html.push_str(&format!("      <dt>{}</dt>\n", escape_html(key)));
                    html.push_str(&format!("      <dd>{}</dd>\n", escape_html(&display_text(value))));
                }
                html.push_str("    </dl>\n  </li>\n");
            }
            scalar => {
                html.push_str(&format!("  <li>{}</li>\n", escape_html(&display_text(scalar))));
            }
        }
    }
    html.push_str(&format!("</{}>", tag));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_items() {
        let html = structured_to_html_list(&json!(["a", 1, "<b>"]), &HtmlListOptions::default())
            .unwrap();
        assert_eq!(html, "<ul>\n  <li>a</li>\n  <li>1</li>\n  <li>&lt;b&gt;</li>\n</ul>");
    }

    #[test]
    fn test_ordered_with_mapping_item() {
        let options = HtmlListOptions {
            ordered: true,
            ..HtmlListOptions::default()
        };
        let html = structured_to_html_list(&json!([{"k": "v"}]), &options).unwrap();
        assert_eq!(
            html,
            "<ol>\n  <li>\n    <dl>\n      <dt>k</dt>\n      <dd>v</dd>\n    </dl>\n  </li>\n</ol>"
        );
    }

    #[test]
    fn test_nested_lists_and_placeholder() {
        let html = structured_to_html_list(&json!([["x"]]), &HtmlListOptions::default()).unwrap();
        assert_eq!(html, "<ul>\n  <li>\n<ul>\n  <li>x</li>\n</ul>\n  </li>\n</ul>");
        assert_eq!(
            structured_to_html_list(&json!([]), &HtmlListOptions::default()).unwrap(),
            "<p>No items to display</p>"
        );
    }

    #[test]
    fn test_single_value_is_one_item() {
        let html = structured_to_html_list(&json!("solo"), &HtmlListOptions::default()).unwrap();
        assert_eq!(html, "<ul>\n  <li>solo</li>\n</ul>");
    }

    #[test]
    fn test_depth_limit() {
        let options = HtmlListOptions {
            ordered: false,
            max_depth: 2,
        };
        let err = structured_to_html_list(&json!([[["deep"]]]), &options).unwrap_err();
        assert!(matches!(err, ConvertError::DepthLimitError { .. }));
    }
}
