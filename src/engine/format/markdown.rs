use crate::config::options::{CsvOptions, MarkdownOptions};
use crate::engine::format::{cell_text, csv_to_structured, display_text, header_keys};
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::Validate;
use serde_json::Value;

/// Render a value as Markdown.
///
/// A list whose first element is a mapping becomes a pipe table, other lists
/// become bullet lists, and a mapping becomes `**key:** value` lines with a
/// `## key` section for every nested container.
pub fn structured_to_markdown(value: &Value, options: &MarkdownOptions) -> Result<String> {
    options.validate().map_err(|e| e.in_operation("structuredToMarkdown"))?;

    let mut out = String::new();
    if let Some(title) = options.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        out.push_str(&format!("# {}\n\n", title));
    }
    render(value, 1, options.max_depth, &mut out)?;
    Ok(out)
}

fn render(value: &Value, depth: usize, max_depth: usize, out: &mut String) -> Result<()> {
    if depth > max_depth {
        return Err(ConvertError::depth_limit("structuredToMarkdown", max_depth));
    }

    match value {
        Value::Array(items) if items.first().is_some_and(Value::is_object) => {
            out.push_str(&render_table(items));
            out.push('\n');
        }
        Value::Array(items) => {
            for item in items {
                out.push_str(&format!("- {}\n", display_text(item)));
            }
            out.push('\n');
        }
        Value::Object(map) => {
            for (key, child) in map {
                if child.is_object() || child.is_array() {
                    out.push_str(&format!("## {}\n\n", key));
                    render(child, depth + 1, max_depth, out)?;
                } else {
                    out.push_str(&format!("**{}:** {}\n\n", key, display_text(child)));
                }
            }
        }
        scalar => {
            out.push_str(&display_text(scalar));
            out.push('\n');
        }
    }
    Ok(())
}

/// Pipe table over a list of mappings; columns are the first row's keys.
pub(crate) fn render_table(rows: &[Value]) -> String {
    let Some(headers) = header_keys(rows) else {
        return String::new();
    };

    let mut table = String::new();
    let escaped: Vec<String> = headers.iter().map(|h| escape_cell(h)).collect();
    table.push_str(&format!("| {} |\n", escaped.join(" | ")));
    table.push_str(&format!("|{}\n", " --- |".repeat(headers.len())));

    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|key| escape_cell(&cell_text(row.get(key))))
            .collect();
        table.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    table
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Headers are always read from the first line, whatever `includeHeaders` says.
pub fn csv_to_markdown(text: &str, options: &CsvOptions) -> Result<String> {
    let options = CsvOptions {
        include_headers: true,
        ..options.clone()
    };
    let rows = csv_to_structured(text, &options)?;
    Ok(match rows {
        Value::Array(rows) => render_table(&rows),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_of_mappings_is_a_table() {
        let md = structured_to_markdown(
            &json!([{"name": "Ada", "age": 36}, {"name": "Bob"}]),
            &MarkdownOptions::default(),
        )
        .unwrap();
        assert_eq!(
            md,
            "| name | age |\n| --- | --- |\n| Ada | 36 |\n| Bob |  |\n\n"
        );
    }

    #[test]
    fn test_mapping_with_title_and_sections() {
        let options = MarkdownOptions {
            title: Some("Report".to_string()),
            ..MarkdownOptions::default()
        };
        let md = structured_to_markdown(&json!({"status": "ok", "tags": ["a", "b"]}), &options)
            .unwrap();
        assert_eq!(
            md,
            "# Report\n\n**status:** ok\n\n## tags\n\n- a\n- b\n\n"
        );
    }

    #[test]
    fn test_pipes_are_escaped_and_nested_cells_are_json() {
        let md = structured_to_markdown(
            &json!([{"expr": "a|b", "meta": {"k": 1}}]),
            &MarkdownOptions::default(),
        )
        .unwrap();
        assert!(md.contains(r#"| a\|b | {"k":1} |"#));
    }

    #[test]
    fn test_depth_limit() {
        let options = MarkdownOptions {
            title: None,
            max_depth: 2,
        };
        let err = structured_to_markdown(&json!({"a": {"b": {"c": 1}}}), &options).unwrap_err();
        assert!(matches!(err, ConvertError::DepthLimitError { limit: 2, .. }));
    }

    #[test]
    fn test_csv_to_markdown() {
        let md = csv_to_markdown("city,pop\nOslo,709000\n", &CsvOptions::default()).unwrap();
        assert_eq!(md, "| city | pop |\n| --- | --- |\n| Oslo | 709000 |\n");
        assert_eq!(csv_to_markdown("", &CsvOptions::default()).unwrap(), "");
    }
}
