use crate::config::options::{CsvOptions, HtmlTableOptions, NO_TABLE_DATA_PLACEHOLDER};
use crate::engine::format::{cell_text, csv_to_structured, header_keys};
use crate::engine::html::{class_attr, escape_html};
use crate::utils::error::Result;
use serde_json::Value;

/// Render rows as a `<table>`. Columns are the keys of the first row; a
/// single mapping is a one-row table and an empty list gives the no-data
/// placeholder instead of an empty table.
pub fn structured_to_html_table(value: &Value, options: &HtmlTableOptions) -> Result<String> {
    let rows: Vec<Value> = match value {
        Value::Array(items) => items.clone(),
        Value::Object(_) => vec![value.clone()],
        _ => Vec::new(),
    };
    let Some(headers) = header_keys(&rows) else {
        return Ok(NO_TABLE_DATA_PLACEHOLDER.to_string());
    };

    let header_class = class_attr(options.header_class.as_deref());
    let row_class = class_attr(options.row_class.as_deref());
    let cell_class = class_attr(options.cell_class.as_deref());

    let mut html = format!("<table{}>\n", class_attr(options.table_class.as_deref()));
    html.push_str("  <thead>\n    <tr>\n");
    if options.include_index {
        html.push_str(&format!("      <th{}>#</th>\n", header_class));
    }
    for header in &headers {
        html.push_str(&format!("      <th{}>{}</th>\n", header_class, escape_html(header)));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for (index, row) in rows.iter().enumerate() {
        html.push_str(&format!("    <tr{}>\n", row_class));
        if options.include_index {
            html.push_str(&format!("      <td{}>{}</td>\n", cell_class, index + 1));
        }
        for header in &headers {
            html.push_str(&format!(
                "      <td{}>{}</td>\n",
                cell_class,
                escape_html(&cell_text(row.get(header)))
            ));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>");

    tracing::debug!("Rendered HTML table: {} rows x {} columns", rows.len(), headers.len());
    Ok(html)
}

pub fn csv_to_html_table(
    text: &str,
    csv_options: &CsvOptions,
    options: &HtmlTableOptions,
) -> Result<String> {
    let csv_options = CsvOptions {
        include_headers: true,
        ..csv_options.clone()
    };
    let rows = csv_to_structured(text, &csv_options)?;
    structured_to_html_table(&rows, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_input_gives_placeholder() {
        let options = HtmlTableOptions::default();
        assert_eq!(
            structured_to_html_table(&json!([]), &options).unwrap(),
            "<p>No data to display</p>"
        );
        assert_eq!(
            structured_to_html_table(&json!("text"), &options).unwrap(),
            "<p>No data to display</p>"
        );
    }

    #[test]
    fn test_table_layout() {
        let html = structured_to_html_table(
            &json!([{"name": "<Ada>", "age": 36}, {"name": "Bob", "age": null}]),
            &HtmlTableOptions::default(),
        )
        .unwrap();
        let expected = "<table>\n  <thead>\n    <tr>\n      <th>name</th>\n      <th>age</th>\n    </tr>\n  </thead>\n  <tbody>\n    <tr>\n      <td>&lt;Ada&gt;</td>\n      <td>36</td>\n    </tr>\n    <tr>\n      <td>Bob</td>\n      <td></td>\n    </tr>\n  </tbody>\n</table>";
        assert_eq!(html, expected);
    }

    #[test]
    fn test_classes_and_index_column() {
        let options = HtmlTableOptions {
            table_class: Some("data".to_string()),
            cell_class: Some("c".to_string()),
            include_index: true,
            ..HtmlTableOptions::default()
        };
        let html = structured_to_html_table(&json!({"k": "v"}), &options).unwrap();
        assert!(html.starts_with("<table class=\"data\">"));
        assert!(html.contains("<th>#</th>"));
        assert!(html.contains("<td class=\"c\">1</td>"));
        assert!(html.contains("<td class=\"c\">v</td>"));
    }

    #[test]
    fn test_csv_to_html_table() {
        let html = csv_to_html_table(
            "a,b\n1,x\n",
            &CsvOptions::default(),
            &HtmlTableOptions::default(),
        )
        .unwrap();
        assert!(html.contains("<th>a</th>"));
        assert!(html.contains("<td>x</td>"));
    }
}
