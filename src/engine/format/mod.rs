//! Structured format conversions. JSON is the pivot: every converter here
//! either produces or consumes a `serde_json::Value`.

pub mod extract;
pub mod markdown;
pub mod tabular;
pub mod xml;
pub mod yaml;

pub use extract::{lookup_path, structured_to_extracted_string};
pub use markdown::{csv_to_markdown, structured_to_markdown};
pub use tabular::{csv_to_structured, structured_to_csv};
pub use xml::{structured_to_xml, xml_to_structured};
pub use yaml::{structured_to_yaml, yaml_to_structured};

use serde_json::Value;

/// String form of a value as it appears inside prose: strings unquoted,
/// `null` spelled out, containers as compact JSON.
pub(crate) fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// String form of a value inside a table cell, where null is an empty cell.
pub(crate) fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => display_text(value),
    }
}

/// Header row of a tabular record set: the keys of the first row, in that
/// row's own order. `None` when the first row is not a mapping.
pub(crate) fn header_keys(rows: &[Value]) -> Option<Vec<String>> {
    match rows.first() {
        Some(Value::Object(first)) => Some(first.keys().cloned().collect()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_keys_come_from_first_row_only() {
        let rows = vec![json!({"b": 1, "a": 2}), json!({"c": 3})];
        assert_eq!(header_keys(&rows).unwrap(), vec!["b", "a"]);
        assert!(header_keys(&[json!(1)]).is_none());
    }

    #[test]
    fn test_cell_and_display_text() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&Value::Null)), "");
        assert_eq!(display_text(&Value::Null), "null");
        assert_eq!(display_text(&json!("x")), "x");
        assert_eq!(display_text(&json!([1, "a"])), r#"[1,"a"]"#);
    }
}
