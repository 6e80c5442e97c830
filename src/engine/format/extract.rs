//! Turning a structured value into a single string: pretty or compact JSON,
//! a single field picked by path, or a `{{placeholder}}` template.

use crate::config::options::{ExtractMode, ExtractOptions};
use crate::engine::format::display_text;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::Validate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

pub fn structured_to_extracted_string(value: &Value, options: &ExtractOptions) -> Result<String> {
    options.validate().map_err(|e| e.in_operation("structuredToExtractedString"))?;

    match options.mode {
        ExtractMode::Pretty => pretty_json(value, options.indent),
        ExtractMode::Compact => Ok(value.to_string()),
        ExtractMode::Field => {
            let found = lookup_path(value, &options.field_path).ok_or_else(|| {
                ConvertError::field_not_found("structuredToExtractedString", &options.field_path)
            })?;
            match found {
                Value::Object(_) | Value::Array(_) => pretty_json(found, options.indent),
                scalar => Ok(display_text(scalar)),
            }
        }
        ExtractMode::Template => Ok(fill_template(value, &options.template)),
    }
}

/// A placeholder names a top-level field; when no such key exists it is read
/// as a path. Placeholders that do not resolve are left in the output untouched.
fn fill_template(value: &Value, template: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match value.get(name).or_else(|| lookup_path(value, name)) {
                Some(found) => display_text(found),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn pretty_json(value: &Value, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| ConvertError::format("structuredToExtractedString", e))
}

/// Resolve a dot/bracket path such as `data.items[0].name`.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    parse_path(path)
        .iter()
        .try_fold(value, |current, segment| match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(key),
            (Segment::Key(key), Value::Array(items)) => {
                key.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            (Segment::Index(i), Value::Array(items)) => items.get(*i),
            (Segment::Index(i), Value::Object(map)) => map.get(&i.to_string()),
            _ => None,
        })
}

fn parse_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for part in path.trim().split('.') {
        let mut rest = part.trim();
        if let Some(open) = rest.find('[') {
            if open > 0 {
                segments.push(Segment::Key(rest[..open].to_string()));
            }
            rest = &rest[open..];
            while let Some(stripped) = rest.strip_prefix('[') {
                let Some(close) = stripped.find(']') else {
                    segments.push(Segment::Key(rest.to_string()));
                    break;
                };
                let inner = stripped[..close].trim().trim_matches(|c| c == '"' || c == '\'');
                segments.push(match inner.parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Key(inner.to_string()),
                });
                rest = &stripped[close + 1..];
            }
        } else if !rest.is_empty() {
            segments.push(Segment::Key(rest.to_string()));
        }
    }
    segments
}
