//! CSV ⇄ JSON.
//!
//! Writing: the header row is the key set of the first record, every field is
//! quoted, and lines end in `\n`. Reading: cells that look numeric become
//! numbers, cells that look like dates become ISO-8601 UTC strings, and
//! everything else stays text.

use crate::config::options::CsvOptions;
use crate::engine::format::{cell_text, header_keys};
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{validate_ascii_char, Validate};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::{QuoteStyle, ReaderBuilder, Terminator, Trim, WriterBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)(?:[eE][-+]?[0-9]+)?$")
        .expect("numeric pattern is valid")
});

const ISO_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Delimiter, quote and escape as the single bytes the csv crate works with.
struct CsvBytes {
    delimiter: u8,
    quote: u8,
    escape: u8,
}

fn csv_bytes(options: &CsvOptions, operation: &str) -> Result<CsvBytes> {
    let checked = || -> Result<CsvBytes> {
        options.validate()?;
        Ok(CsvBytes {
            delimiter: validate_ascii_char("delimiter", options.delimiter)?,
            quote: validate_ascii_char("quoteChar", options.quote_char)?,
            escape: validate_ascii_char("escapeChar", options.escape_char)?,
        })
    };
    checked().map_err(|e| e.in_operation(operation))
}

pub fn structured_to_csv(value: &Value, options: &CsvOptions) -> Result<String> {
    let bytes = csv_bytes(options, "structuredToCsv")?;

    let rows: Vec<Value> = match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    };
    if rows.is_empty() {
        return Ok(String::new());
    }
    let headers = header_keys(&rows);

    let mut builder = WriterBuilder::new();
    builder
        .delimiter(bytes.delimiter)
        .quote(bytes.quote)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true);
    if bytes.escape != bytes.quote {
        builder.double_quote(false).escape(bytes.escape);
    }
    let mut writer = builder.from_writer(Vec::new());

    let write_err = |e: csv::Error| ConvertError::format("structuredToCsv", e);
    if let (Some(headers), true) = (&headers, options.include_headers) {
        writer.write_record(headers).map_err(write_err)?;
    }
    for row in &rows {
        writer
            .write_record(row_fields(row, headers.as_deref()))
            .map_err(write_err)?;
    }

    tracing::debug!(
        "Wrote {} CSV rows ({} columns)",
        rows.len(),
        headers.as_ref().map_or(0, Vec::len)
    );

    let bytes = writer
        .into_inner()
        .map_err(|e| ConvertError::format("structuredToCsv", e))?;
    String::from_utf8(bytes).map_err(|e| ConvertError::format("structuredToCsv", e))
}

/// Fields of one record. With a header, mappings are read by key and keys the
/// header lacks are dropped; without one, a row's values are written in order.
fn row_fields(row: &Value, headers: Option<&[String]>) -> Vec<String> {
    match (row, headers) {
        (Value::Object(map), Some(headers)) => headers
            .iter()
            .map(|key| cell_text(map.get(key)))
            .collect(),
        (Value::Object(map), None) => map.values().map(|v| cell_text(Some(v))).collect(),
        (Value::Array(items), _) => items.iter().map(|v| cell_text(Some(v))).collect(),
        (scalar, _) => vec![cell_text(Some(scalar))],
    }
}

pub fn csv_to_structured(text: &str, options: &CsvOptions) -> Result<Value> {
    let bytes = csv_bytes(options, "csvToStructured")?;
    check_quoting(text, options)?;

    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(bytes.delimiter)
        .quote(bytes.quote)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All);
    if bytes.escape != bytes.quote {
        builder.escape(Some(bytes.escape));
    }
    let mut reader = builder.from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ConvertError::parse("csvToStructured", e))?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if options.skip_empty_lines && is_blank_line(&fields) {
            continue;
        }
        records.push(fields);
    }
    if !options.skip_empty_lines {
        records = restore_blank_lines(records, &blank_line_layout(text, options));
    }

    if !options.include_headers {
        let rows = records
            .into_iter()
            .map(|fields| Value::Array(fields.iter().map(|f| cast_field(f)).collect()))
            .collect();
        return Ok(Value::Array(rows));
    }

    let mut records = records.into_iter();
    let Some(headers) = records.next() else {
        return Ok(Value::Array(Vec::new()));
    };

    let mut rows = Vec::new();
    for (index, fields) in records.enumerate() {
        if fields.len() != headers.len() {
            return Err(ConvertError::parse(
                "csvToStructured",
                format!(
                    "record {} has {} fields but the header has {}",
                    index + 1,
                    fields.len(),
                    headers.len()
                ),
            ));
        }
        let row: Map<String, Value> = headers
            .iter()
            .zip(&fields)
            .map(|(key, field)| (key.clone(), cast_field(field)))
            .collect();
        rows.push(Value::Object(row));
    }

    tracing::debug!("Parsed {} CSV records with {} columns", rows.len(), headers.len());
    Ok(Value::Array(rows))
}

/// The csv reader treats a stray quote as ordinary text, so ragged quoting is
/// caught here first. A quote may only open a field at its first character
/// and must be followed by a delimiter or line end once closed.
/// A whitespace-only line reads as one empty field. Rows such as `,` have
/// several empty fields and are data.
fn is_blank_line(fields: &[String]) -> bool {
    matches!(fields, [only] if only.is_empty())
}

/// One entry per physical line outside quoted fields: `true` for an empty
/// line. A terminator at the very end does not open another line.
fn blank_line_layout(text: &str, options: &CsvOptions) -> Vec<bool> {
    let (quote, escape) = (options.quote_char, options.escape_char);
    let mut layout = Vec::new();
    let mut line_is_empty = true;
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if escape != quote && c == escape {
                chars.next();
            } else if c == quote {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                layout.push(line_is_empty);
                line_is_empty = true;
            }
            _ => {
                if c == quote {
                    in_quotes = true;
                }
                line_is_empty = false;
            }
        }
    }
    if !line_is_empty {
        layout.push(false);
    }
    layout
}

/// The csv reader drops empty lines; put them back as one-field records.
fn restore_blank_lines(records: Vec<Vec<String>>, layout: &[bool]) -> Vec<Vec<String>> {
    let mut records = records.into_iter();
    let mut restored = Vec::with_capacity(layout.len());
    for &blank in layout {
        if blank {
            restored.push(vec![String::new()]);
        } else if let Some(record) = records.next() {
            restored.push(record);
        }
    }
    restored.extend(records);
    restored
}

fn check_quoting(text: &str, options: &CsvOptions) -> Result<()> {
    #[derive(Clone, Copy)]
    enum State {
        FieldStart,
        Unquoted,
        Quoted,
        AfterQuote,
    }

    let quote = options.quote_char;
    let escape = options.escape_char;
    let delimiter = options.delimiter;

    let mut state = State::FieldStart;
    let mut line = 1;
    let mut opened_on = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        state = match state {
            State::Quoted => {
                if escape != quote
                    && c == escape
                    && chars.peek().is_some_and(|&next| next == quote || next == escape)
                {
                    chars.next();
                    State::Quoted
                } else if c == quote {
                    if escape == quote && chars.peek() == Some(&quote) {
                        chars.next();
                        State::Quoted
                    } else {
                        State::AfterQuote
                    }
                } else {
                    if c == '\n' {
                        line += 1;
                    }
                    State::Quoted
                }
            }
            State::AfterQuote => match c {
                _ if c == delimiter => State::FieldStart,
                '\n' => {
                    line += 1;
                    State::FieldStart
                }
                '\r' | ' ' | '\t' => State::AfterQuote,
                other => {
                    return Err(ConvertError::parse(
                        "csvToStructured",
                        format!("unexpected '{}' after closing quote on line {}", other, line),
                    ))
                }
            },
            State::FieldStart | State::Unquoted => {
                if c == quote {
                    if !matches!(state, State::FieldStart) {
                        return Err(ConvertError::parse(
                            "csvToStructured",
                            format!("quote inside an unquoted field on line {}", line),
                        ));
                    }
                    opened_on = line;
                    State::Quoted
                } else if c == delimiter {
                    State::FieldStart
                } else if c == '\n' {
                    line += 1;
                    State::FieldStart
                } else {
                    State::Unquoted
                }
            }
        };
    }

    if matches!(state, State::Quoted) {
        return Err(ConvertError::parse(
            "csvToStructured",
            format!("quoted field opened on line {} is never closed", opened_on),
        ));
    }
    Ok(())
}

fn cast_field(field: &str) -> Value {
    if field.is_empty() {
        return Value::String(String::new());
    }
    if NUMERIC.is_match(field) {
        if let Some(number) = parse_number(field) {
            return Value::Number(number);
        }
    }
    match parse_date(field) {
        Some(date) => Value::String(date.format(ISO_TIMESTAMP).to_string()),
        None => Value::String(field.to_string()),
    }
}

fn parse_number(field: &str) -> Option<Number> {
    let integral = !field.contains(['.', 'e', 'E']);
    if integral {
        if let Ok(int) = field.parse::<i64>() {
            return Some(Number::from(int));
        }
    }
    field.parse::<f64>().ok().and_then(Number::from_f64)
}

fn parse_date(field: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(field) {
        return Some(date.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(field, format) {
            return Some(date.and_utc());
        }
    }
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(field, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|date| date.and_utc())
    })
}
