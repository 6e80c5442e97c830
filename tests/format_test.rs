use anyhow::Result;
use data_converter::{execute, ConvertError, Output, Payload, Request};
use serde_json::{json, Value};

fn run(record: Value, payload: Payload) -> data_converter::Result<Output> {
    let request = Request::from_record(record)?;
    execute(&request, payload)
}

fn text(output: Output) -> String {
    match output {
        Output::Text(text) => text,
        other => panic!("expected text output, got {:?}", other),
    }
}

fn structured(output: Output) -> Value {
    match output {
        Output::Structured(value) => value,
        other => panic!("expected structured output, got {:?}", other),
    }
}

#[test]
fn test_csv_header_comes_from_first_row() -> Result<()> {
    let csv = text(run(
        json!({"resource": "format", "operation": "structuredToCsv"}),
        Payload::Structured(json!([{"a": 1, "b": 2}, {"a": 3, "c": 4}])),
    )?);

    assert_eq!(csv, "\"a\",\"b\"\n\"1\",\"2\"\n\"3\",\"\"\n");
    Ok(())
}

#[test]
fn test_csv_parse_with_semicolons_and_casting() -> Result<()> {
    let rows = structured(run(
        json!({"resource": "format", "operation": "csvToJson", "delimiter": ";"}),
        Payload::Text("name;qty;when\n\nbolt;12;2024-05-01\n\"nut; hex\";0.5;later\n".to_string()),
    )?);

    assert_eq!(
        rows,
        json!([
            {"name": "bolt", "qty": 12, "when": "2024-05-01T00:00:00.000Z"},
            {"name": "nut; hex", "qty": 0.5, "when": "later"}
        ])
    );
    Ok(())
}

#[test]
fn test_csv_ragged_quoting_is_a_parse_error() {
    let result = run(
        json!({"resource": "format", "operation": "csvToStructured"}),
        Payload::Text("a,b\n\"open,1\n".to_string()),
    );
    assert!(matches!(result, Err(ConvertError::ParseError { .. })));
}

#[test]
fn test_xml_round_trip_through_structured() -> Result<()> {
    let xml = text(run(
        json!({"resource": "format", "operation": "jsonToXml", "rootElementName": "order"}),
        Payload::Structured(json!({"id": "A1", "line": ["x", "y"]})),
    )?);
    assert!(xml.contains("<order>"));
    assert!(xml.contains("  <line>x</line>\n  <line>y</line>"));

    let value = structured(run(
        json!({"resource": "format", "operation": "xmlToStructured"}),
        Payload::Text(xml),
    )?);
    assert_eq!(value, json!({"order": {"id": "A1", "line": ["x", "y"]}}));
    Ok(())
}

#[test]
fn test_yaml_keeps_key_order() -> Result<()> {
    let yaml = text(run(
        json!({"resource": "format", "operation": "structuredToYaml"}),
        Payload::Text(r#"{"zeta": 1, "alpha": {"list": [true, null]}}"#.to_string()),
    )?);
    assert_eq!(yaml, "zeta: 1\nalpha:\n  list:\n  - true\n  - null\n");

    let value = structured(run(
        json!({"resource": "format", "operation": "yamlToJson"}),
        Payload::Text(yaml),
    )?);
    assert_eq!(value, json!({"zeta": 1, "alpha": {"list": [true, null]}}));

    let bad = run(
        json!({"resource": "format", "operation": "yamlToStructured"}),
        Payload::Text("key: [unclosed".to_string()),
    );
    assert!(matches!(bad, Err(ConvertError::ParseError { .. })));
    Ok(())
}

#[test]
fn test_markdown_from_mapping() -> Result<()> {
    let md = text(run(
        json!({"resource": "format", "operation": "structuredToMarkdown", "title": "Build"}),
        Payload::Structured(json!({"status": "green", "steps": [{"name": "test", "ok": true}]})),
    )?);
    assert_eq!(
        md,
        "# Build\n\n**status:** green\n\n## steps\n\n| name | ok |\n| --- | --- |\n| test | true |\n\n"
    );
    Ok(())
}

#[test]
fn test_csv_to_markdown_table() -> Result<()> {
    let md = text(run(
        json!({"resource": "format", "operation": "csvToMarkdown"}),
        Payload::Text("k,v\nx,1\n".to_string()),
    )?);
    assert_eq!(md, "| k | v |\n| --- | --- |\n| x | 1 |\n");
    Ok(())
}

#[test]
fn test_extraction_modes() -> Result<()> {
    let doc = json!({"data": {"items": [{"name": "first"}]}, "user": "ada", "n": 2});

    let compact = text(run(
        json!({"resource": "format", "operation": "jsonToString", "mode": "compact"}),
        Payload::Structured(json!({"a": [1, 2]})),
    )?);
    assert_eq!(compact, r#"{"a":[1,2]}"#);

    let pretty = text(run(
        json!({"resource": "format", "operation": "jsonToString", "indent": 4}),
        Payload::Structured(json!({"a": 1})),
    )?);
    assert_eq!(pretty, "{\n    \"a\": 1\n}");

    let field = text(run(
        json!({
            "resource": "format",
            "operation": "structuredToExtractedString",
            "mode": "field",
            "fieldPath": "data.items[0].name"
        }),
        Payload::Structured(doc.clone()),
    )?);
    assert_eq!(field, "first");

    let template = text(run(
        json!({
            "resource": "format",
            "operation": "structuredToExtractedString",
            "mode": "template",
            "template": "{{user}} has {{ n }} of {{missing}}"
        }),
        Payload::Structured(doc.clone()),
    )?);
    assert_eq!(template, "ada has 2 of {{missing}}");

    let missing = run(
        json!({
            "resource": "format",
            "operation": "structuredToExtractedString",
            "mode": "field",
            "fieldPath": "data.items[3].name"
        }),
        Payload::Structured(doc),
    );
    match missing {
        Err(ConvertError::FieldNotFoundError { path, .. }) => {
            assert_eq!(path, "data.items[3].name")
        }
        other => panic!("expected FieldNotFoundError, got {:?}", other),
    }
    Ok(())
}
