use anyhow::Result;
use data_converter::{execute, ConvertError, Output, Payload, Request};
use serde_json::json;

#[test]
fn test_every_operation_name_resolves() -> Result<()> {
    let vocabulary: &[(&str, &[&str])] = &[
        (
            "base64",
            &[
                "textToBase64",
                "base64ToText",
                "bytesToBase64",
                "base64ToBytes",
                "structuredToBase64",
                "base64ToStructured",
                "buildDataUrl",
                "parseDataUrl",
            ],
        ),
        (
            "binary",
            &["structuredToBytes", "bytesToStructured", "textToBytes", "bytesToText"],
        ),
        (
            "encoding",
            &[
                "urlEncode",
                "urlDecode",
                "htmlEncode",
                "htmlDecode",
                "hexEncode",
                "hexDecodeToText",
                "hexDecodeToBytes",
            ],
        ),
        (
            "format",
            &[
                "structuredToXml",
                "xmlToStructured",
                "structuredToYaml",
                "yamlToStructured",
                "structuredToCsv",
                "csvToStructured",
                "structuredToMarkdown",
                "structuredToExtractedString",
                "csvToMarkdown",
            ],
        ),
        (
            "html",
            &[
                "structuredToHtmlTable",
                "structuredToHtmlList",
                "csvToHtmlTable",
                "markdownToHtml",
                "htmlToMarkdown",
            ],
        ),
        (
            "string",
            &[
                "cleanFilename",
                "slugify",
                "toTitleCase",
                "toCamelCase",
                "toKebabCase",
                "toSnakeCase",
                "toUpperCase",
                "toLowerCase",
                "normalizeWhitespace",
                "removeSpecialChars",
                "capitalizeFirst",
                "reverse",
                "truncate",
                "padText",
                "parseEmailAddress",
                "applyMultiple",
            ],
        ),
    ];

    for (resource, operations) in vocabulary {
        for operation in operations.iter() {
            let request =
                Request::from_record(json!({"resource": resource, "operation": operation}))?;
            assert_eq!(request.resource(), *resource);
            assert_eq!(request.operation(), *operation);
        }
    }
    Ok(())
}

#[test]
fn test_legacy_names_map_to_canonical_operations() -> Result<()> {
    for (legacy, canonical) in [
        ("binaryToBase64", "bytesToBase64"),
        ("createDataUrl", "buildDataUrl"),
        ("jsonToXml", "structuredToXml"),
        ("jsonToHtmlList", "structuredToHtmlList"),
    ] {
        let resource = if legacy.contains("Html") {
            "html"
        } else if legacy.contains("Xml") {
            "format"
        } else {
            "base64"
        };
        let request = Request::from_record(json!({"resource": resource, "operation": legacy}))?;
        assert_eq!(request.operation(), canonical);
    }
    Ok(())
}

#[test]
fn test_unknown_resource_or_operation_is_a_config_error() {
    for record in [
        json!({"resource": "video", "operation": "transcode"}),
        json!({"resource": "format", "operation": "toParquet"}),
        json!({"resource": "string"}),
        json!({"operation": "reverse"}),
    ] {
        assert!(
            matches!(Request::from_record(record.clone()), Err(ConvertError::ConfigError { .. })),
            "{}",
            record
        );
    }
}

#[test]
fn test_payload_is_coerced_to_what_the_operation_reads() -> Result<()> {
    let to_yaml = Request::from_record(json!({"resource": "format", "operation": "structuredToYaml"}))?;
    let from_bytes = execute(&to_yaml, Payload::Bytes(br#"{"k": "v"}"#.to_vec()))?;
    assert_eq!(from_bytes, Output::Text("k: v\n".to_string()));

    let hex = Request::from_record(json!({"resource": "encoding", "operation": "hexEncode"}))?;
    assert_eq!(
        execute(&hex, Payload::Text("ok".to_string()))?,
        Output::Text("6f6b".to_string())
    );

    let data_url = Request::from_record(json!({
        "resource": "base64",
        "operation": "buildDataUrl",
        "mimeType": "text/plain"
    }))?;
    assert_eq!(
        execute(&data_url, Payload::Bytes(b"hi".to_vec()))?,
        Output::Text("data:text/plain;base64,aGk=".to_string())
    );
    Ok(())
}

#[test]
fn test_parse_data_url_descriptor() -> Result<()> {
    let request = Request::from_record(json!({"resource": "base64", "operation": "parseDataUrl"}))?;
    let output = execute(&request, Payload::Text("data:image/png;base64,iVBORw0KG==".to_string()))?;
    assert_eq!(
        output,
        Output::Structured(json!({
            "mimeType": "image/png",
            "isBase64": true,
            "data": "iVBORw0KG=="
        }))
    );
    Ok(())
}

#[test]
fn test_text_payload_must_parse_for_structured_operations() {
    let request =
        Request::from_record(json!({"resource": "html", "operation": "structuredToHtmlTable"}))
            .unwrap();
    let result = execute(&request, Payload::Text("not json".to_string()));
    assert!(matches!(result, Err(ConvertError::ParseError { .. })));
}
