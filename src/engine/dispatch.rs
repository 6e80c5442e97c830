//! Resource/operation dispatch.
//!
//! A request is the flat record a host passes along: `resource`, `operation`
//! and that operation's options side by side. It deserializes into a
//! two-level enum so an unknown pair is rejected before any input is read.

use crate::config::options::{
    CsvOptions, CsvTableOptions, DataUrlOptions, EncodingOptions, ExtractOptions,
    HtmlListOptions, HtmlTableOptions, MarkdownOptions, XmlOptions,
};
use crate::domain::model::{Output, Payload, RunningValue};
use crate::engine::text::{apply_multiple, StringTransform};
use crate::engine::{base64_codec, binary, encoding, format, html};
use crate::utils::error::{ConvertError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "resource", rename_all = "camelCase")]
pub enum Request {
    Base64(Base64Op),
    Binary(BinaryOp),
    Encoding(EncodingOp),
    Format(FormatOp),
    Html(HtmlOp),
    String(StringOp),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Base64Op {
    TextToBase64,
    Base64ToText,
    #[serde(alias = "binaryToBase64")]
    BytesToBase64,
    #[serde(alias = "base64ToBinary")]
    Base64ToBytes,
    #[serde(alias = "jsonToBase64")]
    StructuredToBase64,
    #[serde(alias = "base64ToJson")]
    Base64ToStructured,
    #[serde(alias = "createDataUrl")]
    BuildDataUrl(DataUrlOptions),
    ParseDataUrl,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum BinaryOp {
    #[serde(alias = "jsonToBinary")]
    StructuredToBytes,
    #[serde(alias = "binaryToJson")]
    BytesToStructured,
    #[serde(alias = "textToBinary")]
    TextToBytes(EncodingOptions),
    #[serde(alias = "binaryToText")]
    BytesToText(EncodingOptions),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum EncodingOp {
    UrlEncode,
    UrlDecode,
    HtmlEncode,
    HtmlDecode,
    HexEncode,
    #[serde(alias = "hexDecode", alias = "hexDecodeToString")]
    HexDecodeToText(EncodingOptions),
    HexDecodeToBytes,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum FormatOp {
    #[serde(alias = "jsonToXml")]
    StructuredToXml(XmlOptions),
    #[serde(alias = "xmlToJson")]
    XmlToStructured,
    #[serde(alias = "jsonToYaml")]
    StructuredToYaml,
    #[serde(alias = "yamlToJson")]
    YamlToStructured,
    #[serde(alias = "jsonToCsv")]
    StructuredToCsv(CsvOptions),
    #[serde(alias = "csvToJson")]
    CsvToStructured(CsvOptions),
    #[serde(alias = "jsonToMarkdown")]
    StructuredToMarkdown(MarkdownOptions),
    #[serde(alias = "jsonToString")]
    StructuredToExtractedString(ExtractOptions),
    CsvToMarkdown(CsvOptions),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum HtmlOp {
    #[serde(alias = "jsonToHtmlTable")]
    StructuredToHtmlTable(HtmlTableOptions),
    #[serde(alias = "jsonToHtmlList")]
    StructuredToHtmlList(HtmlListOptions),
    CsvToHtmlTable(CsvTableOptions),
    MarkdownToHtml,
    HtmlToMarkdown,
}

/// `applyMultiple` carries its `steps`; every other operation is a single
/// [`StringTransform`] whose options sit next to `operation`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub enum StringOp {
    Single(StringTransform),
    ApplyMultiple { steps: Vec<StringTransform> },
}

impl TryFrom<Map<String, Value>> for StringOp {
    type Error = String;

    fn try_from(mut record: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let operation = match record.remove("operation") {
            Some(Value::String(operation)) => operation,
            Some(other) => return Err(format!("operation must be a string, got {}", other)),
            None => return Err("missing field `operation`".to_string()),
        };

        if operation == "applyMultiple" {
            let steps = record
                .remove("steps")
                .unwrap_or_else(|| Value::Array(Vec::new()));
            let steps = serde_json::from_value(steps).map_err(|e| e.to_string())?;
            return Ok(Self::ApplyMultiple { steps });
        }

        record.insert("op".to_string(), Value::String(operation));
        serde_json::from_value(Value::Object(record))
            .map(Self::Single)
            .map_err(|e| e.to_string())
    }
}

impl Request {
    /// Parse a flat host record.
    pub fn from_record(record: Value) -> Result<Self> {
        serde_json::from_value(record).map_err(|e| ConvertError::ConfigError {
            message: format!("Invalid request: {}", e),
        })
    }

    pub fn resource(&self) -> &'static str {
        match self {
            Self::Base64(_) => "base64",
            Self::Binary(_) => "binary",
            Self::Encoding(_) => "encoding",
            Self::Format(_) => "format",
            Self::Html(_) => "html",
            Self::String(_) => "string",
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Base64(op) => op.name(),
            Self::Binary(op) => op.name(),
            Self::Encoding(op) => op.name(),
            Self::Format(op) => op.name(),
            Self::Html(op) => op.name(),
            Self::String(StringOp::Single(step)) => step.name(),
            Self::String(StringOp::ApplyMultiple { .. }) => "applyMultiple",
        }
    }
}

impl Base64Op {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TextToBase64 => "textToBase64",
            Self::Base64ToText => "base64ToText",
            Self::BytesToBase64 => "bytesToBase64",
            Self::Base64ToBytes => "base64ToBytes",
            Self::StructuredToBase64 => "structuredToBase64",
            Self::Base64ToStructured => "base64ToStructured",
            Self::BuildDataUrl(_) => "buildDataUrl",
            Self::ParseDataUrl => "parseDataUrl",
        }
    }
}

impl BinaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StructuredToBytes => "structuredToBytes",
            Self::BytesToStructured => "bytesToStructured",
            Self::TextToBytes(_) => "textToBytes",
            Self::BytesToText(_) => "bytesToText",
        }
    }
}

impl EncodingOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UrlEncode => "urlEncode",
            Self::UrlDecode => "urlDecode",
            Self::HtmlEncode => "htmlEncode",
            Self::HtmlDecode => "htmlDecode",
            Self::HexEncode => "hexEncode",
            Self::HexDecodeToText(_) => "hexDecodeToText",
            Self::HexDecodeToBytes => "hexDecodeToBytes",
        }
    }
}

impl FormatOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StructuredToXml(_) => "structuredToXml",
            Self::XmlToStructured => "xmlToStructured",
            Self::StructuredToYaml => "structuredToYaml",
            Self::YamlToStructured => "yamlToStructured",
            Self::StructuredToCsv(_) => "structuredToCsv",
            Self::CsvToStructured(_) => "csvToStructured",
            Self::StructuredToMarkdown(_) => "structuredToMarkdown",
            Self::StructuredToExtractedString(_) => "structuredToExtractedString",
            Self::CsvToMarkdown(_) => "csvToMarkdown",
        }
    }
}

impl HtmlOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StructuredToHtmlTable(_) => "structuredToHtmlTable",
            Self::StructuredToHtmlList(_) => "structuredToHtmlList",
            Self::CsvToHtmlTable(_) => "csvToHtmlTable",
            Self::MarkdownToHtml => "markdownToHtml",
            Self::HtmlToMarkdown => "htmlToMarkdown",
        }
    }
}

/// Run one request against one payload. The payload is coerced to the shape
/// the operation reads: text, bytes or a structured value.
pub fn execute(request: &Request, payload: Payload) -> Result<Output> {
    let operation = request.operation();
    tracing::debug!("Dispatching {}.{}", request.resource(), operation);

    let result = match request {
        Request::Base64(op) => run_base64(op, payload, operation),
        Request::Binary(op) => run_binary(op, payload, operation),
        Request::Encoding(op) => run_encoding(op, payload, operation),
        Request::Format(op) => run_format(op, payload, operation),
        Request::Html(op) => run_html(op, payload, operation),
        Request::String(op) => run_string(op, payload, operation),
    };
    result.map_err(|e| e.in_operation(operation))
}

fn run_base64(op: &Base64Op, payload: Payload, operation: &str) -> Result<Output> {
    Ok(match op {
        Base64Op::TextToBase64 => {
            Output::Text(base64_codec::text_to_base64(&payload.into_text(operation)?))
        }
        Base64Op::Base64ToText => {
            Output::Text(base64_codec::base64_to_text(&payload.into_text(operation)?)?)
        }
        Base64Op::BytesToBase64 => Output::Text(base64_codec::bytes_to_base64(&payload.into_bytes())),
        Base64Op::Base64ToBytes => {
            Output::Bytes(base64_codec::base64_to_bytes(&payload.into_text(operation)?)?)
        }
        Base64Op::StructuredToBase64 => Output::Text(base64_codec::structured_to_base64(
            &payload.into_structured(operation)?,
        )),
        Base64Op::Base64ToStructured => Output::Structured(base64_codec::base64_to_structured(
            &payload.into_text(operation)?,
        )?),
        Base64Op::BuildDataUrl(options) => Output::Text(base64_codec::build_data_url(
            &payload.into_bytes(),
            &options.mime_type,
        )),
        Base64Op::ParseDataUrl => {
            let info = base64_codec::parse_data_url(&payload.into_text(operation)?)?;
            Output::Structured(serde_json::to_value(info)?)
        }
    })
}

fn run_binary(op: &BinaryOp, payload: Payload, operation: &str) -> Result<Output> {
    Ok(match op {
        BinaryOp::StructuredToBytes => {
            Output::Bytes(binary::structured_to_bytes(&payload.into_structured(operation)?)?)
        }
        BinaryOp::BytesToStructured => {
            Output::Structured(binary::bytes_to_structured(&payload.into_bytes())?)
        }
        BinaryOp::TextToBytes(options) => Output::Bytes(binary::text_to_bytes(
            &payload.into_text(operation)?,
            &options.encoding,
        )?),
        BinaryOp::BytesToText(options) => {
            Output::Text(binary::bytes_to_text(&payload.into_bytes(), &options.encoding)?)
        }
    })
}

fn run_encoding(op: &EncodingOp, payload: Payload, operation: &str) -> Result<Output> {
    Ok(match op {
        EncodingOp::UrlEncode => Output::Text(encoding::url_encode(&payload.into_text(operation)?)),
        EncodingOp::UrlDecode => {
            Output::Text(encoding::url_decode(&payload.into_text(operation)?)?)
        }
        EncodingOp::HtmlEncode => {
            Output::Text(encoding::html_encode(&payload.into_text(operation)?))
        }
        EncodingOp::HtmlDecode => {
            Output::Text(encoding::html_decode(&payload.into_text(operation)?))
        }
        EncodingOp::HexEncode => Output::Text(encoding::hex_encode(&payload.into_bytes())),
        EncodingOp::HexDecodeToText(options) => Output::Text(encoding::hex_decode_to_text(
            &payload.into_text(operation)?,
            &options.encoding,
        )?),
        EncodingOp::HexDecodeToBytes => {
            Output::Bytes(encoding::hex_decode_to_bytes(&payload.into_text(operation)?)?)
        }
    })
}

fn run_format(op: &FormatOp, payload: Payload, operation: &str) -> Result<Output> {
    Ok(match op {
        FormatOp::StructuredToXml(options) => Output::Text(format::structured_to_xml(
            &payload.into_structured(operation)?,
            options,
        )?),
        FormatOp::XmlToStructured => {
            Output::Structured(format::xml_to_structured(&payload.into_text(operation)?)?)
        }
        FormatOp::StructuredToYaml => Output::Text(format::structured_to_yaml(
            &payload.into_structured(operation)?,
        )?),
        FormatOp::YamlToStructured => {
            Output::Structured(format::yaml_to_structured(&payload.into_text(operation)?)?)
        }
        FormatOp::StructuredToCsv(options) => Output::Text(format::structured_to_csv(
            &payload.into_structured(operation)?,
            options,
        )?),
        FormatOp::CsvToStructured(options) => Output::Structured(format::csv_to_structured(
            &payload.into_text(operation)?,
            options,
        )?),
        FormatOp::StructuredToMarkdown(options) => Output::Text(format::structured_to_markdown(
            &payload.into_structured(operation)?,
            options,
        )?),
        FormatOp::StructuredToExtractedString(options) => {
            Output::Text(format::structured_to_extracted_string(
                &payload.into_structured(operation)?,
                options,
            )?)
        }
        FormatOp::CsvToMarkdown(options) => Output::Text(format::csv_to_markdown(
            &payload.into_text(operation)?,
            options,
        )?),
    })
}

fn run_html(op: &HtmlOp, payload: Payload, operation: &str) -> Result<Output> {
    Ok(match op {
        HtmlOp::StructuredToHtmlTable(options) => Output::Text(html::structured_to_html_table(
            &payload.into_structured(operation)?,
            options,
        )?),
        HtmlOp::StructuredToHtmlList(options) => Output::Text(html::structured_to_html_list(
            &payload.into_structured(operation)?,
            options,
        )?),
        HtmlOp::CsvToHtmlTable(options) => Output::Text(html::csv_to_html_table(
            &payload.into_text(operation)?,
            &options.csv,
            &options.table,
        )?),
        HtmlOp::MarkdownToHtml => {
            Output::Text(html::markdown_to_html(&payload.into_text(operation)?))
        }
        HtmlOp::HtmlToMarkdown => {
            Output::Text(html::html_to_markdown(&payload.into_text(operation)?))
        }
    })
}

fn run_string(op: &StringOp, payload: Payload, operation: &str) -> Result<Output> {
    let text = payload.into_text(operation)?;
    let value = match op {
        StringOp::Single(step) => step.apply(&text)?,
        StringOp::ApplyMultiple { steps } => apply_multiple(&text, steps)?,
    };
    Ok(match value {
        RunningValue::Text(text) => Output::Text(text),
        RunningValue::Email(parts) => Output::Structured(serde_json::to_value(parts)?),
    })
}
