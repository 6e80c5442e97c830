//! Base64 encodings of text, bytes and structured values, plus data URLs.

use crate::config::options::DEFAULT_MIME_TYPE;
use crate::domain::model::DataUrlInfo;
use crate::utils::error::{ConvertError, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const LENIENT_CONFIG: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

/// Standard alphabet, padding optional.
const LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT_CONFIG);
/// URL-safe alphabet, tried when the standard one rejects the input.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT_CONFIG);

static DATA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^data:([^;,]*)((?:;[^;,]*)*),(.*)$").expect("data URL pattern is valid")
});

fn decode_lenient(operation: &str, input: &str) -> Result<Vec<u8>> {
    let clean: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    LENIENT
        .decode(&clean)
        .or_else(|standard_err| {
            LENIENT_URL_SAFE
                .decode(&clean)
                .map_err(|_| ConvertError::format(operation, standard_err))
        })
}

pub fn text_to_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Invalid UTF-8 in the decoded bytes becomes U+FFFD.
pub fn base64_to_text(input: &str) -> Result<String> {
    let bytes = decode_lenient("base64ToText", input)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn base64_to_bytes(input: &str) -> Result<Vec<u8>> {
    decode_lenient("base64ToBytes", input)
}

pub fn structured_to_base64(value: &Value) -> String {
    STANDARD.encode(value.to_string())
}

pub fn base64_to_structured(input: &str) -> Result<Value> {
    let bytes = decode_lenient("base64ToStructured", input)?;
    serde_json::from_slice(&bytes).map_err(|e| ConvertError::parse("base64ToStructured", e))
}

/// `data:<mime>;base64,<payload>`; an empty MIME type falls back to
/// `application/octet-stream`.
pub fn build_data_url(data: &[u8], mime_type: &str) -> String {
    let mime_type = if mime_type.trim().is_empty() {
        DEFAULT_MIME_TYPE
    } else {
        mime_type.trim()
    };
    format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
}

pub fn parse_data_url(url: &str) -> Result<DataUrlInfo> {
    let captures = DATA_URL
        .captures(url.trim())
        .ok_or_else(|| ConvertError::format("parseDataUrl", "Invalid data URL format"))?;

    let mime_type = captures
        .get(1)
        .map(|m| m.as_str().trim())
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE);
    let is_base64 = captures
        .get(2)
        .map(|params| {
            params
                .as_str()
                .split(';')
                .any(|param| param.eq_ignore_ascii_case("base64"))
        })
        .unwrap_or(false);
    let data = captures.get(3).map(|m| m.as_str()).unwrap_or_default();

    tracing::debug!(
        "Parsed data URL: mime={}, base64={}, {} payload chars",
        mime_type,
        is_base64,
        data.len()
    );

    Ok(DataUrlInfo {
        mime_type: mime_type.to_string(),
        is_base64,
        data: data.to_string(),
    })
}

impl DataUrlInfo {
    /// Decode the payload segment: Base64 when flagged, percent-encoding otherwise.
    pub fn decode_payload(&self) -> Result<Vec<u8>> {
        if self.is_base64 {
            decode_lenient("parseDataUrl", &self.data)
        } else {
            Ok(percent_encoding::percent_decode_str(&self.data).collect())
        }
    }
}
