//! Byte sequence ⇄ text / structured value.

use crate::utils::error::{ConvertError, Result};
use encoding_rs::Encoding;
use serde_json::Value;

/// A resolved character encoding. UTF-16 is kept apart because
/// `encoding_rs` only decodes it; encoding to UTF-16 is done by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf16Le,
    Utf16Be,
    Label(&'static Encoding),
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Label(encoding) => encoding.name(),
        }
    }
}

/// Resolve an encoding name. Accepts WHATWG labels plus the Node-style
/// spellings hosts commonly pass (`utf8`, `utf16le`, `ucs2`, `binary`).
pub fn resolve_encoding(operation: &str, name: &str) -> Result<TextEncoding> {
    let normalized = name.trim().to_ascii_lowercase();
    let label = match normalized.as_str() {
        "" => crate::config::options::DEFAULT_ENCODING,
        "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => return Ok(TextEncoding::Utf16Le),
        "utf16be" | "utf-16be" => return Ok(TextEncoding::Utf16Be),
        "binary" => "latin1",
        other => other,
    };

    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) if encoding == encoding_rs::UTF_16LE => Ok(TextEncoding::Utf16Le),
        Some(encoding) if encoding == encoding_rs::UTF_16BE => Ok(TextEncoding::Utf16Be),
        Some(encoding) if encoding == encoding_rs::REPLACEMENT => {
            Err(ConvertError::encoding(operation, name))
        }
        Some(encoding) => Ok(TextEncoding::Label(encoding)),
        None => Err(ConvertError::encoding(operation, name)),
    }
}

pub fn bytes_to_structured(bytes: &[u8]) -> Result<Value> {
    tracing::debug!("Parsing {} bytes as JSON", bytes.len());
    serde_json::from_slice(bytes).map_err(|e| ConvertError::parse("bytesToStructured", e))
}

pub fn structured_to_bytes(value: &Value) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub fn text_to_bytes(text: &str, encoding: &str) -> Result<Vec<u8>> {
    let encoding = resolve_encoding("textToBytes", encoding)?;
    Ok(encode_text(text, encoding))
}

pub fn bytes_to_text(bytes: &[u8], encoding: &str) -> Result<String> {
    let encoding = resolve_encoding("bytesToText", encoding)?;
    Ok(decode_bytes(bytes, encoding))
}

pub(crate) fn encode_text(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        TextEncoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        TextEncoding::Label(encoding) => {
            let (bytes, _, had_errors) = encoding.encode(text);
            if had_errors {
                tracing::debug!(
                    "Characters not representable in {} were written as numeric references",
                    encoding.name()
                );
            }
            bytes.into_owned()
        }
    }
}

/// Malformed sequences decode to U+FFFD rather than failing.
pub(crate) fn decode_bytes(bytes: &[u8], encoding: TextEncoding) -> String {
    let encoding = match encoding {
        TextEncoding::Utf16Le => encoding_rs::UTF_16LE,
        TextEncoding::Utf16Be => encoding_rs::UTF_16BE,
        TextEncoding::Label(encoding) => encoding,
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::debug!("Replaced malformed {} sequences", encoding.name());
    }
    text.into_owned()
}
