use crate::utils::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input handed to one conversion. Operations coerce it to the shape they need.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Structured(Value),
    Bytes(Vec<u8>),
}

/// Result of one conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Text(String),
    Structured(Value),
    Bytes(Vec<u8>),
}

/// Pieces of a `data:<mime>[;base64],<payload>` URL. `data` is the raw
/// segment after the comma, never decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUrlInfo {
    pub mime_type: String,
    pub is_base64: bool,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailParts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub local_part: String,
    pub domain: String,
}

/// Value threaded through a transform chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunningValue {
    Text(String),
    Email(EmailParts),
}

impl RunningValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Email(_) => "parsed email address",
        }
    }
}

impl Payload {
    pub fn into_text(self, operation: &str) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Bytes(bytes) => String::from_utf8(bytes)
                .map_err(|e| ConvertError::format(operation, format!("input is not UTF-8: {}", e))),
            Self::Structured(Value::String(text)) => Ok(text),
            Self::Structured(value) => Ok(value.to_string()),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
            Self::Structured(Value::String(text)) => text.into_bytes(),
            Self::Structured(value) => value.to_string().into_bytes(),
        }
    }

    pub fn into_structured(self, operation: &str) -> Result<Value> {
        match self {
            Self::Structured(value) => Ok(value),
            Self::Text(text) => {
                serde_json::from_str(&text).map_err(|e| ConvertError::parse(operation, e))
            }
            Self::Bytes(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| ConvertError::parse(operation, e))
            }
        }
    }
}

impl Output {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Bytes to persist: text as UTF-8, structured values as pretty JSON.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        Ok(match self {
            Self::Text(text) => text.into_bytes(),
            Self::Structured(value) => serde_json::to_vec_pretty(&value)?,
            Self::Bytes(bytes) => bytes,
        })
    }
}
