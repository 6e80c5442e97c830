use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{operation}: failed to parse input: {cause}")]
    ParseError { operation: String, cause: String },

    #[error("{operation}: malformed input: {cause}")]
    FormatError { operation: String, cause: String },

    #[error("{operation}: unsupported character encoding: {cause}")]
    EncodingError { operation: String, cause: String },

    #[error("{operation}: field not found: {path}")]
    FieldNotFoundError { operation: String, path: String },

    #[error("{operation}: step {step} ({step_operation}) expects text but the running value is {found}")]
    TypeMismatchError {
        operation: String,
        step: usize,
        step_operation: String,
        found: String,
    },

    #[error("{operation}: nesting exceeds the depth limit of {limit}")]
    DepthLimitError { operation: String, limit: usize },

    #[error("{}Invalid option '{field}' = '{value}': {reason}", operation_prefix(.operation))]
    InvalidOptionError {
        operation: Option<String>,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The payload itself could not be read in the requested format.
    Input,
    /// The request or its options were wrong.
    Request,
    /// Files, stdin/stdout or serialization of the final result.
    System,
}

impl ConvertError {
    pub fn parse(operation: &str, cause: impl ToString) -> Self {
        Self::ParseError {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn format(operation: &str, cause: impl ToString) -> Self {
        Self::FormatError {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn encoding(operation: &str, cause: impl ToString) -> Self {
        Self::EncodingError {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn field_not_found(operation: &str, path: &str) -> Self {
        Self::FieldNotFoundError {
            operation: operation.to_string(),
            path: path.to_string(),
        }
    }

    pub fn depth_limit(operation: &str, limit: usize) -> Self {
        Self::DepthLimitError {
            operation: operation.to_string(),
            limit,
        }
    }

    pub fn invalid_option(field: &str, value: impl ToString, reason: impl ToString) -> Self {
        Self::InvalidOptionError {
            operation: None,
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Attach the operation name to an option error raised before the
    /// operation knew its own name. Other errors pass through unchanged.
    pub fn in_operation(self, name: &str) -> Self {
        match self {
            Self::InvalidOptionError {
                operation: None,
                field,
                value,
                reason,
            } => Self::InvalidOptionError {
                operation: Some(name.to_string()),
                field,
                value,
                reason,
            },
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ParseError { .. }
            | Self::FormatError { .. }
            | Self::FieldNotFoundError { .. }
            | Self::DepthLimitError { .. } => ErrorCategory::Input,
            Self::EncodingError { .. }
            | Self::TypeMismatchError { .. }
            | Self::InvalidOptionError { .. }
            | Self::ConfigError { .. } => ErrorCategory::Request,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// Name of the operation that failed, when the error came from a conversion.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::ParseError { operation, .. }
            | Self::FormatError { operation, .. }
            | Self::EncodingError { operation, .. }
            | Self::FieldNotFoundError { operation, .. }
            | Self::TypeMismatchError { operation, .. }
            | Self::DepthLimitError { operation, .. } => Some(operation),
            Self::InvalidOptionError { operation, .. } => operation.as_deref(),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ParseError { operation, .. } => {
                format!("The input could not be read for '{}'", operation)
            }
            Self::FormatError { operation, .. } => {
                format!("The input is not valid for '{}'", operation)
            }
            Self::EncodingError { cause, .. } => {
                format!("Character encoding '{}' is not supported", cause)
            }
            Self::FieldNotFoundError { path, .. } => {
                format!("The field '{}' does not exist in the input", path)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ParseError { .. } => "Check that the input really is in the source format",
            Self::FormatError { .. } => "Check the input for stray or truncated characters",
            Self::EncodingError { .. } => "Use a WHATWG encoding label such as utf-8 or latin1",
            Self::FieldNotFoundError { .. } => {
                "Use dot and bracket notation, e.g. data.items[0].name"
            }
            Self::TypeMismatchError { .. } => {
                "Move parseEmailAddress to the end of the operation chain"
            }
            Self::DepthLimitError { .. } => "Raise maxDepth or flatten the input",
            Self::InvalidOptionError { .. } | Self::ConfigError { .. } => {
                "Review the request options"
            }
            Self::IoError(_) => "Check that the input and output paths are accessible",
            Self::SerializationError(_) => "Report the input that triggered this error",
        }
    }
}

fn operation_prefix(operation: &Option<String>) -> String {
    operation
        .as_deref()
        .map(|name| format!("{}: ", name))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_carries_operation_and_cause() {
        let err = ConvertError::parse("csvToStructured", "unclosed quote");
        assert_eq!(
            err.to_string(),
            "csvToStructured: failed to parse input: unclosed quote"
        );
        assert_eq!(err.operation(), Some("csvToStructured"));
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_io_error_is_system_category() {
        let err: ConvertError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.category(), ErrorCategory::System);
        assert!(err.operation().is_none());
    }

    #[test]
    fn test_option_error_names_its_operation() {
        let err = ConvertError::invalid_option("length", 0, "Must be greater than 0");
        assert_eq!(err.operation(), None);

        let err = err.in_operation("truncate");
        assert_eq!(err.operation(), Some("truncate"));
        assert_eq!(
            err.to_string(),
            "truncate: Invalid option 'length' = '0': Must be greater than 0"
        );

        // The first name attached wins.
        let err = err.in_operation("applyMultiple");
        assert_eq!(err.operation(), Some("truncate"));
    }
}
