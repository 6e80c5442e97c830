//! Single text transforms as data, and chains of them.

use crate::config::options::{
    CapitalizeOptions, CleanFilenameOptions, PadOptions, SlugifyOptions, SpecialCharsOptions,
    TitleCaseOptions, TruncateOptions, WhitespaceOptions,
};
use crate::domain::model::RunningValue;
use crate::engine::text::{case, email, layout, sanitize};
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};

/// One transform with its own options, tagged by `op`:
/// `{"op": "truncate", "length": 20}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum StringTransform {
    CleanFilename(CleanFilenameOptions),
    Slugify(SlugifyOptions),
    ToTitleCase(TitleCaseOptions),
    ToCamelCase,
    ToKebabCase,
    ToSnakeCase,
    ToUpperCase,
    ToLowerCase,
    NormalizeWhitespace(WhitespaceOptions),
    RemoveSpecialChars(SpecialCharsOptions),
    CapitalizeFirst(CapitalizeOptions),
    Reverse,
    Truncate(TruncateOptions),
    PadText(PadOptions),
    ParseEmailAddress,
}

impl StringTransform {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CleanFilename(_) => "cleanFilename",
            Self::Slugify(_) => "slugify",
            Self::ToTitleCase(_) => "toTitleCase",
            Self::ToCamelCase => "toCamelCase",
            Self::ToKebabCase => "toKebabCase",
            Self::ToSnakeCase => "toSnakeCase",
            Self::ToUpperCase => "toUpperCase",
            Self::ToLowerCase => "toLowerCase",
            Self::NormalizeWhitespace(_) => "normalizeWhitespace",
            Self::RemoveSpecialChars(_) => "removeSpecialChars",
            Self::CapitalizeFirst(_) => "capitalizeFirst",
            Self::Reverse => "reverse",
            Self::Truncate(_) => "truncate",
            Self::PadText(_) => "padText",
            Self::ParseEmailAddress => "parseEmailAddress",
        }
    }

    pub fn apply(&self, text: &str) -> Result<RunningValue> {
        let transformed = match self {
            Self::CleanFilename(options) => sanitize::clean_filename(text, options)?,
            Self::Slugify(options) => sanitize::slugify(text, options),
            Self::ToTitleCase(options) => case::to_title_case(text, options),
            Self::ToCamelCase => case::to_camel_case(text),
            Self::ToKebabCase => case::to_kebab_case(text),
            Self::ToSnakeCase => case::to_snake_case(text),
            Self::ToUpperCase => case::to_upper_case(text),
            Self::ToLowerCase => case::to_lower_case(text),
            Self::NormalizeWhitespace(options) => layout::normalize_whitespace(text, options),
            Self::RemoveSpecialChars(options) => sanitize::remove_special_chars(text, options),
            Self::CapitalizeFirst(options) => case::capitalize_first(text, options),
            Self::Reverse => layout::reverse(text),
            Self::Truncate(options) => layout::truncate(text, options)?,
            Self::PadText(options) => layout::pad_text(text, options),
            Self::ParseEmailAddress => {
                return email::parse_email_address(text).map(RunningValue::Email)
            }
        };
        Ok(RunningValue::Text(transformed))
    }
}

impl Validate for StringTransform {
    fn validate(&self) -> Result<()> {
        match self {
            Self::CleanFilename(options) => options.validate(),
            Self::Truncate(options) => options.validate(),
            _ => Ok(()),
        }
    }
}

/// Run `steps` left to right, each on the previous step's output. Every
/// transform takes text, so once `parseEmailAddress` has produced an address
/// any later step fails the whole chain. Steps are numbered from 1 in errors.
pub fn apply_multiple(text: &str, steps: &[StringTransform]) -> Result<RunningValue> {
    for step in steps {
        step.validate().map_err(|e| e.in_operation("applyMultiple"))?;
    }

    let mut current = RunningValue::Text(text.to_string());
    for (index, step) in steps.iter().enumerate() {
        current = match current {
            RunningValue::Text(text) => step.apply(&text)?,
            other => {
                return Err(ConvertError::TypeMismatchError {
                    operation: "applyMultiple".to_string(),
                    step: index + 1,
                    step_operation: step.name().to_string(),
                    found: other.kind().to_string(),
                })
            }
        };
        tracing::debug!("Chain step {} ({}) applied", index + 1, step.name());
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn steps(value: serde_json::Value) -> Vec<StringTransform> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_chain_threads_output() {
        let chain = steps(json!([{"op": "normalizeWhitespace"}, {"op": "toKebabCase"}]));
        assert_eq!(
            apply_multiple("  Hello_World!!  ", &chain).unwrap(),
            RunningValue::Text("hello-world".to_string())
        );
    }

    #[test]
    fn test_step_options_are_independent() {
        let chain = steps(json!([
            {"op": "padText", "length": 6, "padChar": "*"},
            {"op": "padText"}
        ]));
        assert_eq!(
            apply_multiple("ab", &chain).unwrap(),
            RunningValue::Text("ab****    ".to_string())
        );
    }

    #[test]
    fn test_email_step_ends_the_chain() {
        let chain = steps(json!([{"op": "toLowerCase"}, {"op": "parseEmailAddress"}]));
        match apply_multiple("Ada <ADA@Example.com>", &chain).unwrap() {
            RunningValue::Email(parts) => {
                assert_eq!(parts.name.as_deref(), Some("ada"));
                assert_eq!(parts.domain, "example.com");
            }
            other => panic!("expected an email, got {:?}", other),
        }
    }

    #[test]
    fn test_text_step_after_email_is_a_type_mismatch() {
        let chain = steps(json!([{"op": "parseEmailAddress"}, {"op": "toUpperCase"}]));
        let err = apply_multiple("ada@example.com", &chain).unwrap_err();
        match err {
            ConvertError::TypeMismatchError {
                step,
                step_operation,
                ..
            } => {
                assert_eq!(step, 2);
                assert_eq!(step_operation, "toUpperCase");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_invalid_step_options_fail_before_running() {
        let chain = steps(json!([{"op": "toUpperCase"}, {"op": "truncate", "length": 0}]));
        let err = apply_multiple("x", &chain).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidOptionError { .. }));
        assert!(err.to_string().starts_with("applyMultiple: "));
    }

    #[test]
    fn test_empty_chain_returns_input() {
        assert_eq!(
            apply_multiple("same", &[]).unwrap(),
            RunningValue::Text("same".to_string())
        );
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let result: std::result::Result<Vec<StringTransform>, _> =
            serde_json::from_value(json!([{"op": "shout"}]));
        assert!(result.is_err());
    }
}
