//! Option records for every conversion family.
//!
//! Each struct deserializes from a flat camelCase record (the shape a host
//! passes along with the resource/operation pair); every field is optional on
//! the wire and falls back to the constants below.

use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{
    validate_ascii_char, validate_non_empty_string, validate_positive_number, validate_range,
    Validate,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_CSV_DELIMITER: char = ',';
pub const DEFAULT_QUOTE_CHAR: char = '"';
pub const DEFAULT_ESCAPE_CHAR: char = '"';
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
pub const DEFAULT_ENCODING: &str = "utf-8";
pub const DEFAULT_XML_ROOT: &str = "root";
pub const DEFAULT_INDENT: usize = 2;
pub const MAX_INDENT: usize = 16;
pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const NO_TABLE_DATA_PLACEHOLDER: &str = "<p>No data to display</p>";
pub const NO_LIST_ITEMS_PLACEHOLDER: &str = "<p>No items to display</p>";

pub const DEFAULT_FILENAME_MAX_LENGTH: usize = 255;
pub const DEFAULT_FILENAME_REPLACEMENT: &str = "_";
pub const DEFAULT_SLUG_SEPARATOR: &str = "-";
pub const DEFAULT_TRUNCATE_LENGTH: usize = 100;
pub const DEFAULT_TRUNCATE_SUFFIX: &str = "...";
pub const DEFAULT_PAD_LENGTH: usize = 10;
pub const DEFAULT_PAD_CHAR: char = ' ';

/// Accepts a one-character string, or a single digit given as a number
/// (`"padChar": 0` from a loosely typed record).
fn single_char<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<char, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CharOrDigit {
        Char(char),
        Digit(u64),
    }

    match CharOrDigit::deserialize(deserializer) {
        Ok(CharOrDigit::Char(c)) => Ok(c),
        Ok(CharOrDigit::Digit(n)) => u32::try_from(n)
            .ok()
            .and_then(|n| char::from_digit(n, 10))
            .ok_or_else(|| D::Error::custom(format!("expected a single character, got {}", n))),
        Err(_) => Err(D::Error::custom("expected a single character")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CsvOptions {
    #[serde(alias = "csvDelimiter", deserialize_with = "single_char")]
    pub delimiter: char,
    #[serde(alias = "csvHeaders", alias = "headers")]
    pub include_headers: bool,
    #[serde(alias = "quote", deserialize_with = "single_char")]
    pub quote_char: char,
    #[serde(alias = "escape", deserialize_with = "single_char")]
    pub escape_char: char,
    pub skip_empty_lines: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_CSV_DELIMITER,
            include_headers: true,
            quote_char: DEFAULT_QUOTE_CHAR,
            escape_char: DEFAULT_ESCAPE_CHAR,
            skip_empty_lines: true,
        }
    }
}

impl Validate for CsvOptions {
    fn validate(&self) -> Result<()> {
        validate_ascii_char("delimiter", self.delimiter)?;
        validate_ascii_char("quoteChar", self.quote_char)?;
        validate_ascii_char("escapeChar", self.escape_char)?;
        if self.delimiter == self.quote_char {
            return Err(ConvertError::invalid_option(
                "delimiter",
                self.delimiter,
                "Delimiter and quote character must differ",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncodingOptions {
    pub encoding: String,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataUrlOptions {
    pub mime_type: String,
}

impl Default for DataUrlOptions {
    fn default() -> Self {
        Self {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XmlOptions {
    #[serde(alias = "rootElementName")]
    pub root_name: String,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_XML_ROOT.to_string(),
        }
    }
}

impl Validate for XmlOptions {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("rootName", &self.root_name)?;
        if self
            .root_name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '"' | '\''))
        {
            return Err(ConvertError::invalid_option(
                "rootName",
                &self.root_name,
                "Not a usable XML element name",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkdownOptions {
    pub title: Option<String>,
    pub max_depth: usize,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            title: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Validate for MarkdownOptions {
    fn validate(&self) -> Result<()> {
        validate_positive_number("maxDepth", self.max_depth, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractMode {
    #[default]
    Pretty,
    Compact,
    Field,
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    #[serde(alias = "stringExtractionMode")]
    pub mode: ExtractMode,
    #[serde(alias = "indentSize")]
    pub indent: usize,
    pub field_path: String,
    pub template: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mode: ExtractMode::Pretty,
            indent: DEFAULT_INDENT,
            field_path: String::new(),
            template: String::new(),
        }
    }
}

impl Validate for ExtractOptions {
    fn validate(&self) -> Result<()> {
        validate_range("indent", self.indent, 0, MAX_INDENT)?;
        if self.mode == ExtractMode::Field {
            validate_non_empty_string("fieldPath", &self.field_path)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlTableOptions {
    pub table_class: Option<String>,
    pub header_class: Option<String>,
    pub row_class: Option<String>,
    pub cell_class: Option<String>,
    pub include_index: bool,
}

/// CSV parsing plus table rendering options, read from one flat record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTableOptions {
    #[serde(flatten)]
    pub csv: CsvOptions,
    #[serde(flatten)]
    pub table: HtmlTableOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlListOptions {
    #[serde(alias = "orderedList")]
    pub ordered: bool,
    pub max_depth: usize,
}

impl Default for HtmlListOptions {
    fn default() -> Self {
        Self {
            ordered: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Validate for HtmlListOptions {
    fn validate(&self) -> Result<()> {
        validate_positive_number("maxDepth", self.max_depth, 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CleanFilenameOptions {
    pub max_length: usize,
    pub replacement: String,
    pub preserve_extension: bool,
}

impl Default for CleanFilenameOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_FILENAME_MAX_LENGTH,
            replacement: DEFAULT_FILENAME_REPLACEMENT.to_string(),
            preserve_extension: true,
        }
    }
}

impl Validate for CleanFilenameOptions {
    fn validate(&self) -> Result<()> {
        validate_positive_number("maxLength", self.max_length, 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlugifyOptions {
    pub separator: String,
    pub lowercase: bool,
    pub strict: bool,
}

impl Default for SlugifyOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SLUG_SEPARATOR.to_string(),
            lowercase: true,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TitleCaseOptions {
    pub preserve_all_caps: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WhitespaceOptions {
    pub collapse_spaces: bool,
    pub trim_lines: bool,
    pub remove_empty_lines: bool,
}

impl Default for WhitespaceOptions {
    fn default() -> Self {
        Self {
            collapse_spaces: true,
            trim_lines: true,
            remove_empty_lines: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpecialCharsOptions {
    pub keep_spaces: bool,
    pub keep_numbers: bool,
    pub keep_basic_punctuation: bool,
    pub keep_filename_chars: bool,
    pub custom_allowed: String,
    pub keep_file_extension: bool,
}

impl Default for SpecialCharsOptions {
    fn default() -> Self {
        Self {
            keep_spaces: true,
            keep_numbers: true,
            keep_basic_punctuation: false,
            keep_filename_chars: false,
            custom_allowed: String::new(),
            keep_file_extension: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapitalizeOptions {
    pub lower_rest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TruncateOptions {
    pub length: usize,
    pub suffix: String,
    pub preserve_words: bool,
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_TRUNCATE_LENGTH,
            suffix: DEFAULT_TRUNCATE_SUFFIX.to_string(),
            preserve_words: true,
        }
    }
}

impl Validate for TruncateOptions {
    fn validate(&self) -> Result<()> {
        validate_positive_number("length", self.length, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PadSide {
    Left,
    #[default]
    Right,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PadOptions {
    #[serde(alias = "padLength")]
    pub length: usize,
    #[serde(deserialize_with = "single_char")]
    pub pad_char: char,
    #[serde(alias = "padSide")]
    pub side: PadSide,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_PAD_LENGTH,
            pad_char: DEFAULT_PAD_CHAR,
            side: PadSide::Right,
        }
    }
}
