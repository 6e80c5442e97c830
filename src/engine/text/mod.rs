//! Text transforms: case styles, sanitizing, layout, email parsing, chains.

pub mod case;
pub mod chain;
pub mod email;
pub mod layout;
pub mod sanitize;

pub use case::{
    capitalize_first, to_camel_case, to_kebab_case, to_lower_case, to_snake_case, to_title_case,
    to_upper_case,
};
pub use chain::{apply_multiple, StringTransform};
pub use email::parse_email_address;
pub use layout::{normalize_whitespace, pad_text, reverse, truncate};
pub use sanitize::{clean_filename, remove_special_chars, slugify};
