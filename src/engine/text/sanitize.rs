//! Filename, slug and character-class cleanup.

use crate::config::options::{CleanFilenameOptions, SlugifyOptions, SpecialCharsOptions};
use crate::utils::validation::Validate;
use crate::utils::error::Result;

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];
const UNNAMED: &str = "unnamed";
const BASIC_PUNCTUATION: &str = ".,!?;:";
const FILENAME_PUNCTUATION: &str = "-_.";

fn is_unsafe_filename_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '.')
        || (c as u32) < 0x20
        || (0x80..=0xff).contains(&(c as u32))
        || c.is_whitespace()
}

/// Split `name.ext` at the last dot; a leading dot is part of the name.
fn split_extension(text: &str) -> (&str, &str) {
    match text.rfind('.') {
        Some(dot) if dot > 0 => text.split_at(dot),
        _ => (text, ""),
    }
}

/// Collapse runs of `separator` and strip it from both ends.
fn tidy_separators(text: &str, separator: &str) -> String {
    if separator.is_empty() {
        return text.to_string();
    }
    let doubled = separator.repeat(2);
    let mut tidy = text.to_string();
    while tidy.contains(&doubled) {
        tidy = tidy.replace(&doubled, separator);
    }
    let tidy = tidy.strip_prefix(separator).unwrap_or(&tidy);
    tidy.strip_suffix(separator).unwrap_or(tidy).to_string()
}

pub fn clean_filename(filename: &str, options: &CleanFilenameOptions) -> Result<String> {
    options.validate().map_err(|e| e.in_operation("cleanFilename"))?;

    let (stem, extension) = if options.preserve_extension {
        split_extension(filename)
    } else {
        (filename, "")
    };

    let replaced: String = stem
        .chars()
        .map(|c| {
            if is_unsafe_filename_char(c) {
                options.replacement.clone()
            } else {
                c.to_string()
            }
        })
        .collect();
    let mut name = tidy_separators(&replaced, &options.replacement);

    if RESERVED_NAMES.contains(&name.to_uppercase().as_str()) {
        name = format!("{}{}file", name, options.replacement);
    }
    if name.is_empty() {
        name = UNNAMED.to_string();
    }

    let max_name = options
        .max_length
        .saturating_sub(extension.chars().count());
    if name.chars().count() > max_name {
        name = name.chars().take(max_name).collect();
    }

    Ok(format!("{}{}", name, extension))
}

pub fn slugify(text: &str, options: &SlugifyOptions) -> String {
    let separator = options.separator.as_str();
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_whitespace() {
            slug.push_str(separator);
        } else if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '~') {
            slug.push(c);
        } else if !options.strict {
            slug.push_str(separator);
        }
    }

    let slug = tidy_separators(&slug, separator);
    if options.lowercase {
        slug.to_lowercase()
    } else {
        slug
    }
}

/// Keep ASCII letters plus whatever the flags allow. With
/// `keep_file_extension`, everything from the last dot on is left untouched.
pub fn remove_special_chars(text: &str, options: &SpecialCharsOptions) -> String {
    let (body, extension) = if options.keep_file_extension {
        split_extension(text)
    } else {
        (text, "")
    };

    let allowed = |c: char| {
        c.is_ascii_alphabetic()
            || (options.keep_numbers && c.is_ascii_digit())
            || (options.keep_spaces && c == ' ')
            || (options.keep_basic_punctuation && BASIC_PUNCTUATION.contains(c))
            || (options.keep_filename_chars && FILENAME_PUNCTUATION.contains(c))
            || options.custom_allowed.contains(c)
    };

    let mut cleaned: String = body.chars().filter(|&c| allowed(c)).collect();
    cleaned.push_str(extension);
    cleaned
}
