use crate::config::options::{CapitalizeOptions, TitleCaseOptions};
use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase};

/// Kept lowercase in title case unless first or last.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "for", "nor", "as", "at", "by", "in", "of", "on", "to",
    "up", "with",
];

pub fn to_title_case(text: &str, options: &TitleCaseOptions) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let last = words.len().saturating_sub(1);

    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            if options.preserve_all_caps && is_all_caps(word) {
                return word.to_string();
            }
            let lower = word.to_lowercase();
            if index == 0 || index == last || !MINOR_WORDS.contains(&lower.as_str()) {
                upper_first(&lower)
            } else {
                lower
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_all_caps(word: &str) -> bool {
    word.chars().count() > 1
        && word.chars().any(char::is_alphabetic)
        && !word.chars().any(char::is_lowercase)
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn to_camel_case(text: &str) -> String {
    text.to_lower_camel_case()
}

pub fn to_kebab_case(text: &str) -> String {
    join_words(text, |fragment| fragment.to_kebab_case(), "-")
}

pub fn to_snake_case(text: &str) -> String {
    join_words(text, |fragment| fragment.to_snake_case(), "_")
}

/// Words break at whitespace, `_`, `-` and case changes. Other punctuation is
/// dropped without breaking the word, so `don't` stays one word.
fn join_words(text: &str, convert: fn(&str) -> String, separator: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .map(|chunk| {
            chunk
                .split(|c: char| !c.is_alphanumeric())
                .map(convert)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn to_upper_case(text: &str) -> String {
    text.to_uppercase()
}

pub fn to_lower_case(text: &str) -> String {
    text.to_lowercase()
}

pub fn capitalize_first(text: &str, options: &CapitalizeOptions) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest: String = if options.lower_rest {
        chars.as_str().to_lowercase()
    } else {
        chars.as_str().to_string()
    };
    first.to_uppercase().chain(rest.chars()).collect()
}
