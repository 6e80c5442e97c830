use crate::config::options::{PadOptions, PadSide, TruncateOptions, WhitespaceOptions};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use unicode_segmentation::UnicodeSegmentation;

pub fn normalize_whitespace(text: &str, options: &WhitespaceOptions) -> String {
    let mut result = text.to_string();

    if options.trim_lines {
        result = result.split('\n').map(str::trim).collect::<Vec<_>>().join("\n");
    }
    if options.remove_empty_lines {
        result = result
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
    }
    if options.collapse_spaces {
        let mut collapsed = String::with_capacity(result.len());
        let mut in_run = false;
        for c in result.chars() {
            if c == ' ' || c == '\t' {
                if !in_run {
                    collapsed.push(' ');
                }
                in_run = true;
            } else {
                collapsed.push(c);
                in_run = false;
            }
        }
        result = collapsed;
    }

    result.trim().to_string()
}

/// Cut to `length` characters including the suffix. With `preserve_words`
/// the cut backs off to the last space, but only when that space lies past
/// half of `length`. A `length` no longer than the suffix yields a prefix of
/// the suffix.
pub fn truncate(text: &str, options: &TruncateOptions) -> Result<String> {
    options.validate().map_err(|e| e.in_operation("truncate"))?;

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= options.length {
        return Ok(text.to_string());
    }

    let suffix_len = options.suffix.chars().count();
    if options.length <= suffix_len {
        return Ok(options.suffix.chars().take(options.length).collect());
    }

    let mut kept = &chars[..options.length - suffix_len];
    if options.preserve_words {
        if let Some(last_space) = kept.iter().rposition(|&c| c == ' ') {
            if last_space as f64 > options.length as f64 * 0.5 {
                kept = &kept[..last_space];
            }
        }
    }

    let mut truncated: String = kept.iter().collect();
    truncated.push_str(&options.suffix);
    Ok(truncated)
}

/// With `PadSide::Both` an odd pad amount puts the smaller half on the left.
pub fn pad_text(text: &str, options: &PadOptions) -> String {
    let current = text.chars().count();
    if current >= options.length {
        return text.to_string();
    }

    let total = options.length - current;
    let fill = |n: usize| options.pad_char.to_string().repeat(n);
    match options.side {
        PadSide::Left => format!("{}{}", fill(total), text),
        PadSide::Right => format!("{}{}", text, fill(total)),
        PadSide::Both => {
            let left = total / 2;
            format!("{}{}{}", fill(left), text, fill(total - left))
        }
    }
}

pub fn reverse(text: &str) -> String {
    text.graphemes(true).rev().collect()
}
