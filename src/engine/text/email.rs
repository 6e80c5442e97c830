use crate::domain::model::EmailParts;
use crate::utils::error::{ConvertError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static NAMED_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*<([^<>]*)>$").expect("named address pattern is valid"));
static ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([^\s@<>()\[\],;:"]+)@([A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?)$"#)
        .expect("address pattern is valid")
});

/// Accepts `Display Name <user@domain>`, `"Quoted, Name" <user@domain>`,
/// `<user@domain>` and a bare `user@domain`.
pub fn parse_email_address(text: &str) -> Result<EmailParts> {
    let text = text.trim();
    let (name, address) = match NAMED_ADDRESS.captures(text) {
        Some(caps) => (unquote(caps[1].trim()), caps[2].trim().to_string()),
        None => (None, text.to_string()),
    };

    let caps = ADDRESS.captures(&address).ok_or_else(|| {
        ConvertError::format(
            "parseEmailAddress",
            format!("'{}' is not an email address", text),
        )
    })?;
    if caps[2].contains("..") {
        return Err(ConvertError::format(
            "parseEmailAddress",
            format!("domain '{}' has an empty label", &caps[2]),
        ));
    }

    Ok(EmailParts {
        name,
        local_part: caps[1].to_string(),
        domain: caps[2].to_string(),
        email: address,
    })
}

fn unquote(name: &str) -> Option<String> {
    let name = name
        .strip_prefix('"')
        .and_then(|n| n.strip_suffix('"'))
        .map(|n| n.replace("\\\"", "\""))
        .unwrap_or_else(|| name.to_string());
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}
