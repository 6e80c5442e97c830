//! Percent-encoding, HTML entities and hexadecimal.

use crate::engine::binary::{self, decode_bytes};
use crate::utils::error::{ConvertError, Result};
use once_cell::sync::Lazy;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:(amp|lt|gt|quot|apos)|#([0-9]+)|#[xX]([0-9a-fA-F]+));")
        .expect("entity pattern is valid")
});

pub fn url_encode(text: &str) -> String {
    utf8_percent_encode(text, URL_COMPONENT).to_string()
}

pub fn url_decode(text: &str) -> Result<String> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|&b| b == b'%') {
        let at = i + offset;
        let well_formed = bytes
            .get(at + 1..at + 3)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(ConvertError::format(
                "urlDecode",
                format!("malformed percent sequence at byte {}", at),
            ));
        }
        i = at + 3;
    }

    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ConvertError::format("urlDecode", e))
}

pub fn html_encode(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => encoded.push_str("&amp;"),
            '<' => encoded.push_str("&lt;"),
            '>' => encoded.push_str("&gt;"),
            '"' => encoded.push_str("&quot;"),
            '\'' => encoded.push_str("&#39;"),
            '/' => encoded.push_str("&#x2F;"),
            '`' => encoded.push_str("&#x60;"),
            '=' => encoded.push_str("&#x3D;"),
            other => encoded.push(other),
        }
    }
    encoded
}

/// Single left-to-right pass: each entity is resolved once and the output is
/// never rescanned, so `&amp;lt;` decodes to `&lt;`. Numeric references that
/// are not valid scalar values are left as written.
pub fn html_decode(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            if let Some(name) = caps.get(1) {
                return match name.as_str() {
                    "amp" => "&",
                    "lt" => "<",
                    "gt" => ">",
                    "quot" => "\"",
                    _ => "'",
                }
                .to_string();
            }

            let code = match (caps.get(2), caps.get(3)) {
                (Some(dec), _) => dec.as_str().parse::<u32>().ok(),
                (_, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok(),
                _ => None,
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Non-hex characters (spaces, `0x`-less separators, colons) are dropped first.
pub fn hex_decode_to_bytes(text: &str) -> Result<Vec<u8>> {
    let digits: String = text.chars().filter(char::is_ascii_hexdigit).collect();
    if digits.len() % 2 != 0 {
        return Err(ConvertError::format(
            "hexDecode",
            format!("odd number of hex digits ({})", digits.len()),
        ));
    }
    hex::decode(&digits).map_err(|e| ConvertError::format("hexDecode", e))
}

pub fn hex_decode_to_text(text: &str, encoding: &str) -> Result<String> {
    let encoding = binary::resolve_encoding("hexDecodeToText", encoding)?;
    let bytes = hex_decode_to_bytes(text).map_err(|e| match e {
        ConvertError::FormatError { cause, .. } => ConvertError::format("hexDecodeToText", cause),
        other => other,
    })?;
    Ok(decode_bytes(&bytes, encoding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encode_matches_component_rules() {
        assert_eq!(url_encode("a b&c=d/é"), "a%20b%26c%3Dd%2F%C3%A9");
        assert_eq!(url_encode("-_.!~*'()"), "-_.!~*'()");
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("a%20b%26c").unwrap(), "a b&c");
        assert_eq!(url_decode("a+b").unwrap(), "a+b");
        assert_eq!(url_decode("%C3%A9").unwrap(), "é");
    }

    #[test]
    fn test_url_decode_rejects_malformed_sequences() {
        assert!(matches!(
            url_decode("100%"),
            Err(ConvertError::FormatError { .. })
        ));
        assert!(url_decode("%zz").is_err());
        assert!(url_decode("%C3").is_err());
    }

    #[test]
    fn test_html_encode_exact_set() {
        assert_eq!(
            html_encode(r#"<a href="x">'/`=&</a>"#),
            "&lt;a href&#x3D;&quot;x&quot;&gt;&#39;&#x2F;&#x60;&#x3D;&amp;&lt;&#x2F;a&gt;"
        );
    }

    #[test]
    fn test_html_decode_reverses_encode() {
        let original = r#"<p class="x">Tom & 'Jerry' / `=`</p>"#;
        assert_eq!(html_decode(&html_encode(original)), original);
    }

    #[test]
    fn test_html_decode_numeric_and_apos() {
        assert_eq!(html_decode("&#65;&#x42;&#X43;&apos;"), "ABC'");
    }

    #[test]
    fn test_html_decode_is_single_pass() {
        assert_eq!(html_decode("&amp;lt;b&amp;gt;"), "&lt;b&gt;");
        assert_eq!(html_decode("&amp;#39;"), "&#39;");
    }

    #[test]
    fn test_html_decode_keeps_invalid_code_points() {
        assert_eq!(html_decode("&#xD800;&#99999999999;"), "&#xD800;&#99999999999;");
        assert_eq!(html_decode("&nbsp;"), "&nbsp;");
    }

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(hex_encode(b"Hi!"), "486921");
        assert_eq!(hex_decode_to_text("48 69 21", "utf-8").unwrap(), "Hi!");
        assert_eq!(hex_decode_to_bytes("DE:AD:be:ef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_hex_decode_odd_length() {
        let err = hex_decode_to_text("abc", "utf-8").unwrap_err();
        assert!(matches!(err, ConvertError::FormatError { .. }));
        assert!(err.to_string().starts_with("hexDecodeToText"));
    }
}
