//! # SQL Literal Codec
//!
//! Text forms exchanged with the engine, both when rendering values into
//! generated statements and when reading values back out of text results.
//!
//! | Kind | Format | Example |
//! |------|--------|---------|
//! | Integer | plain decimal | `-42` |
//! | Float | plain decimal, no exponent | `2.5` |
//! | Boolean | `0` / `1` | `1` |
//! | Text | single-quoted, unescaped | `'hello'` |
//! | Blob | `X'` + hex pairs + `'` | `X'00ff1a'` |
//!
//! Blob parsing accepts either hex case and either `X` or `x`, and tolerates
//! the literal being handed over without its `X'...'` wrapper.
//!
//! ## Error Handling
//!
//! All functions return `eyre::Result` with the offending text in context:
//!
//! ```text
//! "hex string must have even length, got 3"
//! "invalid hex byte: 'zz'"
//! ```

use eyre::{bail, Result, WrapErr};
use std::borrow::Cow;
use std::fmt::Write;

/// Lowercase hex, two digits per byte.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

pub fn render_blob_literal(bytes: &[u8]) -> String {
    format!("X'{}'", encode_hex(bytes))
}

pub fn parse_hex_blob(s: &str) -> Result<Vec<u8>> {
    if !s.is_ascii() {
        bail!("hex string contains non-ASCII characters: '{}'", s);
    }
    if s.len() % 2 != 0 {
        bail!("hex string must have even length, got {}", s.len());
    }

    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .wrap_err_with(|| format!("invalid hex byte: '{}'", &s[i..i + 2]))
        })
        .collect()
}

/// Parses `X'..'`, `x'..'`, `'..'` or bare hex pairs into bytes.
pub fn parse_blob_literal(s: &str) -> Result<Vec<u8>> {
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix('X')
        .or_else(|| trimmed.strip_prefix('x'))
        .unwrap_or(trimmed);

    let hex = match (body.strip_prefix('\''), body.ends_with('\'')) {
        (Some(rest), true) if !rest.is_empty() => &rest[..rest.len() - 1],
        (Some(_), _) => bail!("unterminated blob literal: {}", trimmed),
        (None, _) => body,
    };

    parse_hex_blob(hex).wrap_err_with(|| format!("invalid blob literal: {}", trimmed))
}

/// Strips one layer of SQL single quotes and collapses doubled quotes.
///
/// Used on catalog default values, which SQLite reports exactly as written
/// in the CREATE statement. Anything not wrapped in quotes is returned as is.
pub fn unquote_text_literal(s: &str) -> Cow<'_, str> {
    let trimmed = s.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        let inner = &trimmed[1..trimmed.len() - 1];
        if inner.contains("''") {
            Cow::Owned(inner.replace("''", "'"))
        } else {
            Cow::Borrowed(inner)
        }
    } else {
        Cow::Borrowed(s)
    }
}

pub fn parse_bool(s: &str) -> Result<bool> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if t.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    let n: i64 = t
        .parse()
        .wrap_err_with(|| format!("invalid boolean literal: '{}'", t))?;
    Ok(n != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_literal_uses_two_lowercase_digits_per_byte() {
        assert_eq!(render_blob_literal(&[0x00, 0xFF, 0x1A]), "X'00ff1a'");
        assert_eq!(render_blob_literal(&[]), "X''");
    }

    #[test]
    fn blob_literal_parsing_is_case_insensitive() {
        assert_eq!(
            parse_blob_literal("X'00FF1A'").unwrap(),
            vec![0x00, 0xFF, 0x1A]
        );
        assert_eq!(
            parse_blob_literal("x'00ff1a'").unwrap(),
            vec![0x00, 0xFF, 0x1A]
        );
    }

    #[test]
    fn blob_literal_tolerates_missing_wrapper() {
        assert_eq!(parse_blob_literal("'0a0b'").unwrap(), vec![0x0A, 0x0B]);
        assert_eq!(parse_blob_literal("0a0b").unwrap(), vec![0x0A, 0x0B]);
        assert_eq!(parse_blob_literal("X''").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn blob_literal_rejects_odd_or_bad_digits() {
        assert!(parse_blob_literal("X'abc'").is_err());
        assert!(parse_blob_literal("X'zz'").is_err());
        assert!(parse_blob_literal("X'00").is_err());
        assert!(parse_blob_literal("X'é0'").is_err());
    }

    #[test]
    fn unquote_handles_doubled_quotes() {
        assert_eq!(unquote_text_literal("'it''s'"), "it's");
        assert_eq!(unquote_text_literal("'plain'"), "plain");
        assert_eq!(unquote_text_literal("bare"), "bare");
        assert_eq!(unquote_text_literal("'"), "'");
    }

    #[test]
    fn bool_accepts_integers_and_words() {
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(parse_bool("yes").is_err());
    }
}
