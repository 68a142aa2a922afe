//! Literal decoding: undo quoting and escape processing.
//!
//! Decoders return `None` for anything malformed; callers fall back to the
//! raw literal text.

use crate::ts::{LiteralKind, SourceLang};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Go,
    Rust,
}

/// Decoded attribute value for a literal: the unquoted content for string
/// and character literals, the raw text for everything else.
pub fn literal_value(lang: SourceLang, kind: LiteralKind, raw: &str) -> String {
    let decoded = match kind {
        LiteralKind::String | LiteralKind::Char => match lang {
            SourceLang::Go => unquote_go(raw),
            SourceLang::Rust => unquote_rust(raw),
        },
        _ => None,
    };
    decoded.unwrap_or_else(|| raw.to_string())
}

/// Unquote a Go string, raw string or rune literal.
pub fn unquote_go(raw: &str) -> Option<String> {
    let quote = raw.chars().next()?;
    if !matches!(quote, '`' | '"' | '\'') || raw.len() < 2 || !raw.ends_with(quote) {
        return None;
    }
    let body = &raw[1..raw.len() - 1];

    match quote {
        '`' => {
            if body.contains('`') {
                return None;
            }
            Some(body.replace('\r', ""))
        }
        '"' => decode(body, '"', Dialect::Go),
        '\'' => decode(body, '\'', Dialect::Go).filter(|s| s.chars().count() == 1),
        _ => None,
    }
}

/// Unquote a Rust string, raw string, byte string or char literal.
pub fn unquote_rust(raw: &str) -> Option<String> {
    let unprefixed = raw
        .strip_prefix(|c: char| c == 'b' || c == 'c')
        .unwrap_or(raw);

    if let Some(rest) = unprefixed.strip_prefix('r') {
        let hashes = rest.len() - rest.trim_start_matches('#').len();
        let fence = &rest[..hashes];
        let body = rest[hashes..]
            .strip_prefix('"')?
            .strip_suffix(fence)?
            .strip_suffix('"')?;
        return Some(body.to_string());
    }

    if let Some(body) = unprefixed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        return decode(body, '"', Dialect::Rust);
    }

    let body = unprefixed.strip_prefix('\'')?.strip_suffix('\'')?;
    decode(body, '\'', Dialect::Rust).filter(|s| s.chars().count() == 1)
}

fn decode(body: &str, quote: char, dialect: Dialect) -> Option<String> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match dialect {
                Dialect::Go => go_escape(&mut chars, quote, &mut out)?,
                Dialect::Rust => rust_escape(&mut chars, &mut out)?,
            },
            '\n' if dialect == Dialect::Go => return None,
            c if c == quote => return None,
            c => push_char(&mut out, c),
        }
    }

    String::from_utf8(out).ok()
}

fn go_escape(chars: &mut Peekable<Chars<'_>>, quote: char, out: &mut Vec<u8>) -> Option<()> {
    let c = chars.next()?;
    match c {
        'a' => out.push(0x07),
        'b' => out.push(0x08),
        'f' => out.push(0x0c),
        'n' => out.push(b'\n'),
        'r' => out.push(b'\r'),
        't' => out.push(b'\t'),
        'v' => out.push(0x0b),
        '\\' => out.push(b'\\'),
        '\'' | '"' if c == quote => push_char(out, c),
        'x' => out.push(u8::try_from(hex_digits(chars, 2)?).ok()?),
        'u' => push_char(out, char::from_u32(hex_digits(chars, 4)?)?),
        'U' => push_char(out, char::from_u32(hex_digits(chars, 8)?)?),
        '0'..='7' => {
            let mut value = c.to_digit(8)?;
            for _ in 0..2 {
                value = value * 8 + chars.next()?.to_digit(8)?;
            }
            out.push(u8::try_from(value).ok()?);
        }
        _ => return None,
    }
    Some(())
}

fn rust_escape(chars: &mut Peekable<Chars<'_>>, out: &mut Vec<u8>) -> Option<()> {
    match chars.next()? {
        'n' => out.push(b'\n'),
        'r' => out.push(b'\r'),
        't' => out.push(b'\t'),
        '\\' => out.push(b'\\'),
        '0' => out.push(0),
        '\'' => out.push(b'\''),
        '"' => out.push(b'"'),
        'x' => out.push(u8::try_from(hex_digits(chars, 2)?).ok()?),
        'u' => {
            if chars.next()? != '{' {
                return None;
            }
            let mut value = 0u32;
            let mut digits = 0;
            loop {
                match chars.next()? {
                    '}' => break,
                    '_' => {}
                    c => {
                        value = value.checked_mul(16)? + c.to_digit(16)?;
                        digits += 1;
                    }
                }
            }
            if digits == 0 || digits > 6 {
                return None;
            }
            push_char(out, char::from_u32(value)?);
        }
        '\n' => {
            // line continuation swallows the following whitespace
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
        }
        _ => return None,
    }
    Some(())
}

fn hex_digits(chars: &mut Peekable<Chars<'_>>, count: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_interpreted_strings() {
        assert_eq!(unquote_go(r#""hello""#).as_deref(), Some("hello"));
        assert_eq!(unquote_go(r#""a\tb\n""#).as_deref(), Some("a\tb\n"));
        assert_eq!(unquote_go(r#""\"quoted\"""#).as_deref(), Some("\"quoted\""));
        assert_eq!(unquote_go(r#""\x41\101é\U0001F600""#).as_deref(), Some("AAé😀"));
    }

    #[test]
    fn go_raw_strings_drop_carriage_returns() {
        assert_eq!(unquote_go("`a\\n\r\nb`").as_deref(), Some("a\\n\nb"));
    }

    #[test]
    fn go_runes() {
        assert_eq!(unquote_go("'x'").as_deref(), Some("x"));
        assert_eq!(unquote_go(r"'\n'").as_deref(), Some("\n"));
        assert_eq!(unquote_go(r"'\''").as_deref(), Some("'"));
        assert_eq!(unquote_go("'ab'"), None);
    }

    #[test]
    fn go_malformed_literals() {
        assert_eq!(unquote_go(r#""\q""#), None);
        assert_eq!(unquote_go(r#""\x4""#), None);
        assert_eq!(unquote_go(r#""\'""#), None);
        assert_eq!(unquote_go("\"unterminated"), None);
        assert_eq!(unquote_go("42"), None);
        assert_eq!(unquote_go("\""), None);
    }

    #[test]
    fn rust_strings() {
        assert_eq!(unquote_rust(r#""hi\n""#).as_deref(), Some("hi\n"));
        assert_eq!(unquote_rust(r#""\u{1F600}""#).as_deref(), Some("😀"));
        assert_eq!(unquote_rust(r#"b"bytes""#).as_deref(), Some("bytes"));
        assert_eq!(unquote_rust("\"one \\\n    two\"").as_deref(), Some("one two"));
    }

    #[test]
    fn rust_raw_strings() {
        assert_eq!(unquote_rust(r###"r#"a "quoted" b"#"###).as_deref(), Some(r#"a "quoted" b"#));
        assert_eq!(unquote_rust(r#"r"\n""#).as_deref(), Some("\\n"));
        assert_eq!(unquote_rust(r##"br#"x"#"##).as_deref(), Some("x"));
    }

    #[test]
    fn rust_chars() {
        assert_eq!(unquote_rust("'a'").as_deref(), Some("a"));
        assert_eq!(unquote_rust(r"'\''").as_deref(), Some("'"));
        assert_eq!(unquote_rust(r"b'\x7f'").as_deref(), Some("\x7f"));
        assert_eq!(unquote_rust(r"'\u{zz}'"), None);
    }

    #[test]
    fn literal_values_fall_back_to_raw_text() {
        assert_eq!(
            literal_value(SourceLang::Go, LiteralKind::String, r#""ok""#),
            "ok"
        );
        assert_eq!(
            literal_value(SourceLang::Go, LiteralKind::String, r#""bad\q""#),
            r#""bad\q""#
        );
        assert_eq!(literal_value(SourceLang::Go, LiteralKind::Int, "0x1F"), "0x1F");
        assert_eq!(literal_value(SourceLang::Rust, LiteralKind::Float, "1.5e3"), "1.5e3");
        // \xff is not valid UTF-8 on its own
        assert_eq!(
            literal_value(SourceLang::Go, LiteralKind::String, r#""\xff""#),
            r#""\xff""#
        );
    }
}
