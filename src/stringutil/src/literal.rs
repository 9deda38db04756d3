// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Decoding of quoted string literals.
//!
//! A literal is delimited by either single or double quotes. Inside the
//! delimiters, a backslash introduces an escape sequence:
//!
//! | sequence         | decodes to             |
//! |------------------|------------------------|
//! | `\b`             | backspace (0x08)       |
//! | `\n` `\r` `\t`   | LF, CR, TAB            |
//! | `\Z`             | 0x1A                   |
//! | `\0`             | NUL                    |
//! | `\\` `\'` `\"`   | the escaped character  |
//! | `\%` `\_`        | kept as-is, backslash included |
//! | `\` + other byte | the escaped byte       |
//!
//! `\%` and `\_` keep their backslash so that a later `LIKE` compilation still
//! sees the wildcard as escaped. Unrecognized escapes are accepted rather than
//! rejected.

use std::borrow::Cow;

use mz_ore::display::display_fn;
use tracing::debug;

use crate::error::SyntaxError;
use crate::utf8::multibyte_char_len;

/// Decodes the first character or escape sequence of `input`.
///
/// `quote` is the delimiter of the enclosing literal; an unescaped occurrence
/// of it is an error, since the delimiters have already been stripped.
///
/// Returns the decoded bytes alongside the rest of `input`. The decoded bytes
/// borrow from `input` or from static storage, so this never allocates.
pub fn decode_one(input: &[u8], quote: u8) -> Result<(&[u8], &[u8]), SyntaxError> {
    let Some(&c) = input.first() else {
        return Err(SyntaxError::new("empty input"));
    };
    if c == quote {
        return Err(SyntaxError::new("unescaped quote in literal"));
    }
    if c >= 0x80 {
        // Invalid sequences are passed through one byte at a time.
        let len = multibyte_char_len(input).unwrap_or(1);
        return Ok(input.split_at(len));
    }
    if c != b'\\' {
        return Ok(input.split_at(1));
    }

    let Some(&escaped) = input.get(1) else {
        return Err(SyntaxError::new("unterminated escape sequence"));
    };
    let rest = &input[2..];
    let value: &[u8] = match escaped {
        b'b' => b"\x08",
        b'n' => b"\n",
        b'r' => b"\r",
        b't' => b"\t",
        b'Z' => b"\x1a",
        b'0' => b"\0",
        b'_' | b'%' => &input[..2],
        _ => &input[1..2],
    };
    Ok((value, rest))
}

/// Decodes a quoted literal, delimiters included.
///
/// The input must be at least two bytes long and start and end with the same
/// quote character, either `'` or `"`. If the body contains neither a
/// backslash nor the quote character, it is returned without copying.
pub fn unquote_bytes(input: &[u8]) -> Result<Cow<'_, [u8]>, SyntaxError> {
    let body = strip_quotes(input)?;
    let quote = input[0];
    if !body.iter().any(|b| *b == b'\\' || *b == quote) {
        return Ok(Cow::Borrowed(body));
    }

    let mut buf = Vec::with_capacity(3 * body.len() / 2);
    let mut rest = body;
    while !rest.is_empty() {
        let (value, tail) = decode_one(rest, quote).inspect_err(|e| {
            debug!(
                reason = e.reason(),
                offset = body.len() - rest.len() + 1,
                literal = %display_fn(|f| f.write_str(&String::from_utf8_lossy(input))),
                "rejecting quoted literal"
            )
        })?;
        buf.extend_from_slice(value);
        rest = tail;
    }
    Ok(Cow::Owned(buf))
}

/// Like [`unquote_bytes`], but for literals known to be valid UTF-8.
pub fn unquote(input: &str) -> Result<Cow<'_, str>, SyntaxError> {
    match unquote_bytes(input.as_bytes())? {
        // The body is the input minus its one-byte ASCII delimiters.
        Cow::Borrowed(_) => Ok(Cow::Borrowed(&input[1..input.len() - 1])),
        // Escapes only ever produce ASCII, and multi-byte characters are
        // copied whole, so this cannot fail for valid input.
        Cow::Owned(buf) => String::from_utf8(buf)
            .map(Cow::Owned)
            .map_err(|_| SyntaxError::new("decoded literal is not valid UTF-8")),
    }
}

fn strip_quotes(input: &[u8]) -> Result<&[u8], SyntaxError> {
    let [quote, body @ .., last] = input else {
        return Err(SyntaxError::new("literal too short"));
    };
    if quote != last {
        return Err(SyntaxError::new("mismatched quotes"));
    }
    if *quote != b'\'' && *quote != b'"' {
        return Err(SyntaxError::new("literal is not quoted"));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_decode_one() {
        struct TestCase<'a> {
            input: &'a [u8],
            quote: u8,
            value: &'a [u8],
            rest: &'a [u8],
        }
        let test_cases = vec![
            TestCase {
                input: b"abc",
                quote: b'\'',
                value: b"a",
                rest: b"bc",
            },
            TestCase {
                input: b"\\nx",
                quote: b'\'',
                value: b"\n",
                rest: b"x",
            },
            TestCase {
                input: b"\\Z",
                quote: b'\'',
                value: b"\x1a",
                rest: b"",
            },
            TestCase {
                input: b"\\0",
                quote: b'"',
                value: b"\0",
                rest: b"",
            },
            TestCase {
                input: b"\\%a",
                quote: b'\'',
                value: b"\\%",
                rest: b"a",
            },
            TestCase {
                input: b"\\_",
                quote: b'\'',
                value: b"\\_",
                rest: b"",
            },
            TestCase {
                input: b"\\\\",
                quote: b'\'',
                value: b"\\",
                rest: b"",
            },
            TestCase {
                input: b"\\'",
                quote: b'\'',
                value: b"'",
                rest: b"",
            },
            TestCase {
                input: b"\\\"",
                quote: b'\'',
                value: b"\"",
                rest: b"",
            },
            // Unrecognized escapes decode to the escaped byte.
            TestCase {
                input: b"\\q",
                quote: b'\'',
                value: b"q",
                rest: b"",
            },
            TestCase {
                input: b"\\B",
                quote: b'\'',
                value: b"B",
                rest: b"",
            },
            // The other quote character needs no escaping.
            TestCase {
                input: b"\"x",
                quote: b'\'',
                value: b"\"",
                rest: b"x",
            },
            TestCase {
                input: "漢字".as_bytes(),
                quote: b'\'',
                value: "漢".as_bytes(),
                rest: "字".as_bytes(),
            },
            // Invalid UTF-8 passes through a byte at a time.
            TestCase {
                input: &[0xFF, b'a'],
                quote: b'\'',
                value: &[0xFF],
                rest: b"a",
            },
            TestCase {
                input: &[0xE6, 0xBC],
                quote: b'\'',
                value: &[0xE6],
                rest: &[0xBC],
            },
        ];

        for tc in test_cases {
            let (value, rest) = decode_one(tc.input, tc.quote).unwrap();
            assert_eq!(value, tc.value, "decode_one({:?})", tc.input);
            assert_eq!(rest, tc.rest, "decode_one({:?})", tc.input);
        }
    }

    #[test]
    fn test_decode_one_errors() {
        assert!(decode_one(b"'a", b'\'').is_err());
        assert!(decode_one(b"\"a", b'"').is_err());
        assert!(decode_one(b"\\", b'\'').is_err());
        assert!(decode_one(b"", b'\'').is_err());
    }

    #[test]
    fn test_unquote() {
        struct TestCase<'a> {
            input: &'a str,
            expected: &'a str,
            borrowed: bool,
        }
        let test_cases = vec![
            TestCase {
                input: "'ab'",
                expected: "ab",
                borrowed: true,
            },
            TestCase {
                input: "\"\"",
                expected: "",
                borrowed: true,
            },
            TestCase {
                input: "'say \"hi\"'",
                expected: "say \"hi\"",
                borrowed: true,
            },
            TestCase {
                input: "\"\\\"\\n\"",
                expected: "\"\n",
                borrowed: false,
            },
            TestCase {
                input: "'it\\'s'",
                expected: "it's",
                borrowed: false,
            },
            TestCase {
                input: "'a\\%b\\_c'",
                expected: "a\\%b\\_c",
                borrowed: false,
            },
            TestCase {
                input: "'\\t漢\\\\'",
                expected: "\t漢\\",
                borrowed: false,
            },
            TestCase {
                input: "'\\é'",
                expected: "é",
                borrowed: false,
            },
        ];

        for tc in test_cases {
            let actual = unquote(tc.input).unwrap();
            assert_eq!(actual, tc.expected, "unquote({:?})", tc.input);
            assert_eq!(
                matches!(actual, Cow::Borrowed(_)),
                tc.borrowed,
                "unquote({:?}) borrowed",
                tc.input
            );
        }
    }

    #[test]
    fn test_unquote_errors() {
        for input in ["", "'", "'a", "ab", "'a\"", "`a`", "'a\\'", "'a'b'"] {
            let err = unquote(input).unwrap_err();
            assert!(
                err.to_string().starts_with("invalid syntax: "),
                "unquote({:?}): {}",
                input,
                err
            );
        }
        assert_eq!(unquote("'a").unwrap_err().reason(), "mismatched quotes");
        assert_eq!(unquote("ab").unwrap_err().reason(), "mismatched quotes");
        assert_eq!(unquote("aba").unwrap_err().reason(), "literal is not quoted");
        assert_eq!(unquote("'").unwrap_err().reason(), "literal too short");
    }

    #[test]
    fn test_unquote_bytes_invalid_utf8() {
        let input = [b'\'', 0xFF, b'\\', b'n', b'\''];
        let actual = unquote_bytes(&input).unwrap();
        assert_eq!(&*actual, &[0xFF, b'\n']);
    }

    proptest! {
        #[test]
        #[cfg_attr(miri, ignore)]
        fn unquote_plain_body_is_borrowed(body in "[a-z0-9 漢%_\"]{0,16}") {
            let quoted = format!("'{}'", body);
            let actual = unquote(&quoted).unwrap();
            prop_assert_eq!(&*actual, body.as_str());
            prop_assert!(matches!(actual, Cow::Borrowed(_)));
        }

        #[test]
        #[cfg_attr(miri, ignore)]
        fn unquote_escaped_body_roundtrips(body in "[a-z'\\\\\n]{0,16}") {
            let mut quoted = String::from("'");
            for c in body.chars() {
                if c == '\\' || c == '\'' {
                    quoted.push('\\');
                }
                quoted.push(c);
            }
            quoted.push('\'');
            let actual = unquote(&quoted).unwrap();
            prop_assert_eq!(&*actual, body.as_str());
        }
    }
}
