// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Byte-level helpers for UTF-8 encoded text.

/// Returns the total encoded length of the character introduced by `lead`.
///
/// The length is the number of leading one bits of `lead`, or 1 for ASCII.
/// `lead` must be the first byte of a character; the result for a
/// continuation byte (`0b10xx_xxxx`) is meaningless.
pub fn utf8_lead_length(lead: u8) -> usize {
    match lead.leading_ones() {
        0 => 1,
        n => n as usize,
    }
}

/// Returns the length of the well-formed multi-byte character at the start of
/// `bytes`, or `None` if `bytes` does not start with one.
pub(crate) fn multibyte_char_len(bytes: &[u8]) -> Option<usize> {
    let len = utf8_lead_length(*bytes.first()?);
    if !(2..=4).contains(&len) {
        return None;
    }
    let prefix = bytes.get(..len)?;
    std::str::from_utf8(prefix).ok().map(|_| len)
}

/// Drops `count` characters from the front of `s`.
///
/// Stops early if `s` runs out. Returns the number of bytes removed.
pub fn trim_utf8_chars(s: &mut &str, count: usize) -> usize {
    let mut trimmed = 0;
    for _ in 0..count {
        let Some(&lead) = s.as_bytes().first() else {
            break;
        };
        let len = utf8_lead_length(lead);
        *s = &s[len..];
        trimmed += len;
    }
    trimmed
}

/// Converts a byte offset into `s` into a 1-based character position.
///
/// For `"你好"`, byte offset 3 (the start of `好`) is position 2. Offsets past
/// the end of `s` are clamped to its length.
pub fn char_position(s: &str, byte_pos: usize) -> usize {
    let prefix = &s.as_bytes()[..byte_pos.min(s.len())];
    prefix.iter().filter(|b| (**b & 0xC0) != 0x80).count() + 1
}
