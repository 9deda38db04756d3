// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! ASCII case folding for case-insensitive `LIKE`.
//!
//! Both functions here rewrite a caller-owned buffer in place through an
//! exclusive borrow. Only ASCII letters are touched; bytes belonging to
//! multi-byte characters are left alone, so a buffer that held valid UTF-8
//! still does afterwards.

use crate::utf8::utf8_lead_length;

/// Lowers every uppercase ASCII letter in `buf`.
pub fn lower_ascii(buf: &mut [u8]) {
    buf.make_ascii_lowercase();
}

/// Lowers the ASCII letters of a `LIKE` pattern while preserving the role of
/// its escape byte.
///
/// A naive lowering breaks patterns whose escape is a letter. With escape `A`,
/// the pattern `AAAA` means "a literal `A`, twice"; lowering it to `aaaa`
/// loses the escapes entirely. Here, an unescaped occurrence of `escape` is
/// kept as an escape marker, and the byte it escapes is lowered as ordinary
/// data, so `AAAA` becomes `AaAa`.
///
/// A lowercase `escape` is converted to uppercase: lowering `ABC` with escape
/// `a` would otherwise turn the data `A` into an escape. Escape markers in
/// `buf` are rewritten to the uppercase form too.
///
/// Returns the escape byte that must be used to compile the folded pattern.
pub fn lower_excluding_escape(buf: &mut [u8], escape: u8) -> u8 {
    let canonical = escape.to_ascii_uppercase();
    let mut escaped = false;
    let mut i = 0;
    while i < buf.len() {
        let c = buf[i];
        if c.is_ascii_uppercase() {
            if c == escape && !escaped {
                escaped = true;
                i += 1;
                continue;
            }
            buf[i] = c.to_ascii_lowercase();
        } else {
            if c == escape && !escaped {
                buf[i] = canonical;
                escaped = true;
                i += 1;
                continue;
            }
            i += utf8_lead_length(c) - 1;
        }
        escaped = false;
        i += 1;
    }
    canonical
}
