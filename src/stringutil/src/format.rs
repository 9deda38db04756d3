// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Small string formatting helpers.

use std::collections::BTreeMap;
use std::fmt::Display;

use itertools::Itertools;

/// The character used to delimit identifiers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// MySQL-style `` `ident` ``.
    #[default]
    Backtick,
    /// ANSI-style `"ident"`.
    DoubleQuote,
}

impl QuoteStyle {
    fn quote(self) -> char {
        match self {
            QuoteStyle::Backtick => '`',
            QuoteStyle::DoubleQuote => '"',
        }
    }
}

/// Quotes an identifier for pretty-printing, doubling any embedded quote
/// characters.
///
/// ```
/// use mz_stringutil::format::{quote_ident, QuoteStyle};
///
/// assert_eq!(quote_ident("foo `bar`", QuoteStyle::Backtick), "`foo ``bar```");
/// ```
pub fn quote_ident(ident: &str, style: QuoteStyle) -> String {
    let quote = style.quote();
    let mut out = String::with_capacity(ident.len() + 2);
    out.push(quote);
    for c in ident.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
    out
}

/// Renders labels as `key1=value1,key2=value2`, in key order.
pub fn labels_to_string<K, V>(labels: &BTreeMap<K, V>) -> String
where
    K: Display,
    V: Display,
{
    labels.iter().map(|(k, v)| format!("{k}={v}")).join(",")
}

/// Returns the number of trailing ASCII spaces in `s`.
pub fn tail_space_count(s: &str) -> usize {
    s.len() - s.trim_end_matches(' ').len()
}

/// Escapes the glob metacharacters `?`, `[` and `]` with a backslash, leaving
/// `*` active.
pub fn escape_glob_except_asterisk(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '?' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("foo", QuoteStyle::Backtick), "`foo`");
        assert_eq!(quote_ident("", QuoteStyle::Backtick), "``");
        assert_eq!(
            quote_ident("foo `bar`", QuoteStyle::Backtick),
            "`foo ``bar```"
        );
        assert_eq!(
            quote_ident("foo `bar`", QuoteStyle::DoubleQuote),
            "\"foo `bar`\""
        );
        assert_eq!(
            quote_ident("say \"hi\"", QuoteStyle::DoubleQuote),
            "\"say \"\"hi\"\"\""
        );
    }

    #[test]
    fn test_labels_to_string() {
        let empty: BTreeMap<String, String> = BTreeMap::new();
        assert_eq!(labels_to_string(&empty), "");

        let labels = BTreeMap::from([("zone", "us-east-1"), ("host", "h1"), ("dc", "x")]);
        assert_eq!(labels_to_string(&labels), "dc=x,host=h1,zone=us-east-1");
    }

    #[test]
    fn test_tail_space_count() {
        assert_eq!(tail_space_count(""), 0);
        assert_eq!(tail_space_count("abc"), 0);
        assert_eq!(tail_space_count("abc  "), 2);
        assert_eq!(tail_space_count("   "), 3);
        assert_eq!(tail_space_count("a \t "), 1);
    }

    #[test]
    fn test_escape_glob_except_asterisk() {
        assert_eq!(escape_glob_except_asterisk("a*b"), "a*b");
        assert_eq!(escape_glob_except_asterisk("a?[b]*"), "a\\?\\[b\\]*");
        assert_eq!(escape_glob_except_asterisk("漢?"), "漢\\?");
    }
}
