// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! SQL `LIKE` patterns.
//!
//! A pattern is compiled once into two parallel sequences: the characters to
//! compare against ("weights") and a [`PatternType`] per position saying how
//! the position consumes the subject. Matching then walks the subject and the
//! compiled pattern with a pair of cursors.
//!
//! Compilation normalizes the pattern so that the matcher never sees two
//! adjacent `%` wildcards: `%%` collapses to `%`, and `%_` is rewritten to the
//! equivalent `_%`.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::case::lower_excluding_escape;

/// The escape character to use by default in LIKE patterns.
pub const DEFAULT_ESCAPE: u8 = b'\\';

/// How one position of a compiled pattern consumes the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternType {
    /// Exactly the character stored at this position.
    Match,
    /// Any single character (`_`).
    One,
    /// Any run of characters, possibly empty (`%`).
    Any,
}

/// A compiled LIKE pattern.
///
/// `weights` and `types` always have the same length.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCompiledPattern")]
pub struct CompiledPattern {
    weights: Vec<char>,
    types: Vec<PatternType>,
}

#[derive(Deserialize)]
struct RawCompiledPattern {
    weights: Vec<char>,
    types: Vec<PatternType>,
}

impl TryFrom<RawCompiledPattern> for CompiledPattern {
    type Error = String;

    fn try_from(raw: RawCompiledPattern) -> Result<CompiledPattern, String> {
        if raw.weights.len() != raw.types.len() {
            return Err(format!(
                "pattern has {} weights but {} types",
                raw.weights.len(),
                raw.types.len()
            ));
        }
        Ok(CompiledPattern {
            weights: raw.weights,
            types: raw.types,
        })
    }
}

impl CompiledPattern {
    /// The character stored at each position. Wildcard positions store the
    /// wildcard character itself.
    pub fn weights(&self) -> &[char] {
        &self.weights
    }

    /// The match type of each position.
    pub fn types(&self) -> &[PatternType] {
        &self.types
    }

    /// Returns the number of positions in the pattern.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Reports whether the pattern has no positions, i.e., matches only the
    /// empty string.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over the positions of the pattern.
    pub fn positions(&self) -> impl Iterator<Item = (PatternType, char)> + '_ {
        self.types.iter().copied().zip(self.weights.iter().copied())
    }

    /// Reports whether the pattern contains no wildcards.
    pub fn is_exact_match(&self) -> bool {
        is_exact_match(&self.types)
    }

    /// Reports whether `subject` matches the pattern.
    pub fn matches(&self, subject: &str) -> bool {
        let subject: Vec<char> = subject.chars().collect();
        matches(&subject, &self.weights, &self.types)
    }

    /// Renders the pattern as the body of an equivalent regular expression.
    ///
    /// The result is not anchored. Literal characters are escaped, `_`
    /// becomes `.` and `%` becomes `.*`, so callers that want `.` to match
    /// newlines must enable the `s` flag.
    pub fn to_regex(&self) -> String {
        let mut r = String::with_capacity(self.len() * 2);
        let mut buf = [0; 4];
        for (ty, c) in self.positions() {
            match ty {
                PatternType::Match => regex_syntax::escape_into(c.encode_utf8(&mut buf), &mut r),
                PatternType::One => r.push('.'),
                PatternType::Any => r.push_str(".*"),
            }
        }
        r
    }
}

/// Formats the normalized pattern, using [`DEFAULT_ESCAPE`] to escape literal
/// wildcards and escape characters.
impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escape = char::from(DEFAULT_ESCAPE);
        for (ty, c) in self.positions() {
            match ty {
                PatternType::Match => {
                    if c == '%' || c == '_' || c == escape {
                        f.write_char(escape)?;
                    }
                    f.write_char(c)?;
                }
                PatternType::One => f.write_char('_')?,
                PatternType::Any => f.write_char('%')?,
            }
        }
        Ok(())
    }
}

/// Compiles a LIKE pattern.
///
/// `escape` is compared against each character of `pattern` as the code point
/// with the same value. The character following an escape is always taken
/// literally, even if it is a wildcard or another escape. An escape at the very
/// end of the pattern matches itself.
///
/// Compilation never fails: every string is a valid pattern.
pub fn compile(pattern: &str, escape: u8) -> CompiledPattern {
    let escape = char::from(escape);
    let mut weights = Vec::with_capacity(pattern.len());
    let mut types = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let after_any = types.last() == Some(&PatternType::Any);
        let (ty, weight) = match c {
            c if c == escape => (PatternType::Match, chars.next().unwrap_or(c)),
            '_' if after_any => {
                // %_ => _%
                let last = types.len() - 1;
                weights[last] = '_';
                types[last] = PatternType::One;
                (PatternType::Any, '%')
            }
            '_' => (PatternType::One, '_'),
            // %% => %
            '%' if after_any => continue,
            '%' => (PatternType::Any, '%'),
            c => (PatternType::Match, c),
        };
        weights.push(weight);
        types.push(ty);
    }
    weights.shrink_to_fit();
    types.shrink_to_fit();
    CompiledPattern { weights, types }
}

/// Reports whether `subject` matches the compiled pattern described by
/// `weights` and `types`.
///
/// Characters are compared exactly; fold case beforehand for case-insensitive
/// matching. This is the classic two-cursor glob match: both cursors only move
/// forward, except that a mismatch rewinds to just after the most recent `%`,
/// which then consumes one more subject character. Only that one restart point
/// is ever remembered, so there is no backtracking stack.
///
/// Prefer [`CompiledPattern::matches`], which always has consistent inputs.
///
/// # Panics
///
/// Panics if `weights` and `types` have different lengths.
pub fn matches(subject: &[char], weights: &[char], types: &[PatternType]) -> bool {
    assert_eq!(
        weights.len(),
        types.len(),
        "weights and types differ in length"
    );
    let (mut p, mut r) = (0, 0);
    // A restart always resumes at least one character into the subject, so
    // `next_r == 0` means there is nowhere to restart.
    let (mut next_p, mut next_r) = (0, 0);
    while p < types.len() || r < subject.len() {
        if p < types.len() {
            match types[p] {
                PatternType::Match if r < subject.len() && subject[r] == weights[p] => {
                    p += 1;
                    r += 1;
                    continue;
                }
                PatternType::One if r < subject.len() => {
                    p += 1;
                    r += 1;
                    continue;
                }
                PatternType::Any => {
                    next_p = p;
                    next_r = r + 1;
                    p += 1;
                    continue;
                }
                _ => {}
            }
        }
        if 0 < next_r && next_r <= subject.len() {
            p = next_p;
            r = next_r;
            continue;
        }
        return false;
    }
    true
}

/// Reports whether `types` contains no wildcards, in which case the pattern
/// matches only the literal string it stores.
pub fn is_exact_match(types: &[PatternType]) -> bool {
    types.iter().all(|ty| *ty == PatternType::Match)
}

/// An object that can test whether a string matches a LIKE pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matcher {
    /// The pattern as written.
    pub pattern: String,
    pub case_insensitive: bool,
    /// The escape byte the pattern was written with.
    pub escape: u8,
    compiled: CompiledPattern,
}

impl Matcher {
    /// Builds a matcher for `pattern`.
    ///
    /// For case-insensitive matching the pattern is folded to lowercase with
    /// [`lower_excluding_escape`], so that an escape that is itself a letter
    /// keeps working, and subjects are folded before each match.
    pub fn compile(pattern: &str, case_insensitive: bool, escape: u8) -> Matcher {
        let compiled = if case_insensitive {
            let mut buf = pattern.as_bytes().to_vec();
            let folded_escape = lower_excluding_escape(&mut buf, escape);
            // Folding only rewrites ASCII bytes, so `buf` is still UTF-8.
            let folded = String::from_utf8(buf)
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
            compile(&folded, folded_escape)
        } else {
            compile(pattern, escape)
        };
        trace!(
            pattern,
            case_insensitive,
            escape = %char::from(escape),
            normalized = %compiled,
            exact = compiled.is_exact_match(),
            "compiled LIKE pattern"
        );
        Matcher {
            pattern: pattern.to_string(),
            case_insensitive,
            escape,
            compiled,
        }
    }

    /// Returns the compiled form of the pattern.
    pub fn compiled(&self) -> &CompiledPattern {
        &self.compiled
    }

    pub fn is_match(&self, text: &str) -> bool {
        if self.case_insensitive {
            let subject: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();
            matches(&subject, &self.compiled.weights, &self.compiled.types)
        } else {
            self.compiled.matches(text)
        }
    }
}
