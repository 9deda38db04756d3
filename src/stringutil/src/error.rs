// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// A quoted literal does not conform to the literal grammar.
///
/// This is the only error raised by this crate. Pattern compilation and
/// matching accept every input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid syntax: {reason}")]
pub struct SyntaxError {
    reason: &'static str,
}

impl SyntaxError {
    pub(crate) const fn new(reason: &'static str) -> SyntaxError {
        SyntaxError { reason }
    }

    /// Describes what was wrong with the literal.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}
