// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! String handling for the SQL layer.
//!
//! This crate decodes quoted string literals ([`literal`]) and compiles and
//! evaluates `LIKE` patterns ([`like`]), including case-insensitive matching
//! with an arbitrary escape character ([`case`]). Everything here is a pure
//! function over caller-owned data.
//!
//! ```
//! use mz_stringutil::like::{self, DEFAULT_ESCAPE};
//! use mz_stringutil::literal;
//!
//! let pattern = literal::unquote("'a\\%b%'").unwrap();
//! let compiled = like::compile(&pattern, DEFAULT_ESCAPE);
//! assert!(compiled.matches("a%bcd"));
//! assert!(!compiled.matches("axbcd"));
//! ```

mod error;

pub mod case;
pub mod format;
pub mod like;
pub mod literal;
pub mod utf8;

pub use crate::error::SyntaxError;
