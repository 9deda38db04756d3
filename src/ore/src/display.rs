// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Display utilities.

use std::fmt::{self, Debug, Display};
use std::sync::OnceLock;

/// Implements [`Display`] by calling a closure.
///
/// Useful for handing a formatting routine to a logging macro without
/// rendering it up front: the closure only runs if the event is actually
/// emitted.
pub struct DisplayFn<F>(F);

/// Wraps `f` in a [`DisplayFn`].
pub fn display_fn<F>(f: F) -> DisplayFn<F>
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    DisplayFn(f)
}

impl<F> Display for DisplayFn<F>
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.0)(f)
    }
}

impl<F> Debug for DisplayFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayFn").finish_non_exhaustive()
    }
}

/// A string that is computed on first display and cached afterwards.
pub struct LazyString<F> {
    init: F,
    value: OnceLock<String>,
}

impl<F> LazyString<F>
where
    F: Fn() -> String,
{
    /// Creates a string that will be computed by `init` when first needed.
    pub fn new(init: F) -> Self {
        LazyString {
            init,
            value: OnceLock::new(),
        }
    }

    /// Returns the string, computing it if this is the first access.
    pub fn get(&self) -> &str {
        self.value.get_or_init(&self.init)
    }
}

impl<F> Display for LazyString<F>
where
    F: Fn() -> String,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}

impl<F> Debug for LazyString<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyString")
            .field("value", &self.value.get())
            .finish_non_exhaustive()
    }
}
