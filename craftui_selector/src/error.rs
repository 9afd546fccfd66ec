// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// A literal selector that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The CSS parser rejected the query. This includes unresolved `@` group
    /// names and pseudo-classes that depend on interaction state.
    #[error("invalid selector `{selector}`: {reason}")]
    Invalid {
        /// The query as written.
        selector: String,
        /// The parser's description of the failure.
        reason: String,
    },
}
