// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration identity and family selection.

use core::fmt;

/// Identity of one callback set: a command type plus the selector it was added with.
///
/// Displays as `"<type>:<selector>"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandKey {
    /// Symbolic or native command type, e.g. `mouse:enter`.
    pub command_type: String,
    /// Selector as written by the caller (symbolic or literal).
    pub selector: String,
}

impl CommandKey {
    /// Build a key.
    pub fn new(command_type: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            command_type: command_type.into(),
            selector: selector.into(),
        }
    }

    /// Whether the serialized form `"<type>:<selector>"` starts with `pattern`,
    /// computed without allocating.
    pub fn serialized_starts_with(&self, pattern: &str) -> bool {
        match pattern.strip_prefix(self.command_type.as_str()) {
            None => self.command_type.starts_with(pattern),
            Some("") => true,
            Some(rest) => rest
                .strip_prefix(':')
                .is_some_and(|sel| self.selector.starts_with(sel)),
        }
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.command_type, self.selector)
    }
}

/// How a command-type argument selects registrations in `remove`, `clear`,
/// `trigger` and `list`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyMatch {
    /// Every key whose serialized `"<type>:<selector>"` form starts with the
    /// argument. `"mouse"` selects all `mouse:*` commands, and `"a"` also
    /// selects `"ab:..."`.
    #[default]
    Prefix,
    /// Exactly the keys whose command type equals the argument, regardless of
    /// selector.
    Family,
}

impl KeyMatch {
    /// Whether `key` is selected by `pattern` under this policy.
    pub fn selects(self, key: &CommandKey, pattern: &str) -> bool {
        match self {
            Self::Prefix => key.serialized_starts_with(pattern),
            Self::Family => key.command_type == pattern,
        }
    }
}
