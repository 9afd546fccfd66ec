// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The symbolic selector table.

use hashbrown::HashMap;

/// Literal that routes a command to the document itself.
pub const DOCUMENT: &str = "document";

/// Literal that routes a command to the window.
pub const WINDOW: &str = "window";

/// Groups every [`SelectorTable`] starts with.
pub const BUILTIN_SELECTORS: &[(&str, &str)] = &[
    ("@all-buttons", ".mc-btn, button"),
    (
        "@all-inputs",
        ".mc-input, .mc-textarea, .mc-select, input, textarea, select",
    ),
    ("@all-cards", ".mc-card, .card, [class*=\"card\"]"),
    ("@all-modals", ".mc-modal, .modal, [class*=\"modal\"]"),
    ("@all-forms", "form"),
    ("@all-images", "img"),
    ("@all-links", "a"),
    ("@all-videos", "video"),
    ("@all-audios", "audio"),
    ("@document", DOCUMENT),
    ("@world", WINDOW),
];

/// Mapping from symbolic `@name` groups to literal selector queries.
///
/// The table only grows: entries may be overwritten, never removed.
/// Literals are stored verbatim and parsed only when a command binds to them.
#[derive(Clone, Debug)]
pub struct SelectorTable {
    entries: HashMap<String, String>,
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorTable {
    /// A table seeded with [`BUILTIN_SELECTORS`].
    pub fn new() -> Self {
        let entries = BUILTIN_SELECTORS
            .iter()
            .map(|(name, literal)| ((*name).to_owned(), (*literal).to_owned()))
            .collect();
        Self { entries }
    }

    /// Resolve `selector` to the literal query it stands for.
    ///
    /// Symbolic names (`@...`) are looked up; unknown names and literal queries are
    /// returned unchanged.
    pub fn resolve<'a>(&'a self, selector: &'a str) -> &'a str {
        if selector.starts_with('@')
            && let Some(literal) = self.entries.get(selector)
        {
            return literal;
        }
        selector
    }

    /// Insert or overwrite a group. Returns the previous literal.
    pub fn add_selector(&mut self, name: impl Into<String>, literal: impl Into<String>) -> Option<String> {
        let name = name.into();
        if !name.starts_with('@') {
            log::debug!("selector group `{name}` has no `@` prefix and will never be resolved");
        }
        self.entries.insert(name, literal.into())
    }

    /// The literal registered for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no groups.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, literal)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectorQuery;

    #[test]
    fn builtins_resolve() {
        let t = SelectorTable::new();
        assert_eq!(t.len(), BUILTIN_SELECTORS.len());
        assert_eq!(t.resolve("@all-buttons"), ".mc-btn, button");
        assert_eq!(t.resolve("@document"), DOCUMENT);
        assert_eq!(t.resolve("@world"), WINDOW);
    }

    #[test]
    fn unknown_group_falls_through_verbatim() {
        let t = SelectorTable::new();
        assert_eq!(t.resolve("@unknown-group"), "@unknown-group");
    }

    #[test]
    fn literals_pass_through_even_if_registered() {
        let mut t = SelectorTable::new();
        t.add_selector("form", "input");
        assert_eq!(t.resolve("form"), "form");
    }

    #[test]
    fn add_overwrites_and_never_validates() {
        let mut t = SelectorTable::new();
        let old = t.add_selector("@all-forms", "form.mc-form");
        assert_eq!(old.as_deref(), Some("form"));
        assert_eq!(t.resolve("@all-forms"), "form.mc-form");

        assert!(t.add_selector("@broken", "[[[").is_none());
        assert_eq!(t.resolve("@broken"), "[[[");
        assert!(SelectorQuery::parse(t.resolve("@broken")).is_err());
    }

    #[test]
    fn every_builtin_literal_parses_except_sentinels() {
        for (name, literal) in BUILTIN_SELECTORS {
            if *literal == DOCUMENT || *literal == WINDOW {
                continue;
            }
            assert!(SelectorQuery::parse(literal).is_ok(), "{name} should parse");
        }
    }
}
