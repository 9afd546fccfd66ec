// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Literal selector queries, parsed once and matched many times.

use core::fmt;

use selectors::matching::{
    self, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode, NeedsSelectorFlags,
    QuirksMode,
};

use crate::error::SelectorError;

/// The selector implementation queries are parsed with.
///
/// Element views implement [`selectors::Element`] with this as their `Impl`.
pub type QueryImpl = scraper::selector::Simple;

/// A parsed literal query such as `.mc-btn, button:not(.disabled)`.
///
/// Parsing follows the CSS selectors grammar, including the tree-structural
/// pseudo-classes (`:not()`, `:first-child`, `:nth-child()`, `:root`, ...).
/// Pseudo-classes that depend on interaction state (`:hover`, `:checked`) and
/// pseudo-elements are rejected.
#[derive(Clone)]
pub struct SelectorQuery {
    source: String,
    selector: scraper::Selector,
}

impl fmt::Debug for SelectorQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SelectorQuery").field(&self.source).finish()
    }
}

impl PartialEq for SelectorQuery {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl SelectorQuery {
    /// Parse a literal query.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let selector = scraper::Selector::parse(source).map_err(|err| SelectorError::Invalid {
            selector: source.to_owned(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            source: source.to_owned(),
            selector,
        })
    }

    /// The query as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// `element.matches(query)`: whether any selector of the list matches.
    pub fn matches<E>(&self, element: &E) -> bool
    where
        E: selectors::Element<Impl = QueryImpl>,
    {
        let mut caches = Default::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        self.selector
            .selectors
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, element, &mut context))
    }
}
