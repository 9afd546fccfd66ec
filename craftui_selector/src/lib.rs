// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Craftui Selector: symbolic element groups and selector matching.
//!
//! ## Overview
//!
//! Commands in craftui name their targets with a *selector*. A selector is either
//! a symbolic group such as `@all-buttons`, or a literal query such as
//! `.mc-btn, button`. This crate provides both halves:
//!
//! - [`SelectorTable`] maps symbolic names to literal queries. It is seeded with the
//!   built-in groups and can be extended at runtime. Resolution never fails: an
//!   unknown `@name` resolves to itself.
//! - [`SelectorQuery`] parses a literal query with the `scraper` CSS parser and
//!   matches it against any element view implementing [`selectors::Element`]
//!   over [`QueryImpl`]. Queries that do not parse are a [`SelectorError`].
//!
//! ## Example
//!
//! ```
//! use craftui_selector::{SelectorQuery, SelectorTable};
//!
//! let mut table = SelectorTable::new();
//! assert_eq!(table.resolve("@all-forms"), "form");
//! assert_eq!(table.resolve("@unknown-group"), "@unknown-group");
//! assert_eq!(table.resolve("#save"), "#save");
//!
//! table.add_selector("@hotbar", ".hotbar .slot:not(.empty)");
//! assert_eq!(table.resolve("@hotbar"), ".hotbar .slot:not(.empty)");
//!
//! assert!(SelectorQuery::parse(table.resolve("@hotbar")).is_ok());
//! assert!(SelectorQuery::parse(table.resolve("@unknown-group")).is_err());
//! ```

mod error;
mod query;
mod table;

pub use error::SelectorError;
pub use query::{QueryImpl, SelectorQuery};
pub use table::{BUILTIN_SELECTORS, DOCUMENT, SelectorTable, WINDOW};
