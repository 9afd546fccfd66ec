// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Craftui: a block-game flavored UI toolkit.
//!
//! ## Overview
//!
//! [`CraftUi`] is the entry point for one document. Building it applies the
//! configured theme and the toolkit's body classes, and wires together:
//!
//! - a [`ThemeManager`] with the built-in `default`, `dark` and `neon` themes
//!   plus any registered [`ThemeConfig`];
//! - an [`EventEmitter`] of [`UiEvent`]s (`configChange`, `themeChanges`,
//!   `soundsToggled` and application-defined events);
//! - a [`CommandSystem`](craftui_commands::CommandSystem) for symbolic command
//!   dispatch, whose effects go to an optional sink (typically a
//!   [`SoundBoard`](craftui_sound::SoundBoard)) while sounds are enabled.
//!
//! Everything talks to the page through the traits of [`craftui_host`], so the
//! same code runs against a browser binding or the in-memory
//! [`HeadlessDom`](craftui_host::HeadlessDom).
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use craftui::CraftUi;
//! use craftui_commands::{CommandData, CommandParams};
//! use craftui_host::{EventTargetRef, HeadlessDom, NativeEvent};
//! use craftui_sound::{MemoryBackend, SoundBoard};
//!
//! let dom = Rc::new(HeadlessDom::new());
//! let board = Rc::new(SoundBoard::new(MemoryBackend::new(8_000)));
//! let ui = CraftUi::builder(dom.clone()).effects(board.clone()).build();
//!
//! ui.add("mc:inventory-toggle", "document", |_: &CommandData| {}, CommandParams::new());
//! dom.dispatch(&NativeEvent::keyboard("keydown", EventTargetRef::Document, "e"));
//! assert_eq!(board.with_backend(|b| b.clips().len()), Some(1));
//!
//! ui.set_sounds(false);
//! dom.dispatch(&NativeEvent::keyboard("keydown", EventTargetRef::Document, "e"));
//! assert_eq!(board.with_backend(|b| b.clips().len()), Some(1));
//! ```

mod emitter;
mod theme;
mod ui;

pub use emitter::{EventEmitter, EventSubscription, Listener};
pub use theme::{
    BUILTIN_THEMES, THEME_CHANGE_EVENT, ThemeChange, ThemeColors, ThemeConfig, ThemeManager,
};
pub use ui::{
    BASE_CLASS, ConfigChange, CraftUi, CraftUiBuilder, NO_ANIMATIONS_CLASS, PIXELATED_CLASS,
    UiConfig, UiEvent, UiEventKind,
};

pub use craftui_commands;
pub use craftui_host;
pub use craftui_selector;
pub use craftui_sound;
