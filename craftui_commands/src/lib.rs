// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Craftui Commands: symbolic command dispatch over native UI events.
//!
//! ## Overview
//!
//! A [`CommandSystem`] keeps sets of [`Callback`]s keyed by a [`CommandKey`]:
//! a symbolic command type such as `mouse:enter` plus a selector such as
//! `@all-cards`. Registering a callback
//!
//! 1. resolves the selector through a [`SelectorTable`](craftui_selector::SelectorTable)
//!    (`@all-cards` becomes `.mc-card, .card, [class*="card"]`; anything else
//!    passes through),
//! 2. translates the command type to a native event name ([`translate`]),
//! 3. attaches one native listener on the document (or the window, for the
//!    `window` sentinel) that filters events by `Element.matches` and invokes
//!    the callback with a [`CommandData`] envelope.
//!
//! Three synthetic commands refine primitive events: `mc:block-place` (pointer
//! down with shift), `mc:block-break` (without shift) and `mc:inventory-toggle`
//! (key `"e"`). When one fires, the optional [`EffectSink`] hears about it.
//!
//! [`CommandSystem::trigger`] invokes callbacks without a native event, now or
//! after a cancellable delay. [`CommandSystem::remove`], [`CommandSystem::clear`]
//! and [`CommandSystem::list`] select registrations by command type according to
//! the [`KeyMatch`] policy chosen at construction.
//!
//! Callbacks that panic are logged through the `log` facade and do not affect
//! the remaining callbacks.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use craftui_commands::{CommandData, CommandParams, CommandSystem};
//! use craftui_host::{EventTargetRef, HeadlessDom, NativeEvent};
//!
//! let dom = Rc::new(HeadlessDom::new());
//! let commands = CommandSystem::new(dom.clone());
//! commands.add(
//!     "mc:inventory-toggle",
//!     "document",
//!     |data: &CommandData| assert_eq!(data.event.as_ref().unwrap().key.as_deref(), Some("e")),
//!     CommandParams::new(),
//! );
//! commands.add("mouse:enter", "@all-cards", |_: &CommandData| {}, CommandParams::new());
//!
//! dom.dispatch(&NativeEvent::keyboard("keydown", EventTargetRef::Document, "e"));
//! assert_eq!(
//!     commands.active_commands(),
//!     ["mc:inventory-toggle:document", "mouse:enter:@all-cards"]
//! );
//!
//! commands.remove("mouse", None);
//! assert_eq!(commands.len(), 1);
//! ```

mod binder;
mod callback;
mod effect;
mod key;
mod names;
mod params;
mod registry;
mod synthetic;

pub use callback::{Callback, contain};
pub use effect::{Effect, EffectSink};
pub use key::{CommandKey, KeyMatch};
pub use names::{EVENT_NAMES, is_mapped, translate};
pub use params::{CommandData, CommandParams, TargetRelation};
pub use registry::{CommandSystem, CommandSystemBuilder, Subscription, WeakCommandSystem};
pub use synthetic::{SYNTHETIC_PREFIX, SyntheticCommand};
