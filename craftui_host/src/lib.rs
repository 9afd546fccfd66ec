// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Craftui Host: the platform boundary for the command system.
//!
//! ## Overview
//!
//! The command system never touches a browser API directly. It talks to an
//! [`EventHost`], which supplies exactly the primitives it needs:
//!
//! - attaching and detaching native listeners on the document or the window,
//!   with `capture`, `passive` and `once` options;
//! - `Element.matches(query)` for filtering, with queries parsed once up front;
//! - one-shot timers with cancellation;
//! - a millisecond clock.
//!
//! The toolkit façade additionally uses a [`StyleHost`] to toggle classes and set
//! custom properties on the document element and the body.
//!
//! [`HeadlessDom`] implements both traits in memory. It has a real element tree
//! (generational [`ElementId`]s), a capture/bubble dispatch that follows the
//! platform's ordering rules, and a virtual timer queue. It is what the tests and
//! demos run against; a browser binding implements the same traits over `web-sys`.
//!
//! Native events are plain data ([`NativeEvent`]): event name, target, bubbling
//! flag, [`Modifiers`], key, button and pointer position.

mod headless;
mod host;
mod tree;
mod types;

pub use headless::HeadlessDom;
pub use host::{EventHost, NativeListener, StyleHost, TimerTask};
pub use types::{
    ElementId, EventTargetRef, ListenerId, ListenerOptions, ListenerTarget, Modifiers,
    NativeEvent, StyleScope, TimerId,
};

pub use craftui_selector::{SelectorError, SelectorQuery};
pub use kurbo::Point;
