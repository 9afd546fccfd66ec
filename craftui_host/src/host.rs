// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host traits: the platform services craftui relies on.

use std::rc::Rc;

use craftui_selector::SelectorQuery;

use crate::types::{
    ElementId, ListenerId, ListenerOptions, ListenerTarget, NativeEvent, StyleScope, TimerId,
};

/// A native listener. The host passes itself so listeners never need to own it.
pub type NativeListener = Rc<dyn Fn(&dyn EventHost, &NativeEvent)>;

/// A one-shot task run by [`EventHost::set_timeout`].
pub type TimerTask = Box<dyn FnOnce()>;

/// Event and timer services of the host platform.
///
/// All methods take `&self`: hosts are single-threaded and use interior
/// mutability, and listeners may call back into the host while it dispatches.
pub trait EventHost {
    /// Attach `listener` for events named `event` on `target`.
    fn add_listener(
        &self,
        target: ListenerTarget,
        event: &str,
        listener: NativeListener,
        options: ListenerOptions,
    ) -> ListenerId;

    /// Detach a listener. Returns `false` if it was already gone.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// `Element.matches(query)`. Stale elements never match.
    fn matches(&self, element: ElementId, query: &SelectorQuery) -> bool;

    /// Run `task` once after `delay_ms` milliseconds.
    fn set_timeout(&self, delay_ms: u32, task: TimerTask) -> TimerId;

    /// Cancel a pending task. Returns `false` if it already ran or was cancelled.
    fn clear_timeout(&self, id: TimerId) -> bool;

    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;

    /// `target.dispatchEvent(event)`. Returns how many listeners ran.
    fn dispatch_event(&self, event: &NativeEvent) -> usize;
}

/// Class and custom-property mutation on the document and body elements.
pub trait StyleHost {
    /// Add `class` to the class list of `scope`.
    fn add_class(&self, scope: StyleScope, class: &str);

    /// Remove `class` from the class list of `scope`.
    fn remove_class(&self, scope: StyleScope, class: &str);

    /// Whether the class list of `scope` contains `class`.
    fn has_class(&self, scope: StyleScope, class: &str) -> bool;

    /// Set an inline style property such as `--mc-primary`.
    fn set_property(&self, scope: StyleScope, name: &str, value: &str);
}
