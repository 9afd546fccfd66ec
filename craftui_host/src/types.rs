// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers, listener options, and the native event record.

use kurbo::Point;

/// Identifier for an element in a host document (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(u32, u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Handle returned by [`EventHost::add_listener`](crate::EventHost::add_listener).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Handle returned by [`EventHost::set_timeout`](crate::EventHost::set_timeout).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

/// Where a native event was dispatched.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventTargetRef {
    /// An element of the document.
    Element(ElementId),
    /// The document itself.
    Document,
    /// The window.
    Window,
}

/// The only two objects listeners are attached to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ListenerTarget {
    /// `document`
    Document,
    /// `window`
    Window,
}

/// Options forwarded to the platform when attaching a listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ListenerOptions {
    /// Listen during the capture phase instead of the bubble phase.
    pub capture: bool,
    /// The listener promises not to cancel the event.
    pub passive: bool,
    /// Detach automatically before the first invocation.
    pub once: bool,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            capture: false,
            passive: true,
            once: false,
        }
    }
}

/// Which element a style mutation applies to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StyleScope {
    /// The document element (`<html>`).
    Root,
    /// `<body>`.
    Body,
}

bitflags::bitflags! {
    /// Keyboard modifiers held while an event was produced.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Meta / Command / Windows.
        const META  = 0b0000_1000;
    }
}

/// Event types that do not bubble on the web platform.
const NON_BUBBLING: &[&str] = &[
    "mouseenter",
    "mouseleave",
    "focus",
    "blur",
    "load",
    "unload",
    "invalid",
    "play",
    "pause",
    "ended",
    "timeupdate",
    "volumechange",
    "waiting",
    "canplay",
    "pageshow",
    "pagehide",
];

/// A native event as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeEvent {
    /// Platform event name, e.g. `mousedown`.
    pub kind: String,
    /// Dispatch target.
    pub target: EventTargetRef,
    /// Whether the event takes part in the bubble phase.
    pub bubbles: bool,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Key value for keyboard events, e.g. `"e"`.
    pub key: Option<String>,
    /// Pointer button for pointer events.
    pub button: Option<u8>,
    /// Pointer position in client coordinates.
    pub position: Option<Point>,
    /// Named string fields of a custom event's `detail`.
    pub detail: Vec<(String, String)>,
}

impl NativeEvent {
    /// An event of `kind` targeted at `target`, bubbling as the platform does.
    pub fn new(kind: impl Into<String>, target: EventTargetRef) -> Self {
        let kind = kind.into();
        let bubbles = !NON_BUBBLING.contains(&kind.as_str());
        Self {
            kind,
            target,
            bubbles,
            modifiers: Modifiers::empty(),
            key: None,
            button: None,
            position: None,
            detail: Vec::new(),
        }
    }

    /// A pointer event at `position` with the primary button.
    pub fn pointer(kind: impl Into<String>, target: EventTargetRef, position: Point) -> Self {
        Self {
            button: Some(0),
            position: Some(position),
            ..Self::new(kind, target)
        }
    }

    /// A keyboard event carrying `key`.
    pub fn keyboard(kind: impl Into<String>, target: EventTargetRef, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(kind, target)
        }
    }

    /// Replace the held modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Override whether the event bubbles.
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    /// Set the pointer button.
    pub fn with_button(mut self, button: u8) -> Self {
        self.button = Some(button);
        self
    }

    /// Add a `detail` field, replacing an earlier one of the same name.
    pub fn with_detail(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.detail.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.detail.push((name, value)),
        }
        self
    }

    /// A `detail` field by name.
    pub fn detail(&self, name: &str) -> Option<&str> {
        self.detail
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether shift was held.
    pub fn shift_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// The target element, if the event was dispatched to one.
    pub fn target_element(&self) -> Option<ElementId> {
        match self.target {
            EventTargetRef::Element(id) => Some(id),
            EventTargetRef::Document | EventTargetRef::Window => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubbling_follows_platform_defaults() {
        assert!(NativeEvent::new("click", EventTargetRef::Document).bubbles);
        assert!(!NativeEvent::new("mouseenter", EventTargetRef::Document).bubbles);
        assert!(!NativeEvent::new("focus", EventTargetRef::Document).bubbles);
        assert!(
            NativeEvent::new("focus", EventTargetRef::Document)
                .with_bubbles(true)
                .bubbles
        );
    }

    #[test]
    fn builders_fill_fields() {
        let e = NativeEvent::pointer("mousedown", EventTargetRef::Window, Point::new(3.0, 4.0))
            .with_modifiers(Modifiers::SHIFT | Modifiers::CTRL);
        assert!(e.shift_key());
        assert_eq!(e.button, Some(0));
        assert_eq!(e.position, Some(Point::new(3.0, 4.0)));
        assert_eq!(e.target_element(), None);

        let k = NativeEvent::keyboard("keydown", EventTargetRef::Document, "e");
        assert_eq!(k.key.as_deref(), Some("e"));
        assert!(!k.shift_key());
    }

    #[test]
    fn detail_fields_replace_by_name() {
        let e = NativeEvent::new("themechange", EventTargetRef::Document)
            .with_detail("theme", "dark")
            .with_detail("previousTheme", "default")
            .with_detail("theme", "neon");
        assert_eq!(e.detail("theme"), Some("neon"));
        assert_eq!(e.detail("previousTheme"), Some("default"));
        assert_eq!(e.detail("missing"), None);
        assert_eq!(e.detail.len(), 2);
    }

    #[test]
    fn default_listener_options_are_passive_bubble() {
        let o = ListenerOptions::default();
        assert!(!o.capture);
        assert!(o.passive);
        assert!(!o.once);
    }
}
