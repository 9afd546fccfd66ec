// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration options and the per-dispatch data envelope.

use craftui_host::{ElementId, ListenerOptions, NativeEvent};

use crate::synthetic::SyntheticCommand;

/// Relationship between the matched element and the element a handler cares about.
///
/// Carried through to [`CommandData::params`] for handlers to interpret; filtering
/// always tests the event target itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TargetRelation {
    /// The target element.
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    Itself,
    /// Its parent.
    Parent,
    /// Its children.
    Children,
    /// Its siblings.
    Siblings,
    /// Its closest matching ancestor.
    Closest,
}

/// Options attached to a command at registration or trigger time.
///
/// Unset fields take the platform defaults: bubble phase, passive, not once,
/// no delay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CommandParams {
    /// Replaces the positional selector of `add`.
    pub selector: Option<String>,
    /// Relationship hint for handlers.
    pub target: Option<TargetRelation>,
    /// Detach after the first native delivery.
    pub once: Option<bool>,
    /// Defer triggered callbacks by this many milliseconds.
    pub delay: Option<u32>,
    /// `Some(false)` listens in the capture phase.
    pub bubbles: Option<bool>,
    /// Forwarded to the platform; defaults to `true`.
    pub passive: Option<bool>,
    /// Informational only.
    pub cancelable: Option<bool>,
}

impl CommandParams {
    /// Empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`CommandParams::selector`].
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Set [`CommandParams::target`].
    pub fn with_target(mut self, target: TargetRelation) -> Self {
        self.target = Some(target);
        self
    }

    /// Set [`CommandParams::once`].
    pub fn with_once(mut self, once: bool) -> Self {
        self.once = Some(once);
        self
    }

    /// Set [`CommandParams::delay`].
    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay = Some(delay_ms);
        self
    }

    /// Set [`CommandParams::bubbles`].
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = Some(bubbles);
        self
    }

    /// Set [`CommandParams::passive`].
    pub fn with_passive(mut self, passive: bool) -> Self {
        self.passive = Some(passive);
        self
    }

    /// Set [`CommandParams::cancelable`].
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = Some(cancelable);
        self
    }

    /// Native listener options derived from these params.
    pub fn listener_options(&self) -> ListenerOptions {
        ListenerOptions {
            capture: self.bubbles == Some(false),
            passive: self.passive.unwrap_or(true),
            once: self.once.unwrap_or(false),
        }
    }

    /// The trigger delay, if it defers invocation at all.
    pub(crate) fn effective_delay(&self) -> Option<u32> {
        self.delay.filter(|d| *d > 0)
    }
}

/// What a callback receives for each dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandData {
    /// The element the native event targeted, if any.
    pub element: Option<ElementId>,
    /// The native event; `None` for triggered dispatch.
    pub event: Option<NativeEvent>,
    /// The selector the command was registered with, as written.
    pub selector: String,
    /// Params from registration (native dispatch) or from the trigger call.
    pub params: CommandParams,
    /// Milliseconds since the Unix epoch at dispatch.
    pub timestamp: u64,
    /// The synthetic command that refined this dispatch, if any.
    pub action: Option<SyntheticCommand>,
}

impl CommandData {
    /// Whether this dispatch came from `trigger` rather than a native event.
    pub fn is_synthetic(&self) -> bool {
        self.event.is_none()
    }
}
