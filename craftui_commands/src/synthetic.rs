// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Game-style commands derived from primitive pointer and key events.

use core::fmt;

use craftui_host::NativeEvent;

use crate::effect::Effect;
use crate::names;

/// Command types with this prefix are synthetic.
pub const SYNTHETIC_PREFIX: &str = "mc:";

/// A derived command and the refinement that produces it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntheticCommand {
    /// `mc:block-place`: pointer down with shift held.
    BlockPlace,
    /// `mc:block-break`: pointer down without shift.
    BlockBreak,
    /// `mc:inventory-toggle` (alias `mc:inventory-open`): key down on `"e"`.
    InventoryToggle,
}

/// How a command type is bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Binding {
    /// Bound directly to the translated native event.
    Primitive,
    /// A known synthetic command.
    Synthetic(SyntheticCommand),
    /// Carries the synthetic prefix but names nothing we know.
    UnknownSynthetic,
}

impl Binding {
    pub(crate) fn classify(command_type: &str) -> Self {
        if !command_type.starts_with(SYNTHETIC_PREFIX) {
            return Self::Primitive;
        }
        SyntheticCommand::from_command_type(command_type).map_or(Self::UnknownSynthetic, Self::Synthetic)
    }
}

impl SyntheticCommand {
    /// Parse a full command type such as `mc:block-place`.
    pub fn from_command_type(command_type: &str) -> Option<Self> {
        match command_type.strip_prefix(SYNTHETIC_PREFIX)? {
            "block-place" => Some(Self::BlockPlace),
            "block-break" => Some(Self::BlockBreak),
            "inventory-toggle" | "inventory-open" => Some(Self::InventoryToggle),
            _ => None,
        }
    }

    /// Canonical command type.
    pub fn command_type(self) -> &'static str {
        match self {
            Self::BlockPlace => "mc:block-place",
            Self::BlockBreak => "mc:block-break",
            Self::InventoryToggle => "mc:inventory-toggle",
        }
    }

    /// The primitive command this one listens on.
    pub fn primitive(self) -> &'static str {
        match self {
            Self::BlockPlace | Self::BlockBreak => "mouse:down",
            Self::InventoryToggle => "key:down",
        }
    }

    /// The native event name of [`SyntheticCommand::primitive`].
    pub fn native_event(self) -> &'static str {
        names::translate(self.primitive())
    }

    /// Whether a primitive event qualifies as this command.
    pub fn refine(self, event: &NativeEvent) -> bool {
        match self {
            Self::BlockPlace => event.shift_key(),
            Self::BlockBreak => !event.shift_key(),
            Self::InventoryToggle => event.key.as_deref() == Some("e"),
        }
    }

    /// The effect reported when this command fires.
    pub fn effect(self) -> Effect {
        match self {
            Self::BlockPlace => Effect::BlockPlace,
            Self::BlockBreak => Effect::BlockBreak,
            Self::InventoryToggle => Effect::InventoryToggle,
        }
    }
}

impl fmt::Display for SyntheticCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_type())
    }
}
