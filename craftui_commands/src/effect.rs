// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notification capability for side effects such as sounds.

/// Something noteworthy that happened while dispatching a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    /// A `mc:block-place` command fired.
    BlockPlace,
    /// A `mc:block-break` command fired.
    BlockBreak,
    /// A `mc:inventory-toggle` command fired.
    InventoryToggle,
}

/// Receives [`Effect`]s from a [`CommandSystem`](crate::CommandSystem).
///
/// Injected at construction; the command system knows nothing about what the
/// sink does with them.
pub trait EffectSink {
    /// Called after the callbacks for the dispatch that produced `effect` ran.
    fn effect(&self, effect: Effect);
}
