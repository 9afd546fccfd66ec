// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interface cue table.

use crate::tone::{Tone, Waveform};

/// A named interface sound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Button press.
    ButtonClick,
    /// Pointer entering a button.
    ButtonHover,
    /// Modal or dialog opening.
    ModalOpen,
    /// Modal or dialog closing.
    ModalClose,
    /// Switching tabs.
    TabSwitch,
    /// Something failed.
    Error,
    /// Something succeeded.
    Success,
    /// A notification arrived.
    Notification,
    /// Legacy name; sounds like [`SoundCue::ButtonClick`].
    BlockBreak,
    /// Legacy name; sounds like [`SoundCue::ButtonClick`].
    BlockPlace,
    /// Legacy name; sounds like [`SoundCue::ModalOpen`].
    InventoryOpen,
    /// Legacy name; sounds like [`SoundCue::ModalClose`].
    InventoryClose,
}

impl SoundCue {
    /// Every cue, legacy names last.
    pub const ALL: [Self; 12] = [
        Self::ButtonClick,
        Self::ButtonHover,
        Self::ModalOpen,
        Self::ModalClose,
        Self::TabSwitch,
        Self::Error,
        Self::Success,
        Self::Notification,
        Self::BlockBreak,
        Self::BlockPlace,
        Self::InventoryOpen,
        Self::InventoryClose,
    ];

    /// The cue this one sounds like, after resolving legacy names.
    pub fn canonical(self) -> Self {
        match self {
            Self::BlockBreak | Self::BlockPlace => Self::ButtonClick,
            Self::InventoryOpen => Self::ModalOpen,
            Self::InventoryClose => Self::ModalClose,
            other => other,
        }
    }

    /// The tone played for this cue.
    pub fn tone(self) -> Tone {
        match self.canonical() {
            Self::ButtonHover => Tone::new(440.0).with_duration(0.03).with_volume(0.2),
            Self::ModalOpen => Tone::new(400.0).with_duration(0.12),
            Self::ModalClose => Tone::new(300.0).with_duration(0.12),
            Self::TabSwitch => Tone::new(660.0).with_duration(0.08),
            Self::Error => Tone::new(150.0)
                .with_duration(0.2)
                .with_waveform(Waveform::Sawtooth),
            Self::Success => Tone::new(880.0)
                .with_duration(0.15)
                .with_waveform(Waveform::Sine),
            Self::Notification => Tone::new(800.0).with_waveform(Waveform::Triangle),
            _ => Tone::new(550.0).with_duration(0.05),
        }
    }
}
