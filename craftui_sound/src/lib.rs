// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Craftui Sound: short synthesized interface cues.
//!
//! Each [`SoundCue`] maps to a [`Tone`]: a single oscillator note whose gain
//! starts at its volume and decays exponentially over its duration. Tones are
//! rendered to mono PCM with [`Tone::render`] and handed to an
//! [`AudioBackend`]. [`MemoryBackend`] keeps the buffers, which is what tests
//! and headless runs use. With the `rodio` feature, `RodioBackend` plays
//! through the default output device.
//!
//! [`SoundBoard`] ties the two together and implements
//! [`EffectSink`](craftui_commands::EffectSink), so it can be handed to a
//! `CommandSystem` to make block and inventory commands audible.
//!
//! ```
//! use craftui_sound::{SoundCue, Waveform};
//!
//! let tone = SoundCue::Success.tone();
//! assert_eq!(tone.waveform, Waveform::Sine);
//! assert_eq!(tone.render(44_100).len(), 6_615);
//! ```

mod backend;
mod board;
mod cue;
#[cfg(feature = "rodio")]
mod output;
mod tone;

pub use backend::{AudioBackend, AudioError, MemoryBackend};
pub use board::SoundBoard;
pub use cue::SoundCue;
#[cfg(feature = "rodio")]
pub use output::RodioBackend;
pub use tone::{MAX_DURATION, RELEASE_LEVEL, Tone, Waveform};
