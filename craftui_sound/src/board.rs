// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playing cues through a backend.

use core::cell::{Cell, RefCell};

use craftui_commands::{Effect, EffectSink};

use crate::backend::AudioBackend;
use crate::cue::SoundCue;
use crate::tone::Tone;

/// Plays [`SoundCue`]s through an [`AudioBackend`].
///
/// A board built with [`SoundBoard::unsupported`] has no output and ignores
/// every request. Playback failures are logged, never returned.
///
/// ## Example
///
/// ```
/// use craftui_sound::{MemoryBackend, SoundBoard, SoundCue};
///
/// let board = SoundBoard::new(MemoryBackend::new(8_000));
/// assert!(board.play(SoundCue::ButtonClick));
///
/// board.set_enabled(false);
/// assert!(!board.play(SoundCue::ButtonClick));
/// assert_eq!(board.with_backend(|b| b.clips().len()), Some(1));
/// ```
#[derive(Debug)]
pub struct SoundBoard<B> {
    backend: Option<RefCell<B>>,
    enabled: Cell<bool>,
}

impl<B: AudioBackend> SoundBoard<B> {
    /// An enabled board playing through `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Some(RefCell::new(backend)),
            enabled: Cell::new(true),
        }
    }

    /// A board without audio output.
    pub fn unsupported() -> Self {
        log::warn!("audio output is not supported; sounds are disabled");
        Self {
            backend: None,
            enabled: Cell::new(true),
        }
    }

    /// Whether the board has an output.
    pub fn is_supported(&self) -> bool {
        self.backend.is_some()
    }

    /// Whether requests are currently honored.
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Turn playback on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Play `cue`. Returns whether a buffer reached the backend.
    pub fn play(&self, cue: SoundCue) -> bool {
        self.play_custom(cue.tone())
    }

    /// Play an arbitrary tone. Returns whether a buffer reached the backend.
    pub fn play_custom(&self, tone: Tone) -> bool {
        if !self.enabled.get() {
            return false;
        }
        let Some(backend) = &self.backend else {
            return false;
        };
        let mut backend = backend.borrow_mut();
        let samples = tone.render(backend.sample_rate());
        if samples.is_empty() {
            log::debug!("tone rendered no samples; nothing to play");
            return false;
        }
        match backend.play(&samples) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("failed to play sound: {err}");
                false
            }
        }
    }

    /// Close the backend.
    pub fn dispose(&self) {
        if let Some(backend) = &self.backend
            && let Err(err) = backend.borrow_mut().close()
        {
            log::debug!("audio output already released: {err}");
        }
    }

    /// Inspect the backend, if there is one.
    pub fn with_backend<R>(&self, f: impl FnOnce(&B) -> R) -> Option<R> {
        self.backend.as_ref().map(|b| f(&*b.borrow()))
    }
}

impl<B: AudioBackend> EffectSink for SoundBoard<B> {
    fn effect(&self, effect: Effect) {
        let cue = match effect {
            Effect::BlockPlace => SoundCue::BlockPlace,
            Effect::BlockBreak => SoundCue::BlockBreak,
            Effect::InventoryToggle => SoundCue::InventoryOpen,
        };
        self.play(cue);
    }
}
