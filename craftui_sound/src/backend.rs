// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Audio output backends.

/// Failures reported by an [`AudioBackend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    /// The backend was closed by [`AudioBackend::close`].
    #[error("audio output is closed")]
    Closed,
    /// The device refused the buffer.
    #[error("audio device error: {0}")]
    Device(String),
}

/// Something that can play mono PCM buffers.
pub trait AudioBackend {
    /// Sample rate buffers are rendered at, in Hz.
    fn sample_rate(&self) -> u32;

    /// Queue `samples` for playback.
    fn play(&mut self, samples: &[f32]) -> Result<(), AudioError>;

    /// Release the device. Later calls to [`AudioBackend::play`] fail.
    fn close(&mut self) -> Result<(), AudioError>;
}

/// Backend that keeps every buffer it is asked to play.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    sample_rate: u32,
    clips: Vec<Vec<f32>>,
    closed: bool,
}

impl MemoryBackend {
    /// A backend at `sample_rate` Hz.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Buffers played so far, oldest first.
    pub fn clips(&self) -> &[Vec<f32>] {
        &self.clips
    }

    /// Whether [`AudioBackend::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl AudioBackend for MemoryBackend {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn play(&mut self, samples: &[f32]) -> Result<(), AudioError> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        self.clips.push(samples.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<(), AudioError> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        self.closed = true;
        Ok(())
    }
}
