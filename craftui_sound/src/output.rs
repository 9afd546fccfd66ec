// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playback on the default output device.

use core::fmt;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder};

use crate::backend::{AudioBackend, AudioError};
use crate::board::SoundBoard;

/// [`AudioBackend`] mixing buffers into a `rodio` output stream.
pub struct RodioBackend {
    stream: Option<OutputStream>,
    sample_rate: u32,
}

impl fmt::Debug for RodioBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RodioBackend")
            .field("open", &self.stream.is_some())
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

impl RodioBackend {
    /// Open the system's default output device.
    pub fn open_default() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| AudioError::Device(err.to_string()))?;
        stream.log_on_drop(false);
        let sample_rate = stream.config().sample_rate();
        Ok(Self {
            stream: Some(stream),
            sample_rate,
        })
    }
}

impl AudioBackend for RodioBackend {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn play(&mut self, samples: &[f32]) -> Result<(), AudioError> {
        let stream = self.stream.as_ref().ok_or(AudioError::Closed)?;
        stream
            .mixer()
            .add(SamplesBuffer::new(1, self.sample_rate, samples.to_vec()));
        Ok(())
    }

    fn close(&mut self) -> Result<(), AudioError> {
        self.stream.take().map(drop).ok_or(AudioError::Closed)
    }
}

impl SoundBoard<RodioBackend> {
    /// A board on the default output device, or an unsupported one if it
    /// cannot be opened.
    pub fn with_default_output() -> Self {
        match RodioBackend::open_default() {
            Ok(backend) => Self::new(backend),
            Err(err) => {
                log::warn!("cannot open audio output: {err}");
                Self::unsupported()
            }
        }
    }
}
