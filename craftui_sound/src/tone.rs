// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Oscillator tones and their PCM rendering.

use core::f32::consts::TAU;

/// Level the gain envelope decays to by the end of a tone.
pub const RELEASE_LEVEL: f32 = 0.01;

/// Longest tone that is rendered, in seconds. Longer tones are cut to this length.
pub const MAX_DURATION: f32 = 5.0;

/// Oscillator shape.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Waveform {
    /// Pure sine.
    Sine,
    /// Square wave, the default.
    #[default]
    Square,
    /// Rising sawtooth.
    Sawtooth,
    /// Triangle.
    Triangle,
}

impl Waveform {
    /// Value of the waveform at `phase` (in cycles), in `[-1, 1]`.
    pub fn sample(self, phase: f32) -> f32 {
        let frac = phase - phase.floor();
        match self {
            Self::Sine => (TAU * frac).sin(),
            Self::Square => {
                if frac < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Sawtooth => 2.0 * frac - 1.0,
            Self::Triangle => 1.0 - 4.0 * (frac - 0.5).abs(),
        }
    }
}

/// A single decaying oscillator note.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Tone {
    /// Pitch in Hz.
    pub frequency: f32,
    /// Length in seconds.
    pub duration: f32,
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Initial gain.
    pub volume: f32,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            duration: 0.1,
            waveform: Waveform::Square,
            volume: 0.3,
        }
    }
}

impl Tone {
    /// A tone at `frequency` with the default duration, waveform and volume.
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            ..Self::default()
        }
    }

    /// Set the duration in seconds.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Set the waveform.
    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Set the initial gain.
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// The length that is actually rendered: `None` for empty or non-finite
    /// durations, otherwise the duration capped at [`MAX_DURATION`].
    pub fn rendered_duration(&self) -> Option<f32> {
        if !self.duration.is_finite() {
            log::warn!("ignoring tone with non-finite duration {}", self.duration);
            return None;
        }
        if self.duration <= 0.0 {
            return None;
        }
        if self.duration > MAX_DURATION {
            log::warn!(
                "tone of {}s exceeds {MAX_DURATION}s and is shortened",
                self.duration
            );
            return Some(MAX_DURATION);
        }
        Some(self.duration)
    }

    /// Number of samples the tone occupies at `sample_rate`.
    pub fn sample_count(&self, sample_rate: u32) -> usize {
        if sample_rate == 0 {
            return 0;
        }
        let Some(duration) = self.rendered_duration() else {
            return 0;
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "duration is finite and at most MAX_DURATION"
        )]
        let count = (duration * sample_rate as f32).round() as usize;
        count
    }

    /// Gain at `t` seconds: starts at `volume` and decays exponentially to
    /// [`RELEASE_LEVEL`] at the end of the tone.
    pub fn gain_at(&self, t: f32) -> f32 {
        envelope(self.volume, self.duration, t)
    }

    /// Synthesize mono PCM samples in `[-volume, volume]`.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let Some(duration) = self.rendered_duration() else {
            return Vec::new();
        };
        let count = self.sample_count(sample_rate);
        let rate = sample_rate as f32;
        (0..count)
            .map(|i| {
                let t = i as f32 / rate;
                self.waveform.sample(self.frequency * t) * envelope(self.volume, duration, t)
            })
            .collect()
    }
}

fn envelope(volume: f32, duration: f32, t: f32) -> f32 {
    if volume.is_nan() || volume <= 0.0 {
        return 0.0;
    }
    let progress = (t / duration).clamp(0.0, 1.0);
    volume * (RELEASE_LEVEL / volume).powf(progress)
}
