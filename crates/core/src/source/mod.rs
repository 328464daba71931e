//! Sample source contract.
//!
//! The renderers only ever see a byte buffer filled by a [`SampleSource`].
//! Real audio analysis lives outside this crate; [`SyntheticSource`] is a
//! deterministic stand-in for headless runs and tests.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::{config::AnalysisConfig, Result, VisualiserError};

/// Which representation of the signal a buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleDomain {
    /// Waveform bytes, 128 is the zero line.
    TimeDomain,
    /// Spectrum magnitudes, bin 0 is the lowest frequency.
    Frequency,
}

/// Supplies one buffer of 8-bit magnitudes per frame.
pub trait SampleSource {
    /// Fixed length of every buffer this source fills.
    fn bin_count(&self) -> usize;

    /// Overwrites `buf` with the current frame in the requested domain.
    fn fill(&mut self, domain: SampleDomain, buf: &mut [u8]) -> Result<()>;
}

impl<T: SampleSource + ?Sized> SampleSource for Box<T> {
    fn bin_count(&self) -> usize {
        (**self).bin_count()
    }

    fn fill(&mut self, domain: SampleDomain, buf: &mut [u8]) -> Result<()> {
        (**self).fill(domain, buf)
    }
}

const KICK_BINS: usize = 32;
const KICK_GAIN: f32 = 110.0;
const KICK_DECAY_FRAMES: f32 = 4.0;
const SPECTRUM_PEAK: f32 = 170.0;
const SPECTRUM_ROLLOFF: f32 = 220.0;
const WAVE_AMPLITUDE: f32 = 90.0;
const WAVE_CYCLES: f32 = 6.0;

/// Test signal with a steady kick drum over a sloping spectrum.
///
/// Frequency bins are exponentially averaged across frames with the configured
/// smoothing factor, the way an analyser node smooths its output.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    bins: usize,
    smoothing: f32,
    beat_period: u32,
    frame: u64,
    smoothed: Vec<f32>,
}

impl SyntheticSource {
    pub fn new(bins: usize, smoothing: f32) -> Self {
        Self {
            bins,
            smoothing,
            beat_period: 30,
            frame: 0,
            smoothed: vec![0.0; bins],
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.bin_count(), config.smoothing)
    }

    /// Frames between kicks. 30 frames at 60 fps is 120 bpm.
    pub fn with_beat_period(mut self, frames: u32) -> Self {
        self.beat_period = frames.max(1);
        self
    }

    /// Number of frames produced so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    fn kick_envelope(&self) -> f32 {
        let age = (self.frame % u64::from(self.beat_period)) as f32;
        (-age / KICK_DECAY_FRAMES).exp()
    }

    fn fill_spectrum(&mut self, buf: &mut [u8]) {
        let kick = self.kick_envelope();
        let t = self.frame as f32;
        for (index, (out, smoothed)) in buf.iter_mut().zip(self.smoothed.iter_mut()).enumerate() {
            let bin = index as f32;
            let slope = SPECTRUM_PEAK * (-bin / SPECTRUM_ROLLOFF).exp();
            let shimmer = 12.0 * (t * 0.13 + bin * 0.07).sin();
            let punch = if index < KICK_BINS { KICK_GAIN * kick } else { 0.0 };
            let raw = (slope + shimmer + punch).clamp(0.0, 255.0);

            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * raw;
            *out = smoothed.round().clamp(0.0, 255.0) as u8;
        }
    }

    fn fill_waveform(&self, buf: &mut [u8]) {
        let amplitude = WAVE_AMPLITUDE * (0.4 + 0.6 * self.kick_envelope());
        let phase = self.frame as f32 * 0.05;
        let len = buf.len().max(1) as f32;
        for (index, out) in buf.iter_mut().enumerate() {
            let x = index as f32 / len;
            let v = 128.0 + amplitude * (TAU * (x * WAVE_CYCLES + phase)).sin();
            *out = v.round().clamp(0.0, 255.0) as u8;
        }
    }
}

impl SampleSource for SyntheticSource {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn fill(&mut self, domain: SampleDomain, buf: &mut [u8]) -> Result<()> {
        if buf.len() != self.bins {
            return Err(VisualiserError::msg(format!(
                "sample buffer holds {} bins, source produces {}",
                buf.len(),
                self.bins
            )));
        }

        match domain {
            SampleDomain::Frequency => self.fill_spectrum(buf),
            SampleDomain::TimeDomain => self.fill_waveform(buf),
        }
        self.frame += 1;
        Ok(())
    }
}
