//! Frame dispatcher and the per-mode style renderers.
//!
//! Every renderer is a free function over the surface, the frame geometry and
//! the current sample buffer. Only the beat-particle renderer touches
//! [`VisualizerState`].

mod bars;
mod beat;
mod circular;
mod grid;
mod orb;
mod wave;

use std::{fmt, str::FromStr};

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    source::SampleDomain,
    state::VisualizerState,
    surface::{Rect, Rgba, Surface},
    VisualiserError,
};

pub use bars::{bar_height, draw_bars};
pub use beat::{draw_beat_particles, effective_threshold, spawn_count, BeatEvent, MAX_BURST};
pub use circular::draw_circular;
pub use grid::draw_grid_particles;
pub use orb::{draw_orb, orb_scale};
pub use wave::{draw_wave, wave_points};

/// Translucent slate fill painted instead of a clear in trail modes.
pub const TRAIL_FILL: Rgba = Rgba::new(2, 6, 23, 0.2);

/// The visual styles the dispatcher can route a frame to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisualizerMode {
    #[default]
    Bars,
    Wave,
    Circular,
    /// Static grid of dots whose size follows the spectrum.
    Particles,
    Orb,
    BeatParticles,
}

impl VisualizerMode {
    pub const ALL: [VisualizerMode; 6] = [
        Self::Bars,
        Self::Wave,
        Self::Circular,
        Self::Particles,
        Self::Orb,
        Self::BeatParticles,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Bars => "BARS",
            Self::Wave => "WAVE",
            Self::Circular => "CIRCULAR",
            Self::Particles => "PARTICLES",
            Self::Orb => "ORB",
            Self::BeatParticles => "BEAT_PARTICLES",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bars => "Spectrum Bars",
            Self::Wave => "Waveform",
            Self::Circular => "Circular Spectrum",
            Self::Particles => "Particle Grid",
            Self::Orb => "Pulsing Orb",
            Self::BeatParticles => "Beat Explosions",
        }
    }

    /// Modes that paint a translucent fill so the previous frame leaves a
    /// trail.
    pub fn uses_trails(self) -> bool {
        matches!(self, Self::Particles | Self::Orb | Self::BeatParticles)
    }

    /// Modes that read and evolve [`VisualizerState`].
    pub fn needs_simulation(self) -> bool {
        matches!(self, Self::BeatParticles)
    }

    /// Which kind of buffer the sample source must supply for this mode.
    pub fn domain(self) -> SampleDomain {
        match self {
            Self::Wave => SampleDomain::TimeDomain,
            _ => SampleDomain::Frequency,
        }
    }
}

impl fmt::Display for VisualizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for VisualizerMode {
    type Err = VisualiserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|mode| mode.id().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| VisualiserError::msg(format!("unknown visualizer mode `{s}`")))
    }
}

/// Inputs shared by every renderer for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub width: f32,
    pub height: f32,
    pub samples: &'a [u8],
    pub sensitivity: f32,
}

impl Frame<'_> {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Draws one frame in `mode`.
///
/// Trail modes paint [`TRAIL_FILL`] over the previous frame, every other mode
/// clears. Exactly one renderer runs per call. A zero-area frame draws
/// nothing and leaves `state` untouched.
pub fn draw_frame<S: Surface + ?Sized>(
    surface: &mut S,
    mode: VisualizerMode,
    frame: &Frame<'_>,
    state: &mut VisualizerState,
    rng: &mut Rng,
) -> Option<BeatEvent> {
    if frame.is_empty() {
        return None;
    }

    if mode.uses_trails() {
        surface.fill_rect(
            Rect::new(0.0, 0.0, frame.width, frame.height),
            &TRAIL_FILL.into(),
        );
    } else {
        surface.clear();
    }

    let (cx, cy) = frame.center();

    match mode {
        VisualizerMode::Bars => {
            draw_bars(surface, frame);
            None
        }
        VisualizerMode::Wave => {
            draw_wave(surface, frame);
            None
        }
        VisualizerMode::Circular => {
            draw_circular(surface, cx, cy, frame.samples);
            None
        }
        VisualizerMode::Orb => {
            draw_orb(surface, cx, cy, frame.samples, frame.sensitivity);
            None
        }
        VisualizerMode::Particles => {
            draw_grid_particles(surface, frame);
            None
        }
        VisualizerMode::BeatParticles => draw_beat_particles(surface, frame, state, rng),
    }
}

/// Reads one sample, treating indices past the end of the buffer as silence.
#[inline]
pub(crate) fn sample(samples: &[u8], index: usize) -> f32 {
    samples.get(index).copied().map_or(0.0, f32::from)
}

/// Mean of the first `bins` samples. Missing bins count as zero.
pub(crate) fn bass_level(samples: &[u8], bins: usize) -> f32 {
    let sum: f32 = (0..bins).map(|index| sample(samples, index)).sum();
    sum / bins as f32
}

/// Levels such as particle life decrease by a fixed step every frame and pick
/// up rounding error on the way. Anything under half a step counts as spent,
/// so a level of 1.0 lasts exactly `1.0 / step` frames.
#[inline]
pub(crate) fn is_spent(level: f32, step: f32) -> bool {
    level <= step * 0.5
}
