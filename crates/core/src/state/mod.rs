//! Simulation state that outlives a single frame.

use serde::{Deserialize, Serialize};

use crate::surface::{Point, Rgba};

/// Lowest value the adaptive beat threshold may decay to.
pub const BEAT_THRESHOLD_FLOOR: f32 = 100.0;

/// A short-lived spark spawned by a beat.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    /// 1.0 when spawned, dead at or below 0.0.
    pub life: f32,
    /// Always 1.0 for now; reserved for variable lifespans.
    pub max_life: f32,
    pub color: Rgba,
    /// Base radius before the life-based shrink.
    pub size: f32,
}

/// An expanding ring marking where a beat exploded.
#[derive(Debug, Clone, PartialEq)]
pub struct Shockwave {
    pub origin: Point,
    pub radius: f32,
    pub alpha: f32,
    pub color: Rgba,
}

/// How long a [`VisualizerState`] lives relative to mode switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateScope {
    /// State is kept for the whole session and keeps whatever it had when the
    /// particle mode is left and re-entered.
    #[default]
    Session,
    /// State is dropped when leaving the particle mode and rebuilt on entry.
    ModeActive,
}

/// Particles, shockwaves and the adaptive beat threshold.
///
/// Owned by exactly one render loop; nothing else writes to it.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerState {
    pub particles: Vec<Particle>,
    pub shockwaves: Vec<Shockwave>,
    pub beat_threshold: f32,
}

impl Default for VisualizerState {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualizerState {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            shockwaves: Vec::new(),
            beat_threshold: BEAT_THRESHOLD_FLOOR,
        }
    }

    /// Returns `true` when no transient entity is alive.
    pub fn is_idle(&self) -> bool {
        self.particles.is_empty() && self.shockwaves.is_empty()
    }

    pub fn reset(&mut self) {
        self.particles.clear();
        self.shockwaves.clear();
        self.beat_threshold = BEAT_THRESHOLD_FLOOR;
    }
}
