//! Core library for the Spectrum Visualiser.
//!
//! Turns one frame of audio analysis bytes into draw calls on a 2D surface.
//! Six styles are available; the beat-particle style also runs a small
//! particle simulation whose state lives in a [`VisualizerSession`].
//!
//! Data flows one way per frame: a [`SampleSource`] fills the sample buffer,
//! [`render::draw_frame`] clears or trail-fills the [`Surface`] and hands the
//! buffer to exactly one renderer.

pub mod config;
pub mod error;
pub mod mapping;
pub mod render;
pub mod session;
pub mod source;
pub mod state;
pub mod surface;
pub mod timeline;

pub use config::{AnalysisConfig, AppConfig, SurfaceConfig, VisualizerConfig};
pub use error::{Result, VisualiserError};
pub use mapping::map_range;
pub use render::{draw_frame, BeatEvent, Frame, VisualizerMode};
pub use session::{FrameStats, VisualizerSession};
pub use source::{SampleDomain, SampleSource, SyntheticSource};
pub use state::{Particle, Shockwave, StateScope, VisualizerState};
pub use surface::{BlendMode, CommandRecorder, DrawCommand, Surface};
pub use timeline::{FrameClock, RenderLoop, RunSummary, StopHandle};
