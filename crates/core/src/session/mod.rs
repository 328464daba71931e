//! One visualizer session: the mode, the sample buffer and the simulation
//! state that survive from frame to frame.

use fastrand::Rng;

use crate::{
    config::AppConfig,
    render::{draw_frame, BeatEvent, Frame},
    source::SampleSource,
    state::{StateScope, VisualizerState},
    surface::Surface,
    Result, VisualizerMode,
};

/// What happened on one call to [`VisualizerSession::render_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// 1-based frame counter, including skipped frames.
    pub frame: u64,
    pub mode: VisualizerMode,
    pub width: u32,
    pub height: u32,
    pub particles: usize,
    pub shockwaves: usize,
    pub beat: Option<BeatEvent>,
    /// Set when the surface had no area and nothing was drawn.
    pub skipped: bool,
}

/// Owns everything a render loop needs between frames.
///
/// The session is the only writer of its [`VisualizerState`]. It is not
/// `Sync`-shared; move it into whichever task drives the frames.
#[derive(Debug)]
pub struct VisualizerSession {
    mode: VisualizerMode,
    sensitivity: f32,
    scope: StateScope,
    state: Option<VisualizerState>,
    rng: Rng,
    samples: Vec<u8>,
    size: (u32, u32),
    frame: u64,
}

impl VisualizerSession {
    pub fn new(mode: VisualizerMode, sensitivity: f32, rng: Rng) -> Self {
        Self {
            mode,
            sensitivity,
            scope: StateScope::default(),
            state: None,
            rng,
            samples: Vec::new(),
            size: (0, 0),
            frame: 0,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let visualizer = &config.visualizer;
        let rng = visualizer.seed.map(Rng::with_seed).unwrap_or_else(Rng::new);
        Self::new(visualizer.mode, visualizer.sensitivity, rng).with_scope(visualizer.state_scope)
    }

    pub fn with_scope(mut self, scope: StateScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn mode(&self) -> VisualizerMode {
        self.mode
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    /// Simulation state, once a stateful mode has rendered at least once.
    pub fn state(&self) -> Option<&VisualizerState> {
        self.state.as_ref()
    }

    /// The buffer used for the most recent frame.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Last surface size seen by [`Self::render_frame`].
    pub fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    /// Switches the visual style from the next frame on.
    ///
    /// With [`StateScope::Session`] particles keep their state while another
    /// mode is shown. With [`StateScope::ModeActive`] leaving a stateful mode
    /// drops the state.
    pub fn set_mode(&mut self, mode: VisualizerMode) {
        if mode == self.mode {
            return;
        }

        tracing::debug!(from = %self.mode, to = %mode, "switching mode");
        if self.scope == StateScope::ModeActive
            && self.mode.needs_simulation()
            && !mode.needs_simulation()
            && self.state.take().is_some()
        {
            tracing::debug!("dropped simulation state");
        }
        self.mode = mode;
    }

    /// Out-of-range values are passed through to the renderers as-is.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    /// Pulls one buffer from `source` and draws it onto `surface`.
    ///
    /// The surface size is read before anything is drawn, so a resize between
    /// frames applies to the whole frame. A surface with no area is skipped
    /// without touching the source or the simulation.
    pub fn render_frame<Src, S>(&mut self, source: &mut Src, surface: &mut S) -> Result<FrameStats>
    where
        Src: SampleSource + ?Sized,
        S: Surface + ?Sized,
    {
        self.frame += 1;

        let (width, height) = surface.size();
        if (width, height) != self.size {
            tracing::debug!(width, height, "surface resized");
            self.size = (width, height);
        }

        if width == 0 || height == 0 {
            tracing::trace!(frame = self.frame, "skipping frame on empty surface");
            return Ok(self.stats(None, true));
        }

        let bins = source.bin_count();
        if self.samples.len() != bins {
            self.samples.resize(bins, 0);
        }
        source.fill(self.mode.domain(), &mut self.samples)?;

        if self.mode.needs_simulation() && self.state.is_none() {
            tracing::debug!(mode = %self.mode, "creating simulation state");
            self.state = Some(VisualizerState::new());
        }

        let frame = Frame {
            width: width as f32,
            height: height as f32,
            samples: &self.samples,
            sensitivity: self.sensitivity,
        };
        let mut scratch = VisualizerState::new();
        let state = self.state.as_mut().unwrap_or(&mut scratch);
        let beat = draw_frame(surface, self.mode, &frame, state, &mut self.rng);

        let stats = self.stats(beat, false);
        tracing::trace!(
            frame = stats.frame,
            particles = stats.particles,
            shockwaves = stats.shockwaves,
            "frame rendered"
        );
        Ok(stats)
    }

    fn stats(&self, beat: Option<BeatEvent>, skipped: bool) -> FrameStats {
        let (particles, shockwaves) = self
            .state
            .as_ref()
            .map(|state| (state.particles.len(), state.shockwaves.len()))
            .unwrap_or((0, 0));
        FrameStats {
            frame: self.frame,
            mode: self.mode,
            width: self.size.0,
            height: self.size.1,
            particles,
            shockwaves,
            beat,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        source::{SampleDomain, SampleSource},
        surface::CommandRecorder,
    };

    /// Source that replays a fixed buffer and records the requested domain.
    struct Fixed {
        samples: Vec<u8>,
        domains: Vec<SampleDomain>,
    }

    impl Fixed {
        fn new(samples: Vec<u8>) -> Self {
            Self {
                samples,
                domains: Vec::new(),
            }
        }
    }

    impl SampleSource for Fixed {
        fn bin_count(&self) -> usize {
            self.samples.len()
        }

        fn fill(&mut self, domain: SampleDomain, buf: &mut [u8]) -> Result<()> {
            self.domains.push(domain);
            buf.copy_from_slice(&self.samples);
            Ok(())
        }
    }

    fn session(mode: VisualizerMode) -> VisualizerSession {
        VisualizerSession::new(mode, 1.0, Rng::with_seed(21))
    }

    #[test]
    fn requests_the_domain_of_the_active_mode() {
        let mut source = Fixed::new(vec![128; 64]);
        let mut surface = CommandRecorder::new(200, 100);
        let mut session = session(VisualizerMode::Wave);

        session.render_frame(&mut source, &mut surface).unwrap();
        session.set_mode(VisualizerMode::Bars);
        session.render_frame(&mut source, &mut surface).unwrap();

        assert_eq!(source.domains, vec![SampleDomain::TimeDomain, SampleDomain::Frequency]);
        assert_eq!(session.samples().len(), 64);
    }

    #[test]
    fn state_is_created_on_first_stateful_frame() {
        let mut source = Fixed::new(vec![0; 64]);
        let mut surface = CommandRecorder::new(200, 100);
        let mut session = session(VisualizerMode::Bars);

        session.render_frame(&mut source, &mut surface).unwrap();
        assert!(session.state().is_none());

        session.set_mode(VisualizerMode::BeatParticles);
        session.render_frame(&mut source, &mut surface).unwrap();
        assert!(session.state().is_some());
    }

    #[test]
    fn session_scope_keeps_particles_across_switches() {
        let mut source = Fixed::new(vec![255; 64]);
        let mut surface = CommandRecorder::new(200, 100);
        let mut session = session(VisualizerMode::BeatParticles);

        let stats = session.render_frame(&mut source, &mut surface).unwrap();
        assert!(stats.beat.is_some());
        session.set_mode(VisualizerMode::Bars);
        let stats = session.render_frame(&mut source, &mut surface).unwrap();

        assert!(stats.beat.is_none());
        assert_eq!(stats.shockwaves, 1);
        assert!(stats.particles > 0);
    }

    #[test]
    fn mode_active_scope_drops_state_on_exit() {
        let mut source = Fixed::new(vec![255; 64]);
        let mut surface = CommandRecorder::new(200, 100);
        let mut session = session(VisualizerMode::BeatParticles).with_scope(StateScope::ModeActive);

        session.render_frame(&mut source, &mut surface).unwrap();
        assert!(session.state().is_some());
        session.set_mode(VisualizerMode::Orb);
        assert!(session.state().is_none());

        session.set_mode(VisualizerMode::BeatParticles);
        let stats = session.render_frame(&mut source, &mut surface).unwrap();
        assert!(stats.beat.is_some());
        assert_eq!(stats.shockwaves, 1);
    }

    #[test]
    fn empty_surface_skips_without_pulling_samples() {
        let mut source = Fixed::new(vec![255; 64]);
        let mut surface = CommandRecorder::new(0, 0);
        let mut session = session(VisualizerMode::BeatParticles);

        let stats = session.render_frame(&mut source, &mut surface).unwrap();
        assert!(stats.skipped);
        assert!(source.domains.is_empty());
        assert!(surface.commands().is_empty());
        assert!(session.state().is_none());
    }

    #[test]
    fn resize_applies_to_the_next_frame() {
        let mut source = Fixed::new(vec![0; 64]);
        let mut surface = CommandRecorder::new(200, 100);
        let mut session = session(VisualizerMode::Orb);

        session.render_frame(&mut source, &mut surface).unwrap();
        surface.resize(640, 480);
        surface.take_commands();
        let stats = session.render_frame(&mut source, &mut surface).unwrap();

        assert_eq!((stats.width, stats.height), (640, 480));
        assert_eq!(session.surface_size(), (640, 480));
        assert!(surface
            .commands()
            .contains(&crate::surface::DrawCommand::Translate { dx: 320.0, dy: 240.0 }));
    }

    #[test]
    fn seeded_config_builds_reproducible_sessions() {
        let mut config = AppConfig::default();
        config.visualizer.mode = VisualizerMode::BeatParticles;
        config.visualizer.seed = Some(99);

        let run = || {
            let mut session = VisualizerSession::from_config(&config);
            let mut source = Fixed::new(vec![230; 64]);
            let mut surface = CommandRecorder::new(300, 300);
            session.render_frame(&mut source, &mut surface).unwrap();
            session.state().cloned()
        };
        assert_eq!(run(), run());
    }
}
