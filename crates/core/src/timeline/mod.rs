use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use serde::Serialize;

use crate::{
    session::{FrameStats, VisualizerSession},
    source::SampleSource,
    surface::Surface,
    Result,
};

/// Cloneable flag that ends a [`RenderLoop`] at the next frame boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Paces frames to a target rate. A rate of zero never sleeps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Option<Duration>,
    next_deadline: Option<Instant>,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: (fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(fps))),
            next_deadline: None,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Blocks until the next frame is due. The first call returns at once.
    pub fn wait(&mut self) {
        let Some(interval) = self.interval else {
            return;
        };

        let now = Instant::now();
        match self.next_deadline {
            Some(deadline) if deadline > now => {
                thread::sleep(deadline - now);
                self.next_deadline = Some(deadline + interval);
            }
            // Late or first frame: restart the cadence.
            _ => self.next_deadline = Some(now + interval),
        }
    }
}

/// Totals accumulated over one [`RenderLoop::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub skipped: u64,
    pub beats: u64,
    pub peak_particles: usize,
    pub peak_shockwaves: usize,
}

impl RunSummary {
    fn record(&mut self, stats: &FrameStats) {
        self.frames += 1;
        if stats.skipped {
            self.skipped += 1;
        }
        if stats.beat.is_some() {
            self.beats += 1;
        }
        self.peak_particles = self.peak_particles.max(stats.particles);
        self.peak_shockwaves = self.peak_shockwaves.max(stats.shockwaves);
    }
}

/// Drives a [`VisualizerSession`] one frame at a time on the calling thread.
///
/// Stopping never drains in-flight particles; the loop simply renders no
/// further frames.
#[derive(Debug)]
pub struct RenderLoop {
    clock: FrameClock,
    max_frames: Option<u64>,
    stop: StopHandle,
}

impl RenderLoop {
    pub fn new(fps: u32) -> Self {
        Self {
            clock: FrameClock::new(fps),
            max_frames: None,
            stop: StopHandle::default(),
        }
    }

    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Renders frames until stopped or the frame limit is hit.
    ///
    /// `on_frame` runs after every frame and may switch modes, resize the
    /// surface, drain recorded commands or stop the loop.
    pub fn run<Src, S, F>(
        &mut self,
        session: &mut VisualizerSession,
        source: &mut Src,
        surface: &mut S,
        mut on_frame: F,
    ) -> Result<RunSummary>
    where
        Src: SampleSource + ?Sized,
        S: Surface + ?Sized,
        F: FnMut(&FrameStats, &mut VisualizerSession, &mut S) -> Result<()>,
    {
        let mut summary = RunSummary::default();
        tracing::debug!(mode = %session.mode(), max_frames = ?self.max_frames, "render loop started");

        while !self.stop.is_stopped() {
            if self.max_frames.is_some_and(|max| summary.frames >= max) {
                break;
            }

            self.clock.wait();
            let stats = session.render_frame(&mut *source, &mut *surface)?;
            summary.record(&stats);
            on_frame(&stats, &mut *session, &mut *surface)?;
        }

        tracing::debug!(frames = summary.frames, beats = summary.beats, "render loop finished");
        Ok(summary)
    }
}
