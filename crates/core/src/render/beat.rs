//! Beat-triggered explosions.
//!
//! Each frame the bass level is compared against a fixed trigger and the
//! adaptive threshold in [`VisualizerState`]. A beat spawns one shockwave and
//! a burst of particles at a random point. The threshold then follows the
//! bass down geometrically, so sustained bass cannot retrigger every frame.

use std::f32::consts::TAU;

use fastrand::Rng;

use crate::{
    mapping::map_range,
    state::{Particle, Shockwave, VisualizerState, BEAT_THRESHOLD_FLOOR},
    surface::{BlendMode, Point, Rgba, Stroke, Surface},
};

use super::{bass_level, is_spent, Frame};

const BASS_BINS: usize = 15;
const BASE_TRIGGER: f32 = 170.0;
const MIN_TRIGGER: f32 = 80.0;
const TRIGGER_SENSITIVITY_SLOPE: f32 = 70.0;
const THRESHOLD_DECAY: f32 = 0.90;

const MIN_SPAWN: f32 = 8.0;
const MAX_SPAWN: f32 = 20.0;
/// Hard cap on particles per beat. Sensitivity itself is not clamped, so
/// absurd values would otherwise ask for billions of particles.
pub const MAX_BURST: usize = 1024;

const SHOCKWAVE_GROWTH: f32 = 5.0;
const SHOCKWAVE_FADE: f32 = 0.05;
const SHOCKWAVE_WIDTH: f32 = 3.0;

const PARTICLE_DRAG: f32 = 0.92;
const PARTICLE_DECAY: f32 = 0.02;

const PALETTE: [Rgba; 7] = [
    Rgba::hex(0xf472b6),
    Rgba::hex(0xc084fc),
    Rgba::hex(0x818cf8),
    Rgba::hex(0x22d3ee),
    Rgba::hex(0x34d399),
    Rgba::hex(0xfbbf24),
    Rgba::hex(0xf87171),
];

/// Describes the beat that fired on a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatEvent {
    pub origin: Point,
    pub color: Rgba,
    pub bass: f32,
    pub spawned: usize,
}

/// Fixed trigger level for a sensitivity. Higher sensitivity lowers the bar,
/// never below 80.
pub fn effective_threshold(sensitivity: f32) -> f32 {
    (BASE_TRIGGER - (sensitivity - 1.0) * TRIGGER_SENSITIVITY_SLOPE).max(MIN_TRIGGER)
}

/// Number of particles a beat of strength `bass` spawns, at most
/// [`MAX_BURST`].
pub fn spawn_count(bass: f32, trigger: f32, sensitivity: f32) -> usize {
    let count = map_range(bass, trigger, 255.0, MIN_SPAWN, MAX_SPAWN * sensitivity).round();
    count.clamp(0.0, MAX_BURST as f32) as usize
}

/// Runs one simulation step and draws the result with additive blending.
///
/// The surface is always handed back with normal blending and full opacity.
pub fn draw_beat_particles<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame<'_>,
    state: &mut VisualizerState,
    rng: &mut Rng,
) -> Option<BeatEvent> {
    let sensitivity = frame.sensitivity;
    let bass = bass_level(frame.samples, BASS_BINS);
    let trigger = effective_threshold(sensitivity);

    surface.set_blend_mode(BlendMode::Additive);

    let beat = if bass > trigger && bass > state.beat_threshold {
        Some(explode(frame, state, rng, bass, trigger))
    } else {
        None
    };

    state.beat_threshold = (bass * THRESHOLD_DECAY).max(BEAT_THRESHOLD_FLOOR);

    step_shockwaves(surface, &mut state.shockwaves, sensitivity);
    step_particles(surface, &mut state.particles);

    surface.set_blend_mode(BlendMode::Normal);
    surface.set_global_alpha(1.0);

    beat
}

fn explode(frame: &Frame<'_>, state: &mut VisualizerState, rng: &mut Rng, bass: f32, trigger: f32) -> BeatEvent {
    let sensitivity = frame.sensitivity;
    let origin = Point::new(rng.f32() * frame.width, rng.f32() * frame.height);
    let color = PALETTE[rng.usize(..PALETTE.len())];

    state.shockwaves.push(Shockwave {
        origin,
        radius: 1.0,
        alpha: 1.0,
        color,
    });

    let spawned = spawn_count(bass, trigger, sensitivity);
    for _ in 0..spawned {
        let angle = rng.f32() * TAU;
        let speed = (rng.f32() * 5.0 + 3.0) * sensitivity;
        let size = (rng.f32() * 8.0 + 3.0) * sensitivity;
        let (sin, cos) = angle.sin_cos();
        state.particles.push(Particle {
            position: origin,
            velocity: Point::new(cos * speed, sin * speed),
            life: 1.0,
            max_life: 1.0,
            color,
            size,
        });
    }

    tracing::debug!(bass, trigger, spawned, x = origin.x, y = origin.y, "beat detected");

    BeatEvent {
        origin,
        color,
        bass,
        spawned,
    }
}

fn step_shockwaves<S: Surface + ?Sized>(surface: &mut S, shockwaves: &mut Vec<Shockwave>, sensitivity: f32) {
    for index in (0..shockwaves.len()).rev() {
        let wave = &mut shockwaves[index];
        wave.radius += SHOCKWAVE_GROWTH * sensitivity;
        wave.alpha -= SHOCKWAVE_FADE;

        if is_spent(wave.alpha, SHOCKWAVE_FADE) {
            shockwaves.remove(index);
            continue;
        }

        surface.set_global_alpha(wave.alpha);
        surface.stroke_circle(wave.origin, wave.radius, &Stroke::new(wave.color, SHOCKWAVE_WIDTH));
    }
}

/// Removal uses [`is_spent`] rather than `life <= 0` because repeated f32
/// decrements leave a sliver of life behind on the 50th step.
fn step_particles<S: Surface + ?Sized>(surface: &mut S, particles: &mut Vec<Particle>) {
    for index in (0..particles.len()).rev() {
        let p = &mut particles[index];
        p.position.x += p.velocity.x;
        p.position.y += p.velocity.y;
        p.velocity.x *= PARTICLE_DRAG;
        p.velocity.y *= PARTICLE_DRAG;
        p.life -= PARTICLE_DECAY;

        if is_spent(p.life, PARTICLE_DECAY) {
            particles.remove(index);
            continue;
        }

        surface.set_global_alpha(p.life);
        surface.fill_circle(p.position, p.size * p.life, &p.color.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CommandRecorder, DrawCommand};

    fn bass_buffer(level: u8) -> Vec<u8> {
        let mut samples = vec![0u8; 1024];
        samples[..BASS_BINS].fill(level);
        samples
    }

    fn step(
        surface: &mut CommandRecorder,
        state: &mut VisualizerState,
        rng: &mut Rng,
        samples: &[u8],
        sensitivity: f32,
    ) -> Option<BeatEvent> {
        let frame = Frame {
            width: 800.0,
            height: 600.0,
            samples,
            sensitivity,
        };
        draw_beat_particles(surface, &frame, state, rng)
    }

    #[test]
    fn trigger_drops_with_sensitivity() {
        assert_eq!(effective_threshold(1.0), 170.0);
        assert_eq!(effective_threshold(2.0), 100.0);
        assert_eq!(effective_threshold(0.5), 205.0);
        assert_eq!(effective_threshold(5.0), MIN_TRIGGER);
    }

    #[test]
    fn spawn_count_bounds() {
        assert_eq!(spawn_count(255.0, 80.0, 2.0), 40);
        assert_eq!(spawn_count(255.0, 170.0, 1.0), 20);
        let low = spawn_count(171.0, 170.0, 1.0);
        assert!((8..=20).contains(&low));
        assert_eq!(spawn_count(200.0, 170.0, -1.0), 0);
        assert_eq!(spawn_count(255.0, 80.0, 1e30), MAX_BURST);
        assert_eq!(spawn_count(255.0, 80.0, f32::NAN), 0);
    }

    #[test]
    fn absurd_sensitivity_spawns_a_capped_burst() {
        let mut surface = CommandRecorder::new(800, 600);
        let mut state = VisualizerState::new();
        let mut rng = Rng::with_seed(13);

        let beat = step(&mut surface, &mut state, &mut rng, &bass_buffer(255), 1e30).expect("beat");
        assert_eq!(beat.spawned, MAX_BURST);
        assert_eq!(state.particles.len(), MAX_BURST);
        assert_eq!(state.shockwaves.len(), 1);
        assert_eq!(surface.blend_mode(), BlendMode::Normal);

        step(&mut surface, &mut state, &mut rng, &bass_buffer(0), 1e30);
        assert!(state.particles.len() <= MAX_BURST);
    }

    #[test]
    fn sliver_of_life_is_removed_without_drawing() {
        let mut surface = CommandRecorder::new(800, 600);
        let mut state = VisualizerState::new();
        let mut rng = Rng::with_seed(17);
        state.particles.push(Particle {
            position: Point::default(),
            velocity: Point::default(),
            life: 0.025,
            max_life: 1.0,
            color: PALETTE[3],
            size: 6.0,
        });

        step(&mut surface, &mut state, &mut rng, &bass_buffer(0), 1.0);
        assert!(state.particles.is_empty());
        assert!(!surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FillCircle { .. })));
    }

    #[test]
    fn beat_spawns_one_shockwave_and_a_burst() {
        let mut surface = CommandRecorder::new(800, 600);
        let mut state = VisualizerState::new();
        let mut rng = Rng::with_seed(7);

        let beat = step(&mut surface, &mut state, &mut rng, &bass_buffer(171), 1.0).expect("beat");
        assert_eq!(state.shockwaves.len(), 1);
        assert!((8..=20).contains(&beat.spawned));
        assert_eq!(state.particles.len(), beat.spawned);
        assert!(PALETTE.contains(&beat.color));
        assert!(state.particles.iter().all(|p| p.color == beat.color && p.max_life == 1.0));
        assert!((0.0..800.0).contains(&beat.origin.x));
        assert!((0.0..600.0).contains(&beat.origin.y));
    }

    #[test]
    fn raised_threshold_blocks_retrigger() {
        let mut surface = CommandRecorder::new(800, 600);
        let mut rng = Rng::with_seed(3);
        let mut state = VisualizerState::new();

        assert!(step(&mut surface, &mut state, &mut rng, &bass_buffer(200), 1.0).is_some());
        assert!((state.beat_threshold - 180.0).abs() < 1e-4);
        let cooling = state.clone();

        // Above the fixed trigger but not above the raised threshold.
        assert!(step(&mut surface, &mut state, &mut rng, &bass_buffer(175), 1.0).is_none());
        assert_eq!(state.shockwaves.len(), 1);

        let mut state = cooling;
        assert!(step(&mut surface, &mut state, &mut rng, &bass_buffer(181), 1.0).is_some());
        assert_eq!(state.shockwaves.len(), 2);
    }

    #[test]
    fn threshold_decays_to_floor() {
        let mut surface = CommandRecorder::new(800, 600);
        let mut state = VisualizerState::new();
        let mut rng = Rng::with_seed(3);

        step(&mut surface, &mut state, &mut rng, &bass_buffer(250), 1.0);
        assert!((state.beat_threshold - 225.0).abs() < 1e-4);
        step(&mut surface, &mut state, &mut rng, &bass_buffer(0), 1.0);
        assert_eq!(state.beat_threshold, BEAT_THRESHOLD_FLOOR);
    }

    #[test]
    fn particle_expires_after_fifty_steps() {
        let mut surface = CommandRecorder::new(800, 600);
        let mut state = VisualizerState::new();
        let mut rng = Rng::with_seed(11);
        state.particles.push(Particle {
            position: Point::new(100.0, 100.0),
            velocity: Point::new(4.0, 0.0),
            life: 1.0,
            max_life: 1.0,
            color: PALETTE[0],
            size: 5.0,
        });
        let silence = bass_buffer(0);

        for _ in 0..49 {
            step(&mut surface, &mut state, &mut rng, &silence, 1.0);
        }
        assert_eq!(state.particles.len(), 1);
        let p = &state.particles[0];
        assert!(p.life > 0.0);
        assert!(p.position.x > 100.0 && p.position.x < 150.0);

        surface.take_commands();
        step(&mut surface, &mut state, &mut rng, &silence, 1.0);
        assert!(state.particles.is_empty());
        assert!(!surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FillCircle { .. })));
    }

    #[test]
    fn shockwave_expires_after_twenty_steps() {
        let mut surface = CommandRecorder::new(800, 600);
        let mut state = VisualizerState::new();
        let mut rng = Rng::with_seed(5);
        state.shockwaves.push(Shockwave {
            origin: Point::new(10.0, 10.0),
            radius: 1.0,
            alpha: 1.0,
            color: PALETTE[2],
        });
        let silence = bass_buffer(0);

        for _ in 0..19 {
            step(&mut surface, &mut state, &mut rng, &silence, 1.0);
        }
        assert_eq!(state.shockwaves.len(), 1);
        assert!((state.shockwaves[0].radius - 96.0).abs() < 1e-3);

        step(&mut surface, &mut state, &mut rng, &silence, 1.0);
        assert!(state.shockwaves.is_empty());
    }

    #[test]
    fn particles_shrink_and_fade_with_life() {
        let mut surface = CommandRecorder::new(800, 600);
        let mut state = VisualizerState::new();
        let mut rng = Rng::with_seed(5);
        state.particles.push(Particle {
            position: Point::default(),
            velocity: Point::default(),
            life: 0.5,
            max_life: 1.0,
            color: PALETTE[1],
            size: 10.0,
        });

        step(&mut surface, &mut state, &mut rng, &bass_buffer(0), 1.0);
        let drawn = surface.commands().iter().find_map(|c| match c {
            DrawCommand::FillCircle { radius, alpha, blend, .. } => Some((*radius, *alpha, *blend)),
            _ => None,
        });
        let (radius, alpha, blend) = drawn.expect("particle drawn");
        assert!((radius - 4.8).abs() < 1e-4);
        assert!((alpha - 0.48).abs() < 1e-6);
        assert_eq!(blend, BlendMode::Additive);
    }

    #[test]
    fn restores_blend_state_even_when_idle() {
        let mut surface = CommandRecorder::new(800, 600);
        let mut state = VisualizerState::new();
        let mut rng = Rng::with_seed(5);

        step(&mut surface, &mut state, &mut rng, &[], 1.0);
        assert_eq!(surface.blend_mode(), BlendMode::Normal);
        assert_eq!(surface.global_alpha(), 1.0);

        step(&mut surface, &mut state, &mut rng, &bass_buffer(255), 1.0);
        assert_eq!(surface.blend_mode(), BlendMode::Normal);
        assert_eq!(surface.global_alpha(), 1.0);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let run = |seed| {
            let mut surface = CommandRecorder::new(800, 600);
            let mut state = VisualizerState::new();
            let mut rng = Rng::with_seed(seed);
            step(&mut surface, &mut state, &mut rng, &bass_buffer(240), 1.5);
            state
        };
        assert_eq!(run(42), run(42));
    }
}
