use std::f32::consts::TAU;

use crate::{
    mapping::map_range,
    surface::{ColorStop, Gradient, Point, Rgba, Stroke, Surface},
};

use super::{bass_level, sample};

const BASS_BINS: usize = 20;
const GLOW_INNER: f32 = 10.0;
const GLOW_RADIUS: f32 = 150.0;
const WIRE_STRIDE: usize = 10;
const WIRE_BASE_RADIUS: f32 = 80.0;
const WIRE_REACH: f32 = 40.0;
const WIRE_COLOR: Rgba = Rgba::new(255, 255, 255, 0.6);

const GLOW_STOPS: [ColorStop; 4] = [
    ColorStop::new(0.0, Rgba::new(255, 255, 255, 0.8)),
    ColorStop::new(0.2, Rgba::new(236, 72, 153, 0.6)),
    ColorStop::new(0.5, Rgba::new(99, 102, 241, 0.3)),
    ColorStop::new(1.0, Rgba::TRANSPARENT),
];

/// Uniform scale applied to the orb for a given bass level.
pub fn orb_scale(bass: f32, sensitivity: f32) -> f32 {
    map_range(bass, 0.0, 255.0, 0.8, 1.4 * sensitivity)
}

/// A glowing orb that swells with the bass, wrapped in a wireframe outline
/// traced from every tenth bin.
pub fn draw_orb<S: Surface + ?Sized>(surface: &mut S, cx: f32, cy: f32, samples: &[u8], sensitivity: f32) {
    let scale = orb_scale(bass_level(samples, BASS_BINS), sensitivity);

    surface.save();
    surface.translate(cx, cy);
    surface.scale(scale);

    let origin = Point::new(0.0, 0.0);
    let glow = Gradient::radial(origin, GLOW_INNER, GLOW_RADIUS, &GLOW_STOPS);
    surface.fill_circle(origin, GLOW_RADIUS, &glow.into());

    let len = samples.len();
    let outline: Vec<Point> = (0..len)
        .step_by(WIRE_STRIDE)
        .map(|index| {
            let angle = map_range(index as f32, 0.0, len as f32, 0.0, TAU);
            let reach = map_range(sample(samples, index), 0.0, 255.0, 0.0, WIRE_REACH * sensitivity);
            let r = WIRE_BASE_RADIUS + reach;
            let (sin, cos) = angle.sin_cos();
            Point::new(cos * r, sin * r)
        })
        .collect();

    if !outline.is_empty() {
        surface.stroke_polyline(&outline, true, &Stroke::new(WIRE_COLOR, 2.0));
    }

    surface.restore();
}
