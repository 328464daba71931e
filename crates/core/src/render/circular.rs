use std::f32::consts::TAU;

use crate::{
    mapping::map_range,
    surface::{ColorStop, Gradient, Point, Rgba, Stroke, Surface},
};

use super::sample;

/// Angular steps drawn regardless of buffer length.
pub const CIRCULAR_STEPS: usize = 180;

const RING_FRACTION: f32 = 0.4;
const REACH_FRACTION: f32 = 0.5;
const RING_COLOR: Rgba = Rgba::new(255, 255, 255, 0.1);
const SPOKE_WIDTH: f32 = 4.0;
const SPOKE_STOPS: [ColorStop; 2] = [
    ColorStop::new(0.0, Rgba::hex(0x6366f1)),
    ColorStop::new(1.0, Rgba::hex(0xa855f7)),
];

/// Radial spectrum: a faint reference ring with one spoke per angular step.
pub fn draw_circular<S: Surface + ?Sized>(surface: &mut S, cx: f32, cy: f32, samples: &[u8]) {
    let half_min = cx.min(cy);
    let radius = half_min * RING_FRACTION;
    let center = Point::new(cx, cy);

    surface.stroke_circle(center, radius, &Stroke::new(RING_COLOR, 1.0));

    let stride = samples.len() / CIRCULAR_STEPS;
    for step in 0..CIRCULAR_STEPS {
        let value = sample(samples, step * stride);
        let angle = map_range(step as f32, 0.0, CIRCULAR_STEPS as f32, 0.0, TAU);
        let length = map_range(value, 0.0, 255.0, 0.0, half_min * REACH_FRACTION);
        let (sin, cos) = angle.sin_cos();

        let inner = Point::new(cx + cos * radius, cy + sin * radius);
        let outer = Point::new(cx + cos * (radius + length), cy + sin * (radius + length));
        let stroke = Stroke::new(Gradient::linear(inner, outer, &SPOKE_STOPS), SPOKE_WIDTH).round_cap();
        surface.stroke_line(inner, outer, &stroke);
    }
}
