use crate::surface::{Point, Rgba, Stroke, Surface};

use super::Frame;

const LINE_COLOR: Rgba = Rgba::hex(0x22d3ee);
const LINE_WIDTH: f32 = 3.0;
const GLOW_BLUR: f32 = 10.0;

/// Points of the oscilloscope trace, ending on the midline at the right edge.
///
/// 128 sits on the midline and the full byte range spans the whole height.
pub fn wave_points(width: f32, height: f32, samples: &[u8]) -> Vec<Point> {
    if samples.is_empty() {
        return Vec::new();
    }

    let slice_width = width / samples.len() as f32;
    let mut points = Vec::with_capacity(samples.len() + 1);
    for (index, &value) in samples.iter().enumerate() {
        let v = f32::from(value) / 128.0;
        points.push(Point::new(index as f32 * slice_width, v * height / 2.0));
    }
    points.push(Point::new(width, height / 2.0));
    points
}

/// Time-domain trace drawn as a single glowing line strip.
pub fn draw_wave<S: Surface + ?Sized>(surface: &mut S, frame: &Frame<'_>) {
    let points = wave_points(frame.width, frame.height, frame.samples);
    if points.is_empty() {
        return;
    }

    let stroke = Stroke::new(LINE_COLOR, LINE_WIDTH).glow(GLOW_BLUR, LINE_COLOR);
    surface.stroke_polyline(&points, false, &stroke);
}
