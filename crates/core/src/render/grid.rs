use crate::{
    mapping::map_range,
    surface::{Hsla, Point, Rgba, Surface},
};

use super::{sample, Frame};

pub const GRID_ROWS: usize = 20;
pub const GRID_COLS: usize = 40;
const NOISE_FLOOR: f32 = 50.0;

/// Fixed grid of dots. Each cell maps to one bin; cells whose bin is above the
/// noise floor get a dot sized and tinted by the level.
///
/// Nothing is kept between frames. Trails come from the dispatcher's
/// translucent fill.
pub fn draw_grid_particles<S: Surface + ?Sized>(surface: &mut S, frame: &Frame<'_>) {
    let Frame { width, height, samples, .. } = *frame;
    let cell_w = width / GRID_COLS as f32;
    let cell_h = height / GRID_ROWS as f32;
    let cells = (GRID_ROWS * GRID_COLS) as f32;

    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            let flat = (col + row * GRID_COLS) as f32;
            let index = map_range(flat, 0.0, cells, 0.0, samples.len() as f32).floor() as usize;
            let value = sample(samples, index);
            if value <= NOISE_FLOOR {
                continue;
            }

            let center = Point::new(col as f32 * cell_w + cell_w / 2.0, row as f32 * cell_h + cell_h / 2.0);
            let size = map_range(value, 0.0, 255.0, 1.0, cell_h * 0.8);
            let color: Rgba = Hsla::new((index % 360) as f32, 0.7, 0.6, value / 255.0).into();
            surface.fill_circle(center, size / 2.0, &color.into());
        }
    }
}
