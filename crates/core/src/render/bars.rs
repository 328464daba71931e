use crate::surface::{ColorStop, CornerRadii, Gradient, Paint, Point, Rect, Rgba, Surface};

use super::Frame;

const BAR_WIDTH_FACTOR: f32 = 2.5;
const BAR_GAP: f32 = 2.0;
const HEIGHT_FRACTION: f32 = 0.8;
const CORNER_RADIUS: f32 = 4.0;
const HIGHLIGHT_HEIGHT: f32 = 2.0;

const BAR_STOPS: [ColorStop; 3] = [
    ColorStop::new(0.0, Rgba::hex(0x3b82f6)),
    ColorStop::new(0.5, Rgba::hex(0x8b5cf6)),
    ColorStop::new(1.0, Rgba::hex(0xec4899)),
];
const HIGHLIGHT: Rgba = Rgba::new(255, 255, 255, 0.1);

/// Height of the bar for one sample on a surface `surface_height` tall.
pub fn bar_height(value: u8, surface_height: f32) -> f32 {
    f32::from(value) / 255.0 * surface_height * HEIGHT_FRACTION
}

/// Classic spectrum: one gradient bar per bin, left to right.
///
/// Bars are 2.5x the even share of the width, so with large buffers only the
/// low bins fit on screen. Bars that start past the right edge or have no
/// height are skipped.
pub fn draw_bars<S: Surface + ?Sized>(surface: &mut S, frame: &Frame<'_>) {
    let Frame { width, height, samples, .. } = *frame;
    if samples.is_empty() {
        return;
    }

    let bar_width = width / samples.len() as f32 * BAR_WIDTH_FACTOR;
    let highlight: Paint = HIGHLIGHT.into();
    let mut x = 0.0;

    for &value in samples {
        if x >= width {
            break;
        }

        let h = bar_height(value, height);
        if h > 0.0 {
            let top = height - h;
            let gradient = Gradient::linear(Point::new(0.0, height), Point::new(0.0, top), &BAR_STOPS);
            surface.fill_round_rect(
                Rect::new(x, top, bar_width, h),
                CornerRadii::top(CORNER_RADIUS),
                &gradient.into(),
            );
            surface.fill_rect(Rect::new(x, top, bar_width, HIGHLIGHT_HEIGHT), &highlight);
        }

        x += bar_width + BAR_GAP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CommandRecorder, DrawCommand};

    fn render(samples: &[u8], width: f32, height: f32) -> Vec<DrawCommand> {
        let mut surface = CommandRecorder::new(width as u32, height as u32);
        let frame = Frame {
            width,
            height,
            samples,
            sensitivity: 1.0,
        };
        draw_bars(&mut surface, &frame);
        surface.take_commands()
    }

    #[test]
    fn silent_buffer_has_no_bars() {
        assert!(render(&[0; 1024], 800.0, 600.0).is_empty());
        assert_eq!(bar_height(0, 600.0), 0.0);
    }

    #[test]
    fn full_scale_bars_reach_eighty_percent() {
        assert!((bar_height(255, 600.0) - 480.0).abs() < 1e-3);

        let commands = render(&[255; 16], 160.0, 100.0);
        let bars: Vec<_> = commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillRoundRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert!(!bars.is_empty());
        for rect in bars {
            assert!((rect.height - 80.0).abs() < 1e-3);
            assert!((rect.y - 20.0).abs() < 1e-3);
            assert!((rect.width - 25.0).abs() < 1e-3);
        }
    }

    #[test]
    fn every_bar_gets_a_highlight_strip() {
        let commands = render(&[128, 0, 64, 255, 90, 90, 90, 90, 90, 90], 1000.0, 100.0);
        let fills = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRoundRect { .. }))
            .count();
        let strips = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { rect, .. } if rect.height == HIGHLIGHT_HEIGHT))
            .count();
        assert_eq!(fills, 3);
        assert_eq!(strips, 3);
    }

    #[test]
    fn stops_at_the_right_edge() {
        // 2.5x width plus gaps: only the first few of 8 bars start on screen.
        let commands = render(&[200; 8], 80.0, 50.0);
        let fills = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRoundRect { .. }))
            .count();
        assert_eq!(fills, 3);
    }
}
