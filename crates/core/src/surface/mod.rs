//! Immediate-mode 2D drawing contract consumed by the renderers.
//!
//! The shape of the trait follows what a canvas-like backend offers: filled
//! and stroked primitives, linear/radial gradients, a global alpha, a blend
//! toggle and a save/restore transform stack limited to translation and
//! uniform scale.

mod recorder;

use serde::{Deserialize, Serialize};

pub use recorder::{CommandRecorder, DrawCommand};

/// 8-bit RGB colour with a floating point alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 1.0)
    }
}

/// Hue/saturation/lightness colour. Hue is in degrees, the rest in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    pub fn to_rgba(self) -> Rgba {
        let h = self.h.rem_euclid(360.0) / 60.0;
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba::new(channel(r), channel(g), channel(b), self.a.clamp(0.0, 1.0))
    }
}

impl From<Hsla> for Rgba {
    fn from(value: Hsla) -> Self {
        value.to_rgba()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Per-corner radii, clockwise from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii(pub [f32; 4]);

impl CornerRadii {
    /// Rounds only the two top corners.
    pub const fn top(radius: f32) -> Self {
        Self([radius, radius, 0.0, 0.0])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gradient {
    Linear {
        start: Point,
        end: Point,
        stops: Vec<ColorStop>,
    },
    Radial {
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        stops: Vec<ColorStop>,
    },
}

impl Gradient {
    pub fn linear(start: Point, end: Point, stops: &[ColorStop]) -> Self {
        Self::Linear {
            start,
            end,
            stops: stops.to_vec(),
        }
    }

    pub fn radial(center: Point, inner_radius: f32, outer_radius: f32, stops: &[ColorStop]) -> Self {
        Self::Radial {
            center,
            inner_radius,
            outer_radius,
            stops: stops.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    Solid(Rgba),
    Gradient(Gradient),
}

impl From<Rgba> for Paint {
    fn from(value: Rgba) -> Self {
        Self::Solid(value)
    }
}

impl From<Gradient> for Paint {
    fn from(value: Gradient) -> Self {
        Self::Gradient(value)
    }
}

/// Soft shadow drawn behind a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub blur: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
    pub round_cap: bool,
    pub glow: Option<Glow>,
}

impl Stroke {
    pub fn new(paint: impl Into<Paint>, width: f32) -> Self {
        Self {
            paint: paint.into(),
            width,
            round_cap: false,
            glow: None,
        }
    }

    pub fn round_cap(mut self) -> Self {
        self.round_cap = true;
        self
    }

    pub fn glow(mut self, blur: f32, color: Rgba) -> Self {
        self.glow = Some(Glow { blur, color });
        self
    }
}

/// Compositing mode applied to subsequent draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Source-over compositing.
    #[default]
    Normal,
    /// Colours add up ("lighter"), used for glowing particles.
    Additive,
}

/// Drawing surface the renderers issue their commands against.
///
/// `save`/`restore` cover the transform, global alpha and blend mode.
pub trait Surface {
    /// Current pixel dimensions. May change between frames.
    fn size(&self) -> (u32, u32);

    /// Resets every pixel to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    fn fill_round_rect(&mut self, rect: Rect, radii: CornerRadii, paint: &Paint);

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke);

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    /// Strokes a connected strip through `points`, closing it into a polygon
    /// when `closed` is set.
    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: &Stroke);

    fn set_global_alpha(&mut self, alpha: f32);

    fn set_blend_mode(&mut self, mode: BlendMode);

    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn scale(&mut self, factor: f32);
}
