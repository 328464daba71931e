use serde::Serialize;

use super::{BlendMode, CornerRadii, Paint, Point, Rect, Stroke, Surface};

/// A single call captured by [`CommandRecorder`].
///
/// Draw commands carry the global alpha and blend mode that were active when
/// they were issued so a frame can be inspected without replaying it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    FillRect {
        rect: Rect,
        paint: Paint,
        alpha: f32,
        blend: BlendMode,
    },
    FillRoundRect {
        rect: Rect,
        radii: CornerRadii,
        paint: Paint,
        alpha: f32,
        blend: BlendMode,
    },
    FillCircle {
        center: Point,
        radius: f32,
        paint: Paint,
        alpha: f32,
        blend: BlendMode,
    },
    StrokeCircle {
        center: Point,
        radius: f32,
        stroke: Stroke,
        alpha: f32,
        blend: BlendMode,
    },
    StrokeLine {
        from: Point,
        to: Point,
        stroke: Stroke,
        alpha: f32,
        blend: BlendMode,
    },
    StrokePolyline {
        points: Vec<Point>,
        closed: bool,
        stroke: Stroke,
        alpha: f32,
        blend: BlendMode,
    },
    SetGlobalAlpha { alpha: f32 },
    SetBlendMode { blend: BlendMode },
    Save,
    Restore,
    Translate { dx: f32, dy: f32 },
    Scale { factor: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawState {
    alpha: f32,
    blend: BlendMode,
    offset: Point,
    scale: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            blend: BlendMode::Normal,
            offset: Point::default(),
            scale: 1.0,
        }
    }
}

/// Headless [`Surface`] that records every call instead of rasterising.
///
/// Used by the command line runner and by tests to assert on exactly what a
/// frame asked the backend to draw.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl CommandRecorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Changes the reported size. Takes effect on the next `size()` query.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the recorded commands, keeping the drawing state.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn global_alpha(&self) -> f32 {
        self.state.alpha
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.state.blend
    }

    /// Number of unmatched `save` calls.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Current translation and uniform scale.
    pub fn transform(&self) -> (Point, f32) {
        (self.state.offset, self.state.scale)
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Surface for CommandRecorder {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let (alpha, blend) = (self.state.alpha, self.state.blend);
        self.push(DrawCommand::FillRect {
            rect,
            paint: paint.clone(),
            alpha,
            blend,
        });
    }

    fn fill_round_rect(&mut self, rect: Rect, radii: CornerRadii, paint: &Paint) {
        let (alpha, blend) = (self.state.alpha, self.state.blend);
        self.push(DrawCommand::FillRoundRect {
            rect,
            radii,
            paint: paint.clone(),
            alpha,
            blend,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        let (alpha, blend) = (self.state.alpha, self.state.blend);
        self.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
            alpha,
            blend,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke) {
        let (alpha, blend) = (self.state.alpha, self.state.blend);
        self.push(DrawCommand::StrokeCircle {
            center,
            radius,
            stroke: stroke.clone(),
            alpha,
            blend,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let (alpha, blend) = (self.state.alpha, self.state.blend);
        self.push(DrawCommand::StrokeLine {
            from,
            to,
            stroke: stroke.clone(),
            alpha,
            blend,
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], closed: bool, stroke: &Stroke) {
        let (alpha, blend) = (self.state.alpha, self.state.blend);
        self.push(DrawCommand::StrokePolyline {
            points: points.to_vec(),
            closed,
            stroke: stroke.clone(),
            alpha,
            blend,
        });
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
        self.push(DrawCommand::SetGlobalAlpha { alpha });
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend = mode;
        self.push(DrawCommand::SetBlendMode { blend: mode });
    }

    fn save(&mut self) {
        self.stack.push(self.state);
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.state = previous;
        }
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        let scale = self.state.scale;
        self.state.offset.x += dx * scale;
        self.state.offset.y += dy * scale;
        self.push(DrawCommand::Translate { dx, dy });
    }

    fn scale(&mut self, factor: f32) {
        self.state.scale *= factor;
        self.push(DrawCommand::Scale { factor });
    }
}
