//! Headless `DrawContext` that records every call
//!
//! Used by the native binary and by tests that need to see what a frame
//! would have drawn without a browser.

use glam::Vec2;

use super::{Color, DrawContext};

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetScale(f32),
    Clear { x: f32, y: f32, w: f32, h: f32 },
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color },
    StrokeLine { from: Vec2, to: Vec2, color: Color },
    StrokePolygon { points: Vec<Vec2>, color: Color },
}

/// Records draw calls in order
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
    /// Scale most recently applied via `set_scale`
    pub scale: f32,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            scale: 1.0,
        }
    }

    /// Drop recorded commands (keeps the current scale)
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Count of commands drawn with the given color
    pub fn count_color(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| match c {
                DrawCommand::FillRect { color: c, .. }
                | DrawCommand::FillCircle { color: c, .. }
                | DrawCommand::StrokeCircle { color: c, .. }
                | DrawCommand::StrokeLine { color: c, .. }
                | DrawCommand::StrokePolygon { color: c, .. } => *c == color,
                _ => false,
            })
            .count()
    }
}

impl DrawContext for CommandRecorder {
    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.commands.push(DrawCommand::SetScale(scale));
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::Clear { x, y, w, h });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, _line_width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, _line_width: f32) {
        self.commands.push(DrawCommand::StrokeLine { from, to, color });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, _line_width: f32) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            color,
        });
    }
}
