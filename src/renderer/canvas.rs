//! `DrawContext` over a browser 2D canvas context

use glam::Vec2;
use std::f64::consts::TAU;
use web_sys::CanvasRenderingContext2d;

use super::{Color, DrawContext};

/// Thin wrapper that forwards to `CanvasRenderingContext2d`
pub struct CanvasContext {
    ctx: CanvasRenderingContext2d,
}

impl CanvasContext {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        // arc() only fails on a negative radius
        if let Err(e) = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            TAU,
        ) {
            log::warn!("arc failed: {:?}", e);
        }
    }
}

impl DrawContext for CanvasContext {
    fn set_scale(&mut self, scale: f32) {
        let s = scale as f64;
        if let Err(e) = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0) {
            log::warn!("set_transform failed: {:?}", e);
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.clear_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(color);
        self.circle_path(center, radius);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width as f64);
        self.circle_path(center, radius);
        self.ctx.stroke();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, line_width: f32) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.stroke();
    }
}
