//! Drawing surface abstraction
//!
//! Simulations draw through `DrawContext` in logical pixels (top-left origin,
//! x right, y down). The host owns the real surface and applies the device
//! pixel ratio once as a uniform scale, so no game code ever sees physical
//! pixels.

pub mod recorder;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use recorder::{CommandRecorder, DrawCommand};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasContext;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// CSS color string (`#rrggbb`)
pub type Color = &'static str;

/// Logical surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    /// Smallest accepted extent per axis
    pub const MIN_EXTENT: f32 = 1.0;

    /// Create a size, clamping each axis to at least one logical pixel.
    /// Non-finite values collapse to the minimum as well.
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            w: clamp_extent(w),
            h: clamp_extent(h),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

fn clamp_extent(v: f32) -> f32 {
    if v.is_finite() {
        v.max(Size::MIN_EXTENT)
    } else {
        Size::MIN_EXTENT
    }
}

/// Backing-store resolution for a logical size at a given pixel ratio
pub fn backing_size(size: Size, device_pixel_ratio: f32) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    (
        (size.w * dpr).floor() as u32,
        (size.h * dpr).floor() as u32,
    )
}

/// Abstract 2D drawing capability consumed by the simulations
pub trait DrawContext {
    /// Replace the current transform with a uniform scale
    fn set_scale(&mut self, scale: f32);

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32);

    /// Closed outline through `points`
    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, line_width: f32);
}
