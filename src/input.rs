//! Normalized player intent
//!
//! `InputState` is the only thing a simulation sees of the player. It is a
//! level snapshot (what is held right now), never a queue of events. The
//! adapter functions here translate keyboard codes and a single pointer into
//! that snapshot; the browser host calls them from its DOM listeners.

use serde::{Deserialize, Serialize};

/// Five independent intent flags, the union of keyboard and pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Space / tap
    pub action: bool,
}

impl InputState {
    /// Apply a `KeyboardEvent.code` press or release.
    ///
    /// Returns false for keys the games don't use, so the host can leave
    /// those events alone.
    pub fn apply_key(&mut self, code: &str, pressed: bool) -> bool {
        let slot = match code {
            "ArrowLeft" | "KeyA" => &mut self.left,
            "ArrowRight" | "KeyD" => &mut self.right,
            "ArrowUp" | "KeyW" => &mut self.up,
            "ArrowDown" | "KeyS" => &mut self.down,
            "Space" => &mut self.action,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Pointer contact at (`x`, `y`) relative to a surface of `width` x `height`.
    ///
    /// Sets action and splits the surface into halves for the directional
    /// flags, so a tap on the left half steers left, and so on.
    pub fn pointer_down(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let mid_x = width / 2.0;
        let mid_y = height / 2.0;
        self.action = true;
        self.left = x < mid_x;
        self.right = x >= mid_x;
        self.up = y < mid_y;
        self.down = y >= mid_y;
    }

    /// Pointer released or cancelled: clears every flag.
    pub fn pointer_up(&mut self) {
        *self = Self::default();
    }
}
