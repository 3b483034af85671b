//! Mini Arcade - five canvas mini-games behind one loop driver
//!
//! Core modules:
//! - `sim`: Lifecycle contract and the five game simulations
//! - `driver`: Frame clock, dt clamping, event forwarding
//! - `renderer`: Abstract 2D drawing surface (canvas on web, recorder elsewhere)
//! - `input`: Keyboard/pointer to neutral input adapter
//! - `settings`: Host options and rebuild identity
//! - `web`: Browser host (requestAnimationFrame, listeners)

pub mod driver;
pub mod error;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::{FrameClock, LoopDriver, ScoreBridge, clamp_dt};
pub use error::HostError;
pub use highscores::HighScore;
pub use input::InputState;
pub use renderer::{DrawContext, Size};
pub use settings::{GameIdentity, GameOptions, OptionsChange};
pub use sim::{GameEvent, GameKind, Lifecycle, MiniGame};

/// Host configuration constants
pub mod consts {
    /// Default logical surface size (CSS pixels)
    pub const DEFAULT_WIDTH: f32 = 320.0;
    pub const DEFAULT_HEIGHT: f32 = 180.0;

    /// Longest step a single frame may simulate (seconds). Tab switches and
    /// stalls are absorbed instead of tunnelling entities.
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Canvas element the browser host attaches to
    pub const CANVAS_ID: &str = "canvas";
}
