//! Host configuration
//!
//! What the embedding page asks for: which game, how big, at what pixel
//! density, and the HUD chrome around it. Read from the canvas element's
//! `data-options` JSON in the browser, built directly on native.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::HostError;
use crate::renderer::Size;
use crate::sim::GameKind;

/// Hint shown under the canvas
pub const CONTROLS_HINT: &str = "Arrow keys or tap";

/// Options for one embedded game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameOptions {
    pub game: GameKind,
    /// Logical width in CSS pixels
    pub width: f32,
    /// Logical height in CSS pixels
    pub height: f32,
    pub device_pixel_ratio: f32,
    /// LocalStorage key for the best score; no tracking when absent
    pub high_score_key: Option<String>,
    pub title: Option<String>,
    pub show_hud: bool,
    pub show_controls_hint: bool,
    /// Fixed RNG seed; the host derives one from the clock when absent
    pub seed: Option<u64>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            game: GameKind::Runner,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            device_pixel_ratio: 1.0,
            high_score_key: None,
            title: None,
            show_hud: true,
            show_controls_hint: true,
            seed: None,
        }
    }
}

/// How a running host has to react to new options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionsChange {
    /// Identical options
    Unchanged,
    /// Only chrome (title, HUD toggles, seed) differs
    InPlace,
    /// Only the logical size differs: re-init the same game at `Size`
    Resize(Size),
    /// Game, pixel ratio or high-score key differs: new simulation
    Rebuild,
}

/// The parameters that define a simulation instance. When any of them
/// changes the instance is thrown away and rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct GameIdentity {
    pub game: GameKind,
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
    pub high_score_key: Option<String>,
}

impl GameOptions {
    pub fn for_game(game: GameKind) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }

    /// Parse options JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, HostError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Logical surface size, clamped to at least 1x1
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Pixel ratio, falling back to 1 for nonsense values
    pub fn effective_device_pixel_ratio(&self) -> f32 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.game.title())
    }

    pub fn identity(&self) -> GameIdentity {
        GameIdentity {
            game: self.game,
            width: self.width,
            height: self.height,
            device_pixel_ratio: self.device_pixel_ratio,
            high_score_key: self.high_score_key.clone(),
        }
    }

    /// True if switching from `self` to `other` needs a new simulation
    pub fn needs_rebuild(&self, other: &GameOptions) -> bool {
        self.identity() != other.identity()
    }

    /// Classify the switch from the running `self` to `next`.
    ///
    /// A size-only change keeps the host and re-runs `init` at the new size,
    /// which is the same as a rebuild for the simulation.
    pub fn change_to(&self, next: &GameOptions) -> OptionsChange {
        let (a, b) = (self.identity(), next.identity());
        if a.game != b.game
            || a.device_pixel_ratio != b.device_pixel_ratio
            || a.high_score_key != b.high_score_key
        {
            OptionsChange::Rebuild
        } else if self.size() != next.size() {
            OptionsChange::Resize(next.size())
        } else if self != next {
            OptionsChange::InPlace
        } else {
            OptionsChange::Unchanged
        }
    }
}
