//! State shared by every simulation variant
//!
//! Each variant owns one `Playthrough`: the score, the Running/Ended flag and
//! the queue of events waiting to be forwarded to the host.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HostError;

/// Random source injected into every simulation
pub type SimRng = Pcg32;

/// Build the simulation RNG for a run seed
pub fn seeded_rng(seed: u64) -> SimRng {
    Pcg32::seed_from_u64(seed)
}

/// The five hosted games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum GameKind {
    #[default]
    Runner,
    Paddle,
    Flappy,
    Snake,
    Asteroids,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Runner,
        GameKind::Paddle,
        GameKind::Flappy,
        GameKind::Snake,
        GameKind::Asteroids,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Runner => "runner",
            GameKind::Paddle => "paddle",
            GameKind::Flappy => "flappy",
            GameKind::Snake => "snake",
            GameKind::Asteroids => "asteroids",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "runner" => Some(GameKind::Runner),
            "paddle" | "breakout" => Some(GameKind::Paddle),
            "flappy" => Some(GameKind::Flappy),
            "snake" => Some(GameKind::Snake),
            "asteroids" => Some(GameKind::Asteroids),
            _ => None,
        }
    }

    /// Default title shown above the canvas
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Runner => "Runner",
            GameKind::Paddle => "Paddle",
            GameKind::Flappy => "Flappy",
            GameKind::Snake => "Snake",
            GameKind::Asteroids => "Asteroids",
        }
    }
}

/// Options JSON goes through the same lenient parse as `data-game`
impl TryFrom<String> for GameKind {
    type Error = HostError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        GameKind::from_name(&name).ok_or(HostError::UnknownGame(name))
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outside-visible effects of an `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Externally visible score changed
    ScoreChanged { score: u64 },
    /// Playthrough ended, with the final score (bonuses included)
    GameOver { score: u64 },
}

/// Score, termination flag and pending events for one playthrough
#[derive(Debug, Clone, Default)]
pub struct Playthrough {
    score: u64,
    over: bool,
    events: Vec<GameEvent>,
}

impl Playthrough {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Award points; ignored once the playthrough has ended
    pub fn add_score(&mut self, points: u64) {
        if self.over || points == 0 {
            return;
        }
        self.score += points;
        self.events.push(GameEvent::ScoreChanged { score: self.score });
    }

    /// Raise the score to `score` if it is higher (never lowers it)
    pub fn raise_score_to(&mut self, score: u64) {
        if score > self.score {
            self.add_score(score - self.score);
        }
    }

    /// Transition Running -> Ended. Returns false if already Ended, in which
    /// case nothing is emitted.
    pub fn finish(&mut self) -> bool {
        if self.over {
            return false;
        }
        self.over = true;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!("Game over, final score {}", self.score);
        true
    }

    /// Hand pending events to the caller
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fresh Running playthrough
    pub fn reset(&mut self) {
        self.score = 0;
        self.over = false;
        self.events.clear();
    }
}
