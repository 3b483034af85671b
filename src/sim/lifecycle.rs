//! The lifecycle contract and the closed set of games behind it

use super::asteroids::AsteroidsSim;
use super::flappy::FlappySim;
use super::paddle::PaddleSim;
use super::runner::RunnerSim;
use super::snake::SnakeSim;
use super::state::{GameEvent, GameKind};
use crate::input::InputState;
use crate::renderer::{DrawContext, Size};

/// Everything the loop driver knows about a game.
///
/// A simulation is either Running or Ended. `update` while Ended does
/// nothing; `reset` always returns to a fresh Running playthrough.
pub trait Lifecycle {
    /// (Re)configure for a surface size and start a fresh playthrough.
    /// Recomputes every size-dependent constant.
    fn init(&mut self, size: Size);

    /// Advance by `dt` seconds under `input`
    fn update(&mut self, dt: f32, input: &InputState);

    /// Render current state; never mutates the simulation
    fn draw(&self, ctx: &mut dyn DrawContext);

    /// Discard the playthrough and start over at the last known size
    fn reset(&mut self);

    /// Externally visible score
    fn score(&self) -> u64;

    fn is_game_over(&self) -> bool;

    /// Score/game-over events raised since the last call
    fn take_events(&mut self) -> Vec<GameEvent>;
}

/// One of the five games
#[derive(Debug, Clone)]
pub enum MiniGame {
    Runner(RunnerSim),
    Paddle(PaddleSim),
    Flappy(FlappySim),
    Snake(SnakeSim),
    Asteroids(AsteroidsSim),
}

macro_rules! dispatch {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            MiniGame::Runner($g) => $body,
            MiniGame::Paddle($g) => $body,
            MiniGame::Flappy($g) => $body,
            MiniGame::Snake($g) => $body,
            MiniGame::Asteroids($g) => $body,
        }
    };
}

impl MiniGame {
    /// Build the simulation for `kind`, seeded for reproducibility
    pub fn new(kind: GameKind, size: Size, seed: u64) -> Self {
        log::info!(
            "Creating {} at {}x{} (seed {})",
            kind,
            size.w,
            size.h,
            seed
        );
        match kind {
            GameKind::Runner => MiniGame::Runner(RunnerSim::new(size, seed)),
            GameKind::Paddle => MiniGame::Paddle(PaddleSim::new(size, seed)),
            GameKind::Flappy => MiniGame::Flappy(FlappySim::new(size, seed)),
            GameKind::Snake => MiniGame::Snake(SnakeSim::new(size, seed)),
            GameKind::Asteroids => MiniGame::Asteroids(AsteroidsSim::new(size, seed)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            MiniGame::Runner(_) => GameKind::Runner,
            MiniGame::Paddle(_) => GameKind::Paddle,
            MiniGame::Flappy(_) => GameKind::Flappy,
            MiniGame::Snake(_) => GameKind::Snake,
            MiniGame::Asteroids(_) => GameKind::Asteroids,
        }
    }
}

impl Lifecycle for MiniGame {
    fn init(&mut self, size: Size) {
        dispatch!(self, g => g.init(size))
    }

    fn update(&mut self, dt: f32, input: &InputState) {
        dispatch!(self, g => g.update(dt, input))
    }

    fn draw(&self, ctx: &mut dyn DrawContext) {
        dispatch!(self, g => g.draw(ctx))
    }

    fn reset(&mut self) {
        dispatch!(self, g => g.reset())
    }

    fn score(&self) -> u64 {
        dispatch!(self, g => g.score())
    }

    fn is_game_over(&self) -> bool {
        dispatch!(self, g => g.is_game_over())
    }

    fn take_events(&mut self) -> Vec<GameEvent> {
        dispatch!(self, g => g.take_events())
    }
}
