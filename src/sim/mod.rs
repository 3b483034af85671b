//! Simulation module
//!
//! All gameplay logic lives here. Each game is an independent state machine
//! that owns its entities, timers and RNG:
//! - Seeded RNG only (injected through the constructor)
//! - No platform or rendering dependencies beyond `DrawContext`
//! - No state shared between instances

pub mod asteroids;
pub mod flappy;
pub mod lifecycle;
pub mod paddle;
pub mod runner;
pub mod snake;
pub mod state;

pub use asteroids::AsteroidsSim;
pub use flappy::FlappySim;
pub use lifecycle::{Lifecycle, MiniGame};
pub use paddle::PaddleSim;
pub use runner::RunnerSim;
pub use snake::{Cell, Direction, SnakeSim};
pub use state::{GameEvent, GameKind, Playthrough, SimRng, seeded_rng};
