//! Endless runner
//!
//! The player sits at a fixed x and only moves vertically (jump + gravity).
//! Obstacles scroll in from the right at a shared speed that ramps up over
//! time. Score is distance-based and accrues continuously.

use rand::Rng;

use super::lifecycle::Lifecycle;
use super::state::{GameEvent, Playthrough, SimRng, seeded_rng};
use crate::input::InputState;
use crate::renderer::{DrawContext, Size};

/// Downward acceleration (px/s²)
pub const GRAVITY: f32 = 1600.0;
/// Upward impulse on jump (px/s)
pub const JUMP_VELOCITY: f32 = 650.0;
/// Ground line sits this far above the bottom edge
pub const GROUND_OFFSET: f32 = 24.0;

pub const PLAYER_X: f32 = 40.0;
pub const PLAYER_W: f32 = 18.0;
pub const PLAYER_H: f32 = 14.0;

pub const START_SPEED: f32 = 240.0;
/// Speed gained per second of play
pub const SPEED_RAMP: f32 = 8.0;
pub const MAX_SPEED: f32 = 520.0;
/// Score per pixel travelled
pub const SCORE_RATE: f32 = 0.1;

/// No spawn while the newest obstacle is inside this band at the right edge
pub const SPAWN_BAND: f32 = 120.0;
pub const SPAWN_BASE_CHANCE: f32 = 0.02;
pub const SPAWN_RAMP: f32 = 0.005;
pub const SPAWN_RAMP_CAP: f32 = 0.18;

const OBSTACLE_MIN_SIZE: f32 = 12.0;
const OBSTACLE_SIZE_RANGE: f32 = 18.0;
/// Obstacles are dropped once their right edge passes this far off-screen
pub const PRUNE_MARGIN: f32 = 10.0;

/// Axis-aligned obstacle (top-left + extent)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Obstacle {
    fn overlaps(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        x < self.x + self.w && x + w > self.x && y < self.y + self.h && y + h > self.y
    }
}

#[derive(Debug, Clone)]
pub struct RunnerSim {
    size: Size,
    ground_y: f32,
    /// Player feet (bottom edge of the hitbox)
    player_y: f32,
    player_vy: f32,
    speed: f32,
    elapsed: f32,
    /// Fractional score; the visible score is its floor
    distance_score: f64,
    obstacles: Vec<Obstacle>,
    run: Playthrough,
    rng: SimRng,
}

impl RunnerSim {
    pub fn new(size: Size, seed: u64) -> Self {
        let mut sim = Self {
            size,
            ground_y: size.h - GROUND_OFFSET,
            player_y: 0.0,
            player_vy: 0.0,
            speed: START_SPEED,
            elapsed: 0.0,
            distance_score: 0.0,
            obstacles: Vec::new(),
            run: Playthrough::new(),
            rng: seeded_rng(seed),
        };
        sim.reset();
        sim
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn player_y(&self) -> f32 {
        self.player_y
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current per-tick spawn chance (when the spawn band is clear)
    pub fn spawn_chance(&self) -> f32 {
        SPAWN_BASE_CHANCE + (self.elapsed * SPAWN_RAMP).min(SPAWN_RAMP_CAP)
    }

    fn spawn_obstacle(&mut self) {
        let side = OBSTACLE_MIN_SIZE + self.rng.random::<f32>() * OBSTACLE_SIZE_RANGE;
        let obstacle = Obstacle {
            x: self.size.w + side,
            y: self.ground_y - side + 2.0,
            w: side,
            h: side,
        };
        log::debug!("runner: obstacle {:.1}px at t={:.2}s", side, self.elapsed);
        self.obstacles.push(obstacle);
    }

    fn step_player(&mut self, dt: f32, input: &InputState) {
        let wants_jump = input.up || input.action;
        // Also true at the apex of a jump, where vy momentarily hits zero
        if (wants_jump && self.player_y >= self.ground_y - 0.5)
            || (wants_jump && self.player_vy == 0.0)
        {
            self.player_vy = -JUMP_VELOCITY;
        }

        self.player_vy += GRAVITY * dt;
        self.player_y += self.player_vy * dt;
        if self.player_y > self.ground_y {
            self.player_y = self.ground_y;
            self.player_vy = 0.0;
        }
    }

    fn step_obstacles(&mut self, dt: f32) {
        let band_clear = self
            .obstacles
            .last()
            .is_none_or(|o| o.x < self.size.w - SPAWN_BAND);
        if band_clear && self.rng.random::<f32>() < self.spawn_chance() {
            self.spawn_obstacle();
        }

        let dx = self.speed * dt;
        for o in &mut self.obstacles {
            o.x -= dx;
        }
        self.obstacles.retain(|o| o.x + o.w > -PRUNE_MARGIN);
    }

    fn player_hit(&self) -> bool {
        let py = self.player_y - PLAYER_H;
        self.obstacles
            .iter()
            .any(|o| o.overlaps(PLAYER_X, py, PLAYER_W, PLAYER_H))
    }
}

impl Lifecycle for RunnerSim {
    fn init(&mut self, size: Size) {
        self.size = size;
        self.ground_y = size.h - GROUND_OFFSET;
        self.reset();
    }

    fn update(&mut self, dt: f32, input: &InputState) {
        if self.run.is_over() {
            return;
        }

        self.elapsed += dt;
        self.speed = (self.speed + dt * SPEED_RAMP).min(MAX_SPEED);
        self.distance_score += f64::from(dt * self.speed * SCORE_RATE);
        self.run.raise_score_to(self.distance_score.floor() as u64);

        self.step_player(dt, input);
        self.step_obstacles(dt);

        if self.player_hit() {
            self.run.finish();
        }
    }

    fn draw(&self, ctx: &mut dyn DrawContext) {
        let Size { w, h } = self.size;

        // Ground
        ctx.fill_rect(0.0, self.ground_y + 1.0, w, h - self.ground_y, "#2a2a2a");

        // Player
        ctx.fill_rect(
            PLAYER_X,
            self.player_y - PLAYER_H,
            PLAYER_W,
            PLAYER_H,
            "#4ade80",
        );

        for o in &self.obstacles {
            ctx.fill_rect(o.x, o.y, o.w, o.h, "#f87171");
        }

        // Parallax dashes
        let scroll = (self.elapsed * self.speed).rem_euclid(60.0);
        for i in 0..8 {
            let x = (i as f32 * 60.0 - scroll + w).rem_euclid(w);
            ctx.fill_rect(x, self.ground_y - 20.0, 24.0, 2.0, "#3a3a3a");
        }
    }

    fn reset(&mut self) {
        self.player_y = self.ground_y;
        self.player_vy = 0.0;
        self.speed = START_SPEED;
        self.elapsed = 0.0;
        self.distance_score = 0.0;
        self.obstacles.clear();
        self.run.reset();
    }

    fn score(&self) -> u64 {
        self.run.score()
    }

    fn is_game_over(&self) -> bool {
        self.run.is_over()
    }

    fn take_events(&mut self) -> Vec<GameEvent> {
        self.run.take_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn runner() -> RunnerSim {
        RunnerSim::new(Size::new(320.0, 180.0), 7)
    }

    #[test]
    fn test_starts_on_ground() {
        let sim = runner();
        assert_eq!(sim.ground_y(), 156.0);
        assert_eq!(sim.player_y(), sim.ground_y());
        assert_eq!(sim.score(), 0);
        assert!(!sim.is_game_over());
    }

    #[test]
    fn test_init_rederives_ground() {
        let mut sim = runner();
        sim.init(Size::new(400.0, 300.0));
        assert_eq!(sim.ground_y(), 276.0);
        assert_eq!(sim.player_y(), 276.0);
    }

    #[test]
    fn test_jump_from_ground() {
        let mut sim = runner();
        let jump = InputState {
            up: true,
            ..Default::default()
        };
        sim.update(DT, &jump);
        assert!(sim.player_vy < 0.0);
        assert!(sim.player_y < sim.ground_y);
    }

    #[test]
    fn test_apex_jump_is_allowed() {
        let mut sim = runner();
        sim.player_y = sim.ground_y - 60.0;
        sim.player_vy = 0.0;
        let jump = InputState {
            action: true,
            ..Default::default()
        };
        sim.update(DT, &jump);
        assert!((sim.player_vy - (-JUMP_VELOCITY + GRAVITY * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_no_jump_mid_air_while_rising() {
        let mut sim = runner();
        sim.player_y = sim.ground_y - 60.0;
        sim.player_vy = -200.0;
        let jump = InputState {
            up: true,
            ..Default::default()
        };
        sim.update(DT, &jump);
        assert!((sim.player_vy - (-200.0 + GRAVITY * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_score_accrues_from_speed() {
        let mut sim = runner();
        sim.update(0.05, &InputState::default());
        // speed 240.4 * 0.05 * 0.1 = 1.202
        assert_eq!(sim.score(), 1);
        assert_eq!(
            sim.take_events(),
            vec![GameEvent::ScoreChanged { score: 1 }]
        );
    }

    #[test]
    fn test_speed_caps() {
        let mut sim = runner();
        for _ in 0..4000 {
            sim.obstacles.clear();
            sim.update(0.05, &InputState::default());
        }
        assert_eq!(sim.speed(), MAX_SPEED);
        assert!((sim.spawn_chance() - (SPAWN_BASE_CHANCE + SPAWN_RAMP_CAP)).abs() < 1e-6);
    }

    #[test]
    fn test_collision_ends_once() {
        let mut sim = runner();
        sim.obstacles.push(Obstacle {
            x: PLAYER_X + 2.0,
            y: sim.ground_y - 12.0,
            w: 12.0,
            h: 12.0,
        });
        sim.update(DT, &InputState::default());
        assert!(sim.is_game_over());

        let score = sim.score();
        sim.update(DT, &InputState::default());
        sim.update(DT, &InputState::default());
        let overs: Vec<_> = sim
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(overs, vec![GameEvent::GameOver { score }]);
    }

    #[test]
    fn test_expired_obstacles_pruned() {
        let mut sim = runner();
        sim.obstacles.push(Obstacle {
            x: -25.0,
            y: 0.0,
            w: 20.0,
            h: 20.0,
        });
        sim.update(DT, &InputState::default());
        assert!(sim.obstacles().iter().all(|o| o.x + o.w > -PRUNE_MARGIN));
    }

    #[test]
    fn test_spawn_band_blocks_second_obstacle() {
        let mut sim = runner();
        sim.obstacles.push(Obstacle {
            x: 300.0,
            y: sim.ground_y - 12.0,
            w: 12.0,
            h: 12.0,
        });
        sim.elapsed = 100.0;
        sim.update(DT, &InputState::default());
        assert_eq!(sim.obstacles().len(), 1);
    }

    #[test]
    fn test_draw_does_not_mutate() {
        use crate::renderer::CommandRecorder;

        let mut sim = runner();
        for _ in 0..30 {
            sim.update(DT, &InputState::default());
        }
        let before = (sim.player_y, sim.speed, sim.obstacles.clone(), sim.score());
        let mut rec = CommandRecorder::new();
        sim.draw(&mut rec);
        assert!(!rec.is_empty());
        assert_eq!(
            before,
            (sim.player_y, sim.speed, sim.obstacles.clone(), sim.score())
        );
    }
}
