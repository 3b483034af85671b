//! Side-scrolling flapper
//!
//! The bird stays at a fixed x; flapping snaps its vertical velocity to a
//! fixed upward value. Pipes arrive on a fixed interval, each with a single
//! gap at a random height.

use rand::Rng;

use super::lifecycle::Lifecycle;
use super::state::{GameEvent, Playthrough, SimRng, seeded_rng};
use crate::input::InputState;
use crate::renderer::{DrawContext, Size};

pub const GRAVITY: f32 = 900.0;
/// Vertical velocity set (not added) by a flap
pub const FLAP_VELOCITY: f32 = -280.0;
pub const PIPE_SPEED: f32 = 120.0;
/// Seconds between pipe spawns
pub const PIPE_INTERVAL: f32 = 1.4;
pub const PIPE_W: f32 = 26.0;
pub const GAP_H: f32 = 56.0;
/// Minimum distance between a gap and the top/bottom edge
const GAP_MARGIN: f32 = 30.0;
/// New pipes start this far past the right edge
const SPAWN_OFFSET: f32 = 20.0;
const PRUNE_MARGIN: f32 = 10.0;

/// Bird x as a fraction of surface width
pub const BIRD_X_FRACTION: f32 = 0.28;
pub const BIRD_RADIUS: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f32,
    /// Top of the gap
    pub gap_y: f32,
    pub gap_h: f32,
    pub w: f32,
    /// Trailing edge already crossed the bird
    pub passed: bool,
}

impl Pipe {
    fn trailing_edge(&self) -> f32 {
        self.x + self.w
    }
}

#[derive(Debug, Clone)]
pub struct FlappySim {
    size: Size,
    bird_x: f32,
    bird_y: f32,
    bird_vy: f32,
    pipes: Vec<Pipe>,
    since_pipe: f32,
    run: Playthrough,
    rng: SimRng,
}

impl FlappySim {
    pub fn new(size: Size, seed: u64) -> Self {
        let mut sim = Self {
            size,
            bird_x: size.w * BIRD_X_FRACTION,
            bird_y: 0.0,
            bird_vy: 0.0,
            pipes: Vec::new(),
            since_pipe: 0.0,
            run: Playthrough::new(),
            rng: seeded_rng(seed),
        };
        sim.reset();
        sim
    }

    pub fn bird_x(&self) -> f32 {
        self.bird_x
    }

    pub fn bird_y(&self) -> f32 {
        self.bird_y
    }

    pub fn bird_vy(&self) -> f32 {
        self.bird_vy
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    fn spawn_pipe(&mut self) {
        let span = (self.size.h - GAP_MARGIN * 2.0 - GAP_H).max(0.0);
        let gap_y = GAP_MARGIN + self.rng.random::<f32>() * span;
        log::debug!("flappy: pipe gap at {:.1}", gap_y);
        self.pipes.push(Pipe {
            x: self.size.w + SPAWN_OFFSET,
            gap_y,
            gap_h: GAP_H,
            w: PIPE_W,
            passed: false,
        });
    }

    fn out_of_bounds(&self) -> bool {
        self.bird_y - BIRD_RADIUS < 0.0 || self.bird_y + BIRD_RADIUS > self.size.h
    }

    fn hits_pipe(&self) -> bool {
        let (x, y, r) = (self.bird_x, self.bird_y, BIRD_RADIUS);
        self.pipes.iter().any(|p| {
            let in_pipe_x = x + r > p.x && x - r < p.x + p.w;
            let in_gap_y = y - r > p.gap_y && y + r < p.gap_y + p.gap_h;
            in_pipe_x && !in_gap_y
        })
    }
}

impl Lifecycle for FlappySim {
    fn init(&mut self, size: Size) {
        self.size = size;
        self.bird_x = size.w * BIRD_X_FRACTION;
        self.reset();
    }

    fn update(&mut self, dt: f32, input: &InputState) {
        if self.run.is_over() {
            return;
        }

        if input.action || input.up {
            self.bird_vy = FLAP_VELOCITY;
        }
        self.bird_vy += GRAVITY * dt;
        self.bird_y += self.bird_vy * dt;

        self.since_pipe += dt;
        if self.since_pipe >= PIPE_INTERVAL {
            self.since_pipe = 0.0;
            self.spawn_pipe();
        }

        let dx = PIPE_SPEED * dt;
        for p in &mut self.pipes {
            p.x -= dx;
        }
        self.pipes.retain(|p| p.trailing_edge() > -PRUNE_MARGIN);

        let mut passed = 0;
        for p in &mut self.pipes {
            if !p.passed && p.trailing_edge() < self.bird_x {
                p.passed = true;
                passed += 1;
            }
        }
        self.run.add_score(passed);

        if self.out_of_bounds() || self.hits_pipe() {
            self.run.finish();
        }
    }

    fn draw(&self, ctx: &mut dyn DrawContext) {
        let Size { w, h } = self.size;
        ctx.fill_rect(0.0, 0.0, w, h, "#0d1323");

        for p in &self.pipes {
            let gap_bottom = p.gap_y + p.gap_h;
            ctx.fill_rect(p.x, 0.0, p.w, p.gap_y, "#22c55e");
            ctx.fill_rect(p.x, gap_bottom, p.w, h - gap_bottom, "#22c55e");
        }

        // Ground line
        ctx.fill_rect(0.0, h - 2.0, w, 2.0, "#334155");

        ctx.fill_circle(
            glam::Vec2::new(self.bird_x, self.bird_y),
            BIRD_RADIUS,
            "#f59e0b",
        );
    }

    fn reset(&mut self) {
        self.bird_y = self.size.h / 2.0;
        self.bird_vy = 0.0;
        self.pipes.clear();
        self.since_pipe = 0.0;
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
