//! Breakout-style paddle game
//!
//! A paddle slides along the bottom, a ball bounces off the walls, the paddle
//! and a 4x8 wall of blocks. Losing the ball ends the run; clearing every
//! block ends it with a completion bonus.

use glam::Vec2;
use rand::Rng;

use super::lifecycle::Lifecycle;
use super::state::{GameEvent, Playthrough, SimRng, seeded_rng};
use crate::input::InputState;
use crate::renderer::{Color, DrawContext, Size};

pub const PADDLE_W: f32 = 48.0;
pub const PADDLE_H: f32 = 8.0;
/// Paddle top edge sits this far above the bottom edge
pub const PADDLE_BOTTOM_OFFSET: f32 = 16.0;
pub const PADDLE_SPEED: f32 = 360.0;

pub const BALL_RADIUS: f32 = 4.0;
const BALL_START_VX: f32 = 160.0;
const BALL_START_VY: f32 = -180.0;
/// Extra horizontal speed at the very edge of the paddle
pub const PADDLE_SPIN: f32 = 60.0;
/// Ball must fall this many radii below the bottom edge to be lost
pub const LOSS_DEPTH_RADII: f32 = 4.0;

pub const BLOCK_ROWS: usize = 4;
pub const BLOCK_COLS: usize = 8;
pub const BLOCK_GAP: f32 = 4.0;
pub const BLOCK_H: f32 = 12.0;
const BLOCK_TOP: f32 = 24.0;

pub const BLOCK_POINTS: u64 = 10;
pub const CLEAR_BONUS: u64 = 100;

const BLOCK_COLOR: Color = "#60a5fa";
const BALL_COLOR: Color = "#fbbf24";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub alive: bool,
}

impl Block {
    /// Closest point on the block to `p`
    fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.min(self.x + self.w).max(self.x),
            p.y.min(self.y + self.h).max(self.y),
        )
    }
}

#[derive(Debug, Clone)]
pub struct PaddleSim {
    size: Size,
    paddle_x: f32,
    paddle_y: f32,
    ball_pos: Vec2,
    ball_vel: Vec2,
    blocks: Vec<Block>,
    run: Playthrough,
    rng: SimRng,
}

impl PaddleSim {
    pub fn new(size: Size, seed: u64) -> Self {
        let mut sim = Self {
            size,
            paddle_x: 0.0,
            paddle_y: size.h - PADDLE_BOTTOM_OFFSET,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            blocks: Vec::with_capacity(BLOCK_ROWS * BLOCK_COLS),
            run: Playthrough::new(),
            rng: seeded_rng(seed),
        };
        sim.reset();
        sim
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn alive_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.alive).count()
    }

    pub fn ball_pos(&self) -> Vec2 {
        self.ball_pos
    }

    pub fn ball_vel(&self) -> Vec2 {
        self.ball_vel
    }

    pub fn paddle_x(&self) -> f32 {
        self.paddle_x
    }

    pub fn paddle_y(&self) -> f32 {
        self.paddle_y
    }

    fn build_blocks(&mut self) {
        self.blocks.clear();
        let cols = BLOCK_COLS as f32;
        let bw = ((self.size.w - BLOCK_GAP * (cols + 1.0)) / cols).floor().max(1.0);
        for r in 0..BLOCK_ROWS {
            for c in 0..BLOCK_COLS {
                self.blocks.push(Block {
                    x: BLOCK_GAP + c as f32 * (bw + BLOCK_GAP),
                    y: BLOCK_TOP + r as f32 * (BLOCK_H + BLOCK_GAP),
                    w: bw,
                    h: BLOCK_H,
                    alive: true,
                });
            }
        }
    }

    fn move_paddle(&mut self, dt: f32, input: &InputState) {
        if input.left {
            self.paddle_x -= PADDLE_SPEED * dt;
        }
        if input.right {
            self.paddle_x += PADDLE_SPEED * dt;
        }
        self.paddle_x = self.paddle_x.min(self.size.w - PADDLE_W).max(0.0);
    }

    fn bounce_walls(&mut self) {
        let r = BALL_RADIUS;
        if self.ball_pos.x < r {
            self.ball_pos.x = r;
            self.ball_vel.x = self.ball_vel.x.abs();
        } else if self.ball_pos.x > self.size.w - r {
            self.ball_pos.x = self.size.w - r;
            self.ball_vel.x = -self.ball_vel.x.abs();
        }
        if self.ball_pos.y < r {
            self.ball_pos.y = r;
            self.ball_vel.y = self.ball_vel.y.abs();
        }
    }

    fn bounce_paddle(&mut self) {
        let Vec2 { x, y } = self.ball_pos;
        let within_x = x > self.paddle_x && x < self.paddle_x + PADDLE_W;
        let hitting = within_x
            && y > self.paddle_y - BALL_RADIUS
            && y < self.paddle_y + PADDLE_H;
        if hitting {
            self.ball_pos.y = self.paddle_y - BALL_RADIUS;
            self.ball_vel.y = -self.ball_vel.y.abs();
            let half = PADDLE_W / 2.0;
            let offset = (x - (self.paddle_x + half)) / half;
            self.ball_vel.x += offset * PADDLE_SPIN;
        }
    }

    /// At most one block per tick
    fn hit_block(&mut self) {
        let pos = self.ball_pos;
        let hit = self.blocks.iter_mut().filter(|b| b.alive).find_map(|b| {
            let d = pos - b.closest_point(pos);
            (d.length_squared() < BALL_RADIUS * BALL_RADIUS).then(|| {
                b.alive = false;
                d
            })
        });

        if let Some(d) = hit {
            self.run.add_score(BLOCK_POINTS);
            if d.x.abs() > d.y.abs() {
                self.ball_vel.x = -self.ball_vel.x;
            } else {
                self.ball_vel.y = -self.ball_vel.y;
            }
        }
    }
}

impl Lifecycle for PaddleSim {
    fn init(&mut self, size: Size) {
        self.size = size;
        self.paddle_y = size.h - PADDLE_BOTTOM_OFFSET;
        self.reset();
    }

    fn update(&mut self, dt: f32, input: &InputState) {
        if self.run.is_over() {
            return;
        }

        self.move_paddle(dt, input);
        self.ball_pos += self.ball_vel * dt;
        self.bounce_walls();
        self.bounce_paddle();
        self.hit_block();

        if self.ball_pos.y > self.size.h + BALL_RADIUS * LOSS_DEPTH_RADII {
            self.run.finish();
            return;
        }

        if self.alive_blocks() == 0 {
            self.run.add_score(CLEAR_BONUS);
            self.run.finish();
        }
    }

    fn draw(&self, ctx: &mut dyn DrawContext) {
        ctx.fill_rect(0.0, 0.0, self.size.w, self.size.h, "#0b1220");

        for b in self.blocks.iter().filter(|b| b.alive) {
            ctx.fill_rect(b.x, b.y, b.w, b.h, BLOCK_COLOR);
        }

        ctx.fill_rect(self.paddle_x, self.paddle_y, PADDLE_W, PADDLE_H, "#22d3ee");
        ctx.fill_circle(self.ball_pos, BALL_RADIUS, BALL_COLOR);
    }

    fn reset(&mut self) {
        let Size { w, h } = self.size;
        self.paddle_x = w / 2.0 - PADDLE_W / 2.0;
        self.ball_pos = Vec2::new(w / 2.0, h / 2.0);
        let dir = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.ball_vel = Vec2::new(BALL_START_VX * dir, BALL_START_VY);
        self.build_blocks();
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
