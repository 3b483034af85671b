//! Wraparound space shooter
//!
//! Ship, bullets and asteroids all live on a torus the size of the surface.
//! Large asteroids split when shot; the field is topped back up to a minimum
//! population at the screen edges every tick.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

use super::lifecycle::Lifecycle;
use super::state::{GameEvent, Playthrough, SimRng, seeded_rng};
use crate::input::InputState;
use crate::renderer::{DrawContext, Size};

/// Acceleration along the heading while thrusting (px/s²)
pub const THRUST: f32 = 80.0;
/// Rotation rate (rad/s)
pub const TURN_SPEED: f32 = 3.2;
/// Velocity multiplier applied once per tick
pub const FRICTION: f32 = 0.995;
pub const SHIP_RADIUS: f32 = 6.0;

pub const BULLET_SPEED: f32 = 240.0;
/// Seconds a bullet survives
pub const BULLET_LIFE: f32 = 1.2;

/// Live asteroid floor
pub const MIN_ASTEROIDS: usize = 6;
/// Asteroids above this radius split in two when destroyed
pub const SPLIT_RADIUS: f32 = 12.0;
/// Child radius relative to the parent
pub const SPLIT_FACTOR: f32 = 0.6;

const ASTEROID_MIN_SPEED: f32 = 20.0;
const ASTEROID_SPEED_RANGE: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians (0 = +x, y down)
    pub angle: f32,
}

impl Ship {
    fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Triangle outline in world space
    fn outline(&self) -> [Vec2; 3] {
        let rot = self.heading();
        [
            Vec2::new(8.0, 0.0),
            Vec2::new(-8.0, -6.0),
            Vec2::new(-8.0, 6.0),
        ]
        .map(|p| self.pos + rot.rotate(p))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

impl Asteroid {
    /// Points for destroying an asteroid of this size
    pub fn points(&self) -> u64 {
        if self.radius >= 20.0 {
            20
        } else if self.radius >= 12.0 {
            10
        } else {
            5
        }
    }
}

/// Toroidal wrap into `[0, w] x [0, h]`
fn wrap(pos: &mut Vec2, size: Size) {
    if pos.x < 0.0 {
        pos.x += size.w;
    }
    if pos.x > size.w {
        pos.x -= size.w;
    }
    if pos.y < 0.0 {
        pos.y += size.h;
    }
    if pos.y > size.h {
        pos.y -= size.h;
    }
}

#[derive(Debug, Clone)]
pub struct AsteroidsSim {
    size: Size,
    ship: Ship,
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    run: Playthrough,
    rng: SimRng,
}

impl AsteroidsSim {
    pub fn new(size: Size, seed: u64) -> Self {
        let mut sim = Self {
            size,
            ship: Ship {
                pos: Vec2::new(size.w / 2.0, size.h / 2.0),
                vel: Vec2::ZERO,
                angle: -FRAC_PI_2,
            },
            bullets: Vec::new(),
            asteroids: Vec::new(),
            run: Playthrough::new(),
            rng: seeded_rng(seed),
        };
        sim.reset();
        sim
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn live_asteroids(&self) -> usize {
        self.asteroids.iter().filter(|a| a.alive).count()
    }

    /// New asteroid with a random heading. Without a position it enters at
    /// the left or right edge at a random height.
    fn make_asteroid(&mut self, radius: f32, at: Option<Vec2>) -> Asteroid {
        let angle = self.rng.random::<f32>() * TAU;
        let speed = ASTEROID_MIN_SPEED + self.rng.random::<f32>() * ASTEROID_SPEED_RANGE;
        let pos = match at {
            Some(p) => p,
            None => {
                let x = if self.rng.random_bool(0.5) { 0.0 } else { self.size.w };
                Vec2::new(x, self.rng.random::<f32>() * self.size.h)
            }
        };
        Asteroid {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            radius,
            alive: true,
        }
    }

    fn spawn_at_edge(&mut self, radius: f32) {
        let a = self.make_asteroid(radius, None);
        log::debug!("asteroids: spawn r={:.1} at ({:.0}, {:.0})", radius, a.pos.x, a.pos.y);
        self.asteroids.push(a);
    }

    fn fire(&mut self) {
        self.bullets.push(Bullet {
            pos: self.ship.pos,
            vel: self.ship.heading() * BULLET_SPEED + self.ship.vel,
            life: BULLET_LIFE,
        });
    }

    fn handle_input(&mut self, dt: f32, input: &InputState) {
        if input.left {
            self.ship.angle -= TURN_SPEED * dt;
        }
        if input.right {
            self.ship.angle += TURN_SPEED * dt;
        }
        if input.up || input.action {
            self.ship.vel += self.ship.heading() * THRUST * dt;
        }
        // Tap on the lower half fires on touch screens
        if input.down && input.action {
            self.fire();
        }
    }

    fn move_entities(&mut self, dt: f32) {
        let size = self.size;

        self.ship.pos += self.ship.vel * dt;
        self.ship.vel *= FRICTION;
        wrap(&mut self.ship.pos, size);

        for b in &mut self.bullets {
            b.pos += b.vel * dt;
            b.life -= dt;
            wrap(&mut b.pos, size);
        }
        self.bullets.retain(|b| b.life > 0.0);

        for a in self.asteroids.iter_mut().filter(|a| a.alive) {
            a.pos += a.vel * dt;
            wrap(&mut a.pos, size);
        }
    }

    /// Each asteroid takes at most one bullet; each bullet is spent on hit
    fn resolve_shots(&mut self) {
        let mut fragments = Vec::new();

        for ai in 0..self.asteroids.len() {
            let a = self.asteroids[ai];
            if !a.alive {
                continue;
            }
            let hit = self
                .bullets
                .iter_mut()
                .filter(|b| b.life > 0.0)
                .find(|b| a.pos.distance_squared(b.pos) < a.radius * a.radius);
            let Some(bullet) = hit else {
                continue;
            };
            bullet.life = 0.0;
            self.asteroids[ai].alive = false;
            self.run.add_score(a.points());
            if a.radius > SPLIT_RADIUS {
                fragments.push((a.radius * SPLIT_FACTOR, a.pos));
                fragments.push((a.radius * SPLIT_FACTOR, a.pos));
            }
        }

        self.bullets.retain(|b| b.life > 0.0);
        self.asteroids.retain(|a| a.alive);
        for (radius, pos) in fragments {
            let child = self.make_asteroid(radius, Some(pos));
            self.asteroids.push(child);
        }
    }

    fn ship_hit(&self) -> bool {
        self.asteroids.iter().any(|a| {
            let reach = a.radius + SHIP_RADIUS;
            a.pos.distance_squared(self.ship.pos) < reach * reach
        })
    }

    fn refill(&mut self) {
        while self.live_asteroids() < MIN_ASTEROIDS {
            let radius = 20.0 + self.rng.random::<f32>() * 14.0;
            self.spawn_at_edge(radius);
        }
    }
}

impl Lifecycle for AsteroidsSim {
    fn init(&mut self, size: Size) {
        self.size = size;
        self.reset();
    }

    fn update(&mut self, dt: f32, input: &InputState) {
        if self.run.is_over() {
            return;
        }

        self.handle_input(dt, input);
        self.move_entities(dt);
        self.resolve_shots();

        if self.ship_hit() {
            self.run.finish();
        }

        self.refill();
    }

    fn draw(&self, ctx: &mut dyn DrawContext) {
        ctx.fill_rect(0.0, 0.0, self.size.w, self.size.h, "#0b0f1a");

        ctx.stroke_polygon(&self.ship.outline(), "#a3e635", 2.0);

        for b in &self.bullets {
            ctx.fill_rect(b.pos.x - 1.0, b.pos.y - 1.0, 2.0, 2.0, "#eab308");
        }

        for a in &self.asteroids {
            ctx.stroke_circle(a.pos, a.radius, "#94a3b8", 1.0);
        }
    }

    fn reset(&mut self) {
        self.ship = Ship {
            pos: Vec2::new(self.size.w / 2.0, self.size.h / 2.0),
            vel: Vec2::ZERO,
            angle: -FRAC_PI_2,
        };
        self.bullets.clear();
        self.asteroids.clear();
        self.run.reset();
        for _ in 0..MIN_ASTEROIDS {
            let radius = 24.0 + self.rng.random::<f32>() * 10.0;
            self.spawn_at_edge(radius);
        }
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
