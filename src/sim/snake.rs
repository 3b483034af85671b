//! Grid snake
//!
//! A discrete 20x12 grid stepped on continuous time: real time accumulates
//! and the snake advances one cell whenever a full step has elapsed. Each
//! pickup shortens the step, down to a floor.

use rand::Rng;
use std::collections::VecDeque;

use super::lifecycle::Lifecycle;
use super::state::{GameEvent, Playthrough, SimRng, seeded_rng};
use crate::input::InputState;
use crate::renderer::{DrawContext, Size};

pub const COLS: i32 = 20;
pub const ROWS: i32 = 12;

/// Seconds per step at the start of a run
pub const START_STEP_TIME: f32 = 0.12;
/// Step shortening per pickup
pub const STEP_DECREMENT: f32 = 0.002;
pub const MIN_STEP_TIME: f32 = 0.06;
pub const FOOD_POINTS: u64 = 10;

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn offset(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    fn in_grid(self) -> bool {
        (0..COLS).contains(&self.x) && (0..ROWS).contains(&self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnakeSim {
    size: Size,
    cell_size: f32,
    /// Head first
    body: VecDeque<Cell>,
    /// Direction of the last step taken
    heading: Direction,
    /// Direction the next step will take
    queued: Direction,
    food: Cell,
    time_acc: f32,
    step_time: f32,
    run: Playthrough,
    rng: SimRng,
}

impl SnakeSim {
    pub fn new(size: Size, seed: u64) -> Self {
        let mut sim = Self {
            size,
            cell_size: cell_size_for(size),
            body: VecDeque::with_capacity((COLS * ROWS) as usize),
            heading: Direction::Right,
            queued: Direction::Right,
            food: Cell::new(10, 6),
            time_acc: 0.0,
            step_time: START_STEP_TIME,
            run: Playthrough::new(),
            rng: seeded_rng(seed),
        };
        sim.reset();
        sim
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or(Cell::new(0, 0))
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn queued_heading(&self) -> Direction {
        self.queued
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn step_time(&self) -> f32 {
        self.step_time
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Queue a turn. Turns that would reverse the last step are rejected.
    fn steer(&mut self, input: &InputState) {
        let wanted = [
            (input.left, Direction::Left),
            (input.right, Direction::Right),
            (input.up, Direction::Up),
            (input.down, Direction::Down),
        ];
        if let Some(&(_, dir)) = wanted
            .iter()
            .find(|(pressed, dir)| *pressed && *dir != self.heading.opposite())
        {
            self.queued = dir;
        }
    }

    /// Uniform pick among cells the snake doesn't occupy
    fn random_empty_cell(&mut self) -> Option<Cell> {
        let free: Vec<Cell> = (0..ROWS)
            .flat_map(|y| (0..COLS).map(move |x| Cell::new(x, y)))
            .filter(|c| !self.body.contains(c))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }

    fn step(&mut self) {
        self.heading = self.queued;
        let next = self.head().offset(self.heading);

        if !next.in_grid() || self.body.contains(&next) {
            self.run.finish();
            return;
        }

        self.body.push_front(next);
        if next == self.food {
            self.run.add_score(FOOD_POINTS);
            self.step_time = (self.step_time - STEP_DECREMENT).max(MIN_STEP_TIME);
            match self.random_empty_cell() {
                Some(cell) => {
                    log::debug!("snake: food at ({}, {})", cell.x, cell.y);
                    self.food = cell;
                }
                // Board is full
                None => {
                    self.run.finish();
                }
            }
        } else {
            self.body.pop_back();
        }
    }

    fn to_px(&self, n: i32) -> f32 {
        n as f32 * self.cell_size
    }
}

fn cell_size_for(size: Size) -> f32 {
    (size.w / COLS as f32).min(size.h / ROWS as f32).floor()
}

impl Lifecycle for SnakeSim {
    fn init(&mut self, size: Size) {
        self.size = size;
        self.reset();
    }

    fn update(&mut self, dt: f32, input: &InputState) {
        if self.run.is_over() {
            return;
        }
        self.steer(input);

        self.time_acc += dt;
        if self.time_acc < self.step_time {
            return;
        }
        self.time_acc = 0.0;
        self.step();
    }

    fn draw(&self, ctx: &mut dyn DrawContext) {
        use glam::Vec2;

        let cs = self.cell_size;
        ctx.fill_rect(0.0, 0.0, self.size.w, self.size.h, "#0b1220");

        // Subtle grid
        for c in 1..COLS {
            let x = self.to_px(c) + 0.5;
            ctx.stroke_line(
                Vec2::new(x, 0.0),
                Vec2::new(x, self.to_px(ROWS)),
                "#111827",
                1.0,
            );
        }
        for r in 1..ROWS {
            let y = self.to_px(r) + 0.5;
            ctx.stroke_line(
                Vec2::new(0.0, y),
                Vec2::new(self.to_px(COLS), y),
                "#111827",
                1.0,
            );
        }

        ctx.fill_rect(
            self.to_px(self.food.x) + 2.0,
            self.to_px(self.food.y) + 2.0,
            cs - 4.0,
            cs - 4.0,
            "#f43f5e",
        );

        for (i, s) in self.body.iter().enumerate() {
            let color = if i == 0 { "#22d3ee" } else { "#0ea5e9" };
            ctx.fill_rect(
                self.to_px(s.x) + 1.0,
                self.to_px(s.y) + 1.0,
                cs - 2.0,
                cs - 2.0,
                color,
            );
        }
    }

    fn reset(&mut self) {
        self.cell_size = cell_size_for(self.size);
        self.body.clear();
        self.body
            .extend([Cell::new(4, 6), Cell::new(3, 6), Cell::new(2, 6)]);
        self.heading = Direction::Right;
        self.queued = Direction::Right;
        self.time_acc = 0.0;
        self.step_time = START_STEP_TIME;
        self.run.reset();
        if let Some(cell) = self.random_empty_cell() {
            self.food = cell;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn snake() -> SnakeSim {
        SnakeSim::new(Size::new(320.0, 180.0), 5)
    }

    fn press(dir: Direction) -> InputState {
        let mut input = InputState::default();
        match dir {
            Direction::Up => input.up = true,
            Direction::Down => input.down = true,
            Direction::Left => input.left = true,
            Direction::Right => input.right = true,
        }
        input
    }

    /// Advance exactly one grid step
    fn step_once(sim: &mut SnakeSim, input: &InputState) {
        let dt = sim.step_time();
        sim.update(dt, input);
    }

    #[test]
    fn test_initial_layout() {
        let sim = snake();
        let body: Vec<Cell> = sim.body().iter().copied().collect();
        assert_eq!(body, vec![Cell::new(4, 6), Cell::new(3, 6), Cell::new(2, 6)]);
        assert_eq!(sim.heading(), Direction::Right);
        assert_eq!(sim.step_time(), START_STEP_TIME);
        assert!(!sim.body().contains(&sim.food()));
        // min(320 / 20, 180 / 12) = 15
        assert_eq!(sim.cell_size(), 15.0);
    }

    #[test]
    fn test_waits_for_full_step() {
        let mut sim = snake();
        sim.update(0.05, &InputState::default());
        assert_eq!(sim.head(), Cell::new(4, 6));
        sim.update(0.08, &InputState::default());
        assert_eq!(sim.head(), Cell::new(5, 6));
    }

    #[test]
    fn test_same_direction_input_keeps_heading() {
        let mut sim = snake();
        sim.update(0.0, &press(Direction::Right));
        assert_eq!(sim.queued_heading(), Direction::Right);
        assert_eq!(sim.heading(), Direction::Right);
    }

    #[test]
    fn test_reversal_rejected() {
        let mut sim = snake();
        sim.food = Cell::new(0, 0);
        sim.update(0.0, &press(Direction::Left));
        assert_eq!(sim.queued_heading(), Direction::Right);
        step_once(&mut sim, &press(Direction::Left));
        assert_eq!(sim.head(), Cell::new(5, 6));
        assert!(!sim.is_game_over());
    }

    #[test]
    fn test_two_turns_within_one_step_cannot_reverse() {
        let mut sim = snake();
        sim.food = Cell::new(0, 0);
        sim.update(0.01, &press(Direction::Up));
        sim.update(0.01, &press(Direction::Left));
        assert_eq!(sim.queued_heading(), Direction::Up);
        step_once(&mut sim, &InputState::default());
        assert_eq!(sim.head(), Cell::new(4, 5));
        assert!(!sim.is_game_over());
    }

    #[test]
    fn test_eating_grows_and_speeds_up() {
        let mut sim = snake();
        sim.food = Cell::new(5, 6);
        step_once(&mut sim, &InputState::default());
        assert_eq!(sim.len(), 4);
        assert_eq!(sim.score(), FOOD_POINTS);
        assert!(sim.step_time() < START_STEP_TIME);
        assert!(!sim.body().contains(&sim.food()));

        // Not eating keeps length
        sim.food = Cell::new(0, 0);
        step_once(&mut sim, &InputState::default());
        assert_eq!(sim.len(), 4);
    }

    #[test]
    fn test_step_time_floors_after_repeated_pickups() {
        let mut sim = snake();
        let mut last = sim.step_time();
        for pickup in 1..=40u64 {
            // Short snake with food right in front of the head
            sim.body = VecDeque::from(vec![Cell::new(4, 6), Cell::new(3, 6), Cell::new(2, 6)]);
            sim.food = Cell::new(5, 6);
            step_once(&mut sim, &InputState::default());
            assert_eq!(sim.score(), pickup * FOOD_POINTS);

            let now = sim.step_time();
            if last > MIN_STEP_TIME {
                assert!(now < last, "pickup {pickup}: {now} !< {last}");
            } else {
                assert_eq!(now, MIN_STEP_TIME);
            }
            assert!(now >= MIN_STEP_TIME);
            last = now;
        }
        // 0.12 down to 0.06 in 0.002 steps is 30 pickups
        assert_eq!(sim.step_time(), MIN_STEP_TIME);
        assert!(!sim.is_game_over());
    }

    #[test]
    fn test_wall_collision_ends_once() {
        let mut sim = snake();
        sim.food = Cell::new(0, 0);
        sim.body = VecDeque::from(vec![Cell::new(19, 6), Cell::new(18, 6), Cell::new(17, 6)]);
        step_once(&mut sim, &InputState::default());
        assert!(sim.is_game_over());
        assert_eq!(sim.head(), Cell::new(19, 6));

        step_once(&mut sim, &InputState::default());
        let overs = sim
            .take_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_self_collision_ends() {
        let mut sim = snake();
        sim.food = Cell::new(0, 0);
        // Hook shape: turning down runs into the body
        sim.body = VecDeque::from(vec![
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(5, 6),
            Cell::new(4, 6),
        ]);
        sim.heading = Direction::Left;
        sim.queued = Direction::Left;
        step_once(&mut sim, &press(Direction::Down));
        assert!(sim.is_game_over());
    }

    #[test]
    fn test_full_board_ends_run() {
        let mut sim = snake();
        let mut body = VecDeque::from(vec![Cell::new(1, 0)]);
        for y in 0..ROWS {
            for x in 0..COLS {
                let c = Cell::new(x, y);
                if c != Cell::new(0, 0) && c != Cell::new(1, 0) {
                    body.push_back(c);
                }
            }
        }
        sim.body = body;
        sim.heading = Direction::Left;
        sim.queued = Direction::Left;
        sim.food = Cell::new(0, 0);

        step_once(&mut sim, &InputState::default());
        assert_eq!(sim.len(), (COLS * ROWS) as usize);
        assert_eq!(sim.score(), FOOD_POINTS);
        assert!(sim.is_game_over());
    }
}
