//! Property tests for the lifecycle contract and per-game invariants

use mini_arcade::renderer::CommandRecorder;
use mini_arcade::sim::{
    AsteroidsSim, FlappySim, PaddleSim, RunnerSim, SnakeSim, asteroids, flappy, paddle, runner,
    snake,
};
use mini_arcade::{GameEvent, GameKind, InputState, Lifecycle, MiniGame, Size};
use proptest::prelude::*;

fn input_from_bits(bits: u8) -> InputState {
    InputState {
        left: bits & 1 != 0,
        right: bits & 2 != 0,
        up: bits & 4 != 0,
        down: bits & 8 != 0,
        action: bits & 16 != 0,
    }
}

/// Random input snapshots paired with random (already clamped) frame deltas
fn frames() -> impl Strategy<Value = Vec<(u8, f32)>> {
    prop::collection::vec((0u8..32, 0.0f32..=0.05), 1..400)
}

fn kind() -> impl Strategy<Value = GameKind> {
    prop::sample::select(GameKind::ALL.to_vec())
}

fn size() -> impl Strategy<Value = Size> {
    (120.0f32..640.0, 90.0f32..360.0).prop_map(|(w, h)| Size::new(w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_score_monotonic_and_single_game_over(
        kind in kind(),
        seed in any::<u64>(),
        frames in frames(),
    ) {
        let mut game = MiniGame::new(kind, Size::new(320.0, 180.0), seed);
        let mut last_score = 0;
        let mut game_overs = Vec::new();

        for (bits, dt) in frames {
            let was_over = game.is_game_over();
            game.update(dt, &input_from_bits(bits));
            prop_assert!(game.score() >= last_score);
            if was_over {
                prop_assert_eq!(game.score(), last_score);
            }

            for event in game.take_events() {
                match event {
                    GameEvent::ScoreChanged { score } => {
                        prop_assert!(score >= last_score);
                        last_score = score;
                    }
                    GameEvent::GameOver { score } => game_overs.push(score),
                }
            }
            prop_assert_eq!(last_score, game.score());
        }

        if game.is_game_over() {
            prop_assert_eq!(game_overs, vec![game.score()]);
        } else {
            prop_assert!(game_overs.is_empty());
        }
    }

    #[test]
    fn test_reset_returns_to_fresh_running_state(
        kind in kind(),
        seed in any::<u64>(),
        frames in frames(),
    ) {
        let mut game = MiniGame::new(kind, Size::new(320.0, 180.0), seed);
        for (bits, dt) in frames {
            game.update(dt, &input_from_bits(bits));
        }
        game.reset();
        prop_assert_eq!(game.score(), 0);
        prop_assert!(!game.is_game_over());
        prop_assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_draw_never_panics_on_any_size(
        kind in kind(),
        w in 0.0f32..800.0,
        h in 0.0f32..600.0,
        frames in frames(),
    ) {
        let mut game = MiniGame::new(kind, Size::new(w, h), 1);
        let mut rec = CommandRecorder::new();
        for (bits, dt) in frames {
            game.update(dt, &input_from_bits(bits));
        }
        game.draw(&mut rec);
        prop_assert!(!rec.is_empty());
    }

    #[test]
    fn test_runner_prunes_offscreen_obstacles(
        seed in any::<u64>(),
        size in size(),
        frames in frames(),
    ) {
        let mut sim = RunnerSim::new(size, seed);
        for (bits, dt) in frames {
            sim.update(dt, &input_from_bits(bits));
            for o in sim.obstacles() {
                prop_assert!(o.x + o.w > -runner::PRUNE_MARGIN);
            }
            prop_assert!(sim.player_y() <= sim.ground_y());
            prop_assert!(sim.speed() <= runner::MAX_SPEED);
        }
    }

    #[test]
    fn test_paddle_ball_stays_between_walls(
        seed in any::<u64>(),
        size in size(),
        frames in frames(),
    ) {
        let mut sim = PaddleSim::new(size, seed);
        for (bits, dt) in frames {
            sim.update(dt, &input_from_bits(bits));
            let x = sim.ball_pos().x;
            prop_assert!(x >= paddle::BALL_RADIUS - 1e-3);
            prop_assert!(x <= size.w - paddle::BALL_RADIUS + 1e-3);
            prop_assert!(sim.paddle_x() >= 0.0);
        }
    }

    #[test]
    fn test_flappy_bird_in_bounds_while_running(
        seed in any::<u64>(),
        size in size(),
        frames in frames(),
    ) {
        let mut sim = FlappySim::new(size, seed);
        for (bits, dt) in frames {
            sim.update(dt, &input_from_bits(bits));
            prop_assert!(sim.bird_y().is_finite());
            if !sim.is_game_over() {
                prop_assert!(sim.bird_y() - flappy::BIRD_RADIUS >= 0.0);
                prop_assert!(sim.bird_y() + flappy::BIRD_RADIUS <= size.h);
            }
        }
    }

    #[test]
    fn test_snake_grows_only_when_eating(
        seed in any::<u64>(),
        frames in frames(),
    ) {
        let mut sim = SnakeSim::new(Size::new(320.0, 180.0), seed);
        for (bits, dt) in frames {
            let (len, score) = (sim.len(), sim.score());
            sim.update(dt, &input_from_bits(bits));

            let grew = sim.len() - len;
            prop_assert!(grew <= 1);
            prop_assert_eq!(grew == 1, sim.score() == score + snake::FOOD_POINTS);
            prop_assert!(sim.step_time() >= snake::MIN_STEP_TIME);

            if !sim.is_game_over() {
                prop_assert!(!sim.body().contains(&sim.food()));
                let head = sim.head();
                prop_assert!(head.x >= 0 && head.x < snake::COLS);
                prop_assert!(head.y >= 0 && head.y < snake::ROWS);
            }
        }
    }

    #[test]
    fn test_asteroids_field_never_below_floor(
        seed in any::<u64>(),
        size in size(),
        frames in frames(),
    ) {
        let mut sim = AsteroidsSim::new(size, seed);
        prop_assert!(sim.live_asteroids() >= asteroids::MIN_ASTEROIDS);
        for (bits, dt) in frames {
            sim.update(dt, &input_from_bits(bits));
            prop_assert!(sim.live_asteroids() >= asteroids::MIN_ASTEROIDS);
            let pos = sim.ship().pos;
            prop_assert!(pos.x >= 0.0 && pos.x <= size.w);
            prop_assert!(pos.y >= 0.0 && pos.y <= size.h);
        }
    }
}
