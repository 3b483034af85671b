//! Game loop driver
//!
//! Platform-neutral half of the frame loop: measures elapsed time, clamps it,
//! runs `update` then clear + `draw`, and forwards score/game-over events to
//! the host. The browser host calls `frame` from `requestAnimationFrame`;
//! the native binary calls it from a plain loop.

use crate::consts::MAX_FRAME_DT;
use crate::input::InputState;
use crate::renderer::{DrawContext, Size, backing_size};
use crate::sim::{GameEvent, Lifecycle, MiniGame};

/// Clamp a raw frame delta to `[0, MAX_FRAME_DT]`
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Turns monotonic timestamps (ms) into clamped frame deltas (s)
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of the loop
    pub fn start(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    /// Delta since the previous call (or `start`), clamped
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let raw = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        clamp_dt(raw)
    }
}

type ScoreCallback = Box<dyn FnMut(u64)>;

/// Forwards simulation events to host callbacks
#[derive(Default)]
pub struct ScoreBridge {
    on_score_change: Option<ScoreCallback>,
    on_game_over: Option<ScoreCallback>,
}

impl ScoreBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_score_change(mut self, f: impl FnMut(u64) + 'static) -> Self {
        self.on_score_change = Some(Box::new(f));
        self
    }

    pub fn on_game_over(mut self, f: impl FnMut(u64) + 'static) -> Self {
        self.on_game_over = Some(Box::new(f));
        self
    }

    pub fn forward(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::ScoreChanged { score } => {
                    if let Some(f) = self.on_score_change.as_mut() {
                        f(score);
                    }
                }
                GameEvent::GameOver { score } => {
                    if let Some(f) = self.on_game_over.as_mut() {
                        f(score);
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for ScoreBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreBridge")
            .field("on_score_change", &self.on_score_change.is_some())
            .field("on_game_over", &self.on_game_over.is_some())
            .finish()
    }
}

/// Owns one simulation and sequences its frames
#[derive(Debug)]
pub struct LoopDriver<G: Lifecycle = MiniGame> {
    game: G,
    size: Size,
    device_pixel_ratio: f32,
    clock: FrameClock,
    bridge: ScoreBridge,
    running: bool,
    frames: u64,
}

impl<G: Lifecycle> LoopDriver<G> {
    pub fn new(game: G, size: Size, device_pixel_ratio: f32, bridge: ScoreBridge) -> Self {
        Self {
            game,
            size,
            device_pixel_ratio,
            clock: FrameClock::new(),
            bridge,
            running: false,
            frames: 0,
        }
    }

    /// Apply the pixel-ratio transform, run `init` and start the clock
    pub fn start(&mut self, ctx: &mut dyn DrawContext, now_ms: f64) {
        ctx.set_scale(self.device_pixel_ratio);
        self.game.init(self.size);
        // Nothing from a previous playthrough should reach the host
        let _ = self.game.take_events();
        self.clock.start(now_ms);
        self.running = true;
        log::info!(
            "Loop started at {}x{} (dpr {})",
            self.size.w,
            self.size.h,
            self.device_pixel_ratio
        );
    }

    /// One display frame: update, forward events, clear, draw.
    /// Returns the simulated dt; does nothing once stopped.
    pub fn frame(&mut self, now_ms: f64, input: &InputState, ctx: &mut dyn DrawContext) -> f32 {
        if !self.running {
            return 0.0;
        }
        let dt = self.clock.tick(now_ms);

        self.game.update(dt, input);
        let events = self.game.take_events();
        self.bridge.forward(&events);

        ctx.clear_rect(0.0, 0.0, self.size.w, self.size.h);
        self.game.draw(ctx);

        self.frames += 1;
        dt
    }

    /// Restart the playthrough without re-running `init`
    pub fn reset(&mut self) {
        self.game.reset();
        let _ = self.game.take_events();
        log::info!("Game reset");
    }

    /// New surface size: reconfigure as if `init` ran again
    pub fn resize(&mut self, size: Size, ctx: &mut dyn DrawContext) {
        self.size = size;
        ctx.set_scale(self.device_pixel_ratio);
        self.game.init(size);
        let _ = self.game.take_events();
    }

    /// Stop accepting frames
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Loop stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Backing-store resolution the host should give the surface
    pub fn backing_size(&self) -> (u32, u32) {
        backing_size(self.size, self.device_pixel_ratio)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandRecorder, DrawCommand};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records what the driver asks of it
    #[derive(Debug, Default)]
    struct Probe {
        inits: Vec<Size>,
        dts: Vec<f32>,
        resets: u32,
        pending: Vec<GameEvent>,
        score: u64,
    }

    impl Lifecycle for Probe {
        fn init(&mut self, size: Size) {
            self.inits.push(size);
        }

        fn update(&mut self, dt: f32, _input: &InputState) {
            self.dts.push(dt);
            self.score += 1;
            self.pending.push(GameEvent::ScoreChanged { score: self.score });
            if self.score == 3 {
                self.pending.push(GameEvent::GameOver { score: 3 });
            }
        }

        fn draw(&self, ctx: &mut dyn DrawContext) {
            ctx.fill_rect(0.0, 0.0, 1.0, 1.0, "#ffffff");
        }

        fn reset(&mut self) {
            self.resets += 1;
            self.score = 0;
        }

        fn score(&self) -> u64 {
            self.score
        }

        fn is_game_over(&self) -> bool {
            self.score >= 3
        }

        fn take_events(&mut self) -> Vec<GameEvent> {
            std::mem::take(&mut self.pending)
        }
    }

    fn driver(bridge: ScoreBridge) -> LoopDriver<Probe> {
        LoopDriver::new(Probe::default(), Size::new(320.0, 180.0), 2.0, bridge)
    }

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(-1.0), 0.0);
        assert_eq!(clamp_dt(0.016), 0.016);
        assert_eq!(clamp_dt(2.5), MAX_FRAME_DT);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
    }

    #[test]
    fn test_frame_clock_measures_since_last_tick() {
        let mut clock = FrameClock::new();
        clock.start(1000.0);
        assert!((clock.tick(1016.0) - 0.016).abs() < 1e-6);
        // Tab switch stall
        assert_eq!(clock.tick(6000.0), MAX_FRAME_DT);
        // Clock went backwards
        assert_eq!(clock.tick(5990.0), 0.0);
    }

    #[test]
    fn test_start_scales_and_inits() {
        let mut d = driver(ScoreBridge::new());
        let mut rec = CommandRecorder::new();
        d.start(&mut rec, 0.0);
        assert_eq!(rec.commands, vec![DrawCommand::SetScale(2.0)]);
        assert_eq!(d.game().inits, vec![Size::new(320.0, 180.0)]);
        assert_eq!(d.backing_size(), (640, 360));
    }

    #[test]
    fn test_frame_updates_then_clears_then_draws() {
        let mut d = driver(ScoreBridge::new());
        let mut rec = CommandRecorder::new();
        d.start(&mut rec, 0.0);
        rec.clear();

        let dt = d.frame(16.0, &InputState::default(), &mut rec);
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(d.game().dts.len(), 1);
        assert_eq!(
            rec.commands[0],
            DrawCommand::Clear {
                x: 0.0,
                y: 0.0,
                w: 320.0,
                h: 180.0
            }
        );
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn test_events_reach_host_callbacks() {
        let scores = Rc::new(RefCell::new(Vec::new()));
        let overs = Rc::new(RefCell::new(Vec::new()));
        let bridge = ScoreBridge::new()
            .on_score_change({
                let scores = scores.clone();
                move |s| scores.borrow_mut().push(s)
            })
            .on_game_over({
                let overs = overs.clone();
                move |s| overs.borrow_mut().push(s)
            });

        let mut d = driver(bridge);
        let mut rec = CommandRecorder::new();
        d.start(&mut rec, 0.0);
        for i in 1..=3 {
            d.frame(i as f64 * 16.0, &InputState::default(), &mut rec);
        }
        assert_eq!(*scores.borrow(), vec![1, 2, 3]);
        assert_eq!(*overs.borrow(), vec![3]);
    }

    #[test]
    fn test_no_frames_before_start_or_after_stop() {
        let mut d = driver(ScoreBridge::new());
        let mut rec = CommandRecorder::new();
        assert_eq!(d.frame(16.0, &InputState::default(), &mut rec), 0.0);
        assert!(rec.is_empty());

        d.start(&mut rec, 0.0);
        d.frame(16.0, &InputState::default(), &mut rec);
        d.stop();
        rec.clear();
        d.frame(32.0, &InputState::default(), &mut rec);
        assert!(rec.is_empty());
        assert_eq!(d.game().dts.len(), 1);
        assert_eq!(d.frames(), 1);
    }

    #[test]
    fn test_reset_does_not_reinit() {
        let mut d = driver(ScoreBridge::new());
        let mut rec = CommandRecorder::new();
        d.start(&mut rec, 0.0);
        d.reset();
        assert_eq!(d.game().resets, 1);
        assert_eq!(d.game().inits.len(), 1);
    }

    #[test]
    fn test_resize_reinits_with_new_size() {
        let mut d = driver(ScoreBridge::new());
        let mut rec = CommandRecorder::new();
        d.start(&mut rec, 0.0);
        d.resize(Size::new(640.0, 360.0), &mut rec);
        assert_eq!(d.game().inits.last(), Some(&Size::new(640.0, 360.0)));
        assert_eq!(d.backing_size(), (1280, 720));
    }
}
