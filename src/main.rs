//! Mini Arcade entry point
//!
//! Browser: attaches a game to `#canvas` and wires the HUD around it.
//! Native: runs a game headless with scripted input and logs the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use mini_arcade::consts::CANVAS_ID;
    use mini_arcade::settings::CONTROLS_HINT;
    use mini_arcade::web::WebHost;
    use mini_arcade::{GameKind, GameOptions, HighScore, HostError, OptionsChange, ScoreBridge};

    /// The attached game plus the page chrome state around it
    struct App {
        options: GameOptions,
        high: Rc<RefCell<HighScore>>,
        host: WebHost,
    }

    thread_local! {
        static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    }

    fn page_document() -> Result<Document, HostError> {
        web_sys::window()
            .ok_or(HostError::NoWindow)?
            .document()
            .ok_or(HostError::NoDocument)
    }

    fn find_canvas(document: &Document) -> Result<HtmlCanvasElement, HostError> {
        document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| HostError::CanvasNotFound(CANVAS_ID.to_string()))?
            .dyn_into()
            .map_err(|_| HostError::CanvasNotFound(CANVAS_ID.to_string()))
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// The page's pixel ratio always wins over whatever the options say
    fn with_window_dpr(mut options: GameOptions) -> GameOptions {
        if let Some(window) = web_sys::window() {
            options.device_pixel_ratio = window.device_pixel_ratio() as f32;
        }
        options
    }

    /// Options from the canvas element: `data-options` JSON, then `data-game`
    fn read_options(canvas: &HtmlCanvasElement) -> Result<GameOptions, HostError> {
        let mut options = match canvas.get_attribute("data-options") {
            Some(json) => GameOptions::from_json(&json)?,
            None => GameOptions::default(),
        };
        if let Some(name) = canvas.get_attribute("data-game") {
            options.game = GameKind::from_name(&name).ok_or(HostError::UnknownGame(name))?;
        }
        Ok(with_window_dpr(options))
    }

    /// Title, hint and HUD visibility; everything that changes without a rebuild
    fn apply_chrome(document: &Document, options: &GameOptions, best: u64) {
        set_text(document, "hud-title", options.title());
        set_text(document, "hud-high", &best.to_string());
        set_text(document, "controls-hint", CONTROLS_HINT);
        set_visible(document, "hud", options.show_hud);
        set_visible(document, "hud-high", options.high_score_key.is_some());
        set_visible(document, "controls-hint", options.show_controls_hint);
    }

    /// Fresh playthrough on screen: zero score, overlay hidden
    fn clear_playthrough(document: &Document) {
        set_text(document, "hud-score", "0");
        set_visible(document, "game-over", false);
    }

    fn build(options: GameOptions) -> Result<App, HostError> {
        let document = page_document()?;
        let canvas = find_canvas(&document)?;

        let high = Rc::new(RefCell::new(HighScore::load(
            options.high_score_key.clone(),
        )));
        apply_chrome(&document, &options, high.borrow().best());
        clear_playthrough(&document);

        let bridge = ScoreBridge::new()
            .on_score_change({
                let document = document.clone();
                move |score| set_text(&document, "hud-score", &score.to_string())
            })
            .on_game_over({
                let document = document.clone();
                let high = high.clone();
                move |score| {
                    let mut high = high.borrow_mut();
                    if high.record(score) {
                        set_text(&document, "hud-high", &high.best().to_string());
                    }
                    set_text(&document, "final-score", &score.to_string());
                    set_visible(&document, "game-over", true);
                }
            });

        let host = WebHost::attach(canvas, &options, bridge)?;
        Ok(App {
            options,
            high,
            host,
        })
    }

    fn setup_reset_button(document: &Document) {
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                APP.with(|app| {
                    if let Some(app) = app.borrow().as_ref() {
                        app.host.reset();
                    }
                });
                if let Ok(document) = page_document() {
                    clear_playthrough(&document);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start() -> Result<(), HostError> {
        let document = page_document()?;
        let options = read_options(&find_canvas(&document)?)?;
        let app = build(options)?;
        APP.with(|slot| *slot.borrow_mut() = Some(app));
        setup_reset_button(&document);
        Ok(())
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Mini Arcade starting...");
        if let Err(e) = start() {
            log::warn!("Game not started: {}", e);
        }
    }

    /// Move the page to `next`: rebuild on an identity change, re-init on a
    /// size change, otherwise just refresh the chrome.
    fn apply(next: GameOptions) -> Result<(), HostError> {
        let next = with_window_dpr(next);
        let current = APP.with(|slot| slot.borrow_mut().take());

        let Some(mut app) = current.filter(|app| app.host.is_attached()) else {
            let app = build(next)?;
            APP.with(|slot| *slot.borrow_mut() = Some(app));
            return Ok(());
        };

        let change = app.options.change_to(&next);
        let result = match change {
            OptionsChange::Unchanged => Ok(()),
            OptionsChange::InPlace => page_document()
                .map(|document| apply_chrome(&document, &next, app.high.borrow().best())),
            OptionsChange::Resize(size) => app.host.resize(size).map(|()| {
                if let Ok(document) = page_document() {
                    apply_chrome(&document, &next, app.high.borrow().best());
                    clear_playthrough(&document);
                }
            }),
            OptionsChange::Rebuild => {
                // Old host detaches on drop before the new one attaches
                drop(app);
                let app = build(next)?;
                APP.with(|slot| *slot.borrow_mut() = Some(app));
                return Ok(());
            }
        };

        if change != OptionsChange::Unchanged {
            log::info!("Reconfigured {} ({:?})", app.host.kind(), change);
        }
        app.options = next;
        APP.with(|slot| *slot.borrow_mut() = Some(app));
        result
    }

    /// Switch the page to another game, keeping every other option
    #[wasm_bindgen]
    pub fn select_game(name: &str) {
        let Some(kind) = GameKind::from_name(name) else {
            log::warn!("{}", HostError::UnknownGame(name.to_string()));
            return;
        };
        // Without a running game, start from what the canvas element asks for
        let options = APP
            .with(|slot| slot.borrow().as_ref().map(|app| app.options.clone()))
            .or_else(|| {
                let document = page_document().ok()?;
                read_options(&find_canvas(&document).ok()?).ok()
            })
            .unwrap_or_default();
        if let Err(e) = apply(GameOptions {
            game: kind,
            ..options
        }) {
            log::warn!("Could not switch to {}: {}", kind, e);
        }
    }

    /// Replace the page's options with a full options JSON object
    #[wasm_bindgen]
    pub fn configure(options_json: &str) {
        let result = GameOptions::from_json(options_json).and_then(apply);
        if let Err(e) = result {
            log::warn!("Options not applied: {}", e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mini Arcade (native) starting...");

    if let Err(e) = headless::run(std::env::args().skip(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use mini_arcade::renderer::CommandRecorder;
    use mini_arcade::{
        GameKind, GameOptions, HighScore, HostError, InputState, Lifecycle, LoopDriver, MiniGame,
        ScoreBridge,
    };

    const DEFAULT_FRAMES: u64 = 600;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Deterministic stand-in for a player: taps action, sweeps left/right
    /// and occasionally holds up.
    fn scripted_input(frame: u64) -> InputState {
        InputState {
            left: (frame / 90) % 2 == 0,
            right: (frame / 90) % 2 == 1,
            up: (frame / 45) % 4 == 0,
            down: false,
            action: frame % 30 < 3,
        }
    }

    /// `mini-arcade [game] [frames]`
    pub fn run(mut args: impl Iterator<Item = String>) -> Result<(), HostError> {
        let game = match args.next() {
            Some(name) => GameKind::from_name(&name).ok_or(HostError::UnknownGame(name))?,
            None => GameKind::Runner,
        };
        let frames = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FRAMES);

        let options = GameOptions {
            high_score_key: Some(format!("mini-arcade-{}", game)),
            seed: Some(7),
            ..GameOptions::for_game(game)
        };

        let high = Rc::new(RefCell::new(HighScore::load(
            options.high_score_key.clone(),
        )));
        let games_played = Rc::new(RefCell::new(0u32));
        let bridge = ScoreBridge::new().on_game_over({
            let high = high.clone();
            let games_played = games_played.clone();
            move |score| {
                *games_played.borrow_mut() += 1;
                if high.borrow_mut().record(score) {
                    log::info!("New best: {}", score);
                }
            }
        });

        let size = options.size();
        let seed = options.seed.unwrap_or_default();
        let mut driver = LoopDriver::new(
            MiniGame::new(options.game, size, seed),
            size,
            options.effective_device_pixel_ratio(),
            bridge,
        );
        let mut recorder = CommandRecorder::new();
        driver.start(&mut recorder, 0.0);

        for frame in 1..=frames {
            recorder.clear();
            driver.frame(frame as f64 * FRAME_MS, &scripted_input(frame), &mut recorder);
            if driver.game().is_game_over() {
                driver.reset();
            }
        }
        driver.stop();

        log::info!(
            "{}: {} frames, {} games over, best {}, last frame drew {} commands",
            options.title(),
            driver.frames(),
            games_played.borrow(),
            high.borrow().best(),
            recorder.len()
        );
        println!(
            "{} best score after {} frames: {}",
            options.title(),
            frames,
            high.borrow().best()
        );
        Ok(())
    }
}
