//! Browser host
//!
//! Binds one `LoopDriver` to a canvas element: sizes the backing store for
//! the pixel ratio, feeds DOM keyboard/pointer events through the input
//! adapter, and chains `requestAnimationFrame`. Everything it installs is
//! torn down again by `detach` (or by dropping the host).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, PointerEvent,
    Window,
};

use crate::driver::{LoopDriver, ScoreBridge};
use crate::error::HostError;
use crate::input::InputState;
use crate::renderer::{CanvasContext, Size, backing_size};
use crate::settings::GameOptions;
use crate::sim::{GameKind, Lifecycle, MiniGame};

/// DOM listener that unregisters itself when dropped
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, HostError> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// State shared between the host handle and its DOM callbacks
struct Shared {
    window: Window,
    canvas: HtmlCanvasElement,
    driver: RefCell<LoopDriver>,
    ctx: RefCell<CanvasContext>,
    input: Cell<InputState>,
    raf_id: Cell<Option<i32>>,
    frame_cb: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    detached: Cell<bool>,
}

impl Shared {
    fn request_frame(&self) {
        if self.detached.get() {
            return;
        }
        let cb = self.frame_cb.borrow();
        let Some(cb) = cb.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
        {
            Ok(id) => self.raf_id.set(Some(id)),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn on_frame(&self, now_ms: f64) {
        self.raf_id.set(None);
        if self.detached.get() {
            return;
        }
        let input = self.input.get();
        {
            let mut driver = self.driver.borrow_mut();
            let mut ctx = self.ctx.borrow_mut();
            driver.frame(now_ms, &input, &mut *ctx);
        }
        self.request_frame();
    }

    fn update_input(&self, f: impl FnOnce(&mut InputState) -> bool) -> bool {
        let mut input = self.input.get();
        let handled = f(&mut input);
        self.input.set(input);
        handled
    }
}

/// A running game attached to a canvas
pub struct WebHost {
    shared: Rc<Shared>,
    listeners: Vec<Listener>,
}

impl WebHost {
    /// Build the simulation for `options`, size the canvas and start the
    /// frame loop. Nothing is left installed if this fails.
    pub fn attach(
        canvas: HtmlCanvasElement,
        options: &GameOptions,
        bridge: ScoreBridge,
    ) -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(HostError::NoContext)?
            .dyn_into()
            .map_err(|_| HostError::NoContext)?;

        let size = options.size();
        let dpr = options.effective_device_pixel_ratio();
        let seed = options.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let driver = LoopDriver::new(MiniGame::new(options.game, size, seed), size, dpr, bridge);
        let (backing_w, backing_h) = driver.backing_size();
        size_canvas(&canvas, size, (backing_w, backing_h))?;

        let shared = Rc::new(Shared {
            window: window.clone(),
            canvas: canvas.clone(),
            driver: RefCell::new(driver),
            ctx: RefCell::new(CanvasContext::new(ctx)),
            input: Cell::new(InputState::default()),
            raf_id: Cell::new(None),
            frame_cb: RefCell::new(None),
            detached: Cell::new(false),
        });

        let mut host = Self {
            shared,
            listeners: Vec::new(),
        };
        host.install_listeners()?;

        let weak = Rc::downgrade(&host.shared);
        *host.shared.frame_cb.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(
            move |now_ms: f64| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_frame(now_ms);
                }
            },
        ));

        let now_ms = window.performance().map(|p| p.now()).unwrap_or(0.0);
        {
            let shared = &host.shared;
            shared
                .driver
                .borrow_mut()
                .start(&mut *shared.ctx.borrow_mut(), now_ms);
        }
        host.shared.request_frame();

        log::info!(
            "Attached {} ({}x{} backing store)",
            options.game,
            backing_w,
            backing_h
        );
        Ok(host)
    }

    fn install_listeners(&mut self) -> Result<(), HostError> {
        let window: &EventTarget = self.shared.window.as_ref();
        let canvas: &EventTarget = self.shared.canvas.as_ref();

        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let weak = Rc::downgrade(&self.shared);
            self.listeners.push(Listener::new(window, kind, move |event| {
                key_event(&weak, &event, pressed);
            })?);
        }

        let weak = Rc::downgrade(&self.shared);
        self.listeners
            .push(Listener::new(canvas, "pointerdown", move |event| {
                pointer_down(&weak, &event);
            })?);

        for kind in ["pointerup", "pointercancel"] {
            let weak = Rc::downgrade(&self.shared);
            self.listeners.push(Listener::new(window, kind, move |_event| {
                if let Some(shared) = weak.upgrade() {
                    shared.update_input(|input| {
                        input.pointer_up();
                        true
                    });
                }
            })?);
        }
        Ok(())
    }

    /// Start a fresh playthrough of the same game
    pub fn reset(&self) {
        self.shared.driver.borrow_mut().reset();
        self.shared.input.set(InputState::default());
    }

    /// New logical size: resize the backing store and re-run `init`
    pub fn resize(&self, size: Size) -> Result<(), HostError> {
        let shared = &self.shared;
        let mut driver = shared.driver.borrow_mut();
        let backing = backing_size(size, driver.device_pixel_ratio());
        // Resizing the canvas resets its transform; `resize` reapplies it
        size_canvas(&shared.canvas, size, backing)?;
        driver.resize(size, &mut *shared.ctx.borrow_mut());
        shared.input.set(InputState::default());
        log::info!("Resized to {}x{} ({}x{} backing store)", size.w, size.h, backing.0, backing.1);
        Ok(())
    }

    pub fn kind(&self) -> GameKind {
        self.shared.driver.borrow().game().kind()
    }

    pub fn score(&self) -> u64 {
        self.shared.driver.borrow().game().score()
    }

    pub fn is_game_over(&self) -> bool {
        self.shared.driver.borrow().game().is_game_over()
    }

    pub fn is_attached(&self) -> bool {
        !self.shared.detached.get()
    }

    /// Cancel the pending frame, drop every listener and stop the driver.
    /// Safe to call more than once.
    pub fn detach(&mut self) {
        if self.shared.detached.replace(true) {
            return;
        }
        if let Some(id) = self.shared.raf_id.take() {
            let _ = self.shared.window.cancel_animation_frame(id);
        }
        self.shared.frame_cb.borrow_mut().take();
        self.listeners.clear();
        self.shared.driver.borrow_mut().stop();
        log::info!("Detached from canvas");
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Backing store in device pixels, CSS box in logical pixels
fn size_canvas(
    canvas: &HtmlCanvasElement,
    size: Size,
    (backing_w, backing_h): (u32, u32),
) -> Result<(), HostError> {
    canvas.set_width(backing_w);
    canvas.set_height(backing_h);
    let style = canvas.style();
    style.set_property("width", &format!("{}px", size.w))?;
    style.set_property("height", &format!("{}px", size.h))?;
    Ok(())
}

fn key_event(shared: &Weak<Shared>, event: &Event, pressed: bool) {
    let (Some(shared), Some(key)) = (shared.upgrade(), event.dyn_ref::<KeyboardEvent>()) else {
        return;
    };
    if shared.update_input(|input| input.apply_key(&key.code(), pressed)) {
        // Keep arrows and space from scrolling the page
        event.prevent_default();
    }
}

fn pointer_down(shared: &Weak<Shared>, event: &Event) {
    let (Some(shared), Some(pointer)) = (shared.upgrade(), event.dyn_ref::<PointerEvent>()) else {
        return;
    };
    let rect = shared.canvas.get_bounding_client_rect();
    let x = (pointer.client_x() as f64 - rect.left()) as f32;
    let y = (pointer.client_y() as f64 - rect.top()) as f32;
    let (w, h) = (rect.width() as f32, rect.height() as f32);
    shared.update_input(|input| {
        input.pointer_down(x, y, w, h);
        true
    });
    event.prevent_default();
}
