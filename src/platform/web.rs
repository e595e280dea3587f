//! Browser glue
//!
//! Mounts the game on a canvas, wires DOM input into `InputState`, drives
//! the frame loop from `requestAnimationFrame` and reports to JS through
//! plain function callbacks.
//!
//! Host callbacks are queued while the game is borrowed and delivered after
//! the frame, so JS may call back into the handle (including `close`) from
//! inside them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

use super::BEST_SCORE_KEY;
use crate::best_score::{ScoreStore, parse_best};
use crate::driver::{Game, GameHost};
use crate::input::{InputState, Key, is_start_key};
use crate::renderer::RenderState;
use crate::tuning::Tuning;

/// Best score persisted in LocalStorage
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl ScoreStore for LocalStorageStore {
    fn load(&self) -> u64 {
        Self::storage()
            .and_then(|s| s.get_item(BEST_SCORE_KEY).ok().flatten())
            .map(|raw| parse_best(&raw))
            .unwrap_or(0)
    }

    fn store(&mut self, best: u64) {
        match Self::storage() {
            Some(storage) => {
                if let Err(e) = storage.set_item(BEST_SCORE_KEY, &best.to_string()) {
                    log::warn!("Failed to save best score: {:?}", e);
                }
            }
            None => log::warn!("LocalStorage unavailable, best score not saved"),
        }
    }
}

/// A host notification waiting for delivery to JS
#[derive(Debug, Clone, Copy)]
enum Notice {
    Score(u64),
    GameOver { score: u64, elapsed_secs: f64 },
}

/// Host that queues notifications until the frame is done
#[derive(Debug, Default)]
pub struct JsHost {
    pending: Vec<Notice>,
}

impl JsHost {
    fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

impl GameHost for JsHost {
    fn score_changed(&mut self, score: u64) {
        self.pending.push(Notice::Score(score));
    }

    fn game_over(&mut self, score: u64, elapsed_secs: f64) {
        self.pending.push(Notice::GameOver {
            score,
            elapsed_secs,
        });
    }
}

/// JS functions registered by the page
#[derive(Clone, Default)]
struct Callbacks {
    on_score: Option<js_sys::Function>,
    on_game_over: Option<js_sys::Function>,
}

impl Callbacks {
    fn notify(&self, notices: &[Notice]) {
        for notice in notices {
            let result = match *notice {
                Notice::Score(score) => self
                    .on_score
                    .as_ref()
                    .map(|f| f.call1(&JsValue::NULL, &JsValue::from_f64(score as f64))),
                Notice::GameOver {
                    score,
                    elapsed_secs,
                } => self.on_game_over.as_ref().map(|f| {
                    f.call2(
                        &JsValue::NULL,
                        &JsValue::from_f64(score as f64),
                        &JsValue::from_f64(elapsed_secs),
                    )
                }),
            };
            if let Some(Err(e)) = result {
                log::warn!("Host callback threw: {:?}", e);
            }
        }
    }
}

/// State shared between listeners and the frame callback
struct Shared {
    game: Game<JsHost, LocalStorageStore>,
    input: InputState,
    canvas: HtmlCanvasElement,
    render: Option<RenderState>,
}

impl Shared {
    /// Match the playfield and backing store to the canvas' current box
    fn measure(&mut self) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let css_w = self.canvas.client_width().max(0);
        let css_h = self.canvas.client_height().max(0);
        self.game.resize(css_w as f32, css_h as f32);

        let width = (css_w as f64 * dpr) as u32;
        let height = (css_h as f64 * dpr) as u32;
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) != (self.canvas.width(), self.canvas.height()) {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(render) = self.render.as_mut() {
                render.resize(width, height);
            }
        }
    }

    fn frame(&mut self, now_ms: f64) {
        self.measure();

        let Some(vertices) = self.game.frame(now_ms, &mut self.input) else {
            return;
        };
        let Some(render) = self.render.as_mut() else {
            return;
        };

        let field = self.game.state.playfield;
        match render.render(&vertices, (field.width, field.height)) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::info!("Surface lost, reconfiguring");
                render.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }

    fn pointer_at(&mut self, client_x: i32, client_y: i32) {
        let rect = self.canvas.get_bounding_client_rect();
        self.input.follow = Some(Vec2::new(
            (client_x as f64 - rect.left()) as f32,
            (client_y as f64 - rect.top()) as f32,
        ));
    }
}

/// A registered DOM listener, removed again on drop
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

fn listen<E, F>(
    target: &EventTarget,
    kind: &'static str,
    shared: &Rc<RefCell<Shared>>,
    mut handler: F,
) -> Result<Listener, JsValue>
where
    E: JsCast + 'static,
    F: FnMut(&mut Shared, &E) + 'static,
{
    let shared = Rc::clone(shared);
    let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
        let Some(event) = event.dyn_ref::<E>() else {
            return;
        };
        if let Ok(mut shared) = shared.try_borrow_mut() {
            handler(&mut *shared, event);
        }
    });
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    Ok(Listener {
        target: target.clone(),
        kind,
        closure,
    })
}

fn register_listeners(
    canvas: &HtmlCanvasElement,
    shared: &Rc<RefCell<Shared>>,
) -> Result<Vec<Listener>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let window: EventTarget = window.into();
    let canvas: EventTarget = canvas.clone().into();

    Ok(vec![
        // Keyboard
        listen(&window, "keydown", shared, |s, event: &KeyboardEvent| {
            let key = event.key();
            if is_start_key(&key) {
                s.input.start = true;
                event.prevent_default();
            } else if let Some(k) = Key::from_dom(&key) {
                s.input.set_key(k, true);
                event.prevent_default();
            } else if key.eq_ignore_ascii_case("i") && !event.repeat() {
                s.input.demo = !s.input.demo;
                if !s.input.demo {
                    s.input.follow = None;
                }
                log::info!("Demo mode {}", if s.input.demo { "on" } else { "off" });
            }
        })?,
        listen(&window, "keyup", shared, |s, event: &KeyboardEvent| {
            if let Some(k) = Key::from_dom(&event.key()) {
                s.input.set_key(k, false);
            }
        })?,
        // Held keys are lost when focus leaves
        listen(&window, "blur", shared, |s, _: &web_sys::Event| {
            s.input.clear();
        })?,
        // Mouse
        listen(&canvas, "mousemove", shared, |s, event: &MouseEvent| {
            s.pointer_at(event.client_x(), event.client_y());
        })?,
        listen(&canvas, "mousedown", shared, |s, event: &MouseEvent| {
            s.input.start = true;
            s.pointer_at(event.client_x(), event.client_y());
        })?,
        listen(&canvas, "mouseleave", shared, |s, _: &MouseEvent| {
            s.input.follow = None;
        })?,
        // Touch
        listen(&canvas, "touchstart", shared, |s, event: &TouchEvent| {
            s.input.start = true;
            if let Some(touch) = event.touches().get(0) {
                s.pointer_at(touch.client_x(), touch.client_y());
            }
            event.prevent_default();
        })?,
        listen(&canvas, "touchmove", shared, |s, event: &TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                s.pointer_at(touch.client_x(), touch.client_y());
            }
            event.prevent_default();
        })?,
        listen(&canvas, "touchend", shared, |s, event: &TouchEvent| {
            if event.touches().length() == 0 {
                s.input.follow = None;
            }
        })?,
    ])
}

/// Self-rescheduling animation frame callback
struct FrameLoop {
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(
        shared: Rc<RefCell<Shared>>,
        callbacks: Rc<RefCell<Callbacks>>,
        open: Rc<Cell<bool>>,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let next = Rc::clone(&callback);
        let next_handle = Rc::clone(&handle);
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |now_ms: f64| {
            next_handle.set(None);

            let notices = {
                let mut shared = shared.borrow_mut();
                shared.frame(now_ms);
                shared.game.host_mut().drain()
            };
            let callbacks = callbacks.borrow().clone();
            callbacks.notify(&notices);

            // A callback may have closed the view
            if !open.get() {
                return;
            }
            if let Some(cb) = next.borrow().as_ref() {
                match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => next_handle.set(Some(id)),
                    Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }));

        let id = match callback.borrow().as_ref() {
            Some(cb) => window.request_animation_frame(cb.as_ref().unchecked_ref())?,
            None => return Err(JsValue::from_str("frame callback missing")),
        };
        handle.set(Some(id));

        Ok(Self { callback, handle })
    }

    fn stop(self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        // Breaks the closure's reference to itself
        self.callback.borrow_mut().take();
    }
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct VendangeGame {
    shared: Rc<RefCell<Shared>>,
    callbacks: Rc<RefCell<Callbacks>>,
    open: Rc<Cell<bool>>,
    listeners: Vec<Listener>,
    frame_loop: Option<FrameLoop>,
}

#[wasm_bindgen]
impl VendangeGame {
    /// Mount on the canvas with id `canvas_id` and set up WebGPU.
    /// The view stays idle until `open` is called.
    pub async fn create(canvas_id: String) -> Result<VendangeGame, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(&canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width().max(0) as f64 * dpr) as u32;
        let height = (canvas.client_height().max(0) as f64 * dpr) as u32;
        if width > 0 && height > 0 {
            canvas.set_width(width);
            canvas.set_height(height);
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get device: {e}")))?;

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, Tuning::load(), JsHost::default(), LocalStorageStore);
        log::info!("Game initialized with seed: {}", seed);

        Ok(VendangeGame {
            shared: Rc::new(RefCell::new(Shared {
                game,
                input: InputState::default(),
                canvas,
                render: Some(render),
            })),
            callbacks: Rc::new(RefCell::new(Callbacks::default())),
            open: Rc::new(Cell::new(false)),
            listeners: Vec::new(),
            frame_loop: None,
        })
    }

    /// Register input listeners and start scheduling frames
    pub fn open(&mut self) -> Result<(), JsValue> {
        if self.open.get() {
            return Ok(());
        }
        let canvas = self.shared.borrow().canvas.clone();
        self.listeners = register_listeners(&canvas, &self.shared)?;
        self.open.set(true);
        match FrameLoop::start(
            Rc::clone(&self.shared),
            Rc::clone(&self.callbacks),
            Rc::clone(&self.open),
        ) {
            Ok(frame_loop) => self.frame_loop = Some(frame_loop),
            Err(e) => {
                self.close();
                return Err(e);
            }
        }
        log::info!("View opened");
        Ok(())
    }

    /// Cancel the pending frame and remove every listener
    pub fn close(&mut self) {
        self.open.set(false);
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
        self.listeners.clear();
        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            shared.input.clear();
        }
        log::info!("View closed");
    }

    /// Called with the score whenever it changes
    pub fn on_score(&mut self, callback: js_sys::Function) {
        self.callbacks.borrow_mut().on_score = Some(callback);
    }

    /// Called once per session with `(score, elapsedSeconds)`
    pub fn on_game_over(&mut self, callback: js_sys::Function) {
        self.callbacks.borrow_mut().on_game_over = Some(callback);
    }

    /// Request a new session on the next frame
    pub fn start(&self) {
        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            shared.input.start = true;
        }
    }

    /// Return to the title screen
    pub fn reset(&self) {
        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            shared.game.reset_to_start();
        }
    }

    pub fn set_demo(&self, on: bool) {
        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            shared.input.demo = on;
            if !on {
                shared.input.follow = None;
            }
        }
    }

    #[wasm_bindgen(getter)]
    pub fn best_score(&self) -> f64 {
        self.shared
            .try_borrow()
            .map(|s| s.game.best_score() as f64)
            .unwrap_or(0.0)
    }

    /// Whether the last finished session set a new best score
    #[wasm_bindgen(getter)]
    pub fn new_record(&self) -> bool {
        self.shared
            .try_borrow()
            .map(|s| s.game.new_record())
            .unwrap_or(false)
    }
}

impl Drop for VendangeGame {
    fn drop(&mut self) {
        if self.open.get() {
            self.close();
        }
    }
}

/// Module init: logging and panic reporting
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logger init failed: {e}")));
    }
}
