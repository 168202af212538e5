//! Browser entry point.
//!
//! ```js
//! import init, { start } from "./lightway.js";
//! await init();
//! const app = await start("scene", "assets/models/scene.glb");
//! // later
//! app.stop();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, WheelEvent};

use crate::{InputEvent, MouseButton, Options, SceneEngine, StopToken, Viewport};

/// Wheel pixels per zoom step.
const WHEEL_PIXELS_PER_STEP: f32 = 100.0;

type Listener = Closure<dyn FnMut(web_sys::Event)>;

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn browser_window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| js_error("window not available"))
}

/// Viewport from the canvas' CSS size and the device pixel ratio.
fn canvas_viewport(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> Option<Viewport> {
    Viewport::new(
        canvas.client_width().max(0) as u32,
        canvas.client_height().max(0) as u32,
        window.device_pixel_ratio(),
    )
}

/// Size the canvas back-buffer to the viewport's physical size.
fn apply_canvas_size(canvas: &HtmlCanvasElement, viewport: Viewport) {
    let (width, height) = viewport.physical_size();
    canvas.set_width(width);
    canvas.set_height(height);
}

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&js_error(e));
    }
}

struct WebState {
    engine: SceneEngine,
    canvas: HtmlCanvasElement,
    animation_closure: Option<Closure<dyn FnMut()>>,
}

impl WebState {
    /// CSS pixels to the physical pixels the input processor expects.
    fn to_physical(&self, x: i32, y: i32) -> (f32, f32) {
        let ratio = self.engine.viewport().pixel_ratio() as f32;
        (x as f32 * ratio, y as f32 * ratio)
    }

    fn handle_resize(&mut self) {
        let Ok(window) = browser_window() else {
            return;
        };
        match canvas_viewport(&window, &self.canvas) {
            Some(viewport) => {
                apply_canvas_size(&self.canvas, viewport);
                self.engine.resize(viewport);
            }
            None => log::debug!("ignoring zero-sized canvas"),
        }
    }
}

/// Handle to a running scene.
#[wasm_bindgen]
pub struct WebApp {
    state: Rc<RefCell<WebState>>,
    stop: StopToken,
    listeners: Vec<(EventTarget, &'static str, Listener)>,
}

#[wasm_bindgen]
impl WebApp {
    /// Stop the render loop and detach every event listener.
    pub fn stop(&mut self) {
        self.stop.stop();
        for (target, kind, listener) in self.listeners.drain(..) {
            if let Err(e) = target
                .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
            {
                log::warn!("failed to detach {kind} listener: {e:?}");
            }
        }
        log::info!("render loop stopped");
    }

    /// Whether [`stop`](Self::stop) was called.
    #[wasm_bindgen(js_name = isStopped)]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Load progress of the overlay, 0 to 100.
    #[wasm_bindgen(js_name = loadingPercent)]
    pub fn loading_percent(&self) -> u32 {
        self.state.borrow().engine.overlay().percent()
    }
}

/// Start the scene on the canvas with id `canvas_id`, loading the model at
/// `model_url`.
///
/// # Errors
///
/// Rejects if the canvas is missing or has zero size, or if GPU setup
/// fails.
#[wasm_bindgen]
pub async fn start(canvas_id: String, model_url: String) -> Result<WebApp, JsValue> {
    let window = browser_window()?;
    let document = window
        .document()
        .ok_or_else(|| js_error("document not available"))?;
    let canvas = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| js_error(format!("canvas #{canvas_id} not found")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_error(format!("#{canvas_id} is not a canvas")))?;

    let viewport = canvas_viewport(&window, &canvas)
        .ok_or_else(|| js_error(format!("canvas #{canvas_id} has zero size")))?;
    apply_canvas_size(&canvas, viewport);

    let mut options = Options::default();
    options.model.path = model_url;
    let engine = SceneEngine::new(canvas.clone(), viewport, options)
        .await
        .map_err(js_error)?;

    let state = Rc::new(RefCell::new(WebState {
        engine,
        canvas: canvas.clone(),
        animation_closure: None,
    }));
    let stop = StopToken::new();

    let canvas_target: &EventTarget = canvas.as_ref();
    let window_target: &EventTarget = window.as_ref();
    let listeners = vec![
        listen::<MouseEvent>(canvas_target, "mousedown", &state, |s, e| {
            if let Some(button) = MouseButton::from_dom(e.button()) {
                s.engine.handle_input(InputEvent::MouseButton { button, pressed: true });
            }
        })?,
        listen::<MouseEvent>(canvas_target, "mouseup", &state, |s, e| {
            if let Some(button) = MouseButton::from_dom(e.button()) {
                s.engine.handle_input(InputEvent::MouseButton { button, pressed: false });
            }
        })?,
        listen::<MouseEvent>(canvas_target, "mousemove", &state, |s, e| {
            let (x, y) = s.to_physical(e.offset_x(), e.offset_y());
            s.engine.handle_input(InputEvent::ModifiersChanged { shift: e.shift_key() });
            s.engine.handle_input(InputEvent::CursorMoved { x, y });
        })?,
        listen::<WheelEvent>(canvas_target, "wheel", &state, |s, e| {
            e.prevent_default();
            let delta = -(e.delta_y() as f32) / WHEEL_PIXELS_PER_STEP;
            s.engine.handle_input(InputEvent::Scroll { delta });
        })?,
        listen::<MouseEvent>(canvas_target, "contextmenu", &state, |_, e| {
            e.prevent_default();
        })?,
        listen::<web_sys::Event>(window_target, "resize", &state, |s, _| {
            s.handle_resize();
        })?,
    ];

    schedule_frame(&state, &stop)?;
    log::info!("render loop started on #{canvas_id}");

    Ok(WebApp {
        state,
        stop,
        listeners,
    })
}

fn listen<E: JsCast + 'static>(
    target: &EventTarget,
    kind: &'static str,
    state: &Rc<RefCell<WebState>>,
    mut handler: impl FnMut(&mut WebState, E) + 'static,
) -> Result<(EventTarget, &'static str, Listener), JsValue> {
    let state = Rc::clone(state);
    let callback: Box<dyn FnMut(web_sys::Event)> = Box::new(move |event: web_sys::Event| {
        let Ok(event) = event.dyn_into::<E>() else {
            return;
        };
        if let Ok(mut state) = state.try_borrow_mut() {
            handler(&mut state, event);
        }
    });
    let closure = Closure::wrap(callback);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    Ok((target.clone(), kind, closure))
}

fn schedule_frame(state: &Rc<RefCell<WebState>>, stop: &StopToken) -> Result<(), JsValue> {
    let window = browser_window()?;
    let next_state = Rc::clone(state);
    let next_stop = stop.clone();

    let callback: Box<dyn FnMut()> = Box::new(move || {
        if next_stop.is_stopped() {
            return;
        }
        next_state.borrow_mut().engine.frame();
        if let Err(e) = schedule_frame(&next_state, &next_stop) {
            log::error!("failed to schedule frame: {e:?}");
        }
    });
    let closure = Closure::wrap(callback);

    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    state.borrow_mut().animation_closure = Some(closure);
    Ok(())
}
