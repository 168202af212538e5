//! Standalone window backed by winit.
//!
//! ```no_run
//! # use lightway::Viewer;
//! Viewer::builder()
//!     .with_model("assets/models/scene.glb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    error::LightwayError, frame_loop::StopToken, options::Options, InputEvent,
    MouseButton, SceneEngine, Viewport,
};

/// Fraction of the monitor covered by the initial window.
const INITIAL_MONITOR_FRACTION: f64 = 0.75;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    model: Option<String>,
    options: Option<Options>,
    title: String,
    stop: StopToken,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            model: None,
            options: None,
            title: "Lightway".into(),
            stop: StopToken::new(),
        }
    }

    /// Override the model path from the options.
    #[must_use]
    pub fn with_model(mut self, path: impl Into<String>) -> Self {
        self.model = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Use an externally owned stop token.
    #[must_use]
    pub fn with_stop_token(mut self, stop: StopToken) -> Self {
        self.stop = stop;
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let mut options = self.options.unwrap_or_default();
        if let Some(model) = self.model {
            options.model.path = model;
        }
        Viewer {
            options,
            title: self.title,
            stop: self.stop,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the light-tunnel scene.
pub struct Viewer {
    options: Options,
    title: String,
    stop: StopToken,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// A token that closes the window when stopped.
    #[must_use]
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed or the stop token fires.
    pub fn run(self) -> Result<(), LightwayError> {
        let event_loop =
            EventLoop::new().map_err(|e| LightwayError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            options: Some(self.options),
            title: self.title,
            stop: self.stop,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| LightwayError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<SceneEngine>,
    options: Option<Options>,
    title: String,
    stop: StopToken,
}

impl ViewerApp {
    fn forward(&mut self, event: InputEvent) {
        if let Some(engine) = &mut self.engine {
            engine.handle_input(event);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(options) = self.options.take() else {
            return;
        };

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = f64::from(mon_size.width) / scale * INITIAL_MONITOR_FRACTION;
            let logical_h = f64::from(mon_size.height) / scale * INITIAL_MONITOR_FRACTION;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(logical_w, logical_h))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let Some(viewport) =
            Viewport::from_physical(inner.width, inner.height, window.scale_factor())
        else {
            log::error!("window has zero size ({}x{})", inner.width, inner.height);
            event_loop.exit();
            return;
        };

        let engine = match pollster::block_on(SceneEngine::new(
            window.clone(),
            viewport,
            options,
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.stop.stop();
        }
        if self.stop.is_stopped() {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                if let Some(engine) = &mut self.engine {
                    if let Err(e) = engine.resize_physical(size.width, size.height, scale) {
                        log::debug!("ignoring resize: {e}");
                    }
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let (Some(engine), Some(window)) = (&mut self.engine, &self.window) {
                    let inner = window.inner_size();
                    if let Err(e) =
                        engine.resize_physical(inner.width, inner.height, scale_factor)
                    {
                        log::debug!("ignoring scale change: {e}");
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(engine) = &mut self.engine {
                    engine.frame();
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.forward(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.forward(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.forward(InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.forward(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.stop.is_stopped() {
            event_loop.exit();
        }
    }
}
