//! Standalone window backed by winit.
//!
//! ```no_run
//! # use skyline::viewer::Viewer;
//! Viewer::builder()
//!     .with_title("Skyline")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    engine::CityEngine,
    error::SkylineError,
    gpu::render_context::RenderContext,
    input::{InputEvent, MouseButton},
    options::Options,
};

/// Pixel scroll deltas are this many times larger than line deltas.
const PIXEL_SCROLL_SCALE: f32 = 0.01;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: Option<String>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: None,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title. Defaults to `options.display.title`.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let options = self.options.unwrap_or_default();
        let title = self
            .title
            .unwrap_or_else(|| options.display.title.clone());
        Viewer { options, title }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window showing the city scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Viewer`] if the event loop cannot be created
    /// or exits abnormally, or the first setup error if the engine failed
    /// to start.
    pub fn run(self) -> Result<(), SkylineError> {
        let event_loop = EventLoop::new()
            .map_err(|e| SkylineError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            options: Some(self.options),
            title: self.title,
            setup_error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| SkylineError::Viewer(e.to_string()))?;
        app.setup_error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<CityEngine>,
    options: Option<Options>,
    title: String,
    setup_error: Option<SkylineError>,
}

/// Backing (physical pixel) size of the canvas, never zero.
fn backing_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn create_engine(
        &mut self,
        window: &Arc<Window>,
    ) -> Result<CityEngine, SkylineError> {
        let mut context = pollster::block_on(RenderContext::new(
            Arc::clone(window),
            backing_size(window.inner_size()),
        ))?;
        context.set_scale_factor(window.scale_factor());
        CityEngine::new(context, self.options.take().unwrap_or_default())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SkylineError) {
        log::error!("{error}");
        self.setup_error = Some(error);
        event_loop.exit();
    }

    fn resize_to_window(&mut self) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };
        let (width, height) = backing_size(window.inner_size());
        if let Err(e) = engine.resize(width, height) {
            log::error!("resize to {width}x{height} failed: {e}");
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let display = self
            .options
            .as_ref()
            .map(|o| o.display.clone())
            .unwrap_or_default();
        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                display.width,
                display.height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, SkylineError::Viewer(e.to_string()));
                return;
            }
        };

        match self.create_engine(&window) {
            Ok(engine) => {
                window.request_redraw();
                self.window = Some(window);
                self.engine = Some(engine);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };

        match event {
            WindowEvent::Resized(_) => self.resize_to_window(),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                engine.set_scale_factor(scale_factor);
                self.resize_to_window();
            }

            WindowEvent::RedrawRequested => {
                match engine.render() {
                    Ok(()) => {}
                    Err(
                        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost,
                    ) => self.resize_to_window(),
                    Err(e) => log::error!("render error: {e:?}"),
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                engine.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical =
                    position.to_logical::<f32>(window.scale_factor());
                engine.handle_input(InputEvent::CursorMoved {
                    x: logical.x,
                    y: logical.y,
                });
            }

            WindowEvent::CursorLeft { .. } => {
                engine.handle_input(InputEvent::CursorLeft);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => {
                        pos.y as f32 * PIXEL_SCROLL_SCALE
                    }
                };
                engine.handle_input(InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                engine.handle_input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    event_loop.exit();
                }
            }

            _ => (),
        }
    }
}
