//! Standalone visualization window backed by winit.
//!
//! ```no_run
//! # use molvis::Viewer;
//! Viewer::builder()
//!     .with_path("assets/molecules/caffeine.json")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    error::MolvisError, options::Options, AtomicCoordinates, InputEvent,
    InputProcessor, MolvisEngine, MouseButton, PickEvent,
};

/// Molecule shown when no path is given.
const DEFAULT_MOLECULE: &str =
    include_str!("../assets/molecules/caffeine.json");

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    path: Option<PathBuf>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            path: None,
            options: None,
            title: "Molvis".into(),
        }
    }

    /// Set the coordinates file (JSON `AtomicCoordinates`).
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
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

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            path: self.path,
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A desktop window showing one molecule.
pub struct Viewer {
    path: Option<PathBuf>,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start building a viewer.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or parsed, if the event
    /// loop fails, or if the engine hit a fatal error while running.
    pub fn run(self) -> Result<(), MolvisError> {
        let data = match &self.path {
            Some(path) => load_coordinates(path)?,
            None => AtomicCoordinates::from_json(DEFAULT_MOLECULE)?,
        };

        let event_loop =
            EventLoop::new().map_err(|e| MolvisError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            input: InputProcessor::new(&self.options),
            data: Some(data),
            options: self.options,
            title: self.title,
            fatal: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| MolvisError::Viewer(e.to_string()))?;
        app.fatal.map_or(Ok(()), Err)
    }
}

/// Read and parse a coordinates file.
///
/// # Errors
///
/// [`MolvisError::Io`] if the file cannot be read,
/// [`MolvisError::InvalidData`] if it does not parse.
pub fn load_coordinates(path: &Path) -> Result<AtomicCoordinates, MolvisError> {
    let json = std::fs::read_to_string(path)?;
    let data = AtomicCoordinates::from_json(&json)?;
    log::info!("loaded {} atoms from {}", data.len(), path.display());
    Ok(data)
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<MolvisEngine>,
    input: InputProcessor,
    /// Taken when the engine is created.
    data: Option<AtomicCoordinates>,
    options: Options,
    title: String,
    /// First fatal error; ends the event loop.
    fatal: Option<MolvisError>,
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: MolvisError) {
        log::error!("{error}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn dispatch(&mut self, event: InputEvent) {
        let Some(cmd) = self.input.handle_event(event) else {
            return;
        };
        if let Some(engine) = &mut self.engine {
            if engine.execute(cmd) || engine.has_pending_pick() {
                self.request_redraw();
            }
        }
    }

    fn handle_pick(&self, event: &PickEvent) {
        let Some(window) = &self.window else {
            return;
        };
        match event {
            PickEvent::Hovered(Some(atom)) => {
                window.set_title(&format!(
                    "{} - {} #{}",
                    self.title, atom.symbol, atom.tag
                ));
            }
            PickEvent::Hovered(None) => window.set_title(&self.title),
            PickEvent::Toggled { atom, selected } => {
                log::info!(
                    "{} #{} {}",
                    atom.symbol,
                    atom.tag,
                    if *selected { "selected" } else { "deselected" }
                );
            }
            PickEvent::Missed => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let picked = engine.poll_picking();
        let rendered = engine.render();
        let picking = engine.has_pending_pick();

        if let Some(event) = picked {
            self.handle_pick(&event);
        }
        match rendered {
            Ok(()) => {}
            Err(e) if e.is_fatal() => {
                self.fail(event_loop, e);
                return;
            }
            Err(e) => log::warn!("render error: {e}"),
        }
        // Keep frames coming until the outstanding readback resolves.
        if picking {
            self.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(data) = self.data.take() else {
            return;
        };

        let attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(1024, 768));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, MolvisError::Viewer(e.to_string()));
                return;
            }
        };

        let inner = window.inner_size();
        let engine = pollster::block_on(MolvisEngine::new(
            Arc::clone(&window),
            (inner.width.max(1), inner.height.max(1)),
            data,
            self.options.clone(),
        ));
        match engine {
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
        if self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
                self.request_redraw();
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::MouseInput { button, state, .. } => {
                self.dispatch(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.dispatch(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
                self.request_redraw();
            }

            WindowEvent::CursorLeft { .. } => {
                self.dispatch(InputEvent::CursorLeft);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.dispatch(InputEvent::Scroll { delta });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(cmd) = self.input.handle_key_press(&format!("{code:?}"))
                else {
                    return;
                };
                if let Some(engine) = &mut self.engine {
                    if engine.execute(cmd) {
                        self.request_redraw();
                    }
                }
            }

            _ => (),
        }
    }
}
