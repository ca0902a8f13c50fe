//! Window shell: keyboard controls, frame loop and presentation.

use crate::present::Presenter;
use mic_canvas::{Mode, Renderer};
use std::sync::Arc;
use vis_core::{analyzer, EngineConfig, Frames};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Sensitivity change per key press
const SENSITIVITY_STEP: f32 = 0.1;

/// Main application state
pub struct App {
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,

    frames: Frames,
    renderer: Renderer,

    // The three user controlled parameters, the third is the extractor's activity
    mode: Mode,
    engine: EngineConfig,

    size: (u32, u32),
    title: String,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(frames: Frames, mode: Mode, engine: EngineConfig, size: (u32, u32)) -> App {
        App {
            window: None,
            presenter: None,
            frames,
            renderer: Renderer::new(size.0, size.1),
            mode,
            engine,
            size,
            title: String::new(),
            error: None,
        }
    }

    /// Setup error that ended the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn toggle_capture(&mut self) {
        let extractor = self.frames.extractor_mut();
        let active = !extractor.is_active();
        if let Err(e) = extractor.set_active(active) {
            log::error!("Can't start listening: {}", e);
        }
    }

    fn key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Space => self.toggle_capture(),
            KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 | KeyCode::Tab => {
                self.mode = mode_for_key(self.mode, code)
            }
            KeyCode::ArrowUp => self
                .engine
                .set_sensitivity(self.engine.sensitivity() + SENSITIVITY_STEP),
            KeyCode::ArrowDown => self
                .engine
                .set_sensitivity(self.engine.sensitivity() - SENSITIVITY_STEP),
            _ => return,
        }
        log::debug!(
            "Mode {}, sensitivity {:.1}, listening {}",
            self.mode,
            self.engine.sensitivity(),
            self.frames.extractor().is_active()
        );
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let frame = self.frames.advance();
        self.renderer
            .render(frame.snapshot(), self.mode, &self.engine, frame.time);

        let volume = frame
            .snapshot()
            .map(|s| s.features().scaled(&self.engine).volume);
        let title = title(
            self.mode,
            &self.engine,
            self.frames.extractor().is_active(),
            volume.unwrap_or(0.0),
        );
        if let Some(window) = &self.window {
            if title != self.title {
                window.set_title(&title);
                self.title = title;
            }
        }

        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        if let Err(e) = presenter.present(self.renderer.surface()) {
            log::error!("Render error: {:?}", e);
        }
    }
}

/// Mode selected by a key press, `Tab` cycles
pub fn mode_for_key(current: Mode, code: KeyCode) -> Mode {
    match code {
        KeyCode::Digit1 => Mode::Pure,
        KeyCode::Digit2 => Mode::Cubic,
        KeyCode::Digit3 => Mode::Waves,
        KeyCode::Tab => current.next(),
        _ => current,
    }
}

/// Window title showing the controls' state and the signal meter
pub fn title(mode: Mode, engine: &EngineConfig, active: bool, volume: f32) -> String {
    let meter: String = analyzer::signal_segments(volume)
        .iter()
        .map(|lit| if *lit { '|' } else { '.' })
        .collect();

    format!(
        "mic-canvas - {} - sensitivity {:.1} - {} [{}]",
        mode,
        engine.sensitivity(),
        if active { "listening" } else { "idle" },
        meter
    )
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(title(self.mode, &self.engine, false, 0.0))
            .with_inner_size(winit::dpi::PhysicalSize::new(self.size.0, self.size.1));

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.error = Some(anyhow::Error::new(e).context("Failed to create window"));
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Presenter::new(Arc::clone(&window))) {
            Ok(p) => self.presenter = Some(p),
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        }

        let size = window.inner_size();
        self.renderer.resize(size.width, size.height);
        log::info!("Space: listen, 1/2/3/Tab: mode, Up/Down: sensitivity, Esc: quit");

        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat,
                        ..
                    },
                ..
            } => {
                // Holding an arrow keeps stepping, everything else fires once
                if !repeat || matches!(code, KeyCode::ArrowUp | KeyCode::ArrowDown) {
                    self.key(event_loop, code);
                }
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.renderer.resize(size.width, size.height);
                }
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.frames.extractor_mut().deactivate();
        self.presenter = None;
    }
}
