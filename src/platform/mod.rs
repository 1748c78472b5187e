//=========================================================================
// Platform Subsystem
//
// winit-backed implementation of the `Window` trait.
//
// Architecture:
// ```text
//  Application::start()
//     │ poll_events()
//     ▼
//  WinitWindow ── pump_app_events(0) ──► WindowState (ApplicationHandler)
//     ▲                                    ├─ resumed: create OS window
//     │                                    ├─ Resized: track size
//     │                                    ├─ CloseRequested: flag + exit
//     │                                    └─ input → InputProcessor
//     │                                                   ↓
//     └──────────── drain ─────────────────────────── InputBuffer
// ```
//
// The application loop owns the frame; winit is pumped with a zero
// timeout once per frame instead of owning the thread through `run_app`.
// Everything here stays on the main thread.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use std::time::Duration;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window as OsWindow, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::InputEvent;
use crate::core::math::Vector4;
use crate::core::platform_bridge::{Window, WindowStatus};
use crate::error::{EngineError, EngineResult};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== WindowConfig ========================================================

/// OS window settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,

    /// Logical width in pixels.
    pub width: u32,

    /// Logical height in pixels.
    pub height: u32,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("Tessel Engine", 1280, 720)
    }
}

//=== WinitWindow =========================================================

/// An OS window driven one frame at a time by the application loop.
///
/// # Thread Safety
///
/// Not Send/Sync. Create and use it on the main thread (a winit
/// requirement on macOS).
pub struct WinitWindow {
    event_loop: EventLoop<()>,
    state: WindowState,
}

impl WinitWindow {
    /// Creates the event loop and the OS window.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Platform`] if the event loop or the window
    /// cannot be created.
    pub fn new(config: WindowConfig) -> EngineResult<Self> {
        debug!(target: "platform", "Creating winit event loop");
        let event_loop = EventLoop::new()
            .map_err(|e| EngineError::Platform(format!("Event loop creation failed: {}", e)))?;

        let mut window = Self {
            event_loop,
            state: WindowState::new(config),
        };

        // First pump delivers `resumed`, which creates the window
        window.pump()?;
        if window.state.window.is_none() {
            return Err(EngineError::Platform("Window was not created".into()));
        }
        Ok(window)
    }

    /// The underlying winit window, for renderer backends.
    pub fn os_window(&self) -> Option<&OsWindow> {
        self.state.window.as_ref()
    }

    fn pump(&mut self) -> EngineResult<PumpStatus> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);

        match self.state.failure.take() {
            Some(reason) => Err(EngineError::Platform(reason)),
            None => Ok(status),
        }
    }
}

impl Window for WinitWindow {
    fn size(&self) -> Vector4 {
        self.state.size
    }

    fn poll_events(&mut self, sink: &mut Vec<InputEvent>) -> EngineResult<WindowStatus> {
        let status = self.pump()?;

        if !self.state.buffer.is_empty() {
            let (discrete, continuous) = self.state.buffer.drain();
            trace!(
                target: "platform::input",
                "Polled {} discrete + {} continuous events",
                discrete.len(),
                continuous.len()
            );
            sink.extend(discrete);
            sink.extend(continuous);
        }

        if self.state.close_requested || matches!(status, PumpStatus::Exit(_)) {
            return Ok(WindowStatus::CloseRequested);
        }
        Ok(WindowStatus::Open)
    }

    fn present(&mut self) -> EngineResult<()> {
        if let Some(window) = &self.state.window {
            window.request_redraw();
        }
        Ok(())
    }
}

//=== WindowState =========================================================

/// Receives winit callbacks during a pump.
struct WindowState {
    config: WindowConfig,

    /// None until `resumed()`.
    window: Option<OsWindow>,
    size: Vector4,
    buffer: InputBuffer,
    input_processor: InputProcessor,
    close_requested: bool,

    /// Set by a callback that could not complete; surfaced by the next pump.
    failure: Option<String>,
}

impl WindowState {
    fn new(config: WindowConfig) -> Self {
        let size = Vector4::from_size(config.width as i32, config.height as i32);
        Self {
            config,
            window: None,
            size,
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            close_requested: false,
            failure: None,
        }
    }

    fn set_size(&mut self, size: PhysicalSize<u32>) {
        self.size = Vector4::from_size(size.width as i32, size.height as i32);
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.set_size(window.inner_size());
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.failure = Some(format!("Window creation failed: {}", e));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                debug!(target: "platform", "Window resized to {}x{}", size.width, size.height);
                self.set_size(size);
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input_processor.update_modifiers(modifiers.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.cursor_moved(position.x, position.y);
                self.buffer.push(event);
            }

            WindowEvent::KeyboardInput { event, .. } => match self.input_processor.key(&event) {
                Some(input) => self.buffer.push(input),
                None => trace!(target: "platform::input", "Unmapped key ignored"),
            },

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.mouse_button(button, state);
                self.buffer.push(event);
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
