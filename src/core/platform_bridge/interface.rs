//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// The contract between the application loop and a window backend.
//
// Architecture:
//   Application::start() ──poll_events()──► Window ──► Vec<InputEvent>
//                        ◄──WindowStatus───┘
//                        ──present()──────►
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use crate::core::math::Vector4;
use crate::error::EngineResult;

//=== WindowStatus ========================================================

/// Window state reported after polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStatus {
    Open,
    CloseRequested,
}

//=== TickControl =========================================================

/// Main loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

impl From<WindowStatus> for TickControl {
    fn from(status: WindowStatus) -> Self {
        match status {
            WindowStatus::Open => TickControl::Continue,
            WindowStatus::CloseRequested => TickControl::Exit,
        }
    }
}

//=== Window Trait ========================================================

/// A surface the application loop drives once per frame.
pub trait Window {
    /// Current drawable size as a viewport rectangle (origin 0, 0).
    fn size(&self) -> Vector4;

    /// Pumps pending OS events, appending converted input to `sink`.
    ///
    /// Events are appended in arrival order; the sink is not cleared.
    fn poll_events(&mut self, sink: &mut Vec<InputEvent>) -> EngineResult<WindowStatus>;

    /// Finishes the frame.
    fn present(&mut self) -> EngineResult<()>;
}
