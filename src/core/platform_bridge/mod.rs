//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges window backends (winit, headless, ...) with the application
// loop, so backends can be swapped without touching core code.
//
// Components:
// - `interface`: the `Window` trait and loop control types
// - `headless`: a `Window` with no OS surface
//
//=========================================================================

//=== Module Declarations =================================================

mod headless;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use headless::HeadlessWindow;
pub use interface::{Window, WindowStatus};

pub(crate) use interface::TickControl;
