//=========================================================================
// Global Engine State
//=========================================================================
//
// Shared, keyed state handed to every callback and level hook.
//
// Architecture:
//   Context: String → Box<dyn Any> (render engine, debug flag, input, ...)
//   keys:    well-known key constants
//
//=========================================================================

//=== Module Declarations =================================================

mod context;

//=== Public API ==========================================================

pub use context::{keys, Context};
