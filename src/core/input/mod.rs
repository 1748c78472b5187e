//=========================================================================
// Input
//
// Platform-independent input events and the per-frame state game code
// queries from its update callback.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod input_state;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use input_state::InputState;
