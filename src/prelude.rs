//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use tessel_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Application loop
pub use crate::app::{Application, ApplicationBuilder, StopHandle};
pub use crate::error::{EngineError, EngineResult};

// Shared state
pub use crate::core::globals::{keys, Context};

// World and levels
pub use crate::core::level::{Level, LevelHooks, LevelState, NoHooks};
pub use crate::core::world::{
    Entity, EntityBehavior, EntityId, LevelId, Registry, Tile, TileBehavior, TileId, UpdateSwitches,
    World,
};

// Rendering
pub use crate::core::math::{Vector2, Vector4};
pub use crate::core::render::{Anchor, CommandBuffer, DrawSurface, EntityRenderer, RenderEngine, Sprite, TextureId};

// Input and windows
pub use crate::core::input::{InputState, KeyCode, Modifiers, MouseButton};
pub use crate::core::platform_bridge::{HeadlessWindow, Window};
