//=========================================================================
// Core Systems
//
// Platform-independent engine systems.
//
// Layout:
// - `globals`: keyed shared state (`Context`)
// - `world`: entity/tile registry and the level table
// - `level`: level lifecycle and lazy membership caches
// - `render`: render engine, anchors and draw surfaces
// - `input`: input events and per-frame input state
// - `platform_bridge`: the `Window` contract the loop drives
// - `math`: integer vector types
//
//=========================================================================

//=== Module Declarations =================================================

pub mod globals;
pub mod input;
pub mod level;
pub mod math;
pub mod platform_bridge;
pub mod render;
pub mod world;

//=== Public API ==========================================================

pub use globals::Context;
pub use level::{Level, LevelHooks, LevelState};
pub use world::{Registry, World};
