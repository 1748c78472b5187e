//=========================================================================
// Level System
//=========================================================================
//
// Groups entities and tiles into levels with an independent lifecycle.
//
// Architecture:
//   Level
//     ├─ entity_cache: Vec<EntityId>  (+ dirty flag)
//     ├─ tile_cache:   Vec<TileId>    (+ dirty flag)
//     └─ hooks: Box<dyn LevelHooks>
//
// Flow (per frame):
//   update()      → tiles → entities → on_update()
//   post_update() → entity post-updates → switch resets → on_post_update()
//   render()      → tiles → entities (re-checked) → on_render()
//
// Lifecycle:
//   Active ──unload()──► Unloaded (terminal, every operation is a no-op)
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::globals::Context;
use crate::core::world::Registry;
use crate::error::EngineResult;

//=== Module Declarations =================================================

mod lifecycle;

//=== Public API ==========================================================

pub use lifecycle::Level;

//=== LevelState ==========================================================

/// Lifecycle state of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelState {
    /// Initial state; caches build and per-tick operations run.
    #[default]
    Active,

    /// Terminal state; the level no longer owns anything.
    Unloaded,
}

//=== LevelHooks Trait ====================================================

/// Per-level logic that runs after the level has driven its members.
///
/// Each hook receives the level it belongs to, so it can read the caches
/// or move members in with [`Level::switch_entity`]. Every hook has an
/// empty default implementation:
///
/// ```rust
/// # use tessel_engine::prelude::*;
/// struct Spawner { pending: Vec<EntityId> }
///
/// impl LevelHooks for Spawner {
///     fn on_update(&mut self, level: &mut Level, _ctx: &mut Context, registry: &mut Registry) -> EngineResult<()> {
///         for entity in self.pending.drain(..) {
///             level.switch_entity(registry, entity)?;
///         }
///         Ok(())
///     }
/// }
/// ```
///
/// Hooks never run once the level is unloaded. While a hook runs, the
/// level's own hooks are detached; calling `level.update()` from inside a
/// hook drives the members without re-entering the hook.
pub trait LevelHooks {
    /// Called at the end of [`Level::update`].
    fn on_update(&mut self, _level: &mut Level, _ctx: &mut Context, _registry: &mut Registry) -> EngineResult<()> {
        Ok(())
    }

    /// Called at the end of [`Level::render`].
    fn on_render(&mut self, _level: &mut Level, _ctx: &mut Context, _registry: &Registry) -> EngineResult<()> {
        Ok(())
    }

    /// Called at the end of [`Level::post_update`], after switches reset.
    fn on_post_update(&mut self, _level: &mut Level, _ctx: &mut Context, _registry: &mut Registry) -> EngineResult<()> {
        Ok(())
    }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl LevelHooks for NoHooks {}
