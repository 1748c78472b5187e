//=========================================================================
// World
//=========================================================================
//
// Application-root container for game objects and levels.
//
// Architecture:
//   World
//     ├─ registry: Registry       (all entities + tiles, ordered)
//     └─ levels: Vec<Level>       (indexed by LevelId)
//
// Level operations need the level and the registry at the same time;
// `World` splits the borrow and forwards by handle so callers never hold
// a level reference across frames.
//
//=========================================================================

//=== Module Declarations =================================================

mod handle;
mod object;
mod registry;

//=== Public API ==========================================================

pub use handle::{EntityId, LevelId, TileId};
pub use object::{Entity, EntityBehavior, Tile, TileBehavior, UpdateSwitches};
pub use registry::Registry;

//=== Internal Dependencies ===============================================

use crate::core::globals::Context;
use crate::core::level::{Level, LevelHooks};
use crate::error::{EngineError, EngineResult};

//=== World ===============================================================

/// Owns the registry and the level table.
///
/// Passed as `&mut World` to every frame callback by the
/// [`Application`](crate::Application).
#[derive(Debug, Default)]
pub struct World {
    registry: Registry,
    levels: Vec<Level>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registry ---------------------------------------------------------

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Shorthand for [`Registry::spawn_entity`].
    pub fn spawn_entity(&mut self, entity: Entity) -> EntityId {
        self.registry.spawn_entity(entity)
    }

    /// Shorthand for [`Registry::spawn_tile`].
    pub fn spawn_tile(&mut self, tile: Tile) -> TileId {
        self.registry.spawn_tile(tile)
    }

    //--- Level Table ------------------------------------------------------

    /// Adds a level to the table.
    ///
    /// Levels are created through
    /// [`Application::create_level`](crate::Application::create_level),
    /// which also registers the level's post-update task.
    pub(crate) fn insert_level(&mut self, name: String, hooks: Box<dyn LevelHooks>) -> LevelId {
        let id = LevelId(self.levels.len());
        self.levels.push(Level::new(id, name, hooks));
        id
    }

    pub fn level(&self, id: LevelId) -> EngineResult<&Level> {
        self.levels.get(id.0).ok_or(EngineError::UnknownLevel(id))
    }

    /// Returns the level together with the registry it operates on.
    pub fn level_mut(&mut self, id: LevelId) -> EngineResult<(&mut Level, &mut Registry)> {
        let level = self.levels.get_mut(id.0).ok_or(EngineError::UnknownLevel(id))?;
        Ok((level, &mut self.registry))
    }

    /// All levels in creation order, unloaded ones included.
    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// Finds the first level with the given name.
    pub fn find_level(&self, name: &str) -> Option<LevelId> {
        self.levels.iter().find(|l| l.name() == name).map(Level::id)
    }

    //--- Level Forwarding -------------------------------------------------

    /// Cached entities of `level` (built on first access).
    pub fn level_entities(&mut self, level: LevelId) -> EngineResult<&[EntityId]> {
        let (level, registry) = self.level_mut(level)?;
        Ok(level.entities(registry))
    }

    /// Cached tiles of `level` (built on first access).
    pub fn level_tiles(&mut self, level: LevelId) -> EngineResult<&[TileId]> {
        let (level, registry) = self.level_mut(level)?;
        Ok(level.tiles(registry))
    }

    /// Moves an entity into `level`; visible in its cache immediately.
    pub fn switch_entity_level(&mut self, entity: EntityId, level: LevelId) -> EngineResult<()> {
        let (level, registry) = self.level_mut(level)?;
        level.switch_entity(registry, entity)
    }

    /// Moves a tile into `level`; picked up on the next tile cache rebuild.
    pub fn switch_tile_level(&mut self, tile: TileId, level: LevelId) -> EngineResult<()> {
        let (level, registry) = self.level_mut(level)?;
        level.switch_tile(registry, tile)
    }

    pub fn update_level(&mut self, level: LevelId, ctx: &mut Context) -> EngineResult<()> {
        let (level, registry) = self.level_mut(level)?;
        level.update(ctx, registry)
    }

    pub fn render_level(&mut self, level: LevelId, ctx: &mut Context) -> EngineResult<()> {
        let (level, registry) = self.level_mut(level)?;
        level.render(ctx, registry)
    }

    pub fn post_update_level(&mut self, level: LevelId, ctx: &mut Context) -> EngineResult<()> {
        let (level, registry) = self.level_mut(level)?;
        level.post_update(ctx, registry)
    }

    pub fn unload_level(&mut self, level: LevelId) -> EngineResult<()> {
        let (level, registry) = self.level_mut(level)?;
        level.unload(registry);
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
