//=========================================================================
// Level
//=========================================================================
//
// Lazily cached level membership plus the per-tick level operations.
//
// Membership lives on the objects (their `LevelId` back-reference); the
// level only caches the result of scanning the registry for it. Caches
// rebuild on first access after being marked dirty.
//
// Known oddity: render() re-checks each member's back-reference before
// drawing, update() and post_update() trust the cache. An object moved to
// another level after the cache was built keeps updating here until the
// cache is rebuilt, but stops being drawn here at once.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use super::{LevelHooks, LevelState, NoHooks};
use crate::core::globals::Context;
use crate::core::world::{EntityId, LevelId, Registry, TileId};
use crate::error::EngineResult;

//=== Level ===============================================================

/// A named group of entities and tiles with its own lifecycle.
///
/// Created through [`Application::create_level`](crate::Application::create_level),
/// which registers one post-update task forwarding to
/// [`post_update`](Self::post_update). The task stays registered after
/// unload and simply does nothing.
pub struct Level {
    id: LevelId,
    name: String,
    state: LevelState,

    entity_cache: Vec<EntityId>,
    entity_cache_dirty: bool,

    tile_cache: Vec<TileId>,
    tile_cache_dirty: bool,

    hooks: Box<dyn LevelHooks>,
}

impl Level {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(id: LevelId, name: String, hooks: Box<dyn LevelHooks>) -> Self {
        info!(target: "level", "Created level {:?} ({})", id, name);
        Self {
            id,
            name,
            state: LevelState::Active,
            entity_cache: Vec::new(),
            entity_cache_dirty: true,
            tile_cache: Vec::new(),
            tile_cache_dirty: true,
            hooks,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> LevelId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn is_unloaded(&self) -> bool {
        self.state == LevelState::Unloaded
    }

    //--- Lifecycle --------------------------------------------------------

    /// Releases every member and makes the level inert.
    ///
    /// Each tile and entity in the caches (built first if dirty) has its
    /// back-reference cleared, as does any registry member still pointing
    /// here that a stale cache missed. Repeated calls do nothing.
    pub fn unload(&mut self, registry: &mut Registry) {
        if self.is_unloaded() {
            return;
        }

        self.ensure_caches(registry);

        for &tile in &self.tile_cache {
            if let Some(tile) = registry.tile_mut(tile) {
                tile.set_level(None);
            }
        }
        for &entity in &self.entity_cache {
            if let Some(entity) = registry.entity_mut(entity) {
                entity.set_level(None);
            }
        }

        // Tiles switched in after the tile cache was built
        let stragglers = registry.tiles_in(self.id);
        for &tile in &stragglers {
            if let Some(tile) = registry.tile_mut(tile) {
                tile.set_level(None);
            }
        }
        for entity in registry.entities_in(self.id) {
            if let Some(entity) = registry.entity_mut(entity) {
                entity.set_level(None);
            }
        }
        if !stragglers.is_empty() {
            debug!(target: "level", "Level {:?} released {} uncached tiles", self.id, stragglers.len());
        }

        info!(
            target: "level",
            "Unloaded level {:?} ({}): released {} tiles, {} entities",
            self.id,
            self.name,
            self.tile_cache.len(),
            self.entity_cache.len()
        );

        self.tile_cache.clear();
        self.entity_cache.clear();
        self.state = LevelState::Unloaded;
    }

    //--- Membership -------------------------------------------------------

    /// Moves `entity` into this level.
    ///
    /// The entity becomes visible in [`entities`](Self::entities) at once,
    /// without a cache rebuild. Does nothing when unloaded.
    pub fn switch_entity(&mut self, registry: &mut Registry, entity: EntityId) -> EngineResult<()> {
        if self.is_unloaded() {
            return Ok(());
        }

        self.ensure_entity_cache(registry);
        registry.set_entity_level(entity, Some(self.id))?;

        if !self.entity_cache.contains(&entity) {
            self.entity_cache.push(entity);
        }
        debug!(target: "level", "Entity {:?} switched to level {:?}", entity, self.id);
        Ok(())
    }

    /// Moves `tile` into this level.
    ///
    /// Only the back-reference changes; an already built tile cache does
    /// not see the tile until [`update_tile_cache`](Self::update_tile_cache)
    /// or [`invalidate_tile_cache`](Self::invalidate_tile_cache). Does
    /// nothing when unloaded.
    pub fn switch_tile(&mut self, registry: &mut Registry, tile: TileId) -> EngineResult<()> {
        if self.is_unloaded() {
            return Ok(());
        }

        registry.set_tile_level(tile, Some(self.id))?;
        debug!(target: "level", "Tile {:?} switched to level {:?}", tile, self.id);
        Ok(())
    }

    //--- Caches -----------------------------------------------------------

    /// Entities of this level, scanning the registry on first access.
    ///
    /// Empty once the level is unloaded.
    pub fn entities(&mut self, registry: &Registry) -> &[EntityId] {
        if self.is_unloaded() {
            return &[];
        }
        self.ensure_entity_cache(registry);
        &self.entity_cache
    }

    /// Tiles of this level, scanning the registry on first access.
    ///
    /// Empty once the level is unloaded.
    pub fn tiles(&mut self, registry: &Registry) -> &[TileId] {
        if self.is_unloaded() {
            return &[];
        }
        self.ensure_tile_cache(registry);
        &self.tile_cache
    }

    /// Rebuilds the entity cache from the registry now.
    pub fn update_entity_cache(&mut self, registry: &Registry) {
        self.entity_cache = registry.entities_in(self.id);
        self.entity_cache_dirty = false;
        trace!(target: "level", "Level {:?} entity cache: {}", self.id, self.entity_cache.len());
    }

    /// Rebuilds the tile cache from the registry now.
    pub fn update_tile_cache(&mut self, registry: &Registry) {
        self.tile_cache = registry.tiles_in(self.id);
        self.tile_cache_dirty = false;
        trace!(target: "level", "Level {:?} tile cache: {}", self.id, self.tile_cache.len());
    }

    /// Marks the entity cache for a rebuild on next access.
    pub fn invalidate_entity_cache(&mut self) {
        self.entity_cache_dirty = true;
    }

    /// Marks the tile cache for a rebuild on next access.
    pub fn invalidate_tile_cache(&mut self) {
        self.tile_cache_dirty = true;
    }

    //--- Per-Tick Operations ----------------------------------------------

    /// Updates every cached tile, then every cached entity, then the hooks.
    ///
    /// Members are not re-checked against their back-reference.
    pub fn update(&mut self, ctx: &mut Context, registry: &mut Registry) -> EngineResult<()> {
        if self.is_unloaded() {
            return Ok(());
        }
        self.ensure_caches(registry);

        for &tile in &self.tile_cache {
            registry.update_tile(tile, ctx)?;
        }
        for &entity in &self.entity_cache {
            registry.update_entity(entity, ctx)?;
        }

        self.with_hooks(|hooks, level| hooks.on_update(level, ctx, registry))
    }

    /// Draws cached tiles, then cached entities, then runs the hooks.
    ///
    /// Members whose back-reference no longer points at this level are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Fails if no render engine is stored in the context.
    pub fn render(&mut self, ctx: &mut Context, registry: &Registry) -> EngineResult<()> {
        if self.is_unloaded() {
            return Ok(());
        }
        self.ensure_caches(registry);

        let engine = ctx.render_engine_mut()?;
        for &id in &self.tile_cache {
            if let Some(tile) = registry.tile(id).filter(|t| t.level() == Some(self.id)) {
                engine.render_tile(tile);
            }
        }
        for &id in &self.entity_cache {
            if let Some(entity) = registry.entity(id).filter(|e| e.level() == Some(self.id)) {
                engine.render_entity(entity);
            }
        }

        self.with_hooks(|hooks, level| hooks.on_render(level, ctx, registry))
    }

    /// Runs every cached entity's post-update, then resets every cached
    /// entity's switches, then the hooks.
    ///
    /// All post-updates complete before the first reset, so an entity may
    /// read another entity's switches raised this tick.
    pub fn post_update(&mut self, ctx: &mut Context, registry: &mut Registry) -> EngineResult<()> {
        if self.is_unloaded() {
            return Ok(());
        }
        self.ensure_entity_cache(registry);

        for &entity in &self.entity_cache {
            registry.post_update_entity(entity, ctx)?;
        }
        for &entity in &self.entity_cache {
            registry.reset_switches(entity)?;
        }

        self.with_hooks(|hooks, level| hooks.on_post_update(level, ctx, registry))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Detaches the hooks, runs `call` with the level, then reattaches them.
    fn with_hooks<F>(&mut self, call: F) -> EngineResult<()>
    where
        F: FnOnce(&mut dyn LevelHooks, &mut Level) -> EngineResult<()>,
    {
        let mut hooks = std::mem::replace(&mut self.hooks, Box::new(NoHooks));
        let result = call(hooks.as_mut(), self);
        self.hooks = hooks;
        result
    }

    fn ensure_entity_cache(&mut self, registry: &Registry) {
        if self.entity_cache_dirty {
            self.update_entity_cache(registry);
        }
    }

    fn ensure_tile_cache(&mut self, registry: &Registry) {
        if self.tile_cache_dirty {
            self.update_tile_cache(registry);
        }
    }

    fn ensure_caches(&mut self, registry: &Registry) {
        self.ensure_tile_cache(registry);
        self.ensure_entity_cache(registry);
    }
}

//--- Trait Implementations -----------------------------------------------

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("entities", &self.entity_cache.len())
            .field("tiles", &self.tile_cache.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
