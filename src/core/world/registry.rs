//=========================================================================
// Registry
//=========================================================================
//
// Ordered collections of every live entity and tile.
//
// Architecture:
//   spawn_entity() → Vec<Entity>  (index = EntityId)
//   spawn_tile()   → Vec<Tile>    (index = TileId)
//
// Registration order is iteration order for the whole run, which makes
// render order deterministic: the last registered object draws on top.
// There is no removal; objects leave play by losing their level.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::{Entity, EntityId, LevelId, Tile, TileId};
use crate::core::globals::Context;
use crate::error::{EngineError, EngineResult};

//=== Registry ============================================================

/// Owner of all entities and tiles.
#[derive(Debug, Default)]
pub struct Registry {
    entities: Vec<Entity>,
    tiles: Vec<Tile>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Registers an entity. It starts with no owning level.
    pub fn spawn_entity(&mut self, mut entity: Entity) -> EntityId {
        entity.set_level(None);
        let id = EntityId(self.entities.len());
        trace!(target: "registry", "Spawned entity {:?} ({})", id, entity.name());
        self.entities.push(entity);
        id
    }

    /// Registers a tile. It starts with no owning level.
    pub fn spawn_tile(&mut self, mut tile: Tile) -> TileId {
        tile.set_level(None);
        let id = TileId(self.tiles.len());
        trace!(target: "registry", "Spawned tile {:?} ({})", id, tile.name());
        self.tiles.push(tile);
        id
    }

    //--- Lookup -----------------------------------------------------------

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.0)
    }

    /// All entities in registration order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().enumerate().map(|(i, e)| (EntityId(i), e))
    }

    /// All tiles in registration order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles.iter().enumerate().map(|(i, t)| (TileId(i), t))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    //--- Level Membership -------------------------------------------------

    /// Entities whose back-reference is `level`, in registration order.
    pub fn entities_in(&self, level: LevelId) -> Vec<EntityId> {
        self.entities()
            .filter(|(_, e)| e.level() == Some(level))
            .map(|(id, _)| id)
            .collect()
    }

    /// Tiles whose back-reference is `level`, in registration order.
    pub fn tiles_in(&self, level: LevelId) -> Vec<TileId> {
        self.tiles()
            .filter(|(_, t)| t.level() == Some(level))
            .map(|(id, _)| id)
            .collect()
    }

    pub(crate) fn set_entity_level(&mut self, id: EntityId, level: Option<LevelId>) -> EngineResult<()> {
        self.entity_mut(id)
            .ok_or(EngineError::UnknownEntity(id))?
            .set_level(level);
        Ok(())
    }

    pub(crate) fn set_tile_level(&mut self, id: TileId, level: Option<LevelId>) -> EngineResult<()> {
        self.tile_mut(id)
            .ok_or(EngineError::UnknownTile(id))?
            .set_level(level);
        Ok(())
    }

    //--- Behaviour Dispatch -----------------------------------------------
    //
    // The behaviour is detached for the duration of the call so it can
    // receive `&mut Registry` without aliasing its own entity.
    //

    /// Runs the entity's `start` hook.
    pub fn start_entity(&mut self, id: EntityId, ctx: &mut Context) -> EngineResult<()> {
        self.with_entity_behavior(id, |b, reg| b.start(id, ctx, reg))
    }

    /// Runs the entity's `update` hook.
    pub fn update_entity(&mut self, id: EntityId, ctx: &mut Context) -> EngineResult<()> {
        self.with_entity_behavior(id, |b, reg| b.update(id, ctx, reg))
    }

    /// Runs the entity's `post_update` hook.
    pub fn post_update_entity(&mut self, id: EntityId, ctx: &mut Context) -> EngineResult<()> {
        self.with_entity_behavior(id, |b, reg| b.post_update(id, ctx, reg))
    }

    /// Lowers every update switch on the entity.
    pub fn reset_switches(&mut self, id: EntityId) -> EngineResult<()> {
        self.entity_mut(id)
            .ok_or(EngineError::UnknownEntity(id))?
            .switches
            .reset();
        Ok(())
    }

    /// Runs the tile's `update` hook.
    pub fn update_tile(&mut self, id: TileId, ctx: &mut Context) -> EngineResult<()> {
        let tile = self.tile_mut(id).ok_or(EngineError::UnknownTile(id))?;
        let Some(mut behavior) = tile.behavior.take() else {
            return Ok(());
        };

        let result = behavior.update(id, ctx, self);

        if let Some(tile) = self.tile_mut(id) {
            tile.behavior = Some(behavior);
        }
        result
    }

    //--- Internal Helpers -------------------------------------------------

    fn with_entity_behavior<F>(&mut self, id: EntityId, call: F) -> EngineResult<()>
    where
        F: FnOnce(&mut dyn super::EntityBehavior, &mut Registry) -> EngineResult<()>,
    {
        let entity = self.entity_mut(id).ok_or(EngineError::UnknownEntity(id))?;
        let Some(mut behavior) = entity.behavior.take() else {
            return Ok(());
        };

        let result = call(behavior.as_mut(), self);

        if let Some(entity) = self.entity_mut(id) {
            entity.behavior = Some(behavior);
        }
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Vector2;
    use crate::core::render::{Sprite, TextureId};
    use crate::core::world::{EntityBehavior, TileBehavior};
    use std::cell::Cell;
    use std::rc::Rc;

    fn sprite() -> Rc<Sprite> {
        Rc::new(Sprite::new(TextureId(0), 8, 8, "test"))
    }

    struct Counter(Rc<Cell<u32>>);

    impl EntityBehavior for Counter {
        fn update(&mut self, _me: EntityId, _ctx: &mut Context, _registry: &mut Registry) -> EngineResult<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    impl TileBehavior for Counter {
        fn update(&mut self, _me: TileId, _ctx: &mut Context, _registry: &mut Registry) -> EngineResult<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    /// Moves itself right and raises a switch on the entity it follows.
    struct Nudger {
        target: EntityId,
    }

    impl EntityBehavior for Nudger {
        fn update(&mut self, me: EntityId, _ctx: &mut Context, registry: &mut Registry) -> EngineResult<()> {
            registry.entity_mut(me).unwrap().position.x += 1;
            registry.entity_mut(self.target).unwrap().switches.raise("nudged");
            Ok(())
        }
    }

    #[test]
    fn registration_preserves_creation_order() {
        let mut registry = Registry::new();
        let a = registry.spawn_entity(Entity::new(sprite(), Vector2::ZERO, "a"));
        let b = registry.spawn_entity(Entity::new(sprite(), Vector2::ZERO, "b"));
        let c = registry.spawn_entity(Entity::new(sprite(), Vector2::ZERO, "c"));

        let names: Vec<_> = registry.entities().map(|(_, e)| e.name().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(a < b && b < c);
        assert!(registry.entities().all(|(_, e)| e.level().is_none()));
    }

    #[test]
    fn spawn_clears_preassigned_level() {
        let mut registry = Registry::new();
        let mut tile = Tile::new(sprite(), Vector2::ZERO, "t");
        tile.set_level(Some(LevelId(3)));
        let id = registry.spawn_tile(tile);
        assert_eq!(registry.tile(id).unwrap().level(), None);
    }

    #[test]
    fn membership_scan_filters_by_level() {
        let mut registry = Registry::new();
        let ids: Vec<_> = (0..4)
            .map(|i| registry.spawn_entity(Entity::new(sprite(), Vector2::ZERO, format!("e{i}"))))
            .collect();
        registry.set_entity_level(ids[1], Some(LevelId(0))).unwrap();
        registry.set_entity_level(ids[3], Some(LevelId(0))).unwrap();
        registry.set_entity_level(ids[2], Some(LevelId(1))).unwrap();

        assert_eq!(registry.entities_in(LevelId(0)), vec![ids[1], ids[3]]);
        assert_eq!(registry.entities_in(LevelId(1)), vec![ids[2]]);
        assert!(registry.entities_in(LevelId(2)).is_empty());
    }

    #[test]
    fn unknown_handles_are_errors() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.set_entity_level(EntityId(7), None),
            Err(EngineError::UnknownEntity(_))
        ));
        assert!(matches!(
            registry.set_tile_level(TileId(7), None),
            Err(EngineError::UnknownTile(_))
        ));
    }

    #[test]
    fn behaviours_run_and_are_reattached() {
        let mut registry = Registry::new();
        let mut ctx = Context::new();
        let hits = Rc::new(Cell::new(0));

        let e = registry.spawn_entity(
            Entity::new(sprite(), Vector2::ZERO, "e").with_behavior(Counter(Rc::clone(&hits))),
        );
        let t = registry.spawn_tile(
            Tile::new(sprite(), Vector2::ZERO, "t").with_behavior(Counter(Rc::clone(&hits))),
        );

        registry.update_entity(e, &mut ctx).unwrap();
        registry.update_entity(e, &mut ctx).unwrap();
        registry.update_tile(t, &mut ctx).unwrap();

        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn behaviour_can_mutate_itself_and_others() {
        let mut registry = Registry::new();
        let mut ctx = Context::new();
        let target = registry.spawn_entity(Entity::new(sprite(), Vector2::ZERO, "target"));
        let mover = registry.spawn_entity(
            Entity::new(sprite(), Vector2::ZERO, "mover").with_behavior(Nudger { target }),
        );

        registry.update_entity(mover, &mut ctx).unwrap();

        assert_eq!(registry.entity(mover).unwrap().position, Vector2::new(1, 0));
        assert!(registry.entity(target).unwrap().switches.is_raised("nudged"));

        registry.reset_switches(target).unwrap();
        assert!(registry.entity(target).unwrap().switches.is_empty());
    }

    #[test]
    fn objects_without_behaviour_are_skipped() {
        let mut registry = Registry::new();
        let mut ctx = Context::new();
        let e = registry.spawn_entity(Entity::new(sprite(), Vector2::ZERO, "idle"));
        assert!(registry.start_entity(e, &mut ctx).is_ok());
        assert!(registry.update_entity(e, &mut ctx).is_ok());
        assert!(registry.post_update_entity(e, &mut ctx).is_ok());
    }
}
