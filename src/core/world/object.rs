//=========================================================================
// Game Objects
//=========================================================================
//
// Entities and tiles: positioned sprites tagged with an owning level.
//
// Architecture:
//   Entity ─┬─ position, name, Rc<Sprite>
//           ├─ level: Option<LevelId>       (back-reference, no ownership)
//           ├─ switches: UpdateSwitches     (reset every post-update)
//           ├─ behavior: Box<dyn EntityBehavior>
//           └─ renderer: Box<dyn EntityRenderer>  (optional custom drawing)
//
//   Tile ───┬─ position, name, Rc<Sprite>
//           ├─ level: Option<LevelId>
//           └─ behavior: Box<dyn TileBehavior>
//
// Behaviours receive the whole registry so they can read other objects
// (e.g. another entity's switches during post-update).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::{EntityId, LevelId, Registry, TileId};
use crate::core::globals::Context;
use crate::core::math::Vector2;
use crate::core::render::{EntityRenderer, Sprite};
use crate::error::EngineResult;

//=== Behaviour Traits ====================================================

/// Per-entity game logic.
///
/// Only `update()` is required. `me` is the handle of the entity being
/// driven; while a hook runs, that entity's behaviour is detached from the
/// registry, so the hook can freely borrow any registry member.
pub trait EntityBehavior {
    /// Called once when the game starts the entity.
    fn start(&mut self, _me: EntityId, _ctx: &mut Context, _registry: &mut Registry) -> EngineResult<()> {
        Ok(())
    }

    /// Called every tick by the owning level.
    fn update(&mut self, me: EntityId, ctx: &mut Context, registry: &mut Registry) -> EngineResult<()>;

    /// Called after every entity of the level has updated, before any
    /// switches are reset.
    fn post_update(&mut self, _me: EntityId, _ctx: &mut Context, _registry: &mut Registry) -> EngineResult<()> {
        Ok(())
    }
}

/// Per-tile game logic (animated or interactive tiles).
pub trait TileBehavior {
    fn update(&mut self, me: TileId, ctx: &mut Context, registry: &mut Registry) -> EngineResult<()>;
}

//=== UpdateSwitches ======================================================

/// Transient named flags raised during a tick.
///
/// Entities raise switches while updating; other entities may read them
/// during post-update. The owning level resets every switch once all
/// post-updates have run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSwitches {
    raised: BTreeSet<String>,
}

impl UpdateSwitches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises `name` until the next reset.
    pub fn raise(&mut self, name: impl Into<String>) {
        self.raised.insert(name.into());
    }

    /// Lowers `name` early. Returns true if it was raised.
    pub fn lower(&mut self, name: &str) -> bool {
        self.raised.remove(name)
    }

    pub fn is_raised(&self, name: &str) -> bool {
        self.raised.contains(name)
    }

    /// Lowers every switch.
    pub fn reset(&mut self) {
        self.raised.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.raised.is_empty()
    }

    /// Raised switches in name order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.raised.iter().map(String::as_str)
    }
}

//=== Entity ==============================================================

/// A movable game object with per-tick logic and update switches.
///
/// Entities enter the game only through
/// [`Registry::spawn_entity`](super::Registry::spawn_entity), which starts
/// them with no owning level.
pub struct Entity {
    /// Position in world pixels.
    pub position: Vector2,

    /// Flags raised this tick, reset after post-update.
    pub switches: UpdateSwitches,

    sprite: Rc<Sprite>,
    name: String,
    level: Option<LevelId>,
    pub(super) behavior: Option<Box<dyn EntityBehavior>>,
    renderer: Option<Box<dyn EntityRenderer>>,
}

impl Entity {
    pub fn new(sprite: Rc<Sprite>, position: Vector2, name: impl Into<String>) -> Self {
        Self {
            position,
            switches: UpdateSwitches::new(),
            sprite,
            name: name.into(),
            level: None,
            behavior: None,
            renderer: None,
        }
    }

    /// Attaches game logic to the entity.
    pub fn with_behavior(mut self, behavior: impl EntityBehavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Draws the entity with `renderer` instead of its sprite.
    pub fn with_renderer(mut self, renderer: impl EntityRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn renderer(&self) -> Option<&dyn EntityRenderer> {
        self.renderer.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sprite(&self) -> &Rc<Sprite> {
        &self.sprite
    }

    /// Replaces the sprite (e.g. for a frame of animation).
    pub fn set_sprite(&mut self, sprite: Rc<Sprite>) {
        self.sprite = sprite;
    }

    /// The level this entity currently belongs to, if any.
    pub fn level(&self) -> Option<LevelId> {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: Option<LevelId>) {
        self.level = level;
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("level", &self.level)
            .field("switches", &self.switches)
            .field("sprite", &self.sprite.name())
            .field("custom_renderer", &self.renderer.is_some())
            .finish()
    }
}

//=== Tile ================================================================

/// A static piece of level scenery.
pub struct Tile {
    /// Position in world pixels.
    pub position: Vector2,

    sprite: Rc<Sprite>,
    name: String,
    level: Option<LevelId>,
    pub(super) behavior: Option<Box<dyn TileBehavior>>,
}

impl Tile {
    pub fn new(sprite: Rc<Sprite>, position: Vector2, name: impl Into<String>) -> Self {
        Self {
            position,
            sprite,
            name: name.into(),
            level: None,
            behavior: None,
        }
    }

    pub fn with_behavior(mut self, behavior: impl TileBehavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sprite(&self) -> &Rc<Sprite> {
        &self.sprite
    }

    pub fn level(&self) -> Option<LevelId> {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: Option<LevelId>) {
        self.level = level;
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("level", &self.level)
            .field("sprite", &self.sprite.name())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::TextureId;

    fn sprite() -> Rc<Sprite> {
        Rc::new(Sprite::new(TextureId(1), 16, 16, "grass"))
    }

    #[test]
    fn switches_raise_and_reset() {
        let mut switches = UpdateSwitches::new();
        switches.raise("jumped");
        switches.raise("hit");
        assert!(switches.is_raised("jumped"));
        assert_eq!(switches.iter().collect::<Vec<_>>(), vec!["hit", "jumped"]);

        assert!(switches.lower("hit"));
        assert!(!switches.lower("hit"));

        switches.reset();
        assert!(switches.is_empty());
        assert!(!switches.is_raised("jumped"));
    }

    #[test]
    fn new_objects_have_no_level() {
        let entity = Entity::new(sprite(), Vector2::new(1, 2), "player");
        let tile = Tile::new(sprite(), Vector2::ZERO, "grass");
        assert_eq!(entity.level(), None);
        assert_eq!(tile.level(), None);
    }

    #[test]
    fn objects_share_one_sprite() {
        let shared = sprite();
        let a = Tile::new(Rc::clone(&shared), Vector2::ZERO, "a");
        let b = Tile::new(Rc::clone(&shared), Vector2::new(16, 0), "b");
        assert!(Rc::ptr_eq(a.sprite(), b.sprite()));
        assert_eq!(Rc::strong_count(&shared), 3);
    }

    #[test]
    fn debug_output_names_the_sprite() {
        let entity = Entity::new(sprite(), Vector2::ZERO, "player");
        let text = format!("{:?}", entity);
        assert!(text.contains("player"));
        assert!(text.contains("grass"));
    }
}
