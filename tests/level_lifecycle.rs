//=========================================================================
// Level Lifecycle
//
// Membership caches, reassignment between levels, rendering through a
// recording surface, and unload.
//
//=========================================================================

use std::cell::Cell;
use std::rc::Rc;

use tessel_engine::core::render::DrawCommand;
use tessel_engine::prelude::*;

//=== Helpers =============================================================

struct Counter(Rc<Cell<u32>>);

impl EntityBehavior for Counter {
    fn update(&mut self, _me: EntityId, _ctx: &mut Context, _registry: &mut Registry) -> EngineResult<()> {
        self.0.set(self.0.get() + 1);
        Ok(())
    }
}

fn context() -> Context {
    let mut ctx = Context::new();
    ctx.set_render_engine(RenderEngine::new(CommandBuffer::new(), Vector4::from_size(320, 240)));
    ctx
}

fn drawn_textures(ctx: &mut Context) -> Vec<TextureId> {
    let buffer = ctx
        .render_engine_mut()
        .unwrap()
        .surface_as_mut::<CommandBuffer>()
        .unwrap();
    buffer
        .take()
        .into_iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Texture { texture, .. } => Some(texture),
            _ => None,
        })
        .collect()
}

fn sprite(texture: u32) -> Rc<Sprite> {
    Rc::new(Sprite::new(TextureId(texture), 8, 8, format!("sprite-{}", texture)))
}

//=== Tests ===============================================================

#[test]
fn render_draws_tiles_before_entities_in_creation_order() {
    let mut app = Application::new();
    let level = app.create_level("town");
    let world = app.world_mut();

    let hero = world.spawn_entity(Entity::new(sprite(10), Vector2::new(5, 5), "hero"));
    let grass = world.spawn_tile(Tile::new(sprite(1), Vector2::ZERO, "grass"));
    let rock = world.spawn_tile(Tile::new(sprite(2), Vector2::new(8, 0), "rock"));
    world.switch_tile_level(grass, level).unwrap();
    world.switch_tile_level(rock, level).unwrap();
    world.switch_entity_level(hero, level).unwrap();

    let mut ctx = context();
    drawn_textures(&mut ctx);
    app.world_mut().render_level(level, &mut ctx).unwrap();

    assert_eq!(drawn_textures(&mut ctx), vec![TextureId(1), TextureId(2), TextureId(10)]);
}

/// Draws a rounded nameplate under the sprite.
struct Nameplate;

impl EntityRenderer for Nameplate {
    fn render(&self, engine: &mut RenderEngine, entity: &Entity) {
        engine.draw_sprite(entity.sprite(), entity.position);
        let below = entity.position.y + entity.sprite().height();
        engine.fill_round_rect(Vector4::new(entity.position.x, below, 8, 3), 2, 0xFFFFFFFF);
    }
}

#[test]
fn level_render_uses_entity_renderer_when_present() {
    let mut app = Application::new();
    let level = app.create_level("market");
    let world = app.world_mut();

    let merchant = world.spawn_entity(Entity::new(sprite(12), Vector2::new(4, 4), "merchant").with_renderer(Nameplate));
    world.switch_entity_level(merchant, level).unwrap();

    let mut ctx = context();
    ctx.render_engine_mut().unwrap().surface_as_mut::<CommandBuffer>().unwrap().take();
    app.world_mut().render_level(level, &mut ctx).unwrap();

    let commands = ctx.render_engine_mut().unwrap().surface_as_mut::<CommandBuffer>().unwrap().take();
    assert_eq!(
        commands,
        vec![
            DrawCommand::Texture { texture: TextureId(12), dest: Vector4::new(4, 4, 8, 8) },
            DrawCommand::RoundRect { dest: Vector4::new(4, 12, 8, 3), arc: 2, color: 0xFFFFFFFF },
        ]
    );
}

#[test]
fn reassigned_entity_leaves_render_but_not_update() {
    let updates = Rc::new(Cell::new(0));
    let mut app = Application::new();
    let a = app.create_level("a");
    let b = app.create_level("b");

    let world = app.world_mut();
    let wanderer = world.spawn_entity(
        Entity::new(sprite(7), Vector2::ZERO, "wanderer").with_behavior(Counter(Rc::clone(&updates))),
    );
    world.switch_entity_level(wanderer, a).unwrap();
    assert_eq!(world.level_entities(a).unwrap(), &[wanderer]);

    // Level a's cache is built and still lists the wanderer
    world.switch_entity_level(wanderer, b).unwrap();

    let mut ctx = context();
    drawn_textures(&mut ctx);

    world.render_level(a, &mut ctx).unwrap();
    assert!(drawn_textures(&mut ctx).is_empty());

    world.update_level(a, &mut ctx).unwrap();
    world.update_level(b, &mut ctx).unwrap();
    assert_eq!(updates.get(), 2);

    world.render_level(b, &mut ctx).unwrap();
    assert_eq!(drawn_textures(&mut ctx), vec![TextureId(7)]);
}

#[test]
fn unload_releases_members_and_is_permanent() {
    let updates = Rc::new(Cell::new(0));
    let mut app = Application::new();
    let level = app.create_level("dungeon");

    let world = app.world_mut();
    let bat = world.spawn_entity(
        Entity::new(sprite(3), Vector2::ZERO, "bat").with_behavior(Counter(Rc::clone(&updates))),
    );
    let floor = world.spawn_tile(Tile::new(sprite(4), Vector2::ZERO, "floor"));
    world.switch_entity_level(bat, level).unwrap();
    world.switch_tile_level(floor, level).unwrap();

    world.unload_level(level).unwrap();
    world.unload_level(level).unwrap();

    assert!(world.level(level).unwrap().is_unloaded());
    assert_eq!(world.registry().entity(bat).unwrap().level(), None);
    assert_eq!(world.registry().tile(floor).unwrap().level(), None);

    // Every operation is now inert
    world.switch_entity_level(bat, level).unwrap();
    assert_eq!(world.registry().entity(bat).unwrap().level(), None);
    assert!(world.level_entities(level).unwrap().is_empty());

    let mut ctx = context();
    drawn_textures(&mut ctx);
    world.update_level(level, &mut ctx).unwrap();
    world.render_level(level, &mut ctx).unwrap();
    world.post_update_level(level, &mut ctx).unwrap();

    assert_eq!(updates.get(), 0);
    assert!(drawn_textures(&mut ctx).is_empty());
}

#[test]
fn unload_after_late_tile_switch_leaves_no_dangling_level() {
    let mut app = Application::new();
    let level = app.create_level("ruins");
    let world = app.world_mut();

    let pillar = world.spawn_tile(Tile::new(sprite(1), Vector2::ZERO, "pillar"));
    world.switch_tile_level(pillar, level).unwrap();
    assert_eq!(world.level_tiles(level).unwrap(), &[pillar]);

    let rubble = world.spawn_tile(Tile::new(sprite(2), Vector2::new(8, 0), "rubble"));
    world.switch_tile_level(rubble, level).unwrap();
    world.unload_level(level).unwrap();

    assert!(world.level(level).unwrap().is_unloaded());
    assert_eq!(world.registry().tile(pillar).unwrap().level(), None);
    assert_eq!(world.registry().tile(rubble).unwrap().level(), None);
}

#[test]
fn tile_cache_picks_up_new_members_only_after_refresh() {
    let mut app = Application::new();
    let level = app.create_level("field");
    let world = app.world_mut();

    let first = world.spawn_tile(Tile::new(sprite(1), Vector2::ZERO, "first"));
    world.switch_tile_level(first, level).unwrap();
    assert_eq!(world.level_tiles(level).unwrap(), &[first]);

    let second = world.spawn_tile(Tile::new(sprite(2), Vector2::ZERO, "second"));
    world.switch_tile_level(second, level).unwrap();
    assert_eq!(world.level_tiles(level).unwrap(), &[first]);

    let (lvl, registry) = world.level_mut(level).unwrap();
    lvl.update_tile_cache(registry);
    assert_eq!(lvl.tiles(registry), &[first, second]);
}

#[test]
fn render_without_engine_is_a_lookup_error() {
    let mut app = Application::new();
    let level = app.create_level("void");
    let mut ctx = Context::new();

    let err = app.world_mut().render_level(level, &mut ctx).unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[test]
fn unknown_level_handles_are_rejected() {
    let mut other = Application::new();
    other.create_level("one");
    let foreign = other.create_level("two");

    let mut app = Application::new();
    app.create_level("only");
    assert!(matches!(
        app.world_mut().update_level(foreign, &mut Context::new()),
        Err(EngineError::UnknownLevel(_))
    ));
}
