//=========================================================================
// Tile Demo
//
// A thousand randomly placed tiles and one player-controlled entity.
//
// Controls:
//   Arrows / WASD  move the player
//   F1             toggle the debug overlay
//   Escape         quit
//
// Run with `RUST_LOG=debug cargo run --features demo --bin tile_demo` for
// engine logs.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{error, info, trace};

//=== Engine ==============================================================

use tessel_engine::platform::{WindowConfig, WinitWindow};
use tessel_engine::prelude::*;

//=== Constants ===========================================================

const TILE_COUNT: usize = 1000;
const TILE_SIZE: i32 = 16;
const WORLD_WIDTH: i32 = 1280;
const WORLD_HEIGHT: i32 = 720;
const BACKGROUND: u32 = 0xFF10141C;
const OVERLAY: u32 = 0x80FF4040;
const SHADOW: u32 = 0x60000000;

//=== Player ==============================================================

struct Player {
    speed: i32,
}

impl EntityBehavior for Player {
    fn start(&mut self, me: EntityId, _ctx: &mut Context, registry: &mut Registry) -> EngineResult<()> {
        if let Some(entity) = registry.entity(me) {
            info!(target: "demo", "{} spawned at {:?}", entity.name(), entity.position);
        }
        Ok(())
    }

    fn update(&mut self, me: EntityId, ctx: &mut Context, registry: &mut Registry) -> EngineResult<()> {
        let input = ctx.input()?;
        let held = |a, b| input.is_key_down(a) || input.is_key_down(b);

        let mut step = Vector2::ZERO;
        if held(KeyCode::ArrowLeft, KeyCode::KeyA) {
            step.x -= self.speed;
        }
        if held(KeyCode::ArrowRight, KeyCode::KeyD) {
            step.x += self.speed;
        }
        if held(KeyCode::ArrowUp, KeyCode::KeyW) {
            step.y -= self.speed;
        }
        if held(KeyCode::ArrowDown, KeyCode::KeyS) {
            step.y += self.speed;
        }

        if step != Vector2::ZERO {
            let entity = registry.entity_mut(me).ok_or(EngineError::UnknownEntity(me))?;
            entity.position += step;
            entity.switches.raise("moved");
        }
        Ok(())
    }

    fn post_update(&mut self, me: EntityId, _ctx: &mut Context, registry: &mut Registry) -> EngineResult<()> {
        if let Some(entity) = registry.entity(me).filter(|e| e.switches.is_raised("moved")) {
            trace!(target: "demo", "Player moved to {:?}", entity.position);
        }
        Ok(())
    }
}

/// Draws a soft shadow under the player before its sprite.
struct Shadowed;

impl EntityRenderer for Shadowed {
    fn render(&self, engine: &mut RenderEngine, entity: &Entity) {
        let sprite = entity.sprite();
        engine.fill_round_rect(
            Vector4::new(entity.position.x + 2, entity.position.y + sprite.height() - 3, sprite.width() - 4, 5),
            5,
            SHADOW,
        );
        engine.draw_sprite(sprite, entity.position);
    }
}

//=== Debug Overlay =======================================================

/// Outlines the player while debug mode is on.
struct DebugOverlay {
    player: EntityId,
}

impl LevelHooks for DebugOverlay {
    fn on_render(&mut self, _level: &mut Level, ctx: &mut Context, registry: &Registry) -> EngineResult<()> {
        if !ctx.is_debug_active() {
            return Ok(());
        }

        let player = registry.entity(self.player).ok_or(EngineError::UnknownEntity(self.player))?;
        let sprite = player.sprite();
        ctx.render_engine_mut()?.fill_rect(
            Vector4::new(player.position.x - 2, player.position.y - 2, sprite.width() + 4, sprite.height() + 4),
            OVERLAY,
        );
        Ok(())
    }
}

//=== Setup ===============================================================

fn populate(app: &mut Application, ctx: &mut Context) -> EngineResult<()> {
    let ground = Rc::new(Sprite::new(TextureId(1), TILE_SIZE, TILE_SIZE, "ground"));
    let hero = Rc::new(Sprite::new(TextureId(2), TILE_SIZE, TILE_SIZE, "hero"));

    let player = Entity::new(hero, Vector2::new(WORLD_WIDTH / 2, WORLD_HEIGHT / 2), "player")
        .with_behavior(Player { speed: 3 })
        .with_renderer(Shadowed);
    let player = app.world_mut().spawn_entity(player);

    let level = app.create_level_with_hooks("meadow", DebugOverlay { player });
    let world = app.world_mut();

    for i in 0..TILE_COUNT {
        let position = Vector2::new(
            fastrand::i32(0..WORLD_WIDTH / TILE_SIZE) * TILE_SIZE,
            fastrand::i32(0..WORLD_HEIGHT / TILE_SIZE) * TILE_SIZE,
        );
        let tile = world.spawn_tile(Tile::new(Rc::clone(&ground), position, format!("tile-{}", i)));
        world.switch_tile_level(tile, level)?;
    }
    world.switch_entity_level(player, level)?;
    world.registry_mut().start_entity(player, ctx)?;

    info!(target: "demo", "Level populated with {} tiles", world.level_tiles(level)?.len());

    let stop = app.stop_handle();
    app.set_update(move |ctx, world| {
        let input = ctx.input()?;
        if input.is_key_pressed(KeyCode::Escape) {
            stop.stop();
        }
        if input.is_key_pressed(KeyCode::F1) {
            let active = ctx.toggle_debug();
            info!(target: "demo", "Debug overlay {}", if active { "on" } else { "off" });
        }
        world.update_level(level, ctx)
    });

    app.set_render(move |ctx, world| {
        let size = *ctx.get::<Vector4>(keys::WINDOW_SIZE)?;
        let engine = ctx.render_engine_mut()?;
        if engine.has_viewport_changed(size) {
            engine.resize_viewport(size);
        }
        engine.clear(BACKGROUND);

        world.render_level(level, ctx)?;

        // Replay target for a GPU backend; the demo only counts the work
        if let Some(buffer) = ctx.render_engine_mut()?.surface_as_mut::<CommandBuffer>() {
            trace!(target: "demo", "Frame recorded {} commands", buffer.take().len());
        }
        Ok(())
    });

    Ok(())
}

//=== Entry Point =========================================================

fn run() -> EngineResult<()> {
    let mut app = ApplicationBuilder::new().with_target_fps(60.0).build();
    app.record_load_start();

    let config = WindowConfig::new("Tessel - Tile Demo", WORLD_WIDTH as u32, WORLD_HEIGHT as u32);
    let mut window = WinitWindow::new(config)?;

    let mut ctx = Context::new();
    ctx.set_render_engine(RenderEngine::new(CommandBuffer::new(), window.size()));
    ctx.set_debug(false);

    populate(&mut app, &mut ctx)?;
    app.start(&mut ctx, &mut window)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!(target: "demo", "Demo failed: {}", e);
        std::process::exit(1);
    }
}
