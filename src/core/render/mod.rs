//=========================================================================
// Render Engine
//=========================================================================
//
// Draws tiles and entities onto a `DrawSurface`.
//
// Architecture:
//   Level::render() ─┐
//   render callback ─┴─► RenderEngine ──► anchors + viewport ──► DrawSurface
//
// The engine is stored in the `Context` under `keys::RENDER_ENGINE` so
// levels and game callbacks reach the same instance.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, trace};

//=== Module Declarations =================================================

mod anchor;
mod sprite;
mod surface;

//=== Public API ==========================================================

pub use anchor::{combined_offset, Align, Anchor};
pub use sprite::{Sprite, TextureId};
pub use surface::{CommandBuffer, DrawCommand, DrawSurface};

//=== Internal Dependencies ===============================================

use crate::core::math::{Vector2, Vector4};
use crate::core::world::{Entity, Tile};

//=== EntityRenderer Trait ================================================

/// Custom drawing for one entity, replacing the plain sprite blit.
///
/// Attached with [`Entity::with_renderer`]. The renderer draws through the
/// engine, so anchors apply as usual:
///
/// ```
/// use tessel_engine::core::render::{EntityRenderer, RenderEngine};
/// use tessel_engine::core::math::Vector4;
/// use tessel_engine::core::world::Entity;
///
/// struct Shadowed;
///
/// impl EntityRenderer for Shadowed {
///     fn render(&self, engine: &mut RenderEngine, entity: &Entity) {
///         let sprite = entity.sprite();
///         engine.fill_round_rect(
///             Vector4::new(entity.position.x, entity.position.y + sprite.height(), sprite.width(), 4),
///             4,
///             0x80000000,
///         );
///         engine.draw_sprite(sprite, entity.position);
///     }
/// }
/// ```
pub trait EntityRenderer {
    fn render(&self, engine: &mut RenderEngine, entity: &Entity);
}

//=== RenderEngine ========================================================

/// Sprite renderer with viewport tracking and anchored drawing.
///
/// # Examples
///
/// ```
/// use tessel_engine::core::math::{Vector2, Vector4};
/// use tessel_engine::core::render::{Anchor, CommandBuffer, RenderEngine, Sprite, TextureId};
///
/// let mut engine = RenderEngine::new(CommandBuffer::new(), Vector4::from_size(800, 600));
/// engine.set_anchors(&[Anchor::CENTER]);
///
/// let sprite = Sprite::new(TextureId(1), 32, 32, "player");
/// engine.draw_sprite(&sprite, Vector2::new(-16, -16));
/// assert_eq!(engine.draw_calls(), 1);
/// ```
pub struct RenderEngine {
    surface: Box<dyn DrawSurface>,
    viewport: Vector4,
    anchors: Vec<Anchor>,
    draw_calls: usize,
}

impl RenderEngine {
    //--- Construction -----------------------------------------------------

    /// Creates an engine drawing to `surface` with the given viewport.
    pub fn new(surface: impl DrawSurface, viewport: Vector4) -> Self {
        let mut surface: Box<dyn DrawSurface> = Box::new(surface);
        surface.set_viewport(viewport);
        info!(target: "render", "Render engine created ({}x{})", viewport.width(), viewport.height());

        Self {
            surface,
            viewport,
            anchors: Vec::new(),
            draw_calls: 0,
        }
    }

    //--- Frame Drawing ----------------------------------------------------

    /// Clears the surface and starts a new draw-call count.
    pub fn clear(&mut self, color: u32) {
        trace!(target: "render", "Clear after {} draw calls", self.draw_calls);
        self.draw_calls = 0;
        self.surface.clear(color);
    }

    pub fn render_tile(&mut self, tile: &Tile) {
        self.draw_sprite(tile.sprite(), tile.position);
    }

    /// Draws `entity` with its own renderer if it has one, otherwise
    /// blits its sprite.
    pub fn render_entity(&mut self, entity: &Entity) {
        match entity.renderer() {
            Some(renderer) => renderer.render(self, entity),
            None => self.draw_sprite(entity.sprite(), entity.position),
        }
    }

    /// Draws `sprite` at `position` shifted by the active anchors.
    pub fn draw_sprite(&mut self, sprite: &Sprite, position: Vector2) {
        let at = position + self.anchor_offset();
        self.surface
            .draw_texture(sprite.texture(), Vector4::new(at.x, at.y, sprite.width(), sprite.height()));
        self.draw_calls += 1;
    }

    /// Fills `rect` shifted by the active anchors.
    pub fn fill_rect(&mut self, rect: Vector4, color: u32) {
        let at = rect.origin() + self.anchor_offset();
        self.surface
            .fill_rect(Vector4::new(at.x, at.y, rect.width(), rect.height()), color);
        self.draw_calls += 1;
    }

    /// Fills `rect` with corners rounded by `arc`, shifted by the active
    /// anchors. `arc` is the corner diameter in pixels.
    pub fn fill_round_rect(&mut self, rect: Vector4, arc: i32, color: u32) {
        let at = rect.origin() + self.anchor_offset();
        self.surface
            .fill_round_rect(Vector4::new(at.x, at.y, rect.width(), rect.height()), arc, color);
        self.draw_calls += 1;
    }

    /// Draw calls issued since the last [`clear`](Self::clear).
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    //--- Viewport ---------------------------------------------------------

    pub fn viewport(&self) -> Vector4 {
        self.viewport
    }

    /// Returns true if `size` differs from the last known viewport.
    pub fn has_viewport_changed(&self, size: Vector4) -> bool {
        self.viewport != size
    }

    /// Records the new viewport and updates the surface projection.
    pub fn resize_viewport(&mut self, size: Vector4) {
        info!(
            target: "render",
            "Viewport resized: {}x{} -> {}x{}",
            self.viewport.width(),
            self.viewport.height(),
            size.width(),
            size.height()
        );
        self.viewport = size;
        self.surface.set_viewport(size);
    }

    //--- Anchors ----------------------------------------------------------

    /// Replaces the active anchors. An empty slice disables anchoring.
    pub fn set_anchors(&mut self, anchors: &[Anchor]) {
        self.anchors = anchors.to_vec();
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Offset applied to every draw for the current viewport.
    pub fn anchor_offset(&self) -> Vector2 {
        combined_offset(&self.anchors, self.viewport)
    }

    //--- Surface Access ---------------------------------------------------

    /// Returns the surface as `T` if that is its concrete type.
    pub fn surface_as<T: DrawSurface>(&self) -> Option<&T> {
        self.surface.as_any().downcast_ref::<T>()
    }

    /// Mutable variant of [`surface_as`](Self::surface_as).
    pub fn surface_as_mut<T: DrawSurface>(&mut self) -> Option<&mut T> {
        self.surface.as_any_mut().downcast_mut::<T>()
    }
}

impl std::fmt::Debug for RenderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderEngine")
            .field("viewport", &self.viewport)
            .field("anchors", &self.anchors)
            .field("draw_calls", &self.draw_calls)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn engine() -> RenderEngine {
        RenderEngine::new(CommandBuffer::new(), Vector4::from_size(200, 100))
    }

    fn commands(engine: &RenderEngine) -> &[DrawCommand] {
        engine.surface_as::<CommandBuffer>().unwrap().commands()
    }

    #[test]
    fn construction_sets_surface_viewport() {
        let engine = engine();
        assert_eq!(commands(&engine), &[DrawCommand::Viewport(Vector4::from_size(200, 100))]);
    }

    #[test]
    fn viewport_change_detection() {
        let mut engine = engine();
        assert!(!engine.has_viewport_changed(Vector4::from_size(200, 100)));
        assert!(engine.has_viewport_changed(Vector4::from_size(400, 100)));

        engine.resize_viewport(Vector4::from_size(400, 100));
        assert!(!engine.has_viewport_changed(Vector4::from_size(400, 100)));
        assert_eq!(engine.viewport().width(), 400);
        assert_eq!(commands(&engine).last(), Some(&DrawCommand::Viewport(Vector4::from_size(400, 100))));
    }

    #[test]
    fn sprites_draw_at_position_without_anchors() {
        let mut engine = engine();
        let tile = Tile::new(
            Rc::new(Sprite::new(TextureId(4), 16, 8, "wall")),
            Vector2::new(10, 20),
            "wall",
        );
        engine.render_tile(&tile);

        assert_eq!(
            commands(&engine).last(),
            Some(&DrawCommand::Texture { texture: TextureId(4), dest: Vector4::new(10, 20, 16, 8) })
        );
    }

    #[test]
    fn anchors_offset_every_draw_and_follow_resizes() {
        let mut engine = engine();
        engine.set_anchors(&[Anchor::CENTER]);
        let entity = Entity::new(
            Rc::new(Sprite::new(TextureId(1), 2, 2, "dot")),
            Vector2::new(1, 1),
            "dot",
        );

        engine.render_entity(&entity);
        engine.resize_viewport(Vector4::from_size(400, 300));
        engine.render_entity(&entity);
        engine.fill_rect(Vector4::new(0, 0, 5, 5), 7);

        let draws: Vec<_> = commands(&engine)
            .iter()
            .filter(|c| !matches!(c, DrawCommand::Viewport(_)))
            .copied()
            .collect();
        assert_eq!(
            draws,
            vec![
                DrawCommand::Texture { texture: TextureId(1), dest: Vector4::new(101, 51, 2, 2) },
                DrawCommand::Texture { texture: TextureId(1), dest: Vector4::new(201, 151, 2, 2) },
                DrawCommand::Rect { dest: Vector4::new(200, 150, 5, 5), color: 7 },
            ]
        );
    }

    #[test]
    fn round_rect_follows_anchors() {
        let mut engine = engine();
        engine.set_anchors(&[Anchor::BOTTOM_RIGHT]);
        engine.fill_round_rect(Vector4::new(-20, -10, 20, 10), 6, 0xFF00FF00);

        assert_eq!(
            commands(&engine).last(),
            Some(&DrawCommand::RoundRect { dest: Vector4::new(180, 90, 20, 10), arc: 6, color: 0xFF00FF00 })
        );
        assert_eq!(engine.draw_calls(), 1);
    }

    /// Draws a badge above the entity instead of its sprite.
    struct Badge;

    impl EntityRenderer for Badge {
        fn render(&self, engine: &mut RenderEngine, entity: &Entity) {
            engine.fill_round_rect(Vector4::new(entity.position.x, entity.position.y - 4, 8, 4), 2, 9);
        }
    }

    #[test]
    fn custom_renderer_replaces_sprite_blit() {
        let mut engine = engine();
        engine.set_anchors(&[Anchor::CENTER]);
        let sprite = Rc::new(Sprite::new(TextureId(1), 8, 8, "npc"));
        let plain = Entity::new(Rc::clone(&sprite), Vector2::new(0, 10), "plain");
        let badged = Entity::new(sprite, Vector2::new(0, 10), "badged").with_renderer(Badge);

        engine.render_entity(&plain);
        engine.render_entity(&badged);

        let draws: Vec<_> = commands(&engine)
            .iter()
            .filter(|c| !matches!(c, DrawCommand::Viewport(_)))
            .copied()
            .collect();
        assert_eq!(
            draws,
            vec![
                DrawCommand::Texture { texture: TextureId(1), dest: Vector4::new(100, 60, 8, 8) },
                DrawCommand::RoundRect { dest: Vector4::new(100, 56, 8, 4), arc: 2, color: 9 },
            ]
        );
    }

    #[test]
    fn clear_resets_draw_call_count() {
        let mut engine = engine();
        let sprite = Sprite::new(TextureId(1), 1, 1, "p");
        engine.draw_sprite(&sprite, Vector2::ZERO);
        engine.draw_sprite(&sprite, Vector2::ZERO);
        assert_eq!(engine.draw_calls(), 2);

        engine.clear(0);
        assert_eq!(engine.draw_calls(), 0);
    }
}
