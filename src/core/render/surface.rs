//=========================================================================
// Draw Surface
//=========================================================================
//
// The seam between the render engine and whatever puts pixels on screen.
//
// Architecture:
//   RenderEngine ──► dyn DrawSurface ──► backend (GPU, software, ...)
//                         │
//                         └─ CommandBuffer: records DrawCommands for a
//                            backend to replay after the frame
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::TextureId;
use crate::core::math::Vector4;

//=== DrawSurface Trait ===================================================

/// Drawing target used by the [`RenderEngine`](super::RenderEngine).
///
/// Coordinates are final screen pixels; anchoring has already been
/// applied by the engine.
pub trait DrawSurface: 'static {
    /// Fills the whole surface with `color` (0xAARRGGBB).
    fn clear(&mut self, color: u32);

    /// Draws `texture` stretched over `dest` (x, y, width, height).
    fn draw_texture(&mut self, texture: TextureId, dest: Vector4);

    /// Fills `dest` with `color`.
    fn fill_rect(&mut self, dest: Vector4, color: u32);

    /// Fills `dest` with `color`, corners rounded to diameter `arc`.
    fn fill_round_rect(&mut self, dest: Vector4, arc: i32, color: u32);

    /// Updates the projection after the viewport changed.
    fn set_viewport(&mut self, viewport: Vector4);

    /// Downcasts to `&dyn Any` for backend-specific access.
    fn as_any(&self) -> &dyn Any;

    /// Downcasts to `&mut dyn Any` for backend-specific access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=== DrawCommand =========================================================

/// One recorded drawing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(u32),
    Texture { texture: TextureId, dest: Vector4 },
    Rect { dest: Vector4, color: u32 },
    RoundRect { dest: Vector4, arc: i32, color: u32 },
    Viewport(Vector4),
}

//=== CommandBuffer =======================================================

/// Surface that records commands instead of drawing them.
///
/// A backend drains it once per frame with [`take`](Self::take).
#[derive(Debug, Default, Clone)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last [`take`](Self::take).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Removes and returns all recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl DrawSurface for CommandBuffer {
    fn clear(&mut self, color: u32) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_texture(&mut self, texture: TextureId, dest: Vector4) {
        self.commands.push(DrawCommand::Texture { texture, dest });
    }

    fn fill_rect(&mut self, dest: Vector4, color: u32) {
        self.commands.push(DrawCommand::Rect { dest, color });
    }

    fn fill_round_rect(&mut self, dest: Vector4, arc: i32, color: u32) {
        self.commands.push(DrawCommand::RoundRect { dest, arc, color });
    }

    fn set_viewport(&mut self, viewport: Vector4) {
        self.commands.push(DrawCommand::Viewport(viewport));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let mut buffer = CommandBuffer::new();
        buffer.clear(0xFF000000);
        buffer.draw_texture(TextureId(3), Vector4::new(1, 2, 8, 8));
        buffer.fill_rect(Vector4::new(0, 0, 4, 4), 0xFFFF0000);
        buffer.fill_round_rect(Vector4::new(2, 2, 6, 6), 3, 0xFF0000FF);

        assert_eq!(
            buffer.commands(),
            &[
                DrawCommand::Clear(0xFF000000),
                DrawCommand::Texture { texture: TextureId(3), dest: Vector4::new(1, 2, 8, 8) },
                DrawCommand::Rect { dest: Vector4::new(0, 0, 4, 4), color: 0xFFFF0000 },
                DrawCommand::RoundRect { dest: Vector4::new(2, 2, 6, 6), arc: 3, color: 0xFF0000FF },
            ]
        );
    }

    #[test]
    fn take_empties_the_buffer() {
        let mut buffer = CommandBuffer::new();
        buffer.set_viewport(Vector4::from_size(10, 10));
        let taken = buffer.take();
        assert_eq!(taken.len(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn downcast_through_trait_object() {
        let mut surface: Box<dyn DrawSurface> = Box::new(CommandBuffer::new());
        surface.clear(0);
        let buffer = surface.as_any().downcast_ref::<CommandBuffer>().unwrap();
        assert_eq!(buffer.len(), 1);
    }
}
