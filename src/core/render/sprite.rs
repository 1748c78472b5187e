//=========================================================================
// Sprites
//=========================================================================
//
// Drawable handles produced by the sprite loader.
//
// The engine never touches pixel data: a sprite is an opaque texture
// handle plus the size to draw it at. Objects share sprites through `Rc`.
//
//=========================================================================

/// Opaque texture handle issued by whatever loads images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// A named texture with a draw size in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    texture: TextureId,
    width: i32,
    height: i32,
    name: String,
}

impl Sprite {
    pub fn new(texture: TextureId, width: i32, height: i32, name: impl Into<String>) -> Self {
        Self {
            texture,
            width,
            height,
            name: name.into(),
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
