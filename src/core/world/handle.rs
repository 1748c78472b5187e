//=========================================================================
// Handles
//=========================================================================
//
// Index handles for registry members and levels.
//
// Game objects refer to their level through a `LevelId` instead of a
// pointer, so there is no ownership cycle between a level and the
// entities it caches.
//
//=========================================================================

/// Handle to an entity in the [`Registry`](super::Registry).
///
/// Issued in registration order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

/// Handle to a tile in the [`Registry`](super::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub(crate) usize);

/// Handle to a level in the [`World`](super::World)'s level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(pub(crate) usize);

impl EntityId {
    /// Position of the entity in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl TileId {
    /// Position of the tile in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl LevelId {
    /// Position of the level in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}
