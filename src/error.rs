//=========================================================================
// Engine Errors
//=========================================================================
//
// Failure taxonomy for the engine core.
//
// Only setup bugs surface as errors (missing context keys, handles that
// were never issued, platform failures). Operations on unloaded levels
// and stale level back-references degrade silently instead.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::world::{EntityId, LevelId, TileId};

//=== EngineError =========================================================

/// Errors surfaced by the engine core.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A context key was read before anything was stored under it.
    #[error("context key `{0}` not found")]
    KeyNotFound(String),

    /// A context key holds a value of a different type than requested.
    #[error("context key `{key}` does not hold a `{expected}`")]
    TypeMismatch {
        key: String,
        expected: &'static str,
    },

    /// A level handle that the world never issued.
    #[error("unknown level {0:?}")]
    UnknownLevel(LevelId),

    /// An entity handle that the registry never issued.
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// A tile handle that the registry never issued.
    #[error("unknown tile {0:?}")]
    UnknownTile(TileId),

    /// Window or event loop failure.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

//=========================================================================
// Unit Tests
//=========================================================================
