//=========================================================================
// Context
//=========================================================================
//
// Shared keyed store passed to every update and render call.
//
// Architecture:
//   set(key, T) → HashMap<String, Box<dyn Any>>
//                              ↓
//   get::<T>(key) / get_mut::<T>(key) ← downcast on read
//
// Values are type-erased so subsystems and game code can share anything
// (render engine, input state, flags, user data) under stable string keys.
// Keys are never assumed present: reading a key nobody wrote is an error.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::input::InputState;
use crate::core::render::RenderEngine;
use crate::error::{EngineError, EngineResult};

//=== Well-Known Keys =====================================================

/// Stable identifiers for values the engine itself reads and writes.
///
/// Game code may store its own entries under any other key.
pub mod keys {
    /// The active [`RenderEngine`](crate::core::render::RenderEngine).
    pub const RENDER_ENGINE: &str = "render_engine";

    /// Debug overlay flag (`bool`).
    pub const DEBUG: &str = "debug";

    /// Per-frame [`InputState`](crate::core::input::InputState), written by
    /// the application loop before each update.
    pub const INPUT: &str = "input";

    /// Current window size (`Vector4`), written by the application loop
    /// after each poll.
    pub const WINDOW_SIZE: &str = "window_size";
}

//=== Context =============================================================

/// String-keyed store of type-erased values shared across the frame.
///
/// Created once at startup and handed to the application loop, which
/// passes it to every update, post-update and render call. Access is
/// single-threaded, so there is no locking.
///
/// # Examples
///
/// ```
/// use tessel_engine::core::globals::Context;
///
/// let mut ctx = Context::new();
/// ctx.set("score", 10u32);
/// *ctx.get_mut::<u32>("score").unwrap() += 5;
/// assert_eq!(*ctx.get::<u32>("score").unwrap(), 15);
/// assert!(ctx.get::<u32>("lives").is_err());
/// ```
pub struct Context {
    values: HashMap<String, Box<dyn Any>>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    //--- Raw Access -------------------------------------------------------

    /// Stores `value` under `key`, replacing whatever was there.
    ///
    /// The replaced value may have had a different type.
    pub fn set<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`EngineError::KeyNotFound`] if nothing was stored under `key`,
    /// [`EngineError::TypeMismatch`] if the stored value is not a `T`.
    pub fn get<T: Any>(&self, key: &str) -> EngineResult<&T> {
        self.values
            .get(key)
            .ok_or_else(|| EngineError::KeyNotFound(key.to_string()))?
            .downcast_ref::<T>()
            .ok_or_else(|| mismatch::<T>(key))
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut<T: Any>(&mut self, key: &str) -> EngineResult<&mut T> {
        self.values
            .get_mut(key)
            .ok_or_else(|| EngineError::KeyNotFound(key.to_string()))?
            .downcast_mut::<T>()
            .ok_or_else(|| mismatch::<T>(key))
    }

    /// Returns true if anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Removes the value under `key`. Returns true if one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    //--- Debug Flag -------------------------------------------------------

    /// Returns the debug flag. An unset flag reads as `false`.
    pub fn is_debug_active(&self) -> bool {
        self.get::<bool>(keys::DEBUG).copied().unwrap_or(false)
    }

    pub fn set_debug(&mut self, active: bool) {
        self.set(keys::DEBUG, active);
    }

    /// Flips the debug flag and returns the new value.
    pub fn toggle_debug(&mut self) -> bool {
        let active = !self.is_debug_active();
        self.set_debug(active);
        active
    }

    //--- Engine Services --------------------------------------------------

    /// Returns the render engine stored under [`keys::RENDER_ENGINE`].
    pub fn render_engine(&self) -> EngineResult<&RenderEngine> {
        self.get(keys::RENDER_ENGINE)
    }

    /// Mutable variant of [`render_engine`](Self::render_engine).
    pub fn render_engine_mut(&mut self) -> EngineResult<&mut RenderEngine> {
        self.get_mut(keys::RENDER_ENGINE)
    }

    /// Stores the render engine under [`keys::RENDER_ENGINE`].
    pub fn set_render_engine(&mut self, engine: RenderEngine) {
        self.set(keys::RENDER_ENGINE, engine);
    }

    /// Returns this frame's input state stored under [`keys::INPUT`].
    pub fn input(&self) -> EngineResult<&InputState> {
        self.get(keys::INPUT)
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}

//--- Internal Helpers ----------------------------------------------------

fn mismatch<T>(key: &str) -> EngineError {
    EngineError::TypeMismatch {
        key: key.to_string(),
        expected: type_name::<T>(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_fails_with_key_not_found() {
        let ctx = Context::new();
        match ctx.get::<i32>("missing") {
            Err(EngineError::KeyNotFound(key)) => assert_eq!(key, "missing"),
            other => panic!("Expected KeyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn get_wrong_type_fails_with_type_mismatch() {
        let mut ctx = Context::new();
        ctx.set("level_name", String::from("intro"));
        assert!(matches!(
            ctx.get::<i32>("level_name"),
            Err(EngineError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn set_overwrites_unconditionally() {
        let mut ctx = Context::new();
        ctx.set("value", 1i32);
        ctx.set("value", "now a string");
        assert_eq!(*ctx.get::<&str>("value").unwrap(), "now a string");
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut ctx = Context::new();
        ctx.set("counter", 0u64);
        *ctx.get_mut::<u64>("counter").unwrap() += 3;
        assert_eq!(*ctx.get::<u64>("counter").unwrap(), 3);
    }

    #[test]
    fn debug_flag_defaults_to_false_and_toggles() {
        let mut ctx = Context::new();
        assert!(!ctx.is_debug_active());
        assert!(!ctx.contains(keys::DEBUG));

        assert!(ctx.toggle_debug());
        assert!(ctx.is_debug_active());
        assert!(*ctx.get::<bool>(keys::DEBUG).unwrap());

        ctx.set_debug(false);
        assert!(!ctx.is_debug_active());
    }

    #[test]
    fn render_engine_missing_is_an_error() {
        let ctx = Context::new();
        assert!(matches!(
            ctx.render_engine(),
            Err(EngineError::KeyNotFound(_))
        ));
    }

    #[test]
    fn remove_reports_presence() {
        let mut ctx = Context::new();
        ctx.set("a", 1u8);
        assert!(ctx.remove("a"));
        assert!(!ctx.remove("a"));
        assert!(ctx.is_empty());
    }

    #[test]
    fn debug_format_lists_sorted_keys() {
        let mut ctx = Context::new();
        ctx.set("b", 1u8);
        ctx.set("a", 2u8);
        assert_eq!(format!("{:?}", ctx), "Context { keys: [\"a\", \"b\"] }");
    }
}
