//=========================================================================
// Tessel Engine - Library Root
//
// A small 2D tile engine: a keyed context, an entity/tile registry split
// into levels, a render engine with anchors, and an application loop that
// runs update → post-update → render every frame.
//
// Typical usage:
// ```no_run
// use tessel_engine::prelude::*;
// use tessel_engine::platform::{WindowConfig, WinitWindow};
//
// fn main() -> EngineResult<()> {
//     let mut window = WinitWindow::new(WindowConfig::default())?;
//     let mut ctx = Context::new();
//     ctx.set_render_engine(RenderEngine::new(CommandBuffer::new(), window.size()));
//
//     let mut app = Application::new();
//     let level = app.create_level("main");
//     app.set_render(move |ctx, world| world.render_level(level, ctx));
//     app.start(&mut ctx, &mut window)
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent systems (context, world, levels,
// rendering, input). Most applications only need the prelude.
//
pub mod core;
pub mod error;
pub mod prelude;

//--- Platform ------------------------------------------------------------
//
// `platform` wraps winit behind the `Window` trait. Not available where
// winit cannot pump events from a caller-owned loop.
//
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub mod platform;

//--- Internal Modules ----------------------------------------------------

mod app;

//--- Public Exports ------------------------------------------------------

pub use app::{Application, ApplicationBuilder, FrameCallback, PostUpdateTask, StopHandle};
pub use error::{EngineError, EngineResult};
