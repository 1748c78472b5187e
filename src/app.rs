//=========================================================================
// Application Loop
//
// Top-level driver: owns the world and runs the frame phases.
//
// Architecture:
// ```text
//     ApplicationBuilder ──build()──> Application ──start()──> [Main Loop]
//         │                              │
//         ├─ with_target_fps()           ├─ set_update() / set_render()
//         ├─ uncapped()                  ├─ create_level() → post-update task
//         └─ with_frame_limit()          └─ stop_handle()
// ```
//
// Frame Phases (strictly sequential, single thread):
// ```text
//   poll window → InputState → update → post-update tasks (in order) → render → present
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::globals::{keys, Context};
use crate::core::input::{InputEvent, InputState};
use crate::core::level::{LevelHooks, NoHooks};
use crate::core::platform_bridge::{TickControl, Window};
use crate::core::world::{LevelId, World};
use crate::error::{EngineError, EngineResult};

//=== Callback Types ======================================================

/// Update or render callback.
pub type FrameCallback = Box<dyn FnMut(&mut Context, &mut World) -> EngineResult<()>>;

/// Work run between the update and render phases.
pub type PostUpdateTask = Box<dyn FnMut(&mut Context, &mut World) -> EngineResult<()>>;

//=== ApplicationBuilder ==================================================

/// Builder for configuring and constructing an [`Application`].
///
/// # Default Values
///
/// - **Target FPS**: 60.0
/// - **Frame limit**: none (runs until stopped or the window closes)
///
/// # Examples
///
/// ```
/// use tessel_engine::ApplicationBuilder;
///
/// let app = ApplicationBuilder::new()
///     .with_target_fps(144.0)
///     .with_frame_limit(10)
///     .build();
/// assert!(!app.is_running());
/// ```
#[derive(Debug, Clone)]
pub struct ApplicationBuilder {
    target_fps: Option<f64>,
    frame_limit: Option<u64>,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            target_fps: Some(60.0),
            frame_limit: None,
        }
    }

    /// Sets the frame rate the loop paces itself to.
    ///
    /// Pacing is best-effort: a frame that overruns its budget is not
    /// compensated for.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_target_fps(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "Target FPS must be positive, got {}", fps);
        self.target_fps = Some(fps);
        self
    }

    /// Runs frames back to back without sleeping.
    pub fn uncapped(mut self) -> Self {
        self.target_fps = None;
        self
    }

    /// Stops [`Application::start`] after `frames` frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn build(self) -> Application {
        info!(
            target: "app",
            "Building application (FPS: {}, frame limit: {:?})",
            self.target_fps.map_or_else(|| "uncapped".to_string(), |fps| fps.to_string()),
            self.frame_limit
        );

        let (stop_tx, stop_rx) = unbounded();
        Application {
            update: None,
            render: None,
            post_update: Vec::new(),
            world: World::new(),
            running: false,
            stop_tx,
            stop_rx,
            target_fps: self.target_fps,
            frame_limit: self.frame_limit,
            frames: 0,
            load_start: None,
        }
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== StopHandle ==========================================================

/// Requests the main loop to stop. May be cloned and sent across threads.
///
/// The loop checks for requests between frames only; a frame in progress
/// always completes.
#[derive(Debug, Clone)]
pub struct StopHandle {
    sender: Sender<()>,
}

impl StopHandle {
    pub fn stop(&self) {
        // Fails only once the application is dropped
        let _ = self.sender.try_send(());
    }
}

//=== Application =========================================================

/// Owns the [`World`] and drives update, post-update and render phases.
///
/// # Examples
///
/// ```
/// use tessel_engine::prelude::*;
///
/// let mut app = Application::new();
/// let level = app.create_level("overworld");
///
/// app.set_update(move |_ctx, world| {
///     assert!(!world.level(level)?.is_unloaded());
///     Ok(())
/// });
///
/// let mut ctx = Context::new();
/// app.run_frame(&mut ctx).unwrap();
/// assert_eq!(app.frame_count(), 1);
/// ```
pub struct Application {
    update: Option<FrameCallback>,
    render: Option<FrameCallback>,
    post_update: Vec<PostUpdateTask>,
    world: World,
    running: bool,
    stop_tx: Sender<()>,
    stop_rx: Receiver<()>,
    target_fps: Option<f64>,
    frame_limit: Option<u64>,
    frames: u64,
    load_start: Option<Instant>,
}

impl Application {
    /// Creates an application with default settings.
    pub fn new() -> Self {
        ApplicationBuilder::new().build()
    }

    //--- Configuration ----------------------------------------------------

    /// Replaces the update callback.
    pub fn set_update<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Context, &mut World) -> EngineResult<()> + 'static,
    {
        self.update = Some(Box::new(callback));
    }

    /// Replaces the render callback.
    pub fn set_render<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Context, &mut World) -> EngineResult<()> + 'static,
    {
        self.render = Some(Box::new(callback));
    }

    /// Appends a task to the post-update phase. Tasks are never removed.
    pub fn register_post_update<F>(&mut self, task: F)
    where
        F: FnMut(&mut Context, &mut World) -> EngineResult<()> + 'static,
    {
        self.post_update.push(Box::new(task));
        trace!(target: "app", "Post-update task #{} registered", self.post_update.len());
    }

    pub fn post_update_task_count(&self) -> usize {
        self.post_update.len()
    }

    //--- Levels -----------------------------------------------------------

    /// Creates a level without hooks. See [`create_level_with_hooks`](Self::create_level_with_hooks).
    pub fn create_level(&mut self, name: impl Into<String>) -> LevelId {
        self.create_level_with_hooks(name, NoHooks)
    }

    /// Creates a level and registers the post-update task that drives it.
    ///
    /// The task stays registered after the level is unloaded; it then does
    /// nothing.
    pub fn create_level_with_hooks(
        &mut self,
        name: impl Into<String>,
        hooks: impl LevelHooks + 'static,
    ) -> LevelId {
        let id = self.world.insert_level(name.into(), Box::new(hooks));
        self.register_post_update(move |ctx, world| world.post_update_level(id, ctx));
        id
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    //--- State ------------------------------------------------------------

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            sender: self.stop_tx.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames completed over the application's lifetime.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Starts the load timer; the elapsed time is logged after the next
    /// frame completes.
    pub fn record_load_start(&mut self) {
        self.load_start = Some(Instant::now());
    }

    //--- Execution --------------------------------------------------------

    /// Runs one frame: update, every post-update task in registration
    /// order, then render.
    ///
    /// All phases run even if one fails. The first error is returned once
    /// the frame completes.
    pub fn run_frame(&mut self, ctx: &mut Context) -> EngineResult<()> {
        let mut first_error = None;
        let world = &mut self.world;

        if let Some(update) = self.update.as_mut() {
            record_error(&mut first_error, "update", update(ctx, world));
        }

        for task in self.post_update.iter_mut() {
            record_error(&mut first_error, "post-update", task(ctx, world));
        }

        if let Some(render) = self.render.as_mut() {
            record_error(&mut first_error, "render", render(ctx, world));
        }

        self.frames += 1;
        trace!(target: "app", "Frame {} complete", self.frames);

        if let Some(start) = self.load_start.take() {
            info!(target: "app", "Load finished in {:.2?}", start.elapsed());
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Runs the main loop until stopped, the window closes, or the frame
    /// limit is reached.
    ///
    /// Inserts an [`InputState`] under [`keys::INPUT`] if the context has
    /// none, publishes the window size under [`keys::WINDOW_SIZE`] every
    /// frame, and syncs the render engine viewport (when present) with the
    /// window size before the first frame. Stop requests sent before this
    /// call are discarded.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a frame or by the window; the loop
    /// stops at that frame.
    pub fn start(&mut self, ctx: &mut Context, window: &mut dyn Window) -> EngineResult<()> {
        if !ctx.contains(keys::INPUT) {
            ctx.set(keys::INPUT, InputState::new());
        }

        let size = window.size();
        if let Ok(engine) = ctx.render_engine_mut() {
            if engine.has_viewport_changed(size) {
                engine.resize_viewport(size);
            }
        }

        while self.stop_rx.try_recv().is_ok() {}

        info!(
            target: "app",
            "Starting main loop ({}x{}, {} post-update tasks)",
            size.width(),
            size.height(),
            self.post_update.len()
        );

        let frame_budget = self.target_fps.map(|fps| Duration::from_secs_f64(1.0 / fps));
        let first_frame = self.frames;
        let mut events = Vec::with_capacity(64);
        self.running = true;

        let result = loop {
            if self.frame_limit.is_some_and(|limit| self.frames - first_frame >= limit) {
                debug!(target: "app", "Frame limit reached");
                break Ok(());
            }

            let frame_start = Instant::now();
            match self.tick(ctx, window, &mut events) {
                Ok(TickControl::Continue) => {}
                Ok(TickControl::Exit) => break Ok(()),
                Err(e) => break Err(e),
            }

            if let Some(budget) = frame_budget {
                let elapsed = frame_start.elapsed();
                if elapsed < budget {
                    thread::sleep(budget - elapsed);
                }
            }
        };

        self.running = false;
        match &result {
            Ok(()) => info!(target: "app", "Main loop stopped after {} frames", self.frames - first_frame),
            Err(e) => warn!(target: "app", "Main loop aborted: {}", e),
        }
        result
    }

    //--- Internal Helpers -------------------------------------------------

    fn tick(
        &mut self,
        ctx: &mut Context,
        window: &mut dyn Window,
        events: &mut Vec<InputEvent>,
    ) -> EngineResult<TickControl> {
        if self.stop_requested() {
            info!(target: "app", "Stop requested");
            return Ok(TickControl::Exit);
        }

        events.clear();
        if TickControl::from(window.poll_events(events)?) == TickControl::Exit {
            info!(target: "app", "Window close requested");
            return Ok(TickControl::Exit);
        }

        ctx.set(keys::WINDOW_SIZE, window.size());
        ctx.get_mut::<InputState>(keys::INPUT)?.advance_frame(events);
        self.run_frame(ctx)?;
        window.present()?;

        Ok(TickControl::Continue)
    }

    fn stop_requested(&self) -> bool {
        let mut requested = false;
        while self.stop_rx.try_recv().is_ok() {
            requested = true;
        }
        requested
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("has_update", &self.update.is_some())
            .field("has_render", &self.render.is_some())
            .field("post_update_tasks", &self.post_update.len())
            .field("running", &self.running)
            .field("frames", &self.frames)
            .field("world", &self.world)
            .finish()
    }
}

fn record_error(first: &mut Option<EngineError>, phase: &str, result: EngineResult<()>) {
    if let Err(e) = result {
        if first.is_none() {
            *first = Some(e);
        } else {
            warn!(target: "app", "Additional {} error this frame: {}", phase, e);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
