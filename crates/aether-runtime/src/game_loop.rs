//! The busy-poll driver: poll, simulate at a fixed step, render

use crate::clock::GameClock;
use aether_ecs::World;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Steps in one pump above which the driver warns that the host is
/// running behind (half a second of catch-up at the default 60Hz)
const CATCH_UP_WARN_STEPS: u32 = 30;

/// Externally settable shutdown flag.
///
/// Cloneable and sharable across threads (e.g. a signal handler). The loop
/// checks it once per outer iteration; an in-flight fixed-step batch always
/// completes before the flag is observed.
#[derive(Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request shutdown at the next outer iteration
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether shutdown has been requested
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Frame statistics reported to the render hook
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Whether the last outer iteration ran at least one fixed step
    pub stepped: bool,
    /// Total fixed steps run since the loop was created
    pub steps: u64,
    /// Total render passes triggered
    pub frames: u64,
    /// Smoothed milliseconds per frame, recomputed once per second
    pub ms_per_frame: f64,
}

impl FrameStats {
    /// Smoothed frames per second derived from `ms_per_frame`
    pub fn fps(&self) -> f64 {
        if self.ms_per_frame <= 0.0 {
            return 0.0;
        }
        1000.0 / self.ms_per_frame
    }
}

/// The embedding seam between the driver and the application.
///
/// The kernel owns no window, input, or graphics state; the embedder
/// supplies them through these hooks.
pub trait AppHooks {
    /// Called once before the first iteration
    fn on_start(&mut self, _world: &mut World) {}

    /// Poll external input/events; request shutdown through the handle
    fn poll(&mut self, _world: &mut World, _stop: &StopHandle) {}

    /// One render pass. Fires only on iterations that ran at least one
    /// simulation step.
    fn on_render(&mut self, world: &World, stats: &FrameStats);

    /// Called once after the loop exits
    fn on_stop(&mut self, _world: &mut World) {}
}

/// Fixed-step driver for a `World`.
///
/// Accumulates wall-clock time and invokes `World::update` at a constant
/// simulated step, however the elapsed time is chunked across iterations.
/// There is no catch-up cap: a long stall is repaid as a burst of steps, so
/// simulation results do not depend on host performance.
pub struct GameLoop {
    clock: GameClock,
    stats: FrameStats,
    stop: StopHandle,
    frames_this_second: u32,
    fps_window_start: f64,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLoop {
    /// Create a driver with the default 60Hz clock
    pub fn new() -> Self {
        Self::with_clock(GameClock::new())
    }

    /// Create a driver over a configured clock
    pub fn with_clock(clock: GameClock) -> Self {
        Self {
            clock,
            stats: FrameStats::default(),
            stop: StopHandle::default(),
            frames_this_second: 0,
            fps_window_start: 0.0,
        }
    }

    /// A shareable handle for requesting shutdown
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// The driver's clock
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Current frame statistics
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// One outer iteration against the built-in clock: sample elapsed
    /// time, then drain the accumulator. Returns the number of fixed steps
    /// run.
    pub fn pump(&mut self, world: &mut World) -> u32 {
        self.clock.tick();
        self.drain(world)
    }

    /// One outer iteration fed from an external monotonic time source
    pub fn advance(&mut self, world: &mut World, elapsed: f64) -> u32 {
        self.clock.advance(elapsed);
        self.drain(world)
    }

    fn drain(&mut self, world: &mut World) -> u32 {
        let step = self.clock.fixed_timestep;
        let mut steps = 0u32;
        while self.clock.should_fixed_update() {
            self.clock.consume_fixed_step();
            // Always exactly the fixed step, never the raw delta
            world.update(step as f32);
            steps += 1;
        }

        self.stats.stepped = steps > 0;
        self.stats.steps += u64::from(steps);
        if steps > CATCH_UP_WARN_STEPS {
            tracing::warn!(steps, "fixed-step catch-up burst, host is running behind");
        }

        if steps > 0 {
            self.stats.frames += 1;
            self.frames_this_second += 1;
            if self.clock.total_time - self.fps_window_start >= 1.0 {
                self.stats.ms_per_frame = 1000.0 / f64::from(self.frames_this_second);
                self.frames_this_second = 0;
                self.fps_window_start += 1.0;
            }
        }

        steps
    }

    /// Drive the world until shutdown is requested.
    ///
    /// Each iteration polls the hooks, advances the simulation zero or more
    /// fixed steps, and renders when at least one step ran. The loop never
    /// yields to the OS by itself; any pacing comes from the embedder's
    /// present/swap call inside `on_render`.
    pub fn run<A: AppHooks>(&mut self, world: &mut World, app: &mut A) {
        tracing::debug!(
            fixed_timestep = self.clock.fixed_timestep,
            "game loop started"
        );
        app.on_start(world);

        while !self.stop.is_stopped() {
            app.poll(world, &self.stop);
            if self.pump(world) > 0 {
                app.on_render(world, &self.stats);
            }
        }

        app.on_stop(world);
        tracing::debug!(
            steps = self.stats.steps,
            frames = self.stats.frames,
            "game loop stopped"
        );
    }
}
