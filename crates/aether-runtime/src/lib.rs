//! Aether Runtime - Fixed-timestep loop infrastructure
//!
//! Provides the driver that decouples simulation from render timing:
//! - `GameClock` - fixed-timestep accumulator over a monotonic time source
//! - `GameLoop` - busy-poll driver invoking `World::update` at a constant step
//! - `AppHooks` - the embedding seam for input polling and rendering
//! - `StopHandle` / `FrameStats` - cancellation and frame reporting

mod clock;
mod game_loop;

pub use clock::GameClock;
pub use game_loop::{AppHooks, FrameStats, GameLoop, StopHandle};
