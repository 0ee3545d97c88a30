//! Cooperative frame loop: scheduling, lifecycle and the per-tick pipeline.

mod frame_loop;
mod scheduler;
mod state;

pub use frame_loop::FrameLoop;
pub use scheduler::{ManualScheduler, RedrawScheduler, Scheduler, TickToken};
pub use state::{LoopConfig, LoopState, PausePolicy, TickOutcome};
