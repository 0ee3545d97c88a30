//! Frame timing.
//!
//! One `FrameClock` per frame loop; `tick()` once per fired tick to obtain `FrameTime`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
