//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and drives a [`crate::frame::FrameLoop`] from
//! window redraws.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
