//! CPU-side geometry buffers and procedural generators.
//!
//! Buffers are replaced wholesale, never patched. The GPU mirror of each buffer is owned by
//! the render backend, which re-uploads whenever the generation counter moves.

mod buffer;
mod store;

pub mod shapes;

pub use buffer::{GeometryBuffer, UsageHint};
pub use store::{BufferHandle, GeometryStore};
