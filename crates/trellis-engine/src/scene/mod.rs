//! Scene types: drawable entries for one frame and their paint order.
//!
//! Responsibilities:
//! - hold per-frame entries (geometry + topology + vertex range + uniforms)
//! - provide deterministic ordering (depth key + insertion order)
//! - validate and issue draws against a [`RenderSurface`](crate::render::RenderSurface)

pub mod camera;
mod entry;
mod key;
mod list;
mod uniforms;

pub use camera::OrbitCamera;
pub use entry::{DepthTest, SceneEntry, Topology};
pub use key::SortKey;
pub use list::{DrawFailure, Scene};
pub use uniforms::{resolve_uniforms, UniformSlot, UniformValue, Uniforms};
