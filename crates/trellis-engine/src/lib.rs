//! Trellis engine crate.
//!
//! A minimal immediate-mode renderer core: linked shader programs, geometry buffers with
//! explicit attribute bindings, a depth-ordered scene, and a cooperative frame loop driven
//! by named parameter channels.
//!
//! Everything up to [`render::RenderSurface`] runs without a GPU; the wgpu backend and the
//! winit runtime sit behind it.

pub mod error;

pub mod shader;
pub mod geometry;
pub mod binding;
pub mod scene;
pub mod param;
pub mod frame;
pub mod core;

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod render;
pub mod paint;
pub mod logging;

pub use error::{EngineError, Result, ShaderStage};

pub use glam;
