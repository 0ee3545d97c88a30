//! Rendering backends.
//!
//! The frame loop talks to a [`RenderSurface`]: [`WindowSurface`] renders through wgpu into a
//! window swapchain, [`RecordingSurface`] records draws for headless runs and tests.
//!
//! Convention:
//! - Geometry is in clip space; shaders own any transform.
//! - Clip-space depth is `0..=1` (wgpu), cleared to 1.0 each frame.

mod ctx;
mod gpu;
mod pipeline;
mod recording;
mod resources;
mod surface;

pub use ctx::{RenderCtx, RenderTarget};
pub use gpu::{GpuRenderer, WindowSurface};
pub use recording::{RecordedDraw, RecordedFrame, RecordingSurface};
pub use surface::{ClearState, DrawCall, FrameStatus, RenderSurface};
