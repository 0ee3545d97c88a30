use std::ops::Range;

use crate::binding::AttributeBinding;
use crate::error::Result;
use crate::geometry::GeometryStore;
use crate::paint::Color;
use crate::scene::{DepthTest, Topology, UniformSlot};
use crate::shader::ShaderProgram;

/// What every frame starts from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearState {
    pub color: Color,
    /// Depth clear value, `0.0..=1.0`.
    pub depth: f32,
}

impl Default for ClearState {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            depth: 1.0,
        }
    }
}

impl ClearState {
    pub fn color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

/// Result of acquiring a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// Frame acquired and cleared; draws may follow.
    Ready,
    /// Transient surface condition; nothing is drawn this tick.
    Skip,
}

/// One fully-resolved draw: everything the backend needs, nothing it must look up.
#[derive(Debug, Clone)]
pub struct DrawCall<'a> {
    pub program: &'a ShaderProgram,
    pub topology: Topology,
    pub vertices: Range<u32>,
    /// Sorted by location.
    pub attributes: &'a [AttributeBinding],
    /// Sorted by binding; one slot per program uniform.
    pub uniforms: &'a [UniformSlot],
    pub depth_test: DepthTest,
}

/// Drawable region the frame loop renders into.
///
/// `begin_frame` clears color and depth; `end_frame` presents. `draw` is only called
/// between the two, after `begin_frame` returned [`FrameStatus::Ready`].
pub trait RenderSurface {
    fn begin_frame(&mut self, clear: &ClearState) -> Result<FrameStatus>;

    fn draw(&mut self, store: &GeometryStore, call: &DrawCall<'_>) -> Result<()>;

    fn end_frame(&mut self) -> Result<()>;

    /// Drawable size in physical pixels.
    fn size(&self) -> (u32, u32);
}
