use crate::error::Result;
use crate::frame::LoopState;
use crate::input::{InputRouter, Key};
use crate::param::Channels;
use crate::scene::{Scene, Uniforms};
use crate::time::FrameTime;

use super::{Commands, RenderContext};

/// Everything an app may configure before the loop starts.
pub struct SetupCtx<'a> {
    pub render: &'a mut RenderContext,
    pub scene: &'a mut Scene,
    pub channels: &'a mut Channels,
    pub router: &'a mut InputRouter,
    /// Frame-level uniforms, shared by every entry unless overridden.
    pub uniforms: &'a mut Uniforms,
    /// Drawable size in physical pixels.
    pub surface_size: (u32, u32),
}

/// Per-tick context passed to [`App::advance`] and [`App::prepare`].
///
/// Channels are read-only here: values were committed at the start of the tick.
pub struct TickCtx<'a> {
    pub render: &'a mut RenderContext,
    pub scene: &'a mut Scene,
    pub channels: &'a Channels,
    pub uniforms: &'a mut Uniforms,
    pub commands: &'a mut Commands,
    pub time: FrameTime,
    pub state: LoopState,
    pub surface_size: (u32, u32),
}

/// Application contract driven by the frame loop.
pub trait App {
    /// Called once before the loop starts: compile programs, create buffers, register
    /// channels and input routes. Errors here keep the loop from starting.
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) -> Result<()>;

    /// Called on running ticks only, after channel update rules.
    fn advance(&mut self, ctx: &mut TickCtx<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called on every tick that draws: push uniforms, rebuild the scene.
    fn prepare(&mut self, ctx: &mut TickCtx<'_>) -> Result<()>;

    /// Called between ticks for each key press.
    fn on_key(&mut self, key: Key, channels: &Channels, commands: &mut Commands) {
        let _ = (key, channels, commands);
    }
}
