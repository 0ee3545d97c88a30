use std::time::Duration;

use anyhow::{Context, Result};
use trellis_engine::frame::{FrameLoop, LoopConfig, LoopState, ManualScheduler};
use trellis_engine::render::RecordingSurface;
use trellis_engine::time::FrameClock;

use crate::demos::Demo;

const SURFACE_SIZE: (u32, u32) = (512, 512);

/// Runs `demo` for up to `frames` ticks against a recording surface.
pub fn run<D: Demo>(mut demo: D, loop_config: LoopConfig, frames: usize) -> Result<()> {
    let mut frame_loop = FrameLoop::new(ManualScheduler::new(), loop_config);
    let mut surface = RecordingSurface::new(SURFACE_SIZE.0, SURFACE_SIZE.1);
    let mut clock = FrameClock::fixed_step(Duration::from_micros(16_667));

    frame_loop
        .setup(&mut demo, SURFACE_SIZE)
        .with_context(|| format!("{} setup failed", demo.title()))?;
    if demo.start_paused() {
        frame_loop.start_paused();
    } else {
        frame_loop.start();
    }

    let fired = frame_loop.run_until_idle(frames, &mut demo, &mut surface, &mut clock);
    if frame_loop.state() != LoopState::Stopped {
        frame_loop.stop();
    }

    log::info!(
        "{}: {} tick(s) fired, {} ran, {} frame(s) drawn, {} draw call(s)",
        demo.title(),
        fired,
        frame_loop.ticks_run(),
        frame_loop.frames_drawn(),
        surface.draw_count()
    );
    if let Some(frame) = surface.last_frame() {
        for (i, draw) in frame.draws.iter().enumerate() {
            log::info!(
                "  last frame draw {i}: {:?} vertices {:?}, {} attribute(s), {} uniform(s)",
                draw.topology,
                draw.vertices,
                draw.attributes.len(),
                draw.uniforms.len()
            );
        }
    }
    Ok(())
}
