use std::ops::Range;

use crate::error::{EngineError, Result};
use crate::geometry::GeometryStore;
use crate::scene::{DepthTest, Topology, UniformSlot};
use crate::shader::ProgramId;

use super::{ClearState, DrawCall, FrameStatus, RenderSurface};

/// A draw as seen by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub program: ProgramId,
    pub topology: Topology,
    pub vertices: Range<u32>,
    /// `(location, buffer index, generation)` per attribute.
    pub attributes: Vec<(u32, usize, u64)>,
    pub uniforms: Vec<UniformSlot>,
    pub depth_test: DepthTest,
}

impl RecordedDraw {
    pub fn uniform(&self, binding: u32) -> Option<&[u8]> {
        self.uniforms
            .iter()
            .find(|u| u.binding == binding)
            .map(|u| u.bytes.as_slice())
    }
}

/// One presented (or abandoned) frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub clear: ClearState,
    pub draws: Vec<RecordedDraw>,
}

/// Headless surface that records every frame instead of rendering it.
///
/// Backs headless demo runs and GPU-free tests.
#[derive(Debug)]
pub struct RecordingSurface {
    size: (u32, u32),
    frames: Vec<RecordedFrame>,
    current: Option<RecordedFrame>,
    skip_next: usize,
    lost: bool,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            frames: Vec::new(),
            current: None,
            skip_next: 0,
            lost: false,
        }
    }

    /// Completed frames, oldest first.
    #[inline]
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    #[inline]
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Total draws across all completed frames.
    pub fn draw_count(&self) -> usize {
        self.frames.iter().map(|f| f.draws.len()).sum()
    }

    /// Makes the next `n` frames report [`FrameStatus::Skip`].
    pub fn skip_frames(&mut self, n: usize) {
        self.skip_next = n;
    }

    /// Makes every later `begin_frame` fail with [`EngineError::SurfaceUnavailable`].
    pub fn lose(&mut self) {
        self.lost = true;
    }
}

impl RenderSurface for RecordingSurface {
    fn begin_frame(&mut self, clear: &ClearState) -> Result<FrameStatus> {
        if self.lost {
            return Err(EngineError::SurfaceUnavailable {
                reason: "recording surface lost".into(),
            });
        }
        if self.skip_next > 0 {
            self.skip_next -= 1;
            return Ok(FrameStatus::Skip);
        }

        self.current = Some(RecordedFrame {
            clear: *clear,
            draws: Vec::new(),
        });
        Ok(FrameStatus::Ready)
    }

    fn draw(&mut self, _store: &GeometryStore, call: &DrawCall<'_>) -> Result<()> {
        let Some(frame) = self.current.as_mut() else {
            return Err(EngineError::FrameNotStarted);
        };

        frame.draws.push(RecordedDraw {
            program: call.program.id(),
            topology: call.topology,
            vertices: call.vertices.clone(),
            attributes: call
                .attributes
                .iter()
                .map(|a| (a.location(), a.buffer().index(), a.generation()))
                .collect(),
            uniforms: call.uniforms.to_vec(),
            depth_test: call.depth_test,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        if let Some(frame) = self.current.take() {
            self.frames.push(frame);
        }
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}
