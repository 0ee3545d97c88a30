use std::ops::Range;

use crate::device::{DEPTH_FORMAT, Gpu, GpuFrame, SurfaceErrorAction};
use crate::error::{EngineError, Result};
use crate::geometry::{BufferHandle, GeometryStore};
use crate::scene::Topology;
use crate::shader::ProgramId;

use super::pipeline::{self, PipelineCache, PipelineKey, VertexSlot};
use super::resources::{self, ArenaSlot, UniformArena, VertexBuffers};
use super::{ClearState, DrawCall, FrameStatus, RenderCtx, RenderSurface, RenderTarget};

/// A draw resolved against GPU resources, encoded when the frame ends.
struct QueuedDraw {
    key: PipelineKey,
    /// `(buffer, byte offset)` per vertex slot, in slot order.
    vertex_buffers: Vec<(BufferHandle, u64)>,
    vertices: Range<u32>,
    uniforms: Vec<ArenaSlot>,
    /// Fans are drawn indexed.
    indices: Option<(wgpu::Buffer, u32)>,
}

struct FrameInFlight {
    frame: GpuFrame,
    clear: ClearState,
    draws: Vec<QueuedDraw>,
}

/// wgpu backend state that outlives frames: pipelines, vertex buffers, the uniform arena.
///
/// Draws are queued while the scene is walked and encoded into a single pass on
/// `end_frame`, which clears color and depth first.
pub struct GpuRenderer {
    pipelines: PipelineCache,
    vertex_buffers: VertexBuffers,
    uniforms: UniformArena,
    in_flight: Option<FrameInFlight>,
}

impl GpuRenderer {
    pub fn new(gpu: &Gpu<'_>) -> Self {
        let alignment = u64::from(gpu.device().limits().min_uniform_buffer_offset_alignment);
        Self {
            pipelines: PipelineCache::default(),
            vertex_buffers: VertexBuffers::default(),
            uniforms: UniformArena::new(alignment),
            in_flight: None,
        }
    }

    /// Pairs the renderer with the window's GPU for one tick.
    pub fn surface<'a, 'w>(&'a mut self, gpu: &'a mut Gpu<'w>) -> WindowSurface<'a, 'w> {
        WindowSurface { gpu, renderer: self }
    }
}

/// [`RenderSurface`] over a window swapchain.
pub struct WindowSurface<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    renderer: &'a mut GpuRenderer,
}

fn render_ctx<'g>(gpu: &'g Gpu<'_>) -> RenderCtx<'g> {
    RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), DEPTH_FORMAT)
}

impl RenderSurface for WindowSurface<'_, '_> {
    fn begin_frame(&mut self, clear: &ClearState) -> Result<FrameStatus> {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return Ok(FrameStatus::Skip);
        }

        let frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let reason = err.to_string();
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => Ok(FrameStatus::Skip),
                    SurfaceErrorAction::Fatal => Err(EngineError::SurfaceUnavailable { reason }),
                };
            }
        };

        self.renderer.uniforms.reset();
        self.renderer.in_flight = Some(FrameInFlight {
            frame,
            clear: *clear,
            draws: Vec::new(),
        });
        Ok(FrameStatus::Ready)
    }

    fn draw(&mut self, store: &GeometryStore, call: &DrawCall<'_>) -> Result<()> {
        let ctx = render_ctx(self.gpu);
        let renderer = &mut *self.renderer;

        let Some(in_flight) = renderer.in_flight.as_mut() else {
            return Err(EngineError::FrameNotStarted);
        };

        let mut vertex_buffers = Vec::with_capacity(call.attributes.len());
        for binding in call.attributes {
            renderer.vertex_buffers.sync(&ctx, store, binding.buffer())?;
            vertex_buffers.push((binding.buffer(), u64::from(binding.layout().offset)));
        }

        let key = PipelineKey {
            program: call.program.id(),
            topology: pipeline::primitive_topology(call.topology),
            depth_test: call.depth_test,
            format: ctx.surface_format,
            slots: call.attributes.iter().map(VertexSlot::of).collect(),
        };
        renderer.pipelines.ensure(&ctx, call.program, &key);

        let uniforms = call
            .uniforms
            .iter()
            .map(|slot| renderer.uniforms.push(slot.binding, &slot.bytes))
            .collect();

        let indices = (call.topology == Topology::TriangleFan).then(|| {
            let indices = pipeline::fan_indices(call.vertices.clone());
            let count = indices.len() as u32;
            (resources::index_buffer(&ctx, &indices), count)
        });

        in_flight.draws.push(QueuedDraw {
            key,
            vertex_buffers,
            vertices: call.vertices.clone(),
            uniforms,
            indices,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        let Some(FrameInFlight { mut frame, clear, draws }) = self.renderer.in_flight.take() else {
            return Ok(());
        };

        let ctx = render_ctx(self.gpu);
        let renderer = &mut *self.renderer;
        let arena = renderer.uniforms.upload(&ctx);

        let bind_groups: Vec<Option<wgpu::BindGroup>> = draws
            .iter()
            .map(|draw| bind_group(&ctx, &renderer.pipelines, draw.key.program, arena, &draw.uniforms))
            .collect();

        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, self.gpu.depth_view());
            encode_pass(&mut target, &clear, &renderer.pipelines, &renderer.vertex_buffers, &draws, &bind_groups);
        }

        self.gpu.submit(frame);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        let size = self.gpu.size();
        (size.width, size.height)
    }
}

fn bind_group(
    ctx: &RenderCtx<'_>,
    pipelines: &PipelineCache,
    program: ProgramId,
    arena: Option<&wgpu::Buffer>,
    slots: &[ArenaSlot],
) -> Option<wgpu::BindGroup> {
    let layout = pipelines.bind_group_layout(program)?;
    let arena = arena?;

    let entries: Vec<wgpu::BindGroupEntry<'_>> = slots
        .iter()
        .map(|slot| wgpu::BindGroupEntry {
            binding: slot.binding,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: arena,
                offset: slot.offset,
                size: std::num::NonZeroU64::new(slot.size),
            }),
        })
        .collect();

    Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("trellis uniforms"),
        layout,
        entries: &entries,
    }))
}

fn encode_pass(
    target: &mut RenderTarget<'_>,
    clear: &ClearState,
    pipelines: &PipelineCache,
    vertex_buffers: &VertexBuffers,
    draws: &[QueuedDraw],
    bind_groups: &[Option<wgpu::BindGroup>],
) {
    let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("trellis scene pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear.color.to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: target.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear.depth),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    for (draw, group) in draws.iter().zip(bind_groups) {
        let Some(pipeline) = pipelines.get(&draw.key) else { continue };
        rpass.set_pipeline(pipeline);
        if let Some(group) = group {
            rpass.set_bind_group(0, group, &[]);
        }

        let mut bound = true;
        for (slot, (handle, offset)) in draw.vertex_buffers.iter().enumerate() {
            let Some(buffer) = vertex_buffers.get(*handle) else {
                bound = false;
                break;
            };
            rpass.set_vertex_buffer(slot as u32, buffer.slice(*offset..));
        }
        if !bound {
            log::warn!("skipping draw: vertex buffer missing on the gpu");
            continue;
        }

        match &draw.indices {
            Some((indices, count)) => {
                rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..*count, 0, 0..1);
            }
            None => rpass.draw(draw.vertices.clone(), 0..1),
        }
    }
}
