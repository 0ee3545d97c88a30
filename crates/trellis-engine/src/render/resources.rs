use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::error::Result;
use crate::geometry::{BufferHandle, GeometryStore, UsageHint};

use super::RenderCtx;

/// Uniform slots are padded to this size; WGSL rounds small uniforms up to it anyway.
const UNIFORM_SLOT_ALIGN: u64 = 16;

struct GpuBuffer {
    buffer: wgpu::Buffer,
    generation: u64,
    capacity: u64,
}

/// GPU copies of geometry buffers, refreshed when their generation moves.
///
/// Dynamic buffers keep their allocation while the data fits and are rewritten in place;
/// static buffers are recreated on every upload.
#[derive(Default)]
pub(crate) struct VertexBuffers {
    buffers: HashMap<BufferHandle, GpuBuffer>,
}

impl VertexBuffers {
    pub(crate) fn sync(&mut self, ctx: &RenderCtx<'_>, store: &GeometryStore, handle: BufferHandle) -> Result<()> {
        let source = store.get(handle)?;
        if self
            .buffers
            .get(&handle)
            .is_some_and(|b| b.generation == source.generation())
        {
            return Ok(());
        }

        let bytes: &[u8] = bytemuck::cast_slice(source.values());
        let len = bytes.len() as u64;

        if let Some(existing) = self.buffers.get_mut(&handle) {
            if source.usage() == UsageHint::Dynamic && len <= existing.capacity {
                if len > 0 {
                    ctx.queue.write_buffer(&existing.buffer, 0, bytes);
                }
                existing.generation = source.generation();
                return Ok(());
            }
        }

        let capacity = match source.usage() {
            UsageHint::Dynamic => len.next_power_of_two().max(256),
            UsageHint::Static => len.max(4),
        };
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trellis vertex buffer"),
            size: capacity,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if len > 0 {
            ctx.queue.write_buffer(&buffer, 0, bytes);
        }

        log::trace!(
            "buffer #{} -> gpu ({} bytes, capacity {capacity}, generation {})",
            handle.index(),
            len,
            source.generation()
        );
        self.buffers.insert(
            handle,
            GpuBuffer {
                buffer,
                generation: source.generation(),
                capacity,
            },
        );
        Ok(())
    }

    pub(crate) fn get(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(&handle).map(|b| &b.buffer)
    }
}

/// One uniform write inside the frame arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct ArenaSlot {
    pub binding: u32,
    pub offset: u64,
    pub size: u64,
}

/// Per-frame uniform storage: staged on the CPU while draws are recorded, written once
/// before the pass is encoded.
pub(crate) struct UniformArena {
    staging: Vec<u8>,
    alignment: u64,
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
}

impl UniformArena {
    pub(crate) fn new(alignment: u64) -> Self {
        Self {
            staging: Vec::new(),
            alignment: alignment.max(UNIFORM_SLOT_ALIGN),
            buffer: None,
            capacity: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.staging.clear();
    }

    /// Stages `bytes` at the next aligned offset.
    pub(crate) fn push(&mut self, binding: u32, bytes: &[u8]) -> ArenaSlot {
        let offset = align_up(self.staging.len() as u64, self.alignment);
        let size = align_up(bytes.len() as u64, UNIFORM_SLOT_ALIGN).max(UNIFORM_SLOT_ALIGN);

        self.staging.resize(offset as usize, 0);
        self.staging.extend_from_slice(bytes);
        self.staging.resize((offset + size) as usize, 0);

        ArenaSlot { binding, offset, size }
    }

    /// Grows the GPU buffer if needed and writes the staged bytes.
    pub(crate) fn upload(&mut self, ctx: &RenderCtx<'_>) -> Option<&wgpu::Buffer> {
        if self.staging.is_empty() {
            return self.buffer.as_ref();
        }

        let needed = self.staging.len() as u64;
        if self.buffer.is_none() || needed > self.capacity {
            let capacity = needed.next_power_of_two().max(4096);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("trellis uniform arena"),
                size: capacity,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
        }

        let buffer = self.buffer.as_ref()?;
        ctx.queue.write_buffer(buffer, 0, &self.staging);
        Some(buffer)
    }

    #[cfg(test)]
    fn staged_len(&self) -> usize {
        self.staging.len()
    }
}

/// Index buffer for a fan expanded to a triangle list.
pub(crate) fn index_buffer(ctx: &RenderCtx<'_>, indices: &[u32]) -> wgpu::Buffer {
    ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("trellis fan indices"),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    })
}

#[inline]
fn align_up(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_start_on_alignment_boundaries() {
        let mut arena = UniformArena::new(256);
        let a = arena.push(0, &[1; 4]);
        let b = arena.push(1, &[2; 64]);
        let c = arena.push(2, &[3; 12]);

        assert_eq!((a.offset, a.size), (0, 16));
        assert_eq!((b.offset, b.size), (256, 64));
        assert_eq!((c.offset, c.size), (512, 16));
        assert_eq!(arena.staged_len(), 528);
    }

    #[test]
    fn small_device_alignment_still_pads_slots() {
        let mut arena = UniformArena::new(4);
        let a = arena.push(0, &[1; 4]);
        let b = arena.push(0, &[1; 4]);
        assert_eq!(b.offset - a.offset, 16);
    }

    #[test]
    fn reset_reuses_the_arena() {
        let mut arena = UniformArena::new(256);
        arena.push(0, &[0; 16]);
        arena.reset();
        assert_eq!(arena.push(0, &[0; 16]).offset, 0);
    }

    #[test]
    fn align_up_rounds_to_multiples() {
        assert_eq!(align_up(0, 256), 0);
        assert_eq!(align_up(1, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(12, 16), 16);
    }
}
