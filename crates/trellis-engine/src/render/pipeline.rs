//! Pipeline and per-program GPU state, keyed by everything a draw can vary.

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::ops::Range;

use crate::binding::AttributeBinding;
use crate::scene::{DepthTest, Topology};
use crate::shader::{FRAGMENT_ENTRY, ProgramId, ShaderProgram, VERTEX_ENTRY};

use super::RenderCtx;

/// One vertex buffer slot: a single attribute read from its own buffer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub(crate) struct VertexSlot {
    pub location: u32,
    pub components: u32,
    pub stride: u32,
}

impl VertexSlot {
    pub(crate) fn of(binding: &AttributeBinding) -> Self {
        let layout = binding.layout();
        Self {
            location: binding.location(),
            components: layout.components,
            stride: layout.effective_stride(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub(crate) struct PipelineKey {
    pub program: ProgramId,
    pub topology: wgpu::PrimitiveTopology,
    pub depth_test: DepthTest,
    pub format: wgpu::TextureFormat,
    pub slots: Vec<VertexSlot>,
}

/// Shader modules and layouts shared by every pipeline of one program.
struct ProgramState {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: wgpu::PipelineLayout,
}

#[derive(Default)]
pub(crate) struct PipelineCache {
    programs: HashMap<ProgramId, ProgramState>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl PipelineCache {
    pub(crate) fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(key)
    }

    pub(crate) fn bind_group_layout(&self, program: ProgramId) -> Option<&wgpu::BindGroupLayout> {
        self.programs.get(&program)?.bind_group_layout.as_ref()
    }

    /// Creates the pipeline for `key` if it does not exist yet.
    pub(crate) fn ensure(&mut self, ctx: &RenderCtx<'_>, program: &ShaderProgram, key: &PipelineKey) {
        if self.pipelines.contains_key(key) {
            return;
        }

        let state = self
            .programs
            .entry(program.id())
            .or_insert_with(|| create_program_state(ctx.device, program));

        let attributes: Vec<[wgpu::VertexAttribute; 1]> = key
            .slots
            .iter()
            .map(|slot| {
                [wgpu::VertexAttribute {
                    format: vertex_format(slot.components),
                    offset: 0,
                    shader_location: slot.location,
                }]
            })
            .collect();

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = key
            .slots
            .iter()
            .zip(&attributes)
            .map(|(slot, attrs)| wgpu::VertexBufferLayout {
                array_stride: u64::from(slot.stride),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("trellis pipeline"),
            layout: Some(&state.pipeline_layout),

            vertex: wgpu::VertexState {
                module: &state.vertex,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &state.fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: key.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(depth_stencil_state(key.depth_test, ctx.depth_format)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "created pipeline for program {:?} ({:?}, {} slot(s), depth {:?})",
            key.program,
            key.topology,
            key.slots.len(),
            key.depth_test
        );
        self.pipelines.insert(key.clone(), pipeline);
    }
}

fn create_program_state(device: &wgpu::Device, program: &ShaderProgram) -> ProgramState {
    let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("trellis vertex shader"),
        source: wgpu::ShaderSource::Wgsl(program.vertex_source().to_owned().into()),
    });
    let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("trellis fragment shader"),
        source: wgpu::ShaderSource::Wgsl(program.fragment_source().to_owned().into()),
    });

    let entries: Vec<wgpu::BindGroupLayoutEntry> = program
        .uniforms()
        .into_iter()
        .map(|(_, u)| wgpu::BindGroupLayoutEntry {
            binding: u.binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(u64::from(u.size)),
            },
            count: None,
        })
        .collect();

    let bind_group_layout = (!entries.is_empty()).then(|| {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trellis uniform bgl"),
            entries: &entries,
        })
    });

    let layouts: Vec<&wgpu::BindGroupLayout> = bind_group_layout.iter().collect();
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("trellis pipeline layout"),
        bind_group_layouts: &layouts,
        immediate_size: 0,
    });

    ProgramState {
        vertex,
        fragment,
        bind_group_layout,
        pipeline_layout,
    }
}

pub(crate) fn primitive_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::Points => wgpu::PrimitiveTopology::PointList,
        Topology::Lines => wgpu::PrimitiveTopology::LineList,
        Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        Topology::Triangles | Topology::TriangleFan => wgpu::PrimitiveTopology::TriangleList,
        Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

/// Float vertex format for 1..=4 components. Layouts are validated at bind time.
pub(crate) fn vertex_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        _ => wgpu::VertexFormat::Float32x4,
    }
}

/// The depth attachment is always present; a disabled test passes everything and
/// leaves depth untouched.
pub(crate) fn depth_stencil_state(test: DepthTest, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    let (depth_compare, depth_write_enabled) = match test {
        DepthTest::Disabled => (wgpu::CompareFunction::Always, false),
        DepthTest::Less => (wgpu::CompareFunction::Less, true),
        DepthTest::LessEqual => (wgpu::CompareFunction::LessEqual, true),
    };
    wgpu::DepthStencilState {
        format,
        depth_write_enabled,
        depth_compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Triangle list indices for a fan over `vertices` (absolute vertex indices).
pub(crate) fn fan_indices(vertices: Range<u32>) -> Vec<u32> {
    let first = vertices.start;
    (vertices.start + 1..vertices.end.saturating_sub(1).max(vertices.start + 1))
        .flat_map(|i| [first, i, i + 1])
        .collect()
}
