use std::ops::Range;

use crate::binding::Geometry;

use super::Uniforms;

/// How a vertex range is assembled into primitives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    /// Triangles sharing the first vertex of the range.
    TriangleFan,
}

impl Topology {
    /// Vertices needed for at least one primitive.
    pub fn min_vertices(self) -> u32 {
        match self {
            Topology::Points => 1,
            Topology::Lines | Topology::LineStrip => 2,
            Topology::Triangles | Topology::TriangleStrip | Topology::TriangleFan => 3,
        }
    }
}

/// Depth comparison for a scene. The depth buffer is cleared to 1.0 every frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum DepthTest {
    #[default]
    Disabled,
    Less,
    LessEqual,
}

/// One drawable: bound geometry, a vertex range, per-entry uniforms and an optional
/// depth key for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntry {
    pub geometry: Geometry,
    pub topology: Topology,
    pub vertices: Range<u32>,
    pub uniforms: Uniforms,
    pub depth_key: Option<f32>,
}

impl SceneEntry {
    pub fn new(geometry: Geometry, topology: Topology, vertices: Range<u32>) -> Self {
        Self {
            geometry,
            topology,
            vertices,
            uniforms: Uniforms::new(),
            depth_key: None,
        }
    }

    pub fn with_uniforms(mut self, uniforms: Uniforms) -> Self {
        self.uniforms = uniforms;
        self
    }

    pub fn with_depth_key(mut self, depth: f32) -> Self {
        self.depth_key = Some(depth);
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.end.saturating_sub(self.vertices.start)
    }
}
