use std::ops::Range;

use thiserror::Error;

use crate::binding::Geometry;
use crate::core::RenderContext;
use crate::error::{EngineError, Result};
use crate::render::{DrawCall, RenderSurface};
use crate::shader::ShaderProgram;

use super::{resolve_uniforms, DepthTest, SceneEntry, SortKey, Topology, Uniforms};

/// A failed [`Scene::draw`]: the entry (insertion index) that stopped the frame.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("scene entry #{entry}: {error}")]
pub struct DrawFailure {
    pub entry: usize,
    #[source]
    pub error: EngineError,
}

/// Drawable entries for one frame.
///
/// Performance characteristics:
/// - `add_entry()` is O(1)
/// - paint order is recomputed lazily when an entry or depth key changed; the index buffer
///   is reused across frames
///
/// Scenes are rebuilt wholesale (`clear` + `add_entry`), never diffed.
#[derive(Debug, Default)]
pub struct Scene {
    entries: Vec<SceneEntry>,
    orders: Vec<u32>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    depth_test: DepthTest,
}

impl Scene {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry. Keeps allocated capacity and the depth test.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.orders.clear();
        self.next_order = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = true;
    }

    /// Adds an entry and returns its insertion index.
    pub fn add_entry(
        &mut self,
        geometry: Geometry,
        topology: Topology,
        vertices: Range<u32>,
        uniforms: Uniforms,
        depth_key: Option<f32>,
    ) -> usize {
        self.push(SceneEntry {
            geometry,
            topology,
            vertices,
            uniforms,
            depth_key,
        })
    }

    pub fn push(&mut self, entry: SceneEntry) -> usize {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.entries.push(entry);
        self.orders.push(order);
        self.sorted_dirty = true;
        self.entries.len() - 1
    }

    /// Changes the depth key of an entry; the next paint order reflects it.
    pub fn set_depth_key(&mut self, index: usize, depth_key: Option<f32>) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.depth_key = depth_key;
            self.sorted_dirty = true;
        }
    }

    /// Mutable access to an entry. Always invalidates the paint order.
    pub fn entry_mut(&mut self, index: usize) -> Option<&mut SceneEntry> {
        self.sorted_dirty = true;
        self.entries.get_mut(index)
    }

    /// Entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn depth_test(&self) -> DepthTest {
        self.depth_test
    }

    pub fn set_depth_test(&mut self, depth_test: DepthTest) {
        self.depth_test = depth_test;
    }

    /// Entries in paint order (see [`SortKey`]).
    pub fn rebuild(&mut self) -> Vec<&SceneEntry> {
        self.indices_in_paint_order();
        self.sorted_indices.iter().map(|&i| &self.entries[i]).collect()
    }

    /// Insertion indices in paint order. The buffer is owned by the scene and reused.
    pub fn indices_in_paint_order(&mut self) -> &[usize] {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        &self.sorted_indices
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.entries.len());

        let key = |i: usize| SortKey::new(self.entries[i].depth_key, self.orders[i]);
        self.sorted_indices.sort_by(|&a, &b| key(a).cmp(&key(b)));

        self.sorted_dirty = false;
    }

    /// Draws every entry with `program`, in paint order.
    ///
    /// Each entry is checked before anything is issued for it; the first failure ends the
    /// draw and is returned with the entry's insertion index. Returns the number of draw
    /// calls issued.
    pub fn draw(
        &mut self,
        ctx: &RenderContext,
        program: &ShaderProgram,
        frame_uniforms: &Uniforms,
        surface: &mut dyn RenderSurface,
    ) -> std::result::Result<usize, DrawFailure> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        let store = ctx.geometry_store();
        let mut issued = 0;

        for &index in &self.sorted_indices {
            let entry = &self.entries[index];
            let fail = |error| DrawFailure { entry: index, error };

            validate_entry(ctx, program, entry).map_err(fail)?;
            if entry.vertex_count() == 0 {
                continue;
            }

            let uniforms =
                resolve_uniforms(program, frame_uniforms, &entry.uniforms).map_err(fail)?;

            let call = DrawCall {
                program,
                topology: entry.topology,
                vertices: entry.vertices.clone(),
                attributes: entry.geometry.bindings(),
                uniforms: &uniforms,
                depth_test: self.depth_test,
            };
            surface.draw(store, &call).map_err(fail)?;
            issued += 1;
        }

        Ok(issued)
    }
}

fn validate_entry(ctx: &RenderContext, program: &ShaderProgram, entry: &SceneEntry) -> Result<()> {
    let store = ctx.geometry_store();
    let geometry = &entry.geometry;

    if geometry.program() != program.id() {
        let location = geometry.bindings().first().map_or(0, |b| b.location());
        return Err(EngineError::StaleBinding {
            location,
            reason: format!(
                "geometry was bound for program {:?}, drawing with {:?}",
                geometry.program(),
                program.id()
            ),
        });
    }

    for (name, attr) in program.attributes() {
        if geometry.binding_at(attr.location).is_none() {
            return Err(EngineError::StaleBinding {
                location: attr.location,
                reason: format!("attribute `{name}` has no enabled binding"),
            });
        }
    }

    let Range { start, end } = entry.vertices;
    for binding in geometry.bindings() {
        binding.ensure_current(store)?;

        let available = binding.vertex_count(store)?;
        if start > end || end > available {
            return Err(EngineError::VertexRangeOutOfBounds {
                start,
                end,
                available,
                location: binding.location(),
            });
        }
    }

    Ok(())
}
