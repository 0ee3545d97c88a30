use std::sync::Arc;

use crate::error::{EngineError, Result};
use crate::geometry::{BufferHandle, GeometryStore};
use crate::shader::ProgramId;

use super::AttributeLayout;

/// One enabled vertex input: program, attribute, buffer and the layout it is read with.
///
/// `generation` is the buffer generation observed at bind time.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBinding {
    pub(crate) program: ProgramId,
    pub(crate) name: Arc<str>,
    pub(crate) location: u32,
    pub(crate) buffer: BufferHandle,
    pub(crate) layout: AttributeLayout,
    pub(crate) generation: u64,
}

impl AttributeBinding {
    #[inline]
    pub fn program(&self) -> ProgramId {
        self.program
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn location(&self) -> u32 {
        self.location
    }

    #[inline]
    pub fn buffer(&self) -> BufferHandle {
        self.buffer
    }

    #[inline]
    pub fn layout(&self) -> AttributeLayout {
        self.layout
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while the buffer still holds the contents this binding was made against.
    pub fn is_current(&self, store: &GeometryStore) -> bool {
        store
            .generation(self.buffer)
            .is_ok_and(|g| g == self.generation)
    }

    /// Fails with [`EngineError::StaleBinding`] unless [`is_current`](Self::is_current).
    pub fn ensure_current(&self, store: &GeometryStore) -> Result<()> {
        let now = store.generation(self.buffer)?;
        if now == self.generation {
            return Ok(());
        }
        Err(EngineError::StaleBinding {
            location: self.location,
            reason: format!(
                "`{}` was bound to buffer #{} at generation {}, buffer is now at {}",
                self.name,
                self.buffer.index(),
                self.generation,
                now
            ),
        })
    }

    /// Vertices readable through this binding from the buffer's current contents.
    pub fn vertex_count(&self, store: &GeometryStore) -> Result<u32> {
        let buffer = store.get(self.buffer)?;
        Ok(self.layout.vertex_count(buffer.byte_len()))
    }
}

/// Snapshot of a program's enabled attributes, sorted by location.
///
/// Scene entries hold a `Geometry`; cloning shares the binding list.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub(crate) program: ProgramId,
    pub(crate) bindings: Arc<[AttributeBinding]>,
}

impl Geometry {
    #[inline]
    pub fn program(&self) -> ProgramId {
        self.program
    }

    #[inline]
    pub fn bindings(&self) -> &[AttributeBinding] {
        &self.bindings
    }

    pub fn binding_at(&self, location: u32) -> Option<&AttributeBinding> {
        self.bindings.iter().find(|b| b.location == location)
    }

    /// Smallest vertex count across all bindings; 0 without bindings.
    pub fn vertex_count(&self, store: &GeometryStore) -> Result<u32> {
        let mut min: Option<u32> = None;
        for binding in self.bindings.iter() {
            let n = binding.vertex_count(store)?;
            min = Some(min.map_or(n, |m| m.min(n)));
        }
        Ok(min.unwrap_or(0))
    }
}
