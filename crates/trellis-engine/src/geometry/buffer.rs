use crate::error::{EngineError, Result};

/// Upload frequency hint.
///
/// Both kinds accept `upload`; the hint only steers GPU allocation. Dynamic buffers keep
/// their GPU capacity and are rewritten in place, static ones are reallocated.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum UsageHint {
    #[default]
    Static,
    Dynamic,
}

/// CPU-side float storage with a declared grouping.
///
/// Invariant: `values.len()` is always a multiple of `group_size`.
///
/// Each successful upload replaces the contents wholesale and bumps `generation`; bindings
/// captured before the upload compare generations to detect that they are stale.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    usage: UsageHint,
    values: Vec<f32>,
    group_size: usize,
    generation: u64,
}

impl GeometryBuffer {
    pub fn new(usage: UsageHint) -> Self {
        Self {
            usage,
            values: Vec::new(),
            group_size: 1,
            generation: 0,
        }
    }

    /// Replaces the contents.
    ///
    /// Fails with [`EngineError::InvalidGeometry`] if `values` does not split evenly into
    /// groups of `group_size` (or `group_size` is zero); the previous contents and
    /// generation are kept in that case.
    pub fn upload(&mut self, values: &[f32], group_size: usize) -> Result<()> {
        if group_size == 0 || values.len() % group_size != 0 {
            return Err(EngineError::InvalidGeometry {
                len: values.len(),
                group_size,
            });
        }

        self.values.clear();
        self.values.extend_from_slice(values);
        self.group_size = group_size;
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    /// Number of groups (`len / group_size`).
    #[inline]
    pub fn element_count(&self) -> usize {
        self.values.len() / self.group_size
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn usage(&self) -> UsageHint {
        self.usage
    }

    /// Byte length of the contents as uploaded to the GPU.
    #[inline]
    pub fn byte_len(&self) -> u64 {
        (self.values.len() * std::mem::size_of::<f32>()) as u64
    }
}
