use crate::error::{EngineError, Result};

use super::{GeometryBuffer, UsageHint};

/// Index of a buffer inside a [`GeometryStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BufferHandle(pub(crate) usize);

impl BufferHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owner of every geometry buffer for one render context.
///
/// Buffers live until the store is dropped; handles stay valid for the store lifetime.
#[derive(Debug, Default)]
pub struct GeometryStore {
    buffers: Vec<GeometryBuffer>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, usage: UsageHint) -> BufferHandle {
        self.buffers.push(GeometryBuffer::new(usage));
        BufferHandle(self.buffers.len() - 1)
    }

    /// Replaces a buffer's contents. See [`GeometryBuffer::upload`].
    pub fn upload(&mut self, handle: BufferHandle, values: &[f32], group_size: usize) -> Result<()> {
        let buffer = self
            .buffers
            .get_mut(handle.0)
            .ok_or(EngineError::UnknownBuffer { index: handle.0 })?;

        buffer.upload(values, group_size)?;

        log::debug!(
            "geometry buffer #{} uploaded: {} element(s) of {}, generation {}",
            handle.0,
            buffer.element_count(),
            group_size,
            buffer.generation()
        );
        Ok(())
    }

    pub fn element_count(&self, handle: BufferHandle) -> Result<usize> {
        self.get(handle).map(GeometryBuffer::element_count)
    }

    pub fn generation(&self, handle: BufferHandle) -> Result<u64> {
        self.get(handle).map(GeometryBuffer::generation)
    }

    pub fn values(&self, handle: BufferHandle) -> Result<&[f32]> {
        self.get(handle).map(GeometryBuffer::values)
    }

    pub fn get(&self, handle: BufferHandle) -> Result<&GeometryBuffer> {
        self.buffers
            .get(handle.0)
            .ok_or(EngineError::UnknownBuffer { index: handle.0 })
    }

    pub fn iter(&self) -> impl Iterator<Item = (BufferHandle, &GeometryBuffer)> {
        self.buffers.iter().enumerate().map(|(i, b)| (BufferHandle(i), b))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_address_their_own_buffer() {
        let mut store = GeometryStore::new();
        let a = store.create(UsageHint::Static);
        let b = store.create(UsageHint::Dynamic);

        store.upload(a, &[0.0; 6], 2).expect("upload a");
        store.upload(b, &[0.0; 8], 4).expect("upload b");

        assert_eq!(store.element_count(a), Ok(3));
        assert_eq!(store.element_count(b), Ok(2));
        assert_eq!(store.get(b).map(GeometryBuffer::usage), Ok(UsageHint::Dynamic));
    }

    #[test]
    fn foreign_handle_is_rejected() {
        let store = GeometryStore::new();
        assert_eq!(
            store.element_count(BufferHandle(3)),
            Err(EngineError::UnknownBuffer { index: 3 })
        );
    }
}
