use crate::error::{EngineError, Result};

const FLOAT_SIZE: u32 = std::mem::size_of::<f32>() as u32;

/// Largest stride accepted; matches the default wgpu `max_vertex_buffer_array_stride`.
pub const MAX_STRIDE: u32 = 2048;

/// How an attribute reads its buffer. Elements are always `f32`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributeLayout {
    /// Floats per vertex, 1..=4.
    pub components: u32,
    /// Recorded for completeness; float data is never normalized.
    pub normalize: bool,
    /// Bytes between consecutive vertices. 0 means tightly packed.
    pub stride: u32,
    /// Byte offset of the first vertex. Multiple of 4.
    pub offset: u32,
}

impl AttributeLayout {
    /// Tightly packed floats starting at offset 0.
    #[inline]
    pub const fn packed(components: u32) -> Self {
        Self {
            components,
            normalize: false,
            stride: 0,
            offset: 0,
        }
    }

    #[inline]
    pub const fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    #[inline]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Bytes read per vertex.
    #[inline]
    pub fn element_size(&self) -> u32 {
        self.components * FLOAT_SIZE
    }

    /// Effective stride: `stride`, or the element size when packed.
    #[inline]
    pub fn effective_stride(&self) -> u32 {
        if self.stride == 0 {
            self.element_size()
        } else {
            self.stride
        }
    }

    /// Number of whole vertices this layout can read from `byte_len` bytes.
    pub fn vertex_count(&self, byte_len: u64) -> u32 {
        let first_end = u64::from(self.offset) + u64::from(self.element_size());
        if byte_len < first_end {
            return 0;
        }
        let rest = (byte_len - first_end) / u64::from(self.effective_stride());
        u32::try_from(rest + 1).unwrap_or(u32::MAX)
    }

    pub(crate) fn validate(&self, name: &str) -> Result<()> {
        let reason = if !(1..=4).contains(&self.components) {
            Some(format!("component count {} is outside 1..=4", self.components))
        } else if self.offset % FLOAT_SIZE != 0 {
            Some(format!("offset {} is not a multiple of {FLOAT_SIZE}", self.offset))
        } else if self.stride % FLOAT_SIZE != 0 {
            Some(format!("stride {} is not a multiple of {FLOAT_SIZE}", self.stride))
        } else if self.stride != 0 && self.stride < self.element_size() {
            Some(format!(
                "stride {} is smaller than the {} byte element",
                self.stride,
                self.element_size()
            ))
        } else if self.stride > MAX_STRIDE {
            Some(format!("stride {} exceeds {MAX_STRIDE}", self.stride))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(EngineError::InvalidAttributeLayout {
                name: name.to_owned(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
