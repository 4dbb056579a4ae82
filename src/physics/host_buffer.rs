//! Host Buffers - simulator-owned host memory with scoped mapping
//!
//! A buffer is writable only through the [`MappedBuffer`] guard returned by
//! [`HostBuffer::map`]. Dropping the guard unmaps the buffer, so every exit
//! path (including `?`) releases it. Registration calls refuse mapped buffers.

use bytemuck::Pod;

use crate::error::{EngineError, EngineResult};

/// Host-visible buffer of `T` with a fixed element count
#[derive(Debug)]
pub struct HostBuffer<T: Pod> {
    label: &'static str,
    data: Vec<T>,
    mapped: bool,
}

impl<T: Pod> HostBuffer<T> {
    /// Allocate `len` zeroed elements
    pub fn zeroed(label: &'static str, len: usize) -> Self {
        Self {
            label,
            data: vec![T::zeroed(); len],
            mapped: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Map for host writes. Blocks until the memory is host-accessible,
    /// which for host memory is immediate.
    pub fn map(&mut self) -> MappedBuffer<'_, T> {
        self.mapped = true;
        log::trace!("[HostBuffer::map] '{}' mapped ({} elements)", self.label, self.data.len());
        MappedBuffer { buffer: self }
    }

    /// Read access for registration. Fails while a guard has leaked its mapping.
    pub fn contents(&self) -> EngineResult<&[T]> {
        if self.mapped {
            return Err(EngineError::BufferError {
                operation: format!("read '{}'", self.label),
                error: "buffer is still mapped".to_string(),
            });
        }
        Ok(&self.data)
    }

    /// Raw bytes for device upload
    pub fn bytes(&self) -> EngineResult<&[u8]> {
        self.contents().map(bytemuck::cast_slice)
    }
}

/// Scoped write access to a [`HostBuffer`]; unmaps on drop
pub struct MappedBuffer<'a, T: Pod> {
    buffer: &'a mut HostBuffer<T>,
}

impl<T: Pod> std::ops::Deref for MappedBuffer<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.buffer.data
    }
}

impl<T: Pod> std::ops::DerefMut for MappedBuffer<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer.data
    }
}

impl<T: Pod> Drop for MappedBuffer<'_, T> {
    fn drop(&mut self) {
        self.buffer.mapped = false;
        log::trace!("[HostBuffer::unmap] '{}' unmapped", self.buffer.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_write_unmap() {
        let mut buffer = HostBuffer::<i32>::zeroed("indices", 3);
        assert_eq!(buffer.contents().expect("unmapped"), &[0, 0, 0]);

        {
            let mut mapped = buffer.map();
            mapped[1] = 7;
            mapped[2] = 9;
        } // unmapped here

        assert!(!buffer.is_mapped());
        assert_eq!(buffer.contents().expect("unmapped"), &[0, 7, 9]);
        assert_eq!(buffer.bytes().expect("unmapped").len(), 12);
    }

    #[test]
    fn test_unmapped_on_early_return() {
        fn fill(buffer: &mut HostBuffer<f32>) -> EngineResult<()> {
            let mut mapped = buffer.map();
            mapped[0] = 1.0;
            Err(EngineError::Internal {
                message: "bail".to_string(),
            })
        }

        let mut buffer = HostBuffer::<f32>::zeroed("planes", 2);
        assert!(fill(&mut buffer).is_err());
        assert!(!buffer.is_mapped());
    }

    #[test]
    fn test_leaked_guard_blocks_reads() {
        let mut buffer = HostBuffer::<u32>::zeroed("leaky", 1);
        std::mem::forget(buffer.map());
        assert!(buffer.is_mapped());
        assert!(matches!(
            buffer.contents(),
            Err(EngineError::BufferError { .. })
        ));
    }
}
