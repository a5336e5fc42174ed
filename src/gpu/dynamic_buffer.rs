//! Growable GPU buffers for per-instance data.
//!
//! Instance batches change size whenever atoms are loaded or selection
//! halos appear, so buffers grow by doubling and are never shrunk.

use std::marker::PhantomData;

/// Smallest allocation, in bytes. wgpu rejects zero-sized vertex buffers.
const MIN_CAPACITY: u64 = 256;

/// A GPU buffer of `T` that reallocates when a write exceeds capacity.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Buffer with room for `capacity` items.
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = capacity.max(1);
        let buffer = allocate::<T>(device, label, capacity, usage);
        Self {
            buffer,
            capacity,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    /// Upload `data`, growing the buffer if needed.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let reallocated = if data.len() > self.capacity {
            let new_capacity = grown_capacity(self.capacity, data.len());
            log::debug!(
                "{}: growing {} -> {} items",
                self.label,
                self.capacity,
                new_capacity
            );
            self.buffer =
                allocate::<T>(device, &self.label, new_capacity, self.usage);
            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.count = data.len();
        reallocated
    }

    /// Underlying wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Slice covering the items written by the last [`write`](Self::write).
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        let bytes = (self.count * size_of::<T>()) as u64;
        self.buffer.slice(..bytes.max(1))
    }

    /// Number of items currently stored.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the last write was empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Capacity in items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn allocate<T>(
    device: &wgpu::Device,
    label: &str,
    capacity: usize,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    let size = ((capacity * size_of::<T>()) as u64).max(MIN_CAPACITY);
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// 2x growth, never less than what is needed.
fn grown_capacity(current: usize, needed: usize) -> usize {
    (current * 2).max(needed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_doubles_until_needed() {
        assert_eq!(grown_capacity(64, 65), 128);
        assert_eq!(grown_capacity(64, 1000), 1000);
        assert_eq!(grown_capacity(1, 2), 2);
    }
}
