//! Growable GPU buffers for geometry that arrives after construction.
//!
//! The model mesh and the surface particle field are only known once the
//! asset load resolves, so their buffers start small and grow on upload.

use std::marker::PhantomData;

/// A typed GPU buffer that reallocates (2x growth) when a write exceeds
/// its capacity. Never shrinks.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    /// Capacity in items.
    capacity: usize,
    /// Items written by the last upload.
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Empty buffer with room for `capacity` items (minimum one).
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Self::allocate(device, label, capacity, usage),
            capacity,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * size_of::<T>()) as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the buffer contents, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let reallocated = data.len() > self.capacity;
        if reallocated {
            let new_capacity = grown_capacity(self.capacity, data.len());
            log::debug!(
                "{}: growing {} -> {} items",
                self.label,
                self.capacity,
                new_capacity
            );
            self.buffer =
                Self::allocate(device, &self.label, new_capacity, self.usage);
            self.capacity = new_capacity;
        }
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

    /// Byte slice covering the items written by the last upload.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer
            .slice(..(self.count.max(1) * size_of::<T>()) as u64)
    }

    /// Items written by the last upload.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether nothing has been uploaded yet.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Capacity after growing to fit `needed` items.
fn grown_capacity(current: usize, needed: usize) -> usize {
    (needed * 2).max(current + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_at_least_doubles_the_request() {
        assert_eq!(grown_capacity(1, 10), 20);
        assert_eq!(grown_capacity(64, 65), 130);
    }

    #[test]
    fn growth_always_exceeds_current() {
        assert!(grown_capacity(100, 0) > 100);
    }
}
