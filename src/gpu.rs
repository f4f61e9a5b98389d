//! wgpu-backed renderer buffers.
//!
//! ## Usage
//! ```ignore
//! let mut scene = GpuSceneBuffer::new(device.clone(), queue.clone());
//! let frame_uniforms = GpuFrameUniforms::new(&device);
//! let report = session.frame(input, &mut scene)?;
//! frame_uniforms.write(&queue, &session.frame_uniforms(&camera, size));
//! if report.sync.reallocated { /* rebuild bind group with scene.records_buffer() */ }
//! ```

use std::sync::Arc;

use crate::edit::PRIMITIVE_SIZE;
use crate::sync::{grown_record_capacity, SceneBuffer};
use crate::uniforms::FrameUniforms;
use crate::util::{Error, Result};

/// Storage buffer of primitive records plus a `u32` count uniform.
pub struct GpuSceneBuffer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    records: wgpu::Buffer,
    count: wgpu::Buffer,
    record_capacity: usize,
    generation: u64,
}

impl GpuSceneBuffer {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let records = Self::create_records(&device, 1);
        let count = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sdf_edit_count"),
            // Uniform bindings want 16-byte blocks.
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            device,
            queue,
            records,
            count,
            record_capacity: 1,
            generation: 0,
        }
    }

    fn create_records(device: &wgpu::Device, records: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sdf_edits"),
            size: (records * PRIMITIVE_SIZE) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Record storage; rebind after [`generation`](Self::generation) changes.
    pub fn records_buffer(&self) -> &wgpu::Buffer {
        &self.records
    }

    pub fn count_buffer(&self) -> &wgpu::Buffer {
        &self.count
    }

    /// Bumped every time the record buffer is recreated.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl SceneBuffer for GpuSceneBuffer {
    fn reserve_records(&mut self, records: usize) -> Result<bool> {
        if records <= self.record_capacity {
            return Ok(false);
        }
        let capacity = grown_record_capacity(self.record_capacity, records)
            .ok_or_else(|| Error::Upload(format!("{records} records overflow the address space")))?;
        let bytes = (capacity * PRIMITIVE_SIZE) as u64;
        let max = self.device.limits().max_storage_buffer_binding_size as u64;
        if bytes > max {
            return Err(Error::Upload(format!(
                "{capacity} records ({bytes} bytes) exceed the storage binding limit of {max} bytes"
            )));
        }
        self.records = Self::create_records(&self.device, capacity);
        self.record_capacity = capacity;
        self.generation += 1;
        tracing::debug!("sdf_edits buffer recreated for {capacity} records");
        Ok(true)
    }

    fn write_records(&mut self, first_record: usize, bytes: &[u8]) -> Result<()> {
        let end = first_record * PRIMITIVE_SIZE + bytes.len();
        if end > self.record_capacity * PRIMITIVE_SIZE {
            return Err(Error::Upload(format!("write ends at byte {end}, past buffer end")));
        }
        self.queue
            .write_buffer(&self.records, (first_record * PRIMITIVE_SIZE) as u64, bytes);
        Ok(())
    }

    fn set_count(&mut self, count: u32) -> Result<()> {
        let block = [count, 0, 0, 0];
        self.queue.write_buffer(&self.count, 0, bytemuck::cast_slice(&block));
        Ok(())
    }
}

/// Uniform buffer holding [`FrameUniforms`].
pub struct GpuFrameUniforms {
    buffer: wgpu::Buffer,
}

impl GpuFrameUniforms {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sdf_frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniforms: &FrameUniforms) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}
