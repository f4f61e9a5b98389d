//! Per-frame uniform block consumed by the ray marcher.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::util::{pcg_hash, unit_float};

/// Uniform block matching the shader's frame struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Inverse view-projection (world from clip).
    pub inverse_view_projection: [[f32; 4]; 4],
    /// Camera world position, w = 1.
    pub eye: [f32; 4],
    /// Near, far, width, height.
    pub near_far_size: [f32; 4],
    /// Three jitter values in [0, 1) and the sample index.
    pub seed: [f32; 4],
}

/// Derives per-frame jitter from a session seed.
#[derive(Debug, Clone, Copy)]
pub struct SeedSequence {
    seed: u32,
}

impl SeedSequence {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Three decorrelated values in `[0, 1)` for `frame`.
    pub fn jitter(&self, frame: u64) -> [f32; 3] {
        let base = pcg_hash(self.seed ^ pcg_hash(frame as u32) ^ pcg_hash((frame >> 32) as u32));
        let a = pcg_hash(base);
        let b = pcg_hash(a);
        let c = pcg_hash(b);
        [unit_float(a), unit_float(b), unit_float(c)]
    }
}

impl FrameUniforms {
    pub fn new(
        inverse_view_projection: Mat4,
        eye: Vec3,
        near: f32,
        far: f32,
        size: (u32, u32),
        jitter: [f32; 3],
        sample_index: u32,
    ) -> Self {
        Self {
            inverse_view_projection: inverse_view_projection.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
            near_far_size: [near, far, size.0 as f32, size.1 as f32],
            seed: [jitter[0], jitter[1], jitter[2], sample_index as f32],
        }
    }

    /// Sample index as the renderer reads it.
    pub fn sample_index(&self) -> u32 {
        self.seed[3] as u32
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
