//! Vertex format and palette
//!
//! Vertices are produced in playfield pixels by the scene builder and
//! converted to clip space just before upload.

use bytemuck::{Pod, Zeroable};

/// Flat-colored 2D vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Buffer layout matching `VertexInput` in `shader.wgsl`
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements. The scene maps `EntityKind::Hostile` to the
/// blighted-grape pair and `EntityKind::Bonus` to cork gold; nothing else
/// reads the entity kind for drawing.
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.07, 0.02, 0.08, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.22, 0.04, 0.12, 1.0];
    pub const STAR: [f32; 4] = [1.0, 0.96, 0.9, 1.0];
    /// Blighted grape cluster
    pub const HOSTILE: [f32; 4] = [0.45, 0.12, 0.32, 1.0];
    pub const HOSTILE_RIM: [f32; 4] = [0.75, 0.3, 0.55, 1.0];
    /// Champagne cork gold
    pub const BONUS: [f32; 4] = [1.0, 0.84, 0.3, 1.0];
    pub const BONUS_GLOW: [f32; 4] = [1.0, 0.9, 0.5, 0.35];
    pub const SCORE: [f32; 4] = [0.99, 0.95, 0.88, 1.0];
    pub const BEST: [f32; 4] = [1.0, 0.84, 0.3, 0.8];
    pub const VEIL: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
    /// New best score badge
    pub const RECORD: [f32; 4] = [1.0, 0.62, 0.78, 1.0];
    pub const RECORD_BAND: [f32; 4] = [0.55, 0.1, 0.3, 0.85];
}
