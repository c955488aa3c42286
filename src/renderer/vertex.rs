//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.04, 0.055, 0.153, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const PLAYER_DETAIL: [f32; 4] = [0.0, 0.533, 0.8, 1.0];
    pub const ENGINE: [f32; 4] = [1.0, 0.4, 0.4, 1.0];
    pub const SHIELD_RING: [f32; 4] = [0.0, 1.0, 1.0, 0.5];
    pub const BASIC: ([f32; 4], [f32; 4]) = ([1.0, 0.2, 0.2, 1.0], [0.8, 0.0, 0.0, 1.0]);
    pub const FAST: ([f32; 4], [f32; 4]) = ([1.0, 0.6, 0.2, 1.0], [0.8, 0.4, 0.0, 1.0]);
    pub const SHOOTER: ([f32; 4], [f32; 4]) = ([1.0, 0.2, 1.0, 1.0], [0.8, 0.0, 0.8, 1.0]);
    pub const BOSS: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const BOSS_DETAIL: [f32; 4] = [0.4, 0.0, 0.4, 1.0];
    pub const EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER_BULLET: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const ENEMY_BULLET: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
    pub const BAR_BACK: [f32; 4] = [0.2, 0.2, 0.2, 0.8];
    pub const BAR_EMPTY: [f32; 4] = [1.0, 0.0, 0.0, 0.8];
    pub const BAR_FULL: [f32; 4] = [0.0, 1.0, 0.0, 0.8];
}

/// Same color with alpha scaled
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}
