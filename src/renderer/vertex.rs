//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position (logical pixels until uploaded) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const LIGHT_GRAY: [f32; 4] = [0.78, 0.78, 0.78, 1.0];

    // Square Shooter
    pub const SHOOTER_MAP: [f32; 4] = BLACK;
    pub const SHOOTER_PANEL: [f32; 4] = [0.0, 0.4, 0.0, 1.0];
    pub const SHIP: [f32; 4] = [0.9, 0.9, 1.0, 1.0];
    pub const SHIP_SHIELD: [f32; 4] = [0.3, 0.6, 1.0, 0.8];
    pub const BULLET: [f32; 4] = [1.0, 1.0, 0.6, 1.0];
    pub const SUPER_BULLET: [f32; 4] = [1.0, 0.5, 0.1, 1.0];
    pub const EXPLOSION: [f32; 4] = [1.0, 0.6, 0.2, 1.0];
    pub const BUBBLE_PALETTE: [[f32; 4]; 6] = [
        [1.0, 0.71, 0.76, 1.0],
        [0.68, 0.85, 0.9, 1.0],
        [0.6, 0.98, 0.6, 1.0],
        [1.0, 1.0, 0.6, 1.0],
        [0.87, 0.63, 0.87, 1.0],
        [1.0, 0.8, 0.6, 1.0],
    ];
    pub const POWERUP_SHIELD: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
    pub const POWERUP_SUPER: [f32; 4] = [1.0, 0.5, 0.1, 1.0];
    pub const POWERUP_FREEZE: [f32; 4] = [0.7, 1.0, 1.0, 1.0];
    pub const POWERUP_SHOTGUN: [f32; 4] = [1.0, 0.3, 0.3, 1.0];

    // Demon Kingdom
    pub const BACKGROUNDS: [[f32; 4]; 6] = [
        [0.45, 0.45, 0.48, 1.0],
        [0.45, 0.7, 0.35, 1.0],
        [0.8, 0.9, 0.95, 1.0],
        [0.45, 0.2, 0.2, 1.0],
        [0.9, 0.8, 0.55, 1.0],
        [0.3, 0.25, 0.3, 1.0],
    ];
    pub const SIDEBAR: [f32; 4] = BLACK;
    pub const GEM: [f32; 4] = [0.3, 0.9, 1.0, 1.0];
    pub const FIREBALL: [f32; 4] = [1.0, 0.45, 0.0, 1.0];
    pub const WHIRLWIND: [f32; 4] = [0.85, 0.85, 0.95, 0.85];
    pub const GHOST: [f32; 4] = [0.9, 0.95, 1.0, 0.6];
    pub const STORY_BACKGROUND: [f32; 4] = BLACK;
}
