//! Scene lighting

use cgmath::Vector3;

use crate::gfx::shape::Color;

/// Light shining from its node's position toward `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub target: Vector3<f32>,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            target: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

/// Scene-wide ambient lighting handle
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub name: String,
    pub color: Color,
    pub intensity: f32,
}

impl Environment {
    /// Soft neutral lighting of an indoor room
    pub fn room() -> Self {
        Self {
            name: "room".to_string(),
            color: Color::rgb(0.95, 0.95, 1.0),
            intensity: 0.6,
        }
    }
}
