/// Backface culling and directional flat shading
use crate::mesh::{Color, Triangle};
use crate::vector::{self, Vec3};

/// How a view-space triangle relates to the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    /// Faces the camera; carries the unit face normal
    Visible(Vec3),
    BackFacing(Vec3),
    /// Zero-area triangle with no usable normal
    Degenerate,
}

impl Visibility {
    pub fn normal(&self) -> Option<Vec3> {
        match self {
            Visibility::Visible(n) | Visibility::BackFacing(n) => Some(*n),
            Visibility::Degenerate => None,
        }
    }
}

/// Classify a triangle by its winding-order normal against the camera position
pub fn classify(triangle: &Triangle, camera: &Vec3) -> Visibility {
    let Some(normal) = triangle.normal() else {
        return Visibility::Degenerate;
    };

    let to_triangle = triangle.points[0] - camera;
    if vector::dot(&normal, &to_triangle) < 0.0 {
        Visibility::Visible(normal)
    } else {
        Visibility::BackFacing(normal)
    }
}

/// A single directional light, stored normalized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    direction: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: vector::normalized(&direction),
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Lambert term for a unit normal, clamped to [0, 1]
    pub fn intensity(&self, normal: &Vec3) -> f32 {
        vector::dot(normal, &self.direction).clamp(0.0, 1.0)
    }

    pub fn shade(&self, normal: &Vec3) -> Color {
        Color::grey(self.intensity(normal))
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -1.0))
    }
}
