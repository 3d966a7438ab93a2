/// Triangle mesh data model
use serde::{Deserialize, Serialize};

use crate::vector::{self, Vec3};

/// Linear RGB color with channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::grey(0.0);
    pub const WHITE: Color = Color::grey(1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(intensity: f32) -> Self {
        Self::new(intensity, intensity, intensity)
    }

    /// Perceived brightness, used by hosts that only have a luminosity ramp
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A triangle defined by three points; winding order sets the normal direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Vec3; 3],
    /// Shade assigned for the current frame only
    pub color: Color,
}

impl Triangle {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self {
            points: [p0, p1, p2],
            color: Color::default(),
        }
    }

    /// Apply `f` to every point, keeping the color
    pub fn map_points(&self, f: impl Fn(&Vec3) -> Vec3) -> Self {
        Self {
            points: [f(&self.points[0]), f(&self.points[1]), f(&self.points[2])],
            color: self.color,
        }
    }

    /// Unit face normal from the winding order, `None` for degenerate triangles
    pub fn normal(&self) -> Option<Vec3> {
        let [p0, p1, p2] = &self.points;
        let normal = vector::cross(&(p1 - p0), &(p2 - p0));
        if vector::length(&normal) == 0.0 {
            return None;
        }
        Some(vector::normalized(&normal))
    }
}

/// An ordered collection of triangles. Fixed once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// The 1x1x1 cube spanning the origin to (1, 1, 1), wound outward
    pub fn unit_cube() -> Self {
        let v = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
        let faces = [
            // South
            [v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0)],
            [v(0.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 0.0, 0.0)],
            // East
            [v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0), v(1.0, 1.0, 1.0)],
            [v(1.0, 0.0, 0.0), v(1.0, 1.0, 1.0), v(1.0, 0.0, 1.0)],
            // North
            [v(1.0, 0.0, 1.0), v(1.0, 1.0, 1.0), v(0.0, 1.0, 1.0)],
            [v(1.0, 0.0, 1.0), v(0.0, 1.0, 1.0), v(0.0, 0.0, 1.0)],
            // West
            [v(0.0, 0.0, 1.0), v(0.0, 1.0, 1.0), v(0.0, 1.0, 0.0)],
            [v(0.0, 0.0, 1.0), v(0.0, 1.0, 0.0), v(0.0, 0.0, 0.0)],
            // Top
            [v(0.0, 1.0, 0.0), v(0.0, 1.0, 1.0), v(1.0, 1.0, 1.0)],
            [v(0.0, 1.0, 0.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, 0.0)],
            // Bottom
            [v(1.0, 0.0, 1.0), v(0.0, 0.0, 1.0), v(0.0, 0.0, 0.0)],
            [v(1.0, 0.0, 1.0), v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0)],
        ];

        faces
            .into_iter()
            .map(|[a, b, c]| Triangle::new(a, b, c))
            .collect()
    }
}

impl FromIterator<Triangle> for Mesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
