/// Model animation state and the per-frame model-to-view transform
use crate::config::{Axis, PlacementConfig, SpinConfig};
use crate::matrix::Matrix4x4;
use crate::mesh::Triangle;

/// The only state carried between frames: the accumulated spin angle in radians.
///
/// The angle grows without bound; every consumer goes through sin/cos.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationState {
    pub angle: f32,
}

impl AnimationState {
    pub fn new(angle: f32) -> Self {
        Self { angle }
    }

    /// Advance by `elapsed` seconds at `speed` radians per second
    #[must_use]
    pub fn advance(self, speed: f32, elapsed: f32) -> Self {
        Self {
            angle: self.angle + speed * elapsed,
        }
    }
}

/// Rotation matrices for one frame plus the fixed view-space offset
#[derive(Debug, Clone)]
pub struct FrameTransform {
    rotation_x: Matrix4x4,
    rotation_y: Matrix4x4,
    rotation_z: Matrix4x4,
    depth_offset: f32,
    vertical_offset: f32,
}

impl FrameTransform {
    pub fn new(spin: &SpinConfig, placement: &PlacementConfig, state: AnimationState) -> Self {
        let [mut x, mut y, mut z] = placement.base_angles;
        match spin.axis {
            Axis::X => x += state.angle,
            Axis::Y => y += state.angle,
            Axis::Z => z += state.angle,
        }

        Self {
            rotation_x: Matrix4x4::rotation_x(x),
            rotation_y: Matrix4x4::rotation_y(y),
            rotation_z: Matrix4x4::rotation_z(z),
            depth_offset: placement.depth_offset,
            vertical_offset: placement.vertical_offset,
        }
    }

    /// Rotate about X, then Y, then Z, then push along Z and lift along Y
    pub fn apply(&self, triangle: &Triangle) -> Triangle {
        triangle
            .map_points(|p| self.rotation_x.transform(p))
            .map_points(|p| self.rotation_y.transform(p))
            .map_points(|p| self.rotation_z.transform(p))
            .map_points(|p| {
                let mut p = *p;
                p.z += self.depth_offset;
                p.y += self.vertical_offset;
                p
            })
    }
}
