/// Homogeneous 4x4 matrices in row-vector convention
use std::ops::{Index, IndexMut};

use nalgebra::Matrix4;

use crate::vector::Vec3;

/// A 4x4 transform indexed as `m[(row, col)]`.
///
/// Vectors are treated as rows and multiplied on the left, so the
/// translation lives in row 3 and the homogeneous `w` is read from column 3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4x4 {
    m: Matrix4<f32>,
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Index<(usize, usize)> for Matrix4x4 {
    type Output = f32;

    fn index(&self, index: (usize, usize)) -> &f32 {
        &self.m[index]
    }
}

impl IndexMut<(usize, usize)> for Matrix4x4 {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f32 {
        &mut self.m[index]
    }
}

impl Matrix4x4 {
    pub fn zeros() -> Self {
        Self { m: Matrix4::zeros() }
    }

    pub fn identity() -> Self {
        Self {
            m: Matrix4::identity(),
        }
    }

    pub fn as_nalgebra(&self) -> &Matrix4<f32> {
        &self.m
    }

    /// Rotation about the X axis
    pub fn rotation_x(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        let mut r = Self::zeros();
        r[(0, 0)] = 1.0;
        r[(1, 1)] = c;
        r[(1, 2)] = s;
        r[(2, 1)] = -s;
        r[(2, 2)] = c;
        r[(3, 3)] = 1.0;
        r
    }

    /// Rotation about the Y axis
    pub fn rotation_y(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        let mut r = Self::zeros();
        r[(0, 0)] = c;
        r[(0, 2)] = -s;
        r[(1, 1)] = 1.0;
        r[(2, 0)] = s;
        r[(2, 2)] = c;
        r[(3, 3)] = 1.0;
        r
    }

    /// Rotation about the Z axis
    pub fn rotation_z(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        let mut r = Self::zeros();
        r[(0, 0)] = c;
        r[(0, 1)] = s;
        r[(1, 0)] = -s;
        r[(1, 1)] = c;
        r[(2, 2)] = 1.0;
        r[(3, 3)] = 1.0;
        r
    }

    /// Perspective projection producing `w = z`.
    ///
    /// `aspect_ratio` is height / width.
    pub fn projection(aspect_ratio: f32, fov_degrees: f32, z_near: f32, z_far: f32) -> Self {
        let fov_rad = 1.0 / (fov_degrees.to_radians() * 0.5).tan();
        let depth = z_far - z_near;

        let mut p = Self::zeros();
        p[(0, 0)] = aspect_ratio * fov_rad;
        p[(1, 1)] = fov_rad;
        p[(2, 2)] = z_far / depth;
        p[(3, 2)] = (-z_far * z_near) / depth;
        p[(2, 3)] = 1.0;
        p[(3, 3)] = 0.0;
        p
    }

    /// Multiply `[x y z 1]` by this matrix, returning the xyz part and `w`
    /// without any divide.
    pub fn transform_homogeneous(&self, v: &Vec3) -> (Vec3, f32) {
        let m = &self.m;
        let col = |i: usize| v.x * m[(0, i)] + v.y * m[(1, i)] + v.z * m[(2, i)] + m[(3, i)];
        (Vec3::new(col(0), col(1), col(2)), col(3))
    }

    /// Transform a point, dividing by `w` unless it is exactly zero
    pub fn transform(&self, v: &Vec3) -> Vec3 {
        let (mut out, w) = self.transform_homogeneous(v);
        if w != 0.0 {
            out /= w;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Matrix4x4, b: &Matrix4x4) {
        assert!((a.as_nalgebra() - b.as_nalgebra()).norm() < 1e-6, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Matrix4x4::default(), Matrix4x4::zeros());
    }

    #[test]
    fn test_zero_angle_rotations_are_identity() {
        assert_close(&Matrix4x4::rotation_x(0.0), &Matrix4x4::identity());
        assert_close(&Matrix4x4::rotation_y(0.0), &Matrix4x4::identity());
        assert_close(&Matrix4x4::rotation_z(0.0), &Matrix4x4::identity());
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let r = Matrix4x4::rotation_y(std::f32::consts::FRAC_PI_2);
        let v = r.transform(&Vec3::new(1.0, 0.0, 0.0));
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_translation_row_is_applied() {
        let mut m = Matrix4x4::identity();
        m[(3, 0)] = 2.0;
        m[(3, 2)] = -1.0;
        let v = m.transform(&Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(v, Vec3::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_zero_w_skips_divide() {
        // Column 3 all zero forces w == 0
        let mut m = Matrix4x4::zeros();
        m[(0, 0)] = 2.0;
        m[(1, 1)] = 3.0;
        m[(2, 2)] = 4.0;
        m[(3, 0)] = 0.5;
        let v = m.transform(&Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(v, Vec3::new(2.5, 3.0, 4.0));
    }

    #[test]
    fn test_projection_divides_by_z() {
        let p = Matrix4x4::projection(1.0, 90.0, 0.1, 1000.0);
        let (_, w) = p.transform_homogeneous(&Vec3::new(1.0, 1.0, 4.0));
        assert_eq!(w, 4.0);

        let v = p.transform(&Vec3::new(1.0, 1.0, 4.0));
        assert!((v.x - 0.25).abs() < 1e-6);
        assert!((v.y - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_projection_entries() {
        let p = Matrix4x4::projection(0.75, 90.0, 0.1, 1000.0);
        assert!((p[(0, 0)] - 0.75).abs() < 1e-6);
        assert!((p[(1, 1)] - 1.0).abs() < 1e-6);
        assert!((p[(2, 2)] - 1000.0 / 999.9).abs() < 1e-6);
        assert!((p[(3, 2)] + 100.0 / 999.9).abs() < 1e-6);
        assert_eq!(p[(2, 3)], 1.0);
        assert_eq!(p[(3, 3)], 0.0);
    }
}
