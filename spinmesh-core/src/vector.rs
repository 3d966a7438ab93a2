/// 3D vector primitives shared by every pipeline stage
use nalgebra::Vector3;

/// A point or direction in 3D space
pub type Vec3 = Vector3<f32>;

pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    a.cross(b)
}

pub fn dot(a: &Vec3, b: &Vec3) -> f32 {
    a.dot(b)
}

pub fn length(v: &Vec3) -> f32 {
    v.norm()
}

/// Normalize in place. A zero-length vector is left as the zero vector.
pub fn normalize(v: &mut Vec3) {
    let len = length(v);
    if len != 0.0 {
        *v /= len;
    }
}

/// Normalized copy of `v`, see [`normalize`]
pub fn normalized(v: &Vec3) -> Vec3 {
    let mut out = *v;
    normalize(&mut out);
    out
}
