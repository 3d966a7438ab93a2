/// Perspective projection and mapping to pixel coordinates
use nalgebra::Point2;

use crate::config::ProjectionConfig;
use crate::host::Viewport;
use crate::matrix::Matrix4x4;
use crate::mesh::{Color, Triangle};

/// A triangle in pixel space, ready for the host to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Point2<f32>; 3],
    pub color: Color,
}

/// Projection matrix built for one viewport size
#[derive(Debug, Clone)]
pub struct Projection {
    matrix: Matrix4x4,
    viewport: Viewport,
}

impl Projection {
    pub fn new(viewport: Viewport, config: &ProjectionConfig) -> Self {
        Self {
            matrix: Matrix4x4::projection(
                viewport.aspect_ratio(),
                config.fov_degrees,
                config.z_near,
                config.z_far,
            ),
            viewport,
        }
    }

    pub fn matrix(&self) -> &Matrix4x4 {
        &self.matrix
    }

    /// The viewport this projection was built for
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// View space to normalized device space
    pub fn project(&self, triangle: &Triangle) -> Triangle {
        triangle.map_points(|p| self.matrix.transform(p))
    }

    /// Project and map to this projection's viewport in one step
    pub fn to_screen(&self, triangle: &Triangle) -> ScreenTriangle {
        to_screen(&self.project(triangle), self.viewport)
    }
}

/// Map normalized device coordinates onto a `width` x `height` pixel grid
pub fn to_screen(triangle: &Triangle, viewport: Viewport) -> ScreenTriangle {
    let width = viewport.width as f32;
    let height = viewport.height as f32;
    let map = |i: usize| {
        let p = &triangle.points[i];
        Point2::new((p.x + 1.0) * 0.5 * width, (p.y + 1.0) * 0.5 * height)
    };

    ScreenTriangle {
        points: [map(0), map(1), map(2)],
        color: triangle.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    fn assert_point(p: &Point2<f32>, x: f32, y: f32) {
        assert!((p.x - x).abs() < 1e-3 && (p.y - y).abs() < 1e-3, "{p:?} != ({x}, {y})");
    }

    #[test]
    fn test_ndc_corners_map_to_viewport_edges() {
        let t = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.5),
            Vec3::new(1.0, 1.0, 0.5),
            Vec3::new(0.0, 0.0, 0.5),
        );
        let screen = to_screen(&t, Viewport::new(800, 600));
        assert_point(&screen.points[0], 0.0, 0.0);
        assert_point(&screen.points[1], 800.0, 600.0);
        assert_point(&screen.points[2], 400.0, 300.0);
    }

    #[test]
    fn test_projection_of_view_space_triangle() {
        let projection = Projection::new(Viewport::new(800, 600), &ProjectionConfig::default());
        let mut t = Triangle::new(
            Vec3::new(0.0, 1.0, 2.0),
            Vec3::new(0.0, 2.0, 2.0),
            Vec3::new(1.0, 2.0, 2.0),
        );
        t.color = Color::grey(0.5);

        let ndc = projection.project(&t);
        assert!((ndc.points[0].y - 0.5).abs() < 1e-6);
        assert!((ndc.points[2].x - 0.375).abs() < 1e-6);
        // z maps into the depth range after the divide
        assert!((ndc.points[0].z - 1900.0 / 1999.8).abs() < 1e-5);

        let screen = projection.to_screen(&t);
        assert_point(&screen.points[0], 400.0, 450.0);
        assert_point(&screen.points[1], 400.0, 600.0);
        assert_point(&screen.points[2], 550.0, 600.0);
        assert_eq!(screen.color, Color::grey(0.5));
    }

    #[test]
    fn test_point_on_camera_plane_is_not_divided() {
        let projection = Projection::new(Viewport::new(100, 100), &ProjectionConfig::default());
        let t = Triangle::new(Vec3::new(0.5, 0.25, 0.0), Vec3::x(), Vec3::y());
        let ndc = projection.project(&t);
        // w == z == 0, so only the linear part applies
        assert!((ndc.points[0].x - 0.5).abs() < 1e-6);
        assert!((ndc.points[0].y - 0.25).abs() < 1e-6);
    }
}
