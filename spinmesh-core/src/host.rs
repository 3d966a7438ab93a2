/// Capability interfaces between the pipeline and whatever drives it
use crate::error::Error;
use crate::mesh::Color;
use crate::projection::ScreenTriangle;

/// Drawable surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Height over width, the ratio the projection scales x by
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

/// Pixel surface provided by the host
pub trait RenderHost {
    fn viewport(&self) -> Viewport;

    fn clear(&mut self, color: Color);

    fn fill_triangle(&mut self, triangle: &ScreenTriangle);

    /// Outline a triangle. Hosts without wireframe support may ignore this.
    fn stroke_triangle(&mut self, _triangle: &ScreenTriangle) {}
}

/// Something a host frame loop can drive.
///
/// `on_create` runs once before the first frame and its failure aborts
/// startup. `on_update` runs every tick with the elapsed time in seconds.
pub trait Scene {
    fn on_create(&mut self, host: &dyn RenderHost) -> Result<(), Error>;

    fn on_update(&mut self, host: &mut dyn RenderHost, elapsed: f32) -> Result<(), Error>;
}
