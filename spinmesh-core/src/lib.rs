/// spinmesh core - the flat-shaded spinning mesh pipeline
///
/// Loads a triangle mesh once, then per frame rotates and offsets it into
/// view space, culls back faces, shades the rest from a single directional
/// light and projects them to pixel space for a [`RenderHost`] to draw.

pub mod config;
pub mod error;
pub mod host;
pub mod matrix;
pub mod mesh;
pub mod obj;
pub mod projection;
pub mod renderer;
pub mod shading;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use config::{DrawMode, MeshSource, RenderConfig};
pub use error::{ConfigError, Error, LoadError};
pub use host::{RenderHost, Scene, Viewport};
pub use matrix::Matrix4x4;
pub use mesh::{Color, Mesh, Triangle};
pub use projection::{Projection, ScreenTriangle};
pub use renderer::{Frame, MeshRenderer};
pub use transform::AnimationState;
pub use vector::Vec3;
