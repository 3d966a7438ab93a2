/// Render configuration
///
/// Every value is fixed for the lifetime of a [`MeshRenderer`](crate::MeshRenderer).
/// The defaults describe the reference scene: a 90 degree field of view, the
/// model pushed two units into the screen with no base rotation, spun about Y
/// at one radian per second and lit head-on from the camera. On a y-down
/// surface the model appears upside down; `demos/spinmesh.toml` turns it
/// upright with `base_angles = [π, 0, 0]`.
///
/// Configuration may be read from a TOML file where every key is optional:
///
/// ```toml
/// [mesh]
/// path = "teapot.obj"
///
/// [spin]
/// axis = "y"
/// speed = 1.0
///
/// [pipeline]
/// draw_mode = "fill_and_wireframe"
/// ```
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::mesh::Color;
use crate::vector::Vec3;

/// Where the renderer takes its mesh from
#[derive(Debug, Clone, PartialEq)]
pub enum MeshSource {
    File(PathBuf),
    UnitCube,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    #[default]
    Fill,
    Wireframe,
    FillAndWireframe,
}

impl DrawMode {
    pub fn fills(self) -> bool {
        matches!(self, DrawMode::Fill | DrawMode::FillAndWireframe)
    }

    pub fn strokes(self) -> bool {
        matches!(self, DrawMode::Wireframe | DrawMode::FillAndWireframe)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Object file to load; the built-in unit cube when unset
    pub path: Option<PathBuf>,
}

impl MeshConfig {
    pub fn source(&self) -> MeshSource {
        match &self.path {
            Some(path) => MeshSource::File(path.clone()),
            None => MeshSource::UnitCube,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Direction the light travels; normalized before use
    pub direction: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [0.0, 0.0, -1.0],
        }
    }
}

/// The single time-driven rotation.
///
/// The animation angle advances by `speed` radians per second and is added
/// to the base angle of `axis`. The other two axes hold their base angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub axis: Axis,
    pub speed: f32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Y,
            speed: 1.0,
        }
    }
}

/// Fixed model orientation and offset into view space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Base rotation about X, Y and Z in radians
    pub base_angles: [f32; 3],
    /// Added to z, pushing the model away from the camera
    pub depth_offset: f32,
    pub vertical_offset: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            base_angles: [0.0; 3],
            depth_offset: 2.0,
            vertical_offset: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            z_near: 0.1,
            z_far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub cull_backfaces: bool,
    /// Flat directional shading; triangles are drawn white when off
    pub shading: bool,
    pub draw_mode: DrawMode,
    pub background: Color,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cull_backfaces: true,
            shading: true,
            draw_mode: DrawMode::Fill,
            background: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mesh: MeshConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub spin: SpinConfig,
    pub placement: PlacementConfig,
    pub projection: ProjectionConfig,
    pub pipeline: PipelineConfig,
}

impl RenderConfig {
    /// Read and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.projection;
        if !(p.fov_degrees > 0.0 && p.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                p.fov_degrees
            )));
        }
        if !(p.z_near > 0.0 && p.z_far > p.z_near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < z_near < z_far, got {} and {}",
                p.z_near, p.z_far
            )));
        }
        if self.light_direction() == Vec3::zeros() {
            return Err(ConfigError::Invalid("light direction must be non-zero".into()));
        }
        if !self.spin.speed.is_finite() {
            return Err(ConfigError::Invalid("spin speed must be finite".into()));
        }
        Ok(())
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::from(self.camera.position)
    }

    /// Light direction as configured, not yet normalized
    pub fn light_direction(&self) -> Vec3 {
        Vec3::from(self.light.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.mesh.source(), MeshSource::UnitCube);
        assert_eq!(config.camera_position(), Vec3::zeros());
        assert_eq!(config.light_direction(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(config.spin.axis, Axis::Y);
        assert_eq!(config.spin.speed, 1.0);
        assert_eq!(config.placement.depth_offset, 2.0);
        assert_eq!(config.placement.vertical_offset, 1.0);
        assert_eq!(config.placement.base_angles, [0.0; 3]);
        assert_eq!(config.projection.fov_degrees, 90.0);
        assert!(config.pipeline.cull_backfaces);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_demo_config_flips_model_upright() {
        let config = RenderConfig::from_toml_str(include_str!("../../demos/spinmesh.toml")).unwrap();
        let [x, y, z] = config.placement.base_angles;
        assert!((x - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!((y, z), (0.0, 0.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = RenderConfig::from_toml_str("").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = RenderConfig::from_toml_str(
            r#"
            [mesh]
            path = "models/ship.obj"

            [spin]
            axis = "x"
            speed = 0.5

            [placement]
            depth_offset = 8.0

            [pipeline]
            draw_mode = "fill_and_wireframe"
            background = { r = 0.1, g = 0.1, b = 0.2 }
            "#,
        )
        .unwrap();

        assert_eq!(
            config.mesh.source(),
            MeshSource::File(PathBuf::from("models/ship.obj"))
        );
        assert_eq!(config.spin.axis, Axis::X);
        assert_eq!(config.spin.speed, 0.5);
        assert_eq!(config.placement.depth_offset, 8.0);
        assert_eq!(config.placement.vertical_offset, 1.0);
        assert_eq!(config.pipeline.draw_mode, DrawMode::FillAndWireframe);
        assert_eq!(config.pipeline.background, Color::new(0.1, 0.1, 0.2));
        assert!(config.pipeline.shading);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for toml in [
            "[projection]\nfov_degrees = 0.0",
            "[projection]\nfov_degrees = 180.0",
            "[projection]\nz_near = 0.0",
            "[projection]\nz_near = 10.0\nz_far = 5.0",
            "[light]\ndirection = [0.0, 0.0, 0.0]",
        ] {
            assert!(
                matches!(RenderConfig::from_toml_str(toml), Err(ConfigError::Invalid(_))),
                "accepted {toml}"
            );
        }
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            RenderConfig::from_toml_str("[spin]\naxis = \"w\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_draw_mode_flags() {
        assert!(DrawMode::Fill.fills() && !DrawMode::Fill.strokes());
        assert!(!DrawMode::Wireframe.fills() && DrawMode::Wireframe.strokes());
        assert!(DrawMode::FillAndWireframe.fills() && DrawMode::FillAndWireframe.strokes());
    }
}
