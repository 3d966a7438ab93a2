/// The configurable transform, cull, shade and project pipeline
use tracing::{debug, info, trace};

use crate::config::{MeshSource, RenderConfig};
use crate::error::Error;
use crate::host::{RenderHost, Scene};
use crate::mesh::{Color, Mesh, Triangle};
use crate::obj;
use crate::projection::{Projection, ScreenTriangle};
use crate::shading::{classify, DirectionalLight, Visibility};
use crate::transform::{AnimationState, FrameTransform};
use crate::vector::Vec3;

/// Draw list for one frame, in mesh order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub triangles: Vec<ScreenTriangle>,
    pub culled: usize,
    pub degenerate: usize,
}

/// Renders one mesh spinning in front of a fixed camera
pub struct MeshRenderer {
    config: RenderConfig,
    camera: Vec3,
    light: DirectionalLight,
    animation: AnimationState,
    mesh: Option<Mesh>,
    projection: Option<Projection>,
}

impl MeshRenderer {
    /// The mesh is loaded from `config.mesh` in [`Scene::on_create`]
    pub fn new(config: RenderConfig) -> Self {
        Self {
            camera: config.camera_position(),
            light: DirectionalLight::new(config.light_direction()),
            config,
            animation: AnimationState::default(),
            mesh: None,
            projection: None,
        }
    }

    /// Use an already built mesh instead of `config.mesh`
    pub fn with_mesh(config: RenderConfig, mesh: Mesh) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn set_animation(&mut self, state: AnimationState) {
        self.animation = state;
    }

    /// Compute the draw list for the current animation state
    pub fn frame(&self) -> Result<Frame, Error> {
        let (Some(mesh), Some(projection)) = (&self.mesh, &self.projection) else {
            return Err(Error::NotCreated);
        };

        let transform = FrameTransform::new(&self.config.spin, &self.config.placement, self.animation);
        let mut frame = Frame {
            triangles: Vec::with_capacity(mesh.len()),
            ..Frame::default()
        };

        for triangle in mesh {
            let viewed = transform.apply(triangle);
            let normal = match classify(&viewed, &self.camera) {
                Visibility::Visible(normal) => normal,
                Visibility::BackFacing(normal) if !self.config.pipeline.cull_backfaces => normal,
                Visibility::BackFacing(_) => {
                    frame.culled += 1;
                    continue;
                }
                Visibility::Degenerate => {
                    frame.degenerate += 1;
                    continue;
                }
            };

            frame.triangles.push(projection.to_screen(&self.shade(viewed, &normal)));
        }

        Ok(frame)
    }

    fn shade(&self, mut triangle: Triangle, normal: &Vec3) -> Triangle {
        triangle.color = if self.config.pipeline.shading {
            self.light.shade(normal)
        } else {
            Color::WHITE
        };
        triangle
    }

    fn load_mesh(&self) -> Result<Mesh, Error> {
        match self.config.mesh.source() {
            MeshSource::File(path) => Ok(obj::load_mesh(path)?),
            MeshSource::UnitCube => {
                info!("No mesh file configured, using the unit cube");
                Ok(Mesh::unit_cube())
            }
        }
    }
}

impl Scene for MeshRenderer {
    fn on_create(&mut self, host: &dyn RenderHost) -> Result<(), Error> {
        if self.mesh.is_none() {
            self.mesh = Some(self.load_mesh()?);
        }

        let viewport = host.viewport();
        self.projection = Some(Projection::new(viewport, &self.config.projection));
        debug!("Projection built for {}x{}", viewport.width, viewport.height);
        Ok(())
    }

    fn on_update(&mut self, host: &mut dyn RenderHost, elapsed: f32) -> Result<(), Error> {
        let Some(projection) = &self.projection else {
            return Err(Error::NotCreated);
        };

        let viewport = host.viewport();
        if projection.viewport() != viewport {
            debug!("Viewport resized to {}x{}, rebuilding projection", viewport.width, viewport.height);
            self.projection = Some(Projection::new(viewport, &self.config.projection));
        }

        host.clear(self.config.pipeline.background);
        self.animation = self.animation.advance(self.config.spin.speed, elapsed);

        let frame = self.frame()?;
        let mode = self.config.pipeline.draw_mode;
        for triangle in &frame.triangles {
            if mode.fills() {
                host.fill_triangle(triangle);
            }
            if mode.strokes() {
                host.stroke_triangle(triangle);
            }
        }

        trace!(
            drawn = frame.triangles.len(),
            culled = frame.culled,
            degenerate = frame.degenerate,
            angle = self.animation.angle,
            "frame"
        );
        Ok(())
    }
}
