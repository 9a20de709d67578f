/// Lights that cast shadows.
///
/// Each light provides its own camera model; shadow passes render the
/// scene through it. Cameras are parameterized by the uniform scale of the
/// scene root so the shadow frustum tracks the world size of the scene.

use std::rc::Rc;
use glam::{Mat4, Vec3};
use crate::camera::CameraMatrices;
use crate::error::Result;
use crate::graphics_device::{uniforms, RenderContext, Shader};
use crate::scene::StaticMesh;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    Directional,
    Point,
}

/// Light collaborator consumed by the shadow pass
pub trait Light {
    fn kind(&self) -> LightKind;

    /// Light-space camera for a scene with the given root scale
    fn camera(&self, scene_scale: Vec3) -> CameraMatrices;

    /// Draw the light's own visual annotation into the current target
    ///
    /// `scene_scale` is the same root scale its camera was built from, so
    /// the annotation sits where the shadow camera does.
    fn render_annotation(&self, _ctx: &mut RenderContext<'_>, _scene_scale: Vec3) -> Result<()> {
        Ok(())
    }
}

/// Annotation geometry drawn at a light's position
#[derive(Clone)]
pub struct LightMarker {
    pub mesh: Rc<StaticMesh>,
    pub shader: Rc<dyn Shader>,
}

impl LightMarker {
    pub fn new(mesh: Rc<StaticMesh>, shader: Rc<dyn Shader>) -> Self {
        Self { mesh, shader }
    }

    fn draw_at(&self, ctx: &mut RenderContext<'_>, position: Vec3) -> Result<()> {
        self.shader.use_program(ctx);
        self.shader.set_uniform_4x4f(ctx, uniforms::MODEL, Mat4::from_translation(position));
        let result = self.mesh.draw(ctx);
        self.shader.unuse(ctx);
        result
    }
}

fn uniform_scale(scene_scale: Vec3) -> f32 {
    let s = scene_scale.max_element();
    if s > 0.0 { s } else { 1.0 }
}

// ============================================================================
// DirectionalLight
// ============================================================================

/// Sun-like light shining along `direction` towards the origin
#[derive(Clone)]
pub struct DirectionalLight {
    pub direction: Vec3,
    /// Distance of the light camera from the origin at scene scale 1
    pub distance: f32,
    /// Half size of the orthographic shadow frustum at scene scale 1
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
    pub marker: Option<LightMarker>,
}

impl DirectionalLight {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction,
            distance: 10.0,
            half_extent: 5.0,
            near: 0.1,
            far: 30.0,
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: LightMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// World-space eye of the light camera
    pub fn eye(&self, scene_scale: Vec3) -> Vec3 {
        -self.direction.normalize_or_zero() * self.distance * uniform_scale(scene_scale)
    }
}

impl Light for DirectionalLight {
    fn kind(&self) -> LightKind {
        LightKind::Directional
    }

    fn camera(&self, scene_scale: Vec3) -> CameraMatrices {
        let s = uniform_scale(scene_scale);
        CameraMatrices::look_at_orthographic(
            self.eye(scene_scale),
            Vec3::ZERO,
            self.half_extent * s,
            self.near * s,
            self.far * s,
        )
    }

    fn render_annotation(&self, ctx: &mut RenderContext<'_>, scene_scale: Vec3) -> Result<()> {
        match &self.marker {
            Some(marker) => marker.draw_at(ctx, self.eye(scene_scale)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// PointLight
// ============================================================================

/// Positional light; its shadow camera looks at the origin
#[derive(Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
    pub marker: Option<LightMarker>,
}

impl PointLight {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            fov_y_radians: 90f32.to_radians(),
            near: 0.1,
            far: 50.0,
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: LightMarker) -> Self {
        self.marker = Some(marker);
        self
    }
}

impl Light for PointLight {
    fn kind(&self) -> LightKind {
        LightKind::Point
    }

    fn camera(&self, scene_scale: Vec3) -> CameraMatrices {
        let s = uniform_scale(scene_scale);
        CameraMatrices::look_at_perspective(
            self.position,
            Vec3::ZERO,
            self.fov_y_radians,
            1.0,
            self.near * s,
            self.far * s,
        )
    }

    /// The position is absolute, so the marker ignores the scene scale
    fn render_annotation(&self, ctx: &mut RenderContext<'_>, _scene_scale: Vec3) -> Result<()> {
        match &self.marker {
            Some(marker) => marker.draw_at(ctx, self.position),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
