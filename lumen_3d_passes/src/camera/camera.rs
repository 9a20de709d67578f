/// Camera - eye position plus view and projection matrices.
///
/// `CameraMatrices` is a passive data container: it computes nothing
/// after construction. The constructors are helpers for the common
/// look-at cases used by light cameras.

use glam::{Mat4, Vec3};

/// Camera collaborator consumed by the passes
pub trait Camera {
    /// World-space eye position
    fn eye(&self) -> Vec3;

    /// View matrix (world to eye space)
    fn view_matrix(&self) -> Mat4;

    /// Projection matrix (eye to clip space)
    fn projection_matrix(&self) -> Mat4;

    /// Combined matrix (projection * view)
    fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Low-level camera. A passive data container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    eye: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl CameraMatrices {
    /// Create a camera from precomputed matrices
    pub fn new(eye: Vec3, view: Mat4, projection: Mat4) -> Self {
        Self { eye, view, projection }
    }

    /// Perspective camera at `eye` looking at `target`
    pub fn look_at_perspective(
        eye: Vec3,
        target: Vec3,
        fov_y_radians: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let view = Mat4::look_at_rh(eye, target, up_for(target - eye));
        let projection = Mat4::perspective_rh_gl(fov_y_radians, aspect, near, far);
        Self { eye, view, projection }
    }

    /// Orthographic camera at `eye` looking at `target`,
    /// covering `[-half_extent, half_extent]` on both axes
    pub fn look_at_orthographic(
        eye: Vec3,
        target: Vec3,
        half_extent: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let view = Mat4::look_at_rh(eye, target, up_for(target - eye));
        let projection = Mat4::orthographic_rh_gl(
            -half_extent, half_extent,
            -half_extent, half_extent,
            near, far,
        );
        Self { eye, view, projection }
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
    }

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }
}

impl Camera for CameraMatrices {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn view_matrix(&self) -> Mat4 {
        self.view
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection
    }
}

/// Up vector that is never parallel to the viewing direction
fn up_for(direction: Vec3) -> Vec3 {
    let direction = direction.normalize_or_zero();
    if direction.y.abs() > 0.99 {
        Vec3::Z
    } else {
        Vec3::Y
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
