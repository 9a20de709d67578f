/// Scene collaborator seam used by every pass.

use std::rc::Rc;
use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::graphics_device::{RenderContext, Shader};
use super::category::Categories;

/// A renderable scene
pub trait Scene {
    /// Retarget all drawables to `shader`
    fn set_shader(&mut self, shader: Rc<dyn Shader>);

    /// Draw every drawable whose category is not in `exclude`
    /// into the current draw target
    fn render(&self, ctx: &mut RenderContext<'_>, exclude: Categories) -> Result<()>;

    /// Transform of the scene root
    fn root_transform(&self) -> Mat4;

    /// Scale component of the root transform
    ///
    /// Light cameras are parameterized by it so shadow frusta track the
    /// world size of the scene.
    fn root_scale(&self) -> Vec3 {
        let (scale, _, _) = self.root_transform().to_scale_rotation_translation();
        scale
    }
}
