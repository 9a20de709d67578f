/// DrawList - a flat list of drawables implementing `Scene`.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. All drawables
/// share the scene-wide shader set by `set_shader()`; each drawable's model
/// matrix is `root_transform * transform`, uploaded as `u_m`.

use std::rc::Rc;
use glam::Mat4;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{uniforms, RenderContext, Shader};
use super::category::{Categories, DrawableCategory};
use super::scene::Scene;
use super::static_mesh::StaticMesh;

new_key_type! {
    /// Stable key of a drawable inside a `DrawList`
    pub struct DrawableKey;
}

/// One drawable: shared geometry placed in the scene
#[derive(Debug, Clone)]
pub struct Drawable {
    pub category: DrawableCategory,
    pub mesh: Rc<StaticMesh>,
    pub transform: Mat4,
}

impl Drawable {
    pub fn new(category: DrawableCategory, mesh: Rc<StaticMesh>, transform: Mat4) -> Self {
        Self { category, mesh, transform }
    }
}

pub struct DrawList {
    drawables: SlotMap<DrawableKey, Drawable>,
    root_transform: Mat4,
    shader: Option<Rc<dyn Shader>>,
}

impl DrawList {
    /// Create an empty draw list with an identity root transform
    pub fn new() -> Self {
        Self {
            drawables: SlotMap::with_key(),
            root_transform: Mat4::IDENTITY,
            shader: None,
        }
    }

    pub fn add(&mut self, drawable: Drawable) -> DrawableKey {
        self.drawables.insert(drawable)
    }

    pub fn remove(&mut self, key: DrawableKey) -> Option<Drawable> {
        self.drawables.remove(key)
    }

    pub fn drawable(&self, key: DrawableKey) -> Option<&Drawable> {
        self.drawables.get(key)
    }

    pub fn drawable_mut(&mut self, key: DrawableKey) -> Option<&mut Drawable> {
        self.drawables.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn set_root_transform(&mut self, transform: Mat4) {
        self.root_transform = transform;
    }

    /// Shader currently used by all drawables
    pub fn shader(&self) -> Option<&Rc<dyn Shader>> {
        self.shader.as_ref()
    }

    fn draw_filtered(
        &self,
        ctx: &mut RenderContext<'_>,
        shader: &Rc<dyn Shader>,
        exclude: Categories,
    ) -> Result<u32> {
        let mut drawn = 0;
        for drawable in self.drawables.values() {
            if drawable.category.is_excluded_by(exclude) {
                continue;
            }
            shader.set_uniform_4x4f(ctx, uniforms::MODEL, self.root_transform * drawable.transform);
            drawable.mesh.draw(ctx)?;
            drawn += 1;
        }
        Ok(drawn)
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for DrawList {
    fn set_shader(&mut self, shader: Rc<dyn Shader>) {
        self.shader = Some(shader);
    }

    fn render(&self, ctx: &mut RenderContext<'_>, exclude: Categories) -> Result<()> {
        let Some(shader) = self.shader.as_ref() else {
            if self.drawables.values().any(|d| !d.category.is_excluded_by(exclude)) {
                engine_bail!("lumen3d::DrawList", "render() called before set_shader()");
            }
            return Ok(());
        };

        shader.use_program(ctx);
        let result = self.draw_filtered(ctx, shader, exclude);
        shader.unuse(ctx);

        let drawn = result?;
        crate::engine_trace!("lumen3d::DrawList",
            "Drew {} of {} drawables (excluded {:?})", drawn, self.drawables.len(), exclude);
        Ok(())
    }

    fn root_transform(&self) -> Mat4 {
        self.root_transform
    }
}

#[cfg(test)]
#[path = "draw_list_tests.rs"]
mod tests;
