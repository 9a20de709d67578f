/// Screen quad - full-screen geometry applying a post filter.
///
/// A `StaticMesh` configured with the fixed unit quad plus the uniform
/// wiring of a resolve. Samples the color texture on unit 0 and the depth
/// texture on unit 1.

use std::rc::Rc;
use glam::Vec3;
use crate::config::QuadSettings;
use crate::error::Result;
use crate::graphics_device::{uniforms, PrimitiveTopology, RenderContext, Shader, TextureHandle};
use crate::scene::StaticMesh;

pub const COLOR_UNIT: u32 = 0;
pub const DEPTH_UNIT: u32 = 1;

const QUAD_POSITIONS: [Vec3; 4] = [
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Post-process transform applied by the quad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    #[default]
    Passthrough = 0,
    /// Sobel edge filter
    Sobel = 1,
    /// Linearized depth visualization
    Depth = 2,
}

impl FilterMode {
    /// Value of the `filter_mode` uniform
    pub fn as_uniform(self) -> i32 {
        self as i32
    }
}

pub struct ScreenQuad {
    mesh: StaticMesh,
    shader: Rc<dyn Shader>,
    settings: QuadSettings,
}

impl ScreenQuad {
    /// Upload the quad geometry
    pub fn new(
        ctx: &mut RenderContext<'_>,
        shader: Rc<dyn Shader>,
        settings: QuadSettings,
    ) -> Result<Self> {
        let mesh = StaticMesh::new(ctx, &QUAD_POSITIONS, &QUAD_INDICES, PrimitiveTopology::Triangles)?;
        Ok(Self { mesh, shader, settings })
    }

    /// Draw the quad sampling `color` and `depth`
    ///
    /// A missing texture clears its unit for the draw. Units 0 and 1 are always
    /// unbound on return, including when the draw fails.
    pub fn render(
        &self,
        ctx: &mut RenderContext<'_>,
        filter_mode: FilterMode,
        color: Option<TextureHandle>,
        depth: Option<TextureHandle>,
    ) -> Result<()> {
        let shader = &self.shader;
        shader.use_program(ctx);

        shader.set_uniform_1i(ctx, uniforms::FILTER_MODE, filter_mode.as_uniform());
        shader.set_uniform_1f(ctx, uniforms::DEPTH_SCALING, self.settings.depth_scaling);
        shader.set_uniform_1f(ctx, uniforms::NEAR, self.settings.near);
        shader.set_uniform_1f(ctx, uniforms::FAR, self.settings.far);
        shader.set_uniform_1i(ctx, uniforms::COLOR_TEXTURE, COLOR_UNIT as i32);
        shader.set_uniform_1i(ctx, uniforms::DEPTH_TEXTURE, DEPTH_UNIT as i32);

        ctx.bind_texture(COLOR_UNIT, color);
        ctx.bind_texture(DEPTH_UNIT, depth);

        let result = self.mesh.draw(ctx);

        shader.unuse(ctx);
        ctx.unbind_textures(&[COLOR_UNIT, DEPTH_UNIT]);
        result
    }

    /// Delete the quad geometry
    pub fn release(self, ctx: &mut RenderContext<'_>) {
        self.mesh.release(ctx);
    }
}

#[cfg(test)]
#[path = "screen_quad_tests.rs"]
mod tests;
