//! Shader program seam: scoped activation and typed uniform setters by name.

use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::graphics_device::{ProgramHandle, RenderContext};

/// Uniform names shared between the passes and their programs
pub mod uniforms {
    pub const FILTER_MODE: &str = "filter_mode";
    pub const DEPTH_SCALING: &str = "depth_scaling";
    pub const NEAR: &str = "near";
    pub const FAR: &str = "far";
    pub const COLOR_TEXTURE: &str = "color_texture";
    pub const DEPTH_TEXTURE: &str = "depth_texture";
    pub const EYE: &str = "u_eye";
    pub const VIEW: &str = "u_v";
    pub const PROJECTION: &str = "u_p";
    pub const MODEL: &str = "u_m";
    pub const SHADOW_PV_DIRECTIONAL: &str = "u_shadow_pv_directional";
    pub const SHADOW_PV_POINT: &str = "u_shadow_pv_point";
    pub const SHADOW_TEX_DIRECTIONAL: &str = "u_shadow_tex_directional";
    pub const SHADOW_TEX_POINT: &str = "u_shadow_tex_point";
}

/// Value of a single uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

/// Shader program collaborator
///
/// `use_program()` / `unuse()` scope the activation; uniforms are set by
/// name on this program.
pub trait Shader {
    /// Debug name of the program
    fn name(&self) -> &str;

    /// Activate this program
    fn use_program(&self, ctx: &mut RenderContext<'_>);

    /// Deactivate this program
    fn unuse(&self, ctx: &mut RenderContext<'_>);

    /// Set a uniform by name
    fn set_uniform(&self, ctx: &mut RenderContext<'_>, name: &str, value: UniformValue);

    fn set_uniform_1i(&self, ctx: &mut RenderContext<'_>, name: &str, value: i32) {
        self.set_uniform(ctx, name, UniformValue::Int(value));
    }

    fn set_uniform_1f(&self, ctx: &mut RenderContext<'_>, name: &str, value: f32) {
        self.set_uniform(ctx, name, UniformValue::Float(value));
    }

    fn set_uniform_3f(&self, ctx: &mut RenderContext<'_>, name: &str, value: Vec3) {
        self.set_uniform(ctx, name, UniformValue::Vec3(value));
    }

    fn set_uniform_4x4f(&self, ctx: &mut RenderContext<'_>, name: &str, value: Mat4) {
        self.set_uniform(ctx, name, UniformValue::Mat4(value));
    }
}

/// Shader backed by a linked device program
#[derive(Debug)]
pub struct ShaderProgram {
    program: ProgramHandle,
    name: String,
}

impl ShaderProgram {
    /// Compile and link a program from GLSL sources
    pub fn new(
        ctx: &mut RenderContext<'_>,
        name: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self> {
        let program = ctx.device().create_program(vertex_source, fragment_source)?;
        crate::engine_debug!("lumen3d::ShaderProgram", "Linked program '{}'", name);
        Ok(Self { program, name: name.to_string() })
    }

    /// Device program handle
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Delete the device program
    pub fn release(self, ctx: &mut RenderContext<'_>) {
        if ctx.active_program() == Some(self.program) {
            ctx.use_program(None);
        }
        ctx.device().delete_program(self.program);
    }
}

impl Shader for ShaderProgram {
    fn name(&self) -> &str {
        &self.name
    }

    fn use_program(&self, ctx: &mut RenderContext<'_>) {
        ctx.use_program(Some(self.program));
    }

    fn unuse(&self, ctx: &mut RenderContext<'_>) {
        ctx.use_program(None);
    }

    fn set_uniform(&self, ctx: &mut RenderContext<'_>, name: &str, value: UniformValue) {
        ctx.device().set_uniform(self.program, name, value);
    }
}
