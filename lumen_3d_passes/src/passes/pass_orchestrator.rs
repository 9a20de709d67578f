/// Pass orchestrator - direct, filtered and shadow-mapped passes.
///
/// Owns one render target per logical pass (pixel filter, directional
/// shadow, point shadow) and the screen quad. Each pass threads the
/// `RenderContext` explicitly and returns a `PassOutput` describing what it
/// produced; nothing is remembered between passes.
///
/// Binding discipline:
/// - a target is unbound before any of its attachments is sampled
/// - the quad resolve owns texture units 0 and 1
/// - the shadow-shaded draw owns texture units 3 and 4

use std::rc::Rc;
use glam::{Mat4, Vec3};
use crate::camera::{Camera, CameraMatrices};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::graphics_device::{uniforms, ClearFlags, RenderContext, Shader, Viewport};
use crate::light::{Light, LightKind};
use crate::scene::{Categories, Scene};
use crate::target::RenderTarget;
use crate::{engine_debug, engine_info, engine_trace};
use super::screen_quad::{FilterMode, ScreenQuad};

/// Sampler unit of the directional shadow map in the shaded draw
pub const SHADOW_UNIT_DIRECTIONAL: u32 = 3;
/// Sampler unit of the point shadow map in the shaded draw
pub const SHADOW_UNIT_POINT: u32 = 4;

// ============================================================================
// Pass results
// ============================================================================

/// Selectable per-frame pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassKind {
    #[default]
    Normal,
    PixelFilter,
    ShadowMap,
}

/// Render target owned by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetSlot {
    PixelFilter,
    Directional,
    Point,
}

impl TargetSlot {
    /// Shadow target of a light kind
    pub fn for_light(kind: LightKind) -> Self {
        match kind {
            LightKind::Directional => TargetSlot::Directional,
            LightKind::Point => TargetSlot::Point,
        }
    }
}

/// Combined light-space matrices (projection * view) of one shadow pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowMatrices {
    pub directional: Mat4,
    pub point: Mat4,
}

impl Default for ShadowMatrices {
    fn default() -> Self {
        Self { directional: Mat4::IDENTITY, point: Mat4::IDENTITY }
    }
}

/// What a pass produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassOutput {
    pub kind: PassKind,
    /// Target holding the pass's intermediate result, for preview tooling
    pub preview: Option<TargetSlot>,
    /// Light matrices of a shadow pass
    pub shadow: Option<ShadowMatrices>,
}

// ============================================================================
// PassOrchestrator
// ============================================================================

pub struct PassOrchestrator {
    config: PipelineConfig,
    quad: ScreenQuad,
    pixel_filter: RenderTarget,
    directional: RenderTarget,
    point: RenderTarget,
    filter_mode: FilterMode,
    active_shader: Rc<dyn Shader>,
    shadow_shader: Rc<dyn Shader>,
    directional_light: Option<Rc<dyn Light>>,
    point_light: Option<Rc<dyn Light>>,
}

impl PassOrchestrator {
    /// Create the quad and the three targets
    ///
    /// Both shadow targets are sized immediately; the filter target is
    /// sized on its first pass.
    pub fn new(
        ctx: &mut RenderContext<'_>,
        config: PipelineConfig,
        quad_shader: Rc<dyn Shader>,
        active_shader: Rc<dyn Shader>,
        shadow_shader: Rc<dyn Shader>,
    ) -> Result<Self> {
        let quad = ScreenQuad::new(ctx, quad_shader, config.quad)?;
        let pixel_filter = RenderTarget::new(ctx)?;
        let mut directional = RenderTarget::new(ctx)?;
        let mut point = RenderTarget::new(ctx)?;

        let size = config.shadow_map_size;
        directional.resize(ctx, size, size)?;
        point.resize(ctx, size, size)?;

        engine_info!("lumen3d::PassOrchestrator",
            "Created pass targets (shadow maps {}x{})", size, size);

        Ok(Self {
            config,
            quad,
            pixel_filter,
            directional,
            point,
            filter_mode: FilterMode::default(),
            active_shader,
            shadow_shader,
            directional_light: None,
            point_light: None,
        })
    }

    // ===== CONFIGURATION =====

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter_mode = mode;
    }

    pub fn active_shader(&self) -> &Rc<dyn Shader> {
        &self.active_shader
    }

    pub fn set_active_shader(&mut self, shader: Rc<dyn Shader>) {
        self.active_shader = shader;
    }

    pub fn shadow_shader(&self) -> &Rc<dyn Shader> {
        &self.shadow_shader
    }

    /// Register `light` in the slot of its kind, replacing any previous one
    pub fn set_light(&mut self, light: Rc<dyn Light>) {
        match light.kind() {
            LightKind::Directional => self.directional_light = Some(light),
            LightKind::Point => self.point_light = Some(light),
        }
    }

    pub fn clear_light(&mut self, kind: LightKind) {
        match kind {
            LightKind::Directional => self.directional_light = None,
            LightKind::Point => self.point_light = None,
        }
    }

    pub fn light(&self, kind: LightKind) -> Option<&Rc<dyn Light>> {
        match kind {
            LightKind::Directional => self.directional_light.as_ref(),
            LightKind::Point => self.point_light.as_ref(),
        }
    }

    pub fn target(&self, slot: TargetSlot) -> &RenderTarget {
        match slot {
            TargetSlot::PixelFilter => &self.pixel_filter,
            TargetSlot::Directional => &self.directional,
            TargetSlot::Point => &self.point,
        }
    }

    fn target_mut(&mut self, slot: TargetSlot) -> &mut RenderTarget {
        match slot {
            TargetSlot::PixelFilter => &mut self.pixel_filter,
            TargetSlot::Directional => &mut self.directional,
            TargetSlot::Point => &mut self.point,
        }
    }

    // ===== CAMERA =====

    /// Write the main camera's eye, view and projection into the active shader
    pub fn upload_camera_uniforms(&self, ctx: &mut RenderContext<'_>, camera: &dyn Camera) {
        let shader = &self.active_shader;
        shader.use_program(ctx);
        write_camera(shader.as_ref(), ctx, camera);
        shader.unuse(ctx);
    }

    // ===== PASSES =====

    /// Run the pass selected by `kind`
    ///
    /// The direct pass draws everything.
    pub fn render_frame(
        &mut self,
        ctx: &mut RenderContext<'_>,
        kind: PassKind,
        scene: &mut dyn Scene,
        camera: &dyn Camera,
        width: u32,
        height: u32,
    ) -> Result<PassOutput> {
        self.upload_camera_uniforms(ctx, camera);
        match kind {
            PassKind::Normal => self.render_normal(ctx, scene, width, height, Categories::empty()),
            PassKind::PixelFilter => self.render_pixel_filter(ctx, scene, width, height),
            PassKind::ShadowMap => self.render_shadowmap(ctx, scene, camera, width, height),
        }
    }

    /// Direct pass into the current draw target
    pub fn render_normal(
        &self,
        ctx: &mut RenderContext<'_>,
        scene: &mut dyn Scene,
        width: u32,
        height: u32,
        exclude: Categories,
    ) -> Result<PassOutput> {
        draw_direct(ctx, scene, &self.active_shader, self.config.clear_color, width, height, exclude)?;
        Ok(PassOutput { kind: PassKind::Normal, preview: None, shadow: None })
    }

    /// Filtered pass
    ///
    /// Everything but light markers goes through the filter target and is
    /// resolved by the quad; light markers are drawn after the resolve,
    /// unfiltered.
    pub fn render_pixel_filter(
        &mut self,
        ctx: &mut RenderContext<'_>,
        scene: &mut dyn Scene,
        width: u32,
        height: u32,
    ) -> Result<PassOutput> {
        self.pixel_filter.resize(ctx, width, height)?;

        let target = &self.pixel_filter;
        target.bind(ctx);
        target.attach(ctx);
        let offscreen = draw_direct(
            ctx, scene, &self.active_shader, self.config.clear_color, width, height, Categories::LIGHT,
        );
        target.unbind(ctx);
        offscreen?;

        ctx.ensure_not_bound(target.framebuffer())?;
        self.quad.render(
            ctx,
            self.filter_mode,
            Some(target.color_attachment()),
            Some(target.depth_attachment()),
        )?;

        // Overlay after the resolve, otherwise the quad covers it
        scene.render(ctx, Categories::MODEL)?;

        engine_trace!("lumen3d::PassOrchestrator",
            "Pixel filter pass {}x{} ({:?})", width, height, self.filter_mode);
        Ok(PassOutput {
            kind: PassKind::PixelFilter,
            preview: Some(TargetSlot::PixelFilter),
            shadow: None,
        })
    }

    /// Shadow-mapped pass
    ///
    /// Captures one depth map per registered light, then draws the scene
    /// with the shadow shader sampling both maps. An absent light
    /// contributes an identity matrix.
    pub fn render_shadowmap(
        &mut self,
        ctx: &mut RenderContext<'_>,
        scene: &mut dyn Scene,
        camera: &dyn Camera,
        width: u32,
        height: u32,
    ) -> Result<PassOutput> {
        let matrices = ShadowMatrices {
            directional: self
                .depth_pass(ctx, scene, camera, LightKind::Directional)?
                .unwrap_or(Mat4::IDENTITY),
            point: self
                .depth_pass(ctx, scene, camera, LightKind::Point)?
                .unwrap_or(Mat4::IDENTITY),
        };

        ctx.ensure_not_bound(self.directional.framebuffer())?;
        ctx.ensure_not_bound(self.point.framebuffer())?;

        scene.set_shader(self.shadow_shader.clone());
        let shader = self.shadow_shader.as_ref();
        shader.use_program(ctx);
        write_camera(shader, ctx, camera);
        shader.set_uniform_4x4f(ctx, uniforms::SHADOW_PV_DIRECTIONAL, matrices.directional);
        shader.set_uniform_4x4f(ctx, uniforms::SHADOW_PV_POINT, matrices.point);

        ctx.bind_texture(SHADOW_UNIT_DIRECTIONAL, Some(self.directional.depth_attachment()));
        shader.set_uniform_1i(ctx, uniforms::SHADOW_TEX_DIRECTIONAL, SHADOW_UNIT_DIRECTIONAL as i32);
        ctx.bind_texture(SHADOW_UNIT_POINT, Some(self.point.depth_attachment()));
        shader.set_uniform_1i(ctx, uniforms::SHADOW_TEX_POINT, SHADOW_UNIT_POINT as i32);
        shader.unuse(ctx);

        ctx.set_viewport(Viewport::from_size(width, height));
        ctx.clear(self.config.clear_color, ClearFlags::COLOR | ClearFlags::DEPTH);
        let scene_scale = scene.root_scale();
        let shaded = scene
            .render(ctx, Categories::LIGHT)
            .and_then(|_| self.render_light_annotations(ctx, scene_scale));
        ctx.unbind_textures(&[SHADOW_UNIT_DIRECTIONAL, SHADOW_UNIT_POINT]);
        shaded?;

        Ok(PassOutput {
            kind: PassKind::ShadowMap,
            preview: Some(TargetSlot::Directional),
            shadow: Some(matrices),
        })
    }

    /// Depth capture for the light of `kind`
    ///
    /// Returns the light's projection * view, or `None` when no light of
    /// that kind is registered. The active shader's camera uniforms are
    /// restored to `camera` before returning.
    fn depth_pass(
        &mut self,
        ctx: &mut RenderContext<'_>,
        scene: &mut dyn Scene,
        camera: &dyn Camera,
        kind: LightKind,
    ) -> Result<Option<Mat4>> {
        let Some(light) = self.light(kind).cloned() else {
            return Ok(None);
        };
        let light_camera: CameraMatrices = light.camera(scene.root_scale());

        let slot = TargetSlot::for_light(kind);
        let size = self.config.shadow_map_size;
        self.target_mut(slot).resize(ctx, size, size)?;

        let target = self.target(slot);
        let shader = &self.active_shader;
        target.bind(ctx);

        shader.use_program(ctx);
        write_camera(shader.as_ref(), ctx, &light_camera);
        shader.unuse(ctx);

        let captured = draw_direct(
            ctx, scene, shader, self.config.clear_color, size, size, Categories::LIGHT,
        );

        shader.use_program(ctx);
        write_camera(shader.as_ref(), ctx, camera);
        shader.unuse(ctx);

        target.unbind(ctx);
        captured?;

        engine_debug!("lumen3d::PassOrchestrator", "Captured {:?} shadow map", kind);
        Ok(Some(light_camera.view_projection_matrix()))
    }

    fn render_light_annotations(&self, ctx: &mut RenderContext<'_>, scene_scale: Vec3) -> Result<()> {
        for light in [&self.directional_light, &self.point_light].into_iter().flatten() {
            light.render_annotation(ctx, scene_scale)?;
        }
        Ok(())
    }

    // ===== TEARDOWN =====

    /// Destroy the quad geometry and all three targets
    pub fn release(self, ctx: &mut RenderContext<'_>) {
        self.quad.release(ctx);
        self.pixel_filter.release(ctx);
        self.directional.release(ctx);
        self.point.release(ctx);
    }
}

/// Retarget the scene to `shader`, set the viewport, clear, and draw
fn draw_direct(
    ctx: &mut RenderContext<'_>,
    scene: &mut dyn Scene,
    shader: &Rc<dyn Shader>,
    clear_color: [f32; 4],
    width: u32,
    height: u32,
    exclude: Categories,
) -> Result<()> {
    scene.set_shader(shader.clone());
    ctx.set_viewport(Viewport::from_size(width, height));
    ctx.clear(clear_color, ClearFlags::COLOR | ClearFlags::DEPTH);
    scene.render(ctx, exclude)
}

/// Set `u_eye`, `u_v` and `u_p` on the program in use
fn write_camera(shader: &dyn Shader, ctx: &mut RenderContext<'_>, camera: &dyn Camera) {
    shader.set_uniform_3f(ctx, uniforms::EYE, camera.eye());
    shader.set_uniform_4x4f(ctx, uniforms::VIEW, camera.view_matrix());
    shader.set_uniform_4x4f(ctx, uniforms::PROJECTION, camera.projection_matrix());
}

#[cfg(test)]
#[path = "pass_orchestrator_tests.rs"]
mod tests;
