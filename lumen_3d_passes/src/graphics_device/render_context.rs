//! Explicit binding context threaded through every pass.
//!
//! The graphics API keeps the current draw framebuffer, the texture bound
//! to each sampler unit, and the bound program as ambient global state.
//! `RenderContext` wraps the device and mirrors that state so passes can
//! assert and restore it at pass boundaries.

use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::graphics_device::{
    ClearFlags, FramebufferHandle, GraphicsDevice, ProgramHandle, TextureHandle, Viewport,
};

/// Binding context for one graphics device
///
/// Create one per device and keep it for the whole session: it is the
/// single place that knows which target is bound and which sampler units
/// are occupied.
pub struct RenderContext<'d> {
    device: &'d mut dyn GraphicsDevice,
    /// Current draw target (`None` = default on-screen target)
    bound_framebuffer: Option<FramebufferHandle>,
    /// Texture bound per sampler unit (absent = nothing bound)
    texture_units: FxHashMap<u32, TextureHandle>,
    active_program: Option<ProgramHandle>,
    viewport: Option<Viewport>,
}

impl<'d> RenderContext<'d> {
    /// Wrap a device whose state is the API default (nothing bound)
    pub fn new(device: &'d mut dyn GraphicsDevice) -> Self {
        Self {
            device,
            bound_framebuffer: None,
            texture_units: FxHashMap::default(),
            active_program: None,
            viewport: None,
        }
    }

    /// Raw device access for calls that do not change tracked state
    pub fn device(&mut self) -> &mut (dyn GraphicsDevice + 'd) {
        &mut *self.device
    }

    // ===== DRAW TARGET =====

    /// Make `framebuffer` the current draw target (`None` = default target)
    ///
    /// Binding the already bound target re-binds harmlessly.
    pub fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        self.device.bind_framebuffer(framebuffer);
        self.bound_framebuffer = framebuffer;
    }

    /// Current draw target (`None` = default target)
    pub fn bound_framebuffer(&self) -> Option<FramebufferHandle> {
        self.bound_framebuffer
    }

    /// Fail if `framebuffer` is still the current draw target
    ///
    /// Must be called before sampling any attachment of that framebuffer.
    pub fn ensure_not_bound(&self, framebuffer: FramebufferHandle) -> Result<()> {
        if self.bound_framebuffer == Some(framebuffer) {
            crate::engine_error!("lumen3d::RenderContext",
                "Render target sampled while still bound as draw target");
            return Err(Error::InvalidState(
                "render target is still bound as the active draw target".to_string(),
            ));
        }
        Ok(())
    }

    /// Delete a framebuffer, falling back to the default target if it was bound
    pub fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        if self.bound_framebuffer == Some(framebuffer) {
            self.bind_framebuffer(None);
        }
        self.device.delete_framebuffer(framebuffer);
    }

    // ===== TEXTURE UNITS =====

    /// Bind `texture` (or nothing) to sampler `unit`
    pub fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>) {
        self.device.active_texture(unit);
        self.device.bind_texture(texture);
        match texture {
            Some(texture) => {
                self.texture_units.insert(unit, texture);
            }
            None => {
                self.texture_units.remove(&unit);
            }
        }
    }

    /// Texture bound to sampler `unit`, if any
    pub fn texture_binding(&self, unit: u32) -> Option<TextureHandle> {
        self.texture_units.get(&unit).copied()
    }

    /// Explicitly unbind every listed sampler unit
    pub fn unbind_textures(&mut self, units: &[u32]) {
        for &unit in units {
            self.bind_texture(unit, None);
        }
    }

    /// Delete a texture, dropping it from any sampler unit first
    pub fn delete_texture(&mut self, texture: TextureHandle) {
        let units: Vec<u32> = self
            .texture_units
            .iter()
            .filter(|(_, bound)| **bound == texture)
            .map(|(unit, _)| *unit)
            .collect();
        self.unbind_textures(&units);
        self.device.delete_texture(texture);
    }

    // ===== PROGRAMS =====

    /// Bind a program (or nothing)
    pub fn use_program(&mut self, program: Option<ProgramHandle>) {
        self.device.use_program(program);
        self.active_program = program;
    }

    /// Currently bound program
    pub fn active_program(&self) -> Option<ProgramHandle> {
        self.active_program
    }

    // ===== FRAME STATE =====

    /// Set the viewport
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.device.viewport(viewport.x, viewport.y, viewport.width, viewport.height);
        self.viewport = Some(viewport);
    }

    /// Last viewport set through this context
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Clear the current draw target
    pub fn clear(&mut self, color: [f32; 4], flags: ClearFlags) {
        self.device.clear_color(color);
        self.device.clear(flags);
    }
}

#[cfg(test)]
#[path = "render_context_tests.rs"]
mod tests;
