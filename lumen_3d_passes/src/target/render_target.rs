/// Render target - framebuffer with a color and a depth attachment.
///
/// Created empty; `resize()` allocates both attachments at the requested
/// size and verifies completeness. The framebuffer and both textures are
/// owned exclusively and destroyed together by `release()`.

use std::path::Path;
use crate::error::{Error, IncompleteReason, Result};
use crate::graphics_device::{
    Attachment, FramebufferHandle, RenderContext, TextureFormat, TextureHandle,
};
use crate::{engine_debug, engine_err, engine_error};

#[derive(Debug)]
pub struct RenderTarget {
    framebuffer: FramebufferHandle,
    color: TextureHandle,
    depth: TextureHandle,
    /// `None` until the first successful resize
    size: Option<(u32, u32)>,
}

impl RenderTarget {
    /// Create the framebuffer and both (unallocated) attachments
    pub fn new(ctx: &mut RenderContext<'_>) -> Result<Self> {
        let framebuffer = ctx.device().create_framebuffer()?;
        let color = match ctx.device().create_texture() {
            Ok(texture) => texture,
            Err(e) => {
                ctx.delete_framebuffer(framebuffer);
                return Err(e);
            }
        };
        let depth = match ctx.device().create_texture() {
            Ok(texture) => texture,
            Err(e) => {
                ctx.delete_texture(color);
                ctx.delete_framebuffer(framebuffer);
                return Err(e);
            }
        };

        Ok(Self { framebuffer, color, depth, size: None })
    }

    // ===== RESIZE =====

    /// Allocate both attachments at `width` x `height` and verify completeness
    ///
    /// Leaves the default target bound. A no-op when the size is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::FramebufferIncomplete` with the failing reason.
    /// Zero-sized requests are rejected before touching the attachments.
    pub fn resize(&mut self, ctx: &mut RenderContext<'_>, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            engine_error!("lumen3d::RenderTarget",
                "Rejected degenerate resize to {}x{}", width, height);
            return Err(Error::FramebufferIncomplete(IncompleteReason::DimensionMismatch));
        }
        if self.size == Some((width, height)) {
            return Ok(());
        }

        // Invalid until the completeness check passes
        self.size = None;

        ctx.device().texture_storage_2d(self.color, width, height, TextureFormat::Rgba8Unorm)?;
        ctx.device().texture_storage_2d(self.depth, width, height, TextureFormat::Depth32Float)?;

        ctx.bind_framebuffer(Some(self.framebuffer));
        self.attach(ctx);
        ctx.device().draw_buffers(&[Attachment::Color0]);
        let status = ctx.device().check_framebuffer_status();
        ctx.bind_framebuffer(None);

        if let Err(e) = status.into_result() {
            engine_error!("lumen3d::RenderTarget",
                "Resize to {}x{} failed: {}", width, height, e);
            return Err(e);
        }

        self.size = Some((width, height));
        engine_debug!("lumen3d::RenderTarget", "Resized to {}x{}", width, height);
        Ok(())
    }

    /// Attach both textures (level 0) to the currently bound framebuffer
    pub fn attach(&self, ctx: &mut RenderContext<'_>) {
        ctx.device().framebuffer_texture_2d(Attachment::Color0, Some(self.color), 0);
        ctx.device().framebuffer_texture_2d(Attachment::Depth, Some(self.depth), 0);
    }

    // ===== BINDING =====

    /// Make this target the current draw destination
    pub fn bind(&self, ctx: &mut RenderContext<'_>) {
        ctx.bind_framebuffer(Some(self.framebuffer));
    }

    /// Make the default target the current draw destination
    ///
    /// Always restores the default target, never a target that was bound
    /// before `bind()`. Binds do not nest.
    pub fn unbind(&self, ctx: &mut RenderContext<'_>) {
        ctx.bind_framebuffer(None);
    }

    pub fn is_bound(&self, ctx: &RenderContext<'_>) -> bool {
        ctx.bound_framebuffer() == Some(self.framebuffer)
    }

    // ===== ACCESSORS =====

    pub fn color_attachment(&self) -> TextureHandle {
        self.color
    }

    pub fn depth_attachment(&self) -> TextureHandle {
        self.depth
    }

    pub fn framebuffer(&self) -> FramebufferHandle {
        self.framebuffer
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn width(&self) -> Option<u32> {
        self.size.map(|(w, _)| w)
    }

    pub fn height(&self) -> Option<u32> {
        self.size.map(|(_, h)| h)
    }

    pub fn is_sized(&self) -> bool {
        self.size.is_some()
    }

    // ===== READBACK =====

    /// Copy the color attachment into a top-down RGBA8 buffer
    ///
    /// Returns `Ok(None)` if the target has never been sized. The previous
    /// draw target is restored afterwards.
    pub fn read_pixels(&self, ctx: &mut RenderContext<'_>) -> Result<Option<Vec<u8>>> {
        let Some((width, height)) = self.size else {
            return Ok(None);
        };

        let previous = ctx.bound_framebuffer();
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        ctx.bind_framebuffer(Some(self.framebuffer));
        let result = ctx.device().read_pixels(0, 0, width, height, &mut pixels);
        ctx.bind_framebuffer(previous);
        result?;

        Ok(Some(flip_rows(&pixels, width as usize * 4)))
    }

    /// Color attachment as an image, `Ok(None)` if never sized
    pub fn to_image(&self, ctx: &mut RenderContext<'_>) -> Result<Option<image::RgbaImage>> {
        let Some(pixels) = self.read_pixels(ctx)? else {
            return Ok(None);
        };
        let (width, height) = (self.width().unwrap_or(0), self.height().unwrap_or(0));
        image::RgbaImage::from_raw(width, height, pixels)
            .map(Some)
            .ok_or_else(|| Error::InvalidState(format!(
                "readback does not fit a {}x{} image", width, height
            )))
    }

    /// Write the color attachment to a PNG file
    ///
    /// Returns `Ok(false)` without writing if the target has never been sized.
    pub fn save_png(&self, ctx: &mut RenderContext<'_>, path: impl AsRef<Path>) -> Result<bool> {
        let Some(image) = self.to_image(ctx)? else {
            return Ok(false);
        };
        let path = path.as_ref();
        image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| engine_err!("lumen3d::RenderTarget",
                "Failed to write '{}': {}", path.display(), e))?;
        Ok(true)
    }

    // ===== TEARDOWN =====

    /// Destroy the framebuffer and both attachments
    pub fn release(self, ctx: &mut RenderContext<'_>) {
        ctx.delete_framebuffer(self.framebuffer);
        ctx.delete_texture(self.color);
        ctx.delete_texture(self.depth);
    }
}

/// Reverse row order (bottom-up readback to top-down)
fn flip_rows(pixels: &[u8], row_bytes: usize) -> Vec<u8> {
    pixels
        .chunks_exact(row_bytes)
        .rev()
        .flatten()
        .copied()
        .collect()
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
