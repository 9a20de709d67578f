/// GraphicsDevice trait - immediate-mode graphics API seam
///
/// The pass pipeline issues every GPU call through this trait. Backends
/// (OpenGL via glow, the test mock) map the opaque handles below to their
/// native objects.

use slotmap::new_key_type;
use crate::error::Result;
use crate::graphics_device::{
    Attachment, BufferKind, ClearFlags, FramebufferStatus, PrimitiveTopology,
    TextureFormat, UniformValue,
};

new_key_type! {
    /// Handle to a 2D texture object
    pub struct TextureHandle;
    /// Handle to a framebuffer object
    pub struct FramebufferHandle;
    /// Handle to a vertex or index buffer
    pub struct BufferHandle;
    /// Handle to a linked shader program
    pub struct ProgramHandle;
}

/// Immediate-mode graphics device
///
/// All calls execute synchronously on the frame-render thread, in program
/// order. State set here (bound framebuffer, active texture unit, bound
/// program) is global to the device; `RenderContext` tracks it explicitly.
pub trait GraphicsDevice {
    // ===== TEXTURES =====

    /// Create an empty texture object (no storage yet)
    fn create_texture(&mut self) -> Result<TextureHandle>;

    /// (Re)allocate the storage of a texture at the given size and format
    ///
    /// Previous contents of that texture are discarded. Other textures are
    /// never affected.
    fn texture_storage_2d(
        &mut self,
        texture: TextureHandle,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Result<()>;

    /// Delete a texture object
    fn delete_texture(&mut self, texture: TextureHandle);

    /// Select the texture unit affected by subsequent `bind_texture()` calls
    fn active_texture(&mut self, unit: u32);

    /// Bind a texture (or nothing) to the active texture unit
    fn bind_texture(&mut self, texture: Option<TextureHandle>);

    // ===== FRAMEBUFFERS =====

    /// Create a framebuffer object with no attachments
    fn create_framebuffer(&mut self) -> Result<FramebufferHandle>;

    /// Delete a framebuffer object
    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle);

    /// Make a framebuffer (or the default target when `None`) the draw target
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>);

    /// Attach a texture level to a slot of the currently bound framebuffer
    fn framebuffer_texture_2d(
        &mut self,
        attachment: Attachment,
        texture: Option<TextureHandle>,
        level: u32,
    );

    /// Declare the color outputs of the currently bound framebuffer
    fn draw_buffers(&mut self, buffers: &[Attachment]);

    /// Check completeness of the currently bound framebuffer
    fn check_framebuffer_status(&mut self) -> FramebufferStatus;

    // ===== FRAME STATE =====

    /// Set the viewport rectangle in pixels
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Set the color used by subsequent color clears
    fn clear_color(&mut self, rgba: [f32; 4]);

    /// Clear buffers of the current draw target
    fn clear(&mut self, flags: ClearFlags);

    /// Synchronously read RGBA8 pixels of the current draw target
    ///
    /// Rows are written bottom-up, as the graphics API stores them.
    /// `out` must hold exactly `width * height * 4` bytes.
    fn read_pixels(&mut self, x: i32, y: i32, width: u32, height: u32, out: &mut [u8]) -> Result<()>;

    // ===== GEOMETRY =====

    /// Create a static buffer initialized with `data`
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> Result<BufferHandle>;

    /// Delete a buffer
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Draw `index_count` indices using the currently bound program
    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        index_count: u32,
    ) -> Result<()>;

    // ===== PROGRAMS =====

    /// Compile and link a shader program
    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ProgramHandle>;

    /// Delete a shader program
    fn delete_program(&mut self, program: ProgramHandle);

    /// Bind a program (or nothing) for subsequent draws and uniform updates
    fn use_program(&mut self, program: Option<ProgramHandle>);

    /// Set a uniform of `program` by name
    ///
    /// Unknown uniform names are ignored, as the graphics API does for
    /// inactive uniforms.
    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue);
}
