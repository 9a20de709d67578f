/// Mock graphics device for unit tests (no GPU required)
///
/// Keeps textures, framebuffers, buffers, and programs in CPU memory,
/// applies real completeness rules, stores pixels for clear/readback,
/// and records every call so tests can assert ordering.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::error::Result;
use crate::{engine_bail, engine_init_err};
use crate::graphics_device::{
    Attachment, BufferHandle, BufferKind, ClearFlags, FramebufferHandle, FramebufferStatus,
    GraphicsDevice, PrimitiveTopology, ProgramHandle, TextureFormat, TextureHandle, UniformValue,
};

// ============================================================================
// Mock resources
// ============================================================================

#[derive(Debug, Default)]
pub struct MockTexture {
    pub width: u32,
    pub height: u32,
    /// `None` until the first `texture_storage_2d()`
    pub format: Option<TextureFormat>,
    /// Texel bytes, rows stored bottom-up
    pub data: Vec<u8>,
    /// Number of storage (re)allocations
    pub allocations: u32,
}

impl MockTexture {
    /// RGBA8 texel at (x, y), y counted from the bottom row
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * self.width + x) * 4) as usize;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }
}

#[derive(Debug, Default)]
pub struct MockFramebuffer {
    pub attachments: FxHashMap<Attachment, TextureHandle>,
    pub draw_buffers: Vec<Attachment>,
}

#[derive(Debug)]
pub struct MockBuffer {
    pub kind: BufferKind,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MockProgram {
    pub vertex_source: String,
    pub fragment_source: String,
    pub uniforms: FxHashMap<String, UniformValue>,
}

/// One recorded `draw_indexed()` call with the state it observed
#[derive(Debug, Clone)]
pub struct MockDrawCall {
    pub program: Option<ProgramHandle>,
    pub framebuffer: Option<FramebufferHandle>,
    pub topology: PrimitiveTopology,
    pub index_count: u32,
    pub texture_units: FxHashMap<u32, TextureHandle>,
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

#[derive(Debug, Default)]
pub struct MockGraphicsDevice {
    pub commands: Vec<String>,
    pub textures: SlotMap<TextureHandle, MockTexture>,
    pub framebuffers: SlotMap<FramebufferHandle, MockFramebuffer>,
    pub buffers: SlotMap<BufferHandle, MockBuffer>,
    pub programs: SlotMap<ProgramHandle, MockProgram>,
    pub bound_framebuffer: Option<FramebufferHandle>,
    pub active_unit: u32,
    pub texture_units: FxHashMap<u32, TextureHandle>,
    pub current_program: Option<ProgramHandle>,
    pub viewport: (i32, i32, u32, u32),
    pub clear_color: [f32; 4],
    pub draws: Vec<MockDrawCall>,
    /// Every uniform write in call order
    pub uniform_log: Vec<(ProgramHandle, String, UniformValue)>,
    /// When set, `check_framebuffer_status()` reports this for non-default targets
    pub forced_status: Option<FramebufferStatus>,
    /// When set, every `create_*()` call fails
    pub fail_creation: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded calls with this name
    pub fn command_count(&self, name: &str) -> usize {
        self.commands.iter().filter(|c| c.as_str() == name).count()
    }

    /// Current value of a program uniform
    pub fn uniform(&self, program: ProgramHandle, name: &str) -> Option<UniformValue> {
        self.programs.get(program)?.uniforms.get(name).copied()
    }

    /// Write one RGBA8 texel, y counted from the bottom row
    pub fn write_pixel(&mut self, texture: TextureHandle, x: u32, y: u32, rgba: [u8; 4]) {
        let tex = &mut self.textures[texture];
        let offset = ((y * tex.width + x) * 4) as usize;
        tex.data[offset..offset + 4].copy_from_slice(&rgba);
    }

    fn evaluate_status(&self, framebuffer: FramebufferHandle) -> FramebufferStatus {
        let fb = match self.framebuffers.get(framebuffer) {
            Some(fb) => fb,
            None => return FramebufferStatus::Unsupported,
        };
        if fb.attachments.is_empty() {
            return FramebufferStatus::MissingAttachment;
        }

        let mut size = None;
        for (attachment, texture) in &fb.attachments {
            let tex = match self.textures.get(*texture) {
                Some(tex) => tex,
                None => return FramebufferStatus::IncompleteAttachment,
            };
            let format = match tex.format {
                Some(format) => format,
                None => return FramebufferStatus::IncompleteAttachment,
            };
            let format_ok = match attachment {
                Attachment::Color0 => !format.is_depth(),
                Attachment::Depth => format.is_depth(),
            };
            if !format_ok || tex.width == 0 || tex.height == 0 {
                return FramebufferStatus::IncompleteAttachment;
            }
            match size {
                None => size = Some((tex.width, tex.height)),
                Some(existing) if existing != (tex.width, tex.height) => {
                    return FramebufferStatus::IncompleteDimensions;
                }
                Some(_) => {}
            }
        }

        for buffer in &fb.draw_buffers {
            if !fb.attachments.contains_key(buffer) {
                return FramebufferStatus::IncompleteAttachment;
            }
        }
        FramebufferStatus::Complete
    }

    fn check_creation(&self, what: &str) -> Result<()> {
        if self.fail_creation {
            return Err(engine_init_err!("lumen3d::mock", "Failed to create {}", what));
        }
        Ok(())
    }

    fn bound_attachment(&self, attachment: Attachment) -> Option<TextureHandle> {
        let fb = self.framebuffers.get(self.bound_framebuffer?)?;
        fb.attachments.get(&attachment).copied()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&mut self) -> Result<TextureHandle> {
        self.commands.push("create_texture".to_string());
        self.check_creation("texture")?;
        Ok(self.textures.insert(MockTexture::default()))
    }

    fn texture_storage_2d(
        &mut self,
        texture: TextureHandle,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Result<()> {
        self.commands.push("texture_storage_2d".to_string());
        let tex = match self.textures.get_mut(texture) {
            Some(tex) => tex,
            None => engine_bail!("lumen3d::mock", "texture_storage_2d on deleted texture"),
        };
        tex.width = width;
        tex.height = height;
        tex.format = Some(format);
        tex.data = vec![0; width as usize * height as usize * format.bytes_per_pixel()];
        tex.allocations += 1;
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.commands.push("delete_texture".to_string());
        self.textures.remove(texture);
        self.texture_units.retain(|_, bound| *bound != texture);
    }

    fn active_texture(&mut self, unit: u32) {
        self.commands.push("active_texture".to_string());
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        self.commands.push("bind_texture".to_string());
        match texture {
            Some(texture) => {
                self.texture_units.insert(self.active_unit, texture);
            }
            None => {
                self.texture_units.remove(&self.active_unit);
            }
        }
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferHandle> {
        self.commands.push("create_framebuffer".to_string());
        self.check_creation("framebuffer")?;
        Ok(self.framebuffers.insert(MockFramebuffer::default()))
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        self.commands.push("delete_framebuffer".to_string());
        self.framebuffers.remove(framebuffer);
        if self.bound_framebuffer == Some(framebuffer) {
            self.bound_framebuffer = None;
        }
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        self.commands.push("bind_framebuffer".to_string());
        self.bound_framebuffer = framebuffer;
    }

    fn framebuffer_texture_2d(
        &mut self,
        attachment: Attachment,
        texture: Option<TextureHandle>,
        _level: u32,
    ) {
        self.commands.push("framebuffer_texture_2d".to_string());
        let Some(bound) = self.bound_framebuffer else {
            return;
        };
        if let Some(fb) = self.framebuffers.get_mut(bound) {
            match texture {
                Some(texture) => {
                    fb.attachments.insert(attachment, texture);
                }
                None => {
                    fb.attachments.remove(&attachment);
                }
            }
        }
    }

    fn draw_buffers(&mut self, buffers: &[Attachment]) {
        self.commands.push("draw_buffers".to_string());
        if let Some(fb) = self.bound_framebuffer.and_then(|b| self.framebuffers.get_mut(b)) {
            fb.draw_buffers = buffers.to_vec();
        }
    }

    fn check_framebuffer_status(&mut self) -> FramebufferStatus {
        self.commands.push("check_framebuffer_status".to_string());
        match self.bound_framebuffer {
            None => FramebufferStatus::Complete,
            Some(framebuffer) => self
                .forced_status
                .unwrap_or_else(|| self.evaluate_status(framebuffer)),
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.commands.push("viewport".to_string());
        self.viewport = (x, y, width, height);
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        self.commands.push("clear_color".to_string());
        self.clear_color = rgba;
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.commands.push("clear".to_string());
        if flags.contains(ClearFlags::COLOR) {
            if let Some(texture) = self.bound_attachment(Attachment::Color0) {
                let rgba = self.clear_color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
                for texel in self.textures[texture].data.chunks_exact_mut(4) {
                    texel.copy_from_slice(&rgba);
                }
            }
        }
        if flags.contains(ClearFlags::DEPTH) {
            if let Some(texture) = self.bound_attachment(Attachment::Depth) {
                for texel in self.textures[texture].data.chunks_exact_mut(4) {
                    texel.copy_from_slice(&1.0f32.to_ne_bytes());
                }
            }
        }
    }

    fn read_pixels(&mut self, x: i32, y: i32, width: u32, height: u32, out: &mut [u8]) -> Result<()> {
        self.commands.push("read_pixels".to_string());
        let row_bytes = width as usize * 4;
        if out.len() != row_bytes * height as usize {
            engine_bail!("lumen3d::mock", "read_pixels buffer has {} bytes, expected {}",
                out.len(), row_bytes * height as usize);
        }
        let Some(texture) = self.bound_attachment(Attachment::Color0) else {
            out.fill(0);
            return Ok(());
        };
        let tex = &self.textures[texture];
        for row in 0..height {
            let src_row = (y as u32 + row) * tex.width + x as u32;
            let src = src_row as usize * 4;
            let dst = row as usize * row_bytes;
            out[dst..dst + row_bytes].copy_from_slice(&tex.data[src..src + row_bytes]);
        }
        Ok(())
    }

    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> Result<BufferHandle> {
        self.commands.push("create_buffer".to_string());
        self.check_creation("buffer")?;
        Ok(self.buffers.insert(MockBuffer { kind, data: data.to_vec() }))
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.commands.push("delete_buffer".to_string());
        self.buffers.remove(buffer);
    }

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        index_count: u32,
    ) -> Result<()> {
        self.commands.push("draw_indexed".to_string());
        if !self.buffers.contains_key(vertex_buffer) || !self.buffers.contains_key(index_buffer) {
            engine_bail!("lumen3d::mock", "draw_indexed with deleted buffer");
        }
        self.draws.push(MockDrawCall {
            program: self.current_program,
            framebuffer: self.bound_framebuffer,
            topology,
            index_count,
            texture_units: self.texture_units.clone(),
        });
        Ok(())
    }

    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ProgramHandle> {
        self.commands.push("create_program".to_string());
        self.check_creation("program")?;
        Ok(self.programs.insert(MockProgram {
            vertex_source: vertex_source.to_string(),
            fragment_source: fragment_source.to_string(),
            uniforms: FxHashMap::default(),
        }))
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.commands.push("delete_program".to_string());
        self.programs.remove(program);
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        self.commands.push("use_program".to_string());
        self.current_program = program;
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue) {
        self.commands.push("set_uniform".to_string());
        if let Some(p) = self.programs.get_mut(program) {
            p.uniforms.insert(name.to_string(), value);
            self.uniform_log.push((program, name.to_string(), value));
        }
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
