/// GlGraphicsDevice - OpenGL ES 3 / WebGL2 implementation of GraphicsDevice
///
/// Engine handles are slotmap keys mapped to native glow objects here.
/// Texture storage is immutable in GLES3, so reallocating a texture swaps
/// in a fresh native object behind the same handle.

use glow::HasContext;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use lumen_3d_passes::lumen3d::Result;
use lumen_3d_passes::lumen3d::render::{
    Attachment, BufferHandle, BufferKind, ClearFlags, FramebufferHandle, FramebufferStatus,
    GraphicsDevice, PrimitiveTopology, ProgramHandle, TextureFormat, TextureHandle, UniformValue,
};
use lumen_3d_passes::{engine_bail, engine_debug, engine_init_err, engine_warn};
use crate::gl_format::{
    attachment_to_gl, buffer_kind_to_gl, clear_mask, framebuffer_status_from_gl,
    texture_format_to_gl, topology_to_gl,
};

/// Vertex stride of the position-only layout (vec3 at location 0)
const POSITION_STRIDE: i32 = 12;

struct GlBuffer {
    native: glow::Buffer,
    kind: BufferKind,
}

struct GlProgram {
    native: glow::Program,
    /// Uniform locations by name, `None` for names the linker dropped
    locations: FxHashMap<String, Option<glow::UniformLocation>>,
}

pub struct GlGraphicsDevice {
    gl: glow::Context,
    textures: SlotMap<TextureHandle, glow::Texture>,
    framebuffers: SlotMap<FramebufferHandle, glow::Framebuffer>,
    buffers: SlotMap<BufferHandle, GlBuffer>,
    programs: SlotMap<ProgramHandle, GlProgram>,
    /// One VAO per (vertex buffer, index buffer) pair
    vertex_arrays: FxHashMap<(BufferHandle, BufferHandle), glow::VertexArray>,
    active_unit: u32,
    texture_units: FxHashMap<u32, TextureHandle>,
    current_program: Option<ProgramHandle>,
}

impl GlGraphicsDevice {
    /// Wrap an existing GL context
    pub fn new(gl: glow::Context) -> Self {
        engine_debug!("lumen3d::gl", "GL device created");
        Self {
            gl,
            textures: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
            buffers: SlotMap::with_key(),
            programs: SlotMap::with_key(),
            vertex_arrays: FxHashMap::default(),
            active_unit: 0,
            texture_units: FxHashMap::default(),
            current_program: None,
        }
    }

    /// Underlying glow context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    fn native_program(&self, program: Option<ProgramHandle>) -> Option<glow::Program> {
        program.and_then(|p| self.programs.get(p)).map(|p| p.native)
    }

    fn compile_stage(&self, stage: u32, source: &str) -> Result<glow::Shader> {
        // SAFETY: the shader object is created and used on this context only.
        unsafe {
            let shader = self
                .gl
                .create_shader(stage)
                .map_err(|e| engine_init_err!("lumen3d::gl", "Failed to create shader: {}", e))?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                engine_bail!("lumen3d::gl", "Shader compilation failed: {}", log);
            }
            Ok(shader)
        }
    }

    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<glow::UniformLocation> {
        let gl = &self.gl;
        let entry = self.programs.get_mut(program)?;
        if let Some(location) = entry.locations.get(name) {
            return location.clone();
        }
        // SAFETY: entry.native is a linked program of this context.
        let location = unsafe { gl.get_uniform_location(entry.native, name) };
        if location.is_none() {
            engine_warn!("lumen3d::gl", "Uniform '{}' not found in program", name);
        }
        entry.locations.insert(name.to_string(), location.clone());
        location
    }

    fn vertex_array(
        &mut self,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
    ) -> Result<glow::VertexArray> {
        if let Some(vao) = self.vertex_arrays.get(&(vertex_buffer, index_buffer)) {
            return Ok(*vao);
        }
        let (Some(vb), Some(ib)) = (self.buffers.get(vertex_buffer), self.buffers.get(index_buffer)) else {
            engine_bail!("lumen3d::gl", "draw_indexed with deleted buffer");
        };

        // SAFETY: both buffers are live objects of this context; the VAO is
        // unbound again before returning.
        let vao = unsafe {
            let vao = self
                .gl
                .create_vertex_array()
                .map_err(|e| engine_init_err!("lumen3d::gl", "Failed to create vertex array: {}", e))?;
            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vb.native));
            self.gl.enable_vertex_attrib_array(0);
            self.gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, POSITION_STRIDE, 0);
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ib.native));
            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            vao
        };
        self.vertex_arrays.insert((vertex_buffer, index_buffer), vao);
        Ok(vao)
    }
}

impl GraphicsDevice for GlGraphicsDevice {
    // ===== TEXTURES =====

    fn create_texture(&mut self) -> Result<TextureHandle> {
        // SAFETY: creating an object has no preconditions.
        let native = unsafe { self.gl.create_texture() }
            .map_err(|e| engine_init_err!("lumen3d::gl", "Failed to create texture: {}", e))?;
        Ok(self.textures.insert(native))
    }

    fn texture_storage_2d(
        &mut self,
        texture: TextureHandle,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Result<()> {
        let Some(old) = self.textures.get(texture).copied() else {
            engine_bail!("lumen3d::gl", "texture_storage_2d on deleted texture");
        };
        let gl_format = texture_format_to_gl(format);

        // SAFETY: `old` is a live texture of this context. The replacement is
        // bound on the active unit, then that unit's binding is restored.
        unsafe {
            let native = self
                .gl
                .create_texture()
                .map_err(|e| engine_init_err!("lumen3d::gl", "Failed to create texture: {}", e))?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(native));
            self.gl.tex_storage_2d(
                glow::TEXTURE_2D,
                1,
                gl_format.internal_format,
                width as i32,
                height as i32,
            );
            for (pname, value) in [
                (glow::TEXTURE_MIN_FILTER, glow::NEAREST),
                (glow::TEXTURE_MAG_FILTER, glow::NEAREST),
                (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
                (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
            ] {
                self.gl.tex_parameter_i32(glow::TEXTURE_2D, pname, value as i32);
            }

            self.gl.delete_texture(old);
            self.textures[texture] = native;

            let restore = self
                .texture_units
                .get(&self.active_unit)
                .and_then(|bound| self.textures.get(*bound))
                .copied();
            self.gl.bind_texture(glow::TEXTURE_2D, restore);
        }
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if let Some(native) = self.textures.remove(texture) {
            // SAFETY: native was created by this context and is no longer mapped.
            unsafe { self.gl.delete_texture(native) };
        }
        self.texture_units.retain(|_, bound| *bound != texture);
    }

    fn active_texture(&mut self, unit: u32) {
        // SAFETY: any unit index below the implementation limit is valid.
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, texture: Option<TextureHandle>) {
        let native = texture.and_then(|t| self.textures.get(t)).copied();
        // SAFETY: native is either None or a live texture.
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, native) };
        match texture {
            Some(texture) => {
                self.texture_units.insert(self.active_unit, texture);
            }
            None => {
                self.texture_units.remove(&self.active_unit);
            }
        }
    }

    // ===== FRAMEBUFFERS =====

    fn create_framebuffer(&mut self) -> Result<FramebufferHandle> {
        // SAFETY: creating an object has no preconditions.
        let native = unsafe { self.gl.create_framebuffer() }
            .map_err(|e| engine_init_err!("lumen3d::gl", "Failed to create framebuffer: {}", e))?;
        Ok(self.framebuffers.insert(native))
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        if let Some(native) = self.framebuffers.remove(framebuffer) {
            // SAFETY: native was created by this context and is no longer mapped.
            unsafe { self.gl.delete_framebuffer(native) };
        }
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        let native = framebuffer.and_then(|f| self.framebuffers.get(f)).copied();
        // SAFETY: native is either None (default target) or a live framebuffer.
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, native) };
    }

    fn framebuffer_texture_2d(
        &mut self,
        attachment: Attachment,
        texture: Option<TextureHandle>,
        level: u32,
    ) {
        let native = texture.and_then(|t| self.textures.get(t)).copied();
        // SAFETY: attaches to the bound framebuffer; native is None or live.
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                attachment_to_gl(attachment),
                glow::TEXTURE_2D,
                native,
                level as i32,
            );
        }
    }

    fn draw_buffers(&mut self, buffers: &[Attachment]) {
        let slots: Vec<u32> = buffers.iter().map(|a| attachment_to_gl(*a)).collect();
        // SAFETY: slot list only contains color/depth attachment enums.
        unsafe { self.gl.draw_buffers(&slots) };
    }

    fn check_framebuffer_status(&mut self) -> FramebufferStatus {
        // SAFETY: queries the bound framebuffer.
        let status = unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        framebuffer_status_from_gl(status)
    }

    // ===== FRAME STATE =====

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        // SAFETY: plain state call.
        unsafe { self.gl.viewport(x, y, width as i32, height as i32) };
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        // SAFETY: plain state call.
        unsafe { self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]) };
    }

    fn clear(&mut self, flags: ClearFlags) {
        // SAFETY: clears the bound framebuffer.
        unsafe { self.gl.clear(clear_mask(flags)) };
    }

    fn read_pixels(&mut self, x: i32, y: i32, width: u32, height: u32, out: &mut [u8]) -> Result<()> {
        let expected = width as usize * height as usize * 4;
        if out.len() != expected {
            engine_bail!("lumen3d::gl", "read_pixels buffer has {} bytes, expected {}",
                out.len(), expected);
        }
        // SAFETY: `out` holds exactly width * height RGBA8 texels.
        unsafe {
            self.gl.read_pixels(
                x,
                y,
                width as i32,
                height as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(out),
            );
        }
        Ok(())
    }

    // ===== GEOMETRY =====

    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> Result<BufferHandle> {
        let target = buffer_kind_to_gl(kind);
        // SAFETY: the buffer is bound only for the upload.
        let native = unsafe {
            let native = self
                .gl
                .create_buffer()
                .map_err(|e| engine_init_err!("lumen3d::gl", "Failed to create buffer: {}", e))?;
            if kind == BufferKind::Index {
                // Element bindings are VAO state
                self.gl.bind_vertex_array(None);
            }
            self.gl.bind_buffer(target, Some(native));
            self.gl.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
            self.gl.bind_buffer(target, None);
            native
        };
        Ok(self.buffers.insert(GlBuffer { native, kind }))
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        let stale: Vec<(BufferHandle, BufferHandle)> = self
            .vertex_arrays
            .keys()
            .filter(|(vb, ib)| *vb == buffer || *ib == buffer)
            .copied()
            .collect();
        for key in stale {
            if let Some(vao) = self.vertex_arrays.remove(&key) {
                // SAFETY: the VAO belongs to this context.
                unsafe { self.gl.delete_vertex_array(vao) };
            }
        }
        if let Some(entry) = self.buffers.remove(buffer) {
            // SAFETY: native was created by this context and is no longer mapped.
            unsafe { self.gl.delete_buffer(entry.native) };
        }
    }

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        index_count: u32,
    ) -> Result<()> {
        if self.buffers.get(index_buffer).map(|b| b.kind) != Some(BufferKind::Index) {
            engine_bail!("lumen3d::gl", "draw_indexed without a live index buffer");
        }
        let vao = self.vertex_array(vertex_buffer, index_buffer)?;
        // SAFETY: the VAO references live vertex and index buffers.
        unsafe {
            self.gl.bind_vertex_array(Some(vao));
            self.gl.draw_elements(topology_to_gl(topology), index_count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
        Ok(())
    }

    // ===== PROGRAMS =====

    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ProgramHandle> {
        let vertex = self.compile_stage(glow::VERTEX_SHADER, vertex_source)?;
        let fragment = match self.compile_stage(glow::FRAGMENT_SHADER, fragment_source) {
            Ok(shader) => shader,
            Err(e) => {
                // SAFETY: vertex was created above and is not attached.
                unsafe { self.gl.delete_shader(vertex) };
                return Err(e);
            }
        };

        // SAFETY: both stages compiled on this context; they are detached
        // and deleted once the program is linked.
        let native = unsafe {
            let native = match self.gl.create_program() {
                Ok(program) => program,
                Err(e) => {
                    self.gl.delete_shader(vertex);
                    self.gl.delete_shader(fragment);
                    return Err(engine_init_err!("lumen3d::gl", "Failed to create program: {}", e));
                }
            };
            self.gl.attach_shader(native, vertex);
            self.gl.attach_shader(native, fragment);
            self.gl.link_program(native);
            let linked = self.gl.get_program_link_status(native);
            self.gl.detach_shader(native, vertex);
            self.gl.detach_shader(native, fragment);
            self.gl.delete_shader(vertex);
            self.gl.delete_shader(fragment);
            if !linked {
                let log = self.gl.get_program_info_log(native);
                self.gl.delete_program(native);
                engine_bail!("lumen3d::gl", "Program link failed: {}", log);
            }
            native
        };

        Ok(self.programs.insert(GlProgram { native, locations: FxHashMap::default() }))
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if let Some(entry) = self.programs.remove(program) {
            // SAFETY: native was created by this context and is no longer mapped.
            unsafe { self.gl.delete_program(entry.native) };
        }
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        let native = self.native_program(program);
        // SAFETY: native is None or a linked program.
        unsafe { self.gl.use_program(native) };
        self.current_program = program;
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: UniformValue) {
        let Some(native) = self.native_program(Some(program)) else {
            return;
        };
        let location = self.uniform_location(program, name);
        let location = location.as_ref();
        let restore = self.native_program(self.current_program);
        let rebind = self.current_program != Some(program);

        // SAFETY: `program` is made current for the upload, then the previous
        // program is restored.
        unsafe {
            if rebind {
                self.gl.use_program(Some(native));
            }
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Mat4(m) => {
                    self.gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
            }
            if rebind {
                self.gl.use_program(restore);
            }
        }
    }
}

impl Drop for GlGraphicsDevice {
    fn drop(&mut self) {
        // SAFETY: every object below was created by this context.
        unsafe {
            for (_, vao) in self.vertex_arrays.drain() {
                self.gl.delete_vertex_array(vao);
            }
            for (_, buffer) in self.buffers.drain() {
                self.gl.delete_buffer(buffer.native);
            }
            for (_, framebuffer) in self.framebuffers.drain() {
                self.gl.delete_framebuffer(framebuffer);
            }
            for (_, texture) in self.textures.drain() {
                self.gl.delete_texture(texture);
            }
            for (_, program) in self.programs.drain() {
                self.gl.delete_program(program.native);
            }
        }
    }
}
