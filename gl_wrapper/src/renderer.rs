use std::ffi::{c_char, c_void, CString};

use gl::types::{GLenum, GLint, GLsizei, GLsizeiptr, GLuint};

use crate::context::{
    BlendFactor, Location, Primitive, ProgramId, RenderContext, ShaderId, ShaderStage, TextureFilter,
    TextureId, TextureParameters,
};
use crate::FLOAT_SIZE;

/// [`RenderContext`] backed by the process-wide GL function pointers.
///
/// The `gl` crate must be loaded (`gl::load_with`) against a current GL ES 2.0
/// context before this is constructed, and the context must stay current on
/// the calling thread for the renderer's lifetime.
pub struct GlRenderer {
    current_program: u32,
    vbo: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        let mut vbo = 0;

        unsafe {
            gl::GenBuffers(1, (&mut vbo) as *mut u32);
        }

        Self {
            current_program: 0,
            vbo,
        }
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GlRenderer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
        }
    }
}

fn stage_enum(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

fn primitive_enum(primitive: Primitive) -> GLenum {
    match primitive {
        Primitive::Triangles => gl::TRIANGLES,
        Primitive::TriangleStrip => gl::TRIANGLE_STRIP,
    }
}

fn blend_enum(factor: BlendFactor) -> GLenum {
    match factor {
        BlendFactor::One => gl::ONE,
        BlendFactor::SrcAlpha => gl::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
    }
}

fn filter_enum(filter: TextureFilter) -> GLint {
    match filter {
        TextureFilter::Nearest => gl::NEAREST as GLint,
        TextureFilter::Linear => gl::LINEAR as GLint,
    }
}

/// Turns a GL info log buffer into a string, dropping the trailing NUL.
fn info_log(mut buf: Vec<u8>, written: GLsizei) -> String {
    buf.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buf).trim_end().to_string()
}

fn location_from(raw: GLint) -> Option<Location> {
    u32::try_from(raw).ok().map(Location)
}

impl RenderContext for GlRenderer {
    fn create_shader(&mut self, stage: ShaderStage) -> Option<ShaderId> {
        let id = unsafe { gl::CreateShader(stage_enum(stage)) };
        (id != 0).then_some(ShaderId(id))
    }

    fn shader_source(&mut self, shader: ShaderId, source: &str) {
        let ptr = source.as_ptr() as *const c_char;
        let len = source.len() as GLint;

        unsafe {
            gl::ShaderSource(shader.0, 1, (&ptr) as *const *const c_char, (&len) as *const GLint);
        }
    }

    fn compile_shader(&mut self, shader: ShaderId) {
        unsafe { gl::CompileShader(shader.0) }
    }

    fn compile_status(&self, shader: ShaderId) -> bool {
        let mut success: GLint = 0;
        unsafe { gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, (&mut success) as *mut GLint) };
        success == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        let mut len: GLint = 0;
        let mut written: GLsizei = 0;

        unsafe {
            gl::GetShaderiv(shader.0, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);
            let mut buf = vec![0_u8; len.max(1) as usize];
            gl::GetShaderInfoLog(
                shader.0,
                buf.len() as GLsizei,
                (&mut written) as *mut GLsizei,
                buf.as_mut_ptr() as *mut c_char,
            );
            info_log(buf, written)
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        unsafe { gl::DeleteShader(shader.0) }
    }

    fn create_program(&mut self) -> Option<ProgramId> {
        let id = unsafe { gl::CreateProgram() };
        (id != 0).then_some(ProgramId(id))
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        unsafe { gl::AttachShader(program.0, shader.0) }
    }

    fn link_program(&mut self, program: ProgramId) {
        unsafe { gl::LinkProgram(program.0) }
    }

    fn link_status(&self, program: ProgramId) -> bool {
        let mut success: GLint = 0;
        unsafe { gl::GetProgramiv(program.0, gl::LINK_STATUS, (&mut success) as *mut GLint) };
        success == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        let mut len: GLint = 0;
        let mut written: GLsizei = 0;

        unsafe {
            gl::GetProgramiv(program.0, gl::INFO_LOG_LENGTH, (&mut len) as *mut GLint);
            let mut buf = vec![0_u8; len.max(1) as usize];
            gl::GetProgramInfoLog(
                program.0,
                buf.len() as GLsizei,
                (&mut written) as *mut GLsizei,
                buf.as_mut_ptr() as *mut c_char,
            );
            info_log(buf, written)
        }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        let p_id = program.map_or(0, |p| p.0);
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    fn delete_program(&mut self, program: ProgramId) {
        if self.current_program == program.0 {
            self.current_program = 0;
            unsafe { gl::UseProgram(0) }
        }
        unsafe { gl::DeleteProgram(program.0) }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<Location> {
        let name = CString::new(name).ok()?;
        location_from(unsafe { gl::GetUniformLocation(program.0, name.as_ptr()) })
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<Location> {
        let name = CString::new(name).ok()?;
        location_from(unsafe { gl::GetAttribLocation(program.0, name.as_ptr()) })
    }

    fn uniform_matrix4(&mut self, location: Location, columns: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location.0 as GLint, 1, gl::FALSE, columns.as_ptr()) }
    }

    fn uniform_1i(&mut self, location: Location, value: i32) {
        unsafe { gl::Uniform1i(location.0 as GLint, value) }
    }

    fn upload_vertices(&mut self, data: &[f32]) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.len() * FLOAT_SIZE) as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STREAM_DRAW,
            );
        }
    }

    fn vertex_attrib_pointer(&mut self, location: Location, components: usize, stride: usize, offset: usize) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
            gl::VertexAttribPointer(
                location.0,
                components as GLint,
                gl::FLOAT,
                gl::FALSE,
                stride as GLsizei,
                offset as *const c_void,
            );
        }
    }

    fn enable_vertex_attrib_array(&mut self, location: Location) {
        unsafe { gl::EnableVertexAttribArray(location.0) }
    }

    fn create_texture(&mut self) -> Option<TextureId> {
        let mut id: GLuint = 0;
        unsafe { gl::GenTextures(1, (&mut id) as *mut GLuint) };
        (id != 0).then_some(TextureId(id))
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) }
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, texture.map_or(0, |t| t.0)) }
    }

    fn texture_parameters(&mut self, params: TextureParameters) {
        unsafe {
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, filter_enum(params.min_filter));
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, filter_enum(params.mag_filter));
        }
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, rgba: &[u8]) {
        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                rgba.as_ptr() as *const c_void,
            );
        }
    }

    fn delete_texture(&mut self, texture: TextureId) {
        unsafe { gl::DeleteTextures(1, (&texture.0) as *const GLuint) }
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { gl::Viewport(x, y, width as GLsizei, height as GLsizei) }
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&mut self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) }
    }

    fn enable_blend(&mut self) {
        unsafe { gl::Enable(gl::BLEND) }
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        unsafe { gl::BlendFunc(blend_enum(src), blend_enum(dst)) }
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize) {
        unsafe { gl::DrawArrays(primitive_enum(primitive), first as GLint, count as GLsizei) }
    }
}
