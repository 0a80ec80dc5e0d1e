//! The explicit GPU context every wrapper operation goes through.
//!
//! OpenGL keeps its state (current program, bound texture, enabled vertex
//! arrays) in a global, per-thread context. [`RenderContext`] names that state
//! as a value, so shader setup, uniform binding and draw calls are functions of
//! `(context, inputs)` and can run against [`crate::renderer::GlRenderer`] on a
//! real context or against an in-memory recorder in tests.

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Resolved uniform or attribute slot of a linked program.
///
/// Lookups return `Option<Location>`; `None` stands for GL's `-1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Location(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendFactor {
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Sampling state applied to the currently bound 2D texture. Both axes
/// always wrap with clamp-to-edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureParameters {
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
}

impl TextureParameters {
    /// Same filter for minification and magnification, edges clamped.
    ///
    /// Clamping keeps non-power-of-two images complete on GL ES 2.0.
    pub fn clamped(filter: TextureFilter) -> Self {
        Self {
            min_filter: filter,
            mag_filter: filter,
        }
    }
}

/// GL ES 2.0 subset used by the samples.
///
/// Creation calls return `None` when the driver hands back the invalid
/// object name. Location lookups return `None` when the name is not an
/// active uniform or attribute of the program.
pub trait RenderContext {
    fn create_shader(&mut self, stage: ShaderStage) -> Option<ShaderId>;
    fn shader_source(&mut self, shader: ShaderId, source: &str);
    fn compile_shader(&mut self, shader: ShaderId);
    fn compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&mut self, shader: ShaderId);

    fn create_program(&mut self) -> Option<ProgramId>;
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId);
    fn link_program(&mut self, program: ProgramId);
    fn link_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    /// `None` unbinds the current program.
    fn use_program(&mut self, program: Option<ProgramId>);
    fn delete_program(&mut self, program: ProgramId);

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<Location>;
    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<Location>;
    /// Uploads a column-major matrix to the current program.
    fn uniform_matrix4(&mut self, location: Location, columns: &[f32; 16]);
    fn uniform_1i(&mut self, location: Location, value: i32);

    /// Replaces the contents of the context's vertex buffer.
    fn upload_vertices(&mut self, data: &[f32]);
    /// Points an attribute into the uploaded vertex buffer. `stride` and
    /// `offset` are in bytes.
    fn vertex_attrib_pointer(&mut self, location: Location, components: usize, stride: usize, offset: usize);
    fn enable_vertex_attrib_array(&mut self, location: Location);

    fn create_texture(&mut self) -> Option<TextureId>;
    fn active_texture(&mut self, unit: u32);
    /// `None` unbinds the 2D texture target of the active unit.
    fn bind_texture(&mut self, texture: Option<TextureId>);
    fn texture_parameters(&mut self, params: TextureParameters);
    /// Uploads tightly packed RGBA8 rows to the bound 2D texture.
    fn tex_image_2d(&mut self, width: u32, height: u32, rgba: &[u8]);
    fn delete_texture(&mut self, texture: TextureId);

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    /// Clears the color buffer.
    fn clear(&mut self);
    fn enable_blend(&mut self);
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize);
}
