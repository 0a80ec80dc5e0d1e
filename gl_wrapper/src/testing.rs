//! In-memory [`RenderContext`] for tests.
//!
//! [`RecordingContext`] hands out object names from a counter and keeps the
//! bookkeeping a driver would: which objects are alive, what is bound, which
//! program is current. Misuse that a driver would silently tolerate or turn
//! into `GL_INVALID_OPERATION` (double deletes, drawing without a linked
//! program, uniforms with no current program) is collected in
//! [`RecordingContext::errors`] so tests can assert on it.

use std::collections::{BTreeSet, HashMap};

use crate::context::{
    BlendFactor, Location, Primitive, ProgramId, RenderContext, ShaderId, ShaderStage, TextureId,
    TextureParameters,
};
use crate::error::ResourceKind;

/// Every state-changing call, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(Option<ProgramId>),
    UniformMatrix4 { location: Location, columns: [f32; 16] },
    Uniform1i { location: Location, value: i32 },
    UploadVertices(Vec<f32>),
    VertexAttribPointer {
        location: Location,
        components: usize,
        stride: usize,
        offset: usize,
    },
    EnableVertexAttribArray(Location),
    ActiveTexture(u32),
    BindTexture(Option<TextureId>),
    TextureParameters(TextureParameters),
    TexImage2D { width: u32, height: u32 },
    Viewport { x: i32, y: i32, width: u32, height: u32 },
    ClearColor([f32; 4]),
    Clear,
    EnableBlend,
    BlendFunc(BlendFactor, BlendFactor),
    DrawArrays {
        primitive: Primitive,
        first: usize,
        count: usize,
    },
}

/// Snapshot of the pipeline state at the moment of a draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub first: usize,
    pub count: usize,
    pub program: Option<ProgramId>,
    pub texture: Option<TextureId>,
    pub blend: Option<(BlendFactor, BlendFactor)>,
    pub vertices: Vec<f32>,
}

struct ShaderState {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct ProgramState {
    attached: Vec<ShaderId>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
    attributes: Vec<String>,
    matrices: HashMap<u32, [f32; 16]>,
    ints: HashMap<u32, i32>,
}

#[derive(Default)]
struct TextureState {
    params: Option<TextureParameters>,
    size: Option<(u32, u32)>,
}

pub struct RecordingContext {
    next_id: u32,
    shaders: HashMap<ShaderId, ShaderState>,
    programs: HashMap<ProgramId, ProgramState>,
    textures: HashMap<TextureId, TextureState>,
    current_program: Option<ProgramId>,
    active_unit: u32,
    bound_textures: HashMap<u32, TextureId>,
    enabled_attributes: BTreeSet<u32>,
    vertices: Option<Vec<f32>>,
    viewport: Option<(i32, i32, u32, u32)>,
    clear_color: [f32; 4],
    blend_enabled: bool,
    blend_func: Option<(BlendFactor, BlendFactor)>,
    calls: Vec<Call>,
    draws: Vec<DrawCall>,
    clears: Vec<[f32; 4]>,
    errors: Vec<String>,
    fail_compile: Option<ShaderStage>,
    fail_link: bool,
    fail_create: Option<ResourceKind>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            textures: HashMap::new(),
            current_program: None,
            active_unit: 0,
            bound_textures: HashMap::new(),
            enabled_attributes: BTreeSet::new(),
            vertices: None,
            viewport: None,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            blend_enabled: false,
            blend_func: None,
            calls: Vec::new(),
            draws: Vec::new(),
            clears: Vec::new(),
            errors: Vec::new(),
            fail_compile: None,
            fail_link: false,
            fail_create: None,
        }
    }

    /// Makes every later compile of `stage` fail.
    pub fn fail_compile(&mut self, stage: ShaderStage) {
        self.fail_compile = Some(stage);
    }

    /// Makes every later link fail.
    pub fn fail_link(&mut self) {
        self.fail_link = true;
    }

    /// Makes every later allocation of `kind` return the invalid name.
    pub fn fail_create(&mut self, kind: ResourceKind) {
        self.fail_create = Some(kind);
    }

    pub fn clear_failures(&mut self) {
        self.fail_compile = None;
        self.fail_link = false;
        self.fail_create = None;
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.current_program
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Clear colors in effect at each `clear`, in order.
    pub fn clears(&self) -> &[[f32; 4]] {
        &self.clears
    }

    pub fn clear_color_value(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn viewport_value(&self) -> Option<(i32, i32, u32, u32)> {
        self.viewport
    }

    /// Blend factors, if blending is enabled and a blend function was set.
    pub fn blend(&self) -> Option<(BlendFactor, BlendFactor)> {
        self.blend_func.filter(|_| self.blend_enabled)
    }

    pub fn enabled_attributes(&self) -> Vec<Location> {
        self.enabled_attributes.iter().copied().map(Location).collect()
    }

    pub fn last_upload(&self) -> Option<&[f32]> {
        self.vertices.as_deref()
    }

    pub fn bound_texture(&self, unit: u32) -> Option<TextureId> {
        self.bound_textures.get(&unit).copied()
    }

    pub fn texture_params(&self, texture: TextureId) -> Option<TextureParameters> {
        self.textures.get(&texture)?.params
    }

    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&texture)?.size
    }

    /// Matrix last uploaded to `name` on the current program.
    pub fn uniform_matrix(&self, name: &str) -> Option<[f32; 16]> {
        let program = self.programs.get(&self.current_program?)?;
        let index = program.uniforms.iter().position(|u| u == name)?;
        program.matrices.get(&(index as u32)).copied()
    }

    /// Integer last uploaded to `name` on the current program.
    pub fn uniform_int(&self, name: &str) -> Option<i32> {
        let program = self.programs.get(&self.current_program?)?;
        let index = program.uniforms.iter().position(|u| u == name)?;
        program.ints.get(&(index as u32)).copied()
    }

    fn allocate(&mut self, kind: ResourceKind) -> Option<u32> {
        if self.fail_create == Some(kind) {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        Some(id)
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn current_linked(&mut self) -> Option<&mut ProgramState> {
        let id = self.current_program?;
        self.programs.get_mut(&id).filter(|p| p.linked)
    }
}

/// Names declared with `qualifier` (`uniform` or `attribute`), in order.
fn declarations(source: &str, qualifier: &str) -> Vec<String> {
    let code: String = source
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .map(|line| line.split("//").next().unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n");

    code.split(';')
        .filter_map(|stmt| {
            let stmt = stmt.rsplit(|c: char| c == '{' || c == '}').next()?;
            let mut tokens = stmt.split_whitespace();
            if tokens.next()? != qualifier {
                return None;
            }
            let name = tokens.last()?;
            Some(name.split('[').next().unwrap_or(name).to_string())
        })
        .collect()
}

impl RenderContext for RecordingContext {
    fn create_shader(&mut self, stage: ShaderStage) -> Option<ShaderId> {
        let id = ShaderId(self.allocate(ResourceKind::Shader)?);
        self.shaders.insert(
            id,
            ShaderState {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        Some(id)
    }

    fn shader_source(&mut self, shader: ShaderId, source: &str) {
        match self.shaders.get_mut(&shader) {
            Some(state) => state.source = source.to_string(),
            None => self.error(format!("source for unknown shader {}", shader.0)),
        }
    }

    fn compile_shader(&mut self, shader: ShaderId) {
        let fail = self.fail_compile;
        match self.shaders.get_mut(&shader) {
            Some(state) => {
                state.compiled = fail != Some(state.stage) && state.source.contains("main");
            }
            None => self.error(format!("compile of unknown shader {}", shader.0)),
        }
    }

    fn compile_status(&self, shader: ShaderId) -> bool {
        self.shaders.get(&shader).map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        match self.shaders.get(&shader) {
            Some(state) if !state.compiled => format!("ERROR: 0:1: {} shader rejected", state.stage),
            _ => String::new(),
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        if self.shaders.remove(&shader).is_none() {
            self.error(format!("delete of unknown shader {}", shader.0));
        }
    }

    fn create_program(&mut self) -> Option<ProgramId> {
        let id = ProgramId(self.allocate(ResourceKind::Program)?);
        self.programs.insert(id, ProgramState::default());
        Some(id)
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        if !self.shaders.contains_key(&shader) {
            self.error(format!("attach of unknown shader {}", shader.0));
            return;
        }
        match self.programs.get_mut(&program) {
            Some(state) => state.attached.push(shader),
            None => self.error(format!("attach to unknown program {}", program.0)),
        }
    }

    fn link_program(&mut self, program: ProgramId) {
        let Some(state) = self.programs.get(&program) else {
            self.error(format!("link of unknown program {}", program.0));
            return;
        };

        let shaders: Vec<&ShaderState> = state
            .attached
            .iter()
            .filter_map(|id| self.shaders.get(id))
            .collect();
        let has_stage = |stage| shaders.iter().any(|s| s.stage == stage && s.compiled);

        let (linked, log) = if self.fail_link {
            (false, "error: forced link failure".to_string())
        } else if !has_stage(ShaderStage::Vertex) || !has_stage(ShaderStage::Fragment) {
            (false, "error: missing compiled shader stage".to_string())
        } else {
            (true, String::new())
        };

        let mut uniforms = Vec::new();
        let mut attributes = Vec::new();
        if linked {
            for shader in &shaders {
                for name in declarations(&shader.source, "uniform") {
                    if !uniforms.contains(&name) {
                        uniforms.push(name);
                    }
                }
                for name in declarations(&shader.source, "attribute") {
                    if !attributes.contains(&name) {
                        attributes.push(name);
                    }
                }
            }
        }

        if let Some(state) = self.programs.get_mut(&program) {
            state.linked = linked;
            state.log = log;
            state.uniforms = uniforms;
            state.attributes = attributes;
        }
    }

    fn link_status(&self, program: ProgramId) -> bool {
        self.programs.get(&program).map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.calls.push(Call::UseProgram(program));

        if let Some(id) = program {
            if !self.link_status(id) {
                self.error(format!("use of unlinked program {}", id.0));
                return;
            }
        }
        self.current_program = program;
    }

    fn delete_program(&mut self, program: ProgramId) {
        if self.programs.remove(&program).is_none() {
            self.error(format!("delete of unknown program {}", program.0));
        }
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<Location> {
        let state = self.programs.get(&program).filter(|p| p.linked)?;
        let index = state.uniforms.iter().position(|u| u == name)?;
        Some(Location(index as u32))
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<Location> {
        let state = self.programs.get(&program).filter(|p| p.linked)?;
        let index = state.attributes.iter().position(|a| a == name)?;
        Some(Location(index as u32))
    }

    fn uniform_matrix4(&mut self, location: Location, columns: &[f32; 16]) {
        self.calls.push(Call::UniformMatrix4 {
            location,
            columns: *columns,
        });

        match self.current_linked() {
            Some(state) => {
                state.matrices.insert(location.0, *columns);
            }
            None => self.error("uniform upload without a current program".to_string()),
        }
    }

    fn uniform_1i(&mut self, location: Location, value: i32) {
        self.calls.push(Call::Uniform1i { location, value });

        match self.current_linked() {
            Some(state) => {
                state.ints.insert(location.0, value);
            }
            None => self.error("uniform upload without a current program".to_string()),
        }
    }

    fn upload_vertices(&mut self, data: &[f32]) {
        self.calls.push(Call::UploadVertices(data.to_vec()));
        self.vertices = Some(data.to_vec());
    }

    fn vertex_attrib_pointer(&mut self, location: Location, components: usize, stride: usize, offset: usize) {
        self.calls.push(Call::VertexAttribPointer {
            location,
            components,
            stride,
            offset,
        });

        if self.vertices.is_none() {
            self.error("attribute pointer without vertex data".to_string());
        }
    }

    fn enable_vertex_attrib_array(&mut self, location: Location) {
        self.calls.push(Call::EnableVertexAttribArray(location));
        self.enabled_attributes.insert(location.0);
    }

    fn create_texture(&mut self) -> Option<TextureId> {
        let id = TextureId(self.allocate(ResourceKind::Texture)?);
        self.textures.insert(id, TextureState::default());
        Some(id)
    }

    fn active_texture(&mut self, unit: u32) {
        self.calls.push(Call::ActiveTexture(unit));
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.calls.push(Call::BindTexture(texture));

        match texture {
            Some(id) if !self.textures.contains_key(&id) => {
                self.error(format!("bind of unknown texture {}", id.0));
            }
            Some(id) => {
                self.bound_textures.insert(self.active_unit, id);
            }
            None => {
                self.bound_textures.remove(&self.active_unit);
            }
        }
    }

    fn texture_parameters(&mut self, params: TextureParameters) {
        self.calls.push(Call::TextureParameters(params));

        let bound = self.bound_texture(self.active_unit);
        match bound.and_then(|id| self.textures.get_mut(&id)) {
            Some(state) => state.params = Some(params),
            None => self.error("texture parameters with no bound texture".to_string()),
        }
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, rgba: &[u8]) {
        self.calls.push(Call::TexImage2D { width, height });

        if rgba.len() != width as usize * height as usize * 4 {
            self.error(format!("{} bytes do not match a {width}x{height} RGBA image", rgba.len()));
            return;
        }

        let bound = self.bound_texture(self.active_unit);
        match bound.and_then(|id| self.textures.get_mut(&id)) {
            Some(state) => state.size = Some((width, height)),
            None => self.error("texture upload with no bound texture".to_string()),
        }
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_none() {
            self.error(format!("delete of unknown texture {}", texture.0));
        }
        self.bound_textures.retain(|_, bound| *bound != texture);
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.calls.push(Call::Viewport { x, y, width, height });
        self.viewport = Some((x, y, width, height));
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.calls.push(Call::ClearColor([r, g, b, a]));
        self.clear_color = [r, g, b, a];
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
        self.clears.push(self.clear_color);
    }

    fn enable_blend(&mut self) {
        self.calls.push(Call::EnableBlend);
        self.blend_enabled = true;
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.calls.push(Call::BlendFunc(src, dst));
        self.blend_func = Some((src, dst));
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize) {
        self.calls.push(Call::DrawArrays {
            primitive,
            first,
            count,
        });

        if self.current_linked().is_none() {
            self.error("draw without a linked program".to_string());
        }
        if self.enabled_attributes.is_empty() {
            self.error("draw with no enabled vertex attributes".to_string());
        }

        self.draws.push(DrawCall {
            primitive,
            first,
            count,
            program: self.current_program,
            texture: self.bound_texture(self.active_unit),
            blend: self.blend(),
            vertices: self.vertices.clone().unwrap_or_default(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_are_found() {
        let src = "uniform mat4 uScreen;\n\
                   attribute vec2 aPosition;\n\
                   attribute vec3 aColor; // per vertex\n\
                   varying vec3 vColor;\n\
                   void main() { vColor = aColor; }";

        assert_eq!(declarations(src, "uniform"), vec!["uScreen"]);
        assert_eq!(declarations(src, "attribute"), vec!["aPosition", "aColor"]);
    }

    #[test]
    fn double_delete_is_flagged() {
        let mut ctx = RecordingContext::new();
        let texture = ctx.create_texture().unwrap();

        ctx.delete_texture(texture);
        ctx.delete_texture(texture);

        assert_eq!(ctx.errors().len(), 1);
    }

    #[test]
    fn draw_without_program_is_flagged() {
        let mut ctx = RecordingContext::new();

        ctx.draw_arrays(Primitive::Triangles, 0, 3);

        assert!(!ctx.errors().is_empty());
    }
}
