use tracing::{debug, trace};

use crate::context::{Location, ProgramId, RenderContext, ShaderId, ShaderStage};
use crate::error::{GlError, ResourceKind};

/// Compiles one shader stage.
///
/// On failure the shader object is deleted before the error is returned.
pub fn compile<C>(ctx: &mut C, stage: ShaderStage, source: &str) -> Result<ShaderId, GlError>
where
    C: RenderContext + ?Sized,
{
    let shader = ctx
        .create_shader(stage)
        .ok_or(GlError::ResourceCreation(ResourceKind::Shader))?;

    ctx.shader_source(shader, source);
    ctx.compile_shader(shader);

    if !ctx.compile_status(shader) {
        let log = ctx.shader_info_log(shader);
        ctx.delete_shader(shader);
        return Err(GlError::Compile { stage, log });
    }

    Ok(shader)
}

/// Links a vertex and fragment shader into a program.
///
/// On failure the program object is deleted; the shaders stay owned by the
/// caller.
pub fn link<C>(ctx: &mut C, vert: ShaderId, frag: ShaderId) -> Result<ProgramId, GlError>
where
    C: RenderContext + ?Sized,
{
    let program = ctx
        .create_program()
        .ok_or(GlError::ResourceCreation(ResourceKind::Program))?;

    ctx.attach_shader(program, vert);
    ctx.attach_shader(program, frag);
    ctx.link_program(program);

    if !ctx.link_status(program) {
        let log = ctx.program_info_log(program);
        ctx.delete_program(program);
        return Err(GlError::Link { log });
    }

    Ok(program)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Linked {
    program: ProgramId,
    vert: ShaderId,
    frag: ShaderId,
}

/// A vertex + fragment shader pair and the program linked from them.
///
/// Either all three GL objects are alive or none are. [`ShaderProgram::setup`]
/// always tears down first, so an instance never owns more than one program.
pub struct ShaderProgram {
    vert_src: String,
    frag_src: String,
    linked: Option<Linked>,
}

impl ShaderProgram {
    pub fn new(vert_src: impl Into<String>, frag_src: impl Into<String>) -> Self {
        Self {
            vert_src: vert_src.into(),
            frag_src: frag_src.into(),
            linked: None,
        }
    }

    /// Compiles, links and activates the program, replacing any previous one.
    pub fn setup<C>(&mut self, ctx: &mut C) -> Result<ProgramId, GlError>
    where
        C: RenderContext + ?Sized,
    {
        self.tear_down(ctx);

        let vert = compile(ctx, ShaderStage::Vertex, &self.vert_src)?;

        let frag = match compile(ctx, ShaderStage::Fragment, &self.frag_src) {
            Ok(frag) => frag,
            Err(e) => {
                ctx.delete_shader(vert);
                return Err(e);
            }
        };

        let program = match link(ctx, vert, frag) {
            Ok(program) => program,
            Err(e) => {
                ctx.delete_shader(vert);
                ctx.delete_shader(frag);
                return Err(e);
            }
        };

        ctx.use_program(Some(program));
        self.linked = Some(Linked {
            program,
            vert,
            frag,
        });

        debug!(program = program.0, vert = vert.0, frag = frag.0, "shader program linked");

        Ok(program)
    }

    /// Releases the program and both shaders. Does nothing when nothing is
    /// allocated, so it is safe to call repeatedly.
    pub fn tear_down<C>(&mut self, ctx: &mut C)
    where
        C: RenderContext + ?Sized,
    {
        if let Some(linked) = self.linked.take() {
            ctx.delete_program(linked.program);
            ctx.delete_shader(linked.vert);
            ctx.delete_shader(linked.frag);
            debug!(program = linked.program.0, "shader program released");
        }
    }

    /// Drops the handles without deleting anything. For when the context that
    /// owned them has been lost and its names mean nothing anymore.
    pub fn forget(&mut self) {
        if let Some(linked) = self.linked.take() {
            debug!(program = linked.program.0, "shader program forgotten with its context");
        }
    }

    /// Makes this program current again, if it is linked.
    pub fn activate<C>(&self, ctx: &mut C) -> bool
    where
        C: RenderContext + ?Sized,
    {
        match self.linked {
            Some(linked) => {
                ctx.use_program(Some(linked.program));
                true
            }
            None => false,
        }
    }

    pub fn uniform_location<C>(&self, ctx: &C, name: &str) -> Option<Location>
    where
        C: RenderContext + ?Sized,
    {
        let location = ctx.uniform_location(self.linked?.program, name);
        if location.is_none() {
            trace!(name, "uniform not active");
        }
        location
    }

    pub fn attribute_location<C>(&self, ctx: &C, name: &str) -> Option<Location>
    where
        C: RenderContext + ?Sized,
    {
        let location = ctx.attribute_location(self.linked?.program, name);
        if location.is_none() {
            trace!(name, "attribute not active");
        }
        location
    }

    pub fn program(&self) -> Option<ProgramId> {
        self.linked.map(|l| l.program)
    }

    pub fn is_linked(&self) -> bool {
        self.linked.is_some()
    }
}
