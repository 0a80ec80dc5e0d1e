use tracing::debug;

use gl_wrapper::geometry::VertexLayout;
use gl_wrapper::program::ShaderProgram;
use gl_wrapper::{Primitive, RenderContext};

use crate::renderer::{check_surface, RendererState, SampleError};
use crate::shaders::U_SCREEN;
use crate::transform::ScreenTransform;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// The part every shader-driven sample shares: one program, one vertex
/// layout, one primitive, drawn in pixel space through `uScreen`.
pub(crate) struct Pass {
    program: ShaderProgram,
    layout: VertexLayout,
    primitive: Primitive,
    transform: Option<ScreenTransform>,
    state: RendererState,
}

impl Pass {
    pub(crate) fn new(vert_src: &str, frag_src: &str, layout: VertexLayout, primitive: Primitive) -> Self {
        Self {
            program: ShaderProgram::new(vert_src, frag_src),
            layout,
            primitive,
            transform: None,
            state: RendererState::Uninitialized,
        }
    }

    pub(crate) fn state(&self) -> RendererState {
        self.state
    }

    pub(crate) fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub(crate) fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub(crate) fn transform(&self) -> Option<&ScreenTransform> {
        self.transform.as_ref()
    }

    /// Rebuilds the program for a surface of `width` x `height` and sets the
    /// viewport and the white clear color.
    pub(crate) fn rebuild(&mut self, ctx: &mut dyn RenderContext, width: u32, height: u32) -> Result<(), SampleError> {
        check_surface(width, height)?;

        self.transform = None;
        self.state = RendererState::Uninitialized;
        self.program.setup(ctx)?;

        let transform = ScreenTransform::new(width, height);
        if let Some(location) = self.program.uniform_location(&*ctx, U_SCREEN) {
            ctx.uniform_matrix4(location, &transform.to_columns());
        }

        ctx.viewport(0, 0, width, height);
        let [r, g, b, a] = WHITE;
        ctx.clear_color(r, g, b, a);

        self.transform = Some(transform);
        self.state = RendererState::Ready;
        debug!(width, height, "pass ready");

        Ok(())
    }

    /// Called when a new context appears: whatever the pass held belonged
    /// to the previous one.
    pub(crate) fn forget_context(&mut self) {
        self.program.forget();
        self.transform = None;
        if self.state == RendererState::Ready {
            self.state = RendererState::Uninitialized;
        }
    }

    pub(crate) fn draw(&self, ctx: &mut dyn RenderContext, vertices: &[f32]) -> Result<usize, SampleError> {
        self.draw_with(ctx, vertices, |_, _| {})
    }

    /// Binds vertices and uniforms, lets `bind` add per-sample state, then
    /// clears and draws. Returns the number of vertices drawn.
    pub(crate) fn draw_with<F>(&self, ctx: &mut dyn RenderContext, vertices: &[f32], bind: F) -> Result<usize, SampleError>
    where
        F: FnOnce(&mut dyn RenderContext, &ShaderProgram),
    {
        let transform = match (self.state, self.transform.as_ref()) {
            (RendererState::Ready, Some(transform)) => transform,
            _ => return Err(SampleError::NotReady),
        };

        if !self.program.activate(ctx) {
            return Err(SampleError::NotReady);
        }

        let count = self.layout.bind(ctx, &self.program, vertices)?;

        if let Some(location) = self.program.uniform_location(&*ctx, U_SCREEN) {
            ctx.uniform_matrix4(location, &transform.to_columns());
        }

        bind(&mut *ctx, &self.program);

        ctx.clear();
        ctx.draw_arrays(self.primitive, 0, count);

        Ok(count)
    }

    pub(crate) fn tear_down(&mut self, ctx: &mut dyn RenderContext) {
        self.program.tear_down(ctx);
        self.transform = None;
        self.state = RendererState::Destroyed;
    }
}
