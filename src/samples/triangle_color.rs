use gl_wrapper::geometry::{VertexAttribute, VertexLayout};
use gl_wrapper::{Primitive, RenderContext};

use crate::renderer::{FrameRenderer, RendererState, SampleError};
use crate::samples::pass::Pass;
use crate::samples::triangle::TRIANGLE;
use crate::shaders::{A_COLOR, A_POSITION, COLOR_FRAG, COLOR_VERT};

/// Red, green and blue corners, one RGB triple per vertex.
#[rustfmt::skip]
pub const TRIANGLE_COLORS: [f32; 9] = [
    1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 1.0,
];

/// The triangle again, with colors interpolated between its corners.
///
/// Positions and colors share one interleaved buffer:
/// `x, y, r, g, b` per vertex.
pub struct TriangleColor {
    pass: Pass,
    vertices: Vec<f32>,
}

impl TriangleColor {
    pub fn new() -> Result<Self, SampleError> {
        let layout = VertexLayout::builder()
            .with_attribute(A_POSITION, VertexAttribute::Vec2)
            .with_attribute(A_COLOR, VertexAttribute::Vec3)
            .build()?;
        let vertices = layout.interleave(&[&TRIANGLE[..], &TRIANGLE_COLORS[..]])?;

        Ok(Self {
            pass: Pass::new(COLOR_VERT, COLOR_FRAG, layout, Primitive::Triangles),
            vertices,
        })
    }

    pub fn layout(&self) -> &VertexLayout {
        self.pass.layout()
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }
}

impl FrameRenderer for TriangleColor {
    fn on_surface_created(&mut self, _ctx: &mut dyn RenderContext) -> Result<(), SampleError> {
        self.pass.forget_context();
        Ok(())
    }

    fn on_surface_changed(&mut self, ctx: &mut dyn RenderContext, width: u32, height: u32) -> Result<(), SampleError> {
        self.pass.rebuild(ctx, width, height)
    }

    fn on_draw_frame(&mut self, ctx: &mut dyn RenderContext) -> Result<(), SampleError> {
        self.pass.draw(ctx, &self.vertices)?;
        Ok(())
    }

    fn tear_down(&mut self, ctx: &mut dyn RenderContext) {
        self.pass.tear_down(ctx);
    }

    fn state(&self) -> RendererState {
        self.pass.state()
    }
}
