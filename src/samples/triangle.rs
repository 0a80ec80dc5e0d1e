use gl_wrapper::geometry::{VertexAttribute, VertexLayout};
use gl_wrapper::{Primitive, RenderContext};

use crate::renderer::{FrameRenderer, RendererState, SampleError};
use crate::samples::pass::Pass;
use crate::shaders::{A_POSITION, POSITION_VERT, RED_FRAG};
use crate::transform::ScreenTransform;

/// Pixel-space corners of the triangle, `x, y` per vertex.
#[rustfmt::skip]
pub const TRIANGLE: [f32; 6] = [
    50.0, 100.0,
    300.0, 100.0,
    200.0, 170.0,
];

/// A solid red triangle on white.
pub struct Triangle {
    pass: Pass,
    vertices: Vec<f32>,
}

impl Triangle {
    pub fn new() -> Result<Self, SampleError> {
        let layout = VertexLayout::builder()
            .with_attribute(A_POSITION, VertexAttribute::Vec2)
            .build()?;

        Ok(Self {
            pass: Pass::new(POSITION_VERT, RED_FRAG, layout, Primitive::Triangles),
            vertices: TRIANGLE.to_vec(),
        })
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// The transform of the current surface, once configured.
    pub fn transform(&self) -> Option<&ScreenTransform> {
        self.pass.transform()
    }
}

impl FrameRenderer for Triangle {
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

#[cfg(test)]
mod tests {
    use super::*;
    use gl_wrapper::testing::{Call, RecordingContext};

    #[test]
    fn draws_three_vertices_as_triangle_list() {
        let mut ctx = RecordingContext::new();
        let mut sample = Triangle::new().unwrap();

        sample.on_surface_changed(&mut ctx, 300, 170).unwrap();
        sample.on_draw_frame(&mut ctx).unwrap();

        let draw = &ctx.draws()[0];
        assert_eq!(draw.primitive, Primitive::Triangles);
        assert_eq!(draw.first, 0);
        assert_eq!(draw.count, 3);
        assert_eq!(draw.vertices, TRIANGLE.to_vec());
        assert!(ctx.errors().is_empty());

        let (x, y) = sample.transform().unwrap().apply(200.0, 170.0);
        assert!((x - 1.0 / 3.0).abs() < 1e-6);
        assert!((y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn positions_are_tightly_packed() {
        let mut ctx = RecordingContext::new();
        let mut sample = Triangle::new().unwrap();

        sample.on_surface_changed(&mut ctx, 300, 170).unwrap();
        sample.on_draw_frame(&mut ctx).unwrap();

        let pointers: Vec<_> = ctx
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::VertexAttribPointer { .. }))
            .collect();
        assert_eq!(pointers.len(), 1);
        assert!(matches!(
            pointers[0],
            Call::VertexAttribPointer {
                components: 2,
                stride: 8,
                offset: 0,
                ..
            }
        ));
    }

    #[test]
    fn clears_white_before_drawing() {
        let mut ctx = RecordingContext::new();
        let mut sample = Triangle::new().unwrap();

        sample.on_surface_changed(&mut ctx, 640, 480).unwrap();
        sample.on_draw_frame(&mut ctx).unwrap();

        assert_eq!(ctx.clears(), &[[1.0, 1.0, 1.0, 1.0]]);
        let clear = ctx.calls().iter().position(|c| *c == Call::Clear).unwrap();
        let draw = ctx
            .calls()
            .iter()
            .position(|c| matches!(c, Call::DrawArrays { .. }))
            .unwrap();
        assert!(clear < draw);
    }
}
