use tracing::debug;

use gl_wrapper::geometry::{VertexAttribute, VertexLayout};
use gl_wrapper::program::ShaderProgram;
use gl_wrapper::texture::{Texture2D, TextureFormats};
use gl_wrapper::{BlendFactor, Primitive, RenderContext, TextureFilter};

use crate::image::ImageSource;
use crate::renderer::{FrameRenderer, RendererState, SampleError};
use crate::samples::pass::Pass;
use crate::shaders::{A_POSITION, A_TEX_POS, TEXTURE_FRAG, TEXTURE_VERT, U_TEXTURE};

/// Corners of the quad in strip order, drawn as a "Z".
#[rustfmt::skip]
pub const QUAD_POSITIONS: [f32; 8] = [
    50.0, 100.0,
    50.0, 300.0,
    300.0, 100.0,
    300.0, 300.0,
];

/// Texture coordinates per corner, origin bottom-left.
#[rustfmt::skip]
pub const QUAD_TEX_COORDS: [f32; 8] = [
    0.0, 0.0,
    0.0, 1.0,
    1.0, 0.0,
    1.0, 1.0,
];

pub const TEXTURE_UNIT: u32 = 0;

/// An image on a quad, alpha-blended over white.
///
/// The texture belongs to the GL context: it is created by
/// `on_surface_created`, survives program rebuilds, and is released by
/// `tear_down`.
pub struct TexturedQuad {
    pass: Pass,
    vertices: Vec<f32>,
    source: Box<dyn ImageSource>,
    texture: Option<Texture2D>,
}

impl TexturedQuad {
    pub fn new(source: Box<dyn ImageSource>) -> Result<Self, SampleError> {
        let layout = VertexLayout::builder()
            .with_attribute(A_POSITION, VertexAttribute::Vec2)
            .with_attribute(A_TEX_POS, VertexAttribute::Vec2)
            .build()?;
        let vertices = layout.interleave(&[&QUAD_POSITIONS[..], &QUAD_TEX_COORDS[..]])?;

        Ok(Self {
            pass: Pass::new(TEXTURE_VERT, TEXTURE_FRAG, layout, Primitive::TriangleStrip),
            vertices,
            source,
            texture: None,
        })
    }

    pub fn layout(&self) -> &VertexLayout {
        self.pass.layout()
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn texture(&self) -> Option<&Texture2D> {
        self.texture.as_ref()
    }
}

fn bind_texture(ctx: &mut dyn RenderContext, program: &ShaderProgram, texture: &Texture2D) {
    texture.bind(ctx, TEXTURE_UNIT);

    if let Some(location) = program.uniform_location(&*ctx, U_TEXTURE) {
        ctx.uniform_1i(location, TEXTURE_UNIT as i32);
    }

    ctx.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
    ctx.enable_blend();
}

impl FrameRenderer for TexturedQuad {
    fn on_surface_created(&mut self, ctx: &mut dyn RenderContext) -> Result<(), SampleError> {
        // a new context; the previous objects went away with the old one
        self.pass.forget_context();
        self.texture = None;

        let image = self.source.decode()?;
        let texture = Texture2D::new(
            ctx,
            image.width(),
            image.height(),
            image.pixels(),
            TextureFormats::Rgba8,
            TextureFilter::Nearest,
        )?;

        debug!(width = image.width(), height = image.height(), "releasing decoded image");
        drop(image);

        self.texture = Some(texture);

        Ok(())
    }

    fn on_surface_changed(&mut self, ctx: &mut dyn RenderContext, width: u32, height: u32) -> Result<(), SampleError> {
        let Some(texture) = self.texture.as_ref() else {
            return Err(SampleError::MissingTexture);
        };

        self.pass.rebuild(ctx, width, height)?;
        bind_texture(ctx, self.pass.program(), texture);

        Ok(())
    }

    fn on_draw_frame(&mut self, ctx: &mut dyn RenderContext) -> Result<(), SampleError> {
        let texture = self.texture.as_ref().ok_or(SampleError::NotReady)?;

        self.pass.draw_with(ctx, &self.vertices, |ctx, program| {
            bind_texture(ctx, program, texture);
        })?;

        Ok(())
    }

    fn tear_down(&mut self, ctx: &mut dyn RenderContext) {
        self.pass.tear_down(ctx);

        if let Some(texture) = self.texture.take() {
            texture.delete(ctx);
        }
    }

    fn state(&self) -> RendererState {
        self.pass.state()
    }
}
