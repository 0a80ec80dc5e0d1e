use thiserror::Error;

use gl_wrapper::geometry::LayoutError;
use gl_wrapper::texture::TextureError;
use gl_wrapper::{GlError, RenderContext};

/// Lifecycle of a [`FrameRenderer`].
///
/// `Uninitialized -> Ready` on a successful `on_surface_changed`, which may
/// also run again from `Ready` (resize) or `Destroyed` (resume).
/// `tear_down` always lands in `Destroyed`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RendererState {
    Uninitialized,
    Ready,
    Destroyed,
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    Gl(#[from] GlError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("could not load image asset: {0}")]
    Asset(String),
    #[error("surface size {0}x{1} is not drawable")]
    InvalidSurfaceSize(u32, u32),
    #[error("surface changed before a texture was created")]
    MissingTexture,
    #[error("draw requested before the surface was configured")]
    NotReady,
}

/// The host-facing surface contract.
///
/// The host calls these serially from its render thread with the GL context
/// current: `on_surface_created` once per context, `on_surface_changed` on
/// creation and every resize, `on_draw_frame` once per display refresh, and
/// `tear_down` when it pauses.
pub trait FrameRenderer {
    /// Acquires objects that live as long as the GL context.
    fn on_surface_created(&mut self, _ctx: &mut dyn RenderContext) -> Result<(), SampleError> {
        Ok(())
    }

    /// (Re)builds the program and everything that depends on the viewport.
    fn on_surface_changed(&mut self, ctx: &mut dyn RenderContext, width: u32, height: u32) -> Result<(), SampleError>;

    fn on_draw_frame(&mut self, ctx: &mut dyn RenderContext) -> Result<(), SampleError>;

    /// Releases everything the renderer owns. Idempotent.
    fn tear_down(&mut self, ctx: &mut dyn RenderContext);

    fn state(&self) -> RendererState;
}

pub(crate) fn check_surface(width: u32, height: u32) -> Result<(), SampleError> {
    if width == 0 || height == 0 {
        return Err(SampleError::InvalidSurfaceSize(width, height));
    }
    Ok(())
}
