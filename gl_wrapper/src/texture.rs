use thiserror::Error;
use tracing::debug;

use crate::context::{RenderContext, TextureFilter, TextureId, TextureParameters};
use crate::error::{GlError, ResourceKind};

/// A 2D texture living on the GPU.
///
/// Textures are released explicitly through [`Texture2D::delete`], since the
/// context that owns them is not reachable from `Drop`.
#[derive(Debug)]
pub struct Texture2D {
    id: TextureId,
    width: u32,
    height: u32,
    params: TextureParameters,
}

impl Texture2D {
    /// Creates a texture and uploads `data` into it. The texture is left
    /// bound to the active unit.
    pub fn new<C>(
        ctx: &mut C,
        width: u32,
        height: u32,
        data: &[u8],
        format: TextureFormats,
        filter: TextureFilter,
    ) -> Result<Self, TextureError>
    where
        C: RenderContext + ?Sized,
    {
        if (width as usize * height as usize * format.channels() as usize) != data.len() {
            return Err(TextureError::InvalidSrcLength);
        }

        let id = ctx
            .create_texture()
            .ok_or(GlError::ResourceCreation(ResourceKind::Texture))?;
        let params = TextureParameters::clamped(filter);

        ctx.bind_texture(Some(id));
        ctx.texture_parameters(params);
        ctx.tex_image_2d(width, height, data);

        debug!(texture = id.0, width, height, ?filter, "texture uploaded");

        Ok(Self {
            id,
            width,
            height,
            params,
        })
    }

    pub fn bind<C>(&self, ctx: &mut C, unit: u32)
    where
        C: RenderContext + ?Sized,
    {
        ctx.active_texture(unit);
        ctx.bind_texture(Some(self.id));
    }

    pub fn delete<C>(self, ctx: &mut C)
    where
        C: RenderContext + ?Sized,
    {
        ctx.delete_texture(self.id);
        debug!(texture = self.id.0, "texture released");
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn params(&self) -> TextureParameters {
        self.params
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
    #[error(transparent)]
    Gl(#[from] GlError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFormats {
    Rgba8,
}

impl TextureFormats {
    pub fn channels(&self) -> u8 {
        match self {
            TextureFormats::Rgba8 => 4,
        }
    }
}
