pub mod context;
pub mod error;
pub mod geometry;
pub mod program;
pub mod renderer;
pub mod texture;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::{
    BlendFactor, Location, Primitive, ProgramId, RenderContext, ShaderId, ShaderStage, TextureFilter,
    TextureId, TextureParameters,
};
pub use error::{GlError, ResourceKind};

/// Size in bytes of one vertex component. All vertex data is packed `f32`.
pub const FLOAT_SIZE: usize = std::mem::size_of::<f32>();
