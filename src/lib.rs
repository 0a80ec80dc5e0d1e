//! Four small OpenGL ES 2.0 samples sharing one shader-program lifecycle:
//! a randomly flashing clear color, a solid triangle, a triangle with
//! per-vertex colors and a textured quad.
//!
//! Each sample is a [`FrameRenderer`] driven by a host through the surface
//! callbacks (`created`, `changed`, `draw`, `tear_down`). Every GL call goes
//! through an explicit [`gl_wrapper::RenderContext`], so the same renderers
//! run on a real context or on the recording context used in tests.

pub mod image;
pub mod renderer;
pub mod runner;
pub mod samples;
pub mod shaders;
pub mod transform;

pub use image::{Checkerboard, ImageSource, RgbaImage};
pub use renderer::{FrameRenderer, RendererState, SampleError};
pub use runner::SampleRunner;
pub use samples::{Sample, SampleConfig};
pub use transform::ScreenTransform;
