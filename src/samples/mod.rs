use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::image::{Checkerboard, ImageSource};
use crate::renderer::{FrameRenderer, SampleError};

mod flat_clear;
mod pass;
mod textured_quad;
mod triangle;
mod triangle_color;

pub use flat_clear::FlatClear;
pub use textured_quad::{TexturedQuad, QUAD_POSITIONS, QUAD_TEX_COORDS, TEXTURE_UNIT};
pub use triangle::{Triangle, TRIANGLE};
pub use triangle_color::{TriangleColor, TRIANGLE_COLORS};

/// The four demos, in picker order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sample {
    FlatClear,
    Triangle,
    TriangleColor,
    Texture,
}

/// Inputs some samples need from the host.
#[derive(Default)]
pub struct SampleConfig {
    /// Seed for the flat-clear colors; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Image for the textured quad; a checkerboard when `None`.
    pub image: Option<Box<dyn ImageSource>>,
}

impl Sample {
    pub const ALL: [Sample; 4] = [
        Sample::FlatClear,
        Sample::Triangle,
        Sample::TriangleColor,
        Sample::Texture,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sample::FlatClear => "flat-clear",
            Sample::Triangle => "triangle",
            Sample::TriangleColor => "triangle-color",
            Sample::Texture => "texture",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Sample::FlatClear => "Flat clear",
            Sample::Triangle => "Solid triangle",
            Sample::TriangleColor => "Color-interpolated triangle",
            Sample::Texture => "Textured quad",
        }
    }

    pub fn create(self, config: SampleConfig) -> Result<Box<dyn FrameRenderer>, SampleError> {
        let renderer: Box<dyn FrameRenderer> = match self {
            Sample::FlatClear => match config.seed {
                Some(seed) => Box::new(FlatClear::seeded(seed)),
                None => Box::new(FlatClear::new()),
            },
            Sample::Triangle => Box::new(Triangle::new()?),
            Sample::TriangleColor => Box::new(TriangleColor::new()?),
            Sample::Texture => {
                let image: Box<dyn ImageSource> = match config.image {
                    Some(image) => image,
                    None => Box::new(Checkerboard::default()),
                };
                Box::new(TexturedQuad::new(image)?)
            }
        };

        Ok(renderer)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sample `{0}`")]
pub struct UnknownSample(pub String);

impl FromStr for Sample {
    type Err = UnknownSample;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sample::ALL
            .into_iter()
            .find(|sample| sample.name() == s)
            .ok_or_else(|| UnknownSample(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for sample in Sample::ALL {
            assert_eq!(sample.name().parse::<Sample>(), Ok(sample));
        }
        assert_eq!("Epilepsy".parse::<Sample>(), Err(UnknownSample("Epilepsy".into())));
    }

    #[test]
    fn every_sample_can_be_created() {
        for sample in Sample::ALL {
            let renderer = sample.create(SampleConfig::default()).unwrap();
            assert_eq!(renderer.state(), crate::renderer::RendererState::Uninitialized);
        }
    }
}
