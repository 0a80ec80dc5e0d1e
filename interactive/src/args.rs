use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use gles2_samples::Sample;

#[derive(Debug, Parser)]
pub struct ArgsInteractive {
    /// Sample to run
    #[arg(value_enum, default_value_t = SampleArg::Triangle)]
    pub sample: SampleArg,
    /// Initial window width in pixels
    #[arg(long, default_value_t = 480)]
    pub width: u32,
    /// Initial window height in pixels
    #[arg(long, default_value_t = 320)]
    pub height: u32,
    /// PNG shown by the texture sample instead of the built-in one
    #[arg(long)]
    pub texture: Option<PathBuf>,
    /// Seed for the flat-clear colors
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SampleArg {
    FlatClear,
    Triangle,
    TriangleColor,
    Texture,
}

impl From<SampleArg> for Sample {
    fn from(s: SampleArg) -> Self {
        match s {
            SampleArg::FlatClear => Self::FlatClear,
            SampleArg::Triangle => Self::Triangle,
            SampleArg::TriangleColor => Self::TriangleColor,
            SampleArg::Texture => Self::Texture,
        }
    }
}
