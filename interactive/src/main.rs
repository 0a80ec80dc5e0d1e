use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use gles2_samples::{Sample, SampleConfig, SampleRunner};

mod app;
mod args;
mod asset;

use app::App;
use args::ArgsInteractive;
use asset::PngImage;

fn main() -> ExitCode {
    initialise_tracing();

    // clion needs help in trait annotation
    let args = <ArgsInteractive as Parser>::parse();

    let sample: Sample = args.sample.into();
    let image = match args.texture {
        Some(path) => PngImage::File(path),
        None => PngImage::default(),
    };
    let config = SampleConfig {
        seed: args.seed,
        image: Some(Box::new(image)),
    };

    let renderer = match sample.create(config) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!(%sample, "could not create sample: {e}");
            return ExitCode::FAILURE;
        }
    };

    match App::new(SampleRunner::new(sample, renderer), args.width, args.height) {
        Ok(app) => app.run(),
        Err(e) => {
            error!("could not open a GL ES 2.0 window: {e}");
            ExitCode::FAILURE
        }
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
