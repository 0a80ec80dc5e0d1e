use std::io::Cursor;
use std::path::PathBuf;

use png::{ColorType, Decoder, Transformations};

use gles2_samples::{ImageSource, RgbaImage, SampleError};

const SKULL: &[u8] = include_bytes!("../assets/skull.png");

/// A PNG, either bundled or read from disk when the surface is created.
pub enum PngImage {
    Embedded(&'static [u8]),
    File(PathBuf),
}

impl Default for PngImage {
    fn default() -> Self {
        Self::Embedded(SKULL)
    }
}

impl ImageSource for PngImage {
    fn decode(&self) -> Result<RgbaImage, SampleError> {
        match self {
            PngImage::Embedded(bytes) => decode_png(bytes),
            PngImage::File(path) => {
                let bytes = std::fs::read(path)
                    .map_err(|e| SampleError::Asset(format!("{}: {e}", path.display())))?;
                decode_png(&bytes)
            }
        }
    }
}

fn decode_png(bytes: &[u8]) -> Result<RgbaImage, SampleError> {
    let mut decoder = Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(Transformations::normalize_to_color8());

    let mut reader = decoder
        .read_info()
        .map_err(|e| SampleError::Asset(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| SampleError::Asset(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let pixels = match info.color_type {
        ColorType::Rgba => buf,
        ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        ColorType::Indexed => {
            return Err(SampleError::Asset("indexed PNG was not expanded".to_string()))
        }
    };

    RgbaImage::new(info.width, info.height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_image_decodes() {
        let image = PngImage::default().decode().unwrap();

        assert_eq!((image.width(), image.height()), (32, 32));
        assert_eq!(image.pixels().len(), 32 * 32 * 4);
        // corners are transparent
        assert_eq!(image.pixels()[3], 0);
    }

    #[test]
    fn garbage_is_an_asset_error() {
        let err = PngImage::Embedded(b"not a png").decode().unwrap_err();

        assert!(matches!(err, SampleError::Asset(_)));
    }

    #[test]
    fn missing_file_is_an_asset_error() {
        let err = PngImage::File("/nonexistent/skull.png".into()).decode().unwrap_err();

        assert!(matches!(err, SampleError::Asset(_)));
    }
}
