use crate::renderer::SampleError;

/// Decoded, tightly packed RGBA8 pixels, first row on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SampleError> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize * 4 {
            return Err(SampleError::Asset(format!(
                "{} bytes do not form a {width}x{height} RGBA image",
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Where the textured sample gets its image from. Decoding is the host's
/// job; the renderer only sees the resulting pixels.
pub trait ImageSource {
    fn decode(&self) -> Result<RgbaImage, SampleError>;
}

impl<F> ImageSource for F
where
    F: Fn() -> Result<RgbaImage, SampleError>,
{
    fn decode(&self) -> Result<RgbaImage, SampleError> {
        self()
    }
}

/// Procedural fallback image: opaque cells alternating with transparent
/// ones, so alpha blending is visible.
#[derive(Debug, Copy, Clone)]
pub struct Checkerboard {
    pub size: u32,
    pub cell: u32,
    pub color: [u8; 4],
}

impl Default for Checkerboard {
    fn default() -> Self {
        Self {
            size: 64,
            cell: 8,
            color: [200, 40, 40, 255],
        }
    }
}

impl ImageSource for Checkerboard {
    fn decode(&self) -> Result<RgbaImage, SampleError> {
        let cell = self.cell.max(1);
        let mut pixels = Vec::with_capacity(self.size as usize * self.size as usize * 4);

        for y in 0..self.size {
            for x in 0..self.size {
                if (x / cell + y / cell) % 2 == 0 {
                    pixels.extend_from_slice(&self.color);
                } else {
                    pixels.extend_from_slice(&[0, 0, 0, 0]);
                }
            }
        }

        RgbaImage::new(self.size, self.size, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates() {
        let image = Checkerboard {
            size: 4,
            cell: 2,
            color: [1, 2, 3, 4],
        }
        .decode()
        .unwrap();

        assert_eq!(image.pixels().len(), 64);
        assert_eq!(&image.pixels()[0..4], &[1, 2, 3, 4]);
        // third pixel of the first row starts the second cell
        assert_eq!(&image.pixels()[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn mismatched_pixels_are_rejected() {
        assert!(RgbaImage::new(2, 2, vec![0; 15]).is_err());
        assert!(RgbaImage::new(0, 2, Vec::new()).is_err());
    }
}
