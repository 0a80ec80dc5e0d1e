use cgmath::{Matrix4, Vector4};

/// Maps pixel coordinates (origin top-left, +y down) onto normalized device
/// coordinates (origin center, +y up).
///
/// Built once per surface size and left alone until the next resize.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenTransform {
    width: u32,
    height: u32,
    matrix: Matrix4<f32>,
}

impl ScreenTransform {
    /// `width` and `height` must be positive.
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);

        // cgmath takes the elements column by column, which is also the
        // order GL expects for `uScreen`.
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            2.0 / w,  0.0,      0.0, 0.0,
            0.0,     -2.0 / h,  0.0, 0.0,
            0.0,      0.0,      0.0, 0.0,
            -1.0,     1.0,      0.0, 1.0,
        );

        Self {
            width,
            height,
            matrix,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }

    /// Column-major elements, ready for a `mat4` uniform.
    pub fn to_columns(&self) -> [f32; 16] {
        let columns: &[f32; 16] = self.matrix.as_ref();
        *columns
    }

    /// Transforms a pixel position the way the vertex shaders do.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let v = self.matrix * Vector4::new(x, y, 0.0, 1.0);
        (v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5
    }

    #[test]
    fn corners_map_to_ndc_corners() {
        for (w, h) in [(1, 1), (300, 170), (1920, 1080), (7, 4000)] {
            let t = ScreenTransform::new(w, h);

            assert!(close(t.apply(0.0, 0.0), (-1.0, 1.0)));
            assert!(close(t.apply(w as f32, h as f32), (1.0, -1.0)));
            assert!(close(t.apply(w as f32 / 2.0, h as f32 / 2.0), (0.0, 0.0)));
        }
    }

    #[test]
    fn triangle_tip_on_small_surface() {
        let t = ScreenTransform::new(300, 170);
        let (x, y) = t.apply(200.0, 170.0);

        assert!((x - 1.0 / 3.0).abs() < 1e-5);
        assert!((y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn columns_match_gl_layout() {
        let t = ScreenTransform::new(200, 100);

        #[rustfmt::skip]
        let expected = [
            0.01,  0.0,  0.0, 0.0,
            0.0,  -0.02, 0.0, 0.0,
            0.0,   0.0,  0.0, 0.0,
            -1.0,  1.0,  0.0, 1.0,
        ];

        assert_eq!(t.to_columns(), expected);
    }
}
