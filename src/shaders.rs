//! GLSL ES 1.00 sources for the samples and the names that tie them to the
//! vertex layouts.

pub const U_SCREEN: &str = "uScreen";
pub const U_TEXTURE: &str = "uTexture";

pub const A_POSITION: &str = "aPosition";
pub const A_COLOR: &str = "aColor";
pub const A_TEX_POS: &str = "aTexPos";

/// Positions only, transformed by `uScreen`.
pub const POSITION_VERT: &str = include_str!("gl_shaders/position.vert.glsl");
/// Constant red.
pub const RED_FRAG: &str = include_str!("gl_shaders/red.frag.glsl");

/// Positions plus a per-vertex RGB color passed through as a varying.
pub const COLOR_VERT: &str = include_str!("gl_shaders/color.vert.glsl");
pub const COLOR_FRAG: &str = include_str!("gl_shaders/color.frag.glsl");

/// Positions plus texture coordinates, sampled from `uTexture`.
pub const TEXTURE_VERT: &str = include_str!("gl_shaders/texture.vert.glsl");
pub const TEXTURE_FRAG: &str = include_str!("gl_shaders/texture.frag.glsl");

#[cfg(test)]
mod tests {
    use super::*;

    fn declares(src: &str, name: &str) -> bool {
        src.lines()
            .any(|line| line.trim_end_matches(';').split_whitespace().last() == Some(name))
    }

    #[test]
    fn sources_declare_the_names_used_by_the_renderers() {
        assert!(declares(POSITION_VERT, U_SCREEN));
        assert!(declares(POSITION_VERT, A_POSITION));
        assert!(declares(COLOR_VERT, A_COLOR));
        assert!(declares(TEXTURE_VERT, A_TEX_POS));
        assert!(declares(TEXTURE_FRAG, U_TEXTURE));
    }
}
