use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use gl_wrapper::RenderContext;

use crate::renderer::{check_surface, FrameRenderer, RendererState, SampleError};

/// Clears the whole surface to a new random color every frame. No program,
/// no geometry.
pub struct FlatClear<R = SmallRng> {
    rng: R,
    state: RendererState,
}

impl FlatClear {
    /// Colors drawn from OS entropy; not reproducible.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for FlatClear {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FlatClear<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            state: RendererState::Uninitialized,
        }
    }

    /// Independent uniform draws in `[0, 1)` per channel, alpha 1.
    pub fn next_color(&mut self) -> [f32; 4] {
        [self.rng.gen(), self.rng.gen(), self.rng.gen(), 1.0]
    }
}

impl<R: Rng> FrameRenderer for FlatClear<R> {
    fn on_surface_created(&mut self, _ctx: &mut dyn RenderContext) -> Result<(), SampleError> {
        if self.state == RendererState::Ready {
            self.state = RendererState::Uninitialized;
        }
        Ok(())
    }

    fn on_surface_changed(&mut self, ctx: &mut dyn RenderContext, width: u32, height: u32) -> Result<(), SampleError> {
        check_surface(width, height)?;

        ctx.viewport(0, 0, width, height);
        self.state = RendererState::Ready;
        debug!(width, height, "flat clear ready");

        Ok(())
    }

    fn on_draw_frame(&mut self, ctx: &mut dyn RenderContext) -> Result<(), SampleError> {
        if self.state != RendererState::Ready {
            return Err(SampleError::NotReady);
        }

        let [r, g, b, a] = self.next_color();
        ctx.clear_color(r, g, b, a);
        ctx.clear();

        Ok(())
    }

    fn tear_down(&mut self, _ctx: &mut dyn RenderContext) {
        self.state = RendererState::Destroyed;
    }

    fn state(&self) -> RendererState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gl_wrapper::testing::RecordingContext;

    #[test]
    fn colors_stay_in_range() {
        let mut sample = FlatClear::seeded(7);

        for _ in 0..1000 {
            let [r, g, b, a] = sample.next_color();
            for c in [r, g, b] {
                assert!((0.0..=1.0).contains(&c));
            }
            assert_eq!(a, 1.0);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = FlatClear::seeded(42);
        let mut b = FlatClear::seeded(42);

        for _ in 0..10 {
            assert_eq!(a.next_color(), b.next_color());
        }
    }

    #[test]
    fn each_frame_clears_once() {
        let mut ctx = RecordingContext::new();
        let mut sample = FlatClear::seeded(1);

        sample.on_surface_changed(&mut ctx, 320, 240).unwrap();
        for _ in 0..3 {
            sample.on_draw_frame(&mut ctx).unwrap();
        }

        assert_eq!(ctx.viewport_value(), Some((0, 0, 320, 240)));
        assert_eq!(ctx.clears().len(), 3);
        assert!(ctx.draws().is_empty());
        assert!(ctx.clears().iter().all(|c| c[3] == 1.0));
    }

    #[test]
    fn draw_before_resize_is_rejected() {
        let mut ctx = RecordingContext::new();
        let mut sample = FlatClear::seeded(1);

        assert!(matches!(sample.on_draw_frame(&mut ctx), Err(SampleError::NotReady)));
        assert!(ctx.clears().is_empty());
    }
}
