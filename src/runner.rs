use tracing::{debug, error, info};

use gl_wrapper::RenderContext;

use crate::renderer::{FrameRenderer, RendererState, SampleError};
use crate::samples::Sample;

/// The host's error boundary around one sample.
///
/// Surface events go through here instead of straight to the renderer. A
/// failing event is logged once, the renderer is torn down and the sample
/// is marked failed; every later event except `pause` is ignored. Nothing
/// propagates past this point.
pub struct SampleRunner {
    sample: Sample,
    renderer: Box<dyn FrameRenderer>,
    failure: Option<SampleError>,
    frames: u64,
}

impl SampleRunner {
    pub fn new(sample: Sample, renderer: Box<dyn FrameRenderer>) -> Self {
        Self {
            sample,
            renderer,
            failure: None,
            frames: 0,
        }
    }

    pub fn sample(&self) -> Sample {
        self.sample
    }

    pub fn state(&self) -> RendererState {
        self.renderer.state()
    }

    pub fn failure(&self) -> Option<&SampleError> {
        self.failure.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Frames drawn successfully so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn surface_created(&mut self, ctx: &mut dyn RenderContext) {
        debug!(sample = %self.sample, "surface created");
        self.guard(ctx, "surface created", |renderer, ctx| renderer.on_surface_created(ctx));
    }

    pub fn surface_changed(&mut self, ctx: &mut dyn RenderContext, width: u32, height: u32) {
        debug!(sample = %self.sample, width, height, "surface changed");
        self.guard(ctx, "surface changed", |renderer, ctx| {
            renderer.on_surface_changed(ctx, width, height)
        });
    }

    pub fn draw_frame(&mut self, ctx: &mut dyn RenderContext) {
        if self.guard(ctx, "draw frame", |renderer, ctx| renderer.on_draw_frame(ctx)) {
            self.frames += 1;
        }
    }

    /// Releases the renderer's GPU objects. Runs even after a failure.
    pub fn pause(&mut self, ctx: &mut dyn RenderContext) {
        debug!(sample = %self.sample, frames = self.frames, "pausing");
        self.renderer.tear_down(ctx);
    }

    fn guard<F>(&mut self, ctx: &mut dyn RenderContext, event: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut dyn FrameRenderer, &mut dyn RenderContext) -> Result<(), SampleError>,
    {
        if self.failure.is_some() {
            return false;
        }

        match f(self.renderer.as_mut(), &mut *ctx) {
            Ok(()) => true,
            Err(e) => {
                error!(sample = %self.sample, event, error = %e, "sample failed");
                self.renderer.tear_down(ctx);
                info!(sample = %self.sample, "sample stopped; other samples are unaffected");
                self.failure = Some(e);
                false
            }
        }
    }
}
