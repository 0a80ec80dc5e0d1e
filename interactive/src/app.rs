use glutin::config::{Api, Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;

use thiserror::Error;

use tracing::{error, info, warn};

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::renderer::GlRenderer;

use gles2_samples::SampleRunner;

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    runner: SampleRunner,
}

impl App {
    pub fn new(runner: SampleRunner, width: u32, height: u32) -> Result<Self, AppError> {
        let (width, height) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(AppError::ZeroSize(width, height)),
        };

        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(width.get(), height.get())))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title(runner.sample().title());
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new()
            .with_api(Api::GLES2)
            .with_alpha_size(8);

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best })
                    .unwrap()
            })
            .map_err(|e| AppError::Display(e.to_string()))?;
        let window = window.ok_or(AppError::NoWindow)?;

        let gl_display = gl_config.display();
        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(2, 0))))
            .build(Some(window.raw_window_handle()));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        info!(sample = %runner.sample(), "GL ES 2.0 context ready");

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            runner,
        })
    }

    pub fn run(mut self) -> ! {
        let mut gl_renderer = GlRenderer::new();
        let mut surface_live = false;

        self.event_loop
            .run(move |event, _window_target, control_flow| {
                // a failed sample has nothing left to animate
                *control_flow = if self.runner.is_failed() {
                    ControlFlow::Wait
                } else {
                    ControlFlow::Poll
                };
                match event {
                    Event::Resumed => {
                        if !surface_live {
                            let (width, height): (u32, u32) =
                                self.gl_window.window.inner_size().into();
                            self.runner.surface_created(&mut gl_renderer);
                            self.runner.surface_changed(&mut gl_renderer, width, height);
                            surface_live = true;
                        }
                    }
                    Event::Suspended => {
                        self.runner.pause(&mut gl_renderer);
                        surface_live = false;
                    }
                    Event::MainEventsCleared => {
                        if surface_live && !self.runner.is_failed() {
                            self.gl_window.window.request_redraw();
                        }
                    }
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::Resized(size) => {
                            if let (Some(w), Some(h)) =
                                (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                            {
                                self.gl_window.surface.resize(&self.gl_context, w, h);
                                if surface_live {
                                    self.runner
                                        .surface_changed(&mut gl_renderer, size.width, size.height);
                                }
                            }
                        }
                        WindowEvent::CloseRequested => {
                            self.runner.pause(&mut gl_renderer);
                            surface_live = false;
                            info!(frames = self.runner.frames(), "exiting");
                            control_flow.set_exit();
                        }
                        _ => (),
                    },
                    Event::RedrawRequested(_) => {
                        if !surface_live {
                            return;
                        }

                        self.runner.draw_frame(&mut gl_renderer);

                        if let Err(e) = self.gl_window.surface.swap_buffers(&self.gl_context) {
                            error!("could not swap buffers: {e}");
                        }
                    }
                    _ => (),
                }
            })
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let (width, height) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                warn!(width, height, "window reported an empty size");
                return Err(AppError::ZeroSize(width, height));
            }
        };

        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window.raw_window_handle(),
            width,
            height,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not create display: {0}")]
    Display(String),
    #[error("display was created without a window")]
    NoWindow,
    #[error("window size {0}x{1} is empty")]
    ZeroSize(u32, u32),
    #[error(transparent)]
    Gl(#[from] glutin::error::Error),
}
