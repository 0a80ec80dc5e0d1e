use gl_wrapper::testing::RecordingContext;
use gl_wrapper::{BlendFactor, Primitive, TextureFilter};

use gles2_samples::samples::{
    TexturedQuad, TriangleColor, QUAD_POSITIONS, QUAD_TEX_COORDS, TRIANGLE, TRIANGLE_COLORS,
};
use gles2_samples::{
    Checkerboard, FrameRenderer, RendererState, Sample, SampleConfig, ScreenTransform,
};

fn create(sample: Sample) -> Box<dyn FrameRenderer> {
    sample
        .create(SampleConfig {
            seed: Some(7),
            image: None,
        })
        .unwrap()
}

#[test]
fn every_sample_draws_at_any_surface_size() {
    for sample in Sample::ALL {
        for (width, height) in [(1, 1), (300, 170), (480, 320), (1920, 1080)] {
            let mut ctx = RecordingContext::new();
            let mut renderer = create(sample);

            renderer.on_surface_created(&mut ctx).unwrap();
            renderer.on_surface_changed(&mut ctx, width, height).unwrap();
            renderer.on_draw_frame(&mut ctx).unwrap();

            assert_eq!(renderer.state(), RendererState::Ready, "{sample}");
            assert_eq!(ctx.viewport_value(), Some((0, 0, width, height)), "{sample}");
            assert_eq!(ctx.clears().len(), 1, "{sample}");
            assert!(ctx.errors().is_empty(), "{sample}: {:?}", ctx.errors());
        }
    }
}

#[test]
fn repeated_surface_changes_keep_one_program() {
    for sample in Sample::ALL {
        let mut ctx = RecordingContext::new();
        let mut renderer = create(sample);

        renderer.on_surface_created(&mut ctx).unwrap();
        for size in [100, 200, 300] {
            renderer.on_surface_changed(&mut ctx, size, size).unwrap();
            renderer.on_draw_frame(&mut ctx).unwrap();
        }

        let expected = if sample == Sample::FlatClear { 0 } else { 1 };
        assert_eq!(ctx.live_programs(), expected, "{sample}");
        assert_eq!(ctx.live_shaders(), expected * 2, "{sample}");
        assert!(ctx.errors().is_empty(), "{sample}: {:?}", ctx.errors());
    }
}

#[test]
fn tear_down_is_safe_before_setup_and_when_repeated() {
    for sample in Sample::ALL {
        let mut ctx = RecordingContext::new();
        let mut renderer = create(sample);

        renderer.tear_down(&mut ctx);
        renderer.tear_down(&mut ctx);
        assert_eq!(renderer.state(), RendererState::Destroyed, "{sample}");

        renderer.on_surface_created(&mut ctx).unwrap();
        renderer.on_surface_changed(&mut ctx, 64, 64).unwrap();
        renderer.tear_down(&mut ctx);
        renderer.tear_down(&mut ctx);

        assert_eq!(ctx.live_programs(), 0, "{sample}");
        assert_eq!(ctx.live_shaders(), 0, "{sample}");
        assert_eq!(ctx.live_textures(), 0, "{sample}");
        assert!(ctx.errors().is_empty(), "{sample}: {:?}", ctx.errors());
    }
}

#[test]
fn drawing_after_tear_down_is_refused() {
    for sample in Sample::ALL {
        let mut ctx = RecordingContext::new();
        let mut renderer = create(sample);

        renderer.on_surface_created(&mut ctx).unwrap();
        renderer.on_surface_changed(&mut ctx, 64, 64).unwrap();
        renderer.tear_down(&mut ctx);

        assert!(renderer.on_draw_frame(&mut ctx).is_err(), "{sample}");
        assert!(ctx.draws().is_empty(), "{sample}");
    }
}

#[test]
fn zero_sized_surface_is_rejected() {
    for sample in Sample::ALL {
        let mut ctx = RecordingContext::new();
        let mut renderer = create(sample);

        renderer.on_surface_created(&mut ctx).unwrap();

        assert!(renderer.on_surface_changed(&mut ctx, 0, 100).is_err(), "{sample}");
        assert_ne!(renderer.state(), RendererState::Ready, "{sample}");
        renderer.tear_down(&mut ctx);
    }
}

#[test]
fn surface_loss_and_recreation_starts_clean() {
    for sample in Sample::ALL {
        let mut ctx = RecordingContext::new();
        let mut renderer = create(sample);

        for _ in 0..3 {
            renderer.on_surface_created(&mut ctx).unwrap();
            renderer.on_surface_changed(&mut ctx, 480, 320).unwrap();
            renderer.on_draw_frame(&mut ctx).unwrap();
            renderer.tear_down(&mut ctx);
        }

        assert_eq!(ctx.live_programs(), 0, "{sample}");
        assert_eq!(ctx.live_textures(), 0, "{sample}");
        assert!(ctx.errors().is_empty(), "{sample}: {:?}", ctx.errors());
    }
}

#[test]
fn triangle_in_a_300_by_170_surface_touches_the_bottom_edge() {
    let mut ctx = RecordingContext::new();
    let mut renderer = create(Sample::Triangle);

    renderer.on_surface_changed(&mut ctx, 300, 170).unwrap();
    renderer.on_draw_frame(&mut ctx).unwrap();

    let draw = &ctx.draws()[0];
    assert_eq!(draw.primitive, Primitive::Triangles);
    assert_eq!(draw.count, 3);
    assert_eq!(draw.vertices, TRIANGLE.to_vec());

    let screen = ctx.uniform_matrix("uScreen").unwrap();
    assert_eq!(screen, ScreenTransform::new(300, 170).to_columns());

    let (x, y) = ScreenTransform::new(300, 170).apply(200.0, 170.0);
    assert!((x - 1.0 / 3.0).abs() < 1e-6);
    assert!((y + 1.0).abs() < 1e-6);
}

#[test]
fn color_buffer_splits_back_into_positions_and_colors() {
    let sample = TriangleColor::new().unwrap();

    let attributes = sample.layout().deinterleave(sample.vertices()).unwrap();

    assert_eq!(attributes, vec![TRIANGLE.to_vec(), TRIANGLE_COLORS.to_vec()]);
}

#[test]
fn quad_buffer_splits_back_into_positions_and_tex_coords() {
    let sample = TexturedQuad::new(Box::new(Checkerboard::default())).unwrap();

    let attributes = sample.layout().deinterleave(sample.vertices()).unwrap();

    assert_eq!(attributes, vec![QUAD_POSITIONS.to_vec(), QUAD_TEX_COORDS.to_vec()]);
}

#[test]
fn textured_quad_blends_on_every_draw() {
    let mut ctx = RecordingContext::new();
    let mut renderer = create(Sample::Texture);

    renderer.on_surface_created(&mut ctx).unwrap();
    renderer.on_surface_changed(&mut ctx, 480, 320).unwrap();
    for _ in 0..3 {
        renderer.on_draw_frame(&mut ctx).unwrap();
    }

    assert_eq!(ctx.draws().len(), 3);
    for draw in ctx.draws() {
        assert_eq!(draw.primitive, Primitive::TriangleStrip);
        assert_eq!(draw.count, 4);
        assert_eq!(draw.blend, Some((BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)));

        let texture = draw.texture.unwrap();
        let params = ctx.texture_params(texture).unwrap();
        assert_eq!(params.min_filter, TextureFilter::Nearest);
        assert_eq!(params.mag_filter, TextureFilter::Nearest);
    }
    assert_eq!(ctx.uniform_int("uTexture"), Some(0));
    assert_eq!(ctx.clear_color_value(), [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn seeded_flat_clear_repeats_its_colors() {
    let run = || {
        let mut ctx = RecordingContext::new();
        let mut renderer = create(Sample::FlatClear);
        renderer.on_surface_changed(&mut ctx, 32, 32).unwrap();
        for _ in 0..4 {
            renderer.on_draw_frame(&mut ctx).unwrap();
        }
        ctx.clears().to_vec()
    };

    let first = run();
    assert_eq!(first, run());
    for color in first {
        assert!(color[..3].iter().all(|c| (0.0..1.0).contains(c)));
        assert_eq!(color[3], 1.0);
    }
}

#[test]
fn lost_context_objects_are_never_deleted_in_the_new_one() {
    for sample in Sample::ALL {
        let mut lost = RecordingContext::new();
        let mut renderer = create(sample);
        renderer.on_surface_created(&mut lost).unwrap();
        renderer.on_surface_changed(&mut lost, 480, 320).unwrap();
        renderer.on_draw_frame(&mut lost).unwrap();

        let mut ctx = RecordingContext::new();
        renderer.on_surface_created(&mut ctx).unwrap();
        assert!(renderer.on_draw_frame(&mut ctx).is_err(), "{sample}");
        renderer.on_surface_changed(&mut ctx, 480, 320).unwrap();
        renderer.on_draw_frame(&mut ctx).unwrap();

        assert!(ctx.errors().is_empty(), "{sample}: {:?}", ctx.errors());
    }
}
