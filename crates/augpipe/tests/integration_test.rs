//! End-to-end tests for the augmentation pipeline.
//! These drive the public API the way a training loop would.

use augpipe::prelude::*;
use augpipe::vision::blit;

fn ramp(shape: &[usize]) -> Tensor<f32> {
    let len: usize = shape.iter().product();
    Tensor::from_vec((0..len).map(|v| ((v * 7) % 23) as f32 / 23.0).collect(), shape).unwrap()
}

fn per_sample(values: &[f32]) -> Tensor<f32> {
    Tensor::from_vec(values.to_vec(), &[values.len()]).unwrap()
}

/// Low-frequency `[1, size, size, 1]` image with no symmetry under quarter turns.
fn smooth(size: usize) -> Tensor<f32> {
    let data = (0..size * size)
        .map(|i| {
            let (y, x) = ((i / size) as f32, (i % size) as f32);
            (0.4 * x + 0.1).sin() * (0.3 * y).cos() + 0.05 * x
        })
        .collect();
    Tensor::from_vec(data, &[1, size, size, 1]).unwrap()
}

/// Largest absolute difference over pixels at least `border` from every edge.
fn interior_gap(a: &Tensor<f32>, b: &Tensor<f32>, border: usize) -> f32 {
    let size = a.shape()[1];
    let mut gap = 0.0f32;
    for y in border..size - border {
        for x in border..size - border {
            let d = a.get(&[0, y, x, 0]).unwrap() - b.get(&[0, y, x, 0]).unwrap();
            gap = gap.max(d.abs());
        }
    }
    gap
}

/// Test 1: a default configuration is the identity
#[test]
fn test_all_weights_zero_is_identity() {
    let images = ramp(&[4, 9, 11, 3]);
    let pipe = AugmentPipe::new(AugmentConfig::default());
    for seed in 0..3 {
        let out = pipe.forward(&images, PrngKey::new(seed)).unwrap();
        assert_eq!(out.images, images);
        assert_eq!(out.labels.shape(), &[4, 0]);
    }
}

/// Test 2: same key, same everything
#[test]
fn test_same_key_is_bit_identical() {
    let images = ramp(&[3, 12, 12, 3]);
    let pipe = AugmentPipe::new(AugmentConfig::preset("bgc").unwrap().with_yflip(1.0));
    let a = pipe.forward(&images, PrngKey::new(77)).unwrap();
    let b = pipe.forward(&images, PrngKey::new(77)).unwrap();
    assert_eq!(a.images.to_vec(), b.images.to_vec());
    assert_eq!(a.labels.to_vec(), b.labels.to_vec());

    let c = pipe.forward(&images, PrngKey::new(78)).unwrap();
    assert_ne!(a.labels.to_vec(), c.labels.to_vec());
}

/// Test 3: label width depends on the configuration only
#[test]
fn test_label_width_is_config_function() {
    let images = ramp(&[2, 8, 8, 3]);
    for preset in AugmentPreset::ALL {
        let pipe = AugmentPipe::new(preset.config());
        let expected = pipe.label_width();
        for seed in [0, 1, 99] {
            let out = pipe.forward(&images, PrngKey::new(seed)).unwrap();
            assert_eq!(out.labels.shape(), &[2, expected], "{preset}");
        }
    }
    assert_eq!(AugmentPreset::Blit.config().label_width(), 5);
    assert_eq!(AugmentPreset::Geom.config().label_width(), 7);
    assert_eq!(AugmentPreset::Color.config().label_width(), 6);
    assert_eq!(AugmentPreset::Bgc.config().label_width(), 18);
}

/// Test 4: geometric warps restore the input size
#[test]
fn test_geometric_output_is_exact_size() {
    let pipe = AugmentPipe::new(AugmentConfig::preset("geom").unwrap());
    for shape in [[2, 12, 20, 3], [1, 5, 3, 1], [3, 16, 16, 3]] {
        let images = ramp(&shape);
        let out = pipe.forward(&images, PrngKey::new(3)).unwrap();
        assert_eq!(out.images.shape(), &shape);
        assert!(out.images.to_vec().iter().all(|v| v.is_finite()));
    }
}

/// Test 5: zero image under forced scaling stays zero
#[test]
fn test_zero_image_scale_scenario() {
    let pipe = AugmentPipe::new(AugmentConfig::new().with_scale(1.0, 0.2));
    let images = zeros::<f32>(&[2, 4, 4, 3]);
    let mut source = ScriptedSource::constant(0.0, 1.0, 0);
    let out = pipe
        .forward_with(&images, &mut source, PrngKey::new(0))
        .unwrap();
    assert_eq!(out.images.shape(), &[2, 4, 4, 3]);
    assert!(out.images.to_vec().iter().all(|&v| v == 0.0));
    assert_eq!(out.labels.shape(), &[2, 1]);
    assert_eq!(out.labels.to_vec(), vec![1.0, 1.0]);
}

/// Test 6: brightness adds w * std per channel
#[test]
fn test_brightness_only() {
    let pipe = AugmentPipe::new(AugmentConfig::new().with_brightness(1.0, 0.2));
    let images = ramp(&[2, 3, 3, 3]);

    let mut forced_on = ScriptedSource::constant(0.0, 1.0, 0);
    let out = pipe
        .forward_with(&images, &mut forced_on, PrngKey::new(0))
        .unwrap();
    for (a, b) in out.images.to_vec().iter().zip(images.to_vec()) {
        assert!((a - (b + 0.2)).abs() < 1e-6);
    }
    assert_eq!(out.labels.to_vec(), vec![1.0, 1.0]);

    let mut forced_off = ScriptedSource::constant(1.0, 1.0, 0);
    let out = pipe
        .forward_with(&images, &mut forced_off, PrngKey::new(0))
        .unwrap();
    assert_eq!(out.images, images);
    assert_eq!(out.labels.to_vec(), vec![0.0, 0.0]);
}

/// Test 7: a constant image survives the resampler when every gate fails
#[test]
fn test_constant_image_through_gated_off_geometry() {
    let pipe = AugmentPipe::new(AugmentConfig::new().with_scale(1.0, 0.2));
    let images = Tensor::full(&[1, 16, 16, 3], 0.42f32);
    let mut source = ScriptedSource::constant(1.0, 1.0, 0);
    let out = pipe
        .forward_with(&images, &mut source, PrngKey::new(0))
        .unwrap();
    assert_eq!(out.images.shape(), &[1, 16, 16, 3]);
    assert!(out.images.to_vec().iter().all(|v| (v - 0.42).abs() < 1e-3));
    assert_eq!(out.labels.to_vec(), vec![0.0]);
}

/// Test 8: flips and quarter turns form the expected groups
#[test]
fn test_blit_groups() {
    let images = ramp(&[2, 6, 6, 3]);
    let on = per_sample(&[1.0, 1.0]);

    let x2 = blit::xflip(&blit::xflip(&images, &on).unwrap(), &on).unwrap();
    assert_eq!(x2, images);
    let y2 = blit::yflip(&blit::yflip(&images, &on).unwrap(), &on).unwrap();
    assert_eq!(y2, images);

    let k = |img: &Tensor<f32>, w: f32| blit::rotate_int(img, &per_sample(&[w, w])).unwrap();
    assert_eq!(k(&k(&k(&k(&images, 1.0), 1.0), 1.0), 1.0), images);
    assert_eq!(k(&k(&images, 2.0), 2.0), images);
    assert_eq!(k(&k(&images, 1.0), 3.0), images);

    let zero = [0i64, 0];
    assert_eq!(blit::translate_int(&images, &zero, &zero).unwrap(), images);
}

/// Test 9: channel validation for the color stage
#[test]
fn test_two_channel_color_is_rejected() {
    let pipe = AugmentPipe::new(AugmentConfig::preset("color").unwrap());
    let images = zeros::<f32>(&[1, 4, 4, 2]);
    assert_eq!(
        pipe.forward(&images, PrngKey::new(0)),
        Err(Error::UnsupportedChannels { channels: 2 })
    );

    let gray = ramp(&[2, 4, 4, 1]);
    let out = pipe.forward(&gray, PrngKey::new(0)).unwrap();
    assert_eq!(out.images.shape(), &[2, 4, 4, 1]);
}

/// Test 10: a zero global multiplier disables every gate
#[test]
fn test_zero_p_blits_and_color_are_exact() {
    let config = AugmentConfig::preset("blit")
        .unwrap()
        .with_yflip(1.0)
        .with_brightness(1.0, 0.2)
        .with_contrast(1.0, 0.5)
        .with_p(0.0);
    let pipe = AugmentPipe::new(config);
    let images = ramp(&[3, 8, 8, 3]);
    let out = pipe.forward(&images, PrngKey::new(12)).unwrap();
    assert_eq!(out.images, images);
    assert!(out.labels.to_vec().iter().all(|&v| v == 0.0));
}

/// Test 11: scripted draws pin the label layout
#[test]
fn test_scripted_labels_follow_application_order() {
    let config = AugmentConfig::new()
        .with_xflip(1.0)
        .with_rotate_frac(1.0, 1.0)
        .with_hue(1.0, 1.0);
    let pipe = AugmentPipe::new(config);
    let images = ramp(&[1, 8, 8, 3]);

    let mut source = ScriptedSource::new()
        .with_draw(vec![1.0])
        .with_draw(vec![0.0])
        .with_draw(vec![0.5])
        .with_draw(vec![0.0])
        .with_draw(vec![0.5])
        .with_draw(vec![0.0]);
    let out = pipe
        .forward_with(&images, &mut source, PrngKey::new(0))
        .unwrap();
    assert_eq!(source.remaining(), 0);

    // xflip = 1, rotation and hue angles are zero
    assert_eq!(out.labels.shape(), &[1, 5]);
    let labels = out.labels.to_vec();
    assert_eq!(labels[0], 1.0);
    assert!(labels[1..].iter().all(|v| v.abs() < 1e-6));
}

/// Test 12: configuration loads from serde formats with defaults filled in
#[test]
fn test_config_serde() {
    let config: AugmentConfig =
        serde_json::from_str(r#"{"xflip": 1.0, "scale": 0.5, "scale_std": 0.1}"#).unwrap();
    assert_eq!(config.p, 1.0);
    assert_eq!(config.scale_std, 0.1);
    assert_eq!(config.aniso_rotate_prob, 0.5);
    assert_eq!(config.label_width(), 2);

    let json = serde_json::to_string(&AugmentPreset::Bgc.config()).unwrap();
    let back: AugmentConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, AugmentPreset::Bgc.config());

    let preset: AugmentPreset = serde_json::from_str(r#""geom""#).unwrap();
    assert_eq!(preset, AugmentPreset::Geom);
}

/// Test 13: every filter in the bank drives the resampler
#[test]
fn test_every_wavelet_resamples() {
    let images = ramp(&[1, 7, 10, 3]);
    for wavelet in Wavelet::ALL {
        let pipe = AugmentPipe::new(AugmentConfig::new().with_rotate_frac(1.0, 1.0))
            .with_filter(wavelet);
        let out = pipe.forward(&images, PrngKey::new(4)).unwrap();
        assert_eq!(out.images.shape(), &[1, 7, 10, 3], "{wavelet}");
    }
    assert_eq!("db4".parse::<Wavelet>().unwrap(), Wavelet::Db4);
}

/// Test 14: a fractional quarter turn lands where the exact quarter turn does
#[test]
fn test_rotate_frac_quarter_turn_matches_blit() {
    let images = smooth(16);
    let pipe = AugmentPipe::new(AugmentConfig::new().with_rotate_frac(1.0, 1.0));
    // u = 0.75 gives w = pi/2
    let mut source = ScriptedSource::new()
        .with_draw(vec![0.75])
        .with_draw(vec![0.0]);
    let out = pipe
        .forward_with(&images, &mut source, PrngKey::new(0))
        .unwrap();

    let quarter = blit::rotate_int(&images, &per_sample(&[1.0])).unwrap();
    let three_quarters = blit::rotate_int(&images, &per_sample(&[3.0])).unwrap();
    assert!(interior_gap(&out.images, &quarter, 4) < 0.05);
    assert!(interior_gap(&out.images, &three_quarters, 4) > 0.1);
}

/// Test 15: a one pixel fractional shift lands where the integer shift does
#[test]
fn test_translate_frac_whole_pixel_matches_blit() {
    let images = smooth(16);
    let pipe = AugmentPipe::new(AugmentConfig::new().with_translate_frac(1.0, 0.125));
    // wx * W * std = 0.5 * 16 * 0.125 = 1 pixel
    let mut source = ScriptedSource::new()
        .with_draw(vec![0.5, 0.0])
        .with_draw(vec![0.0]);
    let out = pipe
        .forward_with(&images, &mut source, PrngKey::new(0))
        .unwrap();

    let shifted = blit::translate_int(&images, &[1], &[0]).unwrap();
    let backwards = blit::translate_int(&images, &[-1], &[0]).unwrap();
    assert!(interior_gap(&out.images, &shifted, 4) < 1e-3);
    assert!(interior_gap(&out.images, &backwards, 4) > 0.1);
}

/// Test 16: rotating the stretch axis by pi/2 stretches the other image axis
#[test]
fn test_aniso_axis_rotation_swaps_stretch_axes() {
    let images = smooth(16);
    let pipe = AugmentPipe::new(AugmentConfig::new().with_aniso(1.0, 0.5, 0.5));
    let run = |images: &Tensor<f32>, rotate_gate: f32| {
        let mut source = ScriptedSource::new()
            .with_draw(vec![1.0])
            .with_draw(vec![0.75])
            .with_draw(vec![0.0])
            .with_draw(vec![rotate_gate]);
        pipe.forward_with(images, &mut source, PrngKey::new(0))
            .unwrap()
            .images
    };

    let rotated_axis = run(&images, 0.0);
    let transposed = images.transpose(1, 2).unwrap();
    let plain_on_transposed = run(&transposed, 1.0).transpose(1, 2).unwrap();
    let plain = run(&images, 1.0);

    assert!(interior_gap(&rotated_axis, &plain_on_transposed, 0) < 1e-4);
    assert!(interior_gap(&rotated_axis, &plain, 4) > 0.05);
}
