//! Color Transforms
//!
//! Brightness, contrast, luma flip, hue rotation and saturation are all
//! affine maps of the RGB cube, so they compose into one 4x4 matrix per
//! sample that is applied to each pixel once.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::f32::consts::PI;

use augpipe_core::error::{Error, Result};
use augpipe_tensor::Tensor;

use crate::config::AugmentConfig;
use crate::labels::LabelCollector;
use crate::matrix::{matrix, rotate3d, scale3d, translate3d, Affine3, Param};
use crate::pipe::image_dims;
use crate::sampler::Sampler;

// 1/sqrt(3)
const LUMA: f32 = 0.577_350_26;

/// Unit luma axis `(1, 1, 1, 0) / sqrt(3)` in homogeneous RGB.
pub const LUMA_AXIS: [f32; 4] = [LUMA, LUMA, LUMA, 0.0];

/// Builds a 4x4 matrix whose entry `(i, j)` is `entry(a_i·a_j, δ_ij)`.
fn luma_matrix(entry: impl Fn(f32, f32) -> Param) -> Result<Affine3> {
    let rows = (0..4)
        .map(|i| {
            (0..4)
                .map(|j| {
                    let identity = if i == j { 1.0 } else { 0.0 };
                    entry(LUMA_AXIS[i] * LUMA_AXIS[j], identity)
                })
                .collect()
        })
        .collect();
    matrix(rows)
}

/// Left-multiplies `step` into a running color transform.
fn chain_left(acc: &mut Option<Affine3>, step: Affine3) -> Result<()> {
    *acc = Some(match acc.take() {
        None => step,
        Some(current) => step.matmul(&current)?,
    });
    Ok(())
}

fn param(t: &Tensor<f32>) -> Param {
    Param::Batch(t.to_vec())
}

// =============================================================================
// Composer
// =============================================================================

/// Samples the color effects into one matrix per sample.
pub fn compose(
    config: &AugmentConfig,
    sampler: &mut Sampler<'_>,
    labels: &mut LabelCollector,
) -> Result<Option<Affine3>> {
    let n = sampler.batch();
    let mut m: Option<Affine3> = None;

    if config.brightness > 0.0 {
        let w = sampler.normal(&[n])?;
        let w = sampler.gated("brightness", &w, config.brightness)?;
        let b = param(&w).map(|v| v * config.brightness_std);
        chain_left(&mut m, translate3d(&b, &b, &b)?)?;
        labels.push("brightness", &[&w])?;
    }

    if config.contrast > 0.0 {
        let w = sampler.normal(&[n])?;
        let w = sampler.gated("contrast", &w, config.contrast)?;
        let c = param(&w).map(|v| (v * config.contrast_std).exp2());
        chain_left(&mut m, scale3d(&c, &c, &c)?)?;
        labels.push("contrast", &[&w])?;
    }

    if config.lumaflip > 0.0 {
        let w = sampler.randint(&[n], 0, 2)?;
        let w = sampler.gated("lumaflip", &w, config.lumaflip)?;
        let flip = param(&w);
        chain_left(
            &mut m,
            luma_matrix(|outer, identity| flip.map(|w| identity - 2.0 * outer * w))?,
        )?;
        labels.push("lumaflip", &[&w])?;
    }

    if config.hue > 0.0 {
        let max = config.hue_max;
        let w = sampler.uniform(&[n])?.map(|u| (u * 2.0 - 1.0) * PI * max);
        let w = sampler.gated("hue", &w, config.hue)?;
        chain_left(&mut m, rotate3d([LUMA, LUMA, LUMA], param(&w))?)?;
        labels.push("hue", &[&w.map(|v| v.cos() - 1.0), &w.map(f32::sin)])?;
    }

    if config.saturation > 0.0 {
        let w = sampler.normal(&[n])?;
        let w = sampler.gated("saturation", &w, config.saturation)?;
        let s = param(&w).map(|v| (v * config.saturation_std).exp2());
        chain_left(
            &mut m,
            luma_matrix(|outer, identity| s.map(|s| outer + (identity - outer) * s))?,
        )?;
        labels.push("saturation", &[&w])?;
    }

    Ok(m)
}

// =============================================================================
// Executor
// =============================================================================

/// Applies per-sample color matrices to an `[N, H, W, C]` batch, `C ∈ {1, 3}`.
pub fn execute(images: &Tensor<f32>, m: &Affine3) -> Result<Tensor<f32>> {
    let [n, h, w, c] = image_dims(images)?;
    if c != 1 && c != 3 {
        return Err(Error::UnsupportedChannels { channels: c });
    }

    let mats = m.broadcast_to(n)?;
    let per_sample = h * w;
    let mut data = images.to_vec();

    for (s, mat) in mats.iter().enumerate() {
        let pixels = &mut data[s * per_sample * c..(s + 1) * per_sample * c];
        if c == 3 {
            for px in pixels.chunks_exact_mut(3) {
                let rgb = [px[0], px[1], px[2]];
                for (out, row) in px.iter_mut().zip(mat.iter()) {
                    *out = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2] + row[3];
                }
            }
        } else {
            let mean = |j: usize| (mat[0][j] + mat[1][j] + mat[2][j]) / 3.0;
            let gain = mean(0) + mean(1) + mean(2);
            let offset = mean(3);
            for px in pixels.iter_mut() {
                *px = *px * gain + offset;
            }
        }
    }

    Tensor::from_vec(data, images.shape())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{KeyedSource, ScriptedSource};
    use augpipe_core::key::PrngKey;

    fn rgb(pixels: &[[f32; 3]]) -> Tensor<f32> {
        let data: Vec<f32> = pixels.iter().flatten().copied().collect();
        Tensor::from_vec(data, &[pixels.len(), 1, 1, 3]).unwrap()
    }

    fn run(config: &AugmentConfig, source: &mut ScriptedSource, n: usize) -> (Affine3, Tensor<f32>) {
        let mut sampler = Sampler::new(source, PrngKey::new(0), 1.0, n);
        let mut labels = LabelCollector::new(n);
        let m = compose(config, &mut sampler, &mut labels).unwrap().unwrap();
        (m, labels.finish().unwrap())
    }

    fn assert_pixels(out: &Tensor<f32>, expected: &[f32]) {
        for (a, b) in out.to_vec().iter().zip(expected) {
            assert!((a - b).abs() < 1e-5, "{a} vs {b}");
        }
    }

    #[test]
    fn test_luma_axis_is_unit() {
        let norm: f32 = LUMA_AXIS.iter().map(|v| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_stage_is_none() {
        let mut source = KeyedSource;
        let mut sampler = Sampler::new(&mut source, PrngKey::new(0), 1.0, 2);
        let mut labels = LabelCollector::new(2);
        assert!(compose(&AugmentConfig::new(), &mut sampler, &mut labels)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_brightness_adds_offset_where_gated() {
        let config = AugmentConfig::new().with_brightness(1.0, 0.2);
        let mut source = ScriptedSource::new()
            .with_draw(vec![1.0, 1.0])
            .with_draw(vec![0.0, 1.0]);
        let (m, labels) = run(&config, &mut source, 2);
        assert_eq!(labels.to_vec(), vec![1.0, 0.0]);

        let images = rgb(&[[0.1, 0.2, 0.3], [0.1, 0.2, 0.3]]);
        let out = execute(&images, &m).unwrap();
        assert_pixels(&out, &[0.3, 0.4, 0.5, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_contrast_scales() {
        let config = AugmentConfig::new().with_contrast(1.0, 0.5);
        let mut source = ScriptedSource::constant(0.0, 2.0, 0);
        let (m, _) = run(&config, &mut source, 1);
        let out = execute(&rgb(&[[0.25, 0.5, -1.0]]), &m).unwrap();
        assert_pixels(&out, &[0.5, 1.0, -2.0]);
    }

    #[test]
    fn test_lumaflip_negates_gray() {
        let config = AugmentConfig::new().with_lumaflip(1.0);
        let mut source = ScriptedSource::constant(0.0, 0.0, 1);
        let (m, labels) = run(&config, &mut source, 1);
        assert_eq!(labels.to_vec(), vec![1.0]);
        let out = execute(&rgb(&[[0.4, 0.4, 0.4]]), &m).unwrap();
        assert_pixels(&out, &[-0.4, -0.4, -0.4]);
    }

    #[test]
    fn test_hue_third_turn_cycles_channels() {
        let config = AugmentConfig::new().with_hue(1.0, 1.0);
        let mut source = ScriptedSource::new()
            .with_draw(vec![5.0 / 6.0])
            .with_draw(vec![0.0]);
        let (m, labels) = run(&config, &mut source, 1);
        let out = execute(&rgb(&[[1.0, 0.0, 0.0]]), &m).unwrap();
        assert_pixels(&out, &[0.0, 1.0, 0.0]);

        let labels = labels.to_vec();
        assert!((labels[0] + 1.5).abs() < 1e-5);
        assert!((labels[1] - 0.75f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_saturation_collapses_to_gray() {
        let config = AugmentConfig::new().with_saturation(1.0, 1.0);
        let mut source = ScriptedSource::constant(0.0, -40.0, 0);
        let (m, _) = run(&config, &mut source, 1);
        let out = execute(&rgb(&[[0.3, 0.6, 0.9]]), &m).unwrap();
        assert_pixels(&out, &[0.6, 0.6, 0.6]);
    }

    #[test]
    fn test_composition_is_left_accumulated() {
        let config = AugmentConfig::new()
            .with_brightness(1.0, 1.0)
            .with_contrast(1.0, 1.0);
        let mut source = ScriptedSource::new()
            .with_draw(vec![0.5])
            .with_draw(vec![0.0])
            .with_draw(vec![1.0])
            .with_draw(vec![0.0]);
        let (m, _) = run(&config, &mut source, 1);
        // brightness first, then contrast: (x + 0.5) * 2
        let out = execute(&rgb(&[[0.0, 1.0, 2.0]]), &m).unwrap();
        assert_pixels(&out, &[1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_single_channel_uses_mean_row() {
        let config = AugmentConfig::new().with_brightness(1.0, 0.5);
        let mut source = ScriptedSource::constant(0.0, 1.0, 0);
        let (m, _) = run(&config, &mut source, 1);
        let images = Tensor::from_vec(vec![0.0f32, 1.0], &[1, 1, 2, 1]).unwrap();
        let out = execute(&images, &m).unwrap();
        assert_pixels(&out, &[0.5, 1.5]);
    }

    #[test]
    fn test_unsupported_channels() {
        let images = Tensor::zeros(&[1, 2, 2, 2]);
        assert_eq!(
            execute(&images, &Affine3::identity()),
            Err(Error::UnsupportedChannels { channels: 2 })
        );
    }
}
