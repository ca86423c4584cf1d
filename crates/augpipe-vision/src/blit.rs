//! Pixel Blits - Exact Integer Transforms
//!
//! Flips, 90 degree rotations and integer translations move whole pixels and
//! never resample. Each op takes an `[N, H, W, C]` batch and one gated
//! parameter per sample; a zero parameter leaves that sample untouched.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use augpipe_core::error::{Error, Result};
use augpipe_tensor::Tensor;

use crate::config::AugmentConfig;
use crate::labels::LabelCollector;
use crate::pipe::image_dims;
use crate::sampler::Sampler;

// =============================================================================
// Ops
// =============================================================================

fn mask_where(w: &Tensor<f32>, pred: impl Fn(f32) -> bool) -> Tensor<bool> {
    w.map(pred)
}

/// Mirrors the column axis (axis 2) of samples with `w != 0`.
pub fn xflip(images: &Tensor<f32>, w: &Tensor<f32>) -> Result<Tensor<f32>> {
    Tensor::select(&mask_where(w, |v| v != 0.0), &images.flip(2)?, images)
}

/// Mirrors the row axis (axis 1) of samples with `w != 0`.
pub fn yflip(images: &Tensor<f32>, w: &Tensor<f32>) -> Result<Tensor<f32>> {
    Tensor::select(&mask_where(w, |v| v != 0.0), &images.flip(1)?, images)
}

/// Rotates samples by `w` quarter turns, `w ∈ {0, 1, 2, 3}`.
///
/// Requires square images since odd turns transpose rows and columns.
pub fn rotate_int(images: &Tensor<f32>, w: &Tensor<f32>) -> Result<Tensor<f32>> {
    let [_, height, width, _] = image_dims(images)?;
    if height != width {
        return Err(Error::invalid_operation(format!(
            "90 degree rotation requires square images, got {height}x{width}"
        )));
    }

    let images = Tensor::select(
        &mask_where(w, |v| v == 1.0 || v == 2.0),
        &images.flip(2)?,
        images,
    )?;
    let images = Tensor::select(
        &mask_where(w, |v| v == 2.0 || v == 3.0),
        &images.flip(1)?,
        &images,
    )?;
    Tensor::select(
        &mask_where(w, |v| v == 1.0 || v == 3.0),
        &images.transpose(1, 2)?,
        &images,
    )
}

/// Periodic-reflect (triangle wave) index into an axis of length `len`.
#[must_use]
pub fn reflect_index(i: i64, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let last = len as i64 - 1;
    let folded = i.rem_euclid(2 * last);
    (last - (last - folded).abs()) as usize
}

/// Rounds to the nearest integer, sending exact halves to the even neighbor.
#[must_use]
pub fn round_half_even(v: f32) -> f32 {
    if (v - v.trunc()).abs() == 0.5 {
        2.0 * (v / 2.0).round()
    } else {
        v.round()
    }
}

/// Shifts sample `n` by `tx[n]` columns and `ty[n]` rows with reflective wrap.
pub fn translate_int(images: &Tensor<f32>, tx: &[i64], ty: &[i64]) -> Result<Tensor<f32>> {
    let [n, h, w, c] = image_dims(images)?;
    if tx.len() != n || ty.len() != n {
        return Err(Error::shape_mismatch(&[n], &[tx.len().min(ty.len())]));
    }

    let mut indices = Vec::with_capacity(images.numel());
    for s in 0..n {
        for y in 0..h {
            let sy = reflect_index(y as i64 + ty[s], h);
            for x in 0..w {
                let sx = reflect_index(x as i64 - tx[s], w);
                let base = ((s * h + sy) * w + sx) * c;
                indices.extend(base..base + c);
            }
        }
    }
    images.gather(&indices, images.shape())
}

// =============================================================================
// Stage
// =============================================================================

/// Samples and applies every enabled blit, recording labels.
pub fn apply(
    images: &Tensor<f32>,
    config: &AugmentConfig,
    sampler: &mut Sampler<'_>,
    labels: &mut LabelCollector,
) -> Result<Tensor<f32>> {
    let n = sampler.batch();
    let mut images = images.clone();

    if config.xflip > 0.0 {
        let w = sampler.randint(&[n], 0, 2)?;
        let w = sampler.gated("xflip", &w, config.xflip)?;
        images = xflip(&images, &w)?;
        labels.push("xflip", &[&w])?;
    }

    if config.yflip > 0.0 {
        let w = sampler.randint(&[n], 0, 2)?;
        let w = sampler.gated("yflip", &w, config.yflip)?;
        images = yflip(&images, &w)?;
        labels.push("yflip", &[&w])?;
    }

    if config.rotate_int > 0.0 {
        let w = sampler.randint(&[n], 0, 4)?;
        let w = sampler.gated("rotate_int", &w, config.rotate_int)?;
        images = rotate_int(&images, &w)?;
        let odd_half = w.map(|v| f32::from(u8::from(v == 1.0 || v == 2.0)));
        let second_half = w.map(|v| f32::from(u8::from(v == 2.0 || v == 3.0)));
        labels.push("rotate_int", &[&odd_half, &second_half])?;
    }

    if config.translate_int > 0.0 {
        let (h, w) = (images.shape()[1] as f32, images.shape()[2] as f32);
        let max = config.translate_int_max;
        let t = sampler
            .uniform(&[2, n])?
            .map(|u| u * 2.0 - 1.0)
            .transpose(0, 1)?;
        let t = sampler.gated("translate_int", &t, config.translate_int)?.to_vec();

        let tx: Vec<f32> = (0..n).map(|i| round_half_even(t[2 * i] * w * max)).collect();
        let ty: Vec<f32> = (0..n).map(|i| round_half_even(t[2 * i + 1] * h * max)).collect();
        images = translate_int(
            &images,
            &tx.iter().map(|&v| v as i64).collect::<Vec<_>>(),
            &ty.iter().map(|&v| v as i64).collect::<Vec<_>>(),
        )?;

        let label_x = Tensor::from_vec(tx.iter().map(|v| v / (w * max)).collect(), &[n])?;
        let label_y = Tensor::from_vec(ty.iter().map(|v| v / (h * max)).collect(), &[n])?;
        labels.push("translate_int", &[&label_x, &label_y])?;
    }

    Ok(images)
}

// =============================================================================
// Tests
// =============================================================================
