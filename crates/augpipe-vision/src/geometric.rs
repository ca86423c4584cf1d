//! Geometric Composer
//!
//! Samples the continuous geometric effects and folds them into one inverse
//! 3x3 transform per sample. The transform maps output pixel coordinates
//! (centered, y down) back to input coordinates; it stays `None` until an
//! enabled effect contributes a step.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::f32::consts::PI;

use augpipe_core::error::Result;
use augpipe_tensor::{constant, Tensor};

use crate::config::AugmentConfig;
use crate::labels::LabelCollector;
use crate::matrix::{rotate2d_inv, scale2d_inv, translate2d_inv, Affine, Affine2, Param};
use crate::sampler::Sampler;

/// Right-multiplies `step` into a running transform.
pub(crate) fn chain<const D: usize>(acc: &mut Option<Affine<D>>, step: Affine<D>) -> Result<()> {
    *acc = Some(match acc.take() {
        None => step,
        Some(current) => current.matmul(&step)?,
    });
    Ok(())
}

fn param(t: &Tensor<f32>) -> Param {
    Param::Batch(t.to_vec())
}

/// Samples the geometric effects for an `height x width` batch.
pub fn compose(
    config: &AugmentConfig,
    sampler: &mut Sampler<'_>,
    labels: &mut LabelCollector,
    height: usize,
    width: usize,
) -> Result<Option<Affine2>> {
    let n = sampler.batch();
    let mut g_inv: Option<Affine2> = None;

    if config.scale > 0.0 {
        let w = sampler.normal(&[n])?;
        let w = sampler.gated("scale", &w, config.scale)?;
        let s = param(&w).map(|v| (v * config.scale_std).exp2());
        chain(&mut g_inv, scale2d_inv(&s, &s)?)?;
        labels.push("scale", &[&w])?;
    }

    if config.rotate_frac > 0.0 {
        let max = config.rotate_frac_max;
        let w = sampler.uniform(&[n])?.map(|u| (u * 2.0 - 1.0) * PI * max);
        let w = sampler.gated("rotate_frac", &w, config.rotate_frac)?;
        chain(&mut g_inv, rotate2d_inv(param(&w).map(|v| -v))?)?;
        labels.push("rotate_frac", &[&w.map(|v| v.cos() - 1.0), &w.map(f32::sin)])?;
    }

    if config.aniso > 0.0 {
        let w = sampler.normal(&[n])?;
        let r = sampler.uniform(&[n])?.map(|u| (u * 2.0 - 1.0) * PI);
        let w = sampler.gated("aniso", &w, config.aniso)?;
        let r = sampler.gated_with_probability("aniso_rotate", &r, config.aniso_rotate_prob)?;

        let s = param(&w).map(|v| (v * config.aniso_std).exp2());
        let r_param = param(&r);
        let step = rotate2d_inv(&r_param)?
            .matmul(&scale2d_inv(&s, s.map(|v| 1.0 / v))?)?
            .matmul(&rotate2d_inv(r_param.map(|v| -v))?)?;
        chain(&mut g_inv, step)?;

        let label_cos = w.zip_map(&r, |w, r| w * r.cos())?;
        let label_sin = w.zip_map(&r, |w, r| w * r.sin())?;
        labels.push("aniso", &[&label_cos, &label_sin])?;
    }

    if config.translate_frac > 0.0 {
        let std = config.translate_frac_std;
        let t = sampler.normal(&[2, n])?.transpose(0, 1)?;
        let t = sampler.gated("translate_frac", &t, config.translate_frac)?;
        let t = t.transpose(0, 1)?.to_vec();
        let (wx, wy) = t.split_at(n);

        let tx = Param::Batch(wx.iter().map(|v| v * width as f32 * std).collect());
        let ty = Param::Batch(wy.iter().map(|v| v * height as f32 * std).collect());
        chain(&mut g_inv, translate2d_inv(tx, ty)?)?;

        let label_x = constant(wx, &[n])?;
        let label_y = constant(wy, &[n])?;
        labels.push("translate_frac", &[&label_x, &label_y])?;
    }

    Ok(g_inv)
}

// =============================================================================
// Tests
// =============================================================================
