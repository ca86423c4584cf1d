//! Wavelet Resampler - Alias-Free Affine Warps
//!
//! Executes an inverse affine transform on an `[N, H, W, C]` batch in five
//! passes: reflect pad, 2x upsample with the synthesis filter, one bilinear
//! grid sample at double resolution, 2x downsample with the analysis filter,
//! and a crop back to `H x W`. The filter passes are separable `upfirdn`
//! operations along columns then rows.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use augpipe_core::error::{Error, Result};
use augpipe_tensor::Tensor;
use tracing::debug;

use crate::blit::reflect_index;
use crate::grid::{affine_grid, grid_sample};
use crate::matrix::{scale2d, scale2d_inv, translate2d, translate2d_inv, Affine2};
use crate::pipe::image_dims;

// =============================================================================
// Margins and Padding
// =============================================================================

/// Reflect-pad amounts `[x0, y0, x1, y1]` needed so that every output pixel
/// of every sample reads from inside the padded source.
pub fn margins(
    g_inv: &Affine2,
    n: usize,
    height: usize,
    width: usize,
    hz_pad: usize,
) -> Result<[usize; 4]> {
    if let Some(len) = g_inv.batch_len().filter(|&len| len != n) {
        return Err(Error::broadcast(&[len], &[n]));
    }
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let corners = [[-cx, -cy], [cx, -cy], [cx, cy], [-cx, cy]];

    let mut extent = [f32::NEG_INFINITY; 4];
    for i in 0..n {
        for corner in corners {
            let [x, y] = g_inv.transform_point(i, corner);
            extent[0] = extent[0].max(-x);
            extent[1] = extent[1].max(-y);
            extent[2] = extent[2].max(x);
            extent[3] = extent[3].max(y);
        }
    }

    let pad = 2.0 * hz_pad as f32;
    let offsets = [pad - cx, pad - cy, pad - cx, pad - cy];
    let bounds = [width - 1, height - 1, width - 1, height - 1];
    let mut out = [0usize; 4];
    for k in 0..4 {
        out[k] = (extent[k] + offsets[k]).clamp(0.0, bounds[k] as f32).ceil() as usize;
    }
    Ok(out)
}

/// Mirrors each sample outward by `[x0, y0, x1, y1]` pixels without
/// repeating the edge pixel.
pub fn reflect_pad(images: &Tensor<f32>, margin: [usize; 4]) -> Result<Tensor<f32>> {
    let [n, h, w, c] = image_dims(images)?;
    let [mx0, my0, mx1, my1] = margin;
    let (ho, wo) = (h + my0 + my1, w + mx0 + mx1);

    let mut indices = Vec::with_capacity(n * ho * wo * c);
    for s in 0..n {
        for y in 0..ho {
            let sy = reflect_index(y as i64 - my0 as i64, h);
            for x in 0..wo {
                let sx = reflect_index(x as i64 - mx0 as i64, w);
                let base = ((s * h + sy) * w + sx) * c;
                indices.extend(base..base + c);
            }
        }
    }
    images.gather(&indices, &[n, ho, wo, c])
}

// =============================================================================
// upfirdn
// =============================================================================

/// One separable filter pass: zero-stuff by `up`, pad, filter, keep every
/// `down`-th sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirPass {
    /// Upsampling factor.
    pub up: usize,
    /// Downsampling factor.
    pub down: usize,
    /// Padding before the signal; negative crops.
    pub pad0: i64,
    /// Padding after the signal; negative crops.
    pub pad1: i64,
    /// Scale applied to the filter.
    pub gain: f32,
    /// Correlate with the filter as given instead of convolving.
    pub flip: bool,
}

impl FirPass {
    /// 2x synthesis pass for a filter of `taps` coefficients.
    #[must_use]
    pub fn upsample2(taps: usize) -> Self {
        Self {
            up: 2,
            down: 1,
            pad0: ((taps + 1) / 2) as i64,
            pad1: ((taps - 2) / 2) as i64,
            gain: 2.0,
            flip: false,
        }
    }

    /// 2x analysis pass that also crops `crop` samples from each side.
    #[must_use]
    pub fn downsample2(taps: usize, crop: usize) -> Self {
        Self {
            up: 1,
            down: 2,
            pad0: ((taps - 1) / 2) as i64 - crop as i64,
            pad1: ((taps - 2) / 2) as i64 - crop as i64,
            gain: 1.0,
            flip: true,
        }
    }

    /// Output length for an input of `len` samples and a `taps`-long filter.
    #[must_use]
    pub fn output_len(&self, len: usize, taps: usize) -> Option<usize> {
        let padded = (len * self.up) as i64 + self.pad0 + self.pad1;
        let valid = padded - taps as i64;
        (valid >= 0).then(|| (valid / self.down as i64) as usize + 1)
    }
}

/// Applies `pass` along `axis` of `images`.
pub fn upfirdn_axis(
    images: &Tensor<f32>,
    axis: usize,
    filter: &[f32],
    pass: &FirPass,
) -> Result<Tensor<f32>> {
    let shape = images.shape().to_vec();
    if axis >= shape.len() {
        return Err(Error::InvalidDimension {
            index: axis as i64,
            ndim: shape.len(),
        });
    }
    let len = shape[axis];
    let out_len = pass.output_len(len, filter.len()).ok_or_else(|| {
        Error::invalid_operation(format!(
            "filter of {} taps is longer than the padded signal",
            filter.len()
        ))
    })?;
    let outer: usize = shape[..axis].iter().product();
    let inner: usize = shape[axis + 1..].iter().product();
    let stuffed = (len * pass.up) as i64;

    let taps: Vec<f32> = if pass.flip {
        filter.iter().map(|&f| f * pass.gain).collect()
    } else {
        filter.iter().rev().map(|&f| f * pass.gain).collect()
    };

    let src = images.to_vec();
    let mut out = vec![0.0f32; outer * out_len * inner];
    for o in 0..outer {
        for t in 0..out_len {
            let start = (t * pass.down) as i64 - pass.pad0;
            let dst = (o * out_len + t) * inner;
            for (k, &tap) in taps.iter().enumerate() {
                let u = start + k as i64;
                if u < 0 || u >= stuffed || u % pass.up as i64 != 0 {
                    continue;
                }
                let base = (o * len + (u / pass.up as i64) as usize) * inner;
                for e in 0..inner {
                    out[dst + e] += tap * src[base + e];
                }
            }
        }
    }

    let mut out_shape = shape;
    out_shape[axis] = out_len;
    Tensor::from_vec(out, &out_shape)
}

// =============================================================================
// Execute
// =============================================================================

/// Warps every sample of `images` by its inverse transform in `g_inv`.
///
/// `filter` is the unit-sum low-pass filter; its length sets the padding.
pub fn execute(images: &Tensor<f32>, g_inv: &Affine2, filter: &[f32]) -> Result<Tensor<f32>> {
    let [n, h, w, _] = image_dims(images)?;
    let taps = filter.len();
    if taps < 2 {
        return Err(Error::invalid_operation(format!(
            "resampling filter needs at least 2 taps, got {taps}"
        )));
    }
    let hz_pad = taps / 4;

    let margin = margins(g_inv, n, h, w, hz_pad)?;
    let [mx0, my0, mx1, my1] = margin;
    let images = reflect_pad(images, margin)?;
    debug!(?margin, padded = ?images.shape(), "geometric pad");
    let mut g = translate2d(
        (mx0 as f32 - mx1 as f32) / 2.0,
        (my0 as f32 - my1 as f32) / 2.0,
    )?
    .matmul(g_inv)?;

    let up = FirPass::upsample2(taps);
    let images = upfirdn_axis(&images, 2, filter, &up)?;
    let images = upfirdn_axis(&images, 1, filter, &up)?;
    g = scale2d(2.0, 2.0)?.matmul(&g)?.matmul(&scale2d_inv(2.0, 2.0)?)?;
    g = translate2d(-0.5, -0.5)?
        .matmul(&g)?
        .matmul(&translate2d_inv(-0.5, -0.5)?)?;

    let (h_in, w_in) = (images.shape()[1] as f32, images.shape()[2] as f32);
    let (h_out, w_out) = (2 * (h + 2 * hz_pad), 2 * (w + 2 * hz_pad));
    g = scale2d(2.0 / w_in, 2.0 / h_in)?
        .matmul(&g)?
        .matmul(&scale2d_inv(2.0 / w_out as f32, 2.0 / h_out as f32)?)?;
    let grid = affine_grid(&g, n, h_out, w_out)?;
    let images = grid_sample(&images, &grid)?;
    debug!(warped = ?images.shape(), "geometric warp");

    let down = FirPass::downsample2(taps, 2 * hz_pad);
    let images = upfirdn_axis(&images, 2, filter, &down)?;
    upfirdn_axis(&images, 1, filter, &down)
}

// =============================================================================
// Tests
// =============================================================================
