//! Affine Grid and Bilinear Grid Sampling
//!
//! Normalized coordinates span `[-1, 1]` over the image with pixel centers at
//! `(2i + 1) / size - 1` (the `align_corners = false` convention). Samples
//! that fall outside the source read zeros.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use augpipe_core::error::{Error, Result};
use augpipe_tensor::Tensor;

use crate::matrix::Affine2;

/// Maps every output pixel center through `theta`, giving an `[N, H, W, 2]`
/// grid of normalized source `(x, y)` coordinates.
pub fn affine_grid(theta: &Affine2, n: usize, height: usize, width: usize) -> Result<Tensor<f32>> {
    let mats = theta.broadcast_to(n)?;
    let mut data = Vec::with_capacity(n * height * width * 2);
    for m in &mats {
        for i in 0..height {
            let y = (2 * i + 1) as f32 / height as f32 - 1.0;
            for j in 0..width {
                let x = (2 * j + 1) as f32 / width as f32 - 1.0;
                data.push(m[0][0] * x + m[0][1] * y + m[0][2]);
                data.push(m[1][0] * x + m[1][1] * y + m[1][2]);
            }
        }
    }
    Tensor::from_vec(data, &[n, height, width, 2])
}

/// Bilinearly samples `[N, H, W, C]` images at an `[N, Ho, Wo, 2]` grid.
pub fn grid_sample(images: &Tensor<f32>, grid: &Tensor<f32>) -> Result<Tensor<f32>> {
    let shape = images.shape();
    let gshape = grid.shape();
    if shape.len() != 4 {
        return Err(Error::InvalidDimension {
            index: shape.len() as i64,
            ndim: 4,
        });
    }
    if gshape.len() != 4 || gshape[3] != 2 || gshape[0] != shape[0] {
        return Err(Error::shape_mismatch(&[shape[0], 0, 0, 2], gshape));
    }

    let (n, h, w, c) = (shape[0], shape[1], shape[2], shape[3]);
    let (ho, wo) = (gshape[1], gshape[2]);
    let src = images.to_vec();
    let coords = grid.to_vec();
    let mut out = vec![0.0f32; n * ho * wo * c];

    let fetch = |s: usize, y: i64, x: i64| -> Option<usize> {
        if y < 0 || x < 0 || y >= h as i64 || x >= w as i64 {
            return None;
        }
        Some(((s * h + y as usize) * w + x as usize) * c)
    };

    for s in 0..n {
        for i in 0..ho {
            for j in 0..wo {
                let g = ((s * ho + i) * wo + j) * 2;
                let ix = ((coords[g] + 1.0) * w as f32 - 1.0) / 2.0;
                let iy = ((coords[g + 1] + 1.0) * h as f32 - 1.0) / 2.0;
                let (x0, y0) = (ix.floor(), iy.floor());
                let (dx, dy) = (ix - x0, iy - y0);
                let (x0, y0) = (x0 as i64, y0 as i64);

                let dst = ((s * ho + i) * wo + j) * c;
                let corners = [
                    (y0, x0, (1.0 - dy) * (1.0 - dx)),
                    (y0, x0 + 1, (1.0 - dy) * dx),
                    (y0 + 1, x0, dy * (1.0 - dx)),
                    (y0 + 1, x0 + 1, dy * dx),
                ];
                for (y, x, weight) in corners {
                    if let Some(base) = fetch(s, y, x) {
                        for ch in 0..c {
                            out[dst + ch] += weight * src[base + ch];
                        }
                    }
                }
            }
        }
    }

    Tensor::from_vec(out, &[n, ho, wo, c])
}

// =============================================================================
// Tests
// =============================================================================
