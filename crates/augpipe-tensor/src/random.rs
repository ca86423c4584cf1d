//! Keyed Random Tensors
//!
//! Random tensors drawn from an explicit [`PrngKey`] instead of a thread-local
//! generator: the same key and shape always give the same values, and
//! distinct keys give independent streams.
//!
//! Each key seeds a `ChaCha20Rng`, whose output stream is fixed across
//! platforms and `rand_chacha` releases. Values derived from it through
//! `rand`/`rand_distr` (floats in `[0, 1)`, normals, bounded integers) are
//! reproducible as long as those crates stay on the same minor version.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use rand::distributions::{Distribution, Standard};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_distr::{StandardNormal, Uniform};

use augpipe_core::dtype::Float;
use augpipe_core::error::{Error, Result};
use augpipe_core::key::PrngKey;

use crate::shape::numel;
use crate::tensor::Tensor;

fn rng_for(key: PrngKey) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(key.raw())
}

/// Uniform values in `[0, 1)`.
#[must_use]
pub fn uniform<T: Float>(key: PrngKey, shape: &[usize]) -> Tensor<T>
where
    Standard: Distribution<T>,
{
    let mut rng = rng_for(key);
    let data: Vec<T> = (0..numel(shape)).map(|_| Standard.sample(&mut rng)).collect();
    Tensor::from_parts(data, shape)
}

/// Standard normal values (mean 0, std 1).
#[must_use]
pub fn normal<T: Float>(key: PrngKey, shape: &[usize]) -> Tensor<T>
where
    StandardNormal: Distribution<T>,
{
    let mut rng = rng_for(key);
    let data: Vec<T> = (0..numel(shape))
        .map(|_| StandardNormal.sample(&mut rng))
        .collect();
    Tensor::from_parts(data, shape)
}

/// Integers uniformly drawn from `[low, high)`.
pub fn randint(key: PrngKey, shape: &[usize], low: i32, high: i32) -> Result<Tensor<i32>> {
    if low >= high {
        return Err(Error::invalid_operation(format!(
            "randint requires low < high, got [{low}, {high})"
        )));
    }
    let mut rng = rng_for(key);
    let dist = Uniform::new(low, high);
    let data: Vec<i32> = (0..numel(shape)).map(|_| dist.sample(&mut rng)).collect();
    Ok(Tensor::from_parts(data, shape))
}

// =============================================================================
// Tests
// =============================================================================
