//! Augmentation Pipe - Stage Orchestration
//!
//! Runs the three stages in order on an `[N, H, W, C]` batch:
//!
//! 1. pixel blits, applied directly to the images
//! 2. geometric effects, composed into one inverse transform and executed
//!    by the wavelet resampler
//! 3. color effects, composed into one matrix and applied per pixel
//!
//! Each enabled effect appends its gated parameters to the label tensor.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use augpipe_core::error::{Error, Result};
use augpipe_core::key::PrngKey;
use augpipe_tensor::Tensor;
use tracing::debug;

use crate::config::AugmentConfig;
use crate::labels::LabelCollector;
use crate::sampler::{KeyedSource, RandomSource, Sampler};
use crate::wavelets::Wavelet;
use crate::{blit, color, geometric, resample};

// =============================================================================
// Validation
// =============================================================================

/// Returns `[N, H, W, C]`, rejecting batches that are not rank 4 or have an
/// empty image plane.
pub fn image_dims(images: &Tensor<f32>) -> Result<[usize; 4]> {
    let shape = images.shape();
    if shape.len() != 4 {
        return Err(Error::InvalidDimension {
            index: shape.len() as i64,
            ndim: 4,
        });
    }
    if shape[1] == 0 || shape[2] == 0 {
        return Err(Error::EmptyTensor);
    }
    Ok([shape[0], shape[1], shape[2], shape[3]])
}

// =============================================================================
// Augmented
// =============================================================================

/// Output of one pipeline call.
#[derive(Debug, Clone, PartialEq)]
pub struct Augmented {
    /// Augmented batch, same shape as the input.
    pub images: Tensor<f32>,
    /// `[N, D]` gated parameters of every enabled effect.
    pub labels: Tensor<f32>,
}

// =============================================================================
// AugmentPipe
// =============================================================================

/// Stochastic augmentation pipeline.
///
/// # Example
/// ```rust
/// use augpipe_tensor::{PrngKey, Tensor};
/// use augpipe_vision::{AugmentConfig, AugmentPipe};
///
/// let pipe = AugmentPipe::new(AugmentConfig::new().with_xflip(1.0));
/// let images = Tensor::full(&[2, 8, 8, 3], 0.5f32);
/// let out = pipe.forward(&images, PrngKey::new(0)).unwrap();
/// assert_eq!(out.images.shape(), &[2, 8, 8, 3]);
/// assert_eq!(out.labels.shape(), &[2, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct AugmentPipe {
    config: AugmentConfig,
    filter: Wavelet,
    taps: Vec<f32>,
}

impl AugmentPipe {
    /// Creates a pipe with the default `sym6` resampling filter.
    #[must_use]
    pub fn new(config: AugmentConfig) -> Self {
        let filter = Wavelet::default();
        Self {
            config,
            filter,
            taps: filter.normalized(),
        }
    }

    /// Replaces the resampling filter.
    pub fn with_filter(mut self, filter: Wavelet) -> Self {
        self.filter = filter;
        self.taps = filter.normalized();
        self
    }

    /// The configuration.
    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// The resampling filter.
    pub fn filter(&self) -> Wavelet {
        self.filter
    }

    /// Label columns D produced per sample.
    pub fn label_width(&self) -> usize {
        self.config.label_width()
    }

    /// Augments `images` with draws determined by `key`.
    pub fn forward(&self, images: &Tensor<f32>, key: PrngKey) -> Result<Augmented> {
        self.forward_with(images, &mut KeyedSource, key)
    }

    /// Augments `images` drawing from an explicit random source.
    pub fn forward_with(
        &self,
        images: &Tensor<f32>,
        source: &mut dyn RandomSource,
        key: PrngKey,
    ) -> Result<Augmented> {
        let [n, h, w, c] = image_dims(images)?;
        let config = &self.config;
        if config.color_enabled() && c != 1 && c != 3 {
            return Err(Error::UnsupportedChannels { channels: c });
        }

        let mut sampler = Sampler::new(source, key, config.p, n);
        let mut labels = LabelCollector::new(n);

        let mut images = blit::apply(images, config, &mut sampler, &mut labels)?;

        if let Some(g_inv) = geometric::compose(config, &mut sampler, &mut labels, h, w)? {
            debug!(n, h, w, filter = %self.filter, "geometric stage");
            images = resample::execute(&images, &g_inv, &self.taps)?;
        }

        if let Some(m) = color::compose(config, &mut sampler, &mut labels)? {
            debug!(n, channels = c, "color stage");
            images = color::execute(&images, &m)?;
        }

        debug!(draws = sampler.draws(), groups = ?labels.groups(), "augmented batch");
        Ok(Augmented {
            images,
            labels: labels.finish()?,
        })
    }
}

impl Default for AugmentPipe {
    fn default() -> Self {
        Self::new(AugmentConfig::default())
    }
}

impl From<AugmentConfig> for AugmentPipe {
    fn from(config: AugmentConfig) -> Self {
        Self::new(config)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AugmentPreset;
    use crate::sampler::ScriptedSource;

    fn ramp(shape: &[usize]) -> Tensor<f32> {
        let len: usize = shape.iter().product();
        Tensor::from_vec((0..len).map(|v| (v % 17) as f32 / 17.0).collect(), shape).unwrap()
    }

    #[test]
    fn test_identity_config_is_exact() {
        let images = ramp(&[3, 5, 7, 3]);
        let out = AugmentPipe::default()
            .forward(&images, PrngKey::new(1))
            .unwrap();
        assert_eq!(out.images, images);
        assert_eq!(out.labels.shape(), &[3, 0]);
    }

    #[test]
    fn test_rank_and_empty_validation() {
        let pipe = AugmentPipe::default();
        let flat = Tensor::zeros(&[4, 4, 3]);
        assert!(matches!(
            pipe.forward(&flat, PrngKey::new(0)),
            Err(Error::InvalidDimension { .. })
        ));
        let empty = Tensor::zeros(&[2, 0, 4, 3]);
        assert_eq!(pipe.forward(&empty, PrngKey::new(0)), Err(Error::EmptyTensor));
    }

    #[test]
    fn test_unsupported_channels_fail_before_sampling() {
        let pipe = AugmentPipe::new(AugmentConfig::new().with_brightness(1.0, 0.2));
        let images = Tensor::zeros(&[1, 4, 4, 2]);
        let mut source = ScriptedSource::new();
        assert_eq!(
            pipe.forward_with(&images, &mut source, PrngKey::new(0)),
            Err(Error::UnsupportedChannels { channels: 2 })
        );
    }

    #[test]
    fn test_two_channels_fine_without_color() {
        let pipe = AugmentPipe::new(AugmentPreset::Bg.config());
        let images = ramp(&[2, 8, 8, 2]);
        let out = pipe.forward(&images, PrngKey::new(5)).unwrap();
        assert_eq!(out.images.shape(), &[2, 8, 8, 2]);
        assert_eq!(out.labels.shape(), &[2, 12]);
    }

    #[test]
    fn test_forward_is_reproducible() {
        let pipe = AugmentPipe::new(AugmentPreset::Bgc.config());
        let images = ramp(&[2, 8, 8, 3]);
        let a = pipe.forward(&images, PrngKey::new(9)).unwrap();
        let b = pipe.forward(&images, PrngKey::new(9)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.labels.shape(), &[2, pipe.label_width()]);
    }

    #[test]
    fn test_with_filter() {
        let pipe = AugmentPipe::new(AugmentConfig::new().with_scale(1.0, 0.2))
            .with_filter(Wavelet::Haar);
        assert_eq!(pipe.filter(), Wavelet::Haar);
        let images = ramp(&[1, 5, 6, 1]);
        let out = pipe.forward(&images, PrngKey::new(2)).unwrap();
        assert_eq!(out.images.shape(), &[1, 5, 6, 1]);
    }
}
