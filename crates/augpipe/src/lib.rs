//! # Augpipe - Adaptive Discriminator Augmentation in Rust
//!
//! Augpipe applies a randomized composition of pixel, geometric and color
//! transforms to a batch of images, each effect gated per sample by its own
//! probability, and reports which parameters were applied.
//!
//! ## Features
//!
//! - **Blits**: x/y flips, 90 degree rotations, reflective integer shifts
//! - **Geometric**: isotropic and anisotropic scale, arbitrary rotation,
//!   sub-pixel translation, resampled through a wavelet filter bank
//! - **Color**: brightness, contrast, luma flip, hue rotation, saturation
//! - **Labels**: fixed-layout `[N, D]` parameter descriptors
//! - **Reproducible**: every draw derives from one `PrngKey` in fixed order
//!
//! # Quick Start
//!
//! ```rust
//! use augpipe::prelude::*;
//!
//! let config = AugmentConfig::new()
//!     .with_xflip(1.0)
//!     .with_scale(1.0, 0.2)
//!     .with_brightness(1.0, 0.2)
//!     .with_p(0.6);
//! let pipe = AugmentPipe::new(config);
//!
//! let images = Tensor::full(&[2, 16, 16, 3], 0.25f32);
//! let out = pipe.forward(&images, PrngKey::new(1234)).unwrap();
//! assert_eq!(out.images.shape(), images.shape());
//! assert_eq!(out.labels.shape(), &[2, 3]);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

// =============================================================================
// Crate Re-exports
// =============================================================================

pub use augpipe_core as core;

pub use augpipe_tensor as tensor;

pub use augpipe_vision as vision;

// =============================================================================
// Prelude
// =============================================================================

/// Everything needed to configure and run the pipeline.
pub mod prelude {
    pub use augpipe_core::{DType, Error, KeyStream, PrngKey, Result};

    pub use augpipe_tensor::{broadcast_scalar, constant, full, zeros, Tensor};

    pub use augpipe_vision::{
        Affine, Affine2, Affine3, AugmentConfig, AugmentPipe, AugmentPreset, Augmented,
        KeyedSource, LabelCollector, Param, RandomSource, ScriptedSource, Wavelet,
    };
}

// =============================================================================
// Version Information
// =============================================================================

/// Returns the version of augpipe.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
