//! Augpipe Vision - Stochastic Image Augmentation
//!
//! This crate implements the augmentation stages and the pipe that runs them:
//!
//! - **Blits**: flips, 90 degree rotations and reflective integer shifts
//! - **Geometric**: scale, rotation, anisotropic stretch and sub-pixel shift,
//!   composed into one inverse affine transform and executed by an
//!   alias-free wavelet resampler
//! - **Color**: brightness, contrast, luma flip, hue and saturation, composed
//!   into one 4x4 matrix
//! - **Labels**: the gated parameters of every enabled effect, per sample
//!
//! Every effect is gated per sample by `uniform < weight · p`; gating is a
//! select over fully computed tensors.
//!
//! # Example
//!
//! ```rust
//! use augpipe_tensor::{PrngKey, Tensor};
//! use augpipe_vision::prelude::*;
//!
//! let config = AugmentConfig::preset("bgc").unwrap();
//! let pipe = AugmentPipe::new(config);
//!
//! let images = Tensor::full(&[4, 16, 16, 3], 0.5f32);
//! let out = pipe.forward(&images, PrngKey::new(0)).unwrap();
//! assert_eq!(out.images.shape(), &[4, 16, 16, 3]);
//! assert_eq!(out.labels.shape(), &[4, pipe.label_width()]);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// ML/tensor-specific allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::too_many_lines)]

// =============================================================================
// Modules
// =============================================================================

pub mod blit;
pub mod color;
pub mod config;
pub mod geometric;
pub mod grid;
pub mod labels;
pub mod matrix;
pub mod pipe;
pub mod resample;
pub mod sampler;
pub mod wavelets;

// =============================================================================
// Re-exports
// =============================================================================

pub use augpipe_core::{Error, KeyStream, PrngKey, Result};
pub use config::{AugmentConfig, AugmentPreset};
pub use labels::LabelCollector;
pub use matrix::{Affine, Affine2, Affine3, Param};
pub use pipe::{AugmentPipe, Augmented};
pub use sampler::{KeyedSource, RandomSource, Sampler, ScriptedSource};
pub use wavelets::Wavelet;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for augmentation.
pub mod prelude {
    pub use crate::config::{AugmentConfig, AugmentPreset};
    pub use crate::matrix::{Affine, Affine2, Affine3, Param};
    pub use crate::pipe::{AugmentPipe, Augmented};
    pub use crate::sampler::{KeyedSource, RandomSource, ScriptedSource};
    pub use crate::wavelets::Wavelet;
    pub use augpipe_core::{Error, PrngKey, Result};
}
