//! Augpipe Tensor - N-Dimensional Arrays for Image Batches
//!
//! This crate provides the `Tensor` type the augmentation stages operate on,
//! along with the two collaborator services they need from a numeric
//! backend: constant/broadcast construction and keyed random sampling.
//!
//! # Key Features
//! - N-dimensional tensor with zero-copy transpose and flip views
//! - Branch-free `select` for per-sample gating
//! - Constant builders (`full`, `constant`, `broadcast_scalar`)
//! - Keyed `uniform`, `normal` and `randint` draws
//!
//! # Example
//! ```rust
//! use augpipe_tensor::{random, zeros, PrngKey, Tensor};
//!
//! let images = zeros::<f32>(&[2, 8, 8, 3]);
//! let mirrored = images.flip(2).unwrap();
//! assert_eq!(mirrored.shape(), &[2, 8, 8, 3]);
//!
//! let gate: Tensor<f32> = random::uniform(PrngKey::new(0), &[2]);
//! assert_eq!(gate.shape(), &[2]);
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
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_range_loop)]

// =============================================================================
// Modules
// =============================================================================

pub mod creation;
pub mod random;
pub mod shape;
pub mod tensor;

// =============================================================================
// Re-exports
// =============================================================================

pub use augpipe_core::{DType, Error, Float, KeyStream, PrngKey, Result, Scalar};
pub use creation::*;
pub use shape::{Shape, Strides};
pub use tensor::Tensor;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::shape::{Shape, Strides};
    pub use crate::tensor::Tensor;
    pub use crate::{broadcast_scalar, constant, full, zeros};
    pub use augpipe_core::{DType, Error, KeyStream, PrngKey, Result};
}
