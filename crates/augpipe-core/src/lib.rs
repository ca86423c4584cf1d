//! Augpipe Core - Foundation Layer for the Augpipe Augmentation Pipeline
//!
//! This crate provides the small set of abstractions every other augpipe
//! crate builds on: the unified error type, the scalar type system used by
//! tensors, and the splittable PRNG key that makes every augmentation call
//! reproducible.
//!
//! # Key Features
//! - Unified `Error`/`Result` for tensor, matrix and pipeline failures
//! - Scalar traits (`Scalar`, `Float`) with a runtime `DType` tag
//! - `PrngKey` / `KeyStream` for fixed-order, non-overlapping random draws
//!
//! # Example
//! ```rust
//! use augpipe_core::{KeyStream, PrngKey};
//!
//! let mut keys = KeyStream::new(PrngKey::new(7));
//! let a = keys.next_key();
//! let b = keys.next_key();
//! assert_ne!(a, b);
//! ```
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Numeric allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::doc_markdown)]

// =============================================================================
// Modules
// =============================================================================

pub mod dtype;
pub mod error;
pub mod key;

// =============================================================================
// Re-exports
// =============================================================================

pub use dtype::{DType, Float, Scalar};
pub use error::{Error, Result};
pub use key::{KeyStream, PrngKey};

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::dtype::{DType, Float, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::key::{KeyStream, PrngKey};
}
