//! Tensor Creation Functions
//!
//! Constant builders: fills, scalar broadcasts and literal arrays. The
//! sampler broadcasts its neutral value with these, and label columns are
//! materialized from literal arrays.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use augpipe_core::dtype::Scalar;
use augpipe_core::error::Result;

use crate::shape::numel;
use crate::tensor::Tensor;

// =============================================================================
// Fills
// =============================================================================

/// Creates a tensor filled with zeros (`T::default()`).
///
/// # Example
/// ```rust
/// use augpipe_tensor::zeros;
/// let t = zeros::<f32>(&[2, 3]);
/// assert_eq!(t.numel(), 6);
/// ```
#[must_use]
pub fn zeros<T: Scalar>(shape: &[usize]) -> Tensor<T> {
    full(shape, T::default())
}

/// Creates a tensor filled with a specific value.
pub fn full<T: Scalar>(shape: &[usize], value: T) -> Tensor<T> {
    Tensor::from_parts(vec![value; numel(shape)], shape)
}

/// Broadcasts a scalar to `shape`.
pub fn broadcast_scalar<T: Scalar>(value: T, shape: &[usize]) -> Tensor<T> {
    full(shape, value)
}

// =============================================================================
// Literals
// =============================================================================

/// Materializes a literal array with the given shape.
///
/// Fails if `values` does not hold exactly `numel(shape)` elements.
pub fn constant<T: Scalar>(values: &[T], shape: &[usize]) -> Result<Tensor<T>> {
    Tensor::from_vec(values.to_vec(), shape)
}

// =============================================================================
// Tests
// =============================================================================
