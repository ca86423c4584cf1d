//! Tensor - Core N-Dimensional Array Type
//!
//! The `Tensor` struct is the array type every augpipe stage reads and
//! writes. Storage is reference-counted so that `transpose` and `flip` are
//! cheap views; anything that needs a dense buffer calls [`Tensor::to_vec`].
//!
//! # Key Features
//! - Generic over element type (`f32`, `i32`, `bool`)
//! - Zero-copy transpose and flip views (flips use negative strides)
//! - Per-sample and element-wise `select` for branch-free gating
//! - Flat `gather` for index-grid driven pixel blits
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;
use std::sync::Arc;

use augpipe_core::dtype::{DType, Scalar};
use augpipe_core::error::{Error, Result};

use crate::shape::{
    check_indices, is_row_major, numel, resolve_axis, row_major_strides, storage_offset, walk,
    Shape, Strides,
};

// =============================================================================
// Tensor Struct
// =============================================================================

/// An N-dimensional array of scalar values.
#[derive(Clone)]
pub struct Tensor<T: Scalar> {
    /// Underlying data storage (reference-counted).
    pub(crate) storage: Arc<Vec<T>>,
    /// Shape of the tensor (dimensions).
    pub(crate) shape: Shape,
    /// Signed step per dimension.
    pub(crate) strides: Strides,
    /// Storage position of element `[0, 0, ...]`.
    pub(crate) offset: usize,
}

impl<T: Scalar> Tensor<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a new tensor from a vector with the given shape.
    ///
    /// # Returns
    /// New tensor, or error if shape doesn't match data length.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        if numel(shape) != data.len() {
            return Err(Error::shape_mismatch(&[data.len()], shape));
        }
        Ok(Self::from_parts(data, shape))
    }

    /// Builds a tensor whose length is correct by construction.
    pub(crate) fn from_parts(data: Vec<T>, shape: &[usize]) -> Self {
        debug_assert_eq!(data.len(), numel(shape));
        Self {
            storage: Arc::new(data),
            shape: Shape::from_slice(shape),
            strides: row_major_strides(shape),
            offset: 0,
        }
    }

    /// Creates a tensor filled with zeros (`T::default()`).
    #[must_use]
    pub fn zeros(shape: &[usize]) -> Self {
        crate::creation::zeros(shape)
    }

    /// Creates a tensor filled with a constant value.
    #[must_use]
    pub fn full(shape: &[usize], value: T) -> Self {
        crate::creation::full(shape, value)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the shape of the tensor.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    #[must_use]
    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    /// Returns the runtime element type.
    #[must_use]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    /// Returns the element at the given indices.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        check_indices(indices, &self.shape)?;
        let position = self.offset as isize + storage_offset(indices, &self.strides);
        Ok(self.storage[position as usize])
    }

    /// Returns the data as a dense row-major vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        if is_row_major(&self.shape, &self.strides) {
            return self.storage[self.offset..self.offset + self.numel()].to_vec();
        }
        let mut data = Vec::with_capacity(self.numel());
        walk(&self.shape, &self.strides, self.offset, |p| {
            data.push(self.storage[p]);
        });
        data
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Swaps two dimensions (view).
    pub fn transpose(&self, dim0: i64, dim1: i64) -> Result<Self> {
        let d0 = resolve_axis(dim0, self.ndim())?;
        let d1 = resolve_axis(dim1, self.ndim())?;
        let mut view = self.clone();
        view.shape.swap(d0, d1);
        view.strides.swap(d0, d1);
        Ok(view)
    }

    /// Reverses the order of elements along one dimension (view).
    pub fn flip(&self, dim: i64) -> Result<Self> {
        let d = resolve_axis(dim, self.ndim())?;
        let mut view = self.clone();
        if self.shape[d] > 0 {
            let last = (self.shape[d] - 1) as isize * self.strides[d];
            view.offset = (self.offset as isize + last) as usize;
        }
        view.strides[d] = -self.strides[d];
        Ok(view)
    }

    // =========================================================================
    // Element-wise
    // =========================================================================

    /// Applies `f` to every element.
    #[must_use]
    pub fn map<U: Scalar>(&self, f: impl Fn(T) -> U) -> Tensor<U> {
        let data: Vec<U> = self.to_vec().into_iter().map(f).collect();
        Tensor::from_parts(data, &self.shape)
    }

    /// Combines two tensors of identical shape element by element.
    pub fn zip_map<U: Scalar, V: Scalar>(
        &self,
        other: &Tensor<U>,
        f: impl Fn(T, U) -> V,
    ) -> Result<Tensor<V>> {
        if self.shape != other.shape {
            return Err(Error::shape_mismatch(&self.shape, &other.shape));
        }
        let data: Vec<V> = self
            .to_vec()
            .into_iter()
            .zip(other.to_vec())
            .map(|(a, b)| f(a, b))
            .collect();
        Ok(Tensor::from_parts(data, &self.shape))
    }

    /// Picks `on_true` where `mask` is set and `on_false` elsewhere.
    ///
    /// `mask` must match a leading prefix of the value shape and is broadcast
    /// over the trailing dimensions, so a `[N]` mask selects whole samples of
    /// an `[N, H, W, C]` batch. Both branches are always fully materialized.
    pub fn select(mask: &Tensor<bool>, on_true: &Self, on_false: &Self) -> Result<Self> {
        if on_true.shape != on_false.shape {
            return Err(Error::shape_mismatch(&on_true.shape, &on_false.shape));
        }
        let prefix = mask.ndim();
        if prefix > on_true.ndim() || mask.shape() != &on_true.shape[..prefix] {
            return Err(Error::broadcast(mask.shape(), &on_true.shape));
        }

        let inner = numel(&on_true.shape[prefix..]);
        let mask = mask.to_vec();
        let data: Vec<T> = on_true
            .to_vec()
            .into_iter()
            .zip(on_false.to_vec())
            .enumerate()
            .map(|(i, (t, f))| if mask[i / inner.max(1)] { t } else { f })
            .collect();

        Ok(Self::from_parts(data, &on_true.shape))
    }

    /// Gathers elements by flat (row-major) index into a tensor of `shape`.
    pub fn gather(&self, indices: &[usize], shape: &[usize]) -> Result<Self> {
        if indices.len() != numel(shape) {
            return Err(Error::shape_mismatch(&[indices.len()], shape));
        }

        let source = self.to_vec();
        let data = indices
            .iter()
            .map(|&i| {
                source.get(i).copied().ok_or(Error::IndexOutOfBounds {
                    index: i,
                    size: source.len(),
                })
            })
            .collect::<Result<Vec<T>>>()?;

        Ok(Self::from_parts(data, shape))
    }
}

// =============================================================================
// Formatting
// =============================================================================

impl<T: Scalar> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor(shape={:?}, dtype={}", self.shape(), self.dtype())?;
        if self.numel() <= 16 {
            write!(f, ", data={:?}", self.to_vec())?;
        }
        write!(f, ")")
    }
}

impl<T: Scalar> PartialEq for Tensor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.to_vec() == other.to_vec()
    }
}

// =============================================================================
// Tests
// =============================================================================
