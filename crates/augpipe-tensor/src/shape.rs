//! Shape and Strides - Layout Arithmetic
//!
//! A tensor view is `(shape, strides, offset)` over flat storage. Strides are
//! signed, so a flipped axis walks its storage backwards.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use smallvec::SmallVec;

use augpipe_core::error::{Error, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// Dimensions of a tensor. NHWC batches fit inline.
pub type Shape = SmallVec<[usize; 4]>;

/// Signed element steps per dimension.
pub type Strides = SmallVec<[isize; 4]>;

// =============================================================================
// Layout
// =============================================================================

/// Number of elements in `shape` (1 for a 0-d shape).
#[must_use]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Dense C-order strides.
#[must_use]
pub fn row_major_strides(shape: &[usize]) -> Strides {
    let mut strides: Strides = shape
        .iter()
        .rev()
        .scan(1isize, |step, &dim| {
            let current = *step;
            *step *= dim as isize;
            Some(current)
        })
        .collect();
    strides.reverse();
    strides
}

/// True if `strides` are the dense C-order strides of `shape`.
#[must_use]
pub fn is_row_major(shape: &[usize], strides: &[isize]) -> bool {
    strides == row_major_strides(shape).as_slice()
}

/// Signed storage displacement of `indices` under `strides`.
#[must_use]
pub fn storage_offset(indices: &[usize], strides: &[isize]) -> isize {
    indices
        .iter()
        .zip(strides)
        .map(|(&i, &s)| i as isize * s)
        .sum()
}

/// Calls `visit` with the storage position of every element of a view, in
/// row-major order of `shape`.
pub fn walk(shape: &[usize], strides: &[isize], offset: usize, mut visit: impl FnMut(usize)) {
    if shape.contains(&0) {
        return;
    }
    let mut index: Shape = SmallVec::from_elem(0, shape.len());
    let mut position = offset as isize;
    loop {
        visit(position as usize);
        // odometer step: bump the last axis, carry leftwards
        let mut axis = shape.len();
        loop {
            if axis == 0 {
                return;
            }
            axis -= 1;
            index[axis] += 1;
            position += strides[axis];
            if index[axis] < shape[axis] {
                break;
            }
            position -= strides[axis] * shape[axis] as isize;
            index[axis] = 0;
        }
    }
}

/// Resolves a possibly negative axis against `ndim`.
pub fn resolve_axis(axis: i64, ndim: usize) -> Result<usize> {
    let resolved = if axis < 0 { axis + ndim as i64 } else { axis };
    if (0..ndim as i64).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(Error::InvalidDimension { index: axis, ndim })
    }
}

/// Checks that `indices` address an element of `shape`.
pub fn check_indices(indices: &[usize], shape: &[usize]) -> Result<()> {
    if indices.len() != shape.len() {
        return Err(Error::shape_mismatch(shape, &[indices.len()]));
    }
    match indices.iter().zip(shape).find(|(&i, &dim)| i >= dim) {
        Some((&index, &size)) => Err(Error::IndexOutOfBounds { index, size }),
        None => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================
