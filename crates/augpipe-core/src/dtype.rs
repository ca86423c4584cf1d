//! Element Types - What a Tensor Can Hold
//!
//! The pipeline touches exactly three element types: `f32` for pixels,
//! matrices and labels, `i32` for discrete draws (flip bits, quarter turns),
//! and `bool` for per-sample gates.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;

use num_traits::Float as NumFloat;

// =============================================================================
// DType
// =============================================================================

/// Runtime tag for a tensor's element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DType {
    /// Pixels, matrices and labels.
    #[default]
    F32,
    /// Discrete draws.
    I32,
    /// Gates.
    Bool,
}

impl DType {
    /// Lowercase Rust name of the element type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::I32 => "i32",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Traits
// =============================================================================

/// An element type a tensor can store.
///
/// `Default` is the neutral fill: `0.0`, `0` or `false`.
pub trait Scalar: Copy + fmt::Debug + Default + PartialEq + Send + Sync + 'static {
    /// Runtime tag of the implementing type.
    const DTYPE: DType;
}

/// Element types random real draws can produce.
pub trait Float: Scalar + NumFloat {}

impl Scalar for f32 {
    const DTYPE: DType = DType::F32;
}

impl Scalar for i32 {
    const DTYPE: DType = DType::I32;
}

impl Scalar for bool {
    const DTYPE: DType = DType::Bool;
}

impl Float for f32 {}

// =============================================================================
// Tests
// =============================================================================
