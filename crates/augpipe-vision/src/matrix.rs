//! Affine Matrices - Homogeneous Transform Builders
//!
//! Typed builders for the 3x3 (2D geometry) and 4x4 (color / 3D) homogeneous
//! matrices the composers accumulate. Every entry of a matrix literal is a
//! [`Param`]: either one scalar or one value per sample. A literal with no
//! batched entry yields a single constant matrix; otherwise every entry is
//! broadcast to the common batch length and one matrix per sample is built.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use augpipe_core::error::{Error, Result};

// =============================================================================
// Param
// =============================================================================

/// One entry of a matrix literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// The same value for every sample.
    Scalar(f32),
    /// One value per sample.
    Batch(Vec<f32>),
}

impl Param {
    /// Batch length, or `None` for a scalar.
    #[must_use]
    pub fn batch_len(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::Batch(values) => Some(values.len()),
        }
    }

    /// Value for sample `i`; scalars broadcast.
    #[must_use]
    pub fn at(&self, i: usize) -> f32 {
        match self {
            Self::Scalar(v) => *v,
            Self::Batch(values) => values[i],
        }
    }

    /// Applies `f` element-wise, preserving scalar-ness.
    #[must_use]
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        match self {
            Self::Scalar(v) => Self::Scalar(f(*v)),
            Self::Batch(values) => Self::Batch(values.iter().map(|&v| f(v)).collect()),
        }
    }

    /// Combines two params element-wise under the broadcasting rule.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f32, f32) -> f32) -> Result<Self> {
        match broadcast_len(&[self, other])? {
            None => Ok(Self::Scalar(f(self.at(0), other.at(0)))),
            Some(n) => Ok(Self::Batch(
                (0..n).map(|i| f(self.at(i), other.at(i))).collect(),
            )),
        }
    }
}

impl From<f32> for Param {
    fn from(value: f32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f32>> for Param {
    fn from(values: Vec<f32>) -> Self {
        Self::Batch(values)
    }
}

impl From<&[f32]> for Param {
    fn from(values: &[f32]) -> Self {
        Self::Batch(values.to_vec())
    }
}

impl From<&Param> for Param {
    fn from(param: &Param) -> Self {
        param.clone()
    }
}

/// The broadcasting rule shared by every builder: all batched entries must
/// agree on their length, scalars broadcast to it.
pub fn broadcast_len(params: &[&Param]) -> Result<Option<usize>> {
    let mut batch: Option<usize> = None;
    for param in params {
        if let Some(len) = param.batch_len() {
            match batch {
                Some(existing) if existing != len => {
                    return Err(Error::broadcast(&[existing], &[len]));
                }
                _ => batch = Some(len),
            }
        }
    }
    Ok(batch)
}

// =============================================================================
// Affine
// =============================================================================

/// A dense `D x D` matrix, row-major.
pub type Mat<const D: usize> = [[f32; D]; D];

fn identity_mat<const D: usize>() -> Mat<D> {
    let mut m = [[0.0; D]; D];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    m
}

fn mat_mul<const D: usize>(a: &Mat<D>, b: &Mat<D>) -> Mat<D> {
    let mut out = [[0.0; D]; D];
    for i in 0..D {
        for j in 0..D {
            out[i][j] = (0..D).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// A homogeneous transform: one constant matrix or one matrix per sample.
#[derive(Debug, Clone, PartialEq)]
pub enum Affine<const D: usize> {
    /// Batch-independent matrix.
    Single(Mat<D>),
    /// One matrix per sample.
    Batch(Vec<Mat<D>>),
}

/// 3x3 transform of 2D homogeneous coordinates.
pub type Affine2 = Affine<3>;

/// 4x4 transform of 3D (or RGB + offset) homogeneous coordinates.
pub type Affine3 = Affine<4>;

impl<const D: usize> Affine<D> {
    /// The identity matrix.
    #[must_use]
    pub fn identity() -> Self {
        Self::Single(identity_mat())
    }

    /// Batch length, or `None` for a constant matrix.
    #[must_use]
    pub fn batch_len(&self) -> Option<usize> {
        match self {
            Self::Single(_) => None,
            Self::Batch(mats) => Some(mats.len()),
        }
    }

    /// Matrix for sample `i`; a constant matrix serves every sample.
    #[must_use]
    pub fn sample(&self, i: usize) -> &Mat<D> {
        match self {
            Self::Single(m) => m,
            Self::Batch(mats) => &mats[i],
        }
    }

    /// Matrix product `self · rhs`, broadcasting constant operands.
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        match (self, rhs) {
            (Self::Single(a), Self::Single(b)) => Ok(Self::Single(mat_mul(a, b))),
            _ => {
                let n = match (self.batch_len(), rhs.batch_len()) {
                    (Some(a), Some(b)) if a != b => return Err(Error::broadcast(&[a], &[b])),
                    (Some(n), _) | (None, Some(n)) => n,
                    (None, None) => unreachable!("both constant handled above"),
                };
                Ok(Self::Batch(
                    (0..n)
                        .map(|i| mat_mul(self.sample(i), rhs.sample(i)))
                        .collect(),
                ))
            }
        }
    }

    /// Expands to exactly `n` per-sample matrices.
    pub fn broadcast_to(&self, n: usize) -> Result<Vec<Mat<D>>> {
        match self {
            Self::Single(m) => Ok(vec![*m; n]),
            Self::Batch(mats) if mats.len() == n => Ok(mats.clone()),
            Self::Batch(mats) => Err(Error::broadcast(&[mats.len()], &[n])),
        }
    }
}

impl Affine<3> {
    /// Maps a 2D point through the matrix of sample `i`.
    #[must_use]
    pub fn transform_point(&self, i: usize, point: [f32; 2]) -> [f32; 2] {
        let m = self.sample(i);
        [
            m[0][0] * point[0] + m[0][1] * point[1] + m[0][2],
            m[1][0] * point[0] + m[1][1] * point[1] + m[1][2],
        ]
    }
}

// =============================================================================
// Matrix Literal
// =============================================================================

/// Builds a `D x D` matrix from row-major entries.
///
/// Fails with [`Error::MalformedMatrix`] if the rows differ in length or the
/// literal is not `D x D`, and with a broadcast error if batched entries
/// disagree on their length.
pub fn matrix<const D: usize>(rows: Vec<Vec<Param>>) -> Result<Affine<D>> {
    let width = rows.first().map_or(0, Vec::len);
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(Error::MalformedMatrix {
                row: i,
                expected: width,
                actual: row.len(),
            });
        }
    }
    if rows.len() != D {
        return Err(Error::MalformedMatrix {
            row: rows.len(),
            expected: D,
            actual: rows.len(),
        });
    }
    if width != D {
        return Err(Error::MalformedMatrix {
            row: 0,
            expected: D,
            actual: width,
        });
    }

    let entries: Vec<&Param> = rows.iter().flatten().collect();
    let build = |i: usize| {
        let mut m = [[0.0; D]; D];
        for (r, row) in rows.iter().enumerate() {
            for (c, entry) in row.iter().enumerate() {
                m[r][c] = entry.at(i);
            }
        }
        m
    };

    Ok(match broadcast_len(&entries)? {
        None => Affine::Single(build(0)),
        Some(n) => Affine::Batch((0..n).map(build).collect()),
    })
}

fn s(value: f32) -> Param {
    Param::Scalar(value)
}

// =============================================================================
// Constructors
// =============================================================================

/// 2D translation by `(tx, ty)`.
pub fn translate2d(tx: impl Into<Param>, ty: impl Into<Param>) -> Result<Affine2> {
    matrix(vec![
        vec![s(1.0), s(0.0), tx.into()],
        vec![s(0.0), s(1.0), ty.into()],
        vec![s(0.0), s(0.0), s(1.0)],
    ])
}

/// 3D translation by `(tx, ty, tz)`.
pub fn translate3d(
    tx: impl Into<Param>,
    ty: impl Into<Param>,
    tz: impl Into<Param>,
) -> Result<Affine3> {
    matrix(vec![
        vec![s(1.0), s(0.0), s(0.0), tx.into()],
        vec![s(0.0), s(1.0), s(0.0), ty.into()],
        vec![s(0.0), s(0.0), s(1.0), tz.into()],
        vec![s(0.0), s(0.0), s(0.0), s(1.0)],
    ])
}

/// 2D axis-aligned scale.
pub fn scale2d(sx: impl Into<Param>, sy: impl Into<Param>) -> Result<Affine2> {
    matrix(vec![
        vec![sx.into(), s(0.0), s(0.0)],
        vec![s(0.0), sy.into(), s(0.0)],
        vec![s(0.0), s(0.0), s(1.0)],
    ])
}

/// 3D axis-aligned scale.
pub fn scale3d(
    sx: impl Into<Param>,
    sy: impl Into<Param>,
    sz: impl Into<Param>,
) -> Result<Affine3> {
    matrix(vec![
        vec![sx.into(), s(0.0), s(0.0), s(0.0)],
        vec![s(0.0), sy.into(), s(0.0), s(0.0)],
        vec![s(0.0), s(0.0), sz.into(), s(0.0)],
        vec![s(0.0), s(0.0), s(0.0), s(1.0)],
    ])
}

/// 2D rotation by `theta` radians (counter-clockwise in a y-up frame).
pub fn rotate2d(theta: impl Into<Param>) -> Result<Affine2> {
    let theta = theta.into();
    let cos = theta.map(f32::cos);
    let sin = theta.map(f32::sin);
    let neg_sin = theta.map(|t| (-t).sin());
    matrix(vec![
        vec![cos.clone(), neg_sin, s(0.0)],
        vec![sin, cos, s(0.0)],
        vec![s(0.0), s(0.0), s(1.0)],
    ])
}

/// 3D rotation by `theta` radians about the unit `axis`.
pub fn rotate3d(axis: [f32; 3], theta: impl Into<Param>) -> Result<Affine3> {
    let theta = theta.into();
    let [vx, vy, vz] = axis;

    // Rodrigues: c·I + (1 - c)·v⊗v + s·[v]×
    let entry = |outer: f32, cross: f32, diagonal: bool| {
        theta.map(|t| {
            let (st, ct) = t.sin_cos();
            let base = if diagonal { ct } else { 0.0 };
            base + outer * (1.0 - ct) + cross * st
        })
    };

    matrix(vec![
        vec![entry(vx * vx, 0.0, true), entry(vx * vy, -vz, false), entry(vx * vz, vy, false), s(0.0)],
        vec![entry(vy * vx, vz, false), entry(vy * vy, 0.0, true), entry(vy * vz, -vx, false), s(0.0)],
        vec![entry(vz * vx, -vy, false), entry(vz * vy, vx, false), entry(vz * vz, 0.0, true), s(0.0)],
        vec![s(0.0), s(0.0), s(0.0), s(1.0)],
    ])
}

/// Inverse of [`translate2d`].
pub fn translate2d_inv(tx: impl Into<Param>, ty: impl Into<Param>) -> Result<Affine2> {
    translate2d(tx.into().map(|v| -v), ty.into().map(|v| -v))
}

/// Inverse of [`scale2d`].
pub fn scale2d_inv(sx: impl Into<Param>, sy: impl Into<Param>) -> Result<Affine2> {
    scale2d(sx.into().map(|v| 1.0 / v), sy.into().map(|v| 1.0 / v))
}

/// Inverse of [`rotate2d`].
pub fn rotate2d_inv(theta: impl Into<Param>) -> Result<Affine2> {
    rotate2d(theta.into().map(|v| -v))
}

// =============================================================================
// Tests
// =============================================================================
