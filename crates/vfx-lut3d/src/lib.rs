//! 3D color lookup table operator.
//!
//! A [`Lut3D`] maps RGB input to RGB output through a cube of samples,
//! tagged with the bit depths its domain and range represent. The crate
//! covers three things:
//!
//! - The [`Lut3D`] operator itself: identity detection, bit-depth rescale,
//!   inversion, and content-addressable cache IDs (see [`Lut3D::finalize`]).
//! - [`compose`], which builds the LUT3D equivalent to running two forward
//!   LUT3Ds back to back.
//! - [`make_fast_lut3d_from_inverse`], which resamples an inverse-direction
//!   LUT3D into an equivalent forward one, suitable for fast repeated
//!   evaluation.
//!
//! Concrete interpolation kernels (trilinear, tetrahedral) and the Newton
//! search used to invert a LUT3D sample-by-sample are private; callers only
//! ever see the selector types ([`Interpolation`], [`InversionQuality`]) and
//! their resolved outcomes.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod compose;
mod error;
mod fast_inverse;
mod interp;
mod invert;
mod lut3d;
mod metadata;
mod ops;
mod sample_array;

pub use compose::compose;
pub use error::{Lut3DError, Lut3DResult};
pub use fast_inverse::{make_fast_lut3d_from_inverse, make_fast_lut3d_from_inverse_with_size};
pub use interp::{Direction, Interpolation, InversionQuality};
pub use lut3d::Lut3D;
pub use metadata::{merge as merge_metadata, Metadata};
pub use ops::{RangeOp, ScaleOp};
pub use sample_array::SampleArray;

/// Largest edge length a [`SampleArray`] (and therefore a [`Lut3D`]) may
/// have. Matches the largest grid size the source renderer ships LUTs at
/// (`129^3`); rejected by [`Lut3DError::BadGridSize`].
pub const MAX_SUPPORTED_LENGTH: usize = 129;

/// Default edge length used by [`make_fast_lut3d_from_inverse`].
pub const DEFAULT_FAST_INVERSE_GRID: usize = 48;

/// Per-sample tolerance [`SampleArray::is_identity`] uses when comparing a
/// grid against the identity transform.
pub const IDENTITY_TOLERANCE: f32 = 1e-4;
