//! LUT3D error types.

use thiserror::Error;

/// Result type for LUT3D operations.
pub type Lut3DResult<T> = Result<T, Lut3DError>;

/// Errors that can occur while constructing, validating, or composing
/// [`crate::Lut3D`] operators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Lut3DError {
    /// Edge length requested at construction or resize exceeds
    /// [`crate::MAX_SUPPORTED_LENGTH`].
    #[error("grid edge length {requested} must not be greater than {max}")]
    BadGridSize {
        /// The edge length that was requested.
        requested: usize,
        /// The maximum supported edge length.
        max: usize,
    },

    /// `validate()` found an interpolation value outside the valid set for
    /// a LUT3D.
    #[error("invalid interpolation for a 3D LUT: {0:?}")]
    BadInterpolation(crate::Interpolation),

    /// `validate()` found a sample array whose channel count isn't 3.
    #[error("invalid channel count: expected 3, got {0}")]
    BadChannelCount(usize),

    /// `compose()` was called with `A.bd_out != B.bd_in`.
    #[error("bit depth mismatch: A output is {a_out} but B input is {b_in}")]
    BitDepthMismatch {
        /// `A`'s output bit depth.
        a_out: vfx_core::BitDepth,
        /// `B`'s input bit depth.
        b_in: vfx_core::BitDepth,
    },

    /// The fast-inverse builder was invoked on a forward-direction LUT.
    #[error("fast inverse builder requires an inverse-direction LUT")]
    WrongDirection,

    /// `set_array_from_red_fastest` received a buffer whose length doesn't
    /// equal `3 * L^3`.
    #[error("length mismatch: expected {expected} values, got {got}")]
    LengthMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        got: usize,
    },
}
