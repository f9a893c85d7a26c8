//! Interpolation selector, direction, and inversion-quality tags for
//! [`crate::Lut3D`].

/// Interpolation selector stored on a [`crate::Lut3D`].
///
/// Not every variant is valid on a 3D LUT — see
/// [`Interpolation::concrete`] and [`crate::Lut3D::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Resolve to the renderer's default (concrete: `Linear`).
    #[default]
    Default,
    /// Trilinear interpolation.
    Linear,
    /// Nearest-neighbor lookup. Valid on a LUT3D, but silently implemented
    /// as `Linear` by [`Interpolation::concrete`] — the source renderer
    /// never shipped a dedicated nearest-neighbor 3D kernel.
    Nearest,
    /// Tetrahedral interpolation (concrete as-is).
    Tetrahedral,
    /// Cubic interpolation. Not valid on a LUT3D; only appears so that
    /// `validate()` has something to reject.
    Cubic,
    /// Resolve to the best available quality (concrete: `Tetrahedral`).
    Best,
    /// Unresolved/unrecognized value. Not valid on a LUT3D.
    Unknown,
}

impl Interpolation {
    /// The set of [`Interpolation`] values [`crate::Lut3D::validate`] accepts.
    pub const VALID: [Interpolation; 5] = [
        Interpolation::Default,
        Interpolation::Linear,
        Interpolation::Nearest,
        Interpolation::Tetrahedral,
        Interpolation::Best,
    ];

    /// Whether this value is one `validate()` accepts for a LUT3D.
    #[inline]
    pub fn is_valid_for_lut3d(&self) -> bool {
        Self::VALID.contains(self)
    }

    /// Resolves an abstract selector (`Default`, `Best`) to the concrete
    /// algorithm that will actually run.
    ///
    /// `Tetrahedral` and `Best` resolve to `Tetrahedral`; everything else
    /// (including `Nearest`, per the source renderer's behavior) resolves
    /// to `Linear`.
    #[inline]
    pub fn concrete(&self) -> Interpolation {
        match self {
            Interpolation::Tetrahedral | Interpolation::Best => Interpolation::Tetrahedral,
            _ => Interpolation::Linear,
        }
    }

    /// Stable name used when rendering a [`crate::Lut3D`] cache ID.
    pub fn name(&self) -> &'static str {
        match self {
            Interpolation::Default => "default",
            Interpolation::Linear => "linear",
            Interpolation::Nearest => "nearest",
            Interpolation::Tetrahedral => "tetrahedral",
            Interpolation::Cubic => "cubic",
            Interpolation::Best => "best",
            Interpolation::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Direction a [`crate::Lut3D`] represents.
///
/// The stored sample array is always the forward function's samples;
/// `Inverse` only changes how bit-depth tags and rescaling are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// The array encodes the forward function.
    #[default]
    Forward,
    /// The array encodes the forward function, but this LUT is to be
    /// evaluated as its inverse.
    Inverse,
}

impl Direction {
    /// Stable name used when rendering a [`crate::Lut3D`] cache ID.
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Inverse => "inverse",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Inversion-quality hint stored on a [`crate::Lut3D`].
///
/// Not part of structural equality or the cache ID (see
/// [`crate::Lut3D::finalize`]) — two LUT3Ds that differ only in this hint
/// are still considered the same operator by downstream caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionQuality {
    /// Resolve to the renderer's default (concrete: `Fast`).
    #[default]
    Default,
    /// Cheap approximate inversion.
    Fast,
    /// Exact inversion via resampling through the exact inverse renderer.
    Exact,
    /// Resolve to the best available quality (concrete: `Exact`).
    Best,
}

impl InversionQuality {
    /// Resolves an abstract selector to the concrete quality that will
    /// actually run: `Exact`/`Best` -> `Exact`; `Fast`/`Default` -> `Fast`.
    #[inline]
    pub fn concrete(&self) -> InversionQuality {
        match self {
            InversionQuality::Exact | InversionQuality::Best => InversionQuality::Exact,
            _ => InversionQuality::Fast,
        }
    }
}
