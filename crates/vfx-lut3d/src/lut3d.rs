//! 3-dimensional lookup table operator.
//!
//! A [`Lut3D`] maps RGB input to RGB output through a cube of sample
//! values, tagged with the bit depths its domain and range represent. The
//! stored [`SampleArray`] always holds the forward function's samples —
//! [`Lut3D::direction`] only changes how bit-depth tags and rescaling are
//! interpreted, not what's kept in memory.

use std::sync::Mutex;

use tracing::debug;
use vfx_core::BitDepth;

use crate::error::{Lut3DError, Lut3DResult};
use crate::interp::{Direction, Interpolation, InversionQuality};
use crate::metadata::Metadata;
use crate::ops::RangeOp;
use crate::sample_array::SampleArray;
use crate::MAX_SUPPORTED_LENGTH;

/// A 3-dimensional lookup table operator.
///
/// Wraps a [`SampleArray`] with the tags that give its samples meaning: the
/// bit depths its domain (`bd_in`) and range (`bd_out`) represent, an
/// interpolation selector, a direction, an inversion-quality hint, and
/// format metadata carried along for downstream serializers. Equality and
/// the [`Lut3D::finalize`] cache ID both ignore inversion quality and
/// metadata.
pub struct Lut3D {
    array: SampleArray,
    bd_in: BitDepth,
    bd_out: BitDepth,
    interpolation: Interpolation,
    direction: Direction,
    inversion_quality: InversionQuality,
    metadata: Metadata,
    cache_id: Mutex<Option<String>>,
}

impl Lut3D {
    /// Creates a forward identity LUT3D of edge length `length` with
    /// `bd_in = bd_out = F32`, `interpolation = Default`, and
    /// `inversion_quality = Fast`.
    ///
    /// Fails with [`Lut3DError::BadGridSize`] if `length > MAX_SUPPORTED_LENGTH`.
    pub fn new(length: usize) -> Lut3DResult<Self> {
        Self::new_full(
            BitDepth::F32,
            BitDepth::F32,
            Metadata::default(),
            Interpolation::Default,
            length,
        )
    }

    /// Creates a forward identity LUT3D with the given bit depths,
    /// metadata, and interpolation selector.
    pub fn new_full(
        bd_in: BitDepth,
        bd_out: BitDepth,
        metadata: Metadata,
        interpolation: Interpolation,
        length: usize,
    ) -> Lut3DResult<Self> {
        let array = SampleArray::new(length, bd_out)?;
        Ok(Self {
            array,
            bd_in,
            bd_out,
            interpolation,
            direction: Direction::Forward,
            inversion_quality: InversionQuality::Fast,
            metadata,
            cache_id: Mutex::new(None),
        })
    }

    /// Edge length of the backing [`SampleArray`].
    #[inline]
    pub fn length(&self) -> usize {
        self.array.length()
    }

    /// Input bit depth tag.
    #[inline]
    pub fn bit_depth_in(&self) -> BitDepth {
        self.bd_in
    }

    /// Output bit depth tag.
    #[inline]
    pub fn bit_depth_out(&self) -> BitDepth {
        self.bd_out
    }

    /// The stored interpolation selector, unresolved (may be `Default` or
    /// `Best`). See [`Lut3D::concrete_interpolation`] for the algorithm
    /// that actually runs.
    #[inline]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// The interpolation algorithm that actually runs: `Tetrahedral` for
    /// `{Tetrahedral, Best}`, `Linear` otherwise (including `Nearest`).
    #[inline]
    pub fn concrete_interpolation(&self) -> Interpolation {
        self.interpolation.concrete()
    }

    /// The stored inversion-quality hint, unresolved.
    #[inline]
    pub fn inversion_quality(&self) -> InversionQuality {
        self.inversion_quality
    }

    /// The inversion quality that actually runs: `Exact` for
    /// `{Exact, Best}`, `Fast` otherwise.
    #[inline]
    pub fn concrete_inversion_quality(&self) -> InversionQuality {
        self.inversion_quality.concrete()
    }

    /// Direction this LUT represents. The backing array always holds the
    /// forward function's samples regardless of this tag.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Format metadata tree. Never part of equality or the cache ID.
    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable access to the format metadata tree.
    #[inline]
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Read-only access to the backing sample array.
    #[inline]
    pub fn array(&self) -> &SampleArray {
        &self.array
    }

    /// Mutable access to the backing sample array.
    ///
    /// Invalidates the cached cache ID, since any caller reaching for
    /// mutable access to the array is presumed to be about to change its
    /// bytes — see [`Lut3D::finalize`].
    #[inline]
    pub fn array_mut(&mut self) -> &mut SampleArray {
        self.invalidate_cache_id();
        &mut self.array
    }

    /// Stores the interpolation selector verbatim.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
        self.invalidate_cache_id();
    }

    /// Stores the inversion-quality hint verbatim. Excluded from equality
    /// and the cache ID, so this deliberately does not invalidate it.
    pub fn set_inversion_quality(&mut self, quality: InversionQuality) {
        self.inversion_quality = quality;
    }

    /// Sets the input bit depth. On an `Inverse`-direction LUT the backing
    /// array is rescaled by `M(d) / M(bd_in)` first, because the stored
    /// array still represents samples in the original forward-output
    /// space. On a `Forward`-direction LUT this only updates the tag.
    pub fn set_input_bit_depth(&mut self, d: BitDepth) {
        if self.direction == Direction::Inverse {
            let k = (d.max_value() / self.bd_in.max_value()) as f32;
            self.array.scale(k);
        }
        self.bd_in = d;
        self.invalidate_cache_id();
    }

    /// Sets the output bit depth. On a `Forward`-direction LUT the backing
    /// array is rescaled by `M(d) / M(bd_out)` first. On an `Inverse`
    /// -direction LUT this only updates the tag.
    pub fn set_output_bit_depth(&mut self, d: BitDepth) {
        if self.direction == Direction::Forward {
            let k = (d.max_value() / self.bd_out.max_value()) as f32;
            self.array.scale(k);
        }
        self.bd_out = d;
        self.invalidate_cache_id();
    }

    /// Repacks `v` (red-fastest-among-samples order) into the backing
    /// array's canonical blue-fastest order.
    pub fn set_array_from_red_fastest(&mut self, v: &[f32]) -> Lut3DResult<()> {
        self.array.set_from_red_fastest(v)?;
        self.invalidate_cache_id();
        Ok(())
    }

    /// Validates structural invariants: interpolation must be one of the
    /// values valid for a LUT3D, channel count must be 3, and edge length
    /// must not exceed [`MAX_SUPPORTED_LENGTH`].
    pub fn validate(&self) -> Lut3DResult<()> {
        if !self.interpolation.is_valid_for_lut3d() {
            return Err(Lut3DError::BadInterpolation(self.interpolation));
        }
        if SampleArray::CHANNELS != 3 {
            return Err(Lut3DError::BadChannelCount(SampleArray::CHANNELS));
        }
        if self.array.length() > MAX_SUPPORTED_LENGTH {
            return Err(Lut3DError::BadGridSize {
                requested: self.array.length(),
                max: MAX_SUPPORTED_LENGTH,
            });
        }
        Ok(())
    }

    /// Always `false` — a 3D LUT clamps to its domain, so it is never a
    /// pass-through the pipeline runtime can skip outright.
    #[inline]
    pub fn is_no_op(&self) -> bool {
        false
    }

    /// Always `true` — a LUT3D can map any input channel to any output
    /// channel.
    #[inline]
    pub fn has_channel_crosstalk(&self) -> bool {
        true
    }

    /// Whether every stored sample matches the identity ramp for
    /// `bit_depth_out()` within [`crate::IDENTITY_TOLERANCE`] absolute.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.array.is_identity(self.bd_out)
    }

    /// The clamp-range description an identity LUT3D may be replaced with
    /// during pipeline optimization: `[0, M(bd_in)] -> [0, M(bd_out)]`.
    pub fn identity_replacement(&self) -> RangeOp {
        RangeOp {
            min_in_value: 0.0,
            max_in_value: self.bd_in.max_value(),
            min_out_value: 0.0,
            max_out_value: self.bd_out.max_value(),
        }
    }

    /// Flips direction and swaps `bd_in`/`bd_out` without rescaling the
    /// backing array — it continues to store the forward function's
    /// samples.
    pub fn inverse(&self) -> Self {
        let mut flipped = self.clone();
        flipped.direction = match self.direction {
            Direction::Forward => Direction::Inverse,
            Direction::Inverse => Direction::Forward,
        };
        std::mem::swap(&mut flipped.bd_in, &mut flipped.bd_out);
        flipped.invalidate_cache_id();
        flipped
    }

    /// Whether `self` and `other` are forward/inverse counterparts of one
    /// another.
    ///
    /// Requires one `Forward` and one `Inverse` direction; otherwise
    /// `false`. If the forward LUT's output depth matches the inverse
    /// LUT's input depth exactly, arrays are compared directly. Otherwise
    /// the forward LUT is cloned, its output bit depth rescaled to match,
    /// and arrays compared. Comparison is exact float equality, not
    /// tolerance-based: after bit-depth harmonization the two arrays are
    /// expected to be bit-identical, not merely close.
    pub fn is_inverse(&self, other: &Lut3D) -> bool {
        let (forward, inverse) = match (self.direction, other.direction) {
            (Direction::Forward, Direction::Inverse) => (self, other),
            (Direction::Inverse, Direction::Forward) => (other, self),
            _ => return false,
        };

        if forward.bd_out.max_value() == inverse.bd_in.max_value() {
            return forward.array == inverse.array;
        }

        if forward.array.len() != inverse.array.len() {
            return false;
        }

        let mut rescaled = forward.clone();
        rescaled.set_output_bit_depth(inverse.bd_in);
        rescaled.array == inverse.array
    }

    /// Computes the cache ID once — `"<32-hex-md5> <interp> <direction>
    /// <bd-in> <bd-out>"` over the raw float buffer — and caches it for
    /// subsequent calls. Concurrent callers converge on the same
    /// computation via an internal mutex; no other method needs one. Runs
    /// [`Lut3D::validate`] first.
    pub fn finalize(&self) -> Lut3DResult<String> {
        self.validate()?;
        let mut guard = self.cache_id.lock().expect("cache id mutex poisoned");
        if let Some(id) = guard.as_ref() {
            return Ok(id.clone());
        }
        let mut bytes = Vec::with_capacity(self.array.as_slice().len() * 4);
        for v in self.array.as_slice() {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let digest = md5::compute(&bytes);
        let id = format!(
            "{:x} {} {} {} {}",
            digest,
            self.interpolation.name(),
            self.direction.name(),
            self.bd_in.name(),
            self.bd_out.name()
        );
        debug!(cache_id = %id, "lut3d finalized");
        *guard = Some(id.clone());
        Ok(id)
    }

    /// The cache ID, if [`Lut3D::finalize`] has already been called since
    /// the last structural mutation.
    pub fn cache_id(&self) -> Option<String> {
        self.cache_id.lock().expect("cache id mutex poisoned").clone()
    }

    fn invalidate_cache_id(&mut self) {
        *self.cache_id.get_mut().expect("cache id mutex poisoned") = None;
    }
}

impl Clone for Lut3D {
    /// Deep copy: independent array, metadata, and cache ID. Mutating the
    /// clone never affects the original.
    fn clone(&self) -> Self {
        let cached = self
            .cache_id
            .lock()
            .expect("cache id mutex poisoned")
            .clone();
        Self {
            array: self.array.clone(),
            bd_in: self.bd_in,
            bd_out: self.bd_out,
            interpolation: self.interpolation,
            direction: self.direction,
            inversion_quality: self.inversion_quality,
            metadata: self.metadata.clone(),
            cache_id: Mutex::new(cached),
        }
    }
}

impl std::fmt::Debug for Lut3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lut3D")
            .field("length", &self.array.length())
            .field("bd_in", &self.bd_in)
            .field("bd_out", &self.bd_out)
            .field("interpolation", &self.interpolation)
            .field("direction", &self.direction)
            .field("inversion_quality", &self.inversion_quality)
            .finish()
    }
}

impl PartialEq for Lut3D {
    /// Direction, interpolation, bit depths, and array contents must all
    /// match. Inversion quality and metadata are deliberately excluded.
    fn eq(&self, other: &Self) -> bool {
        self.direction == other.direction
            && self.interpolation == other.interpolation
            && self.bd_in == other.bd_in
            && self.bd_out == other.bd_out
            && self.array == other.array
    }
}

impl Eq for Lut3D {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_lut_passes_invariants() {
        let lut = Lut3D::new(2).unwrap();
        assert!(lut.is_identity());
        assert!(lut.validate().is_ok());
        assert!(!lut.is_no_op());
        assert!(lut.has_channel_crosstalk());
    }

    #[test]
    fn mutating_one_sample_breaks_identity() {
        let mut lut = Lut3D::new(2).unwrap();
        lut.array_mut().set(0, 0, 0, [1.0, 0.0, 0.0]);
        assert!(!lut.is_identity());
    }

    #[test]
    fn rescale_output_scales_every_value() {
        let mut lut = Lut3D::new_full(
            BitDepth::U8,
            BitDepth::U10,
            Metadata::default(),
            Interpolation::Default,
            33,
        )
        .unwrap();
        let before: Vec<f32> = lut.array().as_slice().to_vec();
        lut.set_output_bit_depth(BitDepth::U16);
        let factor = BitDepth::U16.max_value() / BitDepth::U10.max_value();
        for (b, a) in before.iter().zip(lut.array().as_slice()) {
            assert!((*a as f64 - *b as f64 * factor).abs() < 1e-2);
        }
        assert_eq!(lut.bit_depth_out(), BitDepth::U16);
    }

    #[test]
    fn inverse_swaps_depths_without_rescale() {
        let lut = Lut3D::new_full(
            BitDepth::F16,
            BitDepth::U10,
            Metadata::default(),
            Interpolation::Tetrahedral,
            5,
        )
        .unwrap();
        let before = lut.array().clone();
        let inv = lut.inverse();
        assert_eq!(inv.direction(), Direction::Inverse);
        assert_eq!(inv.bit_depth_in(), BitDepth::U10);
        assert_eq!(inv.bit_depth_out(), BitDepth::F16);
        assert_eq!(*inv.array(), before);
    }

    #[test]
    fn double_inverse_round_trips() {
        let lut = Lut3D::new_full(
            BitDepth::U8,
            BitDepth::U12,
            Metadata::default(),
            Interpolation::Linear,
            4,
        )
        .unwrap();
        let back = lut.inverse().inverse();
        assert_eq!(lut, back);
    }

    #[test]
    fn clone_is_independent() {
        let lut = Lut3D::new(3).unwrap();
        let mut clone = lut.clone();
        assert_eq!(lut, clone);
        clone.array_mut().set(0, 0, 0, [9.0, 9.0, 9.0]);
        assert_ne!(lut, clone);
    }

    #[test]
    fn is_inverse_basic_pair() {
        let mut l1 = Lut3D::new_full(
            BitDepth::U8,
            BitDepth::U10,
            Metadata::default(),
            Interpolation::Linear,
            5,
        )
        .unwrap();
        l1.array_mut().set(0, 0, 0, [20.0, 0.0, 0.0]);
        let l2 = l1.inverse();
        assert!(l1.is_inverse(&l2));
        assert!(l2.is_inverse(&l1));
    }

    #[test]
    fn is_inverse_survives_rescale_round_trip() {
        let mut l1 = Lut3D::new_full(
            BitDepth::U8,
            BitDepth::U10,
            Metadata::default(),
            Interpolation::Linear,
            5,
        )
        .unwrap();
        l1.array_mut().set(0, 0, 0, [20.0, 0.0, 0.0]);
        let l2 = l1.inverse();

        l1.set_output_bit_depth(BitDepth::U12);
        l1.set_output_bit_depth(BitDepth::U10);
        assert!(l1.is_inverse(&l2));
    }

    #[test]
    fn is_inverse_rejects_raw_tag_swap() {
        let mut l1 = Lut3D::new_full(
            BitDepth::U8,
            BitDepth::U10,
            Metadata::default(),
            Interpolation::Linear,
            5,
        )
        .unwrap();
        l1.array_mut().set(0, 0, 0, [20.0, 0.0, 0.0]);
        let l2 = l1.inverse();

        // A raw tag swap (no rescale) changes the array's effective
        // meaning without touching its bytes, so the harmonized compare
        // must fail.
        l1.bd_out = BitDepth::U12;
        assert!(!l1.is_inverse(&l2));
    }

    #[test]
    fn finalize_is_stable_and_excludes_inversion_quality() {
        let a = Lut3D::new(4).unwrap();
        let mut b = a.clone();
        b.set_inversion_quality(InversionQuality::Exact);

        let id_a = a.finalize().unwrap();
        let id_b = b.finalize().unwrap();
        assert_eq!(id_a, id_b);

        // Re-finalizing without structural change returns the same id.
        assert_eq!(a.finalize().unwrap(), id_a);
    }

    #[test]
    fn finalize_changes_when_array_changes() {
        let mut a = Lut3D::new(4).unwrap();
        let id_before = a.finalize().unwrap();
        a.array_mut().set(0, 0, 0, [0.25, 0.0, 0.0]);
        let id_after = a.finalize().unwrap();
        assert_ne!(id_before, id_after);
    }

    #[test]
    fn array_mut_alone_invalidates_cache_id() {
        let mut a = Lut3D::new(4).unwrap();
        let id_before = a.finalize().unwrap();
        // No other mutator touched — array_mut() itself must dirty the id.
        a.array_mut().set(1, 1, 1, [0.5, 0.5, 0.5]);
        let id_after = a.finalize().unwrap();
        assert_ne!(id_before, id_after);
    }

    #[test]
    fn max_supported_length_accepted_at_boundary() {
        assert!(Lut3D::new(MAX_SUPPORTED_LENGTH).is_ok());
        let err = Lut3D::new(MAX_SUPPORTED_LENGTH + 1).unwrap_err();
        assert!(err.to_string().contains("must not be greater"));
    }
}
