//! Resamples an inverse-direction LUT3D into an equivalent forward LUT3D
//! on a fixed, denser grid — the fast path a pipeline runtime can
//! evaluate repeatedly without paying the per-sample Newton search every
//! call.

use tracing::{debug, trace};

use crate::compose::compose;
use crate::error::{Lut3DError, Lut3DResult};
use crate::interp::{Direction, InversionQuality};
use crate::lut3d::Lut3D;
use crate::metadata::Metadata;
use crate::DEFAULT_FAST_INVERSE_GRID;

/// Builds a forward LUT3D approximating the inverse of `l_inv` on a grid
/// of [`DEFAULT_FAST_INVERSE_GRID`] edge length.
///
/// Fails with [`Lut3DError::WrongDirection`] unless `l_inv.direction() ==
/// Direction::Inverse`.
pub fn make_fast_lut3d_from_inverse(l_inv: &mut Lut3D) -> Lut3DResult<Lut3D> {
    make_fast_lut3d_from_inverse_with_size(l_inv, DEFAULT_FAST_INVERSE_GRID)
}

/// As [`make_fast_lut3d_from_inverse`], but with an explicit grid edge
/// length instead of the default.
pub fn make_fast_lut3d_from_inverse_with_size(
    l_inv: &mut Lut3D,
    grid_length: usize,
) -> Lut3DResult<Lut3D> {
    if l_inv.direction() != Direction::Inverse {
        return Err(Lut3DError::WrongDirection);
    }
    trace!(
        grid_length,
        bd_in = %l_inv.bit_depth_in(),
        bd_out = %l_inv.bit_depth_out(),
        "building fast inverse"
    );

    // Force the exact inversion style for the duration of this build so
    // the composition below resamples through the Newton search rather
    // than the cheap approximation — using the fast path here would
    // recurse back into this same construction.
    let guard = InversionStyleGuard::force_exact(l_inv);

    let mut domain = Lut3D::new_full(
        guard.get().bit_depth_in(),
        guard.get().bit_depth_in(),
        Metadata::default(),
        guard.get().interpolation(),
        grid_length,
    )?;
    compose(&mut domain, guard.get())?;

    Ok(domain)
}

/// Saves an [`InversionQuality`] on construction, forces
/// [`InversionQuality::Exact`], and restores the saved value on drop —
/// on every exit path, including an early return via `?`.
struct InversionStyleGuard<'a> {
    target: &'a mut Lut3D,
    previous: InversionQuality,
}

impl<'a> InversionStyleGuard<'a> {
    fn force_exact(target: &'a mut Lut3D) -> Self {
        let previous = target.inversion_quality();
        target.set_inversion_quality(InversionQuality::Exact);
        Self { target, previous }
    }

    fn get(&self) -> &Lut3D {
        self.target
    }
}

impl Drop for InversionStyleGuard<'_> {
    fn drop(&mut self) {
        let previous = self.previous;
        debug!(?previous, "restoring inversion quality after fast inverse build");
        self.target.set_inversion_quality(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Interpolation;
    use vfx_core::BitDepth;

    #[test]
    fn rejects_forward_direction() {
        let mut fwd = Lut3D::new(5).unwrap();
        let err = make_fast_lut3d_from_inverse(&mut fwd).unwrap_err();
        assert_eq!(err, Lut3DError::WrongDirection);
    }

    #[test]
    fn builds_forward_lut_on_requested_grid() {
        let forward = Lut3D::new_full(
            BitDepth::U10,
            BitDepth::U12,
            Metadata::default(),
            Interpolation::Linear,
            17,
        )
        .unwrap();
        let mut inv = forward.inverse();
        assert_eq!(inv.direction(), Direction::Inverse);

        let fast = make_fast_lut3d_from_inverse(&mut inv).unwrap();
        assert_eq!(fast.direction(), Direction::Forward);
        assert_eq!(fast.bit_depth_in(), BitDepth::U12);
        assert_eq!(fast.bit_depth_out(), BitDepth::U10);
        assert_eq!(fast.length(), crate::DEFAULT_FAST_INVERSE_GRID);
    }

    #[test]
    fn restores_inversion_quality_after_build() {
        let forward = Lut3D::new(9).unwrap();
        let mut inv = forward.inverse();
        inv.set_inversion_quality(InversionQuality::Fast);
        make_fast_lut3d_from_inverse(&mut inv).unwrap();
        assert_eq!(inv.inversion_quality(), InversionQuality::Fast);
    }

    #[test]
    fn custom_grid_size_is_honored() {
        let forward = Lut3D::new(5).unwrap();
        let mut inv = forward.inverse();
        let fast = make_fast_lut3d_from_inverse_with_size(&mut inv, 9).unwrap();
        assert_eq!(fast.length(), 9);
    }
}
