//! Per-sample numeric inversion of a [`crate::SampleArray`] via
//! Newton-Raphson search.
//!
//! This is the "exact inverse renderer" the fast-inverse builder resamples
//! an inverse-direction LUT3D through (see [`crate::fast_inverse`]): given
//! a target output value, find the grid fraction whose forward-sampled
//! value comes closest to it. [`crate::interp::InversionQuality`] only
//! changes how hard the search tries — concrete interpolation kernels
//! themselves stay in [`crate::SampleArray::sample`].

use crate::interp::{Interpolation, InversionQuality};
use crate::sample_array::SampleArray;

/// Inverts `array`'s forward mapping at `target` (in the array's own raw
/// value range, i.e. already scaled by whatever bit depth the array's
/// samples represent) and returns the normalized `[0, 1]` domain fraction
/// that produces it under `interp`.
///
/// `quality` trades iteration budget for accuracy: [`InversionQuality::Exact`]
/// runs more iterations at a tighter tolerance than
/// [`InversionQuality::Fast`]. Both directly resolve via
/// [`InversionQuality::concrete`] first, so callers may pass an
/// unresolved `Default`/`Best` value.
pub(crate) fn invert_sample(
    array: &SampleArray,
    target: [f32; 3],
    interp: Interpolation,
    quality: InversionQuality,
) -> [f32; 3] {
    let (max_iters, tolerance) = match quality.concrete() {
        InversionQuality::Exact => (50, 1e-6f32),
        _ => (8, 1e-3f32),
    };
    let damping = 0.8f32;
    let delta = 1e-4f32;

    // Start at the domain midpoint. The target is expressed in the
    // array's own raw value range (which the search doesn't otherwise
    // know), so there's no cheaper starting guess without that context.
    let mut guess = [0.5f32, 0.5, 0.5];

    for _ in 0..max_iters {
        let eval = array.sample(guess, interp);
        let err = [eval[0] - target[0], eval[1] - target[1], eval[2] - target[2]];
        let err_mag = (err[0] * err[0] + err[1] * err[1] + err[2] * err[2]).sqrt();
        if err_mag < tolerance {
            break;
        }

        let mut jacobian = [[0.0f32; 3]; 3];
        for j in 0..3 {
            let mut probe = guess;
            probe[j] = (probe[j] + delta).min(1.0);
            let eval_probe = array.sample(probe, interp);
            for i in 0..3 {
                jacobian[i][j] = (eval_probe[i] - eval[i]) / delta;
            }
        }

        let step = solve_3x3(&jacobian, &[-err[0], -err[1], -err[2]]);
        guess[0] = (guess[0] + damping * step[0]).clamp(0.0, 1.0);
        guess[1] = (guess[1] + damping * step[1]).clamp(0.0, 1.0);
        guess[2] = (guess[2] + damping * step[2]).clamp(0.0, 1.0);
    }

    guess
}

/// Solves the 3x3 linear system `Ax = b` via Cramer's rule. Returns zero
/// when the system is singular (a degenerate Jacobian near a flat region
/// of the LUT) rather than propagating a div-by-zero NaN into the search.
fn solve_3x3(a: &[[f32; 3]; 3], b: &[f32; 3]) -> [f32; 3] {
    let det = a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
        - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
        + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0]);

    if det.abs() < 1e-10 {
        return [0.0, 0.0, 0.0];
    }

    let det_x = b[0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
        - a[0][1] * (b[1] * a[2][2] - a[1][2] * b[2])
        + a[0][2] * (b[1] * a[2][1] - a[1][1] * b[2]);

    let det_y = a[0][0] * (b[1] * a[2][2] - a[1][2] * b[2])
        - b[0] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
        + a[0][2] * (a[1][0] * b[2] - b[1] * a[2][0]);

    let det_z = a[0][0] * (a[1][1] * b[2] - b[1] * a[2][1])
        - a[0][1] * (a[1][0] * b[2] - b[1] * a[2][0])
        + b[0] * (a[1][0] * a[2][1] - a[1][1] * a[2][0]);

    [det_x / det, det_y / det, det_z / det]
}
