//! Construction contracts for the scalar op types [`crate::compose`]
//! bridges through, and the private mini op pipeline it builds them into.
//!
//! The real per-channel scale op and generic range op are external
//! collaborators (owned by the pipeline runtime crate, out of scope for
//! this core) — [`ScaleOp`] and [`RangeOp`] exist only to pin down their
//! construction contract at the boundary: what a caller needs to hand the
//! runtime to build one. [`PipelineOp`] is the private sequence
//! [`crate::compose::compose`] assembles and evaluates internally; it is
//! not a generalized op-graph.

use crate::interp::{Direction, Interpolation};
use crate::invert::invert_sample;
use crate::lut3d::Lut3D;

/// Construction contract for the per-channel scale op `compose` bridges
/// bit depths with: `[R', G', B', A'] = [R*rgb, G*rgb, B*rgb, A*alpha]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOp {
    /// Multiplier applied to each of R, G, B.
    pub rgb: f64,
    /// Multiplier applied to alpha. `compose` always passes `1.0` here —
    /// it never touches an alpha channel.
    pub alpha: f64,
}

/// Construction contract for the generic range op an identity LUT3D may be
/// replaced with (see [`crate::Lut3D::identity_replacement`]):
/// `[min_in_value, max_in_value] -> [min_out_value, max_out_value]`,
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeOp {
    /// Lower bound of the input clamp range.
    pub min_in_value: f64,
    /// Upper bound of the input clamp range.
    pub max_in_value: f64,
    /// Lower bound of the output clamp range.
    pub min_out_value: f64,
    /// Upper bound of the output clamp range.
    pub max_out_value: f64,
}

/// One step in the private pipeline [`crate::compose::compose`] builds.
///
/// Every step operates on RGB triples already normalized to `[0, 1]` —
/// the convention the generic op-graph runtime uses throughout a pipeline,
/// regardless of what bit depth tag a neighboring LUT carries. A
/// [`PipelineOp::EvalLut3D`] step renormalizes its own output by its
/// wrapped LUT's relevant bit depth before handing values to the next
/// step, so bit-depth bridging only ever needs an explicit
/// [`PipelineOp::Scale`] at the two ends of the chain.
pub(crate) enum PipelineOp {
    /// Multiplies every RGB channel by a constant factor. A no-op when the
    /// factor is exactly `1.0`.
    Scale(f32),
    /// Evaluates a LUT3D: forward direction samples the grid directly;
    /// inverse direction numerically inverts it (see [`crate::invert`]).
    EvalLut3D(Lut3D),
}

impl PipelineOp {
    pub(crate) fn apply(&self, buffer: &mut [[f32; 3]]) {
        match self {
            PipelineOp::Scale(k) => {
                if *k != 1.0 {
                    for px in buffer.iter_mut() {
                        px[0] *= k;
                        px[1] *= k;
                        px[2] *= k;
                    }
                }
            }
            PipelineOp::EvalLut3D(lut) => apply_lut3d(lut, buffer),
        }
    }
}

fn apply_lut3d(lut: &Lut3D, buffer: &mut [[f32; 3]]) {
    let interp = lut.concrete_interpolation();
    match lut.direction() {
        Direction::Forward => {
            let m_out = lut.bit_depth_out().max_value() as f32;
            for px in buffer.iter_mut() {
                let raw = lut.array().sample(*px, interp);
                *px = [raw[0] / m_out, raw[1] / m_out, raw[2] / m_out];
            }
        }
        Direction::Inverse => {
            // The array still holds the original forward function's
            // samples, scaled into what is now tagged `bit_depth_in`.
            let m_target = lut.bit_depth_in().max_value() as f32;
            let quality = lut.concrete_inversion_quality();
            for px in buffer.iter_mut() {
                let target = [px[0] * m_target, px[1] * m_target, px[2] * m_target];
                *px = invert_sample(lut.array(), target, interp, quality);
            }
        }
    }
}

/// Runs `ops` left to right over `buffer` in place.
pub(crate) fn eval(ops: &[PipelineOp], buffer: &mut [[f32; 3]]) {
    for op in ops {
        op.apply(buffer);
    }
}

pub(crate) use PipelineOp as Op;

#[cfg(test)]
mod tests {
    use super::*;
    use vfx_core::BitDepth;

    #[test]
    fn scale_is_noop_at_one() {
        let mut buf = vec![[1.0, 2.0, 3.0]];
        Op::Scale(1.0).apply(&mut buf);
        assert_eq!(buf, vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn scale_multiplies_every_channel() {
        let mut buf = vec![[1.0, 2.0, 3.0]];
        Op::Scale(2.0).apply(&mut buf);
        assert_eq!(buf, vec![[2.0, 4.0, 6.0]]);
    }

    #[test]
    fn forward_lut_eval_normalizes_output() {
        let lut = Lut3D::new_full(
            BitDepth::F32,
            BitDepth::U10,
            crate::metadata::Metadata::default(),
            Interpolation::Linear,
            3,
        )
        .unwrap();
        // Identity grid at U10 means sampling the top corner should yield
        // 1.0 once renormalized by M(bd_out).
        let mut buf = vec![[1.0, 1.0, 1.0]];
        Op::EvalLut3D(lut).apply(&mut buf);
        assert!((buf[0][0] - 1.0).abs() < 1e-4);
    }
}
