//! Functional composition of two forward LUT3Ds into one.

use tracing::trace;
use vfx_core::BitDepth;

use crate::error::{Lut3DError, Lut3DResult};
use crate::lut3d::Lut3D;
use crate::metadata::merge as merge_metadata;
use crate::ops::{eval, PipelineOp};

/// Replaces `a` with the LUT3D equivalent to evaluating `a` then `b`.
///
/// Fails with [`Lut3DError::BitDepthMismatch`] unless `a.bit_depth_out() ==
/// b.bit_depth_in()`.
///
/// # Domain selection
///
/// When `a`'s grid is at least as dense as `b`'s, `a`'s own samples are
/// reused directly as the resampling domain (no interpolation through
/// `a`). Otherwise a fresh identity LUT3D at `b`'s edge length is built and
/// routed through `a` first — the larger of the two grid sizes always
/// bounds the result, limiting the loss composition inherently introduces.
pub fn compose(a: &mut Lut3D, b: &Lut3D) -> Lut3DResult<()> {
    if a.bit_depth_out() != b.bit_depth_in() {
        return Err(Lut3DError::BitDepthMismatch {
            a_out: a.bit_depth_out(),
            b_in: b.bit_depth_in(),
        });
    }

    let n = a.length();
    let m = b.length();
    trace!(a_length = n, b_length = m, "composing lut3d pair");

    let reuse_a_grid = n >= m;
    let (mut buffer, result_length) = if reuse_a_grid {
        (a.array().nodes(), n)
    } else {
        let domain = Lut3D::new_full(
            a.bit_depth_in(),
            BitDepth::F32,
            a.metadata().clone(),
            a.interpolation(),
            m,
        )?;
        (domain.array().nodes(), m)
    };

    let mut ops = Vec::with_capacity(3);
    if reuse_a_grid {
        ops.push(PipelineOp::Scale(1.0 / a.bit_depth_out().max_value() as f32));
    } else {
        ops.push(PipelineOp::EvalLut3D(a.clone()));
    }
    ops.push(PipelineOp::EvalLut3D(b.clone()));
    ops.push(PipelineOp::Scale(b.bit_depth_out().max_value() as f32));

    eval(&ops, &mut buffer);

    let merged_metadata = merge_metadata(a.metadata(), b.metadata());
    let mut result = Lut3D::new_full(
        a.bit_depth_in(),
        b.bit_depth_out(),
        merged_metadata,
        a.interpolation(),
        result_length,
    )?;
    result.array_mut().set_nodes(&buffer);

    *a = result;
    Ok(())
}
