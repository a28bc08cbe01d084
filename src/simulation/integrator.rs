//! Fixed-step propagation through the lattice
//!
//! Each cell is applied as focusing kicks, drift, defocusing kicks, drift,
//! every slice computing `next = M * previous + b`. The recurrence is purely
//! affine and deterministic, so identical inputs give bit-identical output.

use super::lattice::{Lattice, TransferOperator};
use super::states::NVec3;

/// Propagate `start` through every cell of `lattice`
///
/// Returns `lattice.num_samples()` coordinates. `start` itself is not part of
/// the output; callers that need continuity keep it themselves.
pub fn propagate(start: &NVec3, lattice: &Lattice) -> Vec<NVec3> {
    let mut out = Vec::with_capacity(lattice.num_samples());
    propagate_into(start, lattice, &mut out);
    out
}

/// Propagate `start` through `lattice`, appending every sample to `out`
///
/// `out` is not cleared, so a caller can seed it with the start coordinate.
pub fn propagate_into(start: &NVec3, lattice: &Lattice, out: &mut Vec<NVec3>) {
    out.reserve(lattice.num_samples());

    let quad_n = lattice.quad_divisions();
    let drift_n = lattice.drift_divisions();

    let mut v = *start; // running coordinate
    for _ in 0..lattice.num_cells() {
        v = apply_slices(lattice.fquad(), quad_n, v, out); // F
        v = apply_slices(lattice.drift(), drift_n, v, out); // O
        v = apply_slices(lattice.dquad(), quad_n, v, out); // D
        v = apply_slices(lattice.drift(), drift_n, v, out); // O
    }
}

/// Apply `op` `n` times starting from `v`, recording each step
#[inline]
fn apply_slices(op: &TransferOperator, n: usize, mut v: NVec3, out: &mut Vec<NVec3>) -> NVec3 {
    for _ in 0..n {
        v = op.apply(&v);
        out.push(v);
    }
    v
}
