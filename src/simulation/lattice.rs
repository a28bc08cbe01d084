//! FODO lattice geometry and its precomputed transfer operators
//!
//! A `Lattice` is built once from its geometry and never changes afterwards.
//! Each element is subdivided into thin slices:
//! - a quadrupole of focal length `f` becomes `quad_divisions` kicks of focal length `f * quad_divisions`,
//! - a drift of length `L` becomes `drift_divisions` steps of length `L / drift_divisions`.
//!
//! Splitting a quad into weaker kicks is a thin-lens approximation of one thick
//! quadrupole. More slices give smoother animation, the analytic model is unchanged.

use nalgebra::Matrix3;

use super::error::{Result, SimError};
use super::states::NVec3;

pub const DEFAULT_QUAD_DIVISIONS: usize = 5;
pub const DEFAULT_DRIFT_DIVISIONS: usize = 5;

/// Affine map `v -> M v + b` advancing a coordinate by one lattice slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferOperator {
    pub matrix: Matrix3<f64>,
    pub offset: NVec3,
}

impl TransferOperator {
    /// Advance `v` through this slice
    #[inline]
    pub fn apply(&self, v: &NVec3) -> NVec3 {
        self.matrix * v + self.offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    drift_length: f64,
    focal_length: f64,
    num_cells: usize,
    quad_divisions: usize,
    drift_divisions: usize,
    num_cell_elements: usize, // steps per cell
    num_samples: usize,       // steps per run

    fquad: TransferOperator, // focusing kick
    dquad: TransferOperator, // defocusing kick
    drift: TransferOperator, // drift slice
}

impl Lattice {
    /// Build a lattice with the default 5 quad / 5 drift subdivisions
    pub fn new(drift_length: f64, focal_length: f64, num_cells: usize) -> Result<Self> {
        Self::with_divisions(
            drift_length,
            focal_length,
            num_cells,
            DEFAULT_QUAD_DIVISIONS,
            DEFAULT_DRIFT_DIVISIONS,
        )
    }

    /// Build a lattice with explicit element subdivisions
    ///
    /// Every parameter ends up as a divisor somewhere, so all of them must be
    /// strictly positive (and the lengths finite).
    pub fn with_divisions(
        drift_length: f64,
        focal_length: f64,
        num_cells: usize,
        quad_divisions: usize,
        drift_divisions: usize,
    ) -> Result<Self> {
        check_length("drift_length", drift_length)?;
        check_length("focal_length", focal_length)?;
        check_count("num_cells", num_cells)?;
        check_count("quad_divisions", quad_divisions)?;
        check_count("drift_divisions", drift_divisions)?;

        let num_cell_elements = drift_divisions
            .checked_add(quad_divisions)
            .and_then(|n| n.checked_mul(2))
            .ok_or_else(|| too_many_steps("steps per cell"))?;
        let num_samples = num_cells
            .checked_mul(num_cell_elements)
            .ok_or_else(|| too_many_steps("steps per run"))?;

        let kick = 1.0 / (focal_length * quad_divisions as f64);
        let step = drift_length / drift_divisions as f64;

        #[rustfmt::skip]
        let fquad = TransferOperator {
            matrix: Matrix3::new(
                1.0,   0.0, 0.0,
                -kick, 1.0, 0.0,
                0.0,   0.0, 1.0,
            ),
            offset: NVec3::zeros(),
        };

        #[rustfmt::skip]
        let dquad = TransferOperator {
            matrix: Matrix3::new(
                1.0,  0.0, 0.0,
                kick, 1.0, 0.0,
                0.0,  0.0, 1.0,
            ),
            offset: NVec3::zeros(),
        };

        #[rustfmt::skip]
        let drift = TransferOperator {
            matrix: Matrix3::new(
                1.0, step, 0.0,
                0.0, 1.0,  0.0,
                0.0, 0.0,  1.0,
            ),
            offset: NVec3::new(0.0, 0.0, step),
        };

        Ok(Self {
            drift_length,
            focal_length,
            num_cells,
            quad_divisions,
            drift_divisions,
            num_cell_elements,
            num_samples,
            fquad,
            dquad,
            drift,
        })
    }

    /// Same geometry and subdivisions, different number of cells
    pub fn with_num_cells(&self, num_cells: usize) -> Result<Self> {
        Self::with_divisions(
            self.drift_length,
            self.focal_length,
            num_cells,
            self.quad_divisions,
            self.drift_divisions,
        )
    }

    pub fn drift_length(&self) -> f64 {
        self.drift_length
    }

    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    pub fn quad_divisions(&self) -> usize {
        self.quad_divisions
    }

    pub fn drift_divisions(&self) -> usize {
        self.drift_divisions
    }

    /// Propagation steps in one FODO cell: `2 * (drift_divisions + quad_divisions)`
    pub fn num_cell_elements(&self) -> usize {
        self.num_cell_elements
    }

    /// Samples produced by propagating through the whole lattice
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Path length covered by one cell (two drift sections)
    pub fn cell_length(&self) -> f64 {
        2.0 * self.drift_length
    }

    pub fn fquad(&self) -> &TransferOperator {
        &self.fquad
    }

    pub fn dquad(&self) -> &TransferOperator {
        &self.dquad
    }

    pub fn drift(&self) -> &TransferOperator {
        &self.drift
    }
}

fn check_length(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::ConstraintViolation(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

fn check_count(name: &str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(SimError::ConstraintViolation(format!("{name} must be at least 1")))
    }
}

fn too_many_steps(what: &str) -> SimError {
    SimError::ConstraintViolation(format!("{what} overflows usize"))
}
