//! Core state types for single-particle tracking.
//!
//! - `NVec3` is the phase-space coordinate `(x, xp, s)`
//! - `Orbit` is the append-only sequence of coordinates of one trajectory
//! - `Particle` owns exactly one `Orbit`
//!
//! Index 0 of an orbit is the initial (or continuation) coordinate, the rest
//! follow in simulation order.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use super::error::{Result, SimError};
use super::lattice::Lattice;

/// Phase-space coordinate: `[x, xp, s]`
pub type NVec3 = Vector3<f64>;

/// One of the three coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,  // transverse position
    Xp, // transverse slope
    S,  // path length
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Xp, Axis::S];

    /// Row of this axis in a coordinate vector
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Xp => 1,
            Axis::S => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Xp => "xp",
            Axis::S => "s",
        }
    }
}

impl FromStr for Axis {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(Axis::X),
            "xp" => Ok(Axis::Xp),
            "s" => Ok(Axis::S),
            other => Err(SimError::InvalidArgument(format!(
                "coordinate must be x, xp, or s, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-axis bounds of a set of coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: NVec3,
    pub max: NVec3,
}

impl Extent {
    /// Bounds of a single point
    pub fn point(v: &NVec3) -> Self {
        Self { min: *v, max: *v }
    }

    /// Grow to include `v`
    pub fn include(&mut self, v: &NVec3) {
        self.min = self.min.inf(v);
        self.max = self.max.sup(v);
    }

    /// Grow to include another extent
    pub fn merge(&mut self, other: &Extent) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Bounds of `points`, `None` when empty
    pub fn of<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a NVec3>,
    {
        let mut iter = points.into_iter();
        let mut extent = Extent::point(iter.next()?);
        for v in iter {
            extent.include(v);
        }
        Some(extent)
    }

    pub fn range(&self, axis: Axis) -> (f64, f64) {
        (self.min[axis.index()], self.max[axis.index()])
    }
}

/// Ordered, append-only sequence of coordinates
///
/// Never empty: every constructor seeds it with one coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    points: Vec<NVec3>,
}

impl Orbit {
    pub fn new(start: NVec3) -> Self {
        Self { points: vec![start] }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: orbits are never empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[NVec3] {
        &self.points
    }

    pub fn first(&self) -> &NVec3 {
        &self.points[0]
    }

    pub fn last(&self) -> &NVec3 {
        // non-empty by construction
        &self.points[self.points.len() - 1]
    }

    pub fn extend<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = NVec3>,
    {
        self.points.extend(samples);
    }

    /// Keep only the last coordinate
    pub fn truncate_to_last(&mut self) {
        let last = *self.last();
        self.points.clear();
        self.points.push(last);
    }

    /// Projection of the orbit onto one axis
    pub fn series(&self, axis: Axis) -> Vec<f64> {
        series_of(&self.points, axis)
    }

    pub fn extent(&self) -> Extent {
        // non-empty, so the fold always has a seed
        let mut extent = Extent::point(self.first());
        for v in &self.points[1..] {
            extent.include(v);
        }
        extent
    }

    /// Coordinates at `start, start + spacing, start + 2 * spacing, ...`
    pub fn cell_markers(&self, marker_start: usize, marker_spacing: usize) -> Result<Vec<NVec3>> {
        markers_of(&self.points, marker_start, marker_spacing)
    }
}

/// A single tracked particle and its committed history
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    orbit: Orbit,
}

impl Particle {
    /// New particle whose orbit is `[(x, xp, 0)]`
    pub fn new(x: f64, xp: f64) -> Result<Self> {
        Self::with_s(x, xp, 0.0)
    }

    /// New particle whose orbit is `[(x, xp, s)]`
    pub fn with_s(x: f64, xp: f64, s: f64) -> Result<Self> {
        for (name, value) in [("x", x), ("xp", xp), ("s", s)] {
            if !value.is_finite() {
                return Err(SimError::ConstraintViolation(format!(
                    "particle coordinate {name} must be finite, got {value}"
                )));
            }
        }
        Ok(Self {
            orbit: Orbit::new(NVec3::new(x, xp, s)),
        })
    }

    /// Particle with `x` and `xp` drawn from a standard normal, rounded to two decimals
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (x, xp) = random_coordinates(rng);
        Self {
            orbit: Orbit::new(NVec3::new(x, xp, 0.0)),
        }
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    pub fn last(&self) -> &NVec3 {
        self.orbit.last()
    }

    /// Drop all history except the current endpoint
    pub fn reset_to_last(&mut self) {
        self.orbit.truncate_to_last();
    }

    /// Append samples to the committed orbit
    pub fn extend<I>(&mut self, new_samples: I)
    where
        I: IntoIterator<Item = NVec3>,
    {
        self.orbit.extend(new_samples);
    }

    /// Projection onto a named axis: `"x"`, `"xp"` or `"s"`
    pub fn coordinate_series(&self, axis: &str) -> Result<Vec<f64>> {
        Ok(self.orbit.series(axis.parse()?))
    }

    pub fn series(&self, axis: Axis) -> Vec<f64> {
        self.orbit.series(axis)
    }

    pub fn extent(&self) -> Extent {
        self.orbit.extent()
    }

    /// Samples sitting at position `marker_start` within every cell of `lattice`
    pub fn cell_markers(&self, marker_start: usize, lattice: &Lattice) -> Result<Vec<NVec3>> {
        check_marker_start(marker_start, lattice)?;
        self.orbit.cell_markers(marker_start, lattice.num_cell_elements())
    }
}

pub(crate) fn random_coordinates<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    let x: f64 = StandardNormal.sample(rng);
    let xp: f64 = StandardNormal.sample(rng);
    (round2(x), round2(xp))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub(crate) fn series_of(points: &[NVec3], axis: Axis) -> Vec<f64> {
    let i = axis.index();
    points.iter().map(|v| v[i]).collect()
}

pub(crate) fn markers_of(points: &[NVec3], marker_start: usize, marker_spacing: usize) -> Result<Vec<NVec3>> {
    if marker_spacing == 0 {
        return Err(SimError::InvalidArgument("marker spacing must be at least 1".to_string()));
    }
    Ok(points.iter().skip(marker_start).step_by(marker_spacing).copied().collect())
}

pub(crate) fn check_marker_start(marker_start: usize, lattice: &Lattice) -> Result<()> {
    let per_cell = lattice.num_cell_elements();
    if marker_start < per_cell {
        Ok(())
    } else {
        Err(SimError::InvalidArgument(format!(
            "marker position {marker_start} is outside the cell (0..{per_cell})"
        )))
    }
}
