//! Particle collection and the stage/commit protocol
//!
//! A run goes `Idle -> Staged -> Idle`:
//! - `start` / `continue_run` propagate and stage `[seed] + samples` without
//!   touching any particle's committed orbit,
//! - the caller displays the staged buffer (frame by frame),
//! - `commit` drops the staged seed, which duplicates the particle's last
//!   committed coordinate, and appends the rest to that particle.
//!
//! Only one run can be staged at a time. The model is single-threaded and has
//! no suspension points, so it is safe to commit from a display completion
//! callback.

use tracing::trace;

use super::error::{active_particle_not_set, lattice_not_set, Result, SimError};
use super::integrator::propagate_into;
use super::lattice::Lattice;
use super::states::{check_marker_start, markers_of, series_of, Axis, Extent, NVec3, Particle};

/// Staging state of the model
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Staged {
        particle: usize,    // index into the particle set
        orbit: Vec<NVec3>,  // seed coordinate followed by the new samples
    },
}

#[derive(Debug, Default)]
pub struct Model {
    particles: Vec<Particle>, // creation order
    lattice: Option<Lattice>,
    active: Option<usize>,
    run: RunState,
}

impl Model {
    /// Empty model without a lattice
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty model using `lattice`
    pub fn with_lattice(lattice: Lattice) -> Self {
        Self {
            lattice: Some(lattice),
            ..Self::default()
        }
    }

    /// Replace the lattice used by the next run
    pub fn set_lattice(&mut self, lattice: Lattice) -> Result<()> {
        self.ensure_idle("replace the lattice")?;
        trace!(
            drift_length = lattice.drift_length(),
            focal_length = lattice.focal_length(),
            num_cells = lattice.num_cells(),
            "lattice replaced"
        );
        self.lattice = Some(lattice);
        Ok(())
    }

    pub fn lattice(&self) -> Option<&Lattice> {
        self.lattice.as_ref()
    }

    /// Steps per cell of the current lattice, for sizing a position-in-cell selector
    pub fn num_cell_elements(&self) -> Result<usize> {
        Ok(self.require_lattice()?.num_cell_elements())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn active_particle(&self) -> Option<&Particle> {
        self.active.map(|i| &self.particles[i])
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn is_staged(&self) -> bool {
        matches!(self.run, RunState::Staged { .. })
    }

    /// The staged buffer, if a run is in flight
    pub fn staged(&self) -> Option<&[NVec3]> {
        match &self.run {
            RunState::Staged { orbit, .. } => Some(orbit.as_slice()),
            RunState::Idle => None,
        }
    }

    /// Fresh run: create a particle at `(x, xp, 0)`, make it active and stage its trajectory
    pub fn start(&mut self, x: f64, xp: f64) -> Result<&[NVec3]> {
        self.start_with(Particle::new(x, xp)?)
    }

    /// Fresh run from an already built particle
    pub fn start_with(&mut self, particle: Particle) -> Result<&[NVec3]> {
        self.ensure_idle("start a run")?;
        let lattice = self.lattice.as_ref().ok_or_else(lattice_not_set)?;

        let seed = *particle.last();
        let index = self.particles.len();
        self.particles.push(particle);
        self.active = Some(index);

        let orbit = stage(&seed, lattice);
        trace!(particle = index, samples = orbit.len() - 1, "fresh run staged");
        Ok(self.set_staged(index, orbit))
    }

    /// Extend run: stage a trajectory from the active particle's last committed coordinate
    pub fn continue_run(&mut self) -> Result<&[NVec3]> {
        self.ensure_idle("continue a run")?;
        let lattice = self.lattice.as_ref().ok_or_else(lattice_not_set)?;
        let index = self.active.ok_or_else(active_particle_not_set)?;

        let seed = *self.particles[index].last();
        let orbit = stage(&seed, lattice);
        trace!(particle = index, samples = orbit.len() - 1, "continuation staged");
        Ok(self.set_staged(index, orbit))
    }

    /// Merge the staged run into its particle's committed orbit
    pub fn commit(&mut self) -> Result<()> {
        match std::mem::take(&mut self.run) {
            RunState::Idle => Err(SimError::InvalidState("no staged run to commit".to_string())),
            RunState::Staged { particle, orbit } => {
                let committed = orbit.len() - 1;
                // the first staged sample is the particle's current endpoint
                self.particles[particle].extend(orbit.into_iter().skip(1));
                trace!(particle, committed, total = self.particles[particle].orbit().len(), "run committed");
                Ok(())
            }
        }
    }

    /// Remove every particle and any staged run. The lattice is kept.
    pub fn clear_particles(&mut self) {
        trace!(count = self.particles.len(), staged = self.is_staged(), "particles cleared");
        self.particles.clear();
        self.active = None;
        self.run = RunState::Idle;
    }

    /// Projection of the staged buffer onto a named axis
    pub fn active_series(&self, axis: &str) -> Result<Vec<f64>> {
        let axis: Axis = axis.parse()?;
        let orbit = self
            .staged()
            .ok_or_else(|| SimError::InvalidState("no staged run".to_string()))?;
        Ok(series_of(orbit, axis))
    }

    /// Projection of a committed particle's orbit onto a named axis
    pub fn particle_series(&self, index: usize, axis: &str) -> Result<Vec<f64>> {
        let particle = self.particles.get(index).ok_or_else(|| {
            SimError::InvalidArgument(format!(
                "particle index {index} out of range ({} particles)",
                self.particles.len()
            ))
        })?;
        particle.coordinate_series(axis)
    }

    /// Per-axis bounds over the staged buffer and every committed orbit
    pub fn extent(&self) -> Result<Extent> {
        self.require_lattice()?;
        self.active.ok_or_else(active_particle_not_set)?;

        let staged = self.staged().and_then(Extent::of);
        let extent = self
            .particles
            .iter()
            .map(Particle::extent)
            .chain(staged)
            .reduce(|mut acc, e| {
                acc.merge(&e);
                acc
            });
        trace!(?extent, "extent queried");
        // an active particle exists, so there is at least one orbit
        extent.ok_or_else(active_particle_not_set)
    }

    pub fn max_extent(&self) -> Result<NVec3> {
        Ok(self.extent()?.max)
    }

    pub fn min_extent(&self) -> Result<NVec3> {
        Ok(self.extent()?.min)
    }

    /// Samples at position `marker_start` within every cell of the current trajectory
    ///
    /// Uses the staged buffer while a run is in flight, otherwise the active
    /// particle's committed orbit.
    pub fn active_markers(&self, marker_start: usize) -> Result<Vec<NVec3>> {
        let lattice = self.require_lattice()?;
        let index = self.active.ok_or_else(active_particle_not_set)?;
        check_marker_start(marker_start, lattice)?;

        let points = match self.staged() {
            Some(orbit) => orbit,
            None => self.particles[index].orbit().points(),
        };
        markers_of(points, marker_start, lattice.num_cell_elements())
    }

    fn require_lattice(&self) -> Result<&Lattice> {
        self.lattice.as_ref().ok_or_else(lattice_not_set)
    }

    fn ensure_idle(&self, action: &str) -> Result<()> {
        if self.is_staged() {
            Err(SimError::InvalidState(format!(
                "cannot {action} while another run is staged"
            )))
        } else {
            Ok(())
        }
    }

    fn set_staged(&mut self, particle: usize, orbit: Vec<NVec3>) -> &[NVec3] {
        self.run = RunState::Staged { particle, orbit };
        let RunState::Staged { orbit, .. } = &self.run else {
            unreachable!("run state was just staged")
        };
        orbit
    }
}

/// `[seed] + propagate(seed, lattice)`
fn stage(seed: &NVec3, lattice: &Lattice) -> Vec<NVec3> {
    let mut orbit = Vec::with_capacity(lattice.num_samples().saturating_add(1));
    orbit.push(*seed);
    propagate_into(seed, lattice, &mut orbit);
    orbit
}
