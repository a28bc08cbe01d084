//! Build validated runtime scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario` holding:
//! - the initial `Lattice`
//! - the initial `Particle`
//! - one `Lattice` per continuation run (same geometry, own cell count)
//!
//! `Scenario::run` then drives a `Model` the way an interactive front end
//! would: start, commit, then continue/commit for every continuation.

use tracing::trace;

use crate::configuration::config::{LatticeConfig, ScenarioConfig};
use crate::simulation::error::Result;
use crate::simulation::lattice::Lattice;
use crate::simulation::model::Model;
use crate::simulation::states::{NVec3, Particle};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub lattice: Lattice,
    pub particle: Particle,
    pub continuations: Vec<Lattice>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        // Lattice (runtime) from LatticeConfig, validates geometry
        let lattice = build_lattice(&cfg.lattice)?;

        // Particle at s = 0
        let particle = Particle::new(cfg.particle.x, cfg.particle.xp)?;

        // Continuations reuse the geometry with their own cell counts
        let continuations = cfg
            .continue_cells
            .iter()
            .map(|&n| lattice.with_num_cells(n))
            .collect::<Result<Vec<_>>>()?;

        trace!(
            num_cells = lattice.num_cells(),
            continuations = continuations.len(),
            "scenario built"
        );

        Ok(Self {
            lattice,
            particle,
            continuations,
        })
    }

    /// Total cells traversed by the initial run and every continuation
    pub fn total_cells(&self) -> usize {
        self.lattice.num_cells() + self.continuations.iter().map(Lattice::num_cells).sum::<usize>()
    }

    /// Run the scenario to completion on a fresh model
    ///
    /// `on_staged` sees every staged buffer before it is committed, the way a
    /// display would animate it.
    pub fn run<F>(&self, mut on_staged: F) -> Result<Model>
    where
        F: FnMut(usize, &[NVec3]),
    {
        let mut model = Model::with_lattice(self.lattice.clone());

        let staged = model.start_with(self.particle.clone())?;
        on_staged(0, staged);
        model.commit()?;

        for (i, lattice) in self.continuations.iter().enumerate() {
            model.set_lattice(lattice.clone())?;
            let staged = model.continue_run()?;
            on_staged(i + 1, staged);
            model.commit()?;
        }

        Ok(model)
    }
}

fn build_lattice(cfg: &LatticeConfig) -> Result<Lattice> {
    Lattice::with_divisions(
        cfg.drift_length,
        cfg.focal_length,
        cfg.num_cells,
        cfg.quad_divisions,
        cfg.drift_divisions,
    )
}
