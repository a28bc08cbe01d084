pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::error::{Result, SimError};
pub use simulation::states::{Axis, Extent, NVec3, Orbit, Particle};
pub use simulation::lattice::{Lattice, TransferOperator, DEFAULT_DRIFT_DIVISIONS, DEFAULT_QUAD_DIVISIONS};
pub use simulation::integrator::{propagate, propagate_into};
pub use simulation::model::{Model, RunState};
pub use simulation::scenario::Scenario;

pub use configuration::config::{LatticeConfig, ParticleConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_propagate, bench_run_curve};
