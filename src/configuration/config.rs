//! Configuration types for loading lattice scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`LatticeConfig`]  – FODO geometry and element subdivisions
//! - [`ParticleConfig`] – initial transverse coordinates of the tracked particle
//! - [`ScenarioConfig`] – top-level wrapper, plus optional continuation runs
//!
//! # YAML format
//! ```yaml
//! lattice:
//!   drift_length: 10.0      # length of each drift section
//!   focal_length: 8.0       # quadrupole focal length
//!   num_cells: 12           # FODO cells per run
//!   quad_divisions: 5       # optional, thin-lens kicks per quad
//!   drift_divisions: 5      # optional, steps per drift
//!
//! particle:
//!   x: 0.4                  # transverse position
//!   xp: -0.1                # transverse slope
//!
//! continue_cells: [6, 6]    # optional, one continuation run per entry
//! ```
//!
//! `Scenario::build_scenario` turns this into validated runtime types.

use rand::Rng;
use serde::Deserialize;

use crate::simulation::lattice::{DEFAULT_DRIFT_DIVISIONS, DEFAULT_QUAD_DIVISIONS};
use crate::simulation::states::random_coordinates;

fn default_quad_divisions() -> usize {
    DEFAULT_QUAD_DIVISIONS
}

fn default_drift_divisions() -> usize {
    DEFAULT_DRIFT_DIVISIONS
}

/// FODO lattice geometry
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LatticeConfig {
    pub drift_length: f64, // length of one drift section
    pub focal_length: f64, // focal length of each quadrupole
    pub num_cells: usize,  // cells traversed per run
    #[serde(default = "default_quad_divisions")]
    pub quad_divisions: usize, // thin-lens kicks per quadrupole
    #[serde(default = "default_drift_divisions")]
    pub drift_divisions: usize, // steps per drift section
}

/// Initial state of the tracked particle
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ParticleConfig {
    pub x: f64,  // transverse position
    pub xp: f64, // transverse slope
}

impl ParticleConfig {
    /// Standard-normal coordinates rounded to two decimals
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (x, xp) = random_coordinates(rng);
        Self { x, xp }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub lattice: LatticeConfig,
    pub particle: ParticleConfig,
    #[serde(default)]
    pub continue_cells: Vec<usize>, // cell count of each continuation run, in order
}
