pub mod error;
pub mod states;
pub mod lattice;
pub mod integrator;
pub mod model;
pub mod scenario;
