//! Error taxonomy for the propagation engine
//!
//! Every engine operation is a terminating computation, so errors are only
//! ever raised synchronously at the offending call. Nothing is retried.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Bad lattice or particle construction parameters
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Propagation or an extent query attempted without a lattice or active particle
    #[error("precondition not met: {0}")]
    PreconditionNotMet(String),

    /// Commit without a staged run, or a second run while one is in flight
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Unknown axis name, out-of-range index or marker position
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

pub(crate) fn lattice_not_set() -> SimError {
    SimError::PreconditionNotMet("lattice not set".to_string())
}

pub(crate) fn active_particle_not_set() -> SimError {
    SimError::PreconditionNotMet("active particle not set".to_string())
}
