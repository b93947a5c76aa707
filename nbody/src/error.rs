//! Error type shared by the simulation core

use thiserror::Error;

/// Things that can go wrong while setting up or driving a simulation.
///
/// Numeric anomalies (NaN/Inf in accelerations) are not errors: they are
/// carried through the snapshots and left to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NBodyError {
    /// A construction input failed validation (N, chunk size, dt, masses, ...)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The operation is not allowed in the integrator's current state
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("expected positions for {expected} particles, got {found}")]
    PositionCountMismatch { expected: usize, found: usize },

    #[error("expected an output buffer for {expected} particles, got {found}")]
    OutputLengthMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, NBodyError>;

/// Shorthand for building an `InvalidConfiguration` error
pub(crate) fn invalid(msg: impl Into<String>) -> NBodyError {
    NBodyError::InvalidConfiguration(msg.into())
}
