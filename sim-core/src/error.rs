//! Simulation errors

use thiserror::Error;

/// Errors produced by the simulation core.
///
/// Generation itself is infallible for a valid mode; the only failure path
/// is an unrecognized mode string arriving from configuration or a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The mode argument was not one of `live` / `batch`.
    #[error("invalid generation mode '{0}' (expected 'live' or 'batch')")]
    InvalidMode(String),
}
