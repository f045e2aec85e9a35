//! Error types for the filtering entry points.

use thiserror::Error;

/// Errors returned by the top-level filters.
///
/// Shape validation is the only hard failure mode: parameter sanity is the
/// caller's responsibility, and numeric anomalies propagate as non-finite
/// output values rather than errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    /// The input array is not a 2D image or a 3D stack of 2D images.
    #[error("Invalid number of dimensions in data: {0}, please provide a stack of 2D projections")]
    InvalidShape(usize),
}
