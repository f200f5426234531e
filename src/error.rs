//! Error types for the assembly kernel.

use thiserror::Error;

/// Errors that can occur in the geometric kernel.
///
/// Newton non-convergence is deliberately not represented here: the
/// reference-coordinate solver reports it through its `inside = false`
/// return so that callers can treat the point as "not contained" and
/// keep going.
#[derive(Error, Debug)]
pub enum Error {
    /// Node count is not consistent with any supported element order.
    #[error("unsupported node count {n_nodes} for {kind} basis")]
    ShapeOrderMismatch {
        /// Element family the caller asked for ("quad", "hex", ...).
        kind: &'static str,
        /// Offending node count.
        n_nodes: usize,
    },

    /// Volume quadrature hit a negative Jacobian determinant, meaning a
    /// tangled or inverted element.
    #[error("negative Jacobian ({det}) at quadrature point {point}")]
    NegativeJacobian { det: f64, point: usize },

    /// Invalid configuration file or values.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, Error>;
