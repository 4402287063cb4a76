use std::fmt;

/// Errors produced by the validating parts of the API.
///
/// The default surface is permissive: `set_weights` is unchecked and a short
/// input vector silently truncates the dot product. Only the constructor and
/// the explicitly checked variants return these.
#[derive(Debug)]
pub enum NetworkError {
    /// The layer configuration cannot form a usable network.
    InvalidTopology(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    DimensionMismatch {
        /// Human-readable context for the mismatch (e.g. "layers", "weights").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::InvalidTopology(msg) => write!(f, "invalid topology: {msg}"),
            NetworkError::DimensionMismatch { what, got, expected } => {
                write!(f, "dimension mismatch for {what}: got {got}, expected {expected}")
            }
        }
    }
}

impl std::error::Error for NetworkError {}
