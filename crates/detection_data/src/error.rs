use std::path::PathBuf;
use thiserror::Error;

/// Failure categories raised while building pipelines or producing batches.
///
/// Every fallible function in this crate returns `anyhow::Result`; the
/// underlying error is always one of these variants, so callers can decide
/// whether to skip a sample or abort the run with
/// `err.downcast_ref::<DataError>()`.
#[derive(Debug, Error)]
pub enum DataError {
    /// The image file is missing, unreadable or cannot be decoded.
    #[error("failed to load image {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// Invalid construction parameters (empty pick list, bad bounds,
    /// mismatched filename/label lists, zero batch size, ...).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Images collected into one batch do not share a shape.
    #[error(
        "shape mismatch in sample {index}: expected {expected:?}, got {found:?}"
    )]
    ShapeMismatch {
        index: usize,
        expected: [usize; 3],
        found: [usize; 3],
    },

    /// A photometric operation received something other than a decoded
    /// `height x width x 3` buffer.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

impl DataError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        DataError::Configuration(msg.into())
    }
}
