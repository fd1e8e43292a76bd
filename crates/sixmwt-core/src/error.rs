use thiserror::Error;

use crate::boundaries::MarkerScheme;

/// File-scoped extraction failures. Value-level parse problems never surface here.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("marker column not found: {message}")]
    Configuration { message: String },

    #[error("{scheme} scheme found {found} boundary markers, expected {expected}")]
    Boundary {
        scheme: MarkerScheme,
        found: usize,
        expected: usize,
    },
}
