/// Error types for vertex transformation
use thiserror::Error;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors reported by transform resolution and the apply pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Bad or missing input, detected before any vertex is touched.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The homogeneous component of a transformed vertex was zero.
    #[error("degenerate transform: homogeneous divide by zero at vertex {index}")]
    DegenerateTransform {
        /// Index of the first vertex whose w' vanished.
        index: usize,
    },
}

impl TransformError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter(reason.into())
    }
}
