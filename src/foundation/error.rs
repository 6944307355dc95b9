/// Result type used throughout the interpreter.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors raised while parsing markup, loading images or producing rasters.
///
/// The evaluator logs these and treats the failing element as producing no image; they only
/// reach callers through the lower-level APIs.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// Bad sizes, buffers or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed attribute text.
    #[error("attribute error: {0}")]
    Attribute(String),

    /// An image reference that could not be resolved or decoded.
    #[error("source error: {0}")]
    Source(String),

    /// A pixel operation that could not complete.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Wrapped error from a dependency or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterError {
    /// Build a [`RasterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RasterError::Attribute`] value.
    pub fn attribute(msg: impl Into<String>) -> Self {
        Self::Attribute(msg.into())
    }

    /// Build a [`RasterError::Source`] value.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Build a [`RasterError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
