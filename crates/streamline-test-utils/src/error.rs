//! Errors raised while creating backend resources.

/// A GPU resource could not be created.
///
/// These are configuration failures: they surface at construction time and
/// are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// Requested buffer exceeds the device's `max_buffer_size` limit.
    #[error("buffer {label:?} needs {requested} bytes but the device allows at most {limit}")]
    BufferTooLarge {
        label: Option<String>,
        requested: u64,
        limit: u64,
    },

    /// Shader compilation or pipeline validation failed.
    #[error("failed to create render pipeline {label:?}: {message}")]
    PipelineCreation {
        label: Option<String>,
        message: String,
    },

    /// A descriptor was rejected before reaching the device.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
}
