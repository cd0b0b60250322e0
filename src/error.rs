//! Error types for pgencode.

use thiserror::Error;

/// Boxed error produced by a host's string-conversion capability.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for encoding operations.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The output buffer could not grow to the requested size.
    #[error("could not allocate encoding buffer ({requested} bytes)")]
    OutOfMemory { requested: usize },

    /// The host's stringify capability failed for an `Other` value.
    /// Passed through untouched.
    #[error(transparent)]
    Conversion(BoxError),

    /// Value nesting exceeded the configured depth.
    #[error("value nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl EncodeError {
    /// Create an allocation failure for `requested` bytes.
    pub fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }

    /// Wrap a conversion failure coming from the host.
    pub fn conversion(err: impl Into<BoxError>) -> Self {
        Self::Conversion(err.into())
    }
}

/// Errors raised while loading an [`EncoderConfig`](crate::config::EncoderConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("Configuration error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Initial capacity cannot be expressed as 256 * 2^k.
    #[error("Invalid initial capacity: {0}")]
    InvalidCapacity(usize),

    /// Nesting bound must allow at least one sequence level.
    #[error("Invalid max_depth: {0} (must be at least 1)")]
    InvalidDepth(usize),
}

/// Errors raised by [`CopyWriter`](crate::stream::CopyWriter).
#[derive(Debug, Error)]
pub enum StreamError {
    /// Record could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Underlying reader or writer failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An input line is not valid JSON.
    #[error("line {line}: invalid JSON")]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;
