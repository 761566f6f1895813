//! Error types for coverage computation.
//!
//! Only two failures ever leave the core: an input buffer that cannot be read
//! in its declared format, and a request range that cannot produce a timeline.
//! Row-level problems are never errors; see [`crate::models::SkipReason`].

use crate::parsing::SourceFormat;

/// Result type for coverage operations
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Error type for coverage operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoverageError {
    /// A whole input buffer could not be decoded in its declared format.
    #[error("Malformed input: could not read '{source_name}' as {format}: {message}")]
    MalformedInput {
        source_name: String,
        format: SourceFormat,
        message: String,
    },

    /// The requested range or step cannot produce a timeline.
    #[error("Invalid range: {message}")]
    InvalidRange { message: String },
}

impl CoverageError {
    /// Create a malformed input error for the named buffer.
    pub fn malformed(
        source_name: impl Into<String>,
        format: SourceFormat,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedInput {
            source_name: source_name.into(),
            format,
            message: message.into(),
        }
    }

    /// Create an invalid range error.
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: message.into(),
        }
    }

    /// Stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "MALFORMED_INPUT",
            Self::InvalidRange { .. } => "INVALID_RANGE",
        }
    }
}
