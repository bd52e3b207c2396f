//! Error types for convio conversions.
//!
//! This module provides:
//! - `ConfigError`: User configuration errors raised before any I/O happens
//! - `Stage`: Indicates where an error occurred in the conversion pipeline
//! - `StageError`: A resolution or streaming failure with location context
//! - `ConvertError`: The top-level error returned by the builder and engine

use std::fmt;

use thiserror::Error;

/// Exit status for unknown parameters, flag values and format keywords.
pub const EXIT_UNKNOWN: i32 = 255;
/// Exit status for an incomplete configuration.
pub const EXIT_INCOMPLETE: i32 = 254;
/// Exit status for help output and runtime failures.
pub const EXIT_FAILURE: i32 = 1;

/// Errors in the user-supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Missing value for parameter: {0}")]
    MissingValue(String),

    #[error("Unknown input type: {0}")]
    UnknownSourceType(String),

    #[error("Unknown output type: {0}")]
    UnknownTargetType(String),

    /// Delimiters must be a single ASCII character
    #[error("Invalid delimiter: {0:?}")]
    InvalidDelimiter(String),

    #[error("No source specified!")]
    MissingSource,

    #[error("No source type specified and unable to autodetect")]
    MissingSourceType,

    #[error("No target specified!")]
    MissingTarget,

    #[error("No target type specified and unable to autodetect")]
    MissingTargetType,
}

impl ConfigError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_incomplete() {
            EXIT_INCOMPLETE
        } else {
            EXIT_UNKNOWN
        }
    }

    /// True when the configuration was well-formed but missing a required piece.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingSource
                | ConfigError::MissingSourceType
                | ConfigError::MissingTarget
                | ConfigError::MissingTargetType
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveSource,
    ResolveTarget,
    /// Error while opening the I/O stream
    Open,
    /// Error while records were flowing from decoder to encoder
    Convert,
    /// Error while flushing or committing the target
    Close,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ResolveSource => write!(f, "ResolveSource"),
            Stage::ResolveTarget => write!(f, "ResolveTarget"),
            Stage::Open => write!(f, "Open"),
            Stage::Convert => write!(f, "Convert"),
            Stage::Close => write!(f, "Close"),
        }
    }
}

#[derive(Debug)]
pub struct StageError {
    /// Stage where the error occurred
    pub stage: Stage,
    /// Identifier of the location (file path, URL, "-" for stdin/stdout)
    pub location: String,
    /// The underlying error
    pub error: Box<dyn std::error::Error + Send + Sync>,
}

impl StageError {
    pub fn new(
        stage: Stage,
        location: impl Into<String>,
        error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            stage,
            location: location.into(),
            error: error.into(),
        }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.location, self.error)
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

/// Any failure of a conversion, from argument scanning to the final flush.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] StageError),
}

impl ConvertError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::Config(e) => e.exit_code(),
            ConvertError::Io(_) => EXIT_FAILURE,
        }
    }
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
