//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::{ConfigError, ConvertError, StageError};

/// A diagnostic wrapper for conversion errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct ConvertDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

impl From<StageError> for ConvertDiagnostic {
    fn from(e: StageError) -> Self {
        ConvertDiagnostic {
            message: format!("[{}] on '{}'", e.stage, e.location),
            source: Some(e.error),
            help: Some("Check that the source exists and the target is writable".into()),
            severity: Severity::Error,
        }
    }
}

impl From<ConfigError> for ConvertDiagnostic {
    fn from(e: ConfigError) -> Self {
        let help = if e.is_incomplete() {
            "Run with --help to see the required options"
        } else {
            "Supported formats are json, csv, tsv, pipe, delimited and jbin"
        };
        ConvertDiagnostic {
            message: e.to_string(),
            source: None,
            help: Some(help.into()),
            severity: Severity::Error,
        }
    }
}

impl From<ConvertError> for ConvertDiagnostic {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::Config(e) => e.into(),
            ConvertError::Io(e) => e.into(),
        }
    }
}

impl From<ConvertError> for miette::Report {
    fn from(e: ConvertError) -> Self {
        miette::Report::new(ConvertDiagnostic::from(e))
    }
}
