//! Pipeline configuration for one conversion.

use serde::{Deserialize, Serialize};

use crate::format::FormatKind;

/// Configuration for a single source-to-target conversion.
///
/// Built incrementally (by the argument parser or by hand) and consumed once
/// by [`ConvertBuilder`](crate::ConvertBuilder). Nothing here touches the
/// filesystem or network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source location: file path, URL, or "-" for stdin
    #[serde(default)]
    pub source: Option<String>,
    /// Explicit source format; detected from the source suffix when absent
    #[serde(default)]
    pub source_type: Option<FormatKind>,
    /// Target location: file path, URL, or "-" for stdout
    #[serde(default)]
    pub target: Option<String>,
    /// Explicit target format; detected from the target suffix when absent
    #[serde(default)]
    pub target_type: Option<FormatKind>,
    /// Delimiter for a `delimited` source
    #[serde(default)]
    pub source_delimiter: Option<char>,
    /// Delimiter for a `delimited` target
    #[serde(default)]
    pub target_delimiter: Option<char>,
    /// Compress `jbin` output
    #[serde(default)]
    pub compress: bool,
    /// Coerce string values into numbers and booleans
    #[serde(default)]
    pub coerce: bool,
}

impl PipelineConfig {
    /// Create a new empty pipeline configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source location.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the explicit source format.
    pub fn with_source_type(mut self, kind: FormatKind) -> Self {
        self.source_type = Some(kind);
        self
    }

    /// Set the target location.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the explicit target format.
    pub fn with_target_type(mut self, kind: FormatKind) -> Self {
        self.target_type = Some(kind);
        self
    }

    /// Set the delimiter of a `delimited` source.
    pub fn with_source_delimiter(mut self, delimiter: char) -> Self {
        self.source_delimiter = Some(delimiter);
        self
    }

    /// Set the delimiter of a `delimited` target.
    pub fn with_target_delimiter(mut self, delimiter: char) -> Self {
        self.target_delimiter = Some(delimiter);
        self
    }

    /// Enable or disable `jbin` output compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Enable or disable string coercion.
    pub fn with_coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }
}
