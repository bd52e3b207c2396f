//! # convio
//!
//! Streaming conversion of record data between file formats.
//!
//! ## Overview
//!
//! convio provides:
//! - **Formats**: JSON, CSV, TSV, pipe-separated, custom-delimited text and
//!   the compact binary `jbin` format
//! - **Locations**: local files, stdin/stdout (`-`) and HTTP(S) URLs
//! - **Detection**: formats are picked from the `.json`, `.csv` and `.jbin`
//!   suffixes when no explicit type is given
//! - **Coercion**: an optional lazy pass turning `"36"` into `36` and
//!   `"true"` into `true`
//! - **Streaming**: records are pulled one at a time from the decoder by the
//!   encoder; the dataset is never held in memory
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use convio::ConvertBuilder;
//!
//! fn main() -> Result<(), convio::ConvertError> {
//!     let summary = ConvertBuilder::default()
//!         .source("people.csv")
//!         .target("out/people.json")
//!         .coerce(true)
//!         .run()?;
//!
//!     println!("{} records", summary.records);
//!     Ok(())
//! }
//! ```
//!
//! Embedding without touching the filesystem:
//!
//! ```rust
//! use std::sync::Arc;
//! use convio::{ConvertBuilder, InMemorySink, InMemorySource};
//!
//! let source = Arc::new(InMemorySource::from_string("people.csv", "name,age\nAda,36\n"));
//! let sink = InMemorySink::new("people.json");
//!
//! ConvertBuilder::default()
//!     .with_source_provider(source)
//!     .with_target_provider(Arc::new(sink.clone()))
//!     .coerce(true)
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(sink.contents_string(), "[\n{\"name\":\"Ada\",\"age\":36}\n]\n");
//! ```
//!
//! ## Features
//!
//! - `http` - URL sources and targets via blocking reqwest (enabled by default)
//! - `miette` - Pretty error reporting with miette

pub mod builder;
pub mod cli;
pub mod coerce;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod io;

// Re-exports for convenience
pub use builder::{ConvertBuilder, ResolvedKinds};
pub use config::PipelineConfig;
pub use engine::{ConvertEngine, ConvertSummary};
pub use error::{ConfigError, ConvertError, Stage, StageError};
pub use format::{
    Decoder, Encoder, FormatError, FormatKind, FormatRegistry, Record, RecordStream,
    default_registry,
};
pub use io::{
    FileInput, FileOutput, InMemorySink, InMemorySource, InputProvider, Location, OutputStream,
    OutputTarget, StdinInput, StdoutOutput,
};

#[cfg(feature = "http")]
pub use io::{UrlInput, UrlOutput};

/// Build a ConvertEngine from a PipelineConfig using the default
/// FormatRegistry.
pub fn build_engine_from_pipeline(config: PipelineConfig) -> Result<ConvertEngine, ConvertError> {
    ConvertBuilder::from_config(config, default_registry()).build()
}

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::ConvertDiagnostic;
