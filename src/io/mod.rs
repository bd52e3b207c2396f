//! I/O abstractions for conversion sources and targets.
//!
//! This module provides:
//! - `InputProvider`: Trait for input sources
//! - `OutputTarget` / `OutputStream`: Traits for output destinations
//! - `Location`: Classification of `-`, URLs and local paths
//! - Standard implementations for files, stdin/stdout and HTTP
//! - In-memory implementations for embedding and testing

mod input;
mod location;
mod memory;
mod output;
mod std_io;

#[cfg(feature = "http")]
mod http;

pub use input::InputProvider;
pub use location::{Location, STDIO_MARKER, is_url, resolve_source, resolve_target};
pub use memory::{InMemorySink, InMemorySource};
pub use output::{OutputStream, OutputTarget};
pub use std_io::{FileInput, FileOutput, StdinInput, StdoutOutput};

#[cfg(feature = "http")]
pub use http::{UrlInput, UrlOutput};
