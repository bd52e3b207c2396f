//! Conversion configuration.
//!
//! This module provides:
//! - `PipelineConfig`: Every user-adjustable knob of one conversion

mod pipeline;

pub use pipeline::PipelineConfig;
