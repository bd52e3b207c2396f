//! The conversion engine: one source, one decoder, one target, one encoder.

use std::sync::Arc;

use crate::coerce::coerce_records;
use crate::error::{ConvertError, Stage, StageError};
use crate::format::{Decoder, Encoder, FormatError, RecordStream};
use crate::io::{InputProvider, OutputTarget};

/// Outcome of a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertSummary {
    /// Records written to the target
    pub records: u64,
}

/// A fully bound conversion.
///
/// Every field is required, so an engine is complete by construction. Build
/// one with [`ConvertBuilder`](crate::ConvertBuilder) or [`ConvertEngine::new`].
#[derive(Debug)]
pub struct ConvertEngine {
    source: Arc<dyn InputProvider>,
    decoder: Decoder,
    target: Arc<dyn OutputTarget>,
    encoder: Encoder,
    coerce: bool,
}

impl ConvertEngine {
    pub fn new(
        source: Arc<dyn InputProvider>,
        decoder: Decoder,
        target: Arc<dyn OutputTarget>,
        encoder: Encoder,
    ) -> Self {
        Self {
            source,
            decoder,
            target,
            encoder,
            coerce: false,
        }
    }

    /// Enable or disable string coercion between decoder and encoder.
    pub fn with_coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    pub fn source(&self) -> &dyn InputProvider {
        self.source.as_ref()
    }

    pub fn target(&self) -> &dyn OutputTarget {
        self.target.as_ref()
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Mutable access for late configuration, e.g. a delimiter override.
    pub fn decoder_mut(&mut self) -> &mut Decoder {
        &mut self.decoder
    }

    pub fn encoder_mut(&mut self) -> &mut Encoder {
        &mut self.encoder
    }

    pub fn coerces(&self) -> bool {
        self.coerce
    }

    /// Open the source and return its lazy record stream, coerced if enabled.
    ///
    /// Decode errors are yielded by the stream rather than returned here.
    pub fn records(&self) -> Result<RecordStream, StageError> {
        let reader = self
            .source
            .open()
            .map_err(|e| StageError::new(Stage::Open, self.source.id(), e))?;

        let records = self.decoder.read(reader);
        Ok(if self.coerce {
            coerce_records(records)
        } else {
            records
        })
    }

    /// Stream every record from the source into the target.
    ///
    /// The target is opened only after the source, and finished only when the
    /// encoder drained the stream without error. On failure the target handle
    /// is dropped and whatever was written so far stays in place.
    pub fn run(&self) -> Result<ConvertSummary, ConvertError> {
        let records = self.records()?;

        let mut out = self
            .target
            .open()
            .map_err(|e| StageError::new(Stage::Open, self.target.id(), e))?;

        let written = self
            .encoder
            .write(records, &mut out)
            .map_err(|e| self.convert_error(e))?;

        out.finish()
            .map_err(|e| StageError::new(Stage::Close, self.target.id(), e))?;

        tracing::info!(
            source = self.source.id(),
            target = self.target.id(),
            from = %self.decoder.kind(),
            to = %self.encoder.kind(),
            records = written,
            "conversion complete"
        );

        Ok(ConvertSummary { records: written })
    }

    fn convert_error(&self, error: FormatError) -> StageError {
        let route = format!("{} -> {}", self.source.id(), self.target.id());
        StageError::new(Stage::Convert, route, error)
    }
}
