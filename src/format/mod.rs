//! Format abstraction for record decoding and encoding.
//!
//! This module provides:
//! - `FormatKind`: The closed set of format keywords
//! - `FormatError`: Errors that can occur while decoding or encoding records
//! - `Decoder` / `Encoder`: One variant per codec family
//! - `FormatRegistry`: Keyword and extension lookup plus codec construction

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::io::{STDIO_MARKER, is_url};

mod delimited;
mod jbin;
mod json;

pub use delimited::{DEFAULT_DELIMITER, DelimitedDecoder, DelimitedEncoder};
pub use jbin::{JBIN_MAGIC, JBIN_VERSION, JbinDecoder, JbinEncoder};
pub use json::{JsonDecoder, JsonEncoder};

/// One record: an ordered mapping from field name to value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A lazy, single-pass sequence of decoded records.
pub type RecordStream = Box<dyn Iterator<Item = Result<Record, FormatError>>>;

/// Represents the supported record formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// JSON array of objects, or one object after another
    Json,
    /// Comma separated values with quoting
    Csv,
    /// Tab separated values
    Tsv,
    /// Pipe separated values
    Pipe,
    /// Separated values with a configurable delimiter
    Delimited,
    /// Compact binary records
    Jbin,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FormatKind {
    /// Every format, in registration order.
    pub const ALL: [FormatKind; 6] = [
        FormatKind::Json,
        FormatKind::Csv,
        FormatKind::Tsv,
        FormatKind::Pipe,
        FormatKind::Delimited,
        FormatKind::Jbin,
    ];

    /// The keyword used on the command line.
    pub fn keyword(&self) -> &'static str {
        match self {
            FormatKind::Json => "json",
            FormatKind::Csv => "csv",
            FormatKind::Tsv => "tsv",
            FormatKind::Pipe => "pipe",
            FormatKind::Delimited => "delimited",
            FormatKind::Jbin => "jbin",
        }
    }

    /// Parse a format keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.keyword() == s)
    }

    /// File extensions that select this format during detection.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FormatKind::Json => &["json"],
            FormatKind::Csv => &["csv"],
            FormatKind::Jbin => &["jbin"],
            FormatKind::Tsv | FormatKind::Pipe | FormatKind::Delimited => &[],
        }
    }
}

impl FromStr for FormatKind {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}

/// Errors that can occur during format operations.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The requested format is unknown or not registered
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Delimiters must fit in a single byte
    #[error("Delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("jbin encode error: {0}")]
    JbinEncode(#[from] rmp_serde::encode::Error),

    #[error("jbin decode error: {0}")]
    JbinDecode(#[from] rmp_serde::decode::Error),

    #[error("Invalid jbin header: {0}")]
    InvalidHeader(String),

    /// The input held something other than a record
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// A record decoder, one variant per codec family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoder {
    Json(JsonDecoder),
    Delimited(DelimitedDecoder),
    Jbin(JbinDecoder),
}

impl Decoder {
    pub fn kind(&self) -> FormatKind {
        match self {
            Decoder::Json(_) => FormatKind::Json,
            Decoder::Delimited(d) => d.kind(),
            Decoder::Jbin(_) => FormatKind::Jbin,
        }
    }

    /// Override the delimiter of a `delimited` decoder.
    ///
    /// Returns false, leaving the decoder untouched, for every other format.
    pub fn set_delimiter(&mut self, delimiter: u8) -> bool {
        match self {
            Decoder::Delimited(d) if d.kind() == FormatKind::Delimited => {
                d.set_delimiter(delimiter);
                true
            }
            _ => false,
        }
    }

    /// Start decoding `reader`. Nothing is read until the stream is pulled.
    pub fn read(&self, reader: Box<dyn Read + Send>) -> RecordStream {
        match self {
            Decoder::Json(d) => d.read(reader),
            Decoder::Delimited(d) => d.read(reader),
            Decoder::Jbin(d) => d.read(reader),
        }
    }
}

/// A record encoder, one variant per codec family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoder {
    Json(JsonEncoder),
    Delimited(DelimitedEncoder),
    Jbin(JbinEncoder),
}

impl Encoder {
    pub fn kind(&self) -> FormatKind {
        match self {
            Encoder::Json(_) => FormatKind::Json,
            Encoder::Delimited(e) => e.kind(),
            Encoder::Jbin(_) => FormatKind::Jbin,
        }
    }

    /// Override the delimiter of a `delimited` encoder.
    ///
    /// Returns false, leaving the encoder untouched, for every other format.
    pub fn set_delimiter(&mut self, delimiter: u8) -> bool {
        match self {
            Encoder::Delimited(e) if e.kind() == FormatKind::Delimited => {
                e.set_delimiter(delimiter);
                true
            }
            _ => false,
        }
    }

    /// Toggle compression of a `jbin` encoder.
    ///
    /// Returns false, leaving the encoder untouched, for every other format.
    pub fn set_compressed(&mut self, compressed: bool) -> bool {
        match self {
            Encoder::Jbin(e) => {
                e.set_compressed(compressed);
                true
            }
            _ => false,
        }
    }

    /// Drain `records` into `writer`, returning the number of records written.
    ///
    /// The first decode or write error aborts the drain; whatever was written
    /// before it stays written.
    pub fn write(&self, records: RecordStream, writer: &mut dyn Write) -> Result<u64, FormatError> {
        match self {
            Encoder::Json(e) => e.write(records, writer),
            Encoder::Delimited(e) => e.write(records, writer),
            Encoder::Jbin(e) => e.write(records, writer),
        }
    }
}

/// Convert a delimiter character to the single byte the codecs work with.
pub fn delimiter_byte(delimiter: char) -> Result<u8, FormatError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(FormatError::InvalidDelimiter(delimiter))
    }
}

/// Registry for managing available formats.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: Vec<FormatKind>,
}

impl FormatRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Register a format.
    pub fn register(&mut self, kind: FormatKind) {
        if !self.formats.contains(&kind) {
            self.formats.push(kind);
        }
    }

    /// Register a format (builder pattern).
    pub fn with_format(mut self, kind: FormatKind) -> Self {
        self.register(kind);
        self
    }

    /// Check if a format is registered.
    pub fn has_format(&self, kind: FormatKind) -> bool {
        self.formats.contains(&kind)
    }

    /// Get all registered format kinds.
    pub fn formats(&self) -> &[FormatKind] {
        &self.formats
    }

    /// Look up a registered format by keyword.
    pub fn kind_for_keyword(&self, keyword: &str) -> Option<FormatKind> {
        FormatKind::from_keyword(keyword).filter(|k| self.has_format(*k))
    }

    /// Get format kind for a file extension.
    pub fn kind_for_extension(&self, ext: &str) -> Option<FormatKind> {
        self.formats
            .iter()
            .copied()
            .find(|kind| kind.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Detect the format of a location from its suffix.
    ///
    /// The check is case-insensitive and, for URLs, only looks at the URL path.
    /// Content is never inspected.
    pub fn detect(&self, location: &str) -> Option<FormatKind> {
        if location == STDIO_MARKER {
            return None;
        }

        let lowered = location.to_lowercase();
        let path = if is_url(&lowered) {
            Url::parse(&lowered).ok()?.path().to_string()
        } else {
            lowered
        };

        let (_, ext) = path.rsplit_once('.')?;
        if ext.contains('/') {
            return None;
        }
        self.kind_for_extension(ext)
    }

    /// Build a decoder for a registered format.
    ///
    /// `delimiter` only affects the `delimited` format.
    pub fn decoder(&self, kind: FormatKind, delimiter: Option<char>) -> Result<Decoder, FormatError> {
        if !self.has_format(kind) {
            return Err(FormatError::UnknownFormat(kind.to_string()));
        }

        let mut decoder = match kind {
            FormatKind::Json => Decoder::Json(JsonDecoder::new()),
            FormatKind::Jbin => Decoder::Jbin(JbinDecoder::new()),
            FormatKind::Csv | FormatKind::Tsv | FormatKind::Pipe | FormatKind::Delimited => {
                Decoder::Delimited(DelimitedDecoder::for_kind(kind))
            }
        };
        if let Some(d) = delimiter {
            decoder.set_delimiter(delimiter_byte(d)?);
        }
        Ok(decoder)
    }

    /// Build an encoder for a registered format.
    ///
    /// `delimiter` only affects the `delimited` format and `compress` only `jbin`.
    pub fn encoder(
        &self,
        kind: FormatKind,
        delimiter: Option<char>,
        compress: bool,
    ) -> Result<Encoder, FormatError> {
        if !self.has_format(kind) {
            return Err(FormatError::UnknownFormat(kind.to_string()));
        }

        let mut encoder = match kind {
            FormatKind::Json => Encoder::Json(JsonEncoder::new()),
            FormatKind::Jbin => Encoder::Jbin(JbinEncoder::new()),
            FormatKind::Csv | FormatKind::Tsv | FormatKind::Pipe | FormatKind::Delimited => {
                Encoder::Delimited(DelimitedEncoder::for_kind(kind))
            }
        };
        if let Some(d) = delimiter {
            encoder.set_delimiter(delimiter_byte(d)?);
        }
        encoder.set_compressed(compress);
        Ok(encoder)
    }
}

/// Create a default registry with every format.
pub fn default_registry() -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    for kind in FormatKind::ALL {
        registry.register(kind);
    }
    registry
}
