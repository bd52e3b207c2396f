//! Delimited text formats: csv, tsv, pipe and delimited.
//!
//! `csv` honours RFC 4180 quoting. The other three split naively on their
//! delimiter: quotes are ordinary characters on read and never emitted on
//! write, so a value containing the delimiter does not survive a round trip.

use std::io::{Read, Write};

use csv::{QuoteStyle, StringRecord};
use serde_json::Value;

use super::{FormatError, FormatKind, Record, RecordStream};

/// Delimiter of the `delimited` format when none is configured.
pub const DEFAULT_DELIMITER: u8 = b',';

const EMPTY_ROW: &str = "\"\"";

fn defaults_for(kind: FormatKind) -> (u8, bool) {
    match kind {
        FormatKind::Csv => (b',', true),
        FormatKind::Tsv => (b'\t', false),
        FormatKind::Pipe => (b'|', false),
        _ => (DEFAULT_DELIMITER, false),
    }
}

/// Decoder for header-first delimited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedDecoder {
    kind: FormatKind,
    delimiter: u8,
    quoting: bool,
}

impl DelimitedDecoder {
    /// Decoder with the delimiter and quoting rules of `kind`.
    pub fn for_kind(kind: FormatKind) -> Self {
        let (delimiter, quoting) = defaults_for(kind);
        Self {
            kind,
            delimiter,
            quoting,
        }
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: u8) {
        self.delimiter = delimiter;
    }

    pub fn read(&self, reader: Box<dyn Read + Send>) -> RecordStream {
        let reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quoting(self.quoting)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        Box::new(DelimitedRecords {
            reader,
            quoting: self.quoting,
            headers: None,
            row: StringRecord::new(),
            done: false,
        })
    }
}

/// Iterator turning delimited rows into records keyed by the header row.
///
/// Missing trailing cells leave the field out; surplus cells are dropped.
struct DelimitedRecords<R> {
    reader: csv::Reader<R>,
    quoting: bool,
    headers: Option<StringRecord>,
    row: StringRecord,
    done: bool,
}

impl<R: Read> DelimitedRecords<R> {
    fn advance(&mut self) -> Result<Option<Record>, FormatError> {
        if self.headers.is_none() {
            let headers = self.reader.headers()?.clone();
            self.headers = Some(headers);
        }

        if !self.reader.read_record(&mut self.row)? {
            return Ok(None);
        }

        let Some(headers) = &self.headers else {
            return Ok(None);
        };

        // The writer spells a lone empty cell as `""` so the row is not blank.
        if !self.quoting && self.row.len() == 1 && &self.row[0] == EMPTY_ROW {
            self.row = StringRecord::from(vec![""]);
        }

        let record = headers
            .iter()
            .zip(self.row.iter())
            .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
            .collect();

        Ok(Some(record))
    }
}

impl<R: Read> Iterator for DelimitedRecords<R> {
    type Item = Result<Record, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Encoder for header-first delimited text.
///
/// The header row comes from the first record's field names, so the first
/// record must have at least one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedEncoder {
    kind: FormatKind,
    delimiter: u8,
    quoting: bool,
}

impl DelimitedEncoder {
    /// Encoder with the delimiter and quoting rules of `kind`.
    pub fn for_kind(kind: FormatKind) -> Self {
        let (delimiter, quoting) = defaults_for(kind);
        Self {
            kind,
            delimiter,
            quoting,
        }
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: u8) {
        self.delimiter = delimiter;
    }

    pub fn write(&self, records: RecordStream, writer: &mut dyn Write) -> Result<u64, FormatError> {
        let quote_style = if self.quoting {
            QuoteStyle::Necessary
        } else {
            QuoteStyle::Never
        };
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(quote_style)
            .flexible(true)
            .from_writer(&mut *writer);

        let mut headers: Option<Vec<String>> = None;
        let mut row: Vec<String> = Vec::new();
        let mut warned = false;
        let mut count = 0u64;

        for record in records {
            let record = record?;

            if headers.is_none() {
                let names: Vec<String> = record.keys().cloned().collect();
                if names.is_empty() {
                    return Err(FormatError::InvalidRecord(
                        "first record has no fields to build a header row from".to_string(),
                    ));
                }
                wtr.write_record(&names)?;
                headers = Some(names);
            }
            let columns = headers.as_deref().unwrap_or_default();

            if !warned && record.keys().any(|k| !columns.contains(k)) {
                tracing::warn!(
                    format = %self.kind,
                    "record has fields missing from the header row; they are dropped"
                );
                warned = true;
            }

            row.clear();
            row.extend(
                columns
                    .iter()
                    .map(|name| record.get(name).map(cell_text).unwrap_or_default()),
            );
            wtr.write_record(&row)?;
            count += 1;
        }

        wtr.flush()?;
        Ok(count)
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
