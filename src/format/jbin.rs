//! Compact binary record format.
//!
//! Layout: the 4-byte magic `JBIN`, a version byte, a flags byte, then one
//! MessagePack map per record until end of input. Flag bit 0 marks a
//! gzip-compressed body; the header itself is never compressed, so decoders
//! need no configuration to read either form.

use std::io::{self, BufRead, BufReader, Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use super::{FormatError, Record, RecordStream};

pub const JBIN_MAGIC: [u8; 4] = *b"JBIN";
pub const JBIN_VERSION: u8 = 1;

const FLAG_COMPRESSED: u8 = 0b0000_0001;
const HEADER_LEN: usize = 6;

type Body = BufReader<Box<dyn Read + Send>>;

/// Decoder for jbin input, compressed or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JbinDecoder;

impl JbinDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, reader: Box<dyn Read + Send>) -> RecordStream {
        Box::new(JbinRecords {
            source: Some(reader),
            body: None,
            done: false,
        })
    }
}

struct JbinRecords {
    source: Option<Box<dyn Read + Send>>,
    body: Option<Body>,
    done: bool,
}

/// Read and check the header. Empty input has no header and no records.
fn open_body(raw: Box<dyn Read + Send>) -> Result<Option<Body>, FormatError> {
    let mut raw = BufReader::new(raw);
    if raw.fill_buf()?.is_empty() {
        return Ok(None);
    }

    let mut header = [0u8; HEADER_LEN];
    raw.read_exact(&mut header).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => FormatError::InvalidHeader("truncated header".into()),
        _ => FormatError::Io(e),
    })?;

    if header[..4] != JBIN_MAGIC {
        return Err(FormatError::InvalidHeader(format!(
            "expected magic {:?}, found {:?}",
            JBIN_MAGIC,
            &header[..4]
        )));
    }
    if header[4] != JBIN_VERSION {
        return Err(FormatError::InvalidHeader(format!(
            "unsupported version {}",
            header[4]
        )));
    }

    let body: Box<dyn Read + Send> = if header[5] & FLAG_COMPRESSED != 0 {
        Box::new(GzDecoder::new(raw))
    } else {
        Box::new(raw)
    };
    Ok(Some(BufReader::new(body)))
}

impl JbinRecords {
    fn advance(&mut self) -> Result<Option<Record>, FormatError> {
        if let Some(raw) = self.source.take() {
            self.body = open_body(raw)?;
        }

        let Some(body) = self.body.as_mut() else {
            return Ok(None);
        };
        if body.fill_buf()?.is_empty() {
            return Ok(None);
        }

        let record: Record = rmp_serde::from_read(&mut *body)?;
        Ok(Some(record))
    }
}

impl Iterator for JbinRecords {
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

/// Encoder for jbin output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JbinEncoder {
    compressed: bool,
}

impl JbinEncoder {
    pub fn new() -> Self {
        Self { compressed: false }
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn set_compressed(&mut self, compressed: bool) {
        self.compressed = compressed;
    }

    pub fn write(&self, records: RecordStream, writer: &mut dyn Write) -> Result<u64, FormatError> {
        let flags = if self.compressed { FLAG_COMPRESSED } else { 0 };
        writer.write_all(&JBIN_MAGIC)?;
        writer.write_all(&[JBIN_VERSION, flags])?;

        let count = if self.compressed {
            let mut gz = GzEncoder::new(&mut *writer, Compression::default());
            let count = write_body(records, &mut gz)?;
            gz.finish()?;
            count
        } else {
            write_body(records, &mut *writer)?
        };

        writer.flush()?;
        Ok(count)
    }
}

fn write_body<W: Write>(records: RecordStream, mut out: W) -> Result<u64, FormatError> {
    let mut count = 0u64;
    for record in records {
        rmp_serde::encode::write(&mut out, &record?)?;
        count += 1;
    }
    Ok(count)
}
