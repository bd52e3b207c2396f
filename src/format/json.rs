//! JSON format implementation.
//!
//! The decoder streams either a top-level array of objects or a sequence of
//! objects separated by whitespace (NDJSON). Each record is parsed on demand,
//! so only one record is held in memory at a time.

use std::io::{self, BufRead, BufReader, Read, Write};

use serde::Deserialize;

use super::{FormatError, Record, RecordStream};

/// JSON decoder using serde_json.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonDecoder;

impl JsonDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, reader: Box<dyn Read + Send>) -> RecordStream {
        Box::new(JsonRecords::new(reader))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    /// Inside `[ ... ]`; `first` until the first element has been read
    Array { first: bool },
    Sequence,
    Done,
}

/// Iterator over the records of a JSON document.
pub struct JsonRecords<R> {
    reader: BufReader<R>,
    state: State,
}

impl<R: Read> JsonRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            state: State::Start,
        }
    }

    /// Peek at the next non-whitespace byte, consuming the whitespace.
    fn peek_non_ws(&mut self) -> io::Result<Option<u8>> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }
            let skip = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
            if skip < buf.len() {
                let next = buf[skip];
                self.reader.consume(skip);
                return Ok(Some(next));
            }
            let len = buf.len();
            self.reader.consume(len);
        }
    }

    fn read_record(&mut self) -> Result<Record, FormatError> {
        match self.peek_non_ws()? {
            Some(b'{') => {
                let mut de = serde_json::Deserializer::from_reader(&mut self.reader);
                Ok(Record::deserialize(&mut de)?)
            }
            Some(other) => Err(FormatError::InvalidRecord(format!(
                "expected a JSON object, found '{}'",
                other as char
            ))),
            None => Err(FormatError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "unexpected end of JSON input",
            ))),
        }
    }

    fn advance(&mut self) -> Result<Option<Record>, FormatError> {
        loop {
            match self.state {
                State::Done => return Ok(None),
                State::Start => match self.peek_non_ws()? {
                    None => {
                        self.state = State::Done;
                        return Ok(None);
                    }
                    Some(b'[') => {
                        self.reader.consume(1);
                        self.state = State::Array { first: true };
                    }
                    Some(_) => self.state = State::Sequence,
                },
                State::Array { first } => {
                    match self.peek_non_ws()? {
                        Some(b']') => {
                            self.reader.consume(1);
                            self.state = State::Done;
                            return Ok(None);
                        }
                        Some(b',') if !first => self.reader.consume(1),
                        Some(_) if first => {}
                        Some(other) => {
                            return Err(FormatError::InvalidRecord(format!(
                                "expected ',' or ']' in JSON array, found '{}'",
                                other as char
                            )));
                        }
                        None => {
                            return Err(FormatError::Io(io::Error::new(
                                io::ErrorKind::UnexpectedEof,
                                "unterminated JSON array",
                            )));
                        }
                    }
                    self.state = State::Array { first: false };
                    return self.read_record().map(Some);
                }
                State::Sequence => {
                    if self.peek_non_ws()?.is_none() {
                        self.state = State::Done;
                        return Ok(None);
                    }
                    return self.read_record().map(Some);
                }
            }
        }
    }
}

impl<R: Read> Iterator for JsonRecords<R> {
    type Item = Result<Record, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.state = State::Done;
                Some(Err(e))
            }
        }
    }
}

/// JSON encoder writing an array with one compact record per line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, records: RecordStream, writer: &mut dyn Write) -> Result<u64, FormatError> {
        let mut count = 0u64;

        writer.write_all(b"[")?;
        for record in records {
            let record = record?;
            let separator: &[u8] = if count == 0 { b"\n" } else { b",\n" };
            writer.write_all(separator)?;
            serde_json::to_writer(&mut *writer, &record)?;
            count += 1;
        }
        let closing: &[u8] = if count == 0 { b"]\n" } else { b"\n]\n" };
        writer.write_all(closing)?;
        writer.flush()?;

        Ok(count)
    }
}
