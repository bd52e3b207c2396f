//! Best-effort conversion of string values into numbers and booleans.
//!
//! Delimited formats carry every value as text. Coercion rewrites a string
//! only when serde_json would print the parsed value back as exactly the same
//! text, so identifiers such as `007`, `+1` or `1.10` stay strings and no
//! digits are lost to float rounding.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::format::{FormatError, Record, RecordStream};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(0|[1-9][0-9]*)(?<fraction>\.[0-9]+)?(?<exponent>[eE][+-]?[0-9]+)?$")
        .expect("valid number pattern")
});

/// Parse `text` as a boolean or number, if it is unambiguously one.
pub fn coerce_str(text: &str) -> Option<Value> {
    match text {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }

    let parts = NUMBER.captures(text)?;
    let number = if parts.name("fraction").is_none() && parts.name("exponent").is_none() {
        // Integers beyond 64 bits stay strings rather than becoming floats.
        match text.parse::<i64>() {
            Ok(n) => Number::from(n),
            Err(_) => Number::from(text.parse::<u64>().ok()?),
        }
    } else {
        Number::from_f64(text.parse::<f64>().ok()?)?
    };

    (number.to_string() == text).then_some(Value::Number(number))
}

/// Coerce one value, descending into objects and arrays.
pub fn coerce_value(value: Value) -> Value {
    match value {
        Value::String(s) => coerce_str(&s).unwrap_or(Value::String(s)),
        Value::Array(items) => Value::Array(items.into_iter().map(coerce_value).collect()),
        Value::Object(map) => Value::Object(coerce_record(map)),
        other => other,
    }
}

/// Coerce every field of a record, keeping field order.
pub fn coerce_record(record: Record) -> Record {
    record
        .into_iter()
        .map(|(name, value)| (name, coerce_value(value)))
        .collect()
}

/// Iterator adapter applying [`coerce_record`] to each record as it is pulled.
pub struct CoerceStrings<I> {
    inner: I,
}

impl<I> CoerceStrings<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I> Iterator for CoerceStrings<I>
where
    I: Iterator<Item = Result<Record, FormatError>>,
{
    type Item = Result<Record, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| r.map(coerce_record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Wrap a record stream so string values are coerced lazily.
pub fn coerce_records(records: RecordStream) -> RecordStream {
    Box::new(CoerceStrings::new(records))
}
