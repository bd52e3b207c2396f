//! Tests for the csv, tsv, pipe and delimited codecs.

use std::io::Cursor;

use serde_json::{Value, json};

use crate::format::{DelimitedDecoder, DelimitedEncoder, FormatError, FormatKind, RecordStream};

fn decode(kind: FormatKind, delimiter: Option<u8>, input: &str) -> Vec<Value> {
    let mut decoder = DelimitedDecoder::for_kind(kind);
    if let Some(d) = delimiter {
        decoder.set_delimiter(d);
    }
    decoder
        .read(Box::new(Cursor::new(input.as_bytes().to_vec())))
        .map(|r| Value::Object(r.expect("record")))
        .collect()
}

fn encode(kind: FormatKind, delimiter: Option<u8>, values: Vec<Value>) -> String {
    let mut encoder = DelimitedEncoder::for_kind(kind);
    if let Some(d) = delimiter {
        encoder.set_delimiter(d);
    }
    let records: RecordStream = Box::new(values.into_iter().map(|v| match v {
        Value::Object(map) => Ok(map),
        other => panic!("not an object: {other}"),
    }));
    let mut out = Vec::new();
    encoder.write(records, &mut out).expect("encode");
    String::from_utf8(out).unwrap()
}

#[test]
fn csv_reads_header_and_rows_as_strings() {
    let records = decode(FormatKind::Csv, None, "name,age\nAda,36\nGrace,85\n");
    assert_eq!(
        records,
        vec![
            json!({"name": "Ada", "age": "36"}),
            json!({"name": "Grace", "age": "85"})
        ]
    );
}

#[test]
fn csv_honours_quotes() {
    let records = decode(FormatKind::Csv, None, "name,quote\n\"Lovelace, Ada\",\"said \"\"hi\"\"\"\n");
    assert_eq!(records, vec![json!({"name": "Lovelace, Ada", "quote": "said \"hi\""})]);
}

#[test]
fn csv_quotes_on_write_when_needed() {
    let out = encode(FormatKind::Csv, None, vec![json!({"name": "Lovelace, Ada", "n": 1})]);
    assert_eq!(out, "name,n\n\"Lovelace, Ada\",1\n");
}

#[test]
fn tsv_and_pipe_use_their_delimiters() {
    assert_eq!(
        decode(FormatKind::Tsv, None, "a\tb\n1\t2\n"),
        vec![json!({"a": "1", "b": "2"})]
    );
    assert_eq!(
        decode(FormatKind::Pipe, None, "a|b\n1|2\n"),
        vec![json!({"a": "1", "b": "2"})]
    );
    assert_eq!(encode(FormatKind::Tsv, None, vec![json!({"a": "1", "b": "2"})]), "a\tb\n1\t2\n");
    assert_eq!(encode(FormatKind::Pipe, None, vec![json!({"a": "1", "b": "2"})]), "a|b\n1|2\n");
}

#[test]
fn naive_formats_keep_quotes_as_text() {
    let records = decode(FormatKind::Pipe, None, "a|b\n\"x\"|y\n");
    assert_eq!(records, vec![json!({"a": "\"x\"", "b": "y"})]);

    let out = encode(FormatKind::Pipe, None, vec![json!({"a": "has|pipe"})]);
    assert_eq!(out, "a\nhas|pipe\n");
}

#[test]
fn delimited_defaults_to_comma_and_accepts_override() {
    assert_eq!(
        decode(FormatKind::Delimited, None, "a,b\n1,2\n"),
        vec![json!({"a": "1", "b": "2"})]
    );
    assert_eq!(
        decode(FormatKind::Delimited, Some(b';'), "a;b\n1;2\n"),
        vec![json!({"a": "1", "b": "2"})]
    );
    assert_eq!(
        encode(FormatKind::Delimited, Some(b';'), vec![json!({"a": 1, "b": true})]),
        "a;b\n1;true\n"
    );
}

#[test]
fn short_rows_omit_trailing_fields_and_long_rows_drop_extras() {
    let records = decode(FormatKind::Csv, None, "a,b,c\n1,2\n1,2,3,4\n");
    assert_eq!(
        records,
        vec![json!({"a": "1", "b": "2"}), json!({"a": "1", "b": "2", "c": "3"})]
    );
}

#[test]
fn header_only_input_yields_no_records() {
    assert!(decode(FormatKind::Csv, None, "a,b\n").is_empty());
    assert!(decode(FormatKind::Csv, None, "").is_empty());
}

#[test]
fn encoder_follows_first_record_header() {
    let out = encode(
        FormatKind::Csv,
        None,
        vec![
            json!({"a": 1, "b": "x"}),
            json!({"b": "y", "a": 2}),
            json!({"a": null}),
            json!({"a": [1, 2], "b": {"k": "v"}, "extra": 9}),
        ],
    );
    assert_eq!(
        out,
        "a,b\n1,x\n2,y\n,\n\"[1,2]\",\"{\"\"k\"\":\"\"v\"\"}\"\n"
    );
}

#[test]
fn empty_stream_writes_nothing() {
    assert_eq!(encode(FormatKind::Csv, None, Vec::new()), "");
}

#[test]
fn lone_empty_cell_survives_naive_formats() {
    let records = vec![json!({"a": "x"}), json!({"a": ""}), json!({"a": "y"})];

    for kind in [FormatKind::Tsv, FormatKind::Pipe, FormatKind::Delimited] {
        let text = encode(kind, None, records.clone());
        assert_eq!(text, "a\nx\n\"\"\ny\n", "{kind}");
        assert_eq!(decode(kind, None, &text), records, "{kind}");
    }
}

#[test]
fn quoted_text_in_wider_naive_rows_is_kept() {
    assert_eq!(
        decode(FormatKind::Tsv, None, "a\tb\n\"\"\t\"\"\n"),
        vec![json!({"a": "\"\"", "b": "\"\""})]
    );
}

#[test]
fn first_record_without_fields_is_rejected() {
    let records: RecordStream = Box::new(
        vec![json!({}), json!({"a": 1}), json!({"a": 2})]
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => Ok(map),
                other => panic!("not an object: {other}"),
            }),
    );
    let mut out = Vec::new();

    let err = DelimitedEncoder::for_kind(FormatKind::Csv)
        .write(records, &mut out)
        .expect_err("no header can be derived");
    assert!(matches!(err, FormatError::InvalidRecord(_)));
    assert!(out.is_empty());
}
