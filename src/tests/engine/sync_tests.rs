//! Engine tests over in-memory sources and sinks.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::{ConvertError, Stage};
use crate::format::{FormatKind, default_registry};
use crate::{ConvertBuilder, ConvertEngine, InMemorySink, InMemorySource};

fn engine(input: &str, from: FormatKind, to: FormatKind, sink: &InMemorySink) -> ConvertEngine {
    let registry = default_registry();
    ConvertEngine::new(
        Arc::new(InMemorySource::from_string("in", input)),
        registry.decoder(from, None).unwrap(),
        Arc::new(sink.clone()),
        registry.encoder(to, None, false).unwrap(),
    )
}

#[test]
fn run_streams_and_finishes_target() {
    let sink = InMemorySink::new("out");
    let summary = engine("a,b\n1,2\n3,4\n", FormatKind::Csv, FormatKind::Json, &sink)
        .run()
        .unwrap();

    assert_eq!(summary.records, 2);
    assert!(sink.is_finished());
    assert_eq!(
        sink.contents_string(),
        "[\n{\"a\":\"1\",\"b\":\"2\"},\n{\"a\":\"3\",\"b\":\"4\"}\n]\n"
    );
}

#[test]
fn coercion_is_off_by_default() {
    let sink = InMemorySink::new("out");
    let engine = engine("n\n5\n", FormatKind::Csv, FormatKind::Json, &sink);
    assert!(!engine.coerces());

    let records: Vec<Value> = engine
        .records()
        .unwrap()
        .map(|r| Value::Object(r.unwrap()))
        .collect();
    assert_eq!(records, vec![json!({"n": "5"})]);

    let coerced: Vec<Value> = engine
        .with_coerce(true)
        .records()
        .unwrap()
        .map(|r| Value::Object(r.unwrap()))
        .collect();
    assert_eq!(coerced, vec![json!({"n": 5})]);
}

#[test]
fn decode_error_mid_stream_keeps_prefix_and_skips_finish() {
    let sink = InMemorySink::new("out");
    let err = engine(
        "{\"a\":1}\n{\"a\":2}\n{broken",
        FormatKind::Json,
        FormatKind::Csv,
        &sink,
    )
    .run()
    .unwrap_err();

    match &err {
        ConvertError::Io(e) => {
            assert_eq!(e.stage, Stage::Convert);
            assert_eq!(e.location, "in -> out");
        }
        other => panic!("expected stream error, got: {other:?}"),
    }
    assert_eq!(err.exit_code(), 1);
    assert!(!sink.is_finished());
    assert!(sink.contents_string().starts_with("a\n1\n"));
}

#[test]
fn late_delimiter_override_on_engine() {
    let sink = InMemorySink::new("out");
    let mut engine = engine("x:y\n1:2\n", FormatKind::Delimited, FormatKind::Delimited, &sink);

    assert!(engine.decoder_mut().set_delimiter(b':'));
    assert!(engine.encoder_mut().set_delimiter(b'\t'));
    engine.run().unwrap();

    assert_eq!(sink.contents_string(), "x\ty\n1\t2\n");
}

#[test]
fn builder_accepts_prebuilt_providers() {
    let sink = InMemorySink::new("people.json");
    let source = Arc::new(InMemorySource::from_string(
        "people.csv",
        "name,age\nAda,36\nGrace,85\n",
    ));

    let summary = ConvertBuilder::default()
        .with_source_provider(source)
        .with_target_provider(Arc::new(sink.clone()))
        .coerce(true)
        .run()
        .unwrap();

    assert_eq!(summary.records, 2);
    let written: Value = serde_json::from_str(&sink.contents_string()).unwrap();
    assert_eq!(
        written,
        json!([{"name": "Ada", "age": 36}, {"name": "Grace", "age": 85}])
    );
}

#[test]
fn empty_source_produces_empty_output() {
    let sink = InMemorySink::new("out");
    let summary = engine("", FormatKind::Json, FormatKind::Json, &sink).run().unwrap();

    assert_eq!(summary.records, 0);
    assert_eq!(sink.contents_string(), "[]\n");
}
