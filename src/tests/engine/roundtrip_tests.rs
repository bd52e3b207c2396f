//! Round trips across every pair of formats.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::format::{FormatKind, default_registry};
use crate::{ConvertEngine, InMemorySink, InMemorySource};

fn sample() -> Vec<Value> {
    vec![
        json!({"name": "Ada", "age": 36, "active": true, "score": 1.5}),
        json!({"name": "Grace", "age": 85, "active": false, "score": -2.25}),
    ]
}

fn sample_json() -> String {
    serde_json::to_string(&sample()).unwrap()
}

fn convert(bytes: Vec<u8>, from: FormatKind, to: FormatKind, coerce: bool) -> Vec<u8> {
    let registry = default_registry();
    let sink = InMemorySink::new("out");
    ConvertEngine::new(
        Arc::new(InMemorySource::new("in", bytes)),
        registry.decoder(from, None).unwrap(),
        Arc::new(sink.clone()),
        registry.encoder(to, None, to == FormatKind::Jbin).unwrap(),
    )
    .with_coerce(coerce)
    .run()
    .unwrap_or_else(|e| panic!("{from} -> {to}: {e}"));
    sink.contents()
}

fn is_textual(kind: FormatKind) -> bool {
    !matches!(kind, FormatKind::Json | FormatKind::Jbin)
}

#[test]
fn every_pair_round_trips() {
    for a in FormatKind::ALL {
        for b in FormatKind::ALL {
            let start = convert(sample_json().into_bytes(), FormatKind::Json, a, false);
            let there = convert(start.clone(), a, b, false);
            let back = convert(there, b, a, false);

            // Typed formats survive exactly; text-only formats need coercion
            // on the way back to json to recover the original values.
            let lossy = is_textual(a) || is_textual(b);
            let final_json = convert(back, a, FormatKind::Json, lossy);
            let records: Value = serde_json::from_slice(&final_json).unwrap();

            assert_eq!(records, Value::Array(sample()), "{a} -> {b} -> {a}");
        }
    }
}

#[test]
fn typed_formats_round_trip_byte_for_byte() {
    let json = convert(sample_json().into_bytes(), FormatKind::Json, FormatKind::Json, false);
    let jbin = convert(json.clone(), FormatKind::Json, FormatKind::Jbin, false);
    let again = convert(jbin, FormatKind::Jbin, FormatKind::Json, false);

    assert_eq!(json, again);
}

#[test]
fn single_column_with_empty_value_through_tsv() {
    let input = br#"[{"a":"x"},{"a":""},{"a":"y"}]"#.to_vec();

    let tsv = convert(input, FormatKind::Json, FormatKind::Tsv, false);
    let back = convert(tsv, FormatKind::Tsv, FormatKind::Json, false);
    let records: Value = serde_json::from_slice(&back).unwrap();

    assert_eq!(records, json!([{"a": "x"}, {"a": ""}, {"a": "y"}]));
}
