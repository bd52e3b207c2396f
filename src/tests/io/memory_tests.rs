//! Tests for in-memory IO implementations.

use std::io::{Read, Write};

use crate::{InMemorySink, InMemorySource, InputProvider, OutputTarget};

#[test]
fn in_memory_source_reads_data_each_open() {
    let src = InMemorySource::from_string("id", "hello");

    for _ in 0..2 {
        let mut reader = src.open().expect("open in-memory source");
        let mut buf = String::new();
        reader.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "hello");
    }
    assert_eq!(src.id(), "id");
}

#[test]
fn in_memory_sink_collects_and_finishes() {
    let sink = InMemorySink::new("out");

    let mut w = sink.open().unwrap();
    w.write_all(b"abc").unwrap();
    assert_eq!(sink.contents(), b"abc".to_vec());
    assert!(!sink.is_finished());

    w.finish().unwrap();
    assert!(sink.is_finished());
    assert_eq!(sink.contents_string(), "abc");
}

#[test]
fn in_memory_sink_open_replaces_content() {
    let sink = InMemorySink::new("out");

    {
        let mut w = sink.open().unwrap();
        w.write_all(b"first").unwrap();
        w.finish().unwrap();
    }
    {
        let mut w = sink.open().unwrap();
        w.write_all(b"2").unwrap();
    }

    assert_eq!(sink.contents_string(), "2");
    assert!(!sink.is_finished());
}
