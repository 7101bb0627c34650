//! Full-document assembly checks: fragment ordering (§4.4.4) and emission
//! determinism (no field reordering across repeated runs on the same
//! input), covering properties 4-5.

use lttng_relay_core::model::{
    Abi, ClockClass, EnvironmentValue, Field, FieldType, IntegerRole, IntegerType, StreamClass,
    StructureType, TraceClass,
};
use lttng_relay_core::tsdl::{emit_tsdl_document, StringSink};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn sample_trace_class() -> TraceClass {
    let clock = ClockClass::new("monotonic", 1_000_000_000);
    let header = FieldType::Structure(
        StructureType::new(vec![Field::new(
            "timestamp",
            FieldType::Integer(
                IntegerType::new(64, 8, false).with_role(IntegerRole::DefaultClockTimestamp),
            ),
        )])
        .unwrap(),
    );
    let stream_a = StreamClass::new(0, Some("monotonic".to_string()), Some(header.clone()), None, None, Vec::new())
        .unwrap();
    let stream_b = StreamClass::new(1, Some("monotonic".to_string()), Some(header), None, None, Vec::new())
        .unwrap();

    TraceClass::new(
        Abi::lp64_le(),
        Uuid::nil(),
        vec![
            ("tracer_name".to_string(), EnvironmentValue::from("lttng-ust")),
            ("tracer_major".to_string(), EnvironmentValue::from(2)),
        ],
        None,
        vec![clock],
        vec![stream_a, stream_b],
    )
    .unwrap()
}

#[test]
fn fragments_are_emitted_in_trace_env_clock_stream_event_order() {
    let trace_class = sample_trace_class();
    let mut sink = StringSink::new();
    emit_tsdl_document(&trace_class, &mut sink).unwrap();
    let text = sink.into_inner();

    let trace_pos = text.find("trace {").unwrap();
    let env_pos = text.find("env {").unwrap();
    let clock_pos = text.find("clock {").unwrap();
    let stream_pos = text.find("stream {").unwrap();

    assert!(trace_pos < env_pos);
    assert!(env_pos < clock_pos);
    assert!(clock_pos < stream_pos);

    // Two stream classes in insertion order: id = 0 appears before id = 1.
    let first_stream_id = text[stream_pos..].find("id = 0;").unwrap();
    let second_stream_id = text[stream_pos..].find("id = 1;").unwrap();
    assert!(first_stream_id < second_stream_id);
}

#[test]
fn emission_is_deterministic_across_runs() {
    let trace_class = sample_trace_class();

    let mut first = StringSink::new();
    emit_tsdl_document(&trace_class, &mut first).unwrap();

    let mut second = StringSink::new();
    emit_tsdl_document(&trace_class, &mut second).unwrap();

    assert_eq!(first.as_str(), second.as_str());
}

#[test]
fn environment_entries_preserve_insertion_order() {
    let trace_class = sample_trace_class();
    let mut sink = StringSink::new();
    emit_tsdl_document(&trace_class, &mut sink).unwrap();
    let text = sink.into_inner();

    let name_pos = text.find("tracer_name").unwrap();
    let major_pos = text.find("tracer_major").unwrap();
    assert!(name_pos < major_pos);
}

#[test]
fn multiple_environment_entries_share_a_single_env_fragment() {
    let trace_class = sample_trace_class();
    let mut sink = StringSink::new();
    emit_tsdl_document(&trace_class, &mut sink).unwrap();
    let text = sink.into_inner();

    assert_eq!(text.matches("env {").count(), 1);
    let env_start = text.find("env {").unwrap();
    let env_end = text[env_start..].find("};").unwrap() + env_start;
    let env_block = &text[env_start..env_end];
    assert!(env_block.contains("tracer_name"));
    assert!(env_block.contains("tracer_major"));
}
