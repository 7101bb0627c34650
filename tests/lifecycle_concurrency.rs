//! Cross-thread exercises of the refcounted object graph (§8's properties
//! 1-2, scenario S6): concurrent `get_by_path_or_create` calls converge on
//! exactly one `CTFTrace`, and releasing the last `StrongRef<RelayStream>`
//! deterministically tears the trace down.

use std::sync::Arc;
use std::thread;

use lttng_relay_core::lifecycle::{CTFTrace, RelaySession, RelayStream, Registry, StreamId};
use lttng_relay_core::reclaim::StrongRef;

#[test]
fn sixteen_threads_racing_get_by_path_or_create_converge_on_one_trace() {
    let registry = Arc::new(Registry::new());
    let session = StrongRef::new(RelaySession::new("s", "host", 100_000));

    let traces: Vec<_> = thread::scope(|scope| {
        (0..16)
            .map(|_| {
                let session = session.clone();
                let registry = registry.clone();
                scope.spawn(move || {
                    CTFTrace::get_by_path_or_create(&session, "ust/uid/1000/64-bit", &registry)
                        .unwrap()
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    let first = &traces[0];
    assert!(traces.iter().all(|t| StrongRef::ptr_eq(t, first)));
}

#[test]
fn streams_from_many_threads_all_keep_the_same_trace_alive() {
    let registry = Registry::new();
    let session = StrongRef::new(RelaySession::new("s", "host", 100_000));
    let trace = CTFTrace::get_by_path_or_create(&session, "a", &registry).unwrap();
    let trace_id = trace.id;

    let streams: Vec<_> = thread::scope(|scope| {
        (0..8)
            .map(|i| {
                let trace = trace.clone();
                scope.spawn(move || StrongRef::new(RelayStream::new(StreamId(i), trace)))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    for stream in &streams {
        trace.attach_stream(stream);
    }
    drop(trace);

    for stream in streams {
        drop(stream);
    }

    let recreated = CTFTrace::get_by_path_or_create(&session, "a", &registry).unwrap();
    assert_ne!(recreated.id, trace_id);
}
