use parking_lot::Mutex;

use crate::reclaim::{defer_release, epoch_read, StrongRef, WeakLookup};

use super::error::TraceError;
use super::ids::TraceId;
use super::registry::Registry;
use super::session::RelaySession;
use super::stream::RelayStream;

/// A CTF trace: the unit a relay session's table is keyed on, and the thing
/// every `RelayStream` keeps alive via a `StrongRef` (§3.3). Lives as long
/// as at least one `RelayStream` references it.
pub struct CTFTrace {
    pub id: TraceId,
    pub subpath: String,
    session: StrongRef<RelaySession>,
    /// Weak, like every lookup table in this crate (§4.1): a `CTFTrace`
    /// must never be the thing keeping its own streams alive, or releasing
    /// the last external `StrongRef<RelayStream>` would never reach zero.
    streams: Mutex<Vec<WeakLookup<RelayStream>>>,
    viewer_metadata_stream: Mutex<Option<WeakLookup<RelayStream>>>,
}

impl CTFTrace {
    fn new(id: TraceId, subpath: String, session: StrongRef<RelaySession>) -> Self {
        Self {
            id,
            subpath,
            session,
            streams: Mutex::new(Vec::new()),
            viewer_metadata_stream: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(id: TraceId, subpath: String, session: StrongRef<RelaySession>) -> Self {
        Self::new(id, subpath, session)
    }

    pub fn session(&self) -> &StrongRef<RelaySession> {
        &self.session
    }

    /// Exactly-once creation protocol for `(session, subpath)` (§4.3).
    ///
    /// Lookup happens under an epoch-read critical section; if a live entry
    /// is found, `try_acquire` wins outright. Otherwise a fresh `CTFTrace`
    /// is allocated speculatively and only published into the table if no
    /// concurrent caller has already won; the loser's freshly-allocated
    /// object is simply dropped.
    pub fn get_by_path_or_create(
        session: &StrongRef<RelaySession>,
        subpath: &str,
        registry: &Registry,
    ) -> Result<StrongRef<CTFTrace>, TraceError> {
        if let Some(existing) = epoch_read(|_guard| {
            session
                .traces
                .read()
                .get(subpath)
                .and_then(|weak| weak.try_acquire().ok())
        }) {
            return Ok(existing);
        }

        let id = registry.next_trace_id();
        let candidate = StrongRef::new(CTFTrace::new(id, subpath.to_string(), session.clone()));

        let mut traces = session.traces.write();
        if let Some(winner) = traces.get(subpath).and_then(|weak| weak.try_acquire().ok()) {
            return Ok(winner);
        }
        traces.insert(subpath.to_string(), StrongRef::downgrade(&candidate));
        Ok(candidate)
    }

    /// Calls `try_close` on every stream currently linked. Infallible and
    /// idempotent (§4.3): a stream that has already vanished (its owner
    /// dropped it without going through `try_close`) is simply skipped.
    pub fn close(&self) {
        for weak in self.streams.lock().iter() {
            if let Ok(stream) = weak.try_acquire() {
                stream.try_close();
            }
        }
    }

    pub fn attach_stream(&self, stream: &StrongRef<RelayStream>) {
        self.streams.lock().push(StrongRef::downgrade(stream));
    }

    pub fn publish_viewer_metadata_stream(&self, stream: &StrongRef<RelayStream>) {
        *self.viewer_metadata_stream.lock() = Some(StrongRef::downgrade(stream));
    }

    /// Atomically obtains a `StrongRef` to the viewer-side metadata stream,
    /// if one has been published. Returns `None` both when nothing has been
    /// published yet and when the published stream has since vanished —
    /// either way the caller's correct response is the same: there is no
    /// metadata stream to read right now.
    pub fn get_viewer_metadata_stream(&self) -> Option<StrongRef<RelayStream>> {
        self.viewer_metadata_stream
            .lock()
            .as_ref()
            .and_then(|weak| weak.try_acquire().ok())
    }

    /// Releases one `StrongRef<CTFTrace>` (§4.1). Checked and performed
    /// under the owning session's table write lock so that a concurrent
    /// `get_by_path_or_create` can never observe the trace mid-teardown:
    /// either it arrives before this call takes the lock and acquires a
    /// fresh `StrongRef` that keeps the trace alive (so `strong_count`
    /// here will read > 1 and this call is a plain decrement), or it
    /// arrives after the table entry is gone and allocates a brand new
    /// `CTFTrace` instead of resurrecting this one.
    pub fn release(strong: StrongRef<CTFTrace>) {
        let mut traces = strong.session.traces.write();
        if StrongRef::strong_count(&strong) == 1 {
            traces.remove(&strong.subpath);
            drop(traces);
            epoch_read(|guard| defer_release(guard, strong));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::registry::Registry;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn exactly_once_creation_under_concurrency() {
        let registry = Arc::new(Registry::new());
        let session = StrongRef::new(RelaySession::new("s", "host", 100_000));

        let results: Vec<_> = thread::scope(|scope| {
            (0..16)
                .map(|_| {
                    let session = session.clone();
                    let registry = registry.clone();
                    scope.spawn(move || {
                        CTFTrace::get_by_path_or_create(
                            &session,
                            "ust/uid/1000/64-bit",
                            &registry,
                        )
                        .unwrap()
                    })
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        let first_id = results[0].id;
        assert!(results.iter().all(|trace| trace.id == first_id));
        assert!(results
            .iter()
            .all(|trace| StrongRef::ptr_eq(trace, &results[0])));
    }

    #[test]
    fn different_subpaths_get_different_traces() {
        let registry = Registry::new();
        let session = StrongRef::new(RelaySession::new("s", "host", 100_000));
        let a = CTFTrace::get_by_path_or_create(&session, "a", &registry).unwrap();
        let b = CTFTrace::get_by_path_or_create(&session, "b", &registry).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn releasing_last_stream_removes_the_trace_from_its_session_table() {
        use crate::lifecycle::ids::StreamId;
        use crate::lifecycle::stream::RelayStream;

        let registry = Registry::new();
        let session = StrongRef::new(RelaySession::new("s", "host", 100_000));
        let trace = CTFTrace::get_by_path_or_create(&session, "a", &registry).unwrap();
        let trace_id = trace.id;

        let stream = StrongRef::new(RelayStream::new(StreamId(0), trace.clone()));
        trace.attach_stream(&stream);
        drop(trace);

        assert!(session.traces.read().contains_key("a"));
        drop(stream);
        assert!(!session.traces.read().contains_key("a"));

        let recreated = CTFTrace::get_by_path_or_create(&session, "a", &registry).unwrap();
        assert_ne!(recreated.id, trace_id);
    }
}
