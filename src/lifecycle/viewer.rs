use parking_lot::Mutex;

use crate::reclaim::StrongRef;

use super::chunk::ChunkHandle;
use super::error::AttachOutcome;
use super::ids::ViewerStreamId;
use super::registry::Registry;
use super::session::RelaySession;
use super::stream::RelayStream;

/// Shadow of a `RelayStream` visible to a live viewer. Linked in the
/// global viewer-stream table (one ref) and, once attached, in its owning
/// `ViewerSession`'s session list path (a second ref held by the caller) —
/// see §3.3.
pub struct ViewerStream {
    pub id: ViewerStreamId,
    underlying: StrongRef<RelayStream>,
}

impl ViewerStream {
    pub fn new(id: ViewerStreamId, underlying: StrongRef<RelayStream>) -> Self {
        Self { id, underlying }
    }

    pub fn underlying(&self) -> &StrongRef<RelayStream> {
        &self.underlying
    }
}

/// A live viewer's session: the set of `RelaySession`s it is currently
/// attached to, the `ViewerStream`s it owns (the "one from the viewer
/// session" ref of §3.3's two-refs-per-`ViewerStream` rule), plus the trace
/// chunk it is currently reading.
pub struct ViewerSession {
    attached: Mutex<Vec<StrongRef<RelaySession>>>,
    viewer_streams: Mutex<Vec<StrongRef<ViewerStream>>>,
    current_trace_chunk: Mutex<Option<ChunkHandle>>,
}

impl ViewerSession {
    pub fn new() -> Self {
        Self {
            attached: Mutex::new(Vec::new()),
            viewer_streams: Mutex::new(Vec::new()),
            current_trace_chunk: Mutex::new(None),
        }
    }

    pub fn current_trace_chunk(&self) -> Option<ChunkHandle> {
        self.current_trace_chunk.lock().clone()
    }

    /// Legal only while the session lock is held (enforced here by taking
    /// it for the duration of the call): acquires a `StrongRef` on
    /// `session`, marks it attached (refusing with `AlreadyAttached` if
    /// already set), copies its current trace chunk into this viewer
    /// session, then records the session in this viewer's attached list
    /// (§4.3).
    pub fn attach(&self, session: &StrongRef<RelaySession>) -> AttachOutcome {
        if !session.try_mark_attached() {
            return AttachOutcome::AlreadyAttached;
        }

        // A session with no trace chunk yet is a legal, if uninteresting,
        // attach target; `Unknown` is reserved for a vanished session,
        // which `StrongRef` already rules out on this path.
        let chunk = session.current_trace_chunk();
        *self.current_trace_chunk.lock() = chunk;
        self.attached.lock().push(session.clone());
        AttachOutcome::Ok
    }

    /// Reverses `attach` under the session lock: clears the attached flag
    /// and removes the session from this viewer's list. Unconditional —
    /// detaching a session that was never attached is a no-op.
    pub fn detach(&self, session: &StrongRef<RelaySession>) {
        session.mark_detached();
        self.attached
            .lock()
            .retain(|s| !StrongRef::ptr_eq(s, session));
    }

    pub fn attached_sessions(&self) -> Vec<StrongRef<RelaySession>> {
        self.attached.lock().clone()
    }

    /// Links a `ViewerStream` over `underlying` into both places §3.3
    /// requires it to live: the global viewer-stream table (the table ref)
    /// and this viewer session's own list (the viewer-session ref).
    pub fn subscribe(
        &self,
        registry: &Registry,
        id: ViewerStreamId,
        underlying: StrongRef<RelayStream>,
    ) -> StrongRef<ViewerStream> {
        let viewer_stream = StrongRef::new(ViewerStream::new(id, underlying));
        registry.insert_viewer_stream(id, viewer_stream.clone());
        self.viewer_streams.lock().push(viewer_stream.clone());
        viewer_stream
    }

    /// The viewer-close protocol of §3.3: for every `ViewerStream` in the
    /// global table whose underlying `RelayStream` belongs to one of this
    /// viewer's attached sessions, drop both refs (table and viewer-session)
    /// so the last ref's owner can tear the stream down; then release the
    /// current trace-chunk handle and detach every attached session.
    pub fn close(&self, registry: &Registry) {
        let attached = self.attached.lock().clone();

        for id in registry.viewer_stream_ids() {
            let belongs_to_target = match registry.lookup_viewer_stream(id) {
                Some(viewer_stream) => {
                    let owning_session = viewer_stream.underlying().trace().session();
                    attached
                        .iter()
                        .any(|session| StrongRef::ptr_eq(session, owning_session))
                }
                None => false,
            };

            if belongs_to_target {
                registry.remove_viewer_stream(id);
                self.viewer_streams
                    .lock()
                    .retain(|vs| vs.id != id);
            }
        }

        *self.current_trace_chunk.lock() = None;

        for session in &attached {
            self.detach(session);
        }
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_already_attached_then_detach_then_reattach() {
        let session = StrongRef::new(RelaySession::new("s", "host", 100_000));
        let viewer = ViewerSession::new();

        assert_eq!(viewer.attach(&session), AttachOutcome::Ok);
        assert_eq!(viewer.attach(&session), AttachOutcome::AlreadyAttached);

        viewer.detach(&session);
        assert_eq!(viewer.attach(&session), AttachOutcome::Ok);
    }

    #[test]
    fn attach_copies_current_trace_chunk() {
        let session = StrongRef::new(RelaySession::new("s", "host", 100_000));
        session.set_current_trace_chunk(Some(ChunkHandle::new("chunk-0")));
        let viewer = ViewerSession::new();

        assert_eq!(viewer.attach(&session), AttachOutcome::Ok);
        assert_eq!(
            viewer.current_trace_chunk(),
            Some(ChunkHandle::new("chunk-0"))
        );
    }

    #[test]
    fn close_drops_both_refs_on_streams_of_attached_sessions_and_detaches() {
        use crate::lifecycle::ctf_trace::CTFTrace;
        use crate::lifecycle::ids::StreamId;
        use crate::lifecycle::registry::Registry;

        let registry = Registry::new();
        let session = StrongRef::new(RelaySession::new("s", "host", 100_000));
        let trace = CTFTrace::get_by_path_or_create(&session, "a", &registry).unwrap();
        let stream = StrongRef::new(RelayStream::new(StreamId(0), trace.clone()));
        trace.attach_stream(&stream);

        let viewer = ViewerSession::new();
        assert_eq!(viewer.attach(&session), AttachOutcome::Ok);
        viewer.subscribe(&registry, ViewerStreamId(0), stream.clone());
        assert!(registry.lookup_viewer_stream(ViewerStreamId(0)).is_some());

        drop(stream);
        viewer.close(&registry);

        assert!(registry.lookup_viewer_stream(ViewerStreamId(0)).is_none());
        assert!(viewer.viewer_streams.lock().is_empty());
        assert!(viewer.attached_sessions().is_empty());
        assert!(!session.is_viewer_attached());
        assert_eq!(viewer.current_trace_chunk(), None);
    }

    #[test]
    fn close_leaves_viewer_streams_of_other_sessions_untouched() {
        use crate::lifecycle::ctf_trace::CTFTrace;
        use crate::lifecycle::ids::StreamId;
        use crate::lifecycle::registry::Registry;

        let registry = Registry::new();
        let target = StrongRef::new(RelaySession::new("target", "host", 100_000));
        let other = StrongRef::new(RelaySession::new("other", "host", 100_000));

        let target_trace = CTFTrace::get_by_path_or_create(&target, "a", &registry).unwrap();
        let target_stream = StrongRef::new(RelayStream::new(StreamId(0), target_trace.clone()));
        target_trace.attach_stream(&target_stream);

        let other_trace = CTFTrace::get_by_path_or_create(&other, "a", &registry).unwrap();
        let other_stream = StrongRef::new(RelayStream::new(StreamId(1), other_trace.clone()));
        other_trace.attach_stream(&other_stream);

        let viewer = ViewerSession::new();
        assert_eq!(viewer.attach(&target), AttachOutcome::Ok);
        viewer.subscribe(&registry, ViewerStreamId(0), target_stream);
        viewer.subscribe(&registry, ViewerStreamId(1), other_stream);

        viewer.close(&registry);

        assert!(registry.lookup_viewer_stream(ViewerStreamId(0)).is_none());
        assert!(registry.lookup_viewer_stream(ViewerStreamId(1)).is_some());
    }
}
