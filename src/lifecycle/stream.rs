use parking_lot::Mutex;

use crate::reclaim::StrongRef;

use super::ctf_trace::CTFTrace;
use super::ids::StreamId;

/// A relay stream's readiness, visible through lifecycle operations (§4.3).
/// Arrivals are driven by external data rather than a fixed call sequence,
/// so this is a runtime-chosen plain enum guarded by the stream's own lock
/// rather than a compile-time typestate.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StreamState {
    Allocated,
    Indexed,
    Ready,
    Closing,
    Destroyed,
}

pub struct RelayStream {
    pub id: StreamId,
    trace: Option<StrongRef<CTFTrace>>,
    state: Mutex<StreamState>,
}

impl RelayStream {
    pub fn new(id: StreamId, trace: StrongRef<CTFTrace>) -> Self {
        Self {
            id,
            trace: Some(trace),
            state: Mutex::new(StreamState::Allocated),
        }
    }

    pub fn trace(&self) -> &StrongRef<CTFTrace> {
        self.trace.as_ref().expect("trace is only None during Drop")
    }

    pub fn state(&self) -> StreamState {
        *self.state.lock()
    }

    /// `Allocated → Indexed`, on the arrival of the stream's first index.
    pub fn publish(&self) -> bool {
        let mut state = self.state.lock();
        if *state == StreamState::Allocated {
            *state = StreamState::Indexed;
            true
        } else {
            false
        }
    }

    /// `Indexed → Ready`, once the stream has crossed a data boundary the
    /// live viewer protocol requires before serving reads.
    pub fn mark_ready(&self) -> bool {
        let mut state = self.state.lock();
        if *state == StreamState::Indexed {
            *state = StreamState::Ready;
            true
        } else {
            false
        }
    }

    /// `Ready|Indexed|Allocated → Closing`. Idempotent: returns whether this
    /// call actually performed the transition (§4.3's `close()` guarantee
    /// that driving `try_close` on every stream is safe to repeat).
    pub fn try_close(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            StreamState::Allocated | StreamState::Indexed | StreamState::Ready => {
                *state = StreamState::Closing;
                true
            }
            StreamState::Closing | StreamState::Destroyed => false,
        }
    }

    /// `Closing → Destroyed`, called once the last `StrongRef<RelayStream>`
    /// is about to be released.
    pub(crate) fn mark_destroyed(&self) {
        *self.state.lock() = StreamState::Destroyed;
    }
}

impl Drop for RelayStream {
    /// Releases this stream's contribution to its owning `CTFTrace`'s
    /// refcount through [`CTFTrace::release`] rather than an implicit
    /// `Arc` decrement, so the trace's table-removal-plus-epoch-deferred
    /// teardown (§3.3) runs exactly when the last stream goes away.
    fn drop(&mut self) {
        self.mark_destroyed();
        if let Some(trace) = self.trace.take() {
            CTFTrace::release(trace);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::ids::TraceId;
    use crate::lifecycle::session::RelaySession;

    fn new_trace() -> StrongRef<CTFTrace> {
        let session = StrongRef::new(RelaySession::new("s", "host", 100_000));
        StrongRef::new(CTFTrace::new_for_test(
            TraceId::new(0),
            "ust/uid/1000/64-bit".to_string(),
            session,
        ))
    }

    #[test]
    fn try_close_is_idempotent() {
        let stream = RelayStream::new(StreamId(0), new_trace());
        assert!(stream.try_close());
        assert!(!stream.try_close());
        assert_eq!(stream.state(), StreamState::Closing);
    }

    #[test]
    fn publish_then_ready_then_close() {
        let stream = RelayStream::new(StreamId(0), new_trace());
        assert!(stream.publish());
        assert!(stream.mark_ready());
        assert_eq!(stream.state(), StreamState::Ready);
        assert!(stream.try_close());
        assert!(!stream.publish());
    }
}
