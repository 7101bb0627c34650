use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};

use crate::reclaim::StrongRef;

use super::ids::{TraceId, ViewerStreamId};
use super::viewer::ViewerStream;

/// Process-scoped global state (§9's "global mutable state ... modeled as a
/// process-scoped `Registry` value"): the monotonic trace-id counter and the
/// table every `ViewerStream` is linked into.
///
/// One `Registry` is created at daemon start and handed to every
/// `RelaySession`/`ViewerSession` it creates; tests construct a fresh one
/// per test so concurrent test runs don't share trace-id sequences.
pub struct Registry {
    next_trace_id: Mutex<u64>,
    viewer_streams: RwLock<HashMap<ViewerStreamId, StrongRef<ViewerStream>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_trace_id: Mutex::new(0),
            viewer_streams: RwLock::new(HashMap::new()),
        }
    }

    /// Allocates the next monotonic `TraceId`. Guarded by a short-lived
    /// mutex hold (§5: "the monotonic-id counter acquires a process-wide
    /// mutex briefly").
    pub fn next_trace_id(&self) -> TraceId {
        let mut next = self.next_trace_id.lock();
        let id = TraceId::new(*next);
        *next += 1;
        id
    }

    pub fn insert_viewer_stream(&self, id: ViewerStreamId, stream: StrongRef<ViewerStream>) {
        self.viewer_streams.write().insert(id, stream);
    }

    pub fn remove_viewer_stream(&self, id: ViewerStreamId) -> Option<StrongRef<ViewerStream>> {
        self.viewer_streams.write().remove(&id)
    }

    pub fn lookup_viewer_stream(&self, id: ViewerStreamId) -> Option<StrongRef<ViewerStream>> {
        self.viewer_streams.read().get(&id).cloned()
    }

    /// All currently-linked viewer streams; used by a viewer on close to
    /// walk the table (§3.3) and drop the refs belonging to sessions it
    /// owns.
    pub fn viewer_stream_ids(&self) -> Vec<ViewerStreamId> {
        self.viewer_streams.read().keys().copied().collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_ids_are_monotonic_and_unique() {
        let registry = Registry::new();
        let ids: Vec<_> = (0..8).map(|_| registry.next_trace_id()).collect();
        for window in ids.windows(2) {
            assert!(window[1] > window[0]);
        }
    }
}
