use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};

use crate::reclaim::WeakLookup;

use super::chunk::ChunkHandle;
use super::ctf_trace::CTFTrace;
use super::ids::SessionName;

/// Bookkeeping mutated only while the session lock is held, per §4.3's
/// attach/detach contract.
struct AttachState {
    viewer_attached: bool,
    current_trace_chunk: Option<ChunkHandle>,
}

/// A relay session: one per producer connection. Holds only `WeakLookup`
/// entries for its traces (§3.3's lifecycle rule) so that a session never
/// keeps a `CTFTrace` alive past its last `RelayStream`.
pub struct RelaySession {
    pub name: SessionName,
    pub hostname: String,
    pub live_timer_us: u32,
    pub(super) traces: RwLock<HashMap<String, WeakLookup<CTFTrace>>>,
    attach_state: Mutex<AttachState>,
}

impl RelaySession {
    pub fn new(name: impl Into<SessionName>, hostname: impl Into<String>, live_timer_us: u32) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            live_timer_us,
            traces: RwLock::new(HashMap::new()),
            attach_state: Mutex::new(AttachState {
                viewer_attached: false,
                current_trace_chunk: None,
            }),
        }
    }

    pub fn is_viewer_attached(&self) -> bool {
        self.attach_state.lock().viewer_attached
    }

    pub fn current_trace_chunk(&self) -> Option<ChunkHandle> {
        self.attach_state.lock().current_trace_chunk.clone()
    }

    pub fn set_current_trace_chunk(&self, chunk: Option<ChunkHandle>) {
        self.attach_state.lock().current_trace_chunk = chunk;
    }

    /// Sets `viewer_attached`, refusing if already set. Returns whether the
    /// flag was actually flipped, so the caller (`ViewerSession::attach`)
    /// can distinguish a fresh attach from `AlreadyAttached`.
    pub(super) fn try_mark_attached(&self) -> bool {
        let mut state = self.attach_state.lock();
        if state.viewer_attached {
            false
        } else {
            state.viewer_attached = true;
            true
        }
    }

    pub(super) fn mark_detached(&self) {
        self.attach_state.lock().viewer_attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_attach_without_detach_is_refused() {
        let session = RelaySession::new("s", "host", 100_000);
        assert!(session.try_mark_attached());
        assert!(!session.try_mark_attached());
        session.mark_detached();
        assert!(session.try_mark_attached());
    }
}
