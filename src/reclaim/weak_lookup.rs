use std::sync::Weak;

use super::error::ReclaimError;
use super::strong_ref::StrongRef;

/// A lookup-table entry that can be promoted to a [`StrongRef`] only if the
/// target hasn't begun teardown.
///
/// Wraps [`std::sync::Weak`]: promoting a `Weak` is already specified by the
/// standard library to be an atomic increment-unless-zero on the target's
/// strong count, which is exactly the operation §4.1 calls for.
/// Lookup tables (the `ctf_traces` table on a session, the global
/// viewer-streams table) store `WeakLookup<T>`, never a `StrongRef<T>` —
/// that's what keeps table membership from artificially extending an
/// object's lifetime.
pub struct WeakLookup<T>(pub(crate) Weak<T>);

impl<T> WeakLookup<T> {
    /// Atomically attempts to acquire a [`StrongRef`] to the target.
    ///
    /// Fails with [`ReclaimError::Vanishing`] rather than looping or
    /// retrying when the target has already vanished — per §4.1, the
    /// caller must treat the object as absent, not attempt to resurrect
    /// it.
    pub fn try_acquire(&self) -> Result<StrongRef<T>, ReclaimError> {
        self.0.upgrade().map(StrongRef).ok_or(ReclaimError::Vanishing)
    }
}

impl<T> Clone for WeakLookup<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
