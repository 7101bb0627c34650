use std::sync::Arc;

pub use crossbeam_epoch::Guard;

use super::strong_ref::StrongRef;

/// Establishes a read-side critical section. Lookups sourced only from a
/// [`super::WeakLookup`] (i.e. the caller doesn't already hold a
/// `StrongRef` to the object) MUST happen inside one of these.
///
/// `f` runs with a [`Guard`] pinning the current thread's epoch; any
/// `release` that would otherwise deallocate an object concurrently
/// observed through a table lookup is deferred until every such guard in
/// flight has been dropped.
pub fn epoch_read<R>(f: impl FnOnce(&Guard) -> R) -> R {
    let guard = crossbeam_epoch::pin();
    f(&guard)
}

/// Schedules `strong`'s destructor to run after the current epoch ends,
/// rather than synchronously in the calling thread.
///
/// Call this only once the caller has already established that `strong` is
/// the last outstanding handle for its object (see each lifecycle type's
/// own `release`, e.g. [`crate::lifecycle::ctf_trace::CTFTrace::release`])
/// and has removed the object from every lookup table that could still
/// produce a [`super::WeakLookup`] for it. Deferring the drop is what
/// keeps a concurrent reader that is mid-`epoch_read` from observing a
/// deallocated object.
pub fn defer_release<T: Send + Sync + 'static>(guard: &Guard, strong: StrongRef<T>) {
    let arc: Arc<T> = StrongRef::into_arc(strong);
    guard.defer(move || drop(arc));
}
