use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::weak_lookup::WeakLookup;

/// An owning handle to a reclaimed object. While any `StrongRef<T>` to a
/// given object exists, the object is guaranteed alive.
///
/// This is a thin wrapper around [`Arc`] rather than a bespoke
/// reference-counted pointer: `Arc`/`Weak` already implement the exact
/// "increment-unless-zero" primitive the refcount substrate requires (see
/// [`WeakLookup::try_acquire`]). What the substrate adds on top is the
/// epoch-deferred destructor, which lives at the call sites that know what
/// "last strong release" means for their object (see
/// `crate::lifecycle::ctf_trace`).
pub struct StrongRef<T>(pub(crate) Arc<T>);

impl<T> StrongRef<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// A [`WeakLookup`] suitable for publishing into a lookup table.
    pub fn downgrade(this: &Self) -> WeakLookup<T> {
        WeakLookup(Arc::downgrade(&this.0))
    }

    /// Number of `StrongRef`s currently outstanding, including `this`.
    ///
    /// Advisory only: by the time the caller observes this value it may
    /// already be stale unless the caller holds a lock that serializes
    /// concurrent `release` calls for this object (the lifecycle layer's
    /// close protocols do).
    pub fn strong_count(this: &Self) -> usize {
        Arc::strong_count(&this.0)
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub(crate) fn into_arc(this: Self) -> Arc<T> {
        this.0
    }
}

impl<T> Clone for StrongRef<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for StrongRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for StrongRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
