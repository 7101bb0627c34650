use thiserror::Error;

/// Errors raised by the refcount substrate.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
pub enum ReclaimError {
    /// A [`crate::reclaim::WeakLookup::try_acquire`] found the target's
    /// strong count already at zero. The caller must treat the object as
    /// absent rather than retry the same lookup.
    #[error("the looked-up object is vanishing (refcount already zero)")]
    Vanishing,
}
