use derive_more::{Display, From};

/// Monotonically-allocated CTFTrace identifier, unique process-wide. Only
/// [`crate::lifecycle::Registry::next_trace_id`] constructs one.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct TraceId(u64);

impl TraceId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a `RelayStream`, scoped to its owning `CTFTrace`.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct StreamId(pub u64);

/// Identifier of a `ViewerStream`, keyed in the global viewer-stream table.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct ViewerStreamId(pub u64);

/// A relay session's user-facing name. Newtyped so it can't be confused with
/// a subpath or hostname at a call site.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, From)]
pub struct SessionName(String);

impl SessionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
