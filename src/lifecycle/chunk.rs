use std::sync::Arc;

/// An opaque handle to a trace chunk owned by a chunk-registry collaborator
/// outside this crate's scope (§6). Cheap to clone; equality is by
/// identifier, not by pointer, since two handles naming the same chunk
/// should compare equal regardless of how each was obtained.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ChunkHandle(Arc<str>);

impl ChunkHandle {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChunkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
