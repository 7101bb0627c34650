//! Runtime ownership graph for relay sessions, traces, streams and viewers
//! (§3.3, §4.3): the object graph built on top of [`crate::reclaim`] and
//! [`crate::model`].

mod chunk;
mod ctf_trace;
mod error;
mod ids;
mod registry;
mod session;
mod stream;
mod viewer;

pub use chunk::ChunkHandle;
pub use ctf_trace::CTFTrace;
pub use error::{AttachOutcome, TraceError};
pub use ids::{SessionName, StreamId, TraceId, ViewerStreamId};
pub use registry::Registry;
pub use session::RelaySession;
pub use stream::{RelayStream, StreamState};
pub use viewer::{ViewerSession, ViewerStream};
