use thiserror::Error;

use crate::reclaim::ReclaimError;

/// Errors raised while creating or looking up a [`crate::lifecycle::CTFTrace`].
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("the owning session could not be referenced")]
    SessionVanishing,

    #[error(transparent)]
    Reclaim(#[from] ReclaimError),
}

/// Outcome of [`crate::lifecycle::ViewerSession::attach`] (§4.3, §6). Maps
/// 1:1 to the viewer wire protocol's `LTTNG_VIEWER_ATTACH_{OK,ALREADY,UNK}`
/// return codes, which live outside this crate's scope.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AttachOutcome {
    Ok,
    AlreadyAttached,
    Unknown,
}
