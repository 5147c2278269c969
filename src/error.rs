use thiserror::Error;

use crate::callbacks::CallbackError;

/// Everything an arena operation can fail with.
///
/// Configuration and operation errors are surfaced at the offending call
/// without touching simulation state. A callback failure stops the arena
/// and is re-raised from `step` (or `multi_step`) once the current tick's
/// bookkeeping has completed.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Rejected before any state change: bad tick rate, a callback slot
    /// the game mode does not support, an unknown hitbox preset, or a
    /// malformed custom pad list.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The call itself was legal but its target was not, e.g. removing a
    /// car that does not belong to this arena.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A user callback returned an error. The arena has been stopped; the
    /// tick that was in flight completed its state changes.
    #[error("callback failed: {0}")]
    CallbackFailure(#[source] CallbackError),

    /// Physics-level or allocation failure. The affected arena's state is
    /// undefined afterwards.
    #[error("unrecoverable: {0}")]
    Unrecoverable(String),

    /// Mesh catalog initialization failed.
    #[error("collision mesh init failed")]
    MeshInit(#[from] std::io::Error),
}

impl ArenaError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub(crate) fn invalid_op(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}
