//! Error types for the store layer.

use quizrally_protocol::Pin;

/// Errors that can occur during room persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Insert-only save found a live record under this pin.
    #[error("room {0} already exists")]
    AlreadyExists(Pin),

    /// Conditional save found no record: the room expired (or was
    /// deleted) between the caller's read and write.
    #[error("room {0} is no longer in the store")]
    Missing(Pin),

    /// Conditional save lost the race: another writer bumped the version
    /// after the caller's read. Retry-safe — reload and reapply.
    #[error("room {pin} version moved: expected {expected}, found {found}")]
    VersionMismatch {
        pin: Pin,
        expected: u64,
        found: u64,
    },

    /// Serializing a room into its record form failed.
    #[error("failed to serialize room record: {0}")]
    Encode(#[source] serde_json::Error),

    /// A stored record failed to parse back into a room.
    #[error("failed to parse stored room record: {0}")]
    Decode(#[source] serde_json::Error),

    /// Pin allocation exhausted its retry budget.
    #[error("could not allocate an unused pin")]
    PinsExhausted,
}
