//! Unified error type for the service layer.

use quizrally_broadcast::GatewayError;
use quizrally_engine::EngineError;
use quizrally_protocol::Pin;
use quizrally_store::StoreError;

/// Top-level error returned by every [`QuizService`](crate::QuizService)
/// operation.
///
/// Wraps the layer-specific errors so request handlers deal with one
/// type; [`kind()`](Self::kind) collapses it to the stable taxonomy
/// clients key their behavior on.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No live room exists under this pin.
    #[error("room {0} not found")]
    RoomNotFound(Pin),

    /// A game-rule violation from the session core.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A broadcast transport failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A store or gateway call exceeded its deadline.
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// The optimistic write loop lost every attempt. Safe to retry; the
    /// room was never left half-updated.
    #[error("gave up updating room {0} after repeated write conflicts")]
    Contention(Pin),
}

/// The stable, machine-checkable classification of a [`ServiceError`].
///
/// Handlers map these to status codes; clients map them to behavior
/// (e.g. `Conflict` on join means "pick another nickname", `Unavailable`
/// means "retry").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Room, player, or team does not exist.
    NotFound,
    /// The action is not valid for the room's current status.
    InvalidTransition,
    /// Duplicate nickname, duplicate submission, or a reused shield.
    Conflict,
    /// Missing or malformed fields.
    InvalidInput,
    /// Store or broadcast trouble; safe to retry.
    Unavailable,
}

impl ServiceError {
    /// Classifies this error into the stable taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RoomNotFound(_) => ErrorKind::NotFound,

            Self::Engine(e) => match e {
                EngineError::InvalidTransition { .. }
                | EngineError::NoQuestionsRemaining
                | EngineError::TeamModeInactive => ErrorKind::InvalidTransition,
                EngineError::NicknameTaken(_)
                | EngineError::PlayerAlreadyJoined(_)
                | EngineError::AlreadyAnswered(_)
                | EngineError::ShieldAlreadyUsed(_) => ErrorKind::Conflict,
                EngineError::PlayerNotFound(_)
                | EngineError::TeamNotFound(_) => ErrorKind::NotFound,
                EngineError::InvalidInput(_) => ErrorKind::InvalidInput,
            },

            Self::Store(e) => match e {
                // The record vanished mid-update: to the caller that is
                // the room disappearing, not an infrastructure fault.
                StoreError::Missing(_) => ErrorKind::NotFound,
                StoreError::AlreadyExists(_) => ErrorKind::Conflict,
                StoreError::VersionMismatch { .. }
                | StoreError::Encode(_)
                | StoreError::Decode(_)
                | StoreError::PinsExhausted => ErrorKind::Unavailable,
            },

            Self::Gateway(_) | Self::Timeout(_) | Self::Contention(_) => {
                ErrorKind::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizrally_protocol::PlayerId;

    #[test]
    fn test_kind_room_not_found() {
        assert_eq!(
            ServiceError::RoomNotFound(Pin(1)).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_kind_conflicts() {
        let dup_nick: ServiceError =
            EngineError::NicknameTaken("Ali".into()).into();
        let dup_answer: ServiceError =
            EngineError::AlreadyAnswered(PlayerId::new("p1")).into();

        assert_eq!(dup_nick.kind(), ErrorKind::Conflict);
        assert_eq!(dup_answer.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_kind_invalid_transition_covers_team_mode_inactive() {
        let err: ServiceError = EngineError::TeamModeInactive.into();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    }

    #[test]
    fn test_kind_timeout_is_unavailable() {
        assert_eq!(
            ServiceError::Timeout("room load").kind(),
            ErrorKind::Unavailable
        );
    }

    #[test]
    fn test_kind_store_missing_is_not_found() {
        let err: ServiceError = StoreError::Missing(Pin(1)).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
