//! Error types for the session core.

use quizrally_protocol::{PlayerId, TeamId};

use crate::RoomStatus;

/// Errors produced by room operations.
///
/// Every variant is detected *before* any mutation: an operation that
/// returns one of these has left the room exactly as it found it.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The requested action is not valid for the room's current status.
    /// For example, joining a room whose game is already in progress.
    #[error("room is {status}, cannot {action}")]
    InvalidTransition {
        /// The action that was attempted.
        action: &'static str,
        /// The status the room was in.
        status: RoomStatus,
    },

    /// A question was requested but the quiz has none left (or none at
    /// all — an empty lobby can't start).
    #[error("no questions remaining")]
    NoQuestionsRemaining,

    /// The nickname is already taken by another player in this room.
    #[error("nickname '{0}' is already taken")]
    NicknameTaken(String),

    /// The player id already joined this room under a different nickname.
    /// A retry of the same join is idempotent; a *changed* join is not.
    #[error("player {0} already joined under a different nickname")]
    PlayerAlreadyJoined(PlayerId),

    /// The player already submitted an answer for the current question.
    #[error("player {0} already answered this question")]
    AlreadyAnswered(PlayerId),

    /// No player with this id is in the room.
    #[error("player {0} is not in this room")]
    PlayerNotFound(PlayerId),

    /// No team with this id exists in the room.
    #[error("team {0} not found")]
    TeamNotFound(TeamId),

    /// A team operation was requested but team mode is not active.
    #[error("team mode is not active")]
    TeamModeInactive,

    /// The team's one-per-game shield has already been spent.
    #[error("team {0} has already used its shield")]
    ShieldAlreadyUsed(TeamId),

    /// A field was missing, empty, or out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
