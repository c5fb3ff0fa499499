//! The room lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle phase of a room.
///
/// ```text
/// Lobby → Question → Leaderboard → (Question | Ended)
/// ```
///
/// plus a reset path from any status back to `Lobby`.
///
/// - **Lobby**: Room exists, accepting joins, questions replaceable.
/// - **Question**: A question is open; answers are accepted exactly once
///   per player.
/// - **Leaderboard**: The question closed; standings are on screen. The
///   presenter either opens the next question or finishes the game.
/// - **Ended**: The quiz ran out of questions and was finished. Only a
///   reset (or expiry) leaves this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Lobby,
    Question,
    Leaderboard,
    Ended,
}

impl RoomStatus {
    /// Returns `true` if the room is accepting new players.
    pub fn accepts_players(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if a question is currently open for answers.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, Self::Question)
    }

    /// Returns `true` if a (next) question may be opened from here.
    pub fn can_open_question(&self) -> bool {
        matches!(self, Self::Lobby | Self::Leaderboard)
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Question => write!(f, "question"),
            Self::Leaderboard => write!(f, "leaderboard"),
            Self::Ended => write!(f, "ended"),
        }
    }
}
