//! Broadcast events published on a room's channel.
//!
//! Every state change a client needs to render live arrives as one of
//! these. The JSON shape is part of the contract: internally tagged with
//! `"type"`, variant names in kebab-case, so a `player-joined` event looks
//! like:
//!
//! ```json
//! { "type": "player-joined", "players": [ ... ] }
//! ```
//!
//! Events are *notifications*, not the source of truth. The mutation is
//! durably saved before the event is published, and a client that misses
//! an event (reconnect, lagging subscriber) reconciles by polling the
//! room snapshot.

use serde::{Deserialize, Serialize};

use crate::types::{LeaderboardEntry, PlayerView, QuestionView, TeamId, TeamView};

/// Marker payload inside a `team-update` telling clients to render a
/// temporary-immunity indicator for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldActivated {
    /// The team whose shield just went up.
    pub team_id: TeamId,
    /// Unix-millis timestamp when the immunity window closes.
    pub until_ms: u64,
}

/// Health loss applied to one team during round resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDamage {
    /// The team that was hit.
    pub team_id: TeamId,
    /// Health points that would be deducted.
    pub amount: u8,
    /// `true` when an active shield absorbed the hit (health unchanged).
    pub blocked: bool,
}

/// A state-change event on a room's broadcast channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RoomEvent {
    /// Someone joined the lobby. Carries the full public player list so
    /// clients can re-render the roster without diffing.
    PlayerJoined {
        /// Players in join order.
        players: Vec<PlayerView>,
    },

    /// A question went live. Carries the public view (no answer key).
    QuestionStart {
        /// The question now open for answers.
        question: QuestionView,
    },

    /// A question closed. Reveals the answer key and the standings.
    ///
    /// This event may be re-broadcast: ending an already-ended question
    /// recomputes and resends the same snapshot (timer expiry racing a
    /// manual end, or a reconnecting presenter).
    QuestionEnd {
        /// Indices of the correct options for the question that closed.
        correct_options: Vec<usize>,
        /// Ranked top players after this question.
        leaderboard: Vec<LeaderboardEntry>,
        /// `true` when the closed question was the quiz's last.
        is_last_question: bool,
    },

    /// The room was reset for another round; everyone back to the lobby.
    ReturnToLobby,

    /// Team standings changed: setup, round resolution, or a shield.
    TeamUpdate {
        /// All teams, in slot order.
        teams: Vec<TeamView>,
        /// Health loss applied this round; empty outside round resolution.
        #[serde(default)]
        damage: Vec<TeamDamage>,
        /// Present when this update announces a shield activation.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shield_activated: Option<ShieldActivated>,
    },
}

// =========================================================================
// Tests
// =========================================================================
