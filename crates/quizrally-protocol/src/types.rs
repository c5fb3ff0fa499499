//! Identity newtypes and the public view types.
//!
//! Every type here is either an identifier or a projection of room state
//! that is safe to show to any participant. The engine owns the full
//! structures (with correct answers, round bookkeeping, etc.); these are
//! what it exposes.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The human-shareable room code: a 6-digit numeric pin.
///
/// Newtype over `u32` so a pin can't be confused with a score or an index.
/// `#[serde(transparent)]` serializes `Pin(42)` as just `42`.
///
/// The value is always below 1_000_000; `Display` zero-pads to six digits
/// so `Pin(7)` renders as `000007` — the form participants type in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(pub u32);

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// A participant's identifier. Opaque and caller-supplied — the engine
/// never parses it, only compares it. Doubles as the idempotency key for
/// join retries and as the duplicate-submission guard.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Convenience constructor from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team's slot index within its room. Teams are preset slots (2–6 per
/// game), so a small integer is all the identity needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Public views
// ---------------------------------------------------------------------------

/// A player as shown in lobby lists and join broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// The player's opaque identifier.
    pub id: PlayerId,
    /// Display name, unique within the room.
    pub nickname: String,
    /// Avatar marker chosen at join time, if any.
    pub avatar: Option<String>,
    /// Accumulated score.
    pub score: u32,
    /// Current consecutive-correct streak.
    pub streak: u32,
}

/// One row of the ranked top-N leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Display name of the ranked player.
    pub nickname: String,
    /// Accumulated score at ranking time.
    pub score: u32,
    /// 1-based rank; contiguous within one leaderboard.
    pub rank: u32,
}

/// A team as shown in `team-update` broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamView {
    /// The team's slot id.
    pub id: TeamId,
    /// Display name (preset or custom).
    pub name: String,
    /// Emoji marker from the preset catalog.
    pub emoji: String,
    /// Color marker from the preset catalog.
    pub color: String,
    /// Accumulated team score.
    pub score: u32,
    /// Remaining health, 0–100.
    pub health: u8,
    /// Consecutive fully-correct rounds.
    pub combo: u32,
    /// Unix-millis timestamp until which the shield is active. 0 = never
    /// activated.
    pub shield_active_until_ms: u64,
    /// Whether the one-per-game shield has been spent.
    pub shield_used: bool,
}

/// The current question as shown to participants.
///
/// Deliberately omits the correct option set — that is revealed only in
/// the `question-end` broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    /// The question's identifier.
    pub id: String,
    /// Question text.
    pub text: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Time limit for this question, in milliseconds.
    pub time_limit_ms: u64,
    /// Optional image reference.
    pub image: Option<String>,
    /// 0-based position of this question in the quiz.
    pub index: usize,
    /// Total number of questions in the quiz.
    pub total: usize,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The identity types have exact JSON representations that client
    //! SDKs rely on. These tests pin them down.

    use super::*;

    #[test]
    fn test_pin_serializes_as_plain_number() {
        // `#[serde(transparent)]` means Pin(123456) → `123456`.
        let json = serde_json::to_string(&Pin(123_456)).unwrap();
        assert_eq!(json, "123456");
    }

    #[test]
    fn test_pin_display_zero_pads_to_six_digits() {
        assert_eq!(Pin(7).to_string(), "000007");
        assert_eq!(Pin(123_456).to_string(), "123456");
    }

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::new("abc-123")).unwrap();
        assert_eq!(json, "\"abc-123\"");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_string() {
        let pid: PlayerId = serde_json::from_str("\"p-9\"").unwrap();
        assert_eq!(pid, PlayerId::new("p-9"));
    }

    #[test]
    fn test_team_id_display() {
        assert_eq!(TeamId(2).to_string(), "T-2");
    }

    #[test]
    fn test_player_view_round_trip() {
        let view = PlayerView {
            id: PlayerId::new("p1"),
            nickname: "Ali".into(),
            avatar: Some("🦊".into()),
            score: 840,
            streak: 1,
        };
        let bytes = serde_json::to_vec(&view).unwrap();
        let decoded: PlayerView = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(view, decoded);
    }

    #[test]
    fn test_question_view_has_no_correct_options_field() {
        // The public question view must never leak the answer key.
        let view = QuestionView {
            id: "q1".into(),
            text: "2 + 2?".into(),
            options: vec!["3".into(), "4".into()],
            time_limit_ms: 10_000,
            image: None,
            index: 0,
            total: 1,
        };
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();
        assert!(json.get("correct_options").is_none());
    }
}
