//! The authoritative quiz session core.
//!
//! Everything in this crate is pure, synchronous room logic: no I/O, no
//! clocks, no channels. Callers load a [`Room`] from the store, call one
//! mutating operation (passing `now_ms` where timing matters), persist the
//! result, and publish the returned event data. That separation is what
//! makes the whole engine unit-testable with fixed timestamps.
//!
//! # Key types
//!
//! - [`Room`] — one live session and every operation on it
//! - [`RoomStatus`] — the lifecycle state machine
//! - [`Question`], [`Player`], [`Team`] — the owned state
//! - [`scoring`] — pure point computation
//! - [`leaderboard`] — pure ranked top-N view
//!
//! # State machine
//!
//! ```text
//! Lobby → Question → Leaderboard → (Question | Ended)
//!   ↑________________________________________|   (reset_for_continue)
//! ```

pub mod leaderboard;
pub mod scoring;

mod error;
mod room;
mod status;
mod team;

pub use error::EngineError;
pub use room::{
    AnswerReceipt, Player, Question, QuestionEndReport, Room, RoomSnapshot,
};
pub use status::RoomStatus;
pub use team::{
    Team, TeamPreset, MAX_HEALTH, MAX_TEAMS, MIN_TEAMS, SHIELD_DURATION_MS,
    TEAM_PRESETS,
};
