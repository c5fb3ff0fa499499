//! Shared protocol types for Quizrally.
//!
//! This crate defines everything that crosses a boundary between the game
//! session core and the outside world:
//!
//! - **Identity types** ([`Pin`], [`PlayerId`], [`TeamId`]) — who and what
//!   a request is about.
//! - **Public views** ([`PlayerView`], [`LeaderboardEntry`], [`TeamView`],
//!   [`QuestionView`]) — the shapes clients are allowed to see. A
//!   `QuestionView` never carries the correct options.
//! - **Broadcast events** ([`RoomEvent`]) — the messages published on a
//!   room's channel, with fixed JSON shapes client SDKs depend on.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else and knows nothing about
//! rooms, stores, or channels. It only defines data shapes.
//!
//! ```text
//! Engine (room state) → Protocol (views, events) → Broadcast (delivery)
//! ```

mod events;
mod types;

pub use events::{RoomEvent, ShieldActivated, TeamDamage};
pub use types::{
    LeaderboardEntry, Pin, PlayerId, PlayerView, QuestionView, TeamId,
    TeamView,
};
