//! # Quizrally
//!
//! A live multiplayer quiz engine. A presenter drives a shared session;
//! participants join with a 6-digit pin and answer in real time; scores,
//! leaderboards, and team standings fan out over a per-room broadcast
//! channel.
//!
//! This crate is the service layer tying the pieces together:
//!
//! ```text
//! request → QuizService → load (store) → validate + mutate (engine)
//!                       → CAS save (store) → publish (gateway)
//! ```
//!
//! Each request is independent and may race others on the same room; the
//! optimistic-concurrency loop in [`QuizService`] makes lost updates
//! impossible without any cross-request locking.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quizrally::{LocalGateway, MemoryStore, QuizService};
//!
//! # async fn run() -> Result<(), quizrally::ServiceError> {
//! let service = QuizService::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(LocalGateway::new()),
//! );
//! let created = service.create_room("Capitals".into(), vec![]).await?;
//! println!("join with pin {}", created.pin);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod service;

pub use config::ServiceConfig;
pub use error::{ErrorKind, ServiceError};
pub use service::{CreatedRoom, QuizService};

// Re-export the pieces callers wire together or match on, so a request
// handler only needs this one crate.
pub use quizrally_broadcast::{ChannelId, Gateway, GatewayError, LocalGateway};
pub use quizrally_engine::{
    AnswerReceipt, EngineError, Player, Question, QuestionEndReport, Room,
    RoomSnapshot, RoomStatus, Team,
};
pub use quizrally_protocol::{
    LeaderboardEntry, Pin, PlayerId, PlayerView, QuestionView, RoomEvent,
    ShieldActivated, TeamDamage, TeamId, TeamView,
};
pub use quizrally_store::{MemoryStore, RoomStore, StoreError, VersionedRoom};
