//! `QuizService`: the request surface over store, engine, and gateway.
//!
//! Every operation follows the same protocol:
//!
//! 1. **Load** the room from the store (bounded by a timeout).
//! 2. **Validate + mutate** via the engine — pure, so a rejection costs
//!    nothing and writes nothing.
//! 3. **Save** with the version stamp read in step 1. A
//!    `VersionMismatch` means another request won the race; reload and
//!    reapply, bounded by `max_write_attempts`.
//! 4. **Publish** the resulting event, best-effort, after the save is
//!    durable. A lost event is recoverable: clients re-poll
//!    [`get_state`](QuizService::get_state).
//!
//! There is no per-room lock anywhere. Correctness under concurrent
//! requests comes entirely from step 3's compare-and-swap.

use std::future::Future;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use quizrally_broadcast::{ChannelId, Gateway};
use quizrally_engine::{
    AnswerReceipt, EngineError, Question, QuestionEndReport, Room,
    RoomSnapshot,
};
use quizrally_protocol::{
    Pin, PlayerId, QuestionView, RoomEvent, ShieldActivated, TeamId, TeamView,
};
use quizrally_store::{RoomStore, StoreError, VersionedRoom};

use crate::{ServiceConfig, ServiceError};

/// How many times room creation rolls a fresh pin when the insert loses
/// an allocation race.
const CREATE_ATTEMPTS: u32 = 4;

/// What a presenter gets back for a freshly created room.
#[derive(Debug, Clone)]
pub struct CreatedRoom {
    /// The code participants join with.
    pub pin: Pin,
    /// The pub/sub channel all of this room's events are published on.
    pub channel: ChannelId,
}

/// The session service. Cheap to share: hold it in an `Arc` and clone
/// across request handlers.
pub struct QuizService<S, G> {
    store: Arc<S>,
    gateway: Arc<G>,
    config: ServiceConfig,
}

impl<S, G> QuizService<S, G>
where
    S: RoomStore,
    G: Gateway,
{
    /// Creates a service with default timeouts and retry bounds.
    pub fn new(store: Arc<S>, gateway: Arc<G>) -> Self {
        Self::with_config(store, gateway, ServiceConfig::default())
    }

    /// Creates a service with explicit configuration.
    pub fn with_config(
        store: Arc<S>,
        gateway: Arc<G>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            gateway,
            config,
        }
    }

    // -- Request surface ---------------------------------------------------

    /// Creates a fresh room in the lobby and returns its pin and channel.
    ///
    /// The pin is allocated against live rooms and the insert is
    /// conditional, so even two creations racing onto the same random pin
    /// cannot share a room — the loser rolls a new pin.
    pub async fn create_room(
        &self,
        title: String,
        questions: Vec<Question>,
    ) -> Result<CreatedRoom, ServiceError> {
        for _ in 0..CREATE_ATTEMPTS {
            let pin = self
                .bounded("pin allocation", self.store.allocate_pin())
                .await?;
            let room = Room::create(pin, title.clone(), questions.clone())?;

            match tokio::time::timeout(
                self.config.store_timeout,
                self.store.save(&room, None),
            )
            .await
            {
                Ok(Ok(_)) => {
                    let channel = ChannelId::for_room(pin);
                    tracing::info!(%pin, %channel, "room created");
                    return Ok(CreatedRoom { pin, channel });
                }
                Ok(Err(StoreError::AlreadyExists(_))) => {
                    tracing::debug!(%pin, "lost pin race on create, rolling again");
                    continue;
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(ServiceError::Timeout("room save")),
            }
        }
        Err(StoreError::PinsExhausted.into())
    }

    /// Replaces the room's questions (and optionally its title). Lobby
    /// only.
    pub async fn add_questions(
        &self,
        pin: Pin,
        title: Option<String>,
        questions: Vec<Question>,
    ) -> Result<(), ServiceError> {
        self.update(pin, |room, _| {
            room.add_questions(title.clone(), questions.clone())
        })
        .await
    }

    /// Adds a player to the lobby and broadcasts the updated roster.
    pub async fn join(
        &self,
        pin: Pin,
        player_id: PlayerId,
        nickname: String,
        avatar: Option<String>,
    ) -> Result<(), ServiceError> {
        let players = self
            .update(pin, |room, _| {
                room.join(player_id.clone(), nickname.clone(), avatar.clone())
            })
            .await?;
        self.notify(pin, RoomEvent::PlayerJoined { players }).await;
        Ok(())
    }

    /// Records which team a player is on. Lobby only.
    pub async fn join_team(
        &self,
        pin: Pin,
        player_id: PlayerId,
        team_id: TeamId,
    ) -> Result<(), ServiceError> {
        self.update(pin, |room, _| room.join_team(&player_id, team_id))
            .await
    }

    /// The poll-for-truth snapshot: status, roster, open question (answer
    /// key withheld), and team standings.
    pub async fn get_state(&self, pin: Pin) -> Result<RoomSnapshot, ServiceError> {
        let versioned = self.load(pin).await?;
        Ok(versioned.room.snapshot())
    }

    /// Opens the next question and broadcasts it.
    pub async fn start_question(
        &self,
        pin: Pin,
    ) -> Result<QuestionView, ServiceError> {
        let question = self
            .update(pin, |room, now_ms| room.start_question(now_ms))
            .await?;
        self.notify(
            pin,
            RoomEvent::QuestionStart {
                question: question.clone(),
            },
        )
        .await;
        Ok(question)
    }

    /// Accepts one answer for the open question. No broadcast — the
    /// reveal waits for [`end_question`](Self::end_question).
    pub async fn submit_answer(
        &self,
        pin: Pin,
        player_id: PlayerId,
        chosen: Vec<usize>,
    ) -> Result<AnswerReceipt, ServiceError> {
        self.update(pin, |room, now_ms| {
            room.submit_answer(&player_id, &chosen, now_ms)
        })
        .await
    }

    /// Closes the open question and broadcasts the reveal: correct
    /// options, leaderboard, last-question flag, and (team mode) the
    /// post-round team standings.
    ///
    /// Invoking this again after the question already ended re-broadcasts
    /// the same reveal without re-mutating — the timer-vs-presenter race
    /// resolves itself.
    pub async fn end_question(
        &self,
        pin: Pin,
    ) -> Result<QuestionEndReport, ServiceError> {
        let report = self
            .update(pin, |room, now_ms| room.end_question(now_ms))
            .await?;

        self.notify(
            pin,
            RoomEvent::QuestionEnd {
                correct_options: report.correct_options.clone(),
                leaderboard: report.leaderboard.clone(),
                is_last_question: report.is_last_question,
            },
        )
        .await;

        // Round resolution happens exactly once per question, so the
        // team-update rides only on the real transition.
        if let Some(teams) = report.teams.clone() {
            self.notify(
                pin,
                RoomEvent::TeamUpdate {
                    teams,
                    damage: report.damage.clone(),
                    shield_activated: None,
                },
            )
            .await;
        }

        Ok(report)
    }

    /// Ends the game after the final leaderboard.
    pub async fn finish(&self, pin: Pin) -> Result<(), ServiceError> {
        self.update(pin, |room, _| room.finish()).await
    }

    /// Resets the room for another game with the same crowd and sends
    /// everyone back to the lobby.
    pub async fn reset_for_continue(&self, pin: Pin) -> Result<(), ServiceError> {
        self.update(pin, |room, _| {
            room.reset_for_continue();
            Ok(())
        })
        .await?;
        self.notify(pin, RoomEvent::ReturnToLobby).await;
        Ok(())
    }

    /// Deletes a room outright. Returns `false` if no live room existed.
    pub async fn delete_room(&self, pin: Pin) -> Result<bool, ServiceError> {
        let deleted = self
            .bounded("room delete", self.store.delete(pin))
            .await?;
        Ok(deleted)
    }

    /// Creates the team slots for a team battle and broadcasts them.
    pub async fn setup_teams(
        &self,
        pin: Pin,
        team_count: usize,
        custom_names: Vec<String>,
    ) -> Result<Vec<TeamView>, ServiceError> {
        let teams = self
            .update(pin, |room, _| {
                room.setup_teams(team_count, &custom_names)
            })
            .await?;
        self.notify(
            pin,
            RoomEvent::TeamUpdate {
                teams: teams.clone(),
                damage: Vec::new(),
                shield_activated: None,
            },
        )
        .await;
        Ok(teams)
    }

    /// Activates a team's one-per-game shield and broadcasts the
    /// `team-update` carrying the immunity window.
    pub async fn activate_shield(
        &self,
        pin: Pin,
        team_id: TeamId,
    ) -> Result<ShieldActivated, ServiceError> {
        let (teams, activated) = self
            .update(pin, |room, now_ms| room.activate_shield(team_id, now_ms))
            .await?;
        self.notify(
            pin,
            RoomEvent::TeamUpdate {
                teams,
                damage: Vec::new(),
                shield_activated: Some(activated),
            },
        )
        .await;
        Ok(activated)
    }

    // -- Internals ---------------------------------------------------------

    /// One bounded store read, with absence promoted to `RoomNotFound`.
    async fn load(&self, pin: Pin) -> Result<VersionedRoom, ServiceError> {
        self.bounded("room load", self.store.get(pin))
            .await?
            .ok_or(ServiceError::RoomNotFound(pin))
    }

    /// The optimistic read-modify-write loop.
    ///
    /// `apply` must be pure on failure (engine operations are): when it
    /// rejects, nothing is saved and the error propagates unchanged. When
    /// the conditional save loses the version race, the whole
    /// load-apply-save sequence re-runs against fresh state.
    async fn update<T>(
        &self,
        pin: Pin,
        apply: impl Fn(&mut Room, u64) -> Result<T, EngineError>,
    ) -> Result<T, ServiceError> {
        for attempt in 0..self.config.max_write_attempts {
            let VersionedRoom { mut room, version } = self.load(pin).await?;
            let outcome = apply(&mut room, now_ms())?;

            match tokio::time::timeout(
                self.config.store_timeout,
                self.store.save(&room, Some(version)),
            )
            .await
            {
                Ok(Ok(_)) => return Ok(outcome),
                Ok(Err(StoreError::VersionMismatch { .. })) => {
                    tracing::debug!(%pin, attempt, "write conflict, retrying");
                    continue;
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(ServiceError::Timeout("room save")),
            }
        }
        tracing::warn!(%pin, "write attempts exhausted");
        Err(ServiceError::Contention(pin))
    }

    /// Publishes an event on the room's channel, best-effort.
    ///
    /// The room is already saved when this runs; a failed or timed-out
    /// publish is logged and dropped, and clients catch up from the
    /// snapshot. This is the one place an error is deliberately not
    /// propagated.
    async fn notify(&self, pin: Pin, event: RoomEvent) {
        let channel = ChannelId::for_room(pin);
        match tokio::time::timeout(
            self.config.publish_timeout,
            self.gateway.publish(&channel, event),
        )
        .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::warn!(%pin, error = %e, "event publish failed; clients must re-poll");
            }
            Err(_) => {
                tracing::warn!(%pin, "event publish timed out; clients must re-poll");
            }
        }
    }

    /// Wraps a store call in the configured deadline.
    async fn bounded<T, E>(
        &self,
        what: &'static str,
        fut: impl Future<Output = Result<T, E>>,
    ) -> Result<T, ServiceError>
    where
        ServiceError: From<E>,
    {
        match tokio::time::timeout(self.config.store_timeout, fut).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::Timeout(what)),
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch.
///
/// The engine never reads clocks itself; this is the single place "now"
/// enters the system.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
