//! The room: one live quiz session and every operation on it.
//!
//! A `Room` is plain data plus guarded mutations. Every operation
//! validates against the current [`RoomStatus`] (and its other
//! preconditions) *before* touching state, so a rejected action leaves
//! the room byte-for-byte unchanged — the service layer relies on that to
//! skip the write entirely.
//!
//! Time never comes from a clock in here: operations that need "now"
//! take a `now_ms` argument. The service passes wall-clock time; tests
//! pass whatever instant makes the scenario deterministic.

use std::collections::{BTreeSet, HashSet};

use quizrally_protocol::{
    Pin, PlayerId, PlayerView, QuestionView, ShieldActivated, TeamDamage,
    TeamId, TeamView,
};
use serde::{Deserialize, Serialize};

use crate::leaderboard;
use crate::scoring;
use crate::team::{self, Team, MAX_TEAMS, MIN_TEAMS, SHIELD_DURATION_MS};
use crate::{EngineError, RoomStatus};

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// One quiz item. Immutable once a session leaves the lobby (the list can
/// only be replaced while the room is in `Lobby`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Indices into `options` that count as correct. More than one entry
    /// makes this a multi-correct question.
    pub correct_options: BTreeSet<usize>,
    /// Time limit in milliseconds. Must be positive.
    pub time_limit_ms: u64,
    /// Optional image reference.
    pub image: Option<String>,
}

impl Question {
    /// Checks the question is playable. Called whenever a question list
    /// is attached to a room.
    fn validate(&self) -> Result<(), EngineError> {
        if self.options.len() < 2 {
            return Err(EngineError::InvalidInput(format!(
                "question '{}' needs at least 2 options",
                self.id
            )));
        }
        if self.correct_options.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "question '{}' has no correct option",
                self.id
            )));
        }
        if let Some(&bad) = self
            .correct_options
            .iter()
            .find(|&&i| i >= self.options.len())
        {
            return Err(EngineError::InvalidInput(format!(
                "question '{}' marks option {} correct but has only {} options",
                self.id,
                bad,
                self.options.len()
            )));
        }
        if self.time_limit_ms == 0 {
            return Err(EngineError::InvalidInput(format!(
                "question '{}' has a zero time limit",
                self.id
            )));
        }
        Ok(())
    }

    /// The public projection: everything but the answer key.
    fn view(&self, index: usize, total: usize) -> QuestionView {
        QuestionView {
            id: self.id.clone(),
            text: self.text.clone(),
            options: self.options.clone(),
            time_limit_ms: self.time_limit_ms,
            image: self.image.clone(),
            index,
            total,
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A participant. Owned exclusively by its room; the `Vec<Player>` order
/// is join order and doubles as the leaderboard tie-break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub avatar: Option<String>,
    /// The team this player picked (team mode only).
    pub team: Option<TeamId>,
    pub score: u32,
    /// Current consecutive-correct streak.
    pub streak: u32,
    /// Longest streak ever reached. Lifetime stat: survives resets.
    pub longest_streak: u32,
    pub correct_count: u32,
    pub total_answers: u32,
    /// Sum of response times across all answered questions.
    pub total_response_ms: u64,
    /// Fastest single response. `None` until the first answer lands.
    pub fastest_answer_ms: Option<u64>,
    pub hints_used: u32,
}

impl Player {
    /// A fresh player with all counters zeroed and the fastest-response
    /// marker unset.
    pub fn new(
        id: PlayerId,
        nickname: String,
        avatar: Option<String>,
    ) -> Self {
        Self {
            id,
            nickname,
            avatar,
            team: None,
            score: 0,
            streak: 0,
            longest_streak: 0,
            correct_count: 0,
            total_answers: 0,
            total_response_ms: 0,
            fastest_answer_ms: None,
            hints_used: 0,
        }
    }

    /// Folds one answer into the player's counters.
    fn record_answer(&mut self, correct: bool, points: u32, elapsed_ms: u64) {
        self.total_answers += 1;
        self.total_response_ms += elapsed_ms;
        self.fastest_answer_ms = Some(
            self.fastest_answer_ms
                .map_or(elapsed_ms, |fastest| fastest.min(elapsed_ms)),
        );
        if correct {
            self.score += points;
            self.streak += 1;
            self.longest_streak = self.longest_streak.max(self.streak);
            self.correct_count += 1;
        } else {
            self.streak = 0;
        }
    }

    /// Zeroes the per-game counters for another round. The longest
    /// streak is a lifetime stat and survives; the fastest-response
    /// marker goes back to unset, matching a fresh join.
    fn reset_stats(&mut self) {
        self.score = 0;
        self.streak = 0;
        self.correct_count = 0;
        self.total_answers = 0;
        self.total_response_ms = 0;
        self.fastest_answer_ms = None;
        self.hints_used = 0;
    }

    /// The public projection used in rosters and join broadcasts.
    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id.clone(),
            nickname: self.nickname.clone(),
            avatar: self.avatar.clone(),
            score: self.score,
            streak: self.streak,
        }
    }
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// What a player gets back for one accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerReceipt {
    pub correct: bool,
    pub points: u32,
    pub elapsed_ms: u64,
}

/// Everything `end_question` reveals.
///
/// Produced on the real `Question → Leaderboard` transition *and* on
/// idempotent re-invocations; `transitioned` tells the two apart. The
/// team fields are populated only on the real transition of a team-mode
/// room (round resolution runs exactly once per question).
#[derive(Debug, Clone)]
pub struct QuestionEndReport {
    /// Indices of the correct options, ascending.
    pub correct_options: Vec<usize>,
    /// Ranked top players.
    pub leaderboard: Vec<quizrally_protocol::LeaderboardEntry>,
    /// `true` when the question that closed was the quiz's last.
    pub is_last_question: bool,
    /// `false` on the idempotent re-broadcast path.
    pub transitioned: bool,
    /// Team standings after round resolution (team mode, first call only).
    pub teams: Option<Vec<TeamView>>,
    /// Health loss applied during round resolution.
    pub damage: Vec<TeamDamage>,
}

/// The poll-for-truth projection of a room returned by `get_state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub pin: Pin,
    pub title: String,
    pub status: RoomStatus,
    /// Players in join order.
    pub players: Vec<PlayerView>,
    /// The open question, present only while `status == question`.
    pub question: Option<QuestionView>,
    pub team_mode: bool,
    pub teams: Vec<TeamView>,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// One live quiz session, keyed by its pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub pin: Pin,
    pub title: String,
    pub questions: Vec<Question>,
    /// Players in join order.
    pub players: Vec<Player>,
    /// Index of the open/last-opened question. `None` before the first
    /// question starts.
    pub current_question: Option<usize>,
    pub status: RoomStatus,
    /// Unix-millis timestamp when the current question opened.
    pub question_started_at_ms: u64,
    /// Players who already answered the current question.
    pub answered: HashSet<PlayerId>,
    pub team_mode: bool,
    pub teams: Vec<Team>,
}

impl Room {
    /// Creates a fresh room in the lobby. The question list may be empty
    /// (it can be replaced any time before the game starts).
    pub fn create(
        pin: Pin,
        title: String,
        questions: Vec<Question>,
    ) -> Result<Self, EngineError> {
        for q in &questions {
            q.validate()?;
        }
        tracing::info!(%pin, questions = questions.len(), "room created");
        Ok(Self {
            pin,
            title,
            questions,
            players: Vec::new(),
            current_question: None,
            status: RoomStatus::Lobby,
            question_started_at_ms: 0,
            answered: HashSet::new(),
            team_mode: false,
            teams: Vec::new(),
        })
    }

    /// Replaces the question list (and optionally the title). Lobby only:
    /// a running game keeps the questions it started with.
    pub fn add_questions(
        &mut self,
        title: Option<String>,
        questions: Vec<Question>,
    ) -> Result<(), EngineError> {
        if !self.status.accepts_players() {
            return Err(EngineError::InvalidTransition {
                action: "replace questions while the game is in progress",
                status: self.status,
            });
        }
        for q in &questions {
            q.validate()?;
        }
        if let Some(title) = title {
            self.title = title;
        }
        self.questions = questions;
        Ok(())
    }

    /// Adds a player to the lobby.
    ///
    /// The nickname must be free. A replay of an identical join (same id,
    /// same nickname) is accepted without appending — the caller-supplied
    /// id makes join retries idempotent.
    ///
    /// Returns the full public player list for the `player-joined`
    /// broadcast.
    pub fn join(
        &mut self,
        id: PlayerId,
        nickname: String,
        avatar: Option<String>,
    ) -> Result<Vec<PlayerView>, EngineError> {
        if !self.status.accepts_players() {
            return Err(EngineError::InvalidTransition {
                action: "join",
                status: self.status,
            });
        }
        let nickname = nickname.trim().to_string();
        if nickname.is_empty() {
            return Err(EngineError::InvalidInput(
                "nickname must not be empty".into(),
            ));
        }
        if let Some(existing) = self.players.iter().find(|p| p.id == id) {
            if existing.nickname == nickname {
                // Retry of the same join: already in, nothing to do.
                return Ok(self.player_views());
            }
            return Err(EngineError::PlayerAlreadyJoined(id));
        }
        if self.players.iter().any(|p| p.nickname == nickname) {
            return Err(EngineError::NicknameTaken(nickname));
        }

        tracing::info!(pin = %self.pin, player = %id, %nickname, "player joined");
        self.players.push(Player::new(id, nickname, avatar));
        Ok(self.player_views())
    }

    /// Records which team a player is on. Lobby only, team mode required.
    pub fn join_team(
        &mut self,
        player_id: &PlayerId,
        team_id: TeamId,
    ) -> Result<(), EngineError> {
        if !self.status.accepts_players() {
            return Err(EngineError::InvalidTransition {
                action: "pick a team",
                status: self.status,
            });
        }
        if !self.team_mode {
            return Err(EngineError::TeamModeInactive);
        }
        if !self.teams.iter().any(|t| t.id == team_id) {
            return Err(EngineError::TeamNotFound(team_id));
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == player_id)
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.clone()))?;
        player.team = Some(team_id);
        Ok(())
    }

    /// Opens the next question: `Lobby|Leaderboard → Question`.
    ///
    /// Advances the question index, stamps the start time, and forgets
    /// the previous round's answers. Returns the public question view for
    /// the `question-start` broadcast.
    pub fn start_question(
        &mut self,
        now_ms: u64,
    ) -> Result<QuestionView, EngineError> {
        if !self.status.can_open_question() {
            return Err(EngineError::InvalidTransition {
                action: "start a question",
                status: self.status,
            });
        }
        let next = self.current_question.map_or(0, |i| i + 1);
        if next >= self.questions.len() {
            return Err(EngineError::NoQuestionsRemaining);
        }

        self.status = RoomStatus::Question;
        self.current_question = Some(next);
        self.question_started_at_ms = now_ms;
        self.answered.clear();
        for team in &mut self.teams {
            team.clear_round();
        }

        tracing::info!(
            pin = %self.pin,
            question = next,
            of = self.questions.len(),
            "question opened"
        );
        Ok(self.questions[next].view(next, self.questions.len()))
    }

    /// Accepts one answer from one player for the open question.
    ///
    /// Exactly once per player per question: a second submission is a
    /// conflict and the score keeps reflecting only the first. The chosen
    /// set is correct when it equals the question's correct set.
    pub fn submit_answer(
        &mut self,
        player_id: &PlayerId,
        chosen: &[usize],
        now_ms: u64,
    ) -> Result<AnswerReceipt, EngineError> {
        if !self.status.accepts_answers() {
            return Err(EngineError::InvalidTransition {
                action: "submit an answer",
                status: self.status,
            });
        }
        let index = self.current_question.ok_or({
            // Unreachable while the status invariant holds; reject rather
            // than panic if a corrupt record ever gets this far.
            EngineError::InvalidTransition {
                action: "submit an answer",
                status: self.status,
            }
        })?;
        let question = &self.questions[index];

        if self.answered.contains(player_id) {
            return Err(EngineError::AlreadyAnswered(player_id.clone()));
        }
        if !self.players.iter().any(|p| &p.id == player_id) {
            return Err(EngineError::PlayerNotFound(player_id.clone()));
        }
        if chosen.is_empty() {
            return Err(EngineError::InvalidInput(
                "an answer must choose at least one option".into(),
            ));
        }
        let chosen_set: BTreeSet<usize> = chosen.iter().copied().collect();
        if let Some(&bad) =
            chosen_set.iter().find(|&&i| i >= question.options.len())
        {
            return Err(EngineError::InvalidInput(format!(
                "option {bad} is out of range"
            )));
        }

        // All guards passed; from here on we mutate.
        let correct = chosen_set == question.correct_options;
        let elapsed_ms = now_ms.saturating_sub(self.question_started_at_ms);
        let remaining_ms =
            question.time_limit_ms as i64 - elapsed_ms as i64;
        let points = scoring::score(correct, remaining_ms, question.time_limit_ms);

        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == player_id)
            .expect("player existence checked above");
        player.record_answer(correct, points, elapsed_ms);
        let team_id = player.team;

        self.answered.insert(player_id.clone());

        if self.team_mode {
            if let Some(team) = team_id
                .and_then(|id| self.teams.iter_mut().find(|t| t.id == id))
            {
                team.round_answered.insert(player_id.clone());
                if correct {
                    team.round_correct.insert(player_id.clone());
                    team.score += points;
                }
            }
        }

        tracing::debug!(
            pin = %self.pin,
            player = %player_id,
            correct,
            points,
            elapsed_ms,
            "answer recorded"
        );
        Ok(AnswerReceipt { correct, points, elapsed_ms })
    }

    /// Closes the open question: `Question → Leaderboard`.
    ///
    /// Idempotent by design: a second invocation (timer expiry racing a
    /// manual end, or a reconnecting presenter) does not re-mutate state
    /// but still recomputes the same reveal so the caller can re-broadcast
    /// it. Team round resolution runs only on the real transition.
    pub fn end_question(
        &mut self,
        now_ms: u64,
    ) -> Result<QuestionEndReport, EngineError> {
        let index = self.current_question.ok_or(
            EngineError::InvalidTransition {
                action: "end a question before one was started",
                status: self.status,
            },
        )?;

        let transitioned = self.status.accepts_answers();
        let mut teams = None;
        let mut damage = Vec::new();

        if transitioned {
            self.status = RoomStatus::Leaderboard;
            if self.team_mode {
                damage = team::resolve_round(&mut self.teams, now_ms);
                teams = Some(self.team_views());
            }
            tracing::info!(pin = %self.pin, question = index, "question closed");
        } else {
            tracing::debug!(
                pin = %self.pin,
                question = index,
                "end-question replay, re-broadcasting reveal"
            );
        }

        let question = &self.questions[index];
        Ok(QuestionEndReport {
            correct_options: question.correct_options.iter().copied().collect(),
            leaderboard: leaderboard::top_standings(&self.players),
            is_last_question: index + 1 == self.questions.len(),
            transitioned,
            teams,
            damage,
        })
    }

    /// Ends the game: `Leaderboard → Ended`.
    pub fn finish(&mut self) -> Result<(), EngineError> {
        if self.status != RoomStatus::Leaderboard {
            return Err(EngineError::InvalidTransition {
                action: "finish the game",
                status: self.status,
            });
        }
        self.status = RoomStatus::Ended;
        tracing::info!(pin = %self.pin, "game finished");
        Ok(())
    }

    /// Resets the room for another game with the same crowd: back to the
    /// lobby, questions cleared, every per-game counter zeroed. Valid
    /// from any status. Teams keep their names and members but lose all
    /// progress (full health, shield restored to unused).
    pub fn reset_for_continue(&mut self) {
        self.status = RoomStatus::Lobby;
        self.questions.clear();
        self.current_question = None;
        self.question_started_at_ms = 0;
        self.answered.clear();
        for player in &mut self.players {
            player.reset_stats();
        }
        for team in &mut self.teams {
            team.reset();
        }
        tracing::info!(pin = %self.pin, "room reset to lobby");
    }

    /// Creates the team slots for a team battle. Lobby only.
    ///
    /// The requested count is clamped to [[`MIN_TEAMS`], [`MAX_TEAMS`]];
    /// slots come from the preset catalog in order, with caller-supplied
    /// custom names overriding individual slots. Re-running setup
    /// replaces the previous teams, so any earlier team picks are
    /// forgotten.
    pub fn setup_teams(
        &mut self,
        requested: usize,
        custom_names: &[String],
    ) -> Result<Vec<TeamView>, EngineError> {
        if !self.status.accepts_players() {
            return Err(EngineError::InvalidTransition {
                action: "set up teams",
                status: self.status,
            });
        }
        let count = requested.clamp(MIN_TEAMS, MAX_TEAMS);

        self.teams = (0..count)
            .map(|slot| {
                Team::from_slot(slot, custom_names.get(slot).map(String::as_str))
            })
            .collect();
        self.team_mode = true;
        for player in &mut self.players {
            player.team = None;
        }

        tracing::info!(pin = %self.pin, teams = count, "team battle set up");
        Ok(self.team_views())
    }

    /// Activates a team's one-per-game shield: 10 seconds of immunity to
    /// health loss, starting now.
    ///
    /// A second activation fails and leaves the original window exactly
    /// as it was. Returns the team list plus the `shield-activated`
    /// payload for the `team-update` broadcast.
    pub fn activate_shield(
        &mut self,
        team_id: TeamId,
        now_ms: u64,
    ) -> Result<(Vec<TeamView>, ShieldActivated), EngineError> {
        if !self.team_mode {
            return Err(EngineError::TeamModeInactive);
        }
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or(EngineError::TeamNotFound(team_id))?;
        if team.shield_used {
            return Err(EngineError::ShieldAlreadyUsed(team_id));
        }

        let until_ms = now_ms + SHIELD_DURATION_MS;
        team.shield_active_until_ms = until_ms;
        team.shield_used = true;

        tracing::info!(pin = %self.pin, team = %team_id, until_ms, "shield activated");
        Ok((self.team_views(), ShieldActivated { team_id, until_ms }))
    }

    // -- Projections -------------------------------------------------------

    /// The public player list, in join order.
    pub fn player_views(&self) -> Vec<PlayerView> {
        self.players.iter().map(Player::view).collect()
    }

    /// The public team list, in slot order.
    pub fn team_views(&self) -> Vec<TeamView> {
        self.teams.iter().map(Team::view).collect()
    }

    /// The poll-for-truth snapshot: status, roster, and the open question
    /// with the answer key withheld.
    pub fn snapshot(&self) -> RoomSnapshot {
        let question = match (self.status, self.current_question) {
            (RoomStatus::Question, Some(i)) => {
                Some(self.questions[i].view(i, self.questions.len()))
            }
            _ => None,
        };
        RoomSnapshot {
            pin: self.pin,
            title: self.title.clone(),
            status: self.status,
            players: self.player_views(),
            question,
            team_mode: self.team_mode,
            teams: self.team_views(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for the guards: each operation rejects cleanly (and
    //! mutates nothing) outside its allowed status. The full happy-path
    //! scenarios live in `tests/session_flow.rs`.

    use super::*;

    fn question(id: &str, correct: &[usize]) -> Question {
        Question {
            id: id.into(),
            text: format!("{id}?"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_options: correct.iter().copied().collect(),
            time_limit_ms: 10_000,
            image: None,
        }
    }

    fn lobby_room() -> Room {
        Room::create(
            Pin(123_456),
            "Capitals".into(),
            vec![question("q1", &[1]), question("q2", &[0, 2])],
        )
        .unwrap()
    }

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    #[test]
    fn test_create_starts_in_lobby_with_no_current_question() {
        let room = lobby_room();
        assert_eq!(room.status, RoomStatus::Lobby);
        assert_eq!(room.current_question, None);
        assert!(room.players.is_empty());
        assert!(!room.team_mode);
    }

    #[test]
    fn test_create_rejects_question_with_no_correct_option() {
        let result = Room::create(
            Pin(1),
            "Bad".into(),
            vec![question("q1", &[])],
        );
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_create_rejects_out_of_range_correct_option() {
        let result =
            Room::create(Pin(1), "Bad".into(), vec![question("q1", &[9])]);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_create_rejects_zero_time_limit() {
        let mut q = question("q1", &[1]);
        q.time_limit_ms = 0;
        let result = Room::create(Pin(1), "Bad".into(), vec![q]);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_join_duplicate_nickname_rejected_and_list_unchanged() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();

        let result = room.join(pid("p2"), "Ali".into(), None);

        assert!(matches!(result, Err(EngineError::NicknameTaken(_))));
        assert_eq!(room.players.len(), 1);
    }

    #[test]
    fn test_join_same_id_same_nickname_is_idempotent() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();

        let views = room.join(pid("p1"), "Ali".into(), None).unwrap();

        assert_eq!(room.players.len(), 1);
        assert_eq!(views.len(), 1);
    }

    #[test]
    fn test_join_same_id_different_nickname_rejected() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();

        let result = room.join(pid("p1"), "Bob".into(), None);

        assert!(matches!(result, Err(EngineError::PlayerAlreadyJoined(_))));
    }

    #[test]
    fn test_join_blank_nickname_rejected() {
        let mut room = lobby_room();
        let result = room.join(pid("p1"), "   ".into(), None);
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_join_after_game_started_rejected() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();
        room.start_question(1_000).unwrap();

        let result = room.join(pid("p2"), "Bob".into(), None);

        assert!(matches!(
            result,
            Err(EngineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_add_questions_outside_lobby_rejected() {
        let mut room = lobby_room();
        room.start_question(0).unwrap();

        let result = room.add_questions(None, vec![question("q9", &[0])]);

        assert!(matches!(
            result,
            Err(EngineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_start_question_with_no_questions_rejected() {
        let mut room = Room::create(Pin(1), "Empty".into(), vec![]).unwrap();
        let result = room.start_question(0);
        assert!(matches!(result, Err(EngineError::NoQuestionsRemaining)));
        assert_eq!(room.status, RoomStatus::Lobby);
    }

    #[test]
    fn test_start_question_past_last_rejected() {
        let mut room = lobby_room();
        room.start_question(0).unwrap();
        room.end_question(1).unwrap();
        room.start_question(2).unwrap();
        room.end_question(3).unwrap();

        let result = room.start_question(4);

        assert!(matches!(result, Err(EngineError::NoQuestionsRemaining)));
        assert_eq!(room.status, RoomStatus::Leaderboard);
    }

    #[test]
    fn test_start_question_clears_previous_answers() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();
        room.start_question(0).unwrap();
        room.submit_answer(&pid("p1"), &[1], 2_000).unwrap();
        room.end_question(3_000).unwrap();

        room.start_question(10_000).unwrap();

        assert!(room.answered.is_empty());
        assert_eq!(room.question_started_at_ms, 10_000);
    }

    #[test]
    fn test_submit_answer_unknown_player_rejected() {
        let mut room = lobby_room();
        room.start_question(0).unwrap();

        let result = room.submit_answer(&pid("ghost"), &[1], 100);

        assert!(matches!(result, Err(EngineError::PlayerNotFound(_))));
    }

    #[test]
    fn test_submit_answer_out_of_range_option_rejected() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();
        room.start_question(0).unwrap();

        let result = room.submit_answer(&pid("p1"), &[7], 100);

        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
        assert!(room.answered.is_empty());
    }

    #[test]
    fn test_submit_answer_empty_choice_rejected() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();
        room.start_question(0).unwrap();

        let result = room.submit_answer(&pid("p1"), &[], 100);

        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_submit_answer_outside_question_rejected() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();

        let result = room.submit_answer(&pid("p1"), &[1], 100);

        assert!(matches!(
            result,
            Err(EngineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_multi_correct_requires_exact_set() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();
        room.join(pid("p2"), "Bob".into(), None).unwrap();
        // q2 has correct set {0, 2}.
        room.start_question(0).unwrap();
        room.end_question(1).unwrap();
        room.start_question(2).unwrap();

        let partial = room.submit_answer(&pid("p1"), &[0], 100).unwrap();
        let exact = room.submit_answer(&pid("p2"), &[2, 0], 100).unwrap();

        assert!(!partial.correct);
        assert!(exact.correct);
    }

    #[test]
    fn test_end_question_before_any_question_rejected() {
        let mut room = lobby_room();
        let result = room.end_question(0);
        assert!(matches!(
            result,
            Err(EngineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_finish_only_from_leaderboard() {
        let mut room = lobby_room();
        assert!(matches!(
            room.finish(),
            Err(EngineError::InvalidTransition { .. })
        ));

        room.start_question(0).unwrap();
        assert!(matches!(
            room.finish(),
            Err(EngineError::InvalidTransition { .. })
        ));

        room.end_question(1).unwrap();
        room.finish().unwrap();
        assert_eq!(room.status, RoomStatus::Ended);
    }

    #[test]
    fn test_setup_teams_outside_lobby_rejected() {
        let mut room = lobby_room();
        room.start_question(0).unwrap();

        let result = room.setup_teams(3, &[]);

        assert!(matches!(
            result,
            Err(EngineError::InvalidTransition { .. })
        ));
        assert!(!room.team_mode);
    }

    #[test]
    fn test_setup_teams_clamps_count() {
        let mut room = lobby_room();
        assert_eq!(room.setup_teams(1, &[]).unwrap().len(), MIN_TEAMS);
        assert_eq!(room.setup_teams(99, &[]).unwrap().len(), MAX_TEAMS);
    }

    #[test]
    fn test_setup_teams_replaces_previous_picks() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();
        room.setup_teams(2, &[]).unwrap();
        room.join_team(&pid("p1"), TeamId(1)).unwrap();

        room.setup_teams(3, &[]).unwrap();

        assert_eq!(room.players[0].team, None);
    }

    #[test]
    fn test_join_team_without_team_mode_rejected() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();

        let result = room.join_team(&pid("p1"), TeamId(0));

        assert!(matches!(result, Err(EngineError::TeamModeInactive)));
    }

    #[test]
    fn test_join_team_unknown_team_rejected() {
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();
        room.setup_teams(2, &[]).unwrap();

        let result = room.join_team(&pid("p1"), TeamId(5));

        assert!(matches!(result, Err(EngineError::TeamNotFound(_))));
    }

    #[test]
    fn test_activate_shield_without_team_mode_rejected() {
        let mut room = lobby_room();
        let result = room.activate_shield(TeamId(0), 0);
        assert!(matches!(result, Err(EngineError::TeamModeInactive)));
    }

    #[test]
    fn test_snapshot_hides_question_outside_question_status() {
        let mut room = lobby_room();
        assert!(room.snapshot().question.is_none());

        room.start_question(0).unwrap();
        let snap = room.snapshot();
        assert_eq!(snap.question.as_ref().unwrap().id, "q1");

        room.end_question(1).unwrap();
        assert!(room.snapshot().question.is_none());
    }

    #[test]
    fn test_room_round_trips_through_json() {
        // The store persists rooms as serialized records; the full
        // structure must survive the trip.
        let mut room = lobby_room();
        room.join(pid("p1"), "Ali".into(), None).unwrap();
        room.setup_teams(2, &[]).unwrap();
        room.join_team(&pid("p1"), TeamId(0)).unwrap();
        room.start_question(5_000).unwrap();
        room.submit_answer(&pid("p1"), &[1], 7_000).unwrap();

        let bytes = serde_json::to_vec(&room).unwrap();
        let decoded: Room = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(decoded.status, room.status);
        assert_eq!(decoded.players.len(), 1);
        assert_eq!(decoded.players[0].score, room.players[0].score);
        assert_eq!(decoded.answered, room.answered);
        assert_eq!(decoded.teams.len(), 2);
    }
}
