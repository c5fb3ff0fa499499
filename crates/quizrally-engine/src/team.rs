//! Team battle state: presets, health, shields, combos, round resolution.

use std::collections::HashSet;

use quizrally_protocol::{PlayerId, TeamDamage, TeamId, TeamView};
use serde::{Deserialize, Serialize};

/// Minimum teams per game.
pub const MIN_TEAMS: usize = 2;

/// Maximum teams per game (the preset catalog has exactly this many).
pub const MAX_TEAMS: usize = 6;

/// Full health every team starts (and resets) with.
pub const MAX_HEALTH: u8 = 100;

/// How long a shield grants immunity once activated.
pub const SHIELD_DURATION_MS: u64 = 10_000;

/// Health lost per incorrect member answer in a round.
const DAMAGE_PER_MISS: u8 = 10;

/// One slot of the fixed team catalog.
#[derive(Debug, Clone, Copy)]
pub struct TeamPreset {
    pub name: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
}

/// The fixed, ordered catalog teams are assigned from. Slot `i` becomes
/// `TeamId(i)`; a caller-supplied custom name overrides the preset name
/// for that slot only.
pub const TEAM_PRESETS: [TeamPreset; MAX_TEAMS] = [
    TeamPreset { name: "Red Rockets", emoji: "🚀", color: "#e74c3c" },
    TeamPreset { name: "Blue Sharks", emoji: "🦈", color: "#3498db" },
    TeamPreset { name: "Green Dragons", emoji: "🐉", color: "#2ecc71" },
    TeamPreset { name: "Golden Bees", emoji: "🐝", color: "#f1c40f" },
    TeamPreset { name: "Purple Owls", emoji: "🦉", color: "#9b59b6" },
    TeamPreset { name: "Orange Foxes", emoji: "🦊", color: "#e67e22" },
];

/// One team in a team-battle room. Owned exclusively by its `Room`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub emoji: String,
    pub color: String,
    pub score: u32,
    /// Remaining health, 0–100. A team at 0 keeps playing for points;
    /// what "knocked out" means on screen is the client's call.
    pub health: u8,
    /// Consecutive fully-correct rounds.
    pub combo: u32,
    /// Unix-millis timestamp until which the shield is active. 0 = never
    /// activated.
    pub shield_active_until_ms: u64,
    /// One-time-use flag; a spent shield never comes back this game.
    pub shield_used: bool,
    /// Members who answered correctly this round. Cleared when the next
    /// question opens.
    pub round_correct: HashSet<PlayerId>,
    /// Members who answered at all this round.
    pub round_answered: HashSet<PlayerId>,
}

impl Team {
    /// Builds the team for catalog slot `slot`, using `custom_name` when
    /// the caller provided a non-empty one.
    pub fn from_slot(slot: usize, custom_name: Option<&str>) -> Self {
        let preset = &TEAM_PRESETS[slot];
        let name = match custom_name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => preset.name.to_string(),
        };
        Self {
            id: TeamId(slot as u8),
            name,
            emoji: preset.emoji.to_string(),
            color: preset.color.to_string(),
            score: 0,
            health: MAX_HEALTH,
            combo: 0,
            shield_active_until_ms: 0,
            shield_used: false,
            round_correct: HashSet::new(),
            round_answered: HashSet::new(),
        }
    }

    /// Returns `true` if the shield window covers `now_ms`.
    pub fn shield_active(&self, now_ms: u64) -> bool {
        now_ms < self.shield_active_until_ms
    }

    /// Forgets this round's answers. Called when a new question opens.
    pub fn clear_round(&mut self) {
        self.round_correct.clear();
        self.round_answered.clear();
    }

    /// Puts the team back to its game-start state. Name and markers stay.
    pub fn reset(&mut self) {
        self.score = 0;
        self.health = MAX_HEALTH;
        self.combo = 0;
        self.shield_active_until_ms = 0;
        self.shield_used = false;
        self.clear_round();
    }

    /// The public projection broadcast in `team-update` events.
    pub fn view(&self) -> TeamView {
        TeamView {
            id: self.id,
            name: self.name.clone(),
            emoji: self.emoji.clone(),
            color: self.color.clone(),
            score: self.score,
            health: self.health,
            combo: self.combo,
            shield_active_until_ms: self.shield_active_until_ms,
            shield_used: self.shield_used,
        }
    }
}

/// Resolves one question round across all teams.
///
/// For each team that answered at least once: a fully-correct round
/// increments its combo, any miss resets the combo to 0 and costs
/// [`DAMAGE_PER_MISS`] health per miss (clamped at 0). An active shield
/// blocks the health loss but never the combo reset. Teams that sat the
/// round out are untouched.
///
/// Returns the damage report for the `team-update` broadcast, one entry
/// per team that was hit (blocked or not).
pub fn resolve_round(teams: &mut [Team], now_ms: u64) -> Vec<TeamDamage> {
    let mut report = Vec::new();

    for team in teams.iter_mut() {
        if team.round_answered.is_empty() {
            continue;
        }

        let misses = team
            .round_answered
            .difference(&team.round_correct)
            .count();

        if misses == 0 {
            team.combo += 1;
            continue;
        }

        team.combo = 0;
        let amount =
            (misses as u32 * u32::from(DAMAGE_PER_MISS)).min(100) as u8;
        let blocked = team.shield_active(now_ms);
        if !blocked {
            team.health = team.health.saturating_sub(amount);
        }
        tracing::debug!(
            team = %team.id,
            misses,
            amount,
            blocked,
            health = team.health,
            "team round resolved"
        );
        report.push(TeamDamage { team_id: team.id, amount, blocked });
    }

    report
}
