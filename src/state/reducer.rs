//! Action vocabulary exchanged between sessions and the pure reducer applying it.
//!
//! Every session applies the same function to the same actions, so two sessions
//! that received the same sequence hold the same document. The only state a
//! session computes on its own is the match clock, and only the authoritative
//! session does that.

use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::state::match_state::{
    AnimationType, EventType, GoalAnimationType, MatchEvent, MatchState, MatchTimer, OverlayFlag,
    Period, Player, Team, TeamStats,
};

/// Wire message carried on the match channel: `{"type": "...", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Set one side's score. Negative values are floored at zero.
    SetScore(SetScore),
    /// Shallow-merge the given clock fields.
    UpdateTimer(TimerUpdate),
    /// Record an event, show it, and bump card counters.
    TriggerEvent(MatchEvent),
    /// Hide the active event without touching the history.
    ClearEvent,
    /// Flip one overlay visibility flag.
    ToggleOverlay(OverlayFlag),
    /// Start a new fixture.
    SetTeams(SetTeams),
    /// Shallow-merge team presentation fields.
    UpdateTeamConfig(TeamConfigUpdate),
    /// Shallow-merge a side's counters.
    UpdateStats(StatsUpdateRequest),
    /// Replace the whole document.
    SyncState(Box<MatchState>),
    /// Shallow-merge match-level display fields.
    UpdateMatchConfig(MatchConfigUpdate),
}

impl Action {
    /// Decode an action from its JSON wire form.
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Wire tag of the action, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetScore(_) => "SET_SCORE",
            Self::UpdateTimer(_) => "UPDATE_TIMER",
            Self::TriggerEvent(_) => "TRIGGER_EVENT",
            Self::ClearEvent => "CLEAR_EVENT",
            Self::ToggleOverlay(_) => "TOGGLE_OVERLAY",
            Self::SetTeams(_) => "SET_TEAMS",
            Self::UpdateTeamConfig(_) => "UPDATE_TEAM_CONFIG",
            Self::UpdateStats(_) => "UPDATE_STATS",
            Self::SyncState(_) => "SYNC_STATE",
            Self::UpdateMatchConfig(_) => "UPDATE_MATCH_CONFIG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload of [`Action::SetScore`].
pub struct SetScore {
    /// Team whose score changes.
    pub team_id: String,
    /// Requested score; anything below zero is stored as zero.
    pub score: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Partial clock update; absent fields keep their current value.
pub struct TimerUpdate {
    /// Elapsed minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    /// Seconds within the minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u32>,
    /// Start or stop the clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    /// Announced stoppage time, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_time: Option<u32>,
    /// Match phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl TimerUpdate {
    fn merge_into(self, timer: &mut MatchTimer) {
        if let Some(minutes) = self.minutes {
            timer.minutes = minutes;
        }
        if let Some(seconds) = self.seconds {
            timer.seconds = seconds;
        }
        if let Some(is_running) = self.is_running {
            timer.is_running = is_running;
        }
        if let Some(added_time) = self.added_time {
            timer.added_time = added_time;
        }
        if let Some(period) = self.period {
            timer.period = period;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Payload of [`Action::SetTeams`].
pub struct SetTeams {
    /// New home side.
    pub home: Team,
    /// New away side.
    pub away: Team,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload of [`Action::UpdateTeamConfig`].
pub struct TeamConfigUpdate {
    /// Team to edit.
    pub team_id: String,
    /// Fields to overwrite.
    pub updates: TeamUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Partial team update. The identity key is not editable.
pub struct TeamUpdate {
    /// Full display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Three-letter code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Main kit colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_primary: Option<String>,
    /// Accent colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_secondary: Option<String>,
    /// Logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Replacement roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<Player>>,
    /// Head coach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach: Option<String>,
    /// Intro and lineup animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_type: Option<AnimationType>,
    /// Goal celebration animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_animation_type: Option<GoalAnimationType>,
}

impl TeamUpdate {
    fn merge_into(self, team: &mut Team) {
        if let Some(name) = self.name {
            team.name = name;
        }
        if let Some(short_name) = self.short_name {
            team.short_name = short_name;
        }
        if let Some(color) = self.color_primary {
            team.color_primary = color;
        }
        if let Some(color) = self.color_secondary {
            team.color_secondary = color;
        }
        if let Some(logo) = self.logo {
            team.logo = logo;
        }
        if let Some(players) = self.players {
            team.players = players;
        }
        if let Some(coach) = self.coach {
            team.coach = coach;
        }
        if let Some(animation) = self.animation_type {
            team.animation_type = animation;
        }
        if let Some(animation) = self.goal_animation_type {
            team.goal_animation_type = animation;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload of [`Action::UpdateStats`].
pub struct StatsUpdateRequest {
    /// Team whose counters change.
    pub team_id: String,
    /// Counters to overwrite.
    pub stats: StatsUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Partial counter update; absent fields keep their current value.
pub struct StatsUpdate {
    /// Possession percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possession: Option<f64>,
    /// Total shots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u32>,
    /// Shots on target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots_on_target: Option<u32>,
    /// Corners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corners: Option<u32>,
    /// Fouls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fouls: Option<u32>,
    /// Yellow cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yellow_cards: Option<u32>,
    /// Red cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_cards: Option<u32>,
    /// Offsides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offsides: Option<u32>,
    /// Saves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saves: Option<u32>,
    /// Passes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passes: Option<u32>,
    /// Expected goals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xg: Option<f64>,
}

impl StatsUpdate {
    fn merge_into(self, stats: &mut TeamStats) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut stats.possession, self.possession);
        set(&mut stats.shots, self.shots);
        set(&mut stats.shots_on_target, self.shots_on_target);
        set(&mut stats.corners, self.corners);
        set(&mut stats.fouls, self.fouls);
        set(&mut stats.yellow_cards, self.yellow_cards);
        set(&mut stats.red_cards, self.red_cards);
        set(&mut stats.offsides, self.offsides);
        set(&mut stats.saves, self.saves);
        set(&mut stats.passes, self.passes);
        set(&mut stats.xg, self.xg);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Partial update of match-level display fields.
pub struct MatchConfigUpdate {
    /// Banner shown on the scorebug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_name: Option<String>,
    /// `Some(None)` clears the message, `None` leaves it untouched.
    #[schema(value_type = Option<String>)]
    #[serde(
        default,
        with = "::serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_message: Option<Option<String>>,
}

/// Compute the next document from `state` and `action`.
///
/// Team-scoped actions naming a team that is not part of the current fixture
/// are ignored: they are the normal outcome of an edit racing a team swap.
pub fn reduce(mut state: MatchState, action: Action) -> MatchState {
    match action {
        Action::SetScore(SetScore { team_id, score }) => {
            let Some(side) = state.side_of(&team_id) else {
                debug!(team_id, "ignoring score for a team outside the fixture");
                return state;
            };
            *state.score_mut(side) = u32::try_from(score.max(0)).unwrap_or(u32::MAX);
        }
        Action::UpdateTimer(update) => update.merge_into(&mut state.timer),
        Action::TriggerEvent(event) => {
            let Some(side) = state.side_of(&event.team_id) else {
                debug!(team_id = %event.team_id, event_id = %event.id, "ignoring event for a team outside the fixture");
                return state;
            };
            let stats = state.stats_mut(side);
            match event.kind {
                EventType::YellowCard => {
                    stats.yellow_cards = stats.yellow_cards.saturating_add(1);
                }
                EventType::RedCard => {
                    stats.red_cards = stats.red_cards.saturating_add(1);
                }
                _ => {}
            }
            state.events.insert(0, event.clone());
            state.overlay.active_event = Some(event);
        }
        Action::ClearEvent => state.overlay.active_event = None,
        Action::ToggleOverlay(flag) => {
            let value = state.overlay.flag_mut(flag);
            *value = !*value;
        }
        Action::SetTeams(SetTeams { home, away }) => {
            // Stats are kept across a swap.
            state.home_team = home;
            state.away_team = away;
            state.home_score = 0;
            state.away_score = 0;
            state.events.clear();
        }
        Action::UpdateTeamConfig(TeamConfigUpdate { team_id, updates }) => {
            let Some(side) = state.side_of(&team_id) else {
                debug!(team_id, "ignoring team update for a team outside the fixture");
                return state;
            };
            updates.merge_into(state.team_mut(side));
        }
        Action::UpdateStats(StatsUpdateRequest { team_id, stats }) => {
            let Some(side) = state.side_of(&team_id) else {
                debug!(team_id, "ignoring stats for a team outside the fixture");
                return state;
            };
            stats.merge_into(state.stats_mut(side));
        }
        Action::SyncState(next) => return *next,
        Action::UpdateMatchConfig(MatchConfigUpdate {
            tournament_name,
            custom_message,
        }) => {
            if let Some(name) = tournament_name {
                state.tournament_name = name;
            }
            if let Some(message) = custom_message {
                state.overlay.custom_message = message;
            }
        }
    }

    state
}
