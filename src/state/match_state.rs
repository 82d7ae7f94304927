//! Canonical match document shared by the controller and every overlay.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Player entry of a team roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Roster-unique identifier (uniqueness is enforced by the editor, not the model).
    pub id: String,
    /// Shirt number.
    pub number: u32,
    /// Display name.
    pub name: String,
    /// Position code (e.g. `GK`, `DEF`, `MID`, `FWD`).
    pub position: String,
    /// Optional portrait URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the player wears the armband.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_captain: Option<bool>,
}

/// Intro/lineup animation style selected for a team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimationType {
    /// Plain fade and slide.
    #[default]
    Standard,
    /// Rhythmic pulse in the team colours.
    SambaPulse,
    /// Rotating sky-blue stripes.
    AlbicelesteSpin,
    /// Slow regal slide-in.
    RoyalSlide,
    /// Bouncing blue and garnet panels.
    BlaugranaBounce,
    /// Neon glitch flash.
    CyberFlash,
}

/// Goal celebration style selected for a team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalAnimationType {
    /// Oversized "GOAL" text sliding across the screen.
    #[default]
    HugeSlide,
    /// Burst from the centre of the screen.
    CenterBurst,
}

/// A team as displayed by the graphics. Swapped wholesale when a new match is configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Identity key used by every team-scoped action.
    pub id: String,
    /// Full display name.
    pub name: String,
    /// Three-letter code shown on the scorebug.
    pub short_name: String,
    /// Main kit colour, as a CSS hex colour.
    pub color_primary: String,
    /// Accent colour, as a CSS hex colour.
    pub color_secondary: String,
    /// Logo URL.
    pub logo: String,
    /// Ordered roster.
    pub players: Vec<Player>,
    /// Head coach, shown with the lineup.
    pub coach: String,
    /// Style of the intro and lineup graphics.
    pub animation_type: AnimationType,
    /// Style of the goal celebration graphic.
    pub goal_animation_type: GoalAnimationType,
}

impl Team {
    /// Find a roster entry by its identifier.
    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == player_id)
    }
}

/// Per-team counters. No bounds are enforced by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    /// Possession percentage, conventionally 0–100 but not clamped.
    pub possession: f64,
    /// Total shots.
    pub shots: u32,
    /// Shots on target; goals count as one.
    pub shots_on_target: u32,
    /// Corner kicks won.
    pub corners: u32,
    /// Fouls committed.
    pub fouls: u32,
    /// Yellow cards shown; bumped by card events.
    pub yellow_cards: u32,
    /// Red cards shown; bumped by card events.
    pub red_cards: u32,
    /// Offsides.
    pub offsides: u32,
    /// Goalkeeper saves.
    pub saves: u32,
    /// Completed passes.
    pub passes: u32,
    /// Expected-goals accumulator.
    pub xg: f64,
}

impl TeamStats {
    /// Counters at kick-off: everything zeroed and possession split evenly.
    pub fn kick_off() -> Self {
        Self {
            possession: 50.0,
            ..Self::default()
        }
    }
}

/// Match phase. Ordered, but the model accepts any phase at any time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum Period {
    /// First half.
    #[default]
    #[serde(rename = "1st")]
    FirstHalf,
    /// Half-time break.
    #[serde(rename = "HT")]
    HalfTime,
    /// Second half.
    #[serde(rename = "2nd")]
    SecondHalf,
    /// First period of extra time.
    #[serde(rename = "ET1")]
    ExtraTimeFirst,
    /// Second period of extra time.
    #[serde(rename = "ET2")]
    ExtraTimeSecond,
    /// Penalty shoot-out.
    #[serde(rename = "PEN")]
    Penalties,
    /// Full time.
    #[serde(rename = "FT")]
    FullTime,
}

/// Match clock. Only the authoritative session advances it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchTimer {
    /// Elapsed minutes, unbounded.
    pub minutes: u32,
    /// Elapsed seconds within the current minute (0–59 when driven by ticks).
    pub seconds: u32,
    /// Whether the controller is advancing the clock.
    pub is_running: bool,
    /// Announced stoppage time, in minutes.
    pub added_time: u32,
    /// Current phase of the match.
    pub period: Period,
}

/// Kind of a transient match event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Goal scored.
    Goal,
    /// Yellow card; bumps the team's yellow card counter.
    YellowCard,
    /// Red card; bumps the team's red card counter.
    RedCard,
    /// Player swap.
    Substitution,
    /// Penalty outcome.
    Penalty,
    /// Video review.
    Var,
}

/// Immutable record of something that happened during the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvent {
    /// Unique per emission.
    pub id: String,
    /// What happened.
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Team the event is attributed to.
    pub team_id: String,
    /// Match minute at emission.
    pub minute: u32,
    /// Scorer or booked player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,
    /// Player coming on, for substitutions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_in: Option<Player>,
    /// Player going off, for substitutions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_out: Option<Player>,
    /// Free text: penalty outcome (`GOAL`, `SAVED`, `MISSED`) or VAR verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
}

/// Boolean visibility flags addressable by `TOGGLE_OVERLAY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OverlayFlag {
    /// Scorebug.
    #[serde(rename = "showScoreboard")]
    Scoreboard,
    /// Both lineups.
    #[serde(rename = "showLineups")]
    Lineups,
    /// Tactical formation board.
    #[serde(rename = "showFormation")]
    Formation,
    /// Lower-third caption.
    #[serde(rename = "showLowerThird")]
    LowerThird,
    /// Full-screen stats board.
    #[serde(rename = "showStats")]
    Stats,
    /// Pre-match intro.
    #[serde(rename = "showIntro")]
    Intro,
    /// Bottom stats ticker.
    #[serde(rename = "showTicker")]
    Ticker,
    /// Sponsor slot.
    #[serde(rename = "showSponsor")]
    Sponsor,
}

/// Which graphics the overlay should currently display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverlayState {
    /// Scorebug; hidden anyway while lineups or stats are up.
    pub show_scoreboard: bool,
    /// Both lineups.
    pub show_lineups: bool,
    /// Tactical formation board.
    pub show_formation: bool,
    /// Lower-third caption.
    pub show_lower_third: bool,
    /// Full-screen stats board.
    pub show_stats: bool,
    /// Pre-match intro.
    pub show_intro: bool,
    /// Bottom stats ticker.
    pub show_ticker: bool,
    /// Sponsor slot.
    pub show_sponsor: bool,
    /// At most one event is on screen at a time.
    pub active_event: Option<MatchEvent>,
    /// Carried for compatibility; no graphic renders it.
    pub custom_message: Option<String>,
}

impl OverlayState {
    /// Mutable access to the flag addressed by `flag`.
    pub fn flag_mut(&mut self, flag: OverlayFlag) -> &mut bool {
        match flag {
            OverlayFlag::Scoreboard => &mut self.show_scoreboard,
            OverlayFlag::Lineups => &mut self.show_lineups,
            OverlayFlag::Formation => &mut self.show_formation,
            OverlayFlag::LowerThird => &mut self.show_lower_third,
            OverlayFlag::Stats => &mut self.show_stats,
            OverlayFlag::Intro => &mut self.show_intro,
            OverlayFlag::Ticker => &mut self.show_ticker,
            OverlayFlag::Sponsor => &mut self.show_sponsor,
        }
    }

    /// Current value of the flag addressed by `flag`.
    pub fn flag(&self, flag: OverlayFlag) -> bool {
        match flag {
            OverlayFlag::Scoreboard => self.show_scoreboard,
            OverlayFlag::Lineups => self.show_lineups,
            OverlayFlag::Formation => self.show_formation,
            OverlayFlag::LowerThird => self.show_lower_third,
            OverlayFlag::Stats => self.show_stats,
            OverlayFlag::Intro => self.show_intro,
            OverlayFlag::Ticker => self.show_ticker,
            OverlayFlag::Sponsor => self.show_sponsor,
        }
    }
}

/// Which side of the fixture a team id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Home team.
    Home,
    /// Away team.
    Away,
}

/// The single shared document. Each session keeps its own copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    /// Home side.
    pub home_team: Team,
    /// Away side.
    pub away_team: Team,
    /// Goals scored by the home side.
    pub home_score: u32,
    /// Goals scored by the away side.
    pub away_score: u32,
    /// Home side counters.
    pub home_stats: TeamStats,
    /// Away side counters.
    pub away_stats: TeamStats,
    /// Match clock.
    pub timer: MatchTimer,
    /// Graphics currently on screen.
    pub overlay: OverlayState,
    /// Event history, newest first. Never pruned within a session.
    pub events: Vec<MatchEvent>,
    /// Banner shown on the scorebug.
    pub tournament_name: String,
}

impl MatchState {
    /// Document every session starts from: fresh fixture, clock at 0:00, scorebug and sponsor on.
    pub fn initial(home: Team, away: Team, tournament_name: impl Into<String>) -> Self {
        Self {
            home_team: home,
            away_team: away,
            home_score: 0,
            away_score: 0,
            home_stats: TeamStats::kick_off(),
            away_stats: TeamStats::kick_off(),
            timer: MatchTimer::default(),
            overlay: OverlayState {
                show_scoreboard: true,
                show_sponsor: true,
                ..OverlayState::default()
            },
            events: Vec::new(),
            tournament_name: tournament_name.into(),
        }
    }

    /// Resolve a team id against the current fixture.
    pub fn side_of(&self, team_id: &str) -> Option<Side> {
        if self.home_team.id == team_id {
            Some(Side::Home)
        } else if self.away_team.id == team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Team playing on `side`.
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    /// Mutable access to the team playing on `side`.
    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Home => &mut self.home_team,
            Side::Away => &mut self.away_team,
        }
    }

    /// Goals scored by `side`.
    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    /// Mutable access to the score of `side`.
    pub fn score_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Home => &mut self.home_score,
            Side::Away => &mut self.away_score,
        }
    }

    /// Counters of `side`.
    pub fn stats(&self, side: Side) -> &TeamStats {
        match side {
            Side::Home => &self.home_stats,
            Side::Away => &self.away_stats,
        }
    }

    /// Mutable access to the counters of `side`.
    pub fn stats_mut(&mut self, side: Side) -> &mut TeamStats {
        match side {
            Side::Home => &mut self.home_stats,
            Side::Away => &mut self.away_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str) -> Team {
        Team {
            id: id.into(),
            name: id.to_uppercase(),
            ..Team::default()
        }
    }

    #[test]
    fn initial_document_matches_kick_off_defaults() {
        let state = MatchState::initial(team("rma"), team("bar"), "CUP");

        assert_eq!(state.home_score, 0);
        assert_eq!(state.away_score, 0);
        assert_eq!(state.home_stats.possession, 50.0);
        assert_eq!(state.timer.period, Period::FirstHalf);
        assert!(!state.timer.is_running);
        assert!(state.overlay.show_scoreboard);
        assert!(state.overlay.show_sponsor);
        assert!(!state.overlay.show_lineups);
        assert!(state.overlay.active_event.is_none());
        assert!(state.events.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_wire_shape() {
        let state = MatchState::initial(team("rma"), team("bar"), "CUP");
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["homeTeam"]["id"], "rma");
        assert_eq!(json["timer"]["period"], "1st");
        assert_eq!(json["timer"]["isRunning"], false);
        assert_eq!(json["overlay"]["showScoreboard"], true);
        assert!(json["overlay"]["activeEvent"].is_null());
        assert_eq!(json["tournamentName"], "CUP");
    }

    #[test]
    fn side_lookup_ignores_unknown_teams() {
        let state = MatchState::initial(team("rma"), team("bar"), "CUP");
        assert_eq!(state.side_of("rma"), Some(Side::Home));
        assert_eq!(state.side_of("bar"), Some(Side::Away));
        assert_eq!(state.side_of("psg"), None);
    }

    #[test]
    fn periods_are_ordered() {
        assert!(Period::FirstHalf < Period::HalfTime);
        assert!(Period::ExtraTimeSecond < Period::Penalties);
        assert!(Period::Penalties < Period::FullTime);
    }
}
