use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dto::validation::{validate_hex_color, validate_team_id},
    state::{
        match_state::{MatchEvent, OverlayFlag, Period, Team},
        reducer::{StatsUpdate, TeamUpdate},
    },
};

/// Generic acknowledgement returned by controller commands.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub message: String,
}

impl ActionResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Score of one side after an adjustment.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdateResponse {
    pub team_id: String,
    pub score: u32,
}

/// Event emitted by a controller command, as recorded in the match history.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    pub event: MatchEvent,
}

/// Catalog entry exposed to controller UIs when picking a fixture.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub color_primary: String,
    pub color_secondary: String,
    pub logo: String,
    pub coach: String,
    pub squad_size: usize,
}

impl From<&Team> for TeamSummary {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            short_name: team.short_name.clone(),
            color_primary: team.color_primary.clone(),
            color_secondary: team.color_secondary.clone(),
            logo: team.logo.clone(),
            coach: team.coach.clone(),
            squad_size: team.players.len(),
        }
    }
}

/// Relative score change for one side; the result is floored at zero.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAdjustmentRequest {
    #[validate(custom(function = "validate_team_id"))]
    pub team_id: String,
    #[validate(range(min = -99, max = 99))]
    pub delta: i64,
}

/// Announced stoppage time.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddedTimeRequest {
    #[validate(range(max = 30))]
    pub minutes: u32,
}

/// Jump the clock to a match phase.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PeriodRequest {
    pub period: Period,
}

/// Flip one overlay graphic.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleOverlayRequest {
    pub flag: OverlayFlag,
}

/// Partial stats update for one side.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatsRequest {
    #[validate(custom(function = "validate_team_id"))]
    pub team_id: String,
    pub stats: StatsUpdate,
}

/// Presentation changes for one of the fixture's teams.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UpdateTeamRequest(pub TeamUpdate);

impl Validate for UpdateTeamRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let update = &self.0;

        if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            let mut err = ValidationError::new("name_empty");
            err.message = Some("Team name must not be empty".into());
            errors.add("name", err);
        }

        for (field, color) in [
            ("colorPrimary", &update.color_primary),
            ("colorSecondary", &update.color_secondary),
        ] {
            if let Some(color) = color {
                if let Err(e) = validate_hex_color(color) {
                    errors.add(field, e);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Start a new fixture from two catalog teams.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetTeamsRequest {
    #[validate(custom(function = "validate_team_id"))]
    pub home_id: String,
    #[validate(custom(function = "validate_team_id"))]
    pub away_id: String,
}

/// Goal for one side. Without a scorer the tenth roster entry is credited.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    #[validate(custom(function = "validate_team_id"))]
    pub team_id: String,
    #[serde(default)]
    pub player_id: Option<String>,
}

/// Card colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardColor {
    Yellow,
    Red,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    #[validate(custom(function = "validate_team_id"))]
    pub team_id: String,
    pub color: CardColor,
    #[serde(default)]
    pub player_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionRequest {
    #[validate(custom(function = "validate_team_id"))]
    pub team_id: String,
    #[serde(default)]
    pub player_in_id: Option<String>,
    #[serde(default)]
    pub player_out_id: Option<String>,
}

/// VAR review. Without a verdict the review is shown as in progress.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VarRequest {
    #[validate(custom(function = "validate_team_id"))]
    pub team_id: String,
    #[serde(default)]
    #[validate(length(max = 40))]
    pub verdict: Option<String>,
}

/// Outcome of a penalty kick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PenaltyResult {
    Goal,
    Saved,
    Missed,
}

impl PenaltyResult {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Goal => "GOAL",
            Self::Saved => "SAVED",
            Self::Missed => "MISSED",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyRequest {
    #[validate(custom(function = "validate_team_id"))]
    pub team_id: String,
    pub result: PenaltyResult,
}
