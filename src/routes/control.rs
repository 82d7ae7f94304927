//! REST endpoints used by the operator's control panel.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use validator::Validate;

use crate::{
    dto::control::{
        ActionResponse, AddedTimeRequest, CardRequest, EventResponse, GoalRequest, PenaltyRequest,
        PeriodRequest, ScoreAdjustmentRequest, ScoreUpdateResponse, SetTeamsRequest,
        SubstitutionRequest, TeamSummary, ToggleOverlayRequest, UpdateStatsRequest,
        UpdateTeamRequest, VarRequest,
    },
    error::AppError,
    services::control_service,
    state::{SharedState, match_state::MatchState, reducer::MatchConfigUpdate},
};

/// Operator endpoints driving the controller session.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams", get(list_teams))
        .route("/control/state", get(get_state))
        .route("/control/actions", post(dispatch_action))
        .route("/control/timer/toggle", post(toggle_timer))
        .route("/control/timer/reset", post(reset_timer))
        .route("/control/timer/added-time", post(set_added_time))
        .route("/control/timer/period", put(set_period))
        .route("/control/score", post(adjust_score))
        .route("/control/stats", put(update_stats))
        .route("/control/teams", post(set_teams))
        .route("/control/teams/{id}", put(update_team))
        .route("/control/match", put(update_match))
        .route("/control/overlay/toggle", post(toggle_overlay))
        .route("/control/events/goal", post(trigger_goal))
        .route("/control/events/card", post(trigger_card))
        .route("/control/events/substitution", post(trigger_substitution))
        .route("/control/events/var", post(trigger_var))
        .route("/control/events/penalty", post(trigger_penalty))
        .route("/control/events/active", delete(clear_event))
}

/// List the teams that can be fielded.
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses((status = 200, description = "Team catalog", body = [TeamSummary]))
)]
pub async fn list_teams(State(state): State<SharedState>) -> Json<Vec<TeamSummary>> {
    Json(control_service::list_teams(&state))
}

/// Current controller document.
#[utoipa::path(
    get,
    path = "/control/state",
    tag = "control",
    responses((status = 200, description = "Match document", body = MatchState))
)]
pub async fn get_state(State(state): State<SharedState>) -> Json<MatchState> {
    Json(control_service::snapshot(&state))
}

/// Dispatch a raw `{type, payload}` action.
#[utoipa::path(
    post,
    path = "/control/actions",
    tag = "control",
    request_body(content = String, content_type = "application/json", description = "Wire action"),
    responses(
        (status = 200, description = "Action dispatched", body = ActionResponse),
        (status = 400, description = "Malformed action")
    )
)]
pub async fn dispatch_action(
    State(state): State<SharedState>,
    body: String,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(control_service::dispatch_raw(&state, &body)?))
}

/// Start or stop the match clock.
#[utoipa::path(
    post,
    path = "/control/timer/toggle",
    tag = "control",
    responses((status = 200, description = "Clock toggled", body = ActionResponse))
)]
pub async fn toggle_timer(State(state): State<SharedState>) -> Json<ActionResponse> {
    Json(control_service::toggle_timer(&state))
}

/// Stop the clock and reset it to 0:00.
#[utoipa::path(
    post,
    path = "/control/timer/reset",
    tag = "control",
    responses((status = 200, description = "Clock reset", body = ActionResponse))
)]
pub async fn reset_timer(State(state): State<SharedState>) -> Json<ActionResponse> {
    Json(control_service::reset_timer(&state))
}

/// Set the added time for the current period.
#[utoipa::path(
    post,
    path = "/control/timer/added-time",
    tag = "control",
    request_body = AddedTimeRequest,
    responses((status = 200, description = "Added time set", body = ActionResponse))
)]
pub async fn set_added_time(
    State(state): State<SharedState>,
    Json(payload): Json<AddedTimeRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::set_added_time(
        &state,
        payload.minutes,
    )))
}

/// Move the match to another period.
#[utoipa::path(
    put,
    path = "/control/timer/period",
    tag = "control",
    request_body = PeriodRequest,
    responses((status = 200, description = "Period set", body = ActionResponse))
)]
pub async fn set_period(
    State(state): State<SharedState>,
    Json(payload): Json<PeriodRequest>,
) -> Json<ActionResponse> {
    Json(control_service::set_period(&state, payload.period))
}

/// Adjust one side's score by a delta.
#[utoipa::path(
    post,
    path = "/control/score",
    tag = "control",
    request_body = ScoreAdjustmentRequest,
    responses(
        (status = 200, description = "Score updated", body = ScoreUpdateResponse),
        (status = 404, description = "Team not in the current fixture")
    )
)]
pub async fn adjust_score(
    State(state): State<SharedState>,
    Json(payload): Json<ScoreAdjustmentRequest>,
) -> Result<Json<ScoreUpdateResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::adjust_score(&state, payload)?))
}

/// Merge counters into one side's stats.
#[utoipa::path(
    put,
    path = "/control/stats",
    tag = "control",
    request_body = UpdateStatsRequest,
    responses(
        (status = 200, description = "Stats updated", body = ActionResponse),
        (status = 404, description = "Team not in the current fixture")
    )
)]
pub async fn update_stats(
    State(state): State<SharedState>,
    Json(payload): Json<UpdateStatsRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::update_stats(&state, payload)?))
}

/// Start a new fixture from two catalog teams.
#[utoipa::path(
    post,
    path = "/control/teams",
    tag = "control",
    request_body = SetTeamsRequest,
    responses(
        (status = 200, description = "Fixture set", body = ActionResponse),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn set_teams(
    State(state): State<SharedState>,
    Json(payload): Json<SetTeamsRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::set_teams(&state, payload)?))
}

/// Edit presentation fields of one of the fixture's teams.
#[utoipa::path(
    put,
    path = "/control/teams/{id}",
    tag = "control",
    params(("id" = String, Path, description = "Team identifier")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated", body = ActionResponse),
        (status = 404, description = "Team not in the current fixture")
    )
)]
pub async fn update_team(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTeamRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::update_team(&state, id, payload)?))
}

/// Update the tournament banner or the ticker message.
#[utoipa::path(
    put,
    path = "/control/match",
    tag = "control",
    request_body = MatchConfigUpdate,
    responses((status = 200, description = "Match display fields updated", body = ActionResponse))
)]
pub async fn update_match(
    State(state): State<SharedState>,
    Json(payload): Json<MatchConfigUpdate>,
) -> Json<ActionResponse> {
    Json(control_service::update_match(&state, payload))
}

/// Show or hide one graphic.
#[utoipa::path(
    post,
    path = "/control/overlay/toggle",
    tag = "control",
    request_body = ToggleOverlayRequest,
    responses((status = 200, description = "Graphic toggled", body = ActionResponse))
)]
pub async fn toggle_overlay(
    State(state): State<SharedState>,
    Json(payload): Json<ToggleOverlayRequest>,
) -> Json<ActionResponse> {
    Json(control_service::toggle_overlay(&state, payload.flag))
}

/// Score and celebrate a goal.
#[utoipa::path(
    post,
    path = "/control/events/goal",
    tag = "events",
    request_body = GoalRequest,
    responses(
        (status = 200, description = "Goal shown", body = EventResponse),
        (status = 404, description = "Team or player not found")
    )
)]
pub async fn trigger_goal(
    State(state): State<SharedState>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<EventResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::goal(&state, payload)?))
}

/// Book a player.
#[utoipa::path(
    post,
    path = "/control/events/card",
    tag = "events",
    request_body = CardRequest,
    responses(
        (status = 200, description = "Card shown", body = EventResponse),
        (status = 404, description = "Team or player not found")
    )
)]
pub async fn trigger_card(
    State(state): State<SharedState>,
    Json(payload): Json<CardRequest>,
) -> Result<Json<EventResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::card(&state, payload)?))
}

/// Show a substitution.
#[utoipa::path(
    post,
    path = "/control/events/substitution",
    tag = "events",
    request_body = SubstitutionRequest,
    responses(
        (status = 200, description = "Substitution shown", body = EventResponse),
        (status = 404, description = "Team or player not found")
    )
)]
pub async fn trigger_substitution(
    State(state): State<SharedState>,
    Json(payload): Json<SubstitutionRequest>,
) -> Result<Json<EventResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::substitution(&state, payload)?))
}

/// Show a VAR review, optionally with its verdict.
#[utoipa::path(
    post,
    path = "/control/events/var",
    tag = "events",
    request_body = VarRequest,
    responses(
        (status = 200, description = "VAR review shown", body = EventResponse),
        (status = 404, description = "Team not in the current fixture")
    )
)]
pub async fn trigger_var(
    State(state): State<SharedState>,
    Json(payload): Json<VarRequest>,
) -> Result<Json<EventResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::var_review(&state, payload)?))
}

/// Show a penalty outcome.
#[utoipa::path(
    post,
    path = "/control/events/penalty",
    tag = "events",
    request_body = PenaltyRequest,
    responses(
        (status = 200, description = "Penalty outcome shown", body = EventResponse),
        (status = 404, description = "Team not in the current fixture")
    )
)]
pub async fn trigger_penalty(
    State(state): State<SharedState>,
    Json(payload): Json<PenaltyRequest>,
) -> Result<Json<EventResponse>, AppError> {
    payload.validate()?;
    Ok(Json(control_service::penalty(&state, payload)?))
}

/// Hide the event currently on screen.
#[utoipa::path(
    delete,
    path = "/control/events/active",
    tag = "events",
    responses((status = 200, description = "Event cleared", body = ActionResponse))
)]
pub async fn clear_event(State(state): State<SharedState>) -> Json<ActionResponse> {
    Json(control_service::clear_active_event(&state))
}
