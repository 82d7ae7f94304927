//! Controller operations: every change an operator can make to the match.
//!
//! Operations that read the document before changing it do both under one
//! [`Command`], so overlapping requests never build on a stale score or clock.

use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::control::{
        ActionResponse, CardColor, CardRequest, EventResponse, GoalRequest, PenaltyRequest,
        PenaltyResult, ScoreAdjustmentRequest, ScoreUpdateResponse, SetTeamsRequest,
        SubstitutionRequest, TeamSummary, UpdateStatsRequest, UpdateTeamRequest, VarRequest,
    },
    error::ServiceError,
    state::{
        SharedState,
        match_state::{EventType, MatchEvent, MatchState, OverlayFlag, Period, Player, Side},
        reducer::{
            Action, MatchConfigUpdate, SetScore, SetTeams, StatsUpdate, StatsUpdateRequest,
            TeamConfigUpdate, TimerUpdate,
        },
    },
    sync::{
        session::{Command, MatchSession},
        transport::decode_action,
    },
};

/// Roster slot credited with a goal when no scorer is named.
const DEFAULT_SCORER_INDEX: usize = 9;
/// Roster slot booked when no player is named.
const DEFAULT_BOOKED_INDEX: usize = 3;
const DEFAULT_PLAYER_IN_INDEX: usize = 10;
const DEFAULT_PLAYER_OUT_INDEX: usize = 8;

/// Current controller document.
pub fn snapshot(state: &SharedState) -> MatchState {
    state.controller().snapshot()
}

/// Teams available for fixtures, in catalog order.
pub fn list_teams(state: &SharedState) -> Vec<TeamSummary> {
    state.catalog().iter().map(TeamSummary::from).collect()
}

/// Dispatch a raw wire action as if the controller UI had built it.
///
/// Events go through the controller's auto-clear scheduling.
pub fn dispatch_raw(state: &SharedState, raw: &str) -> Result<ActionResponse, ServiceError> {
    let action = decode_action(raw).map_err(|err| {
        warn!(error = %err, "rejecting malformed action");
        ServiceError::from(err)
    })?;
    let kind = action.kind();

    let controller = state.controller();
    match action {
        Action::TriggerEvent(event) => controller.trigger_event(event),
        Action::ClearEvent => controller.clear_event(),
        other => controller.dispatch(other),
    }

    info!(kind, "dispatched raw action");
    Ok(ActionResponse::new(kind))
}

/// Start the clock if it is stopped, stop it otherwise.
pub fn toggle_timer(state: &SharedState) -> ActionResponse {
    let command = state.controller().command();
    let running = !command.state().timer.is_running;
    command.dispatch(Action::UpdateTimer(TimerUpdate {
        is_running: Some(running),
        ..TimerUpdate::default()
    }));
    ActionResponse::new(if running { "clock started" } else { "clock stopped" })
}

/// Stop the clock and bring it back to 0:00 with no added time.
pub fn reset_timer(state: &SharedState) -> ActionResponse {
    state.controller().dispatch(Action::UpdateTimer(TimerUpdate {
        minutes: Some(0),
        seconds: Some(0),
        is_running: Some(false),
        added_time: Some(0),
        period: None,
    }));
    ActionResponse::new("clock reset")
}

/// Set the added time announced for the current period.
pub fn set_added_time(state: &SharedState, minutes: u32) -> ActionResponse {
    state.controller().dispatch(Action::UpdateTimer(TimerUpdate {
        added_time: Some(minutes),
        ..TimerUpdate::default()
    }));
    ActionResponse::new(format!("added time set to {minutes}"))
}

/// Move the match to another period.
pub fn set_period(state: &SharedState, period: Period) -> ActionResponse {
    state.controller().dispatch(Action::UpdateTimer(TimerUpdate {
        period: Some(period),
        ..TimerUpdate::default()
    }));
    ActionResponse::new("period updated")
}

/// Move one side's score by `delta`, never below zero.
pub fn adjust_score(
    state: &SharedState,
    request: ScoreAdjustmentRequest,
) -> Result<ScoreUpdateResponse, ServiceError> {
    let ScoreAdjustmentRequest { team_id, delta } = request;
    let command = state.controller().command();
    let current = command.state();
    let side = fixture_side(&current, &team_id)?;

    let score = (i64::from(current.score(side)) + delta).max(0);
    command.dispatch(Action::SetScore(SetScore {
        team_id: team_id.clone(),
        score,
    }));

    Ok(ScoreUpdateResponse {
        team_id,
        score: command.state().score(side),
    })
}

/// Merge counters into one side's stats.
pub fn update_stats(
    state: &SharedState,
    request: UpdateStatsRequest,
) -> Result<ActionResponse, ServiceError> {
    let UpdateStatsRequest { team_id, stats } = request;
    let command = state.controller().command();
    fixture_side(&command.state(), &team_id)?;

    command.dispatch(Action::UpdateStats(StatsUpdateRequest { team_id, stats }));
    Ok(ActionResponse::new("stats updated"))
}

/// Edit presentation fields of a team playing this match.
pub fn update_team(
    state: &SharedState,
    team_id: String,
    request: UpdateTeamRequest,
) -> Result<ActionResponse, ServiceError> {
    let command = state.controller().command();
    fixture_side(&command.state(), &team_id)?;

    command.dispatch(Action::UpdateTeamConfig(TeamConfigUpdate {
        team_id,
        updates: request.0,
    }));
    Ok(ActionResponse::new("team updated"))
}

/// Start a new fixture with two catalog teams. Scores and history are reset.
pub fn set_teams(
    state: &SharedState,
    request: SetTeamsRequest,
) -> Result<ActionResponse, ServiceError> {
    let SetTeamsRequest { home_id, away_id } = request;
    if home_id == away_id {
        return Err(ServiceError::InvalidInput(
            "home and away teams must differ".into(),
        ));
    }

    let lookup = |id: &str| {
        state
            .catalog()
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("team `{id}` not found")))
    };
    let home = lookup(&home_id)?;
    let away = lookup(&away_id)?;

    info!(home = %home.id, away = %away.id, "starting new fixture");
    state
        .controller()
        .dispatch(Action::SetTeams(SetTeams { home, away }));
    Ok(ActionResponse::new(format!("{home_id} vs {away_id}")))
}

/// Update the tournament banner or the ticker message.
pub fn update_match(state: &SharedState, update: MatchConfigUpdate) -> ActionResponse {
    state.controller().dispatch(Action::UpdateMatchConfig(update));
    ActionResponse::new("match updated")
}

/// Show or hide one graphic.
pub fn toggle_overlay(state: &SharedState, flag: OverlayFlag) -> ActionResponse {
    let command = state.controller().command();
    command.dispatch(Action::ToggleOverlay(flag));
    let shown = command.state().overlay.flag(flag);
    ActionResponse::new(if shown { "shown" } else { "hidden" })
}

/// Score a goal: score, shots and shots on target all go up by one, then the
/// goal graphic is shown.
pub fn goal(state: &SharedState, request: GoalRequest) -> Result<EventResponse, ServiceError> {
    let GoalRequest { team_id, player_id } = request;
    let command = state.controller().command();
    let current = command.state();
    let side = fixture_side(&current, &team_id)?;
    let scorer = roster_player(&current, side, player_id.as_deref(), DEFAULT_SCORER_INDEX)?;

    let stats = current.stats(side);
    command.dispatch(Action::SetScore(SetScore {
        team_id: team_id.clone(),
        score: i64::from(current.score(side)) + 1,
    }));
    command.dispatch(Action::UpdateStats(StatsUpdateRequest {
        team_id: team_id.clone(),
        stats: StatsUpdate {
            shots: Some(stats.shots.saturating_add(1)),
            shots_on_target: Some(stats.shots_on_target.saturating_add(1)),
            ..StatsUpdate::default()
        },
    }));

    let event = MatchEvent {
        player: scorer,
        ..new_event(EventType::Goal, team_id, &current)
    };
    Ok(emit(&command, event))
}

/// Book a player with a yellow or red card.
pub fn card(state: &SharedState, request: CardRequest) -> Result<EventResponse, ServiceError> {
    let CardRequest {
        team_id,
        color,
        player_id,
    } = request;
    let command = state.controller().command();
    let current = command.state();
    let side = fixture_side(&current, &team_id)?;
    let booked = roster_player(&current, side, player_id.as_deref(), DEFAULT_BOOKED_INDEX)?;

    let kind = match color {
        CardColor::Yellow => EventType::YellowCard,
        CardColor::Red => EventType::RedCard,
    };
    let event = MatchEvent {
        player: booked,
        ..new_event(kind, team_id, &current)
    };
    Ok(emit(&command, event))
}

/// Show a substitution.
pub fn substitution(
    state: &SharedState,
    request: SubstitutionRequest,
) -> Result<EventResponse, ServiceError> {
    let SubstitutionRequest {
        team_id,
        player_in_id,
        player_out_id,
    } = request;
    let command = state.controller().command();
    let current = command.state();
    let side = fixture_side(&current, &team_id)?;
    let player_in = roster_player(
        &current,
        side,
        player_in_id.as_deref(),
        DEFAULT_PLAYER_IN_INDEX,
    )?;
    let player_out = roster_player(
        &current,
        side,
        player_out_id.as_deref(),
        DEFAULT_PLAYER_OUT_INDEX,
    )?;

    let event = MatchEvent {
        player_in,
        player_out,
        ..new_event(EventType::Substitution, team_id, &current)
    };
    Ok(emit(&command, event))
}

/// Show a VAR review. A review with a verdict is cleared sooner than one in progress.
pub fn var_review(state: &SharedState, request: VarRequest) -> Result<EventResponse, ServiceError> {
    let VarRequest { team_id, verdict } = request;
    let command = state.controller().command();
    let current = command.state();
    fixture_side(&current, &team_id)?;

    let event = MatchEvent {
        description: verdict.filter(|text| !text.trim().is_empty()),
        ..new_event(EventType::Var, team_id, &current)
    };
    Ok(emit(&command, event))
}

/// Show a penalty outcome. A converted penalty also scores.
pub fn penalty(
    state: &SharedState,
    request: PenaltyRequest,
) -> Result<EventResponse, ServiceError> {
    let PenaltyRequest { team_id, result } = request;
    let command = state.controller().command();
    let current = command.state();
    let side = fixture_side(&current, &team_id)?;

    if result == PenaltyResult::Goal {
        command.dispatch(Action::SetScore(SetScore {
            team_id: team_id.clone(),
            score: i64::from(current.score(side)) + 1,
        }));
    }

    let event = MatchEvent {
        description: Some(result.as_str().into()),
        ..new_event(EventType::Penalty, team_id, &current)
    };
    Ok(emit(&command, event))
}

/// Hide the active event now.
pub fn clear_active_event(state: &SharedState) -> ActionResponse {
    state.controller().clear_event();
    ActionResponse::new("event cleared")
}

fn emit(command: &Command<'_>, event: MatchEvent) -> EventResponse {
    info!(event_id = %event.id, kind = ?event.kind, team_id = %event.team_id, "triggering event");
    command.trigger_event(event.clone());
    EventResponse { event }
}

fn fixture_side(current: &MatchState, team_id: &str) -> Result<Side, ServiceError> {
    current.side_of(team_id).ok_or_else(|| {
        ServiceError::NotFound(format!("team `{team_id}` is not playing this match"))
    })
}

/// Resolve a named player, or fall back to a fixed roster slot when none is named.
///
/// A short roster simply yields no player for the fallback slot.
fn roster_player(
    current: &MatchState,
    side: Side,
    player_id: Option<&str>,
    fallback_index: usize,
) -> Result<Option<Player>, ServiceError> {
    let team = current.team(side);
    match player_id {
        Some(id) => team
            .player(id)
            .cloned()
            .map(Some)
            .ok_or_else(|| ServiceError::NotFound(format!("player `{id}` not in {}", team.id))),
        None => Ok(team.players.get(fallback_index).cloned()),
    }
}

fn new_event(kind: EventType, team_id: String, current: &MatchState) -> MatchEvent {
    MatchEvent {
        id: Uuid::new_v4().to_string(),
        kind,
        team_id,
        minute: current.timer.minutes,
        player: None,
        player_in: None,
        player_out: None,
        description: None,
        timestamp: unix_millis(),
    }
}

fn unix_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(nanos).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Barrier},
        time::Duration,
    };

    use tokio::time::sleep;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    fn app() -> SharedState {
        AppState::new(AppConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn goal_scores_counts_shots_and_shows_event() {
        let state = app();
        let response = goal(
            &state,
            GoalRequest {
                team_id: "rma".into(),
                player_id: None,
            },
        )
        .unwrap();

        let current = snapshot(&state);
        assert_eq!(current.home_score, 1);
        assert_eq!(current.home_stats.shots, 1);
        assert_eq!(current.home_stats.shots_on_target, 1);
        assert_eq!(current.events[0].id, response.event.id);
        assert_eq!(
            response.event.player.as_ref().map(|p| p.name.as_str()),
            Some("Vinícius Jr.")
        );
        assert_eq!(
            current.overlay.active_event.map(|e| e.kind),
            Some(EventType::Goal)
        );

        sleep(Duration::from_secs(9)).await;
        let current = snapshot(&state);
        assert!(current.overlay.active_event.is_none());
        assert_eq!(current.events.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn goal_with_named_scorer() {
        let state = app();
        let response = goal(
            &state,
            GoalRequest {
                team_id: "bar".into(),
                player_id: Some("bar-9".into()),
            },
        )
        .unwrap();
        assert_eq!(response.event.player.unwrap().name, "Lamine Yamal");
        assert_eq!(snapshot(&state).away_score, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_player_is_not_found_and_changes_nothing() {
        let state = app();
        let err = goal(
            &state,
            GoalRequest {
                team_id: "rma".into(),
                player_id: Some("nobody".into()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(snapshot(&state).home_score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn team_outside_fixture_is_not_found() {
        let state = app();
        let err = adjust_score(
            &state,
            ScoreAdjustmentRequest {
                team_id: "psg".into(),
                delta: 1,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn score_adjustment_is_floored() {
        let state = app();
        let up = adjust_score(
            &state,
            ScoreAdjustmentRequest {
                team_id: "bar".into(),
                delta: 2,
            },
        )
        .unwrap();
        assert_eq!(up.score, 2);

        let down = adjust_score(
            &state,
            ScoreAdjustmentRequest {
                team_id: "bar".into(),
                delta: -5,
            },
        )
        .unwrap();
        assert_eq!(down.score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn card_books_default_player_and_counts() {
        let state = app();
        let response = card(
            &state,
            CardRequest {
                team_id: "bar".into(),
                color: CardColor::Red,
                player_id: None,
            },
        )
        .unwrap();

        assert_eq!(response.event.kind, EventType::RedCard);
        assert_eq!(response.event.player.unwrap().name, "Araújo");
        assert_eq!(snapshot(&state).away_stats.red_cards, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn substitution_uses_default_slots() {
        let state = app();
        let response = substitution(
            &state,
            SubstitutionRequest {
                team_id: "rma".into(),
                player_in_id: None,
                player_out_id: None,
            },
        )
        .unwrap();
        assert_eq!(response.event.player_in.unwrap().name, "Mbappé");
        assert_eq!(response.event.player_out.unwrap().name, "Rodrygo");
    }

    #[tokio::test(start_paused = true)]
    async fn penalty_scores_only_when_converted() {
        let state = app();
        penalty(
            &state,
            PenaltyRequest {
                team_id: "rma".into(),
                result: PenaltyResult::Saved,
            },
        )
        .unwrap();
        assert_eq!(snapshot(&state).home_score, 0);

        let response = penalty(
            &state,
            PenaltyRequest {
                team_id: "rma".into(),
                result: PenaltyResult::Goal,
            },
        )
        .unwrap();
        assert_eq!(snapshot(&state).home_score, 1);
        assert_eq!(response.event.description.as_deref(), Some("GOAL"));
    }

    #[tokio::test(start_paused = true)]
    async fn var_in_progress_stays_until_cleared() {
        let state = app();
        var_review(
            &state,
            VarRequest {
                team_id: "rma".into(),
                verdict: None,
            },
        )
        .unwrap();

        sleep(Duration::from_secs(60)).await;
        assert!(snapshot(&state).overlay.active_event.is_some());

        clear_active_event(&state);
        assert!(snapshot(&state).overlay.active_event.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn set_teams_resolves_catalog_ids() {
        let state = app();
        adjust_score(
            &state,
            ScoreAdjustmentRequest {
                team_id: "rma".into(),
                delta: 3,
            },
        )
        .unwrap();

        set_teams(
            &state,
            SetTeamsRequest {
                home_id: "bra".into(),
                away_id: "arg".into(),
            },
        )
        .unwrap();

        let current = snapshot(&state);
        assert_eq!(current.home_team.name, "Brazil");
        assert_eq!(current.away_team.name, "Argentina");
        assert_eq!(current.home_score, 0);

        let missing = set_teams(
            &state,
            SetTeamsRequest {
                home_id: "bra".into(),
                away_id: "xyz".into(),
            },
        );
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        let same = set_teams(
            &state,
            SetTeamsRequest {
                home_id: "bra".into(),
                away_id: "bra".into(),
            },
        );
        assert!(matches!(same, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_controls() {
        let state = app();
        set_period(&state, Period::SecondHalf);
        set_added_time(&state, 4);
        toggle_timer(&state);
        settle_for(3).await;

        let timer = snapshot(&state).timer;
        assert!(timer.is_running);
        assert_eq!(timer.seconds, 3);
        assert_eq!(timer.added_time, 4);

        toggle_timer(&state);
        settle_for(3).await;
        assert_eq!(snapshot(&state).timer.seconds, 3);

        reset_timer(&state);
        let timer = snapshot(&state).timer;
        assert_eq!((timer.minutes, timer.seconds, timer.added_time), (0, 0, 0));
        assert_eq!(timer.period, Period::SecondHalf);
    }

    async fn settle_for(seconds: u64) {
        sleep(Duration::from_millis(1)).await;
        sleep(Duration::from_secs(seconds)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn raw_actions_are_decoded_and_dispatched() {
        let state = app();
        dispatch_raw(
            &state,
            r#"{"type":"SET_SCORE","payload":{"teamId":"rma","score":-4}}"#,
        )
        .unwrap();
        assert_eq!(snapshot(&state).home_score, 0);

        dispatch_raw(&state, r#"{"type":"TOGGLE_OVERLAY","payload":"showTicker"}"#).unwrap();
        assert!(snapshot(&state).overlay.show_ticker);

        let err = dispatch_raw(&state, r#"{"type":"SET_SCORE"}"#).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn raw_events_are_auto_cleared() {
        let state = app();
        dispatch_raw(
            &state,
            r#"{"type":"TRIGGER_EVENT","payload":{"id":"y1","type":"YELLOW_CARD","teamId":"bar","minute":3,"timestamp":0}}"#,
        )
        .unwrap();
        assert!(snapshot(&state).overlay.active_event.is_some());

        sleep(Duration::from_secs(7)).await;
        assert!(snapshot(&state).overlay.active_event.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn overlay_toggle_reports_new_visibility() {
        let state = app();
        assert_eq!(toggle_overlay(&state, OverlayFlag::Lineups).message, "shown");
        assert_eq!(toggle_overlay(&state, OverlayFlag::Lineups).message, "hidden");
    }

    #[tokio::test(start_paused = true)]
    async fn teams_are_listed_in_catalog_order() {
        let teams = list_teams(&app());
        assert_eq!(teams[0].id, "rma");
        assert_eq!(teams[0].squad_size, 11);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn overlapping_goals_are_all_counted() {
        const GOALS: usize = 16;
        let state = app();
        let before = snapshot(&state);
        let barrier = Arc::new(Barrier::new(GOALS));

        let requests: Vec<_> = (0..GOALS)
            .map(|_| {
                let state = state.clone();
                let barrier = barrier.clone();
                tokio::task::spawn_blocking(move || {
                    barrier.wait();
                    goal(
                        &state,
                        GoalRequest {
                            team_id: "rma".into(),
                            player_id: None,
                        },
                    )
                })
            })
            .collect();
        for request in requests {
            request.await.unwrap().unwrap();
        }

        let after = snapshot(&state);
        let goals = GOALS as u32;
        assert_eq!(after.home_score, before.home_score + goals);
        assert_eq!(after.home_stats.shots, before.home_stats.shots + goals);
        assert_eq!(
            after.home_stats.shots_on_target,
            before.home_stats.shots_on_target + goals
        );
        assert_eq!(after.events.len(), GOALS);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn overlapping_toggles_cancel_out() {
        const TOGGLES: usize = 8;
        let state = app();
        let barrier = Arc::new(Barrier::new(TOGGLES));

        let requests: Vec<_> = (0..TOGGLES)
            .map(|_| {
                let state = state.clone();
                let barrier = barrier.clone();
                tokio::task::spawn_blocking(move || {
                    barrier.wait();
                    toggle_timer(&state)
                })
            })
            .collect();
        for request in requests {
            request.await.unwrap();
        }

        assert!(!snapshot(&state).timer.is_running);
    }
}
