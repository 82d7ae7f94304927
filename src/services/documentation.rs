//! OpenAPI document assembled from the route annotations.

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI document for Scorecast Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::overlay::overlay_stream,
        crate::routes::control::list_teams,
        crate::routes::control::get_state,
        crate::routes::control::dispatch_action,
        crate::routes::control::toggle_timer,
        crate::routes::control::reset_timer,
        crate::routes::control::set_added_time,
        crate::routes::control::set_period,
        crate::routes::control::adjust_score,
        crate::routes::control::update_stats,
        crate::routes::control::set_teams,
        crate::routes::control::update_team,
        crate::routes::control::update_match,
        crate::routes::control::toggle_overlay,
        crate::routes::control::trigger_goal,
        crate::routes::control::trigger_card,
        crate::routes::control::trigger_substitution,
        crate::routes::control::trigger_var,
        crate::routes::control::trigger_penalty,
        crate::routes::control::clear_event,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::overlay::OverlayFrame,
            crate::dto::overlay::Layer,
            crate::state::match_state::MatchState,
            crate::state::match_state::MatchEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "teams", description = "Team catalog"),
        (name = "control", description = "Controller commands"),
        (name = "events", description = "Transient on-screen match events"),
    )
)]
/// OpenAPI document covering every route of the service.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_controller_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/control/events/goal"));
        assert!(doc.paths.paths.contains_key("/sse/overlay"));
        assert!(doc.paths.paths.contains_key("/control/teams/{id}"));
    }
}
