//! Liveness reporting.

use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report liveness along with how many sessions share the match channel.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let config = state.config();
    let subscribers = state.subscriber_count();
    debug!(channel = %config.channel, subscribers, "health check");
    HealthResponse::ok(config.channel.clone(), subscribers)
}
