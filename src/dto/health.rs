use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always "ok" while the server answers.
    pub status: String,
    /// Name of the match channel.
    pub channel: String,
    /// Sessions currently attached to the match channel, the controller included.
    pub subscribers: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(channel: impl Into<String>, subscribers: usize) -> Self {
        Self {
            status: "ok".to_string(),
            channel: channel.into(),
            subscribers,
        }
    }
}
