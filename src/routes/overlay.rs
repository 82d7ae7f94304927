//! Overlay SSE endpoint.

use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::overlay_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/overlay",
    tag = "sse",
    responses((status = 200, description = "Overlay frames stream", content_type = "text/event-stream", body = String))
)]
/// Attach a new overlay and stream its document to the rendering client.
pub async fn overlay_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    info!("New overlay SSE connection");
    overlay_service::overlay_stream(&state)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/overlay", get(overlay_stream))
}
