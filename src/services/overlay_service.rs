//! Server-sent event streams feeding the overlay renderer.

use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::{
    dto::{overlay::OverlayFrame, sse::ServerEvent},
    state::SharedState,
    sync::session::{MatchSession, ObserverSession},
};

const FRAME_EVENT: &str = "frame";

/// Attach a new overlay session and stream its document as `frame` events.
///
/// The session lives exactly as long as the client connection.
pub fn overlay_stream(
    state: &SharedState,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + use<>> {
    let frames = frames(state.open_overlay());
    let stream = frames.map(|payload| Ok(Event::from(payload)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Forward every change of `session` as a serialised [`OverlayFrame`], starting
/// with the current document.
///
/// The session is dropped, and thereby unsubscribed, once the receiving side goes away.
pub fn frames(session: ObserverSession) -> ReceiverStream<ServerEvent> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<ServerEvent>(8);

    tokio::spawn(async move {
        let mut changes = session.watch();
        loop {
            let frame = OverlayFrame::from(changes.borrow_and_update().clone());
            match ServerEvent::json(Some(FRAME_EVENT.to_string()), &frame) {
                Ok(payload) => {
                    if tx.send(payload).await.is_err() {
                        break;
                    }
                }
                Err(err) => warn!(error = %err, "failed to serialise overlay frame"),
            }

            tokio::select! {
                _ = tx.closed() => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        drop(session);
        info!("overlay SSE stream disconnected");
    });

    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use tokio::time::sleep;

    use super::*;
    use crate::{
        config::AppConfig,
        services::control_service,
        state::{AppState, match_state::OverlayFlag},
    };

    async fn next_frame(frames: &mut ReceiverStream<ServerEvent>) -> Value {
        let payload = frames.next().await.unwrap();
        assert_eq!(payload.event.as_deref(), Some(FRAME_EVENT));
        serde_json::from_str(&payload.data).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn first_frame_is_kick_off_document() {
        let state = AppState::new(AppConfig::default());
        let mut frames = frames(state.open_overlay());

        let frame = next_frame(&mut frames).await;
        assert_eq!(frame["state"]["homeTeam"]["id"], "rma");
        assert_eq!(frame["layers"], serde_json::json!(["SCOREBUG", "SPONSOR"]));
    }

    #[tokio::test(start_paused = true)]
    async fn controller_changes_reach_the_overlay() {
        let state = AppState::new(AppConfig::default());
        let mut frames = frames(state.open_overlay());
        next_frame(&mut frames).await;

        control_service::toggle_overlay(&state, OverlayFlag::Stats);
        let frame = next_frame(&mut frames).await;

        assert_eq!(frame["state"]["overlay"]["showStats"], true);
        assert_eq!(
            frame["layers"],
            serde_json::json!(["STATS_BOARD", "SPONSOR"])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn late_overlay_catches_up_through_sync() {
        let state = AppState::new(AppConfig::default());
        control_service::toggle_overlay(&state, OverlayFlag::Ticker);
        sleep(Duration::from_millis(1)).await;

        let mut frames = frames(state.open_overlay());
        let first = next_frame(&mut frames).await;
        assert_eq!(first["state"]["overlay"]["showTicker"], false);

        let synced = next_frame(&mut frames).await;
        assert_eq!(synced["state"]["overlay"]["showTicker"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_releases_the_session() {
        let state = AppState::new(AppConfig::default());
        sleep(Duration::from_millis(1)).await;
        let baseline = state.subscriber_count();

        let frames = frames(state.open_overlay());
        assert_eq!(state.subscriber_count(), baseline + 1);

        drop(frames);
        sleep(Duration::from_millis(1)).await;
        assert_eq!(state.subscriber_count(), baseline);
    }
}
