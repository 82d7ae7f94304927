//! HTTP surface of the service.

use axum::Router;

use crate::state::SharedState;

pub mod control;
pub mod docs;
pub mod health;
pub mod overlay;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(overlay::router())
        .merge(control::router())
        .merge(docs::router())
        .with_state(state)
}
