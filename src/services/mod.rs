//! Business logic behind the HTTP handlers.

/// Controller commands turned into match actions.
pub mod control_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Per-connection overlay sessions streamed over Server-Sent Events.
pub mod overlay_service;
