//! Shared application state and the match data model.

pub mod catalog;
pub mod match_state;
pub mod reducer;

use std::sync::Arc;

use tracing::info;

use crate::{
    config::AppConfig,
    state::{catalog::TeamCatalog, match_state::MatchState},
    sync::{
        session::{AuthoritativeSession, ObserverSession},
        transport::ChannelBus,
    },
};

/// Handle to [`AppState`] cloned into every handler and task.
pub type SharedState = Arc<AppState>;

/// Central application state: the match channel, the controller session and
/// everything needed to bring a new overlay up.
pub struct AppState {
    config: Arc<AppConfig>,
    catalog: TeamCatalog,
    bus: ChannelBus,
    initial: MatchState,
    controller: AuthoritativeSession,
}

impl AppState {
    /// Build the state with the built-in team catalog.
    ///
    /// Starts the controller session, so it must be called from within a Tokio runtime.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_catalog(config, TeamCatalog::default())
    }

    /// Build the state around an explicit team catalog.
    pub fn with_catalog(config: AppConfig, catalog: TeamCatalog) -> SharedState {
        let bus = ChannelBus::new(config.channel_capacity);
        let initial = config.initial_state(&catalog);
        let controller = AuthoritativeSession::start(
            initial.clone(),
            Arc::new(bus.open(&config.channel)),
            config.session_settings(),
        );

        info!(
            channel = %config.channel,
            home = %initial.home_team.id,
            away = %initial.away_team.id,
            "controller session ready"
        );

        Arc::new(Self {
            config: Arc::new(config),
            catalog,
            bus,
            initial,
            controller,
        })
    }

    /// Configuration the service was started with.
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    /// Teams available for fixtures.
    pub fn catalog(&self) -> &TeamCatalog {
        &self.catalog
    }

    /// The single session allowed to originate actions.
    pub fn controller(&self) -> &AuthoritativeSession {
        &self.controller
    }

    /// Attach a new overlay to the match channel.
    ///
    /// The overlay starts from the kick-off document, like a freshly loaded
    /// page, and catches up through the channel.
    pub fn open_overlay(&self) -> ObserverSession {
        let endpoint = self.bus.open(&self.config.channel);
        ObserverSession::join(self.initial.clone(), &endpoint)
    }

    /// Number of sessions currently listening on the match channel.
    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count(&self.config.channel)
    }

    /// Stop the controller's background tasks.
    pub fn shutdown(&self) {
        self.controller.shutdown();
    }
}
