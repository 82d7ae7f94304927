//! Application-level configuration loading: channel, timing and fixture defaults.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    state::{catalog::TeamCatalog, match_state::MatchState},
    sync::{clock::ClearDelays, session::SessionSettings},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCORECAST_BACK_CONFIG_PATH";

const DEFAULT_CHANNEL: &str = "football_scoreboard_v1";
const DEFAULT_CHANNEL_CAPACITY: usize = 256;
const DEFAULT_TOURNAMENT: &str = "UEFA CHAMPIONS LEAGUE";
const DEFAULT_HOME_TEAM: &str = "rma";
const DEFAULT_AWAY_TEAM: &str = "bar";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Name of the channel every session of this match attaches to.
    pub channel: String,
    /// Per-subscriber backlog before a slow overlay starts dropping messages.
    pub channel_capacity: usize,
    /// Period of the match clock.
    pub tick_period: Duration,
    /// Period of the controller's full-state sync.
    pub sync_period: Duration,
    /// How long each kind of event stays on screen.
    pub clear_delays: ClearDelays,
    /// Banner shown on the scorebug at kick-off.
    pub tournament_name: String,
    /// Catalog id of the home team at kick-off.
    pub home_team: String,
    /// Catalog id of the away team at kick-off.
    pub away_team: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        channel = %config.channel,
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document. Absent keys take their default value.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Timing settings for the controller session.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            tick_period: self.tick_period,
            sync_period: self.sync_period,
            clear_delays: self.clear_delays.clone(),
        }
    }

    /// Document every session starts from: the configured fixture at kick-off.
    ///
    /// A team id missing from the catalog falls back to the first (home) or
    /// second (away) catalog entry.
    pub fn initial_state(&self, catalog: &TeamCatalog) -> MatchState {
        let pick = |id: &str, fallback: usize| {
            catalog
                .get(id)
                .or_else(|| {
                    warn!(team_id = id, "configured team not in catalog; using fallback");
                    catalog.iter().nth(fallback)
                })
                .cloned()
                .unwrap_or_default()
        };

        MatchState::initial(
            pick(&self.home_team, 0),
            pick(&self.away_team, 1),
            self.tournament_name.clone(),
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    channel: Option<String>,
    channel_capacity: Option<usize>,
    tick_period_ms: Option<u64>,
    sync_period_ms: Option<u64>,
    clear_delays: RawClearDelays,
    tournament_name: Option<String>,
    home_team: Option<String>,
    away_team: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Auto-clear delays in seconds.
struct RawClearDelays {
    card: Option<u64>,
    goal: Option<u64>,
    substitution: Option<u64>,
    penalty: Option<u64>,
    var_check: Option<u64>,
    var_decision: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let period = |ms: Option<u64>| {
            ms.filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_secs(1))
        };

        Self {
            channel: value
                .channel
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CHANNEL.into()),
            channel_capacity: value
                .channel_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_CHANNEL_CAPACITY),
            tick_period: period(value.tick_period_ms),
            sync_period: period(value.sync_period_ms),
            clear_delays: value.clear_delays.into(),
            tournament_name: value
                .tournament_name
                .unwrap_or_else(|| DEFAULT_TOURNAMENT.into()),
            home_team: value
                .home_team
                .unwrap_or_else(|| DEFAULT_HOME_TEAM.into()),
            away_team: value
                .away_team
                .unwrap_or_else(|| DEFAULT_AWAY_TEAM.into()),
        }
    }
}

impl From<RawClearDelays> for ClearDelays {
    fn from(value: RawClearDelays) -> Self {
        let defaults = ClearDelays::default();
        let secs = |raw: Option<u64>, fallback: Duration| {
            raw.map(Duration::from_secs).unwrap_or(fallback)
        };

        Self {
            card: secs(value.card, defaults.card),
            goal: secs(value.goal, defaults.goal),
            substitution: secs(value.substitution, defaults.substitution),
            penalty: secs(value.penalty, defaults.penalty),
            var_check: secs(value.var_check, defaults.var_check),
            var_decision: secs(value.var_decision, defaults.var_decision),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.channel, "football_scoreboard_v1");
        assert_eq!(config.channel_capacity, 256);
        assert_eq!(config.tick_period, Duration::from_secs(1));
        assert_eq!(config.sync_period, Duration::from_secs(1));
        assert_eq!(config.clear_delays, ClearDelays::default());
        assert_eq!(config.tournament_name, "UEFA CHAMPIONS LEAGUE");
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = AppConfig::from_json(
            r#"{
                "channel": "final_2025",
                "syncPeriodMs": 250,
                "clearDelays": { "goal": 12 },
                "homeTeam": "psg"
            }"#,
        )
        .unwrap();

        assert_eq!(config.channel, "final_2025");
        assert_eq!(config.sync_period, Duration::from_millis(250));
        assert_eq!(config.tick_period, Duration::from_secs(1));
        assert_eq!(config.clear_delays.goal, Duration::from_secs(12));
        assert_eq!(config.clear_delays.card, Duration::from_secs(6));
        assert_eq!(config.home_team, "psg");
        assert_eq!(config.away_team, "bar");
    }

    #[test]
    fn degenerate_values_fall_back() {
        let config =
            AppConfig::from_json(r#"{"channel": " ", "channelCapacity": 0, "tickPeriodMs": 0}"#)
                .unwrap();
        assert_eq!(config.channel, "football_scoreboard_v1");
        assert_eq!(config.channel_capacity, 256);
        assert_eq!(config.tick_period, Duration::from_secs(1));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(AppConfig::from_json(r#"{"channelCapacity": "lots"}"#).is_err());
    }

    #[test]
    fn initial_state_uses_configured_fixture() {
        let catalog = TeamCatalog::default();
        let state = AppConfig::default().initial_state(&catalog);
        assert_eq!(state.home_team.name, "Real Madrid");
        assert_eq!(state.away_team.name, "FC Barcelona");
        assert_eq!(state.home_stats.possession, 50.0);
        assert!(state.overlay.show_scoreboard);
        assert!(state.overlay.show_sponsor);
    }

    #[test]
    fn unknown_configured_team_falls_back_to_catalog_order() {
        let catalog = TeamCatalog::default();
        let config = AppConfig {
            away_team: "nowhere".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.initial_state(&catalog).away_team.id, "bar");
    }

    #[test]
    fn session_settings_mirror_config() {
        let config = AppConfig::from_json(r#"{"tickPeriodMs": 500}"#).unwrap();
        let settings = config.session_settings();
        assert_eq!(settings.tick_period, Duration::from_millis(500));
        assert_eq!(settings.clear_delays, config.clear_delays);
    }
}
