use serde::Serialize;
use utoipa::ToSchema;

use crate::state::match_state::{MatchState, OverlayState};

/// One graphic of the broadcast overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    Intro,
    StatsBoard,
    Lineups,
    Formation,
    Scorebug,
    Ticker,
    Sponsor,
    LowerThird,
    ActiveEvent,
}

/// Graphics to draw for `overlay`, bottom-most first.
///
/// Any combination of flags may be set at once. The scorebug gives way to the
/// lineups and the stats board; every other graphic is drawn whenever its flag
/// is on.
pub fn visible_layers(overlay: &OverlayState) -> Vec<Layer> {
    let scorebug = overlay.show_scoreboard && !overlay.show_lineups && !overlay.show_stats;

    [
        (overlay.show_intro, Layer::Intro),
        (overlay.show_stats, Layer::StatsBoard),
        (overlay.show_lineups, Layer::Lineups),
        (overlay.show_formation, Layer::Formation),
        (scorebug, Layer::Scorebug),
        (overlay.show_ticker, Layer::Ticker),
        (overlay.show_sponsor, Layer::Sponsor),
        (overlay.show_lower_third, Layer::LowerThird),
        (overlay.active_event.is_some(), Layer::ActiveEvent),
    ]
    .into_iter()
    .filter_map(|(shown, layer)| shown.then_some(layer))
    .collect()
}

/// Frame pushed to overlay clients every time their document changes.
#[derive(Debug, Serialize, ToSchema)]
pub struct OverlayFrame {
    pub state: MatchState,
    /// Graphics to draw, bottom-most first.
    pub layers: Vec<Layer>,
}

impl From<MatchState> for OverlayFrame {
    fn from(state: MatchState) -> Self {
        let layers = visible_layers(&state.overlay);
        Self { state, layers }
    }
}
