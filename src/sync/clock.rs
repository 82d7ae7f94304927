//! Match clock arithmetic and on-screen lifetimes of transient events.

use std::time::Duration;

use crate::{
    state::match_state::{EventType, MatchEvent, MatchTimer},
    state::reducer::TimerUpdate,
};

/// Advance the clock by one second, rolling 60 seconds over into a minute.
pub fn next_tick(timer: &MatchTimer) -> TimerUpdate {
    let mut minutes = timer.minutes;
    let mut seconds = timer.seconds.saturating_add(1);
    if seconds >= 60 {
        seconds = 0;
        minutes = minutes.saturating_add(1);
    }

    TimerUpdate {
        minutes: Some(minutes),
        seconds: Some(seconds),
        ..TimerUpdate::default()
    }
}

/// How long each kind of event stays on screen before it is cleared automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearDelays {
    /// Yellow and red cards.
    pub card: Duration,
    /// Goals.
    pub goal: Duration,
    /// Substitutions.
    pub substitution: Duration,
    /// Penalty outcomes.
    pub penalty: Duration,
    /// VAR review still in progress (no verdict in the description).
    pub var_check: Duration,
    /// VAR review with a verdict.
    pub var_decision: Duration,
}

impl Default for ClearDelays {
    fn default() -> Self {
        Self {
            card: Duration::from_secs(6),
            goal: Duration::from_secs(8),
            substitution: Duration::from_secs(8),
            penalty: Duration::from_secs(8),
            var_check: Duration::from_secs(120),
            var_decision: Duration::from_secs(10),
        }
    }
}

impl ClearDelays {
    /// Lifetime of `event` on screen.
    pub fn delay_for(&self, event: &MatchEvent) -> Duration {
        match event.kind {
            EventType::YellowCard | EventType::RedCard => self.card,
            EventType::Goal => self.goal,
            EventType::Substitution => self.substitution,
            EventType::Penalty => self.penalty,
            EventType::Var if has_verdict(event) => self.var_decision,
            EventType::Var => self.var_check,
        }
    }
}

fn has_verdict(event: &MatchEvent) -> bool {
    event
        .description
        .as_deref()
        .is_some_and(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::match_state::Period;

    fn timer(minutes: u32, seconds: u32) -> MatchTimer {
        MatchTimer {
            minutes,
            seconds,
            is_running: true,
            added_time: 0,
            period: Period::FirstHalf,
        }
    }

    fn event(kind: EventType, description: Option<&str>) -> MatchEvent {
        MatchEvent {
            id: "e".into(),
            kind,
            team_id: "rma".into(),
            minute: 0,
            player: None,
            player_in: None,
            player_out: None,
            description: description.map(Into::into),
            timestamp: 0,
        }
    }

    #[test]
    fn tick_increments_seconds() {
        let update = next_tick(&timer(10, 15));
        assert_eq!(update.minutes, Some(10));
        assert_eq!(update.seconds, Some(16));
        assert_eq!(update.is_running, None);
        assert_eq!(update.period, None);
    }

    #[test]
    fn tick_rolls_over_into_next_minute() {
        let update = next_tick(&timer(1, 59));
        assert_eq!(update.minutes, Some(2));
        assert_eq!(update.seconds, Some(0));
    }

    #[test]
    fn minutes_have_no_match_length_cap() {
        let update = next_tick(&timer(130, 59));
        assert_eq!(update.minutes, Some(131));
    }

    #[test]
    fn delays_depend_on_event_type() {
        let delays = ClearDelays::default();
        assert_eq!(
            delays.delay_for(&event(EventType::YellowCard, None)),
            Duration::from_secs(6)
        );
        assert_eq!(
            delays.delay_for(&event(EventType::RedCard, None)),
            Duration::from_secs(6)
        );
        assert_eq!(
            delays.delay_for(&event(EventType::Goal, None)),
            Duration::from_secs(8)
        );
        assert_eq!(
            delays.delay_for(&event(EventType::Penalty, Some("SAVED"))),
            Duration::from_secs(8)
        );
    }

    #[test]
    fn var_check_outlives_var_decision() {
        let delays = ClearDelays::default();
        assert_eq!(
            delays.delay_for(&event(EventType::Var, None)),
            Duration::from_secs(120)
        );
        assert_eq!(
            delays.delay_for(&event(EventType::Var, Some(" "))),
            Duration::from_secs(120)
        );
        assert_eq!(
            delays.delay_for(&event(EventType::Var, Some("NO GOAL"))),
            Duration::from_secs(10)
        );
    }
}
