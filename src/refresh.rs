//! Re-fetch cadence for the active route.
//!
//! Congested or slow-moving trips change quickly and get a tight refresh
//! interval; free-flowing trips are refreshed conservatively to limit
//! request volume. Movement past a distance threshold forces a refresh
//! regardless of time, since the old geometry may no longer apply.

use chrono::{DateTime, Duration, Utc};

use crate::traffic::CongestionClass;

/// Why a refresh was (or was not) triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// Agent moved beyond the movement threshold.
    MovedFar,
    /// Congested or slow-moving trip past the tight interval.
    StaleCongested,
    /// Free-flowing trip past the conservative interval.
    StaleFreeFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshDecision {
    pub should_refresh: bool,
    pub reason: Option<RefreshReason>,
}

impl RefreshDecision {
    fn hold() -> Self {
        Self {
            should_refresh: false,
            reason: None,
        }
    }

    fn refresh(reason: RefreshReason) -> Self {
        Self {
            should_refresh: true,
            reason: Some(reason),
        }
    }
}

/// Tunable refresh thresholds.
#[derive(Debug, Clone)]
pub struct RefreshPolicy {
    /// Movement past this distance always triggers a refresh.
    pub movement_threshold_meters: f64,
    /// Interval when congested or moving slowly.
    pub congested_interval: Duration,
    /// Interval when free-flowing.
    pub free_flow_interval: Duration,
    /// Below this speed the tight interval applies even without congestion.
    pub slow_speed_kph: f64,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            movement_threshold_meters: 500.0,
            congested_interval: Duration::minutes(1),
            free_flow_interval: Duration::minutes(5),
            slow_speed_kph: 20.0,
        }
    }
}

impl RefreshPolicy {
    /// Evaluates the refresh disjunction. Pure; the caller owns resetting
    /// `last_update` when it actually initiates a fetch.
    pub fn evaluate(
        &self,
        last_update: DateTime<Utc>,
        congestion: CongestionClass,
        speed_kph: f64,
        moved_meters: f64,
        now: DateTime<Utc>,
    ) -> RefreshDecision {
        if moved_meters > self.movement_threshold_meters {
            return RefreshDecision::refresh(RefreshReason::MovedFar);
        }

        let congested = matches!(
            congestion,
            CongestionClass::Heavy | CongestionClass::Moderate
        );
        let elapsed = now.signed_duration_since(last_update);

        if congested || speed_kph < self.slow_speed_kph {
            if elapsed > self.congested_interval {
                return RefreshDecision::refresh(RefreshReason::StaleCongested);
            }
        } else if elapsed > self.free_flow_interval {
            return RefreshDecision::refresh(RefreshReason::StaleFreeFlow);
        }

        RefreshDecision::hold()
    }
}
