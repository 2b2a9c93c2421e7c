//! Live position tracking and camera following.
//!
//! Consumes position samples strictly in arrival order, derives speed and
//! bearing, and replaces the agent state as one value per sample so a reader
//! never pairs a bearing with a position it was not computed from. While
//! follow mode is on, each update also yields a camera directive framed for
//! a driving perspective.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::{self, Coordinate};

/// Camera target trails the agent by this many meters along its heading, so
/// the marker sits below map-center instead of dead center.
const CAMERA_TRAIL_METERS: f64 = 50.0;
const CAMERA_TILT_DEGREES: f64 = 45.0;
const DEFAULT_ZOOM: f64 = 17.0;

/// Below this displacement a fix is treated as stationary and the previous
/// bearing is retained; GPS jitter at rest would otherwise spin the camera.
const MIN_BEARING_DISTANCE_METERS: f64 = 0.5;

/// One raw position fix from the host's location source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingSample {
    pub position: Coordinate,
    /// Device compass heading, when the platform provides one.
    pub heading_hint: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Derived agent state. Replaced wholesale on every accepted sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentState {
    pub position: Coordinate,
    /// Degrees [0, 360); 0 only as the true initial default.
    pub bearing_degrees: f64,
    pub speed_kph: f64,
    pub last_update: DateTime<Utc>,
}

/// Instruction for the host's camera sink. The core never renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraDirective {
    pub target: Coordinate,
    pub zoom: f64,
    pub bearing_degrees: f64,
    pub tilt_degrees: f64,
}

/// Tracks the moving agent through an append-only sample stream.
///
/// Follow mode and zoom are owned by the host (toggled by pan/zoom gestures)
/// and only consulted here; the tracker never resets them.
#[derive(Debug, Clone)]
pub struct LiveTracker {
    state: Option<AgentState>,
    following: bool,
    zoom: f64,
}

impl Default for LiveTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveTracker {
    pub fn new() -> Self {
        Self {
            state: None,
            following: true,
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn state(&self) -> Option<&AgentState> {
        self.state.as_ref()
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn set_following(&mut self, following: bool) {
        self.following = following;
    }

    /// Records the zoom the user last chose; directives echo it back.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Current speed, 0 before any sample has arrived.
    pub fn speed_kph(&self) -> f64 {
        self.state.map(|s| s.speed_kph).unwrap_or(0.0)
    }

    /// Drops all derived state. The next sample starts from scratch.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Ingests the next sample and, while following, returns the camera
    /// directive for the new state.
    pub fn push(&mut self, sample: TrackingSample) -> Option<CameraDirective> {
        let next = match self.state {
            None => AgentState {
                position: sample.position,
                bearing_degrees: sample.heading_hint.unwrap_or(0.0).rem_euclid(360.0),
                speed_kph: 0.0,
                last_update: sample.timestamp,
            },
            Some(prev) => Self::advance(prev, &sample),
        };

        // Atomic replacement: position, bearing, speed, timestamp together.
        self.state = Some(next);

        if self.following {
            Some(self.directive_for(&next))
        } else {
            None
        }
    }

    fn advance(prev: AgentState, sample: &TrackingSample) -> AgentState {
        let elapsed = sample
            .timestamp
            .signed_duration_since(prev.last_update)
            .num_milliseconds() as f64
            / 1000.0;
        let distance = geo::haversine_meters(prev.position, sample.position);

        // Out-of-order or duplicate timestamps keep the previous speed.
        let speed_kph = if elapsed > 0.0 {
            distance / elapsed * 3.6
        } else {
            debug!(elapsed, "non-positive sample interval, keeping speed");
            prev.speed_kph
        };

        let bearing_degrees = match sample.heading_hint {
            Some(hint) => hint.rem_euclid(360.0),
            None if distance > MIN_BEARING_DISTANCE_METERS => {
                geo::bearing_degrees(prev.position, sample.position)
            }
            None => prev.bearing_degrees,
        };

        AgentState {
            position: sample.position,
            bearing_degrees,
            speed_kph,
            last_update: sample.timestamp,
        }
    }

    fn directive_for(&self, state: &AgentState) -> CameraDirective {
        let behind = (state.bearing_degrees + 180.0).rem_euclid(360.0);
        CameraDirective {
            target: geo::offset_meters(state.position, behind, CAMERA_TRAIL_METERS),
            zoom: self.zoom,
            bearing_degrees: state.bearing_degrees,
            tilt_degrees: CAMERA_TILT_DEGREES,
        }
    }
}
