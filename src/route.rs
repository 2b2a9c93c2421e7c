//! Route ranking: raw provider entries into ordered, traffic-annotated
//! candidates.
//!
//! Ranking is the only place raw payloads become typed candidates. A bad
//! entry costs exactly one candidate; only a response with no drawable
//! geometry at all is an error, and the caller then keeps its prior routes.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::directions::{RawRoute, TravelMode};
use crate::error::NavError;
use crate::polyline::{self, MalformedPolyline, Polyline};
use crate::traffic::{self, SpeedInterval, TrafficSummary};

/// One ranked route alternative. Immutable once built; the whole set is
/// replaced on every re-fetch.
#[derive(Debug, Clone, Serialize)]
pub struct RouteCandidate {
    polyline: Polyline,
    pub distance_meters: u32,
    pub duration_seconds: u32,
    pub intervals: Vec<SpeedInterval>,
    pub traffic: TrafficSummary,
    pub label: String,
}

impl RouteCandidate {
    pub fn points(&self) -> &[crate::geo::Coordinate] {
        self.polyline.points()
    }
}

/// A non-empty, duration-ascending list of candidates plus the active
/// selection. The no-route state is the absence of a `RouteSet`, so a
/// constructed set always has a valid selection.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSet {
    candidates: Vec<RouteCandidate>,
    selected: usize,
}

impl RouteSet {
    pub fn candidates(&self) -> &[RouteCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &RouteCandidate {
        &self.candidates[self.selected]
    }

    /// Changes the active candidate. A pure selection change: no re-rank, no
    /// re-fetch. Returns false (selection unchanged) when out of bounds.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.candidates.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Error)]
enum CandidateError {
    #[error("route entry has no encoded polyline")]
    MissingPolyline,
    #[error(transparent)]
    Malformed(#[from] MalformedPolyline),
    #[error("decoded geometry has {0} points, need at least 2")]
    TooFewPoints(usize),
    #[error("route entry has no distance")]
    MissingDistance,
}

/// Ranks raw routes into a `RouteSet`.
///
/// Entries are stable-sorted ascending by parsed duration, then built into
/// candidates in order. Entries that fail to build are dropped; if every
/// entry fails, a best-effort candidate with no traffic data is built from
/// the first raw route so a degraded route is still preferred over none.
pub fn rank(raw_routes: &[RawRoute], mode: TravelMode) -> Result<RouteSet, NavError> {
    if raw_routes.is_empty() {
        return Err(NavError::EmptyRouteSet);
    }

    let mut sorted: Vec<&RawRoute> = raw_routes.iter().collect();
    sorted.sort_by_key(|raw| parse_duration_seconds(raw.duration.as_deref()));

    let mut candidates = Vec::with_capacity(sorted.len());
    for (position, raw) in sorted.iter().enumerate() {
        match build_candidate(raw, position, mode) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => {
                warn!(position, %err, "dropping route candidate");
            }
        }
    }

    if candidates.is_empty() {
        warn!("all route candidates failed, building best-effort fallback");
        candidates.push(fallback_candidate(&raw_routes[0], mode)?);
    }

    Ok(RouteSet {
        candidates,
        selected: 0,
    })
}

/// Parses a `"<integer>s"` duration string. Any other shape parses to 0
/// seconds so a single odd value cannot fail the whole sort.
pub fn parse_duration_seconds(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.strip_suffix('s'))
        .and_then(|digits| digits.parse::<u32>().ok())
        .unwrap_or(0)
}

fn decode_geometry(raw: &RawRoute) -> Result<Polyline, CandidateError> {
    let encoded = raw
        .polyline
        .as_ref()
        .and_then(|p| p.encoded_polyline.as_deref())
        .ok_or(CandidateError::MissingPolyline)?;
    let geometry = polyline::decode(encoded)?;
    if geometry.len() < 2 {
        return Err(CandidateError::TooFewPoints(geometry.len()));
    }
    Ok(geometry)
}

fn build_candidate(
    raw: &RawRoute,
    position: usize,
    mode: TravelMode,
) -> Result<RouteCandidate, CandidateError> {
    let geometry = decode_geometry(raw)?;
    let distance_meters = raw.distance_meters.ok_or(CandidateError::MissingDistance)?;

    let intervals: Vec<SpeedInterval> = raw
        .travel_advisory
        .speed_reading_intervals
        .iter()
        .map(|raw_interval| raw_interval.to_interval(geometry.len()))
        .collect();
    let traffic = traffic::score(&intervals);

    Ok(RouteCandidate {
        polyline: geometry,
        distance_meters,
        duration_seconds: parse_duration_seconds(raw.duration.as_deref()),
        intervals,
        traffic,
        label: format!("Route {} - {}", position + 1, mode.display_name()),
    })
}

/// Degraded candidate used when every entry failed validation: geometry from
/// the first raw route, no intervals, no traffic data. If even this entry's
/// polyline cannot be decoded there is nothing drawable and the set is empty.
fn fallback_candidate(raw: &RawRoute, mode: TravelMode) -> Result<RouteCandidate, NavError> {
    let geometry = decode_geometry(raw).map_err(|err| match err {
        CandidateError::Malformed(inner) => NavError::MalformedPolyline(inner),
        _ => NavError::EmptyRouteSet,
    })?;

    Ok(RouteCandidate {
        polyline: geometry,
        distance_meters: raw.distance_meters.unwrap_or(0),
        duration_seconds: parse_duration_seconds(raw.duration.as_deref()),
        intervals: Vec::new(),
        traffic: TrafficSummary::no_data(),
        label: format!("Route 1 - {}", mode.display_name()),
    })
}
