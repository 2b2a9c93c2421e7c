//! Navigation session: route state, refresh cadence, fetch supersession.
//!
//! The session is single-writer: one logical stream of position samples and
//! fetch completions mutates it, and readers (rendering, camera) only see
//! whole states. Route fetches run outside the session; it hands out tickets
//! at initiation and applies a completion only while its ticket is still
//! current, so the route set always reflects the most recently initiated
//! fetch that has returned.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::directions::{RawRoute, TravelMode};
use crate::error::NavError;
use crate::geo::{self, Coordinate};
use crate::refresh::RefreshPolicy;
use crate::route::{self, RouteSet};
use crate::tracker::{LiveTracker, TrackingSample};
use crate::traffic::CongestionClass;
use crate::traits::{CameraSink, PositionSource};

/// Proof of fetch initiation. A completion is applied only if its ticket
/// still matches the session's generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug)]
pub struct NavigationSession {
    mode: TravelMode,
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
    routes: Option<RouteSet>,
    tracker: LiveTracker,
    policy: RefreshPolicy,
    /// Monotonic fetch generation; bumping it supersedes in-flight fetches.
    generation: u64,
    last_route_update: DateTime<Utc>,
    /// Agent position at the last fetch initiation, for movement tracking.
    anchor: Option<Coordinate>,
    status: Option<String>,
}

impl NavigationSession {
    pub fn new(mode: TravelMode, now: DateTime<Utc>) -> Self {
        Self {
            mode,
            origin: None,
            destination: None,
            routes: None,
            tracker: LiveTracker::new(),
            policy: RefreshPolicy::default(),
            generation: 0,
            last_route_update: now,
            anchor: None,
            status: None,
        }
    }

    pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn routes(&self) -> Option<&RouteSet> {
        self.routes.as_ref()
    }

    pub fn tracker(&self) -> &LiveTracker {
        &self.tracker
    }

    /// Last user-visible failure, cleared by the next applied route set.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Begins navigating between two points. Returns the ticket for the
    /// initial route fetch; any outstanding fetch is superseded.
    pub fn start(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
        now: DateTime<Utc>,
    ) -> FetchTicket {
        info!(?origin, ?destination, mode = self.mode.request_value(), "starting navigation");
        self.origin = Some(origin);
        self.destination = Some(destination);
        self.issue_ticket(now)
    }

    /// Switches travel mode. Returns a fetch ticket when navigation is
    /// active, since the current routes no longer match the mode.
    pub fn set_mode(&mut self, mode: TravelMode, now: DateTime<Utc>) -> Option<FetchTicket> {
        if self.mode == mode {
            return None;
        }
        self.mode = mode;
        if self.origin.is_some() && self.destination.is_some() {
            Some(self.issue_ticket(now))
        } else {
            None
        }
    }

    /// Evaluates the refresh policy against the selected route. On trigger,
    /// initiates a fetch: the last-update timestamp and movement anchor are
    /// reset immediately so an in-flight fetch cannot re-trigger.
    pub fn maybe_refresh(&mut self, now: DateTime<Utc>) -> Option<FetchTicket> {
        self.destination?;

        let congestion = self
            .routes
            .as_ref()
            .map(|set| set.selected().traffic.class)
            .unwrap_or(CongestionClass::NoData);
        let decision = self.policy.evaluate(
            self.last_route_update,
            congestion,
            self.tracker.speed_kph(),
            self.moved_meters(),
            now,
        );

        if decision.should_refresh {
            debug!(reason = ?decision.reason, "refresh triggered");
            Some(self.issue_ticket(now))
        } else {
            None
        }
    }

    /// Applies a completed fetch. Stale tickets are discarded; failures
    /// retain the previous route set and surface as a status string.
    /// Returns true when the route set was replaced.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<RawRoute>, NavError>,
        now: DateTime<Utc>,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding superseded fetch result"
            );
            return false;
        }

        let ranked = result.and_then(|raw| route::rank(&raw, self.mode));
        match ranked {
            Ok(set) => {
                info!(candidates = set.len(), "route set replaced");
                self.routes = Some(set);
                self.status = None;
                self.last_route_update = now;
                true
            }
            Err(err) => {
                warn!(%err, "route fetch failed, keeping previous routes");
                self.status = Some(err.to_string());
                false
            }
        }
    }

    /// Changes the active candidate without re-ranking or re-fetching.
    pub fn select_route(&mut self, index: usize) -> bool {
        match self.routes.as_mut() {
            Some(set) => set.select(index),
            None => false,
        }
    }

    /// Subscribes to the position source. On refusal tracking simply does
    /// not start and the error propagates.
    pub fn start_tracking(&mut self, source: &mut dyn PositionSource) -> Result<(), NavError> {
        source.start()?;
        if self.anchor.is_none() {
            self.anchor = self.tracker.state().map(|s| s.position);
        }
        Ok(())
    }

    /// Feeds one position sample through the tracker, forwarding the camera
    /// directive while follow mode is active.
    pub fn push_sample(&mut self, sample: TrackingSample, camera: &mut dyn CameraSink) {
        if self.anchor.is_none() {
            self.anchor = Some(sample.position);
        }
        if let Some(directive) = self.tracker.push(sample) {
            camera.apply(directive);
        }
    }

    pub fn set_following(&mut self, following: bool) {
        self.tracker.set_following(following);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.tracker.set_zoom(zoom);
    }

    /// Distance from the last fetch anchor to the agent's position.
    pub fn moved_meters(&self) -> f64 {
        match (self.anchor, self.tracker.state()) {
            (Some(anchor), Some(state)) => geo::haversine_meters(anchor, state.position),
            _ => 0.0,
        }
    }

    /// Ends navigation: unsubscribes from the position source, drops all
    /// derived state, and supersedes any in-flight fetch so its result is
    /// discarded on arrival.
    pub fn stop(&mut self, source: &mut dyn PositionSource) {
        info!("stopping navigation");
        source.stop();
        self.generation += 1;
        self.routes = None;
        self.origin = None;
        self.destination = None;
        self.anchor = None;
        self.status = None;
        self.tracker.reset();
    }

    fn issue_ticket(&mut self, now: DateTime<Utc>) -> FetchTicket {
        self.generation += 1;
        self.last_route_update = now;
        self.anchor = self.tracker.state().map(|s| s.position);
        FetchTicket(self.generation)
    }
}
