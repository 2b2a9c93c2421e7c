//! Crate-wide error taxonomy.
//!
//! Parsing failures inside a single route candidate are recovered locally
//! (the candidate is dropped); everything here is surfaced to the caller,
//! who keeps the last known good state.

use thiserror::Error;

use crate::polyline::MalformedPolyline;

#[derive(Debug, Error)]
pub enum NavError {
    /// The directions provider returned zero routes. The caller must keep
    /// its prior route set rather than replace it with an empty one.
    #[error("directions response contained no usable routes")]
    EmptyRouteSet,

    #[error("polyline decode failed: {0}")]
    MalformedPolyline(#[from] MalformedPolyline),

    /// The directions request exceeded its deadline.
    #[error("directions request timed out")]
    FetchTimeout,

    /// Any non-timeout transport failure (connection refused, bad status,
    /// unparsable body).
    #[error("directions request failed: {0}")]
    FetchTransport(String),

    /// The host platform refused access to the position source. Tracking
    /// simply does not start.
    #[error("location permission denied")]
    PermissionDenied,
}
