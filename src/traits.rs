//! Boundary seams for the navigation core.
//!
//! These are intentionally minimal and collaborator-agnostic. The core never
//! renders, stores, or listens to hardware itself; hosts implement these for
//! their own platform services.

use crate::directions::{RawRoute, TravelMode};
use crate::error::NavError;
use crate::geo::Coordinate;
use crate::tracker::CameraDirective;

/// Fetches raw route alternatives between two points.
///
/// Implementations own transport, authentication, and timeouts. A response
/// with zero routes is returned as-is; ranking decides what that means.
pub trait DirectionsProvider {
    fn fetch_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Vec<RawRoute>, NavError>;
}

/// A push stream of position fixes.
///
/// `start` fails with [`NavError::PermissionDenied`] when the host refuses
/// location access; the stream may stop and restart, and gaps between
/// samples are expected.
pub trait PositionSource {
    fn start(&mut self) -> Result<(), NavError>;
    fn stop(&mut self);
}

/// Receives camera directives while follow mode is active.
///
/// The core only emits directives; applying them (animation, projection) is
/// the host's concern.
pub trait CameraSink {
    fn apply(&mut self, directive: CameraDirective);
}

/// Opaque key-to-string persistence for small bits of session state
/// (recent destinations, saved places). Storage I/O lives with the host.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: String);
}
