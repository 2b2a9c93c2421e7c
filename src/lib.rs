//! nav-planner core
//!
//! Live-navigation building blocks: polyline decoding, traffic congestion
//! scoring, route ranking, refresh cadence, and position tracking with
//! camera following. Rendering, place search, and platform services stay
//! behind the seams in [`traits`].

pub mod directions;
pub mod error;
pub mod geo;
pub mod polyline;
pub mod recents;
pub mod refresh;
pub mod route;
pub mod session;
pub mod tracker;
pub mod traffic;
pub mod traits;
