//! Test fixtures for nav-planner.
//!
//! Provides raw-route builders with sensible defaults and a polyline5
//! encoder so tests can fabricate provider payloads without canned strings.

pub mod raw_routes;

#[allow(unused_imports)]
pub use raw_routes::*;
