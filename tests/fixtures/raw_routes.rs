//! Builders for raw directions payload entries.

// Each integration test binary compiles its own copy of this module and
// uses a different subset of it.
#![allow(dead_code)]

use nav_planner::directions::{RawPolyline, RawRoute, RawSpeedInterval, RawTravelAdvisory};
use nav_planner::traffic::SpeedClass;

/// A short drive through Las Vegas, enough points to hang intervals on.
pub const VEGAS_STRIP: &[(f64, f64)] = &[
    (36.1147, -115.1728),
    (36.1162, -115.1720),
    (36.1215, -115.1700),
    (36.1250, -115.1690),
    (36.1310, -115.1685),
    (36.1400, -115.1710),
];

/// Encodes points as a polyline5 string (the crate itself only decodes).
pub fn encode_polyline(points: &[(f64, f64)]) -> String {
    fn push_varint(delta: i64, out: &mut String) {
        let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
        while value >= 0x20 {
            out.push(((0x20 | (value & 0x1f)) + 63) as u8 as char);
            value >>= 5;
        }
        out.push((value + 63) as u8 as char);
    }

    let mut out = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;
    for &(lat, lng) in points {
        let lat_e5 = (lat * 1e5).round() as i64;
        let lng_e5 = (lng * 1e5).round() as i64;
        push_varint(lat_e5 - prev_lat, &mut out);
        push_varint(lng_e5 - prev_lng, &mut out);
        prev_lat = lat_e5;
        prev_lng = lng_e5;
    }
    out
}

/// Builder for raw route entries with sensible defaults.
#[derive(Clone, Debug)]
pub struct RawRouteBuilder {
    encoded: Option<String>,
    distance_meters: Option<u32>,
    duration: Option<String>,
    intervals: Vec<RawSpeedInterval>,
}

impl RawRouteBuilder {
    pub fn new() -> Self {
        Self {
            encoded: Some(encode_polyline(VEGAS_STRIP)),
            distance_meters: Some(3_200),
            duration: Some("600s".to_string()),
            intervals: Vec::new(),
        }
    }

    pub fn points(mut self, points: &[(f64, f64)]) -> Self {
        self.encoded = Some(encode_polyline(points));
        self
    }

    pub fn encoded(mut self, encoded: &str) -> Self {
        self.encoded = Some(encoded.to_string());
        self
    }

    pub fn no_polyline(mut self) -> Self {
        self.encoded = None;
        self
    }

    pub fn duration(mut self, duration: &str) -> Self {
        self.duration = Some(duration.to_string());
        self
    }

    pub fn no_duration(mut self) -> Self {
        self.duration = None;
        self
    }

    pub fn distance(mut self, meters: u32) -> Self {
        self.distance_meters = Some(meters);
        self
    }

    pub fn no_distance(mut self) -> Self {
        self.distance_meters = None;
        self
    }

    pub fn interval(mut self, start: usize, end: usize, speed: SpeedClass) -> Self {
        self.intervals.push(RawSpeedInterval {
            start_polyline_point_index: start,
            end_polyline_point_index: end,
            speed: Some(speed),
        });
        self
    }

    pub fn build(self) -> RawRoute {
        RawRoute {
            polyline: self.encoded.map(|encoded| RawPolyline {
                encoded_polyline: Some(encoded),
            }),
            distance_meters: self.distance_meters,
            duration: self.duration,
            travel_advisory: RawTravelAdvisory {
                speed_reading_intervals: self.intervals,
            },
        }
    }
}

impl Default for RawRouteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A plain route with the given duration string.
pub fn route_with_duration(duration: &str) -> RawRoute {
    RawRouteBuilder::new().duration(duration).build()
}

/// A route whose intervals are jammed enough to classify as heavy.
pub fn heavily_congested_route(duration: &str) -> RawRoute {
    RawRouteBuilder::new()
        .duration(duration)
        .interval(0, 3, SpeedClass::Jam)
        .interval(3, 6, SpeedClass::Normal)
        .build()
}
