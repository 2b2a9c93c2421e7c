//! Congestion scoring from per-segment speed readings.
//!
//! The directions provider annotates each route with speed reading intervals:
//! half-open index ranges into the route's decoded points, each tagged with a
//! speed class. The scorer reduces those to a single congestion class and a
//! weighted ratio used for ranking display.

use serde::{Deserialize, Serialize};

/// Per-segment traffic speed class as reported by the provider.
///
/// Any string the provider invents later deserializes to `Normal`, so unknown
/// classes add to the measured length without adding congestion weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeedClass {
    Slow,
    #[serde(alias = "TRAFFIC_JAM")]
    Jam,
    #[serde(other)]
    Normal,
}

/// A half-open index range `[start_index, end_index)` into a route's points.
///
/// Intervals are non-overlapping and ascending by `start_index` within a
/// route; indices are clamped to the point count when the route is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedInterval {
    pub start_index: usize,
    pub end_index: usize,
    pub speed: SpeedClass,
}

impl SpeedInterval {
    pub fn new(start_index: usize, end_index: usize, speed: SpeedClass) -> Self {
        Self {
            start_index,
            end_index,
            speed,
        }
    }

    /// Copy with both indices clamped to `[0, point_count]`.
    pub fn clamped(self, point_count: usize) -> Self {
        Self {
            start_index: self.start_index.min(point_count),
            end_index: self.end_index.min(point_count),
            speed: self.speed,
        }
    }

    /// Segment length in points; degenerate (reversed or empty) ranges are 0.
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Overall congestion classification for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CongestionClass {
    /// No speed readings at all. Distinct from a free-flowing route.
    NoData,
    Free,
    Light,
    Moderate,
    Heavy,
}

impl std::fmt::Display for CongestionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CongestionClass::NoData => "No traffic data",
            CongestionClass::Free => "No congestion",
            CongestionClass::Light => "Light traffic",
            CongestionClass::Moderate => "Moderate traffic",
            CongestionClass::Heavy => "Heavy traffic",
        };
        write!(f, "{}", label)
    }
}

/// Scoring result for one route's interval set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub class: CongestionClass,
    /// Weighted congestion ratio in [0, 1]; 0 when there is no data.
    pub ratio: f64,
    pub slow_count: usize,
    pub jam_count: usize,
}

impl TrafficSummary {
    /// Summary for a route with no speed readings.
    pub fn no_data() -> Self {
        Self {
            class: CongestionClass::NoData,
            ratio: 0.0,
            slow_count: 0,
            jam_count: 0,
        }
    }
}

/// Visual weight multipliers: slow and jammed segments count more than their
/// share of the route so short but severe jams still register.
const SLOW_WEIGHT: f64 = 1.5;
const JAM_WEIGHT: f64 = 2.0;

/// Reduces a route's speed intervals to a congestion summary.
///
/// Intervals with non-positive length are skipped as degenerate. Overlap is
/// not corrected; the total stays additive. Classification bands on the
/// rounded percentage, first match wins: > 25 heavy, > 15 moderate, > 5 (or
/// more than 3 slow/jam segments) light, else free.
pub fn score(intervals: &[SpeedInterval]) -> TrafficSummary {
    let mut total_length = 0usize;
    let mut visual_weight = 0.0f64;
    let mut slow_count = 0usize;
    let mut jam_count = 0usize;

    for interval in intervals {
        match interval.speed {
            SpeedClass::Slow => slow_count += 1,
            SpeedClass::Jam => jam_count += 1,
            SpeedClass::Normal => {}
        }

        let length = interval.len();
        if length == 0 {
            continue;
        }
        total_length += length;
        visual_weight += match interval.speed {
            SpeedClass::Slow => length as f64 * SLOW_WEIGHT,
            SpeedClass::Jam => length as f64 * JAM_WEIGHT,
            SpeedClass::Normal => 0.0,
        };
    }

    if total_length == 0 {
        return TrafficSummary {
            slow_count,
            jam_count,
            ..TrafficSummary::no_data()
        };
    }

    let ratio = visual_weight / total_length as f64;
    let percent = (ratio * 100.0).round() as i64;
    let class = if percent > 25 {
        CongestionClass::Heavy
    } else if percent > 15 {
        CongestionClass::Moderate
    } else if percent > 5 || slow_count + jam_count > 3 {
        CongestionClass::Light
    } else {
        CongestionClass::Free
    };

    TrafficSummary {
        class,
        ratio,
        slow_count,
        jam_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn interval(start: usize, end: usize, speed: SpeedClass) -> SpeedInterval {
        SpeedInterval::new(start, end, speed)
    }

    #[test]
    fn test_no_intervals_is_no_data() {
        let summary = score(&[]);
        assert_eq!(summary.class, CongestionClass::NoData);
        assert_relative_eq!(summary.ratio, 0.0);
    }

    #[test]
    fn test_only_degenerate_intervals_is_no_data() {
        let intervals = [
            interval(5, 5, SpeedClass::Jam),
            interval(9, 3, SpeedClass::Slow),
        ];
        let summary = score(&intervals);
        assert_eq!(summary.class, CongestionClass::NoData);
        // Counts still tally even when lengths are degenerate.
        assert_eq!(summary.slow_count, 1);
        assert_eq!(summary.jam_count, 1);
    }

    #[test]
    fn test_all_normal_is_free() {
        let summary = score(&[interval(0, 100, SpeedClass::Normal)]);
        assert_eq!(summary.class, CongestionClass::Free);
        assert_relative_eq!(summary.ratio, 0.0);
    }

    #[test]
    fn test_boundary_percent_25_is_moderate_26_is_heavy() {
        // 100 points total; a jam segment of length J gives ratio 2J/100.
        // J = 12.5 is not expressible, so use slow: 1.5 * S / 100.
        // S = 17 -> 25.5% rounds to 26 -> heavy. S = 16 -> 24% -> moderate.
        let heavy = score(&[
            interval(0, 17, SpeedClass::Slow),
            interval(17, 100, SpeedClass::Normal),
        ]);
        assert_eq!(heavy.class, CongestionClass::Heavy);

        let moderate = score(&[
            interval(0, 16, SpeedClass::Slow),
            interval(16, 100, SpeedClass::Normal),
        ]);
        assert_eq!(moderate.class, CongestionClass::Moderate);

        // Exactly 25%: jam of 25 over total 200 -> 2*25/200 = 25%.
        let exactly_25 = score(&[
            interval(0, 25, SpeedClass::Jam),
            interval(25, 200, SpeedClass::Normal),
        ]);
        assert_eq!(exactly_25.class, CongestionClass::Moderate);
    }

    #[test]
    fn test_boundary_percent_15_is_light() {
        // Jam of 15 over 200 points: 2*15/200 = 15% exactly -> light band.
        let summary = score(&[
            interval(0, 15, SpeedClass::Jam),
            interval(15, 200, SpeedClass::Normal),
        ]);
        assert_eq!(summary.class, CongestionClass::Light);
    }

    #[test]
    fn test_boundary_percent_5_is_free() {
        // Jam of 5 over 200 points: 5% exactly -> not light by ratio, and
        // only one congested segment -> free.
        let summary = score(&[
            interval(0, 5, SpeedClass::Jam),
            interval(5, 200, SpeedClass::Normal),
        ]);
        assert_eq!(summary.class, CongestionClass::Free);
    }

    #[test]
    fn test_many_short_congested_segments_tip_into_light() {
        // Ratio stays under 5% but four congested segments force light.
        let summary = score(&[
            interval(0, 1, SpeedClass::Slow),
            interval(10, 11, SpeedClass::Slow),
            interval(20, 21, SpeedClass::Jam),
            interval(30, 31, SpeedClass::Jam),
            interval(40, 180, SpeedClass::Normal),
        ]);
        assert!(summary.ratio * 100.0 < 5.0);
        assert_eq!(summary.class, CongestionClass::Light);
        assert_eq!(summary.slow_count, 2);
        assert_eq!(summary.jam_count, 2);
    }

    #[test]
    fn test_heavy_jam_dominates() {
        let summary = score(&[
            interval(0, 50, SpeedClass::Jam),
            interval(50, 100, SpeedClass::Normal),
        ]);
        assert_eq!(summary.class, CongestionClass::Heavy);
        assert_relative_eq!(summary.ratio, 1.0);
    }

    #[test]
    fn test_clamping_caps_indices_at_point_count() {
        let clamped = interval(90, 250, SpeedClass::Jam).clamped(100);
        assert_eq!(clamped.start_index, 90);
        assert_eq!(clamped.end_index, 100);
        assert_eq!(clamped.len(), 10);
    }

    #[test]
    fn test_unknown_speed_string_deserializes_to_normal() {
        let class: SpeedClass = serde_json::from_str("\"SPEED_UNSPECIFIED\"").unwrap();
        assert_eq!(class, SpeedClass::Normal);
        let jam: SpeedClass = serde_json::from_str("\"TRAFFIC_JAM\"").unwrap();
        assert_eq!(jam, SpeedClass::Jam);
    }
}
