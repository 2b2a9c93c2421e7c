//! Directions provider payload types and HTTP adapter.
//!
//! The raw payload mirrors the provider's JSON shape with every field
//! optional or defaulted, so one malformed route entry never poisons the
//! whole response. Validation into typed candidates happens in ranking,
//! where a bad entry costs exactly one candidate.

use serde::Deserialize;

use crate::error::NavError;
use crate::geo::Coordinate;
use crate::traffic::SpeedInterval;
use crate::traits::DirectionsProvider;

/// Travel mode for the directions request. Shapes the request and the
/// candidate labels; it has no effect on scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Drive,
    TwoWheeler,
}

impl TravelMode {
    /// Wire value for the directions request body.
    pub fn request_value(&self) -> &'static str {
        match self {
            TravelMode::Drive => "DRIVE",
            TravelMode::TwoWheeler => "TWO_WHEELER",
        }
    }

    /// Human-readable name used in route labels.
    pub fn display_name(&self) -> &'static str {
        match self {
            TravelMode::Drive => "Drive",
            TravelMode::TwoWheeler => "Two-wheeler",
        }
    }
}

/// One raw route entry from the provider, prior to validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoute {
    #[serde(default)]
    pub polyline: Option<RawPolyline>,
    #[serde(default)]
    pub distance_meters: Option<u32>,
    /// Duration string of the form `"<integer>s"`.
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub travel_advisory: RawTravelAdvisory,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPolyline {
    #[serde(default)]
    pub encoded_polyline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTravelAdvisory {
    #[serde(default)]
    pub speed_reading_intervals: Vec<RawSpeedInterval>,
}

/// Speed reading interval as sent by the provider. The first interval's
/// start index is customarily omitted and defaults to 0.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpeedInterval {
    #[serde(default)]
    pub start_polyline_point_index: usize,
    #[serde(default)]
    pub end_polyline_point_index: usize,
    #[serde(default)]
    pub speed: Option<crate::traffic::SpeedClass>,
}

impl RawSpeedInterval {
    /// Converts to a typed interval clamped to the decoded point count.
    /// A missing speed class reads as normal flow.
    pub fn to_interval(&self, point_count: usize) -> SpeedInterval {
        SpeedInterval::new(
            self.start_polyline_point_index,
            self.end_polyline_point_index,
            self.speed.unwrap_or(crate::traffic::SpeedClass::Normal),
        )
        .clamped(point_count)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDirectionsResponse {
    #[serde(default)]
    routes: Vec<RawRoute>,
}

/// Parses a directions response body into raw route entries. A body with no
/// `routes` key is an empty list; per-entry validation is ranking's job.
pub fn parse_response(body: &str) -> Result<Vec<RawRoute>, NavError> {
    serde_json::from_str::<RawDirectionsResponse>(body)
        .map(|response| response.routes)
        .map_err(|err| NavError::FetchTransport(err.to_string()))
}

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://routes.googleapis.com".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Blocking HTTP adapter for the directions provider.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, NavError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| NavError::FetchTransport(err.to_string()))?;

        Ok(Self { config, client })
    }

    fn request_body(
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> serde_json::Value {
        serde_json::json!({
            "origin": { "location": { "latLng": {
                "latitude": origin.latitude,
                "longitude": origin.longitude,
            }}},
            "destination": { "location": { "latLng": {
                "latitude": destination.latitude,
                "longitude": destination.longitude,
            }}},
            "travelMode": mode.request_value(),
            "routingPreference": "TRAFFIC_AWARE",
            "computeAlternativeRoutes": true,
            "extraComputations": ["TRAFFIC_ON_POLYLINE"],
        })
    }
}

impl DirectionsProvider for DirectionsClient {
    fn fetch_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Vec<RawRoute>, NavError> {
        let url = format!("{}/directions/v2:computeRoutes", self.config.base_url);
        let body = Self::request_body(origin, destination, mode);

        let response = self
            .client
            .post(url)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header(
                "X-Goog-FieldMask",
                "routes.polyline,routes.distanceMeters,routes.duration,routes.travelAdvisory",
            )
            .json(&body)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| {
                if err.is_timeout() {
                    NavError::FetchTimeout
                } else {
                    NavError::FetchTransport(err.to_string())
                }
            })?;

        let body = response
            .text()
            .map_err(|err| NavError::FetchTransport(err.to_string()))?;

        parse_response(&body)
    }
}
