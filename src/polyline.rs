//! Route geometry as decoded coordinate sequences.
//!
//! The directions provider ships geometry as a polyline5 string (base-64-like
//! delta encoding, precision 1e-5). Decoding happens here at the boundary;
//! everything downstream works with plain coordinates. This crate only ever
//! consumes the encoding, it never produces it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;

/// Lowest byte of the polyline encoding alphabet ('?').
const ALPHABET_FLOOR: u8 = 63;
/// Five payload bits per byte; bit 6 is the continuation flag.
const PAYLOAD_MASK: i64 = 0x1f;
const CONTINUATION_BIT: i64 = 0x20;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MalformedPolyline {
    /// The byte stream ended in the middle of a varint.
    #[error("encoded polyline truncated mid-varint at byte {0}")]
    Truncated(usize),

    /// A byte outside the encoding alphabet.
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidCharacter { byte: u8, offset: usize },

    /// A varint with more continuation chunks than any coordinate delta
    /// can need.
    #[error("overlong varint starting at byte {0}")]
    OverlongVarint(usize),

    /// Decoding produced a coordinate outside the WGS84 envelope.
    #[error("decoded coordinate ({latitude}, {longitude}) out of range")]
    OutOfRange { latitude: f64, longitude: f64 },
}

/// A route geometry as decoded (latitude, longitude) points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }
}

/// Decodes a polyline5 string into coordinates.
///
/// Walks the input left to right reconstructing signed delta varints,
/// latitude then longitude, accumulating running totals at 1e-5 precision.
/// Pure and deterministic; fails on a truncated varint, a byte outside the
/// alphabet, or a coordinate outside valid latitude/longitude ranges.
pub fn decode(encoded: &str) -> Result<Polyline, MalformedPolyline> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut offset = 0usize;
    let mut lat_e5 = 0i64;
    let mut lng_e5 = 0i64;

    while offset < bytes.len() {
        let (lat_delta, next) = decode_varint(bytes, offset)?;
        let (lng_delta, next) = decode_varint(bytes, next)?;
        lat_e5 += lat_delta;
        lng_e5 += lng_delta;
        offset = next;

        let point = Coordinate::new(lat_e5 as f64 * 1e-5, lng_e5 as f64 * 1e-5);
        if !point.is_valid() {
            return Err(MalformedPolyline::OutOfRange {
                latitude: point.latitude,
                longitude: point.longitude,
            });
        }
        points.push(point);
    }

    Ok(Polyline::new(points))
}

/// Decodes one zigzag-signed varint starting at `offset`, returning the
/// delta (in 1e-5 units) and the offset just past it.
fn decode_varint(bytes: &[u8], mut offset: usize) -> Result<(i64, usize), MalformedPolyline> {
    let start = offset;
    let mut accumulator = 0i64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(offset) else {
            return Err(MalformedPolyline::Truncated(start));
        };
        if !(ALPHABET_FLOOR..=126).contains(&byte) {
            return Err(MalformedPolyline::InvalidCharacter { byte, offset });
        }
        // 55 bits of delta is already far beyond any 1e-5 coordinate;
        // shifting further would overflow the accumulator.
        if shift > 58 {
            return Err(MalformedPolyline::OverlongVarint(start));
        }
        let chunk = (byte - ALPHABET_FLOOR) as i64;
        accumulator |= (chunk & PAYLOAD_MASK) << shift;
        shift += 5;
        offset += 1;
        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    // Zigzag: LSB carries the sign.
    let delta = if accumulator & 1 != 0 {
        !(accumulator >> 1)
    } else {
        accumulator >> 1
    };
    Ok((delta, offset))
}
