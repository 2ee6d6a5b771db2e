//! Latitude/longitude value type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A point on the Earth in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Errors from parsing a `"lat,lon"` destination query.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateParseError {
    #[error("expected \"lat,lon\", got {0:?}")]
    MissingSeparator(String),

    #[error("invalid {axis} value {value:?}")]
    InvalidNumber { axis: &'static str, value: String },

    #[error("{axis} {value} is out of range")]
    OutOfRange { axis: &'static str, value: f64 },
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Absolute per-axis difference `(|Δlat|, |Δlon|)` in degrees.
    pub fn abs_delta(&self, other: &Coordinate) -> (f64, f64) {
        (
            (self.latitude - other.latitude).abs(),
            (self.longitude - other.longitude).abs(),
        )
    }

    /// Axis-aligned box test: both deltas are `<= threshold`.
    ///
    /// This is a degree-space test, not a metric one. A fixed threshold covers
    /// fewer metres of longitude the further the point is from the equator.
    pub fn within(&self, other: &Coordinate, threshold: f64) -> bool {
        let (dlat, dlon) = self.abs_delta(other);
        dlat <= threshold && dlon <= threshold
    }

    /// Axis-aligned box test with strict comparison: both deltas are `< threshold`.
    pub fn strictly_within(&self, other: &Coordinate, threshold: f64) -> bool {
        let (dlat, dlon) = self.abs_delta(other);
        dlat < threshold && dlon < threshold
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.7}, {:.7}", self.latitude, self.longitude)
    }
}

/// Parses destination queries such as `"34.4179562,%20-119.8570294"`.
///
/// URL-encoded spaces and any whitespace are ignored.
impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        let cleaned: String = query
            .replace("%20", "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let (lat, lon) = cleaned
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::MissingSeparator(query.to_string()))?;

        let latitude = parse_axis("latitude", lat)?;
        let longitude = parse_axis("longitude", lon)?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateParseError::OutOfRange {
                axis: "latitude",
                value: latitude,
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateParseError::OutOfRange {
                axis: "longitude",
                value: longitude,
            });
        }

        Ok(Coordinate::new(latitude, longitude))
    }
}

fn parse_axis(axis: &'static str, raw: &str) -> Result<f64, CoordinateParseError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoordinateParseError::InvalidNumber {
            axis,
            value: raw.to_string(),
        })
}
