//! A single persisted marker.

use crate::geo::Coordinate;
use chrono::{DateTime, Utc};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What a marker stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Directional arrow along the route
    Trail,
    /// Pin at the destination
    Destination,
    /// Placed by hand from the current pose
    UserPlaced,
}

/// How the anchor's altitude is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionMode {
    /// Altitude relative to the ground at the coordinate
    Terrain,
    /// Absolute altitude taken from the pose
    Geospatial,
}

impl MarkerKind {
    pub fn resolution_mode(self) -> ResolutionMode {
        match self {
            Self::Trail | Self::Destination => ResolutionMode::Terrain,
            Self::UserPlaced => ResolutionMode::Geospatial,
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terrain => f.write_str("Terrain"),
            Self::Geospatial => f.write_str("Geospatial"),
        }
    }
}

/// A placed marker as remembered across sessions.
///
/// Orientations live in the East-Up-North frame, so the vertical axis is `y`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnchorHistoryEntry {
    pub id: Uuid,
    pub coordinate: Coordinate,
    pub altitude: f64,
    /// Compass heading kept for records written before orientations were stored
    #[serde(default)]
    pub heading: f64,
    pub orientation: UnitQuaternion<f64>,
    pub kind: MarkerKind,
    pub created_at: DateTime<Utc>,
}

impl AnchorHistoryEntry {
    /// A fresh entry stamped with the current time.
    pub fn new(
        coordinate: Coordinate,
        altitude: f64,
        orientation: UnitQuaternion<f64>,
        kind: MarkerKind,
    ) -> Self {
        Self::created_at(coordinate, altitude, orientation, kind, Utc::now())
    }

    pub fn created_at(
        coordinate: Coordinate,
        altitude: f64,
        orientation: UnitQuaternion<f64>,
        kind: MarkerKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            coordinate,
            altitude,
            heading: 0.0,
            orientation,
            kind,
            created_at,
        }
    }

    /// Rotation to resolve this entry with.
    ///
    /// Legacy records carry an identity orientation and only a heading; for
    /// those the marker is turned `180 - heading` degrees about the vertical.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        if self.orientation == UnitQuaternion::identity() {
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), (180.0 - self.heading).to_radians())
        } else {
            self.orientation
        }
    }

    /// Age of the entry at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.created_at)
    }
}
