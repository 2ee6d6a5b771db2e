//! Anchor resolution seam.

use crate::anchors::ResolutionMode;
use crate::core::Pending;
use crate::geo::Coordinate;
use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

/// Opaque id of an anchor resolved by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorHandle(pub u64);

/// Ask the host to anchor a marker at a real-world position.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveRequest {
    pub coordinate: Coordinate,
    /// Ignored for terrain resolution
    pub altitude: f64,
    pub rotation: UnitQuaternion<f64>,
    pub mode: ResolutionMode,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResolveOutcome {
    Resolved(AnchorHandle),
    Failed(String),
}

/// Resolves anchors asynchronously.
///
/// Dropping the returned handle means the answer is no longer wanted.
pub trait AnchorResolver {
    fn resolve(&mut self, request: ResolveRequest) -> Pending<ResolveOutcome>;
}
