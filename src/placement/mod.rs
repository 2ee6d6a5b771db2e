//! Waypoint densification, marker orientation and anchor resolution.

use crate::anchors::ResolutionMode;
use std::fmt;

mod engine;
mod resolver;
pub mod rotation;

pub use engine::{PlacedMarker, ResolutionReport, WaypointPlacementEngine};
pub use resolver::{AnchorHandle, AnchorResolver, ResolveOutcome, ResolveRequest};

/// User-facing outcome of marker placement.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementNotice {
    /// A marker resolved; carries the number of markers now placed
    AnchorsSet(usize),
    ResolveFailed(ResolutionMode),
    /// A resolution has been pending for a long time
    StillResolving,
    /// History entries sent for re-resolution
    RestoringHistory(usize),
    Cleared,
}

impl fmt::Display for PlacementNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnchorsSet(n) => write!(f, "{n} Anchor(s) Set!"),
            Self::ResolveFailed(mode) => write!(f, "Failed to set a {mode} anchor!"),
            Self::StillResolving => f.write_str(
                "Still resolving the terrain anchor.\n\
                 Please make sure you're in an area that has VPS coverage.",
            ),
            Self::RestoringHistory(n) => write!(f, "{n} anchor(s) set from history."),
            Self::Cleared => f.write_str("Anchor(s) cleared!"),
        }
    }
}
