//! Localization quality gate.
//!
//! The device pose is sampled every tick. Markers may only be placed while
//! the pose is trusted; losing it hides the markers, and staying untrusted
//! for too long ends the session.

use crate::core::State;
use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};

mod checks;
mod machine;

pub use checks::{check_sample, AccuracyViolation};
pub use machine::{LocalizationEvent, LocalizationMachine};

pub const STATUS_INITIALIZING: &str = "Initializing Geospatial functionalities.";
pub const STATUS_LOCALIZING: &str = "Localizing your device to set anchor.";
pub const STATUS_INSTRUCTION: &str = "Point your camera at buildings, stores, and signs near you.";
pub const STATUS_SUCCESS: &str = "Localization completed.";
pub const STATUS_TIMED_OUT: &str =
    "Localization not possible.\nClose and open the app to restart the session.";

/// Phase of the localization gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocalizationState {
    Initializing,
    Localizing,
    Localized,
    LocalizationLost,
    TimedOut,
}

impl State for LocalizationState {
    fn name(&self) -> &str {
        match self {
            Self::Initializing => "Initializing",
            Self::Localizing => "Localizing",
            Self::Localized => "Localized",
            Self::LocalizationLost => "LocalizationLost",
            Self::TimedOut => "TimedOut",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// Reported accuracy of a geospatial pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseAccuracy {
    /// Orientation yaw accuracy, degrees
    pub yaw_deg: f64,
    /// Horizontal position accuracy, metres
    pub horizontal_m: f64,
}

/// One reading of the pose/tracking subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub position: Coordinate,
    /// Session and earth tracking are both running
    pub tracking: bool,
    /// Absent while the subsystem has no geospatial fix
    pub accuracy: Option<PoseAccuracy>,
}

impl PoseSample {
    /// A tracked sample with the given accuracy.
    pub fn tracked(position: Coordinate, yaw_deg: f64, horizontal_m: f64) -> Self {
        Self {
            position,
            tracking: true,
            accuracy: Some(PoseAccuracy {
                yaw_deg,
                horizontal_m,
            }),
        }
    }

    /// A sample taken while tracking is unavailable.
    pub fn untracked(position: Coordinate) -> Self {
        Self {
            position,
            tracking: false,
            accuracy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timeout_is_terminal() {
        for state in [
            LocalizationState::Initializing,
            LocalizationState::Localizing,
            LocalizationState::Localized,
            LocalizationState::LocalizationLost,
        ] {
            assert!(!state.is_final(), "{} should not be final", state.name());
            assert!(!state.is_error());
        }
        assert!(LocalizationState::TimedOut.is_final());
        assert!(LocalizationState::TimedOut.is_error());
    }
}
