//! Tunable thresholds for every component.
//!
//! Defaults reproduce the values the navigation behaviour was tuned with.
//! Proximity thresholds are in degrees and compared per axis, so they are
//! not uniform in metres across latitudes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod error;

pub use error::ConfigError;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub localization: LocalizationConfig,
    pub history: HistoryConfig,
    pub tracker: TrackerConfig,
    pub placement: PlacementConfig,
    pub session: SessionConfig,
}

/// Accuracy gates and timeout of the localization state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Maximum orientation yaw accuracy, degrees
    pub yaw_accuracy_threshold_deg: f64,
    /// Maximum horizontal accuracy, metres
    pub horizontal_accuracy_threshold_m: f64,
    /// Time allowed outside `Localized` before the session is given up
    pub timeout_secs: f64,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            yaw_accuracy_threshold_deg: 25.0,
            horizontal_accuracy_threshold_m: 20.0,
            timeout_secs: 180.0,
        }
    }
}

impl LocalizationConfig {
    /// Saturates at `Duration::MAX` for values [`NavigationConfig::validate`] rejects.
    pub fn timeout(&self) -> Duration {
        seconds(self.timeout_secs)
    }
}

/// Bounds of the persisted anchor history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of stored entries
    pub storage_limit: usize,
    /// Entries older than this are purged on load
    pub max_age_hours: i64,
    /// Per-axis degrees under which two anchors are the same place (~20 m)
    pub similarity_threshold_deg: f64,
    /// Key the snapshot is stored under
    pub storage_key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            storage_limit: 30,
            max_age_hours: 24,
            similarity_threshold_deg: 0.0002,
            storage_key: "persistent_anchor_history".to_string(),
        }
    }
}

impl HistoryConfig {
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.max_age_hours).unwrap_or(chrono::Duration::MAX)
    }
}

/// Travel mode requested from the routing service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

/// Route step progression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Per-axis degrees within which a step end counts as reached (~55 m)
    pub step_proximity_threshold_deg: f64,
    pub profile: RoutingProfile,
    /// Ask the routing service for alternatives; only the first is used
    pub request_alternatives: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            step_proximity_threshold_deg: 0.0005,
            profile: RoutingProfile::Driving,
            request_alternatives: true,
        }
    }
}

/// Marker trail densification and anchor resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Per-axis degrees within which a queued waypoint is placed (~75 m)
    pub proximity_threshold_deg: f64,
    /// Interpolated markers per degree of planar segment length
    pub markers_per_degree: f64,
    /// Forward tilt applied to every marker, degrees
    pub marker_pitch_deg: f64,
    /// Interval between checks of an in-flight resolution
    pub poll_interval_secs: f64,
    /// Polls after which the slow-resolution advisory is shown
    pub slow_resolve_polls: u32,
    /// Failed resolutions tolerated per marker before it is dropped
    pub max_resolution_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_deg: 0.0007,
            markers_per_degree: 10_000.0 / 2.0,
            marker_pitch_deg: 66.0,
            poll_interval_secs: 0.1,
            slow_resolve_polls: 100,
            max_resolution_attempts: 5,
        }
    }
}

impl PlacementConfig {
    pub fn poll_interval(&self) -> Duration {
        seconds(self.poll_interval_secs)
    }
}

/// Session lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long a fatal message stays up before the session ends
    pub error_display_secs: f64,
    /// Key recording that the privacy prompt was acknowledged
    pub privacy_prompt_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            error_display_secs: 3.0,
            privacy_prompt_key: "has_displayed_privacy_prompt".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn error_display(&self) -> Duration {
        seconds(self.error_display_secs)
    }
}

impl NavigationConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: NavigationConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a component misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("localization.yaw_accuracy_threshold_deg", self.localization.yaw_accuracy_threshold_deg)?;
        positive(
            "localization.horizontal_accuracy_threshold_m",
            self.localization.horizontal_accuracy_threshold_m,
        )?;
        positive("localization.timeout_secs", self.localization.timeout_secs)?;
        positive("history.similarity_threshold_deg", self.history.similarity_threshold_deg)?;
        positive("tracker.step_proximity_threshold_deg", self.tracker.step_proximity_threshold_deg)?;
        positive("placement.proximity_threshold_deg", self.placement.proximity_threshold_deg)?;
        positive("placement.poll_interval_secs", self.placement.poll_interval_secs)?;
        non_negative("placement.markers_per_degree", self.placement.markers_per_degree)?;
        non_negative("session.error_display_secs", self.session.error_display_secs)?;
        representable("localization.timeout_secs", self.localization.timeout_secs)?;
        representable("placement.poll_interval_secs", self.placement.poll_interval_secs)?;
        representable("session.error_display_secs", self.session.error_display_secs)?;

        if self.history.storage_limit == 0 {
            return Err(ConfigError::ZeroStorageLimit);
        }
        if self.history.max_age_hours <= 0 {
            return Err(ConfigError::NotPositive {
                field: "history.max_age_hours",
                value: self.history.max_age_hours as f64,
            });
        }
        if chrono::Duration::try_hours(self.history.max_age_hours).is_none() {
            return Err(ConfigError::DurationOverflow {
                field: "history.max_age_hours",
                value: self.history.max_age_hours as f64,
            });
        }
        if self.placement.max_resolution_attempts == 0 {
            return Err(ConfigError::NotPositive {
                field: "placement.max_resolution_attempts",
                value: 0.0,
            });
        }
        if self.history.storage_key.is_empty() {
            return Err(ConfigError::EmptyKey("history.storage_key"));
        }
        if self.session.privacy_prompt_key.is_empty() {
            return Err(ConfigError::EmptyKey("session.privacy_prompt_key"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn representable(field: &'static str, secs: f64) -> Result<(), ConfigError> {
    Duration::try_from_secs_f64(secs)
        .map(|_| ())
        .map_err(|_| ConfigError::DurationOverflow { field, value: secs })
}

fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
