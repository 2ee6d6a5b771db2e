//! Tick-driven localization state machine.

use super::checks::check_sample;
use super::{
    LocalizationState, PoseSample, STATUS_INITIALIZING, STATUS_INSTRUCTION, STATUS_LOCALIZING,
    STATUS_SUCCESS, STATUS_TIMED_OUT,
};
use crate::config::LocalizationConfig;
use crate::core::{State, StateHistory};
use log::{debug, error, info, warn};
use std::time::Duration;
use stillwater::validation::Validation;

/// Side effects requested by a localization tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalizationEvent {
    /// Localization regressed; hide every placed marker.
    HideMarkers,
    /// Localization (re)acquired; show every placed marker.
    RevealMarkers,
    /// First trustworthy pose since activation; re-resolve the stored history.
    ResolveHistory,
    /// Gave up on localizing. Fatal for the session.
    TimedOut,
}

/// Tracks whether the device pose is good enough to place markers.
///
/// `elapsed` only runs while the machine is outside `Localized`, and is
/// reset on every move into or out of it.
#[derive(Debug)]
pub struct LocalizationMachine {
    config: LocalizationConfig,
    state: LocalizationState,
    elapsed: Duration,
    clock: Duration,
    history_resolved: bool,
    status: &'static str,
    history: StateHistory<LocalizationState>,
}

impl LocalizationMachine {
    pub fn new(config: LocalizationConfig) -> Self {
        Self {
            config,
            state: LocalizationState::Initializing,
            elapsed: Duration::ZERO,
            clock: Duration::ZERO,
            history_resolved: false,
            status: STATUS_INITIALIZING,
            history: StateHistory::new(),
        }
    }

    /// Start localizing. Calling this again restarts the session's gate.
    pub fn activate(&mut self) {
        self.state = LocalizationState::Initializing;
        self.elapsed = Duration::ZERO;
        self.history_resolved = false;
        self.status = STATUS_INITIALIZING;
        self.transition(LocalizationState::Localizing);
        self.status = STATUS_LOCALIZING;
    }

    /// Evaluate one pose sample, `dt` after the previous tick.
    pub fn advance(&mut self, dt: Duration, sample: &PoseSample) -> Vec<LocalizationEvent> {
        let mut events = Vec::new();
        self.clock += dt;

        if self.state.is_final() || self.state == LocalizationState::Initializing {
            return events;
        }

        match check_sample(sample, &self.config) {
            Validation::Success(_) => {
                if self.state != LocalizationState::Localized {
                    self.elapsed = Duration::ZERO;
                    self.transition(LocalizationState::Localized);
                    self.status = STATUS_SUCCESS;
                    events.push(LocalizationEvent::RevealMarkers);
                    if !self.history_resolved {
                        self.history_resolved = true;
                        events.push(LocalizationEvent::ResolveHistory);
                    }
                }
            }
            Validation::Failure(violations) => {
                if self.state == LocalizationState::Localized {
                    let reasons: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                    warn!("Localization lost: {}", reasons.join("; "));
                    self.elapsed = Duration::ZERO;
                    self.transition(LocalizationState::LocalizationLost);
                    events.push(LocalizationEvent::HideMarkers);
                } else {
                    debug!("Pose rejected with {} violation(s)", violations.len());
                }

                if self.elapsed > self.config.timeout() {
                    error!("Localization timed out after {:?}", self.elapsed);
                    self.transition(LocalizationState::TimedOut);
                    self.status = STATUS_TIMED_OUT;
                    events.push(LocalizationEvent::TimedOut);
                } else {
                    self.elapsed += dt;
                    self.status = STATUS_INSTRUCTION;
                }
            }
        }

        events
    }

    /// Whether markers may be placed right now.
    pub fn is_trustworthy(&self) -> bool {
        self.state == LocalizationState::Localized
    }

    pub fn state(&self) -> LocalizationState {
        self.state
    }

    /// Human-readable status for the current phase.
    pub fn status(&self) -> &'static str {
        self.status
    }

    /// Time spent outside `Localized` since the last reset.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn history(&self) -> &StateHistory<LocalizationState> {
        &self.history
    }

    fn transition(&mut self, to: LocalizationState) {
        if self.state == to {
            return;
        }
        info!("Localization: {} -> {}", self.state.name(), to.name());
        self.history.record(self.state, to, self.clock);
        self.state = to;
    }
}
