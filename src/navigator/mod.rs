//! Session orchestration.
//!
//! The [`Navigator`] owns the localization gate, the route tracker, the
//! placement engine and the anchor history, and wires them together once
//! per frame in [`Navigator::tick`]:
//!
//! 1. the pending routing answer, if any, starts the tracker
//! 2. the tracker checks the live position; its events go to the engine
//! 3. the localization gate judges the pose; hiding, revealing and
//!    restoring markers follow from its events
//! 4. in-flight resolutions are polled
//! 5. new markers are placed, but only while the pose is trustworthy

use crate::anchors::AnchorHistory;
use crate::config::NavigationConfig;
use crate::core::{Pending, Poll};
use crate::destination::{ParkingFeed, SlotPolicy};
use crate::geo::Coordinate;
use crate::localization::{
    LocalizationEvent, LocalizationMachine, PoseSample, STATUS_TIMED_OUT,
};
use crate::placement::{AnchorResolver, PlacementNotice, WaypointPlacementEngine};
use crate::route::{
    ManeuverDirection, RouteEvent, RouteQuery, RouteStepTracker, RoutingError, RoutingResponse,
    RoutingService, StepProgress,
};
use crate::storage::KeyValueStore;
use log::{debug, error, info, warn};
use std::time::Duration;

mod builder;
pub mod error;

pub use builder::NavigatorBuilder;
pub use error::{BuildError, NavigationError};

/// Where the session is in its lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionPhase {
    /// Not activated, or deactivated
    Inactive,
    /// Activated, but the privacy prompt has not been acknowledged
    AwaitingConsent,
    Running,
    /// A fatal message is on screen; the session ends when `remaining` runs out
    Ending { reason: String, remaining: Duration },
    /// Terminal
    Ended,
}

/// Everything that happened during one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub phase: SessionPhase,
    /// Latest user-facing status line
    pub status: String,
    pub route_events: Vec<RouteEvent>,
    pub localization_events: Vec<LocalizationEvent>,
    pub notices: Vec<PlacementNotice>,
    /// Resolutions requested this tick
    pub requested: usize,
    pub progress: Option<StepProgress>,
    pub direction: Option<ManeuverDirection>,
}

struct PendingRoute {
    handle: Pending<Result<RoutingResponse, RoutingError>>,
    destination: Coordinate,
}

/// Drives one navigation session.
pub struct Navigator<K, R, S> {
    config: NavigationConfig,
    store: K,
    resolver: R,
    routing: S,
    policy: Box<dyn SlotPolicy>,
    localization: LocalizationMachine,
    tracker: RouteStepTracker,
    engine: WaypointPlacementEngine,
    history: AnchorHistory,
    destination: Option<Coordinate>,
    position: Option<Coordinate>,
    pending_route: Option<PendingRoute>,
    phase: SessionPhase,
    restore_armed: bool,
    /// Set once a session has read the stored history; until then saving
    /// would overwrite it with nothing
    history_loaded: bool,
    status: String,
}

impl<K: KeyValueStore, R: AnchorResolver, S: RoutingService> Navigator<K, R, S> {
    pub fn builder() -> NavigatorBuilder<K, R, S> {
        NavigatorBuilder::new()
    }

    pub(crate) fn assemble(
        config: NavigationConfig,
        store: K,
        resolver: R,
        routing: S,
        policy: Box<dyn SlotPolicy>,
    ) -> Self {
        let localization = LocalizationMachine::new(config.localization.clone());
        let status = localization.status().to_string();
        Self {
            localization,
            tracker: RouteStepTracker::new(config.tracker.clone()),
            engine: WaypointPlacementEngine::new(config.placement.clone()),
            history: AnchorHistory::new(config.history.clone()),
            config,
            store,
            resolver,
            routing,
            policy,
            destination: None,
            position: None,
            pending_route: None,
            phase: SessionPhase::Inactive,
            restore_armed: false,
            history_loaded: false,
            status,
        }
    }

    /// Start the session, or wait for consent if the privacy prompt has not
    /// been acknowledged yet.
    pub fn activate(&mut self) -> Result<(), NavigationError> {
        match self.phase {
            SessionPhase::Ended | SessionPhase::Ending { .. } => {
                return Err(NavigationError::SessionEnded)
            }
            SessionPhase::Running | SessionPhase::AwaitingConsent => return Ok(()),
            SessionPhase::Inactive => {}
        }

        if self.needs_privacy_prompt() {
            info!("Waiting for privacy consent");
            self.phase = SessionPhase::AwaitingConsent;
        } else {
            self.start_session();
        }
        Ok(())
    }

    /// Stop tracking, cancel outstanding work and persist the history.
    pub fn deactivate(&mut self) {
        self.shutdown();
        if self.phase != SessionPhase::Ended {
            self.phase = SessionPhase::Inactive;
        }
    }

    pub fn needs_privacy_prompt(&self) -> bool {
        self.store
            .get(&self.config.session.privacy_prompt_key)
            .is_none()
    }

    /// Record consent and start a session that was waiting for it.
    pub fn acknowledge_privacy_prompt(&mut self) {
        let key = self.config.session.privacy_prompt_key.clone();
        self.store.set(&key, "true".to_string());
        if self.phase == SessionPhase::AwaitingConsent {
            self.start_session();
        }
    }

    pub fn set_destination(&mut self, destination: Coordinate) {
        info!("Destination set to {}", destination);
        self.destination = Some(destination);
    }

    /// Set the destination from a `"lat,lon"` query.
    pub fn set_destination_query(&mut self, query: &str) -> Result<Coordinate, NavigationError> {
        let destination: Coordinate = query.parse()?;
        self.set_destination(destination);
        Ok(destination)
    }

    /// Set the destination to the slot picked by the parking policy.
    pub fn choose_parking_slot(&mut self, feed: &ParkingFeed) -> Result<Coordinate, NavigationError> {
        let slot = self
            .policy
            .choose(feed, self.position.as_ref())
            .ok_or(NavigationError::NoParkingSlot)?;
        debug!("Parking slot {} chosen in {}", slot.slot_id, feed.parking);
        let destination = slot.coordinate();
        self.set_destination(destination);
        Ok(destination)
    }

    /// Ask the routing service for directions from the last known position.
    ///
    /// The answer is picked up by a later [`Navigator::tick`]. A newer
    /// request replaces one still in flight.
    pub fn request_route(&mut self) -> Result<(), NavigationError> {
        if matches!(self.phase, SessionPhase::Ending { .. } | SessionPhase::Ended) {
            return Err(NavigationError::SessionEnded);
        }
        let origin = self.position.ok_or(NavigationError::NoPosition)?;
        let destination = self.destination.ok_or(NavigationError::NoDestination)?;

        info!("Requesting route {} -> {}", origin, destination);
        let handle = self.routing.query(RouteQuery {
            origin,
            destination,
            profile: self.config.tracker.profile,
            alternatives: self.config.tracker.request_alternatives,
            steps: true,
        });
        self.pending_route = Some(PendingRoute {
            handle,
            destination,
        });
        Ok(())
    }

    /// Show `reason` and end the session after the display delay.
    pub fn report_session_error(&mut self, reason: &str) {
        self.begin_ending(reason);
    }

    /// Remove every marker and empty the history.
    pub fn clear_all_anchors(&mut self) {
        self.engine.clear_markers();
        self.history.clear();
        self.save_history();
        self.status = PlacementNotice::Cleared.to_string();
        info!("All anchors cleared");
    }

    /// Advance the session by one frame.
    pub fn tick(&mut self, dt: Duration, sample: &PoseSample) -> TickReport {
        let mut report = TickReport {
            phase: self.phase.clone(),
            status: self.status.clone(),
            route_events: Vec::new(),
            localization_events: Vec::new(),
            notices: Vec::new(),
            requested: 0,
            progress: None,
            direction: None,
        };

        match &mut self.phase {
            SessionPhase::Running => {}
            SessionPhase::Ending { remaining, .. } => {
                *remaining = remaining.saturating_sub(dt);
                let expired = remaining.is_zero();
                if expired {
                    info!("Session ended");
                    self.shutdown();
                    self.phase = SessionPhase::Ended;
                }
                report.phase = self.phase.clone();
                return report;
            }
            SessionPhase::Inactive | SessionPhase::AwaitingConsent | SessionPhase::Ended => {
                return report;
            }
        }

        let position = sample.position;
        self.position = Some(position);

        if let Some(events) = self.poll_route() {
            report.route_events.extend(events);
        }
        report.route_events.extend(self.tracker.advance(dt, &position));
        for event in &report.route_events {
            self.engine.on_route_event(event);
        }

        let localization_events = self.localization.advance(dt, sample);
        for event in &localization_events {
            match event {
                LocalizationEvent::HideMarkers => self.engine.set_markers_visible(false),
                LocalizationEvent::RevealMarkers => self.engine.set_markers_visible(true),
                LocalizationEvent::ResolveHistory => {
                    if self.restore_armed {
                        self.restore_armed = false;
                        let notice = self.engine.restore_history(&self.history, &mut self.resolver);
                        report.notices.push(notice);
                    }
                }
                LocalizationEvent::TimedOut => self.begin_ending(STATUS_TIMED_OUT),
            }
        }
        report.localization_events = localization_events;

        if matches!(self.phase, SessionPhase::Running) {
            if !report.localization_events.is_empty() || !self.localization.is_trustworthy() {
                self.status = self.localization.status().to_string();
            }

            let resolution = self.engine.poll_resolutions(dt, &mut self.history);
            report.notices.extend(resolution.notices);
            if resolution.history_changed {
                self.save_history();
            }

            if self.localization.is_trustworthy() {
                report.requested =
                    self.engine
                        .place_markers(&position, &self.history, &mut self.resolver);
            }

            if let Some(notice) = report.notices.last() {
                self.status = notice.to_string();
            }
        }

        report.progress = self.tracker.progress(&position);
        report.direction = self
            .tracker
            .current_step()
            .filter(|_| self.tracker.is_routing())
            .map(|step| step.maneuver.direction());
        report.phase = self.phase.clone();
        report.status = self.status.clone();
        report
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn localization(&self) -> &LocalizationMachine {
        &self.localization
    }

    pub fn tracker(&self) -> &RouteStepTracker {
        &self.tracker
    }

    pub fn engine(&self) -> &WaypointPlacementEngine {
        &self.engine
    }

    pub fn history(&self) -> &AnchorHistory {
        &self.history
    }

    /// Whether placed markers are currently shown.
    pub fn markers_visible(&self) -> bool {
        self.engine.markers_visible()
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    pub fn routing_mut(&mut self) -> &mut S {
        &mut self.routing
    }

    fn start_session(&mut self) {
        self.history = match AnchorHistory::load(&mut self.store, self.config.history.clone()) {
            Ok(history) => history,
            Err(e) => {
                warn!("Anchor history unreadable, starting empty: {}", e);
                AnchorHistory::new(self.config.history.clone())
            }
        };
        self.history_loaded = true;
        info!("Session started with {} stored anchor(s)", self.history.len());

        self.localization.activate();
        self.restore_armed = !self.history.is_empty();
        self.status = self.localization.status().to_string();
        self.phase = SessionPhase::Running;
    }

    fn poll_route(&mut self) -> Option<Vec<RouteEvent>> {
        let mut pending = self.pending_route.take()?;
        match pending.handle.poll() {
            Poll::Waiting => {
                self.pending_route = Some(pending);
                None
            }
            Poll::Ready(Ok(response)) => Some(self.tracker.start(&response, pending.destination)),
            Poll::Ready(Err(e)) => {
                warn!("Routing failed: {}", e);
                None
            }
            Poll::Abandoned => {
                warn!("Routing service dropped the request");
                None
            }
        }
    }

    fn begin_ending(&mut self, reason: &str) {
        if matches!(self.phase, SessionPhase::Ending { .. } | SessionPhase::Ended) {
            return;
        }
        error!("Ending session: {}", reason);
        self.status = reason.to_string();
        self.phase = SessionPhase::Ending {
            reason: reason.to_string(),
            remaining: self.config.session.error_display(),
        };
    }

    fn shutdown(&mut self) {
        self.tracker.deactivate();
        self.engine.deactivate();
        self.pending_route = None;
        self.restore_armed = false;
        if self.history_loaded {
            self.save_history();
        }
    }

    fn save_history(&mut self) {
        if let Err(e) = self.history.save(&mut self.store) {
            warn!("Failed to save anchor history: {}", e);
        }
    }
}
