//! Route step progression.

use super::model::{Route, RouteStep, RoutingResponse};
use crate::config::TrackerConfig;
use crate::core::{State, StateHistory};
use crate::geo::{distance_m, Coordinate};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Phase of the step tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerPhase {
    /// No route, or the last response had none
    Inactive,
    /// Following a route
    Routing,
    /// Reached the destination; only a new route restarts tracking
    Arrived,
}

impl State for TrackerPhase {
    fn name(&self) -> &str {
        match self {
            Self::Inactive => "Inactive",
            Self::Routing => "Routing",
            Self::Arrived => "Arrived",
        }
    }
}

/// Output of the tracker, consumed by the placement engine.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteEvent {
    /// The cursor moved onto `step`.
    StepEntered {
        index: usize,
        step: RouteStep,
        /// Where the last marker of the step should point
        next_point: Coordinate,
        is_final_step: bool,
    },
    /// The user reached the destination.
    Arrived { destination: Coordinate },
}

/// Distance readout for the current step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepProgress {
    pub step_index: usize,
    pub step_count: usize,
    pub metres: f64,
    /// `metres * 0.0006`, rounded to two decimals
    pub miles: f64,
}

/// Advances a cursor through the route steps as the user moves.
#[derive(Debug)]
pub struct RouteStepTracker {
    config: TrackerConfig,
    route: Option<Route>,
    cursor: usize,
    phase: TrackerPhase,
    clock: Duration,
    history: StateHistory<TrackerPhase>,
}

impl RouteStepTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            route: None,
            cursor: 0,
            phase: TrackerPhase::Inactive,
            clock: Duration::ZERO,
            history: StateHistory::new(),
        }
    }

    /// Ingest a routing response, replacing any current route.
    ///
    /// A response without steps resets the tracker and emits nothing.
    pub fn start(&mut self, response: &RoutingResponse, destination: Coordinate) -> Vec<RouteEvent> {
        let Some(route) = Route::from_response(response, destination) else {
            debug!("Routing response has no routes; tracking reset");
            self.route = None;
            self.cursor = 0;
            self.transition(TrackerPhase::Inactive);
            return Vec::new();
        };

        info!(
            "Route with {} step(s) towards {}",
            route.len(),
            route.destination
        );
        for (i, step) in route.steps.iter().enumerate() {
            debug!(
                "Step {}: {} ({} point(s), {:.0} m)",
                i + 1,
                step.maneuver.instruction,
                step.geometry.len(),
                step.distance
            );
        }

        self.route = Some(route);
        self.cursor = 0;
        // a replacement route restarts from Inactive so the log shows it
        if self.phase == TrackerPhase::Routing {
            self.transition(TrackerPhase::Inactive);
        }
        self.transition(TrackerPhase::Routing);

        self.step_entered().into_iter().collect()
    }

    /// Check the live position against the current step.
    ///
    /// Moves the cursor at most one step per call. On the final step,
    /// reaching the destination emits the arrival and ends tracking.
    pub fn advance(&mut self, dt: Duration, position: &Coordinate) -> Vec<RouteEvent> {
        self.clock += dt;
        if self.phase != TrackerPhase::Routing {
            return Vec::new();
        }
        let Some(route) = &self.route else {
            return Vec::new();
        };
        let threshold = self.config.step_proximity_threshold_deg;

        if self.cursor >= route.last_index() {
            if !position.within(&route.destination, threshold) {
                return Vec::new();
            }
            let destination = route.destination;
            info!("Arrived at {}", destination);
            self.transition(TrackerPhase::Arrived);
            return vec![RouteEvent::Arrived { destination }];
        }

        if !position.within(&route.step_end(self.cursor), threshold) {
            return Vec::new();
        }

        self.cursor += 1;
        info!("Entered step {} of {}", self.cursor + 1, route.len());
        self.step_entered().into_iter().collect()
    }

    /// Stop tracking and forget the route.
    pub fn deactivate(&mut self) {
        self.route = None;
        self.cursor = 0;
        self.transition(TrackerPhase::Inactive);
    }

    pub fn is_routing(&self) -> bool {
        self.phase == TrackerPhase::Routing
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn current_step(&self) -> Option<&RouteStep> {
        self.route.as_ref().and_then(|r| r.steps.get(self.cursor))
    }

    /// Distance from `position` to the end of the current step.
    pub fn progress(&self, position: &Coordinate) -> Option<StepProgress> {
        if self.phase != TrackerPhase::Routing {
            return None;
        }
        let route = self.route.as_ref()?;
        let metres = distance_m(position, &route.step_end(self.cursor));
        let miles = (metres.round() * 0.0006 * 100.0).round() / 100.0;
        Some(StepProgress {
            step_index: self.cursor,
            step_count: route.len(),
            metres,
            miles,
        })
    }

    pub fn history(&self) -> &StateHistory<TrackerPhase> {
        &self.history
    }

    fn step_entered(&self) -> Option<RouteEvent> {
        let route = self.route.as_ref()?;
        let step = route.steps.get(self.cursor)?.clone();
        Some(RouteEvent::StepEntered {
            index: self.cursor,
            step,
            next_point: route.next_point(self.cursor),
            is_final_step: self.cursor == route.last_index(),
        })
    }

    fn transition(&mut self, to: TrackerPhase) {
        if self.phase == to {
            return;
        }
        debug!("Route tracker: {} -> {}", self.phase.name(), to.name());
        self.history.record(self.phase, to, self.clock);
        self.phase = to;
    }
}
