//! Turns route steps into a trail of resolved markers.

use super::resolver::{AnchorHandle, AnchorResolver, ResolveOutcome, ResolveRequest};
use super::rotation::{destination_facing_rotation, facing_user_rotation, trail_rotation};
use super::PlacementNotice;
use crate::anchors::{AnchorHistory, AnchorHistoryEntry, MarkerKind, ResolutionMode};
use crate::config::PlacementConfig;
use crate::core::{Pending, Poll};
use crate::geo::{bearing, interpolate, planar_distance, Coordinate};
use crate::route::RouteEvent;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// A marker the host has anchored.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedMarker {
    /// Id of the history entry the marker was resolved from
    pub id: Uuid,
    pub handle: AnchorHandle,
    pub kind: MarkerKind,
    pub coordinate: Coordinate,
    pub visible: bool,
}

/// Outcome of one round of resolution polling.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolutionReport {
    pub notices: Vec<PlacementNotice>,
    /// A fresh marker was added to the history and should be saved
    pub history_changed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    /// Newly placed along the route
    Fresh,
    /// Re-resolved from a previous session
    Restored,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DestinationMarker {
    NotDue,
    Due(Coordinate),
    Requested,
}

#[derive(Debug)]
struct InFlight {
    entry: AnchorHistoryEntry,
    origin: Origin,
    handle: Pending<ResolveOutcome>,
    attempts: u32,
    polls: u32,
    since_poll: Duration,
    advised: bool,
}

#[derive(Debug)]
struct Retry {
    entry: AnchorHistoryEntry,
    origin: Origin,
    attempts: u32,
}

/// Densifies step geometry into markers and drives their resolution.
///
/// Queued coordinates are only placed once the user is close to them, so
/// the trail unrolls ahead of the user as they walk.
#[derive(Debug)]
pub struct WaypointPlacementEngine {
    config: PlacementConfig,
    queue: VecDeque<Coordinate>,
    step_destination: Option<Coordinate>,
    final_step: bool,
    destination: DestinationMarker,
    in_flight: Vec<InFlight>,
    retries: Vec<Retry>,
    markers: Vec<PlacedMarker>,
    markers_visible: bool,
}

impl WaypointPlacementEngine {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            step_destination: None,
            final_step: false,
            destination: DestinationMarker::NotDue,
            in_flight: Vec::new(),
            retries: Vec::new(),
            markers: Vec::new(),
            markers_visible: true,
        }
    }

    /// Feed a tracker event. Must run before the next placement.
    pub fn on_route_event(&mut self, event: &RouteEvent) {
        match event {
            RouteEvent::StepEntered {
                index,
                step,
                next_point,
                is_final_step,
            } => {
                if *index == 0 {
                    // a new route replaces whatever was left of the old one
                    self.queue.clear();
                    self.destination = DestinationMarker::NotDue;
                }
                self.queue.extend(step.geometry.iter().copied());
                self.step_destination = Some(*next_point);
                self.final_step = *is_final_step;
                debug!(
                    "Queued {} waypoint(s) for step {}, aiming at {}",
                    step.geometry.len(),
                    index + 1,
                    next_point
                );
            }
            RouteEvent::Arrived { destination } => {
                if self.destination == DestinationMarker::NotDue {
                    self.destination = DestinationMarker::Due(*destination);
                }
            }
        }
    }

    /// Request markers for every queued waypoint the user has reached.
    ///
    /// Only call while localization is trustworthy.
    pub fn place_markers<R: AnchorResolver + ?Sized>(
        &mut self,
        position: &Coordinate,
        history: &AnchorHistory,
        resolver: &mut R,
    ) -> usize {
        let threshold = history.limits().similarity_threshold_deg;
        let mut requested = 0;

        if let DestinationMarker::Due(destination) = self.destination {
            self.destination = DestinationMarker::Requested;
            if history.exists(&destination) || self.is_in_flight(&destination, threshold) {
                debug!("Destination marker already stands at {}", destination);
            } else {
                let mut entry = AnchorHistoryEntry::new(
                    destination,
                    0.0,
                    facing_user_rotation(&destination, position),
                    MarkerKind::Destination,
                );
                // a due-south approach yields the identity orientation, which
                // reads as a legacy record; the heading rebuilds the same turn
                entry.heading = bearing(&destination, position);
                self.request(entry, Origin::Fresh, 1, resolver);
                requested += 1;
            }
        }

        requested += self.retry_failed(position, history, resolver);

        let proximity = self.config.proximity_threshold_deg;
        while let Some(start) = self.queue.front().copied() {
            if !start.strictly_within(position, proximity) {
                break;
            }
            self.queue.pop_front();

            let mut group = vec![start];
            if let Some(next) = self.queue.front() {
                let count =
                    (self.config.markers_per_degree * planar_distance(&start, next)).floor() as usize;
                if count > 0 {
                    group.extend(interpolate(&start, next, count));
                }
            }

            let last_group = self.queue.is_empty();
            let aim = self.step_destination.unwrap_or(*position);
            // markers of this group are spaced closer than the threshold
            let busy: Vec<Coordinate> = self.in_flight.iter().map(|f| f.entry.coordinate).collect();

            for (j, coordinate) in group.iter().enumerate() {
                if history.exists(coordinate)
                    || busy.iter().any(|c| c.strictly_within(coordinate, threshold))
                {
                    debug!("Anchor already exists at {}", coordinate);
                    continue;
                }

                let is_last = j + 1 == group.len();
                let towards = group.get(j + 1).copied().unwrap_or(aim);
                let heading = bearing(coordinate, &towards);
                let rotation = if self.final_step && last_group && is_last {
                    destination_facing_rotation(heading, self.config.marker_pitch_deg)
                } else {
                    trail_rotation(heading, self.config.marker_pitch_deg)
                };

                let mut entry =
                    AnchorHistoryEntry::new(*coordinate, 0.0, rotation, MarkerKind::Trail);
                entry.heading = heading;
                self.request(entry, Origin::Fresh, 1, resolver);
                requested += 1;
            }
        }

        requested
    }

    /// Re-resolve every entry of a previous session.
    pub fn restore_history<R: AnchorResolver + ?Sized>(
        &mut self,
        history: &AnchorHistory,
        resolver: &mut R,
    ) -> PlacementNotice {
        for entry in history.entries() {
            self.request(entry.clone(), Origin::Restored, 1, resolver);
        }
        info!("Restoring {} anchor(s) from history", history.len());
        PlacementNotice::RestoringHistory(history.len())
    }

    /// Check in-flight resolutions whose poll interval has elapsed.
    ///
    /// Runs whether or not localization is trustworthy, so answers that
    /// arrive while the pose is degraded are not lost.
    pub fn poll_resolutions(&mut self, dt: Duration, history: &mut AnchorHistory) -> ResolutionReport {
        let mut report = ResolutionReport::default();
        let interval = self.config.poll_interval();
        let mut waiting = Vec::with_capacity(self.in_flight.len());

        for mut flight in std::mem::take(&mut self.in_flight) {
            flight.since_poll += dt;
            if flight.since_poll < interval {
                waiting.push(flight);
                continue;
            }
            flight.since_poll = Duration::ZERO;

            let outcome = match flight.handle.poll() {
                Poll::Waiting => {
                    flight.polls = flight.polls.saturating_add(1);
                    if flight.polls >= self.config.slow_resolve_polls && !flight.advised {
                        flight.advised = true;
                        report.notices.push(PlacementNotice::StillResolving);
                    }
                    waiting.push(flight);
                    continue;
                }
                Poll::Ready(outcome) => outcome,
                Poll::Abandoned => ResolveOutcome::Failed("resolver dropped the request".to_string()),
            };

            match outcome {
                ResolveOutcome::Resolved(handle) => {
                    debug!("Resolved {:?} anchor at {}", flight.entry.kind, flight.entry.coordinate);
                    self.markers.push(PlacedMarker {
                        id: flight.entry.id,
                        handle,
                        kind: flight.entry.kind,
                        coordinate: flight.entry.coordinate,
                        visible: self.markers_visible,
                    });
                    if flight.origin == Origin::Fresh {
                        history.add(flight.entry);
                        report.history_changed = true;
                    }
                    report.notices.push(PlacementNotice::AnchorsSet(self.markers.len()));
                }
                ResolveOutcome::Failed(reason) => {
                    let mode = flight.entry.kind.resolution_mode();
                    warn!(
                        "Failed to resolve {} anchor at {} (attempt {}): {}",
                        mode, flight.entry.coordinate, flight.attempts, reason
                    );
                    report.notices.push(PlacementNotice::ResolveFailed(mode));
                    if flight.attempts < self.config.max_resolution_attempts {
                        self.retries.push(Retry {
                            entry: flight.entry,
                            origin: flight.origin,
                            attempts: flight.attempts,
                        });
                    } else {
                        warn!(
                            "Giving up on anchor at {} after {} attempt(s)",
                            flight.entry.coordinate, flight.attempts
                        );
                    }
                }
            }
        }

        self.in_flight = waiting;
        report
    }

    pub fn set_markers_visible(&mut self, visible: bool) {
        self.markers_visible = visible;
        for marker in &mut self.markers {
            marker.visible = visible;
        }
    }

    pub fn markers_visible(&self) -> bool {
        self.markers_visible
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    /// Remove every placed marker and forget pending resolutions.
    pub fn clear_markers(&mut self) {
        self.markers.clear();
        self.in_flight.clear();
        self.retries.clear();
    }

    /// Drop all state. In-flight handles are dropped, which cancels them.
    pub fn deactivate(&mut self) {
        if !self.in_flight.is_empty() {
            debug!("Cancelling {} in-flight resolution(s)", self.in_flight.len());
        }
        self.clear_markers();
        self.queue.clear();
        self.step_destination = None;
        self.final_step = false;
        self.destination = DestinationMarker::NotDue;
        self.markers_visible = true;
    }

    /// Waypoints not yet placed.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Failed markers waiting for another attempt.
    pub fn pending_retries(&self) -> usize {
        self.retries.len()
    }

    fn retry_failed<R: AnchorResolver + ?Sized>(
        &mut self,
        position: &Coordinate,
        history: &AnchorHistory,
        resolver: &mut R,
    ) -> usize {
        let proximity = self.config.proximity_threshold_deg;
        let (due, later): (Vec<Retry>, Vec<Retry>) = std::mem::take(&mut self.retries)
            .into_iter()
            .partition(|r| {
                r.origin == Origin::Restored || r.entry.coordinate.strictly_within(position, proximity)
            });
        self.retries = later;

        let mut requested = 0;
        for retry in due {
            if retry.origin == Origin::Fresh && history.exists(&retry.entry.coordinate) {
                continue;
            }
            self.request(retry.entry, retry.origin, retry.attempts + 1, resolver);
            requested += 1;
        }
        requested
    }

    fn is_in_flight(&self, coordinate: &Coordinate, threshold: f64) -> bool {
        self.in_flight
            .iter()
            .any(|f| f.entry.coordinate.strictly_within(coordinate, threshold))
    }

    fn request<R: AnchorResolver + ?Sized>(
        &mut self,
        entry: AnchorHistoryEntry,
        origin: Origin,
        attempts: u32,
        resolver: &mut R,
    ) {
        let mode = entry.kind.resolution_mode();
        let altitude = match mode {
            ResolutionMode::Terrain => 0.0,
            ResolutionMode::Geospatial => entry.altitude,
        };
        debug!(
            "Requesting {} anchor at {} (attempt {})",
            mode, entry.coordinate, attempts
        );
        let handle = resolver.resolve(ResolveRequest {
            coordinate: entry.coordinate,
            altitude,
            rotation: entry.rotation(),
            mode,
        });
        self.in_flight.push(InFlight {
            entry,
            origin,
            handle,
            attempts,
            polls: 0,
            // first check happens on the next poll
            since_poll: self.config.poll_interval(),
            advised: false,
        });
    }
}
