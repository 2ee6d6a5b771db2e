//! Turn-by-turn route handling.
//!
//! [`RouteStepTracker`] consumes a [`RoutingResponse`] and the live position
//! and emits [`RouteEvent`]s. The events are returned to the caller rather
//! than broadcast, so the navigator can hand them to the placement engine
//! before any marker of the new step is placed.

mod model;
mod service;
mod tracker;

pub use model::{
    Maneuver, ManeuverDirection, Route, RouteAlternative, RouteLeg, RouteStep, RoutingResponse,
};
pub use service::{RouteQuery, RoutingError, RoutingService};
pub use tracker::{RouteEvent, RouteStepTracker, StepProgress, TrackerPhase};
