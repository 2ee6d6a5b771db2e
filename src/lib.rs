//! Trailmark: tick-driven wayfinding core
//!
//! Trailmark turns a turn-by-turn route into a trail of geolocated
//! directional markers that unrolls ahead of the user as they walk, and only
//! lets markers appear while the device pose is accurate enough to trust.
//!
//! Everything is driven by explicit ticks. Asynchronous collaborators (the
//! routing service and the anchor resolver) answer through non-blocking
//! [`core::Pending`] handles that are polled from the tick.
//!
//! # Components
//!
//! - **Geodesy**: bearing, haversine distance and great-circle interpolation
//! - **Localization**: accuracy gate with a timeout
//! - **Anchor history**: capacity- and age-bounded persisted markers
//! - **Route tracking**: step cursor advancing on proximity to step ends
//! - **Placement**: densification, headings and resolution with retry
//! - **Navigator**: wires the above into one session
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use trailmark::core::Pending;
//! use trailmark::geo::Coordinate;
//! use trailmark::localization::PoseSample;
//! use trailmark::placement::{AnchorHandle, AnchorResolver, ResolveOutcome, ResolveRequest};
//! use trailmark::route::{RouteQuery, RoutingError, RoutingResponse, RoutingService};
//! use trailmark::storage::{KeyValueStore, MemoryStore};
//! use trailmark::Navigator;
//!
//! struct Resolver;
//!
//! impl AnchorResolver for Resolver {
//!     fn resolve(&mut self, _request: ResolveRequest) -> Pending<ResolveOutcome> {
//!         Pending::ready(ResolveOutcome::Resolved(AnchorHandle(1)))
//!     }
//! }
//!
//! struct Directions;
//!
//! impl RoutingService for Directions {
//!     fn query(&mut self, _query: RouteQuery) -> Pending<Result<RoutingResponse, RoutingError>> {
//!         Pending::ready(Ok(RoutingResponse::default()))
//!     }
//! }
//!
//! let mut store = MemoryStore::new();
//! store.set("has_displayed_privacy_prompt", "true".to_string());
//!
//! let mut navigator = Navigator::builder()
//!     .store(store)
//!     .resolver(Resolver)
//!     .routing(Directions)
//!     .build()
//!     .unwrap();
//!
//! navigator.activate().unwrap();
//! let here = Coordinate::new(34.4179562, -119.8570294);
//! let report = navigator.tick(Duration::from_millis(16), &PoseSample::tracked(here, 5.0, 3.0));
//! assert!(navigator.localization().is_trustworthy());
//! assert_eq!(report.status, "Localization completed.");
//! ```

pub mod anchors;
pub mod config;
pub mod core;
pub mod destination;
pub mod geo;
pub mod localization;
pub mod navigator;
pub mod placement;
pub mod route;
pub mod storage;

// Re-export commonly used types
pub use anchors::{AnchorHistory, AnchorHistoryEntry, MarkerKind};
pub use config::NavigationConfig;
pub use core::{Pending, State, StateHistory};
pub use geo::Coordinate;
pub use localization::{LocalizationMachine, LocalizationState, PoseSample};
pub use navigator::{Navigator, SessionPhase, TickReport};
pub use placement::WaypointPlacementEngine;
pub use route::{RouteEvent, RouteStepTracker};
pub use storage::{KeyValueStore, MemoryStore};
