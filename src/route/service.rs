//! Routing service seam.

use super::model::RoutingResponse;
use crate::config::RoutingProfile;
use crate::core::Pending;
use crate::geo::Coordinate;
use thiserror::Error;

/// A directions request from the current position to the destination.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteQuery {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub profile: RoutingProfile,
    pub alternatives: bool,
    /// Include turn-by-turn steps
    pub steps: bool,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RoutingError {
    #[error("Routing service unavailable: {0}")]
    Unavailable(String),

    #[error("Routing response could not be decoded: {0}")]
    InvalidResponse(String),
}

/// Supplies turn-by-turn directions.
///
/// The answer arrives asynchronously; the navigator polls the returned
/// handle once per tick and drops it when the session is deactivated.
pub trait RoutingService {
    fn query(&mut self, query: RouteQuery) -> Pending<Result<RoutingResponse, RoutingError>>;
}
