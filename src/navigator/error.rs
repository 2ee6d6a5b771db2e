//! Navigator errors.

use crate::config::ConfigError;
use crate::geo::CoordinateParseError;
use thiserror::Error;

/// Errors that can occur when assembling a navigator.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Key/value store not specified. Call .store(store) before .build()")]
    MissingStore,

    #[error("Anchor resolver not specified. Call .resolver(resolver) before .build()")]
    MissingResolver,

    #[error("Routing service not specified. Call .routing(service) before .build()")]
    MissingRoutingService,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Errors returned by navigator operations.
#[derive(Debug, Error, PartialEq)]
pub enum NavigationError {
    #[error("No device position yet")]
    NoPosition,

    #[error("No destination set")]
    NoDestination,

    #[error("No empty parking slot available")]
    NoParkingSlot,

    #[error("Invalid destination: {0}")]
    InvalidDestination(#[from] CoordinateParseError),

    #[error("The session has ended")]
    SessionEnded,
}
