//! Geographic primitives.
//!
//! Everything here is a pure function of its inputs. Distances use a
//! spherical Earth; proximity tests on [`Coordinate`] are axis-aligned boxes
//! in degree space.

mod coordinate;
mod geodesy;

pub use coordinate::{Coordinate, CoordinateParseError};
pub use geodesy::{bearing, distance_km, distance_m, interpolate, planar_distance, EARTH_RADIUS_KM};
