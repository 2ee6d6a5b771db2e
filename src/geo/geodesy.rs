//! Spherical-Earth helpers: bearing, haversine distance and great-circle
//! interpolation.

use super::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Initial compass bearing from `a` to `b`, in degrees within `[0, 360)`.
pub fn bearing(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    let mut degrees = y.atan2(x).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    // tiny negative angles round up to exactly 360
    if degrees >= 360.0 {
        degrees -= 360.0;
    }
    degrees
}

/// Haversine great-circle distance in kilometres.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    EARTH_RADIUS_KM * angular_distance(a, b)
}

/// Haversine great-circle distance in metres.
pub fn distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    distance_km(a, b) * 1000.0
}

/// Euclidean distance in degree space, `sqrt(Δlat² + Δlon²)`.
///
/// Only meaningful as a density measure for short segments.
pub fn planar_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let dlat = a.latitude - b.latitude;
    let dlon = a.longitude - b.longitude;
    (dlat * dlat + dlon * dlon).sqrt()
}

/// `n` points evenly spaced along the great circle from `a` to `b`,
/// excluding both endpoints.
///
/// Point `i` sits at fraction `(i + 1) / (n + 1)` of the total distance,
/// reached by travelling from `a` along the initial bearing. A zero-length
/// path yields `n` copies of `a`.
pub fn interpolate(a: &Coordinate, b: &Coordinate, n: usize) -> Vec<Coordinate> {
    if n == 0 {
        return Vec::new();
    }

    let delta = angular_distance(a, b);
    if delta == 0.0 {
        return vec![*a; n];
    }

    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let theta = bearing(a, b).to_radians();

    (1..=n)
        .map(|i| {
            let fraction = i as f64 / (n + 1) as f64;
            destination(lat1, lon1, theta, delta * fraction)
        })
        .collect()
}

/// Central angle between two points, in radians.
fn angular_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Point reached from `(lat1, lon1)` travelling `delta` radians along `theta`.
fn destination(lat1: f64, lon1: f64, theta: f64, delta: f64) -> Coordinate {
    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());
    Coordinate::new(lat2.to_degrees(), lon2.to_degrees())
}
