//! Marker orientations in the East-Up-North frame.
//!
//! `x` points east, `y` up and `z` north. A marker model faces `+z`, so an
//! unrotated marker points north.

use crate::geo::{bearing, Coordinate};
use nalgebra::{UnitQuaternion, Vector3};

/// Euler rotation applied roll first, then pitch, then yaw:
/// `Ry(yaw) * Rx(pitch) * Rz(roll)`, all in degrees.
pub fn euler_zxy(pitch_deg: f64, yaw_deg: f64, roll_deg: f64) -> UnitQuaternion<f64> {
    let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_deg.to_radians());
    let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch_deg.to_radians());
    let roll = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll_deg.to_radians());
    yaw * pitch * roll
}

/// Trail arrow tilted by `pitch_deg` and turned to `heading_deg`.
pub fn trail_rotation(heading_deg: f64, pitch_deg: f64) -> UnitQuaternion<f64> {
    euler_zxy(pitch_deg, heading_deg, 0.0)
}

/// Last arrow before the destination; the heading becomes a roll so the
/// arrow lies towards the destination pin.
pub fn destination_facing_rotation(heading_deg: f64, pitch_deg: f64) -> UnitQuaternion<f64> {
    euler_zxy(pitch_deg, 0.0, heading_deg)
}

/// Destination pin turned to face a user standing at `device`.
pub fn facing_user_rotation(destination: &Coordinate, device: &Coordinate) -> UnitQuaternion<f64> {
    let heading = bearing(destination, device);
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), (180.0 - heading).to_radians())
}
