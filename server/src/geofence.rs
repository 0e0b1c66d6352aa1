//! Great-circle distance and the geofence decision.

use attendance::Position;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two fixes, in metres.
pub fn distance_meters(a: Position, b: Position) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().asin() * EARTH_RADIUS_METERS
}

/// `Err(distance)` when `student` is farther than `radius_meters` from `bus`.
pub fn check(student: Position, bus: Position, radius_meters: f64) -> Result<f64, f64> {
    let distance = distance_meters(student, bus);
    if distance > radius_meters {
        Err(distance)
    } else {
        Ok(distance)
    }
}
