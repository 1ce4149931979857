//! Great-circle distance computation.

use crate::domain::Point;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometers rounded to two
/// decimal places.
pub fn distance_km(a: Point, b: Point) -> f64 {
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lng = (b.lng() - a.lng()).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat().to_radians().cos() * b.lat().to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // h can exceed 1 by an ulp for near-antipodal pairs.
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    round2(EARTH_RADIUS_KM * c)
}

/// Haversine distance in meters. Granularity is 10 m because the kilometer
/// value is rounded first.
pub fn distance_meters(a: Point, b: Point) -> f64 {
    distance_km(a, b) * 1000.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
