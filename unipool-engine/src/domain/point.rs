//! Geographic coordinate types.

use std::fmt;

/// Error returned when constructing an invalid coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidPoint {
    reason: &'static str,
}

/// A validated WGS84 latitude/longitude pair in degrees.
///
/// Latitude is restricted to [-90, 90] and longitude to [-180, 180], both
/// finite. This type guarantees that any `Point` value is valid by
/// construction.
///
/// # Examples
///
/// ```
/// use unipool_engine::domain::Point;
///
/// let campus = Point::new(31.522381, 74.331627).unwrap();
/// assert_eq!(campus.lat(), 31.522381);
///
/// // Out-of-range values are rejected
/// assert!(Point::new(91.0, 74.3).is_err());
/// assert!(Point::new(31.5, 181.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Point {
    lat: f64,
    lng: f64,
}

impl Point {
    /// Construct a point from latitude and longitude in degrees.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidPoint> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidPoint {
                reason: "coordinates must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidPoint {
                reason: "latitude must be between -90 and 90",
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidPoint {
                reason: "longitude must be between -180 and 180",
            });
        }
        Ok(Point { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.lat, self.lng)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_coordinates() {
        assert!(Point::new(31.522381, 74.331627).is_ok());
        assert!(Point::new(0.0, 0.0).is_ok());
        assert!(Point::new(-90.0, -180.0).is_ok());
        assert!(Point::new(90.0, 180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(Point::new(90.001, 0.0).is_err());
        assert!(Point::new(-90.001, 0.0).is_err());
        assert!(Point::new(1234.0, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(Point::new(0.0, 180.001).is_err());
        assert!(Point::new(0.0, -180.001).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Point::new(f64::NAN, 0.0).is_err());
        assert!(Point::new(0.0, f64::NAN).is_err());
        assert!(Point::new(f64::INFINITY, 0.0).is_err());
        assert!(Point::new(0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn accessors_roundtrip() {
        let p = Point::new(31.4662, 74.3436).unwrap();
        assert_eq!(p.lat(), 31.4662);
        assert_eq!(p.lng(), 74.3436);
    }

    #[test]
    fn display_and_debug() {
        let p = Point::new(31.52, 74.35).unwrap();
        assert_eq!(format!("{p}"), "31.52,74.35");
        assert_eq!(format!("{p:?}"), "Point(31.52, 74.35)");
    }

    #[test]
    fn equality() {
        let a = Point::new(31.52, 74.35).unwrap();
        let b = Point::new(31.52, 74.35).unwrap();
        let c = Point::new(31.53, 74.35).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
