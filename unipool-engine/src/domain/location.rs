use super::point::Point;

/// A rider- or driver-supplied location, which may arrive either as exact
/// coordinates or as free-form address text that still needs geocoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// An exact coordinate pair.
    Coordinate(Point),
    /// Free-form address text, e.g. "Model Town, Lahore".
    Address(String),
}

impl Location {
    /// The coordinate, if this location already carries one.
    pub fn as_coordinate(&self) -> Option<Point> {
        match self {
            Location::Coordinate(p) => Some(*p),
            Location::Address(_) => None,
        }
    }

    /// True when there is nothing to resolve: an address that is blank
    /// after trimming.
    pub fn is_empty(&self) -> bool {
        match self {
            Location::Coordinate(_) => false,
            Location::Address(text) => text.trim().is_empty(),
        }
    }
}

impl From<Point> for Location {
    fn from(point: Point) -> Self {
        Location::Coordinate(point)
    }
}

/// A resolved place: a display label plus its coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub label: String,
    pub point: Point,
}

impl Place {
    pub fn new(label: impl Into<String>, point: Point) -> Self {
        Place {
            label: label.into(),
            point,
        }
    }
}
