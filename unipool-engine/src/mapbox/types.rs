//! Mapbox API response DTOs.
//!
//! These types map directly to the Mapbox JSON API responses. They use
//! `Option` where Mapbox omits fields depending on the request parameters.

use serde::Deserialize;

/// Response from the geocoding places endpoint (forward or reverse).
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResponse {
    pub features: Vec<GeoFeature>,
}

/// A single geocoding feature.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoFeature {
    /// Full display name, e.g. "Model Town, Lahore, Punjab, Pakistan".
    pub place_name: String,

    /// Coordinate as [longitude, latitude].
    pub center: [f64; 2],

    /// Feature categories, most specific first.
    pub place_type: Vec<String>,

    /// Match relevance in [0, 1]. Omitted on reverse geocoding.
    pub relevance: Option<f64>,
}

/// Response from the driving directions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// "Ok" on success; other codes indicate routing failures.
    pub code: Option<String>,

    #[serde(default)]
    pub routes: Vec<RouteBody>,
}

/// A single route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteBody {
    pub geometry: RouteGeometry,

    /// Total distance in meters.
    pub distance: f64,

    /// Total duration in seconds.
    pub duration: f64,

    pub legs: Option<Vec<RouteLegBody>>,
}

/// GeoJSON line geometry with [longitude, latitude] pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

/// Per-leg annotation wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteLegBody {
    pub annotation: Option<LegAnnotation>,
}

/// Congestion annotation, one label per geometry segment.
#[derive(Debug, Clone, Deserialize)]
pub struct LegAnnotation {
    pub congestion: Option<Vec<String>>,
}

/// Response from the directions-matrix endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixResponse {
    pub code: Option<String>,

    /// Row-major durations in seconds; `null` entries are unreachable pairs.
    pub durations: Option<Vec<Vec<Option<f64>>>>,

    /// Row-major distances in meters.
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}
