//! Conversion from Mapbox DTOs to gateway result types.
//!
//! Mapbox speaks [longitude, latitude]; the rest of the crate speaks
//! `Point` with validated latitude first. All coordinate flips happen here.

use tracing::warn;

use crate::domain::Point;

use super::types::{GeoFeature, MatrixResponse, RouteBody};

/// Error during DTO to result conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Coordinate out of range
    #[error("coordinate out of range: [{lng}, {lat}]")]
    InvalidCoordinate { lng: f64, lat: f64 },

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// A geocoding candidate, normalized from a provider feature or supplied by
/// the gazetteer fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// Display name, e.g. "Model Town, Lahore, Punjab, Pakistan".
    pub name: String,

    pub point: Point,

    /// Coarse place category, e.g. "poi", "neighborhood", "university".
    pub kind: String,

    /// Match relevance in [0, 1].
    pub relevance: f64,

    /// True when this candidate came from the static gazetteer rather than
    /// the provider.
    pub is_fallback: bool,
}

/// A normalized driving route.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRoute {
    /// Ordered route geometry.
    pub geometry: Vec<Point>,

    pub distance_meters: f64,

    pub duration_seconds: f64,

    /// Per-segment congestion labels, empty when the provider sent none.
    pub congestion: Vec<String>,
}

/// A distance/duration matrix between n points.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrix {
    /// Row-major durations in seconds; `None` marks an unreachable pair.
    pub durations_seconds: Vec<Vec<Option<f64>>>,

    /// Row-major distances in meters.
    pub distances_meters: Vec<Vec<Option<f64>>>,
}

/// Convert geocoding features to candidates.
///
/// Features with out-of-range coordinates are logged and skipped rather
/// than failing the whole response.
pub fn convert_features(features: &[GeoFeature]) -> Vec<GeocodeCandidate> {
    let mut candidates = Vec::with_capacity(features.len());

    for feature in features {
        match candidate_from_feature(feature) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => {
                warn!(place = %feature.place_name, error = %e, "skipping geocoding feature");
            }
        }
    }

    candidates
}

/// Convert a single geocoding feature.
pub fn candidate_from_feature(feature: &GeoFeature) -> Result<GeocodeCandidate, ConversionError> {
    let [lng, lat] = feature.center;
    let point = Point::new(lat, lng)
        .map_err(|_| ConversionError::InvalidCoordinate { lng, lat })?;

    let kind = feature
        .place_type
        .first()
        .cloned()
        .unwrap_or_else(|| "place".to_string());

    Ok(GeocodeCandidate {
        name: feature.place_name.clone(),
        point,
        kind,
        relevance: feature.relevance.unwrap_or(1.0),
        is_fallback: false,
    })
}

/// Convert a directions route body.
///
/// Congestion labels are flattened across legs; an invalid geometry
/// coordinate fails the conversion, since a silently truncated route would
/// be worse than no route.
pub fn convert_route(route: &RouteBody) -> Result<DirectionsRoute, ConversionError> {
    let mut geometry = Vec::with_capacity(route.geometry.coordinates.len());
    for &[lng, lat] in &route.geometry.coordinates {
        let point = Point::new(lat, lng)
            .map_err(|_| ConversionError::InvalidCoordinate { lng, lat })?;
        geometry.push(point);
    }

    let congestion = route
        .legs
        .iter()
        .flatten()
        .filter_map(|leg| leg.annotation.as_ref())
        .filter_map(|annotation| annotation.congestion.as_ref())
        .flatten()
        .cloned()
        .collect();

    Ok(DirectionsRoute {
        geometry,
        distance_meters: route.distance,
        duration_seconds: route.duration,
        congestion,
    })
}

/// Convert a matrix response.
pub fn convert_matrix(response: &MatrixResponse) -> Result<TravelMatrix, ConversionError> {
    let durations = response
        .durations
        .clone()
        .ok_or(ConversionError::MissingField("durations"))?;
    let distances = response
        .distances
        .clone()
        .ok_or(ConversionError::MissingField("distances"))?;

    Ok(TravelMatrix {
        durations_seconds: durations,
        distances_meters: distances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapbox::types::GeocodingResponse;

    fn feature(name: &str, lng: f64, lat: f64, relevance: Option<f64>) -> GeoFeature {
        GeoFeature {
            place_name: name.to_string(),
            center: [lng, lat],
            place_type: vec!["neighborhood".to_string()],
            relevance,
        }
    }

    #[test]
    fn feature_converts_with_flipped_axes() {
        let f = feature("Model Town, Lahore, Pakistan", 74.3436, 31.4662, Some(0.96));
        let candidate = candidate_from_feature(&f).unwrap();

        assert_eq!(candidate.point.lat(), 31.4662);
        assert_eq!(candidate.point.lng(), 74.3436);
        assert_eq!(candidate.kind, "neighborhood");
        assert_eq!(candidate.relevance, 0.96);
        assert!(!candidate.is_fallback);
    }

    #[test]
    fn missing_relevance_defaults_to_one() {
        let f = feature("Gulberg III, Lahore, Pakistan", 74.36, 31.52, None);
        let candidate = candidate_from_feature(&f).unwrap();
        assert_eq!(candidate.relevance, 1.0);
    }

    #[test]
    fn out_of_range_feature_is_skipped() {
        let good = feature("Jail Road, Lahore, Pakistan", 74.34, 31.53, Some(0.9));
        let bad = feature("Nowhere", 74.34, 131.53, Some(0.9));

        let candidates = convert_features(&[good, bad]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Jail Road, Lahore, Pakistan");
    }

    #[test]
    fn route_conversion_flattens_congestion() {
        let json = r#"{
            "geometry": {"coordinates": [[74.3436, 31.4662], [74.331627, 31.522381]]},
            "distance": 8123.4,
            "duration": 1056.0,
            "legs": [
                {"annotation": {"congestion": ["low"]}},
                {"annotation": {"congestion": ["heavy", "moderate"]}}
            ]
        }"#;
        let body: RouteBody = serde_json::from_str(json).unwrap();

        let route = convert_route(&body).unwrap();
        assert_eq!(route.geometry.len(), 2);
        assert_eq!(route.geometry[0].lat(), 31.4662);
        assert_eq!(route.distance_meters, 8123.4);
        assert_eq!(route.duration_seconds, 1056.0);
        assert_eq!(route.congestion, vec!["low", "heavy", "moderate"]);
    }

    #[test]
    fn route_with_invalid_geometry_fails() {
        let json = r#"{
            "geometry": {"coordinates": [[274.0, 31.46]]},
            "distance": 10.0,
            "duration": 1.0
        }"#;
        let body: RouteBody = serde_json::from_str(json).unwrap();
        assert!(convert_route(&body).is_err());
    }

    #[test]
    fn matrix_requires_both_tables() {
        let missing: MatrixResponse =
            serde_json::from_str(r#"{"code": "Ok", "durations": [[0.0]]}"#).unwrap();
        assert!(matches!(
            convert_matrix(&missing),
            Err(ConversionError::MissingField("distances"))
        ));

        let full: MatrixResponse = serde_json::from_str(
            r#"{"code": "Ok", "durations": [[0.0, 60.0]], "distances": [[0.0, 900.0]]}"#,
        )
        .unwrap();
        let matrix = convert_matrix(&full).unwrap();
        assert_eq!(matrix.durations_seconds[0][1], Some(60.0));
        assert_eq!(matrix.distances_meters[0][1], Some(900.0));
    }

    #[test]
    fn full_geocoding_response_converts() {
        let json = r#"{
            "features": [
                {
                    "place_name": "DHA Phase 5, Lahore, Pakistan",
                    "center": [74.37, 31.471],
                    "place_type": ["neighborhood"],
                    "relevance": 0.88
                }
            ]
        }"#;
        let response: GeocodingResponse = serde_json::from_str(json).unwrap();
        let candidates = convert_features(&response.features);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, "neighborhood");
    }
}
