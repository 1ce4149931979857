//! Mapbox geocoding and directions client.
//!
//! This module provides an HTTP client for the Mapbox APIs used by the
//! geocoding gateway: forward and reverse geocoding (places v5), driving
//! directions, and the directions-matrix endpoint.
//!
//! Key characteristics of the Mapbox APIs:
//! - Coordinates are **[longitude, latitude]** on the wire; the conversion
//!   layer flips them into validated `Point` values
//! - The access token travels as a query parameter, not a header
//! - Geocoding is biased to the Lahore campus region (country filter,
//!   bounding box, proximity point)

mod client;
mod convert;
mod error;
mod types;

pub use client::{MapboxClient, MapboxConfig};
pub use convert::{ConversionError, DirectionsRoute, GeocodeCandidate, TravelMatrix};
pub use error::MapboxError;
pub use types::{
    DirectionsResponse, GeoFeature, GeocodingResponse, LegAnnotation, MatrixResponse, RouteBody,
    RouteGeometry, RouteLegBody,
};
