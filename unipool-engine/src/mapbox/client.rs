//! Mapbox HTTP client.
//!
//! Provides async methods for the Mapbox geocoding, directions, and
//! directions-matrix APIs. Handles authentication, concurrency capping, and
//! conversion to normalized result types.

use std::sync::Arc;

use reqwest::Url;
use tokio::sync::Semaphore;

use crate::domain::Point;

use super::convert::{self, DirectionsRoute, GeocodeCandidate, TravelMatrix};
use super::error::MapboxError;
use super::types::{DirectionsResponse, GeocodingResponse, MatrixResponse};

/// Default base URL for the Mapbox API.
const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Default ISO country filter for geocoding.
const DEFAULT_COUNTRY: &str = "PK";

/// Lahore search region as minLng,minLat,maxLng,maxLat.
const DEFAULT_BBOX: &str = "74.2,31.4,74.5,31.6";

/// Proximity bias for geocoding: the FCC campus, as lng,lat.
const DEFAULT_PROXIMITY: &str = "74.331627,31.522381";

/// Feature categories requested from the geocoder.
const GEOCODE_TYPES: &str = "address,poi,neighborhood";

/// Configuration for the Mapbox client.
#[derive(Debug, Clone)]
pub struct MapboxConfig {
    /// Access token for authentication
    pub access_token: String,
    /// Base URL for the API (defaults to production Mapbox)
    pub base_url: String,
    /// ISO country filter for geocoding results
    pub country: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MapboxConfig {
    /// Create a new config with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the ISO country filter.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Mapbox API client.
///
/// Provides methods for geocoding, directions, and travel matrices.
/// Uses a semaphore to limit concurrent requests to the provider.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    country: String,
    semaphore: Arc<Semaphore>,
}

impl MapboxClient {
    /// Create a new Mapbox client with the given configuration.
    pub fn new(config: MapboxConfig) -> Result<Self, MapboxError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            access_token: config.access_token,
            country: config.country,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Forward-geocode free text to ranked candidates.
    ///
    /// Results are restricted to the configured country and biased towards
    /// the Lahore campus region. "No results" is an empty vector, not an
    /// error.
    pub async fn geocode(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeCandidate>, MapboxError> {
        let _permit = self.acquire_permit().await?;

        let url = self.endpoint_url(
            &["geocoding", "v5", "mapbox.places"],
            &format!("{query}.json"),
        )?;

        let response = self
            .http
            .get(url)
            .query(&[
                ("access_token", self.access_token.clone()),
                ("country", self.country.clone()),
                ("types", GEOCODE_TYPES.to_string()),
                ("limit", limit.to_string()),
                ("bbox", DEFAULT_BBOX.to_string()),
                ("proximity", DEFAULT_PROXIMITY.to_string()),
            ])
            .send()
            .await?;

        let body = Self::check_status(response).await?;

        let parsed: GeocodingResponse =
            serde_json::from_str(&body).map_err(|e| MapboxError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(convert::convert_features(&parsed.features))
    }

    /// Reverse-geocode a coordinate to its best-matching place, if any.
    pub async fn reverse_geocode(
        &self,
        point: Point,
    ) -> Result<Option<GeocodeCandidate>, MapboxError> {
        let _permit = self.acquire_permit().await?;

        let url = self.endpoint_url(
            &["geocoding", "v5", "mapbox.places"],
            &format!("{},{}.json", point.lng(), point.lat()),
        )?;

        let response = self
            .http
            .get(url)
            .query(&[
                ("access_token", self.access_token.clone()),
                ("types", GEOCODE_TYPES.to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let body = Self::check_status(response).await?;

        let parsed: GeocodingResponse =
            serde_json::from_str(&body).map_err(|e| MapboxError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(convert::convert_features(&parsed.features).into_iter().next())
    }

    /// Fetch a driving route between two points.
    ///
    /// Returns `NoRoute` when the provider cannot connect the points.
    pub async fn directions(
        &self,
        origin: Point,
        destination: Point,
    ) -> Result<DirectionsRoute, MapboxError> {
        let _permit = self.acquire_permit().await?;

        let pair = format!(
            "{},{};{},{}",
            origin.lng(),
            origin.lat(),
            destination.lng(),
            destination.lat()
        );
        let url = self.endpoint_url(&["directions", "v5", "mapbox", "driving"], &pair)?;

        let response = self
            .http
            .get(url)
            .query(&[
                ("access_token", self.access_token.clone()),
                ("geometries", "geojson".to_string()),
                ("overview", "full".to_string()),
                ("annotations", "congestion".to_string()),
            ])
            .send()
            .await?;

        let body = Self::check_status(response).await?;

        let parsed: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| MapboxError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let route = parsed.routes.first().ok_or(MapboxError::NoRoute)?;

        convert::convert_route(route).map_err(|e| MapboxError::Json {
            message: e.to_string(),
            body: None,
        })
    }

    /// Fetch a distance/duration matrix between the given points.
    pub async fn matrix(&self, points: &[Point]) -> Result<TravelMatrix, MapboxError> {
        let _permit = self.acquire_permit().await?;

        let coords = points
            .iter()
            .map(|p| format!("{},{}", p.lng(), p.lat()))
            .collect::<Vec<_>>()
            .join(";");
        let url = self.endpoint_url(&["directions-matrix", "v1", "mapbox", "driving"], &coords)?;

        let response = self
            .http
            .get(url)
            .query(&[
                ("access_token", self.access_token.clone()),
                ("annotations", "distance,duration".to_string()),
            ])
            .send()
            .await?;

        let body = Self::check_status(response).await?;

        let parsed: MatrixResponse =
            serde_json::from_str(&body).map_err(|e| MapboxError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        convert::convert_matrix(&parsed).map_err(|e| MapboxError::Json {
            message: e.to_string(),
            body: None,
        })
    }

    async fn acquire_permit(&self) -> Result<tokio::sync::SemaphorePermit<'_>, MapboxError> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| MapboxError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })
    }

    /// Build an endpoint URL, percent-encoding the final resource segment.
    fn endpoint_url(&self, segments: &[&str], resource: &str) -> Result<Url, MapboxError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| MapboxError::Api {
            status: 0,
            message: format!("invalid base URL: {e}"),
        })?;

        {
            let mut path = url.path_segments_mut().map_err(|_| MapboxError::Api {
                status: 0,
                message: "base URL cannot be a base".to_string(),
            })?;
            path.pop_if_empty();
            path.extend(segments);
            path.push(resource);
        }

        Ok(url)
    }

    async fn check_status(response: reqwest::Response) -> Result<String, MapboxError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MapboxError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MapboxError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapboxError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}
