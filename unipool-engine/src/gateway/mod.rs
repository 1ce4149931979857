//! Caching and quota-keeping front door for geocoding and routing.
//!
//! The gateway sits between the engine and the Mapbox client. Every lookup
//! goes through a TTL cache keyed by normalized input, outbound calls are
//! counted against a rolling per-minute quota, and autocomplete lookups are
//! debounced per query. When the provider fails or returns nothing for a
//! forward geocode, the local gazetteer answers instead so ride search never
//! breaks on a provider outage.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, warn};

use crate::domain::Point;
use crate::gazetteer::Gazetteer;
use crate::mapbox::{
    DirectionsRoute, GeocodeCandidate, MapboxClient, MapboxError, TravelMatrix,
};

mod debounce;
mod rate;

pub use debounce::Debouncer;
pub use rate::{QuotaExceeded, RateWindow};

/// Relevance assigned to gazetteer answers when the provider had nothing.
const FALLBACK_RELEVANCE: f64 = 0.9;

/// Relevance assigned to gazetteer entries merged into autocomplete results.
/// Local entries outrank anything the provider returns.
const SUGGEST_FALLBACK_RELEVANCE: f64 = 1.0;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The rolling call budget for the provider is used up.
    #[error("geocoding call budget exhausted ({quota} calls per {window_secs}s)")]
    RateLimited { quota: u32, window_secs: u64 },
    /// The provider returned an error the gateway does not absorb.
    #[error("geocoding provider error: {0}")]
    Provider(#[from] MapboxError),
}

/// The provider surface the gateway consumes.
///
/// [`MapboxClient`] is the production implementation; tests substitute mocks.
#[allow(async_fn_in_trait)]
pub trait GeoProvider {
    async fn geocode(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeCandidate>, MapboxError>;

    async fn reverse_geocode(&self, point: Point) -> Result<Option<GeocodeCandidate>, MapboxError>;

    async fn directions(
        &self,
        origin: Point,
        destination: Point,
    ) -> Result<DirectionsRoute, MapboxError>;

    async fn matrix(&self, points: &[Point]) -> Result<TravelMatrix, MapboxError>;
}

impl GeoProvider for MapboxClient {
    async fn geocode(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeCandidate>, MapboxError> {
        MapboxClient::geocode(self, query, limit).await
    }

    async fn reverse_geocode(&self, point: Point) -> Result<Option<GeocodeCandidate>, MapboxError> {
        MapboxClient::reverse_geocode(self, point).await
    }

    async fn directions(
        &self,
        origin: Point,
        destination: Point,
    ) -> Result<DirectionsRoute, MapboxError> {
        MapboxClient::directions(self, origin, destination).await
    }

    async fn matrix(&self, points: &[Point]) -> Result<TravelMatrix, MapboxError> {
        MapboxClient::matrix(self, points).await
    }
}

/// Cache, quota, and debounce settings for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// How long forward and reverse geocode results stay cached.
    pub geocode_ttl: Duration,
    /// How long directions results stay cached.
    pub directions_ttl: Duration,
    /// How long travel matrices stay cached.
    pub matrix_ttl: Duration,
    /// Entry cap per cache.
    pub max_cache_entries: u64,
    /// Provider calls allowed per rate window.
    pub quota_per_window: u32,
    /// Length of the rate window.
    pub rate_window: Duration,
    /// Quiet period before an autocomplete lookup goes out.
    pub debounce: Duration,
    /// Result cap for forward geocoding.
    pub geocode_limit: usize,
    /// Result cap for autocomplete suggestions.
    pub suggest_limit: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            geocode_ttl: Duration::from_secs(3600),
            directions_ttl: Duration::from_secs(1800),
            matrix_ttl: Duration::from_secs(900),
            max_cache_entries: 1000,
            quota_per_window: 300,
            rate_window: Duration::from_secs(60),
            debounce: Duration::from_millis(300),
            geocode_limit: 5,
            suggest_limit: 8,
        }
    }
}

/// Cached, rate-limited facade over a [`GeoProvider`].
pub struct GeoGateway<P> {
    provider: P,
    gazetteer: Gazetteer,
    places: Cache<String, Arc<Vec<GeocodeCandidate>>>,
    directions: Cache<String, Arc<DirectionsRoute>>,
    matrices: Cache<String, Arc<TravelMatrix>>,
    rate: RateWindow,
    debouncer: Debouncer,
    config: GatewayConfig,
}

impl<P: GeoProvider> GeoGateway<P> {
    pub fn new(provider: P, gazetteer: Gazetteer, config: GatewayConfig) -> Self {
        let places = Cache::builder()
            .time_to_live(config.geocode_ttl)
            .max_capacity(config.max_cache_entries)
            .build();
        let directions = Cache::builder()
            .time_to_live(config.directions_ttl)
            .max_capacity(config.max_cache_entries)
            .build();
        let matrices = Cache::builder()
            .time_to_live(config.matrix_ttl)
            .max_capacity(config.max_cache_entries)
            .build();
        let rate = RateWindow::new(config.quota_per_window, config.rate_window);
        let debouncer = Debouncer::new(config.debounce);
        Self {
            provider,
            gazetteer,
            places,
            directions,
            matrices,
            rate,
            debouncer,
            config,
        }
    }

    /// Resolve a free-text query to candidate places.
    ///
    /// Provider failures and empty responses never surface here: the
    /// gazetteer answers instead (uncached, so the provider is retried next
    /// time), and an empty result means the query matched nothing anywhere.
    /// Only the gateway's own quota error is returned.
    pub async fn geocode(&self, query: &str) -> Result<Arc<Vec<GeocodeCandidate>>, GatewayError> {
        let key = format!("geocode:{}", normalize(query));
        if let Some(hit) = self.places.get(&key).await {
            debug!(%query, "geocode cache hit");
            return Ok(hit);
        }

        self.acquire_slot().await?;
        match self.provider.geocode(query, self.config.geocode_limit).await {
            Ok(candidates) if !candidates.is_empty() => {
                let entry = Arc::new(candidates);
                self.places.insert(key, Arc::clone(&entry)).await;
                Ok(entry)
            }
            Ok(_) => Ok(Arc::new(self.fallback_candidates(query, FALLBACK_RELEVANCE))),
            Err(e) => {
                warn!(%query, error = %e, "geocoding failed, answering from gazetteer");
                Ok(Arc::new(self.fallback_candidates(query, FALLBACK_RELEVANCE)))
            }
        }
    }

    /// Resolve a coordinate to its nearest place, if the provider knows one.
    pub async fn reverse_geocode(
        &self,
        point: Point,
    ) -> Result<Option<GeocodeCandidate>, GatewayError> {
        let key = format!("reverse:{:.6},{:.6}", point.lng(), point.lat());
        if let Some(hit) = self.places.get(&key).await {
            return Ok(hit.first().cloned());
        }

        self.acquire_slot().await?;
        let candidate = self.provider.reverse_geocode(point).await?;
        let entry: Arc<Vec<GeocodeCandidate>> =
            Arc::new(candidate.clone().into_iter().collect());
        self.places.insert(key, entry).await;
        Ok(candidate)
    }

    /// Fetch a driving route between two points.
    pub async fn directions(
        &self,
        origin: Point,
        destination: Point,
    ) -> Result<Arc<DirectionsRoute>, GatewayError> {
        let key = format!(
            "directions:{:.6},{:.6};{:.6},{:.6}",
            origin.lng(),
            origin.lat(),
            destination.lng(),
            destination.lat()
        );
        if let Some(hit) = self.directions.get(&key).await {
            return Ok(hit);
        }

        self.acquire_slot().await?;
        let route = self.provider.directions(origin, destination).await?;
        let entry = Arc::new(route);
        self.directions.insert(key, Arc::clone(&entry)).await;
        Ok(entry)
    }

    /// Fetch pairwise travel times and distances for a set of points.
    pub async fn matrix(&self, points: &[Point]) -> Result<Arc<TravelMatrix>, GatewayError> {
        let coords: Vec<String> = points
            .iter()
            .map(|p| format!("{:.6},{:.6}", p.lng(), p.lat()))
            .collect();
        let key = format!("matrix:{}", coords.join(";"));
        if let Some(hit) = self.matrices.get(&key).await {
            return Ok(hit);
        }

        self.acquire_slot().await?;
        let matrix = self.provider.matrix(points).await?;
        let entry = Arc::new(matrix);
        self.matrices.insert(key, Arc::clone(&entry)).await;
        Ok(entry)
    }

    /// Autocomplete a partial query.
    ///
    /// The call is debounced per normalized query; a superseded call settles
    /// with an empty result. Gazetteer matches are merged ahead of provider
    /// results, duplicates by exact coordinate keep the first occurrence, and
    /// the merged list is sorted by descending relevance.
    pub async fn suggest(&self, prefix: &str) -> Result<Vec<GeocodeCandidate>, GatewayError> {
        let normalized = normalize(prefix);
        if !self.debouncer.settle(&normalized).await {
            debug!(%prefix, "suggestion lookup superseded");
            return Ok(Vec::new());
        }

        self.acquire_slot().await?;
        let mut merged = self.fallback_candidates(prefix, SUGGEST_FALLBACK_RELEVANCE);
        match self.provider.geocode(prefix, self.config.suggest_limit).await {
            Ok(candidates) => merged.extend(candidates),
            Err(e) => {
                warn!(%prefix, error = %e, "suggestion lookup failed, serving gazetteer only");
            }
        }

        dedupe_by_coordinate(&mut merged);
        merged.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
        merged.truncate(self.config.suggest_limit);
        Ok(merged)
    }

    async fn acquire_slot(&self) -> Result<(), GatewayError> {
        self.rate.try_acquire().await.map_err(|e| {
            warn!(used = e.count, quota = e.quota, "provider call budget exhausted");
            GatewayError::RateLimited {
                quota: e.quota,
                window_secs: self.config.rate_window.as_secs(),
            }
        })
    }

    fn fallback_candidates(&self, query: &str, relevance: f64) -> Vec<GeocodeCandidate> {
        self.gazetteer
            .search(query)
            .into_iter()
            .map(|entry| GeocodeCandidate {
                name: entry.address.clone(),
                point: entry.point,
                kind: entry.kind.clone(),
                relevance,
                is_fallback: true,
            })
            .collect()
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Keep the first candidate seen at each exact coordinate.
fn dedupe_by_coordinate(candidates: &mut Vec<GeocodeCandidate>) {
    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert((c.point.lng().to_bits(), c.point.lat().to_bits())));
}
