//! Caching layer for stop searches.
//!
//! Stop names and ids change rarely, while the same search text tends to be
//! repeated (autocomplete, resolving saved trips). Results are cached per
//! normalised query; departures, trips and alerts always go to the API.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{Location, LocationKind};
use crate::matching;
use crate::tfnsw::{ApiTransport, DEFAULT_MAX_RESULTS, HttpTransport, TripPlanner, TripPlannerError};

/// Cache key for stop searches: (lower-cased trimmed query, kind filter, limit).
type SearchKey = (String, Option<LocationKind>, usize);

/// Cached search result.
type SearchEntry = Arc<Vec<Location>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 1000,
        }
    }
}

/// Trip planner with cached stop searches.
///
/// Wraps a [`TripPlanner`]; use [`planner`](Self::planner) for operations
/// that are not cached.
pub struct CachedTripPlanner<T = HttpTransport> {
    planner: TripPlanner<T>,
    searches: MokaCache<SearchKey, SearchEntry>,
}

impl<T: ApiTransport + 'static> CachedTripPlanner<T> {
    /// Create a new cached planner.
    pub fn new(planner: TripPlanner<T>, config: &CacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { planner, searches }
    }

    /// Search stops, using the cache if available.
    pub async fn find_stop(
        &self,
        query: &str,
        kind: Option<LocationKind>,
        max_results: usize,
    ) -> Result<SearchEntry, TripPlannerError> {
        let key = (query.trim().to_lowercase(), kind, max_results);

        if let Some(cached) = self.searches.get(&key).await {
            debug!(query, "stop search cache hit");
            return Ok(cached);
        }

        let locations = self.planner.find_stop(query, kind, max_results).await?;
        let entry = Arc::new(locations);
        self.searches.insert(key, Arc::clone(&entry)).await;

        Ok(entry)
    }

    /// Best match for a search, sharing the cache with [`find_stop`](Self::find_stop).
    pub async fn best_stop(&self, query: &str) -> Result<Option<Location>, TripPlannerError> {
        let locations = self.find_stop(query, None, DEFAULT_MAX_RESULTS).await?;
        Ok(matching::best(locations.as_ref().clone()))
    }

    /// Access the underlying planner for operations that bypass the cache.
    pub fn planner(&self) -> &TripPlanner<T> {
        &self.planner
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.searches.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.searches.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfnsw::{Endpoint, FixtureTransport};
    use serde_json::json;

    fn cached(transport: &FixtureTransport) -> CachedTripPlanner<FixtureTransport> {
        CachedTripPlanner::new(
            TripPlanner::with_transport(transport.clone()),
            &CacheConfig::default(),
        )
    }

    fn transport() -> FixtureTransport {
        FixtureTransport::serving(
            Endpoint::StopFinder,
            json!({ "locations": [
                { "id": "10101331", "name": "Circular Quay", "type": "stop" },
                { "id": "w1", "name": "Circular Quay Wharf 2", "type": "platform" }
            ]}),
        )
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(900));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn repeated_search_hits_cache() {
        let transport = transport();
        let cache = cached(&transport);

        let first = cache.find_stop("Circular Quay", None, 5).await.unwrap();
        let second = cache.find_stop("  circular quay ", None, 5).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(transport.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn different_filters_are_separate_entries() {
        let transport = transport();
        let cache = cached(&transport);

        let all = cache.find_stop("Circular Quay", None, 5).await.unwrap();
        let stops = cache
            .find_stop("Circular Quay", Some(LocationKind::Stop), 5)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(stops.len(), 1);
        assert_eq!(transport.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn best_stop_uses_cache() {
        let transport = transport();
        let cache = cached(&transport);

        let best = cache.best_stop("Circular Quay").await.unwrap().unwrap();
        assert_eq!(best.id, "10101331");
        assert!(best.is_best);
        cache.best_stop("Circular Quay").await.unwrap();
        assert_eq!(transport.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let transport = transport();
        let cache = cached(&transport);

        cache.find_stop("Central", None, 5).await.unwrap();
        cache.invalidate_cache();
        cache.find_stop("Central", None, 5).await.unwrap();
        assert_eq!(transport.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let transport = FixtureTransport::new();
        let cache = cached(&transport);

        assert!(cache.find_stop("Central", None, 5).await.is_err());
        transport
            .set_response(Endpoint::StopFinder, json!({ "locations": [] }))
            .await;
        assert!(cache.find_stop("Central", None, 5).await.unwrap().is_empty());
    }
}
