//! Caching layer for search results.
//!
//! The fare table and trip configuration are fixed for the life of the
//! process, so a result computed once stays correct. The TTL and capacity
//! only bound memory.
//!
//! Concurrent requests for the same key share one computation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::Itinerary;
use crate::planner::{ScenarioFilter, SummaryMatrix};

/// Cache key for itinerary searches: (window name, scenarios, result count).
/// `None` for the window means all windows.
pub type SearchKey = (Option<String>, ScenarioFilter, usize);

/// Cached search results, best first.
pub type SearchEntry = Arc<Vec<Itinerary>>;

/// Cache key for summary matrices: window name, or `None` for all windows.
pub type SummaryKey = Option<String>;

/// Cached summary matrix.
pub type SummaryEntry = Arc<SummaryMatrix>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 256,
        }
    }
}

/// Cache for search and summary results.
pub struct ResultCache {
    searches: MokaCache<SearchKey, SearchEntry>,
    summaries: MokaCache<SummaryKey, SummaryEntry>,
}

impl ResultCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let summaries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            searches,
            summaries,
        }
    }

    /// Get cached search results, computing them with `init` on a miss.
    ///
    /// Errors are returned to every waiting caller and not cached.
    pub async fn search_with<E, F>(&self, key: SearchKey, init: F) -> Result<SearchEntry, Arc<E>>
    where
        F: Future<Output = Result<SearchEntry, E>>,
        E: Send + Sync + 'static,
    {
        self.searches.try_get_with(key, init).await
    }

    /// Get a cached summary matrix, computing it with `init` on a miss.
    pub async fn summary_with<E, F>(&self, key: SummaryKey, init: F) -> Result<SummaryEntry, Arc<E>>
    where
        F: Future<Output = Result<SummaryEntry, E>>,
        E: Send + Sync + 'static,
    {
        self.summaries.try_get_with(key, init).await
    }

    /// Get a cached search result without computing.
    pub async fn get_search(&self, key: &SearchKey) -> Option<SearchEntry> {
        self.searches.get(key).await
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.searches.invalidate_all();
        self.summaries.invalidate_all();
    }
}
