//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, ResultCache};
use crate::fares::FareTable;
use crate::planner::TripConfig;

/// Shared application state.
///
/// The fare table and configuration are read-only once the server starts.
#[derive(Clone)]
pub struct AppState {
    /// Loaded fares
    pub fares: Arc<FareTable>,

    /// Trip being planned
    pub config: Arc<TripConfig>,

    /// Search and summary results
    pub cache: Arc<ResultCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(fares: FareTable, config: TripConfig, cache_config: &CacheConfig) -> Self {
        Self {
            fares: Arc::new(fares),
            config: Arc::new(config),
            cache: Arc::new(ResultCache::new(cache_config)),
        }
    }
}
