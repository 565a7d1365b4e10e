//! Itinerary planner.
//!
//! This module answers: "what is the cheapest way to fly from home through
//! every city and back, staying roughly the planned number of nights in each
//! and being in the anchor city over the required dates?"
//!
//! The search is exhaustive over start dates, visiting orders and night
//! counts. Each candidate is scheduled leg by leg against the fare table and
//! checked against the anchor and trip-length constraints.

mod config;
mod rank;
mod search;
mod summary;

pub use config::{
    AnchorConstraint, CityStay, ConfigError, DepartureWindow, NightsRange, TripConfig, TripLength,
};
pub use rank::{compare_itineraries, rank_itineraries, top_n};
pub use search::{Planner, RejectionCounts, SearchError, SearchRequest, SearchResult};
pub use summary::{
    ScenarioFilter, SummaryMatrix, SummaryRow, best_in_window, best_per_scenario,
    top_across_scenarios,
};
