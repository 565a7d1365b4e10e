//! Itinerary types.
//!
//! An `Itinerary` is a complete accepted round trip: home, every city in the
//! chosen order, and back home again.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::calendar::inclusive_days;
use super::money::round_cents;
use super::{CityCode, ScheduledLeg};

/// A feasible round trip found by the search.
///
/// # Invariants
///
/// - `legs` runs home → `order[0]` → … → `order[n-1]` → home
/// - `total_price` is the leg prices summed and rounded to 2 decimals
/// - the anchor city was present from `anchor_arrival` to `anchor_departure`
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    /// Name of the departure window the start date was drawn from
    pub window: String,
    /// Whether the optional extra city was part of the city set
    pub includes_optional: bool,
    /// Cities in visiting order (home excluded)
    pub order: Vec<CityCode>,
    /// Nights stayed per city
    pub nights: BTreeMap<CityCode, u32>,
    /// Flown legs in order
    pub legs: Vec<ScheduledLeg>,
    /// Sum of leg prices, rounded to cents
    pub total_price: f64,
    /// Sum of leg duration estimates
    pub total_duration_minutes: u32,
    /// Window date the trip starts on
    pub start_date: NaiveDate,
    /// Arrival date back home
    pub end_date: NaiveDate,
    /// Arrival date at the anchor city
    pub anchor_arrival: NaiveDate,
    /// Departure date from the anchor city
    pub anchor_departure: NaiveDate,
}

impl Itinerary {
    /// Returns the home city (origin of the first leg).
    pub fn home(&self) -> Option<CityCode> {
        self.legs.first().map(ScheduledLeg::origin)
    }

    /// Returns the number of nights spent in `city` (0 if not visited).
    pub fn nights_in(&self, city: &CityCode) -> u32 {
        self.nights.get(city).copied().unwrap_or(0)
    }

    /// Total trip length in days, counting the start and end days.
    pub fn trip_days(&self) -> u32 {
        inclusive_days(self.start_date, self.end_date)
    }

    /// Sum of leg prices, rounded to cents.
    pub fn legs_total(&self) -> f64 {
        round_cents(self.legs.iter().map(ScheduledLeg::price).sum())
    }

    /// Returns true if any leg is priced from a default estimate.
    pub fn has_estimated_fares(&self) -> bool {
        self.legs.iter().any(|leg| leg.source().is_estimated())
    }

    /// Full route including home at both ends.
    pub fn route(&self) -> Vec<CityCode> {
        let mut route = Vec::with_capacity(self.order.len() + 2);
        route.extend(self.home());
        route.extend(self.order.iter().copied());
        route.extend(self.home());
        route
    }
}
