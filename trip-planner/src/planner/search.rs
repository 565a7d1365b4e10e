//! Exhaustive itinerary search.
//!
//! For every start date in every departure window, every visiting order of
//! the cities and every combination of allowed night counts, the planner
//! builds a day-by-day schedule leg by leg. A candidate is dropped as soon as
//! a leg has no fare, the anchor stay is missing or too short, or the trip
//! length is out of range. Survivors are ranked and truncated.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::domain::calendar::{add_days, inclusive_days};
use crate::domain::money::round_cents;
use crate::domain::{CityCode, Itinerary, ScheduledLeg};
use crate::fares::{FareResolver, FareTable, FlexPolicy};

use super::config::{AnchorConstraint, DepartureWindow, NightsRange, TripConfig, TripLength};
use super::rank::rank_itineraries;

/// Error from itinerary search.
///
/// Only a malformed request is an error. A request nothing satisfies returns
/// an empty result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no cities to visit")]
    NoCities,

    #[error("city {0} listed more than once")]
    DuplicateCity(CityCode),

    #[error("no nights range for {0}")]
    MissingNights(CityCode),

    #[error("nights range for {city} is inverted ({min} > {max})")]
    InvertedNights { city: CityCode, min: u32, max: u32 },

    #[error("departure window {0:?} ends before it starts")]
    InvertedWindow(String),

    #[error("trip length range is inverted ({min} > {max} days)")]
    InvertedTripLength { min: u32, max: u32 },
}

/// Request for itinerary search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Cities to visit, in any order.
    pub cities: Vec<CityCode>,

    /// Allowed nights per city.
    pub nights: BTreeMap<CityCode, NightsRange>,

    /// Windows whose dates are tried as start dates.
    pub windows: Vec<DepartureWindow>,

    /// Date flexibility for each leg.
    pub flex: FlexPolicy,

    /// Allowed total trip length.
    pub trip_length: TripLength,

    /// Maximum number of itineraries to return.
    pub top_k: usize,

    /// Recorded on each itinerary found.
    pub includes_optional: bool,
}

impl SearchRequest {
    /// Check the request is well formed.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.cities.is_empty() {
            return Err(SearchError::NoCities);
        }

        let mut seen = HashSet::new();
        for city in &self.cities {
            if !seen.insert(city) {
                return Err(SearchError::DuplicateCity(*city));
            }
            let range = self
                .nights
                .get(city)
                .ok_or(SearchError::MissingNights(*city))?;
            if range.min > range.max {
                return Err(SearchError::InvertedNights {
                    city: *city,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        if let Some(window) = self.windows.iter().find(|w| w.start > w.end) {
            return Err(SearchError::InvertedWindow(window.name.clone()));
        }

        let TripLength { min_days, max_days } = self.trip_length;
        if min_days > max_days {
            return Err(SearchError::InvertedTripLength {
                min: min_days,
                max: max_days,
            });
        }

        Ok(())
    }
}

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    /// Some leg had no fare
    NoFare,
    /// The order never enters the anchor city
    AnchorNotVisited,
    /// The anchor stay starts too late or ends too early
    AnchorUncovered,
    /// Trip too short or too long
    TripLength,
}

/// Number of candidates dropped for each reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    pub no_fare: usize,
    pub anchor_not_visited: usize,
    pub anchor_uncovered: usize,
    pub trip_length: usize,
}

impl RejectionCounts {
    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::NoFare => self.no_fare += 1,
            Rejection::AnchorNotVisited => self.anchor_not_visited += 1,
            Rejection::AnchorUncovered => self.anchor_uncovered += 1,
            Rejection::TripLength => self.trip_length += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.no_fare + self.anchor_not_visited + self.anchor_uncovered + self.trip_length
    }
}

/// Result of itinerary search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Feasible itineraries, ranked best-first.
    pub itineraries: Vec<Itinerary>,

    /// Number of candidates built.
    pub candidates_explored: usize,

    /// Why the other candidates were dropped.
    pub rejections: RejectionCounts,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            itineraries: Vec::new(),
            candidates_explored: 0,
            rejections: RejectionCounts::default(),
        }
    }

    /// Best itinerary, if any.
    pub fn best(&self) -> Option<&Itinerary> {
        self.itineraries.first()
    }
}

/// One candidate: a start date, visiting order and nights per city.
struct Candidate<'r> {
    window: &'r DepartureWindow,
    start: NaiveDate,
    order: &'r [CityCode],
    nights: &'r [u32],
}

/// Itinerary planner over a fare table.
pub struct Planner<'a> {
    resolver: FareResolver<'a>,
    home: CityCode,
    anchor: &'a AnchorConstraint,
}

impl<'a> Planner<'a> {
    /// Create a planner using `config` for the home city, anchor and pricing.
    pub fn new(table: &'a FareTable, config: &'a TripConfig) -> Self {
        Self {
            resolver: FareResolver::new(table, &config.pricing, config.home),
            home: config.home,
            anchor: &config.anchor,
        }
    }

    /// Search for the cheapest feasible itineraries.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        request.validate()?;

        let mut accepted = Vec::new();
        let mut rejections = RejectionCounts::default();
        let mut candidates_explored = 0;

        for window in &request.windows {
            for start in window.dates() {
                for order in request.cities.iter().copied().permutations(request.cities.len()) {
                    // Every city has a range: checked by validate().
                    let ranges: Vec<NightsRange> =
                        order.iter().map(|city| request.nights[city]).collect();

                    for nights in ranges.iter().map(NightsRange::counts).multi_cartesian_product() {
                        candidates_explored += 1;
                        let candidate = Candidate {
                            window,
                            start,
                            order: &order,
                            nights: &nights,
                        };

                        match self.build(&candidate, request) {
                            Ok(itinerary) => accepted.push(itinerary),
                            Err(rejection) => {
                                trace!(
                                    start = %start,
                                    order = ?order,
                                    nights = ?nights,
                                    ?rejection,
                                    "candidate rejected"
                                );
                                rejections.record(rejection);
                            }
                        }
                    }
                }
            }
        }

        let mut itineraries = rank_itineraries(accepted);
        let feasible = itineraries.len();
        itineraries.truncate(request.top_k);

        debug!(
            candidates_explored,
            feasible,
            no_fare = rejections.no_fare,
            anchor_not_visited = rejections.anchor_not_visited,
            anchor_uncovered = rejections.anchor_uncovered,
            trip_length = rejections.trip_length,
            includes_optional = request.includes_optional,
            "itinerary search complete"
        );

        Ok(SearchResult {
            itineraries,
            candidates_explored,
            rejections,
        })
    }

    /// Build the schedule for one candidate, or say why it fails.
    fn build(
        &self,
        candidate: &Candidate<'_>,
        request: &SearchRequest,
    ) -> Result<Itinerary, Rejection> {
        let anchor_city = self.anchor.city;
        let mut legs = Vec::with_capacity(candidate.order.len() + 1);
        let mut anchor_arrival = None;
        let mut anchor_departure = None;

        let mut origin = self.home;
        let mut departure = candidate.start;

        for (&city, &nights) in candidate.order.iter().zip(candidate.nights) {
            let leg = self.schedule(origin, city, departure, &request.flex)?;

            if origin == anchor_city && origin != self.home && anchor_departure.is_none() {
                anchor_departure = Some(leg.departure());
            }
            if city == anchor_city && anchor_arrival.is_none() {
                anchor_arrival = Some(leg.arrival());
            }

            let next = add_days(leg.arrival(), u64::from(nights));
            debug_assert!(next > departure, "schedule moved backwards at {city}");

            legs.push(leg);
            origin = city;
            departure = next;
        }

        let home_leg = self.schedule(origin, self.home, departure, &request.flex)?;
        if origin == anchor_city && anchor_departure.is_none() {
            anchor_departure = Some(home_leg.departure());
        }
        let end_date = home_leg.arrival();
        legs.push(home_leg);

        let (Some(anchor_arrival), Some(anchor_departure)) = (anchor_arrival, anchor_departure)
        else {
            return Err(Rejection::AnchorNotVisited);
        };
        if !self.anchor.is_covered_by(anchor_arrival, anchor_departure) {
            return Err(Rejection::AnchorUncovered);
        }

        if !request
            .trip_length
            .contains(inclusive_days(candidate.start, end_date))
        {
            return Err(Rejection::TripLength);
        }

        let total_price = round_cents(legs.iter().map(ScheduledLeg::price).sum());
        let total_duration_minutes = legs.iter().map(|l| l.fare().duration_minutes).sum();
        let nights = candidate
            .order
            .iter()
            .copied()
            .zip(candidate.nights.iter().copied())
            .collect();

        Ok(Itinerary {
            window: candidate.window.name.clone(),
            includes_optional: request.includes_optional,
            order: candidate.order.to_vec(),
            nights,
            legs,
            total_price,
            total_duration_minutes,
            start_date: candidate.start,
            end_date,
            anchor_arrival,
            anchor_departure,
        })
    }

    /// Resolve a fare for one leg and turn it into a scheduled leg.
    fn schedule(
        &self,
        origin: CityCode,
        destination: CityCode,
        preferred: NaiveDate,
        flex: &FlexPolicy,
    ) -> Result<ScheduledLeg, Rejection> {
        let resolved = self
            .resolver
            .resolve(&origin, &destination, preferred, flex)
            .ok_or(Rejection::NoFare)?;
        Ok(ScheduledLeg::new(resolved.date, resolved.fare, resolved.source))
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
