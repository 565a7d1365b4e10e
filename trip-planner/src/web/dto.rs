//! Data transfer objects for web requests and responses.
//!
//! The CLI's `--json` output uses the same response types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{FareSource, Itinerary, ScheduledLeg};
use crate::planner::{ScenarioFilter, SummaryMatrix, SummaryRow};

/// Request to search for itineraries.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchItinerariesRequest {
    /// Only start in this departure window (defaults to all)
    pub window: Option<String>,

    /// Which city sets to search
    pub scenario: ScenarioFilter,

    /// Number of results (defaults to the configured limit)
    pub top: Option<usize>,
}

/// Query for the summary matrix.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Only this departure window (defaults to all)
    pub window: Option<String>,
}

/// Nights in one city.
#[derive(Debug, Serialize)]
pub struct StayResult {
    pub city: String,
    pub nights: u32,
}

/// One flown leg.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub origin: String,
    pub destination: String,
    pub departure: NaiveDate,
    pub arrival: NaiveDate,
    pub price: f64,

    /// "observed" or "estimated"
    pub source: &'static str,

    pub duration_minutes: u32,
    pub carrier: Option<String>,
    pub booking_link: Option<String>,
}

/// An itinerary option.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    /// Departure window the trip starts in
    pub window: String,

    /// Whether the optional city is part of the trip
    pub includes_optional: bool,

    /// Full route including home at both ends
    pub route: Vec<String>,

    /// Nights per city, in visiting order
    pub stays: Vec<StayResult>,

    pub legs: Vec<LegResult>,
    pub total_price: f64,
    pub total_duration_minutes: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trip_days: u32,
    pub anchor_arrival: NaiveDate,
    pub anchor_departure: NaiveDate,

    /// Whether any leg is priced from a default estimate
    pub has_estimated_fares: bool,
}

/// Response for itinerary search.
#[derive(Debug, Serialize)]
pub struct SearchItinerariesResponse {
    /// Found itineraries, best first
    pub itineraries: Vec<ItineraryResult>,
}

/// One window's cheapest itinerary per scenario.
#[derive(Debug, Serialize)]
pub struct SummaryRowResult {
    pub window: String,
    pub with_optional: Option<ItineraryResult>,
    pub without_optional: Option<ItineraryResult>,
}

/// Response for the summary matrix.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Optional city code, if one is configured
    pub optional_city: Option<String>,
    pub rows: Vec<SummaryRowResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

fn source_label(source: FareSource) -> &'static str {
    match source {
        FareSource::Observed => "observed",
        FareSource::Estimated => "estimated",
    }
}

impl LegResult {
    /// Create from a scheduled leg.
    pub fn from_leg(leg: &ScheduledLeg) -> Self {
        let fare = leg.fare();
        Self {
            origin: leg.origin().to_string(),
            destination: leg.destination().to_string(),
            departure: leg.departure(),
            arrival: leg.arrival(),
            price: leg.price(),
            source: source_label(leg.source()),
            duration_minutes: fare.duration_minutes,
            carrier: fare.carrier.clone(),
            booking_link: fare.booking_link.clone(),
        }
    }
}

impl ItineraryResult {
    /// Create from a domain itinerary.
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            window: itinerary.window.clone(),
            includes_optional: itinerary.includes_optional,
            route: itinerary.route().iter().map(|c| c.to_string()).collect(),
            stays: itinerary
                .order
                .iter()
                .map(|c| StayResult {
                    city: c.to_string(),
                    nights: itinerary.nights_in(c),
                })
                .collect(),
            legs: itinerary.legs.iter().map(LegResult::from_leg).collect(),
            total_price: itinerary.total_price,
            total_duration_minutes: itinerary.total_duration_minutes,
            start_date: itinerary.start_date,
            end_date: itinerary.end_date,
            trip_days: itinerary.trip_days(),
            anchor_arrival: itinerary.anchor_arrival,
            anchor_departure: itinerary.anchor_departure,
            has_estimated_fares: itinerary.has_estimated_fares(),
        }
    }
}

impl SearchItinerariesResponse {
    pub fn from_itineraries(itineraries: &[Itinerary]) -> Self {
        Self {
            itineraries: itineraries.iter().map(ItineraryResult::from_itinerary).collect(),
        }
    }
}

impl SummaryRowResult {
    pub fn from_row(row: &SummaryRow) -> Self {
        Self {
            window: row.window.clone(),
            with_optional: row.with_optional.as_ref().map(ItineraryResult::from_itinerary),
            without_optional: row
                .without_optional
                .as_ref()
                .map(ItineraryResult::from_itinerary),
        }
    }
}

impl SummaryResponse {
    pub fn from_matrix(matrix: &SummaryMatrix, optional_city: Option<String>) -> Self {
        Self {
            optional_city,
            rows: matrix.rows.iter().map(SummaryRowResult::from_row).collect(),
        }
    }
}
