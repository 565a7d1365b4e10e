//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::Itinerary;
use crate::fares::FareTable;
use crate::planner::{SummaryMatrix, TripConfig};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page: the loaded trip and search forms.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub home: String,
    pub cities: Vec<String>,
    pub optional_city: Option<String>,
    pub anchor: String,
    pub windows: Vec<WindowView>,
    pub fare_count: usize,
    pub route_count: usize,
}

impl IndexTemplate {
    pub fn new(config: &TripConfig, fares: &FareTable) -> Self {
        let anchor = &config.anchor;
        Self {
            home: config.home.to_string(),
            cities: config
                .cities
                .iter()
                .map(|s| format!("{} ({} nights)", s.city, s.nights))
                .collect(),
            optional_city: config
                .optional_city
                .map(|s| format!("{} ({} nights)", s.city, s.nights)),
            anchor: format!(
                "{} from {} to {}",
                anchor.city, anchor.arrive_by, anchor.depart_not_before
            ),
            windows: config
                .windows
                .iter()
                .map(|w| WindowView {
                    name: w.name.clone(),
                    start: w.start.to_string(),
                    end: w.end.to_string(),
                })
                .collect(),
            fare_count: fares.len(),
            route_count: fares.route_count(),
        }
    }
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Itinerary list fragment (search results).
#[derive(Template)]
#[template(path = "itinerary_list.html")]
pub struct ItineraryListTemplate {
    pub itineraries: Vec<ItineraryView>,
}

/// Summary table fragment.
#[derive(Template)]
#[template(path = "summary_table.html")]
pub struct SummaryTableTemplate {
    pub extra_label: String,
    pub rows: Vec<SummaryRowView>,
}

impl SummaryTableTemplate {
    pub fn new(matrix: &SummaryMatrix, extra_label: impl Into<String>) -> Self {
        let price = |it: &Option<Itinerary>| it.as_ref().map(|i| dollars(i.total_price));
        Self {
            extra_label: extra_label.into(),
            rows: matrix
                .rows
                .iter()
                .map(|r| SummaryRowView {
                    window: r.window.clone(),
                    with_price: price(&r.with_optional),
                    without_price: price(&r.without_optional),
                })
                .collect(),
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

fn dollars(price: f64) -> String {
    format!("${price:.0}")
}

/// Departure window view model.
#[derive(Debug, Clone)]
pub struct WindowView {
    pub name: String,
    pub start: String,
    pub end: String,
}

/// Itinerary view model for templates.
#[derive(Debug, Clone)]
pub struct ItineraryView {
    pub rank: usize,
    pub price: String,
    pub window: String,
    pub includes_optional: bool,
    pub route: String,
    pub nights: String,
    pub start_date: String,
    pub end_date: String,
    pub days: u32,
    pub anchor: String,
    pub legs: Vec<LegView>,
}

impl ItineraryView {
    /// Create from a domain itinerary at 1-based `rank`.
    pub fn from_itinerary(rank: usize, itinerary: &Itinerary) -> Self {
        let route = itinerary
            .route()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" → ");
        let nights = itinerary
            .order
            .iter()
            .map(|c| format!("{c} {}n", itinerary.nights_in(c)))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            rank,
            price: dollars(itinerary.total_price),
            window: itinerary.window.clone(),
            includes_optional: itinerary.includes_optional,
            route,
            nights,
            start_date: itinerary.start_date.to_string(),
            end_date: itinerary.end_date.to_string(),
            days: itinerary.trip_days(),
            anchor: format!(
                "{} to {}",
                itinerary.anchor_arrival, itinerary.anchor_departure
            ),
            legs: itinerary
                .legs
                .iter()
                .map(|leg| LegView {
                    route: format!("{} → {}", leg.origin(), leg.destination()),
                    departure: leg.departure().to_string(),
                    arrival: leg.arrival().to_string(),
                    price: dollars(leg.price()),
                    estimated: leg.source().is_estimated(),
                    carrier: leg.fare().carrier.clone(),
                    booking_link: leg.fare().booking_link.clone(),
                })
                .collect(),
        }
    }

    /// Create views for a ranked list.
    pub fn ranked(itineraries: &[Itinerary]) -> Vec<Self> {
        itineraries
            .iter()
            .enumerate()
            .map(|(i, it)| Self::from_itinerary(i + 1, it))
            .collect()
    }

    /// Whether any leg uses an estimated fare.
    pub fn has_estimates(&self) -> bool {
        self.legs.iter().any(|l| l.estimated)
    }
}

/// Leg view model for templates.
#[derive(Debug, Clone)]
pub struct LegView {
    pub route: String,
    pub departure: String,
    pub arrival: String,
    pub price: String,
    pub estimated: bool,
    pub carrier: Option<String>,
    pub booking_link: Option<String>,
}

/// Summary row view model for templates.
#[derive(Debug, Clone)]
pub struct SummaryRowView {
    pub window: String,
    pub with_price: Option<String>,
    pub without_price: Option<String>,
}

impl SummaryRowView {
    /// Cell text for the "with" column.
    pub fn with_display(&self) -> &str {
        self.with_price.as_deref().unwrap_or("-")
    }

    /// Cell text for the "without" column.
    pub fn without_display(&self) -> &str {
        self.without_price.as_deref().unwrap_or("-")
    }
}
