//! Fare records.

use chrono::NaiveDate;

use super::CityCode;

/// A single priced flight option for one route on one calendar date.
///
/// Prices are currency-agnostic. Only nonstop fares (`stops == 0`) are ever
/// indexed; other records are dropped when a [`FareTable`] is built.
///
/// [`FareTable`]: crate::fares::FareTable
#[derive(Debug, Clone, PartialEq)]
pub struct FareOption {
    /// Departure city
    pub origin: CityCode,
    /// Arrival city
    pub destination: CityCode,
    /// Departure date (local, no time)
    pub date: NaiveDate,
    /// Fare price
    pub price: f64,
    /// Number of intermediate stops
    pub stops: u32,
    /// Duration estimate in minutes (0 when unknown)
    pub duration_minutes: u32,
    /// Carrier label, e.g. "JL"
    pub carrier: Option<String>,
    /// Booking reference or link
    pub booking_link: Option<String>,
}

impl FareOption {
    /// Create a nonstop fare with no duration, carrier or booking link.
    pub fn nonstop(origin: CityCode, destination: CityCode, date: NaiveDate, price: f64) -> Self {
        Self {
            origin,
            destination,
            date,
            price,
            stops: 0,
            duration_minutes: 0,
            carrier: None,
            booking_link: None,
        }
    }

    /// Set the stop count.
    pub fn with_stops(mut self, stops: u32) -> Self {
        self.stops = stops;
        self
    }

    /// Set the duration estimate.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Set the carrier label.
    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = Some(carrier.into());
        self
    }

    /// Set the booking link.
    pub fn with_booking_link(mut self, link: impl Into<String>) -> Self {
        self.booking_link = Some(link.into());
        self
    }

    /// Returns true if the fare has no intermediate stops.
    pub fn is_nonstop(&self) -> bool {
        self.stops == 0
    }

    /// Returns the (origin, destination) pair.
    pub fn route(&self) -> (CityCode, CityCode) {
        (self.origin, self.destination)
    }

    /// Returns true if this fare should replace `other` for the same key:
    /// strictly cheaper, or equally priced and strictly faster.
    pub fn beats(&self, other: &FareOption) -> bool {
        self.price < other.price
            || (self.price == other.price && self.duration_minutes < other.duration_minutes)
    }
}

/// Where the fare on a scheduled leg came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FareSource {
    /// A fare present in the fare table
    Observed,
    /// A synthesized default-priced fare
    Estimated,
}

impl FareSource {
    /// Returns true for synthesized fares.
    pub fn is_estimated(self) -> bool {
        matches!(self, FareSource::Estimated)
    }
}
