//! Scheduled flight leg type.

use chrono::NaiveDate;

use super::calendar::{FLIGHT_DAYS, add_days};
use super::{CityCode, FareOption, FareSource};

/// One flown segment of an itinerary.
///
/// Arrival is modelled as the day after departure regardless of the actual
/// flight time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledLeg {
    origin: CityCode,
    destination: CityCode,
    departure: NaiveDate,
    arrival: NaiveDate,
    fare: FareOption,
    source: FareSource,
}

impl ScheduledLeg {
    /// Schedule a leg departing on `departure` using `fare`.
    pub fn new(departure: NaiveDate, fare: FareOption, source: FareSource) -> Self {
        Self {
            origin: fare.origin,
            destination: fare.destination,
            departure,
            arrival: add_days(departure, FLIGHT_DAYS),
            fare,
            source,
        }
    }

    /// Returns the departure city.
    pub fn origin(&self) -> CityCode {
        self.origin
    }

    /// Returns the arrival city.
    pub fn destination(&self) -> CityCode {
        self.destination
    }

    /// Returns the departure date.
    pub fn departure(&self) -> NaiveDate {
        self.departure
    }

    /// Returns the arrival date (departure + 1 day).
    pub fn arrival(&self) -> NaiveDate {
        self.arrival
    }

    /// Returns the fare used for this leg.
    pub fn fare(&self) -> &FareOption {
        &self.fare
    }

    /// Returns the fare price.
    pub fn price(&self) -> f64 {
        self.fare.price
    }

    /// Returns whether the fare was observed or estimated.
    pub fn source(&self) -> FareSource {
        self.source
    }
}
