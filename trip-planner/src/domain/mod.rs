//! Domain types for the itinerary planner.
//!
//! This module contains the core value types: city codes, fares, scheduled
//! legs, and accepted itineraries. City codes enforce their invariants at
//! construction time, so code that receives them can trust their validity.

pub mod calendar;
mod city;
mod fare;
mod itinerary;
mod leg;
pub mod money;

pub use city::{CityCode, InvalidCityCode};
pub use fare::{FareOption, FareSource};
pub use itinerary::Itinerary;
pub use leg::ScheduledLeg;
