//! Multi-city trip planner.
//!
//! Finds the cheapest round trip from a home city through a set of cities,
//! given a table of nonstop fares by date, target stay lengths, a trip-length
//! range and a date range that must be spent in one anchor city.

pub mod cache;
pub mod domain;
pub mod fares;
pub mod planner;
pub mod report;
pub mod web;
