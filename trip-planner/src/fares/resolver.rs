//! Fare resolution with date flexibility.
//!
//! Given a route and a preferred departure date, the resolver looks for the
//! best real fare on that date or a few days later, widens the search once if
//! nothing turns up, and finally falls back to an estimated fare.
//!
//! Schedules only ever slip later: a fare dated before the preferred date is
//! never returned.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::calendar::add_days;
use crate::domain::{CityCode, FareOption, FareSource};

use super::pricing::DefaultPricing;
use super::table::FareTable;

/// How far the resolver may move a departure and whether it may estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexPolicy {
    /// Days after the preferred date searched first.
    pub flex_days: u32,

    /// Wider window searched if the flex window is empty.
    /// Only used when larger than `flex_days`.
    pub fallback_days: u32,

    /// Synthesize a default-priced fare when no real fare is found.
    pub allow_synthetic: bool,
}

impl FlexPolicy {
    /// Create a policy with the given parameters.
    pub fn new(flex_days: u32, fallback_days: u32, allow_synthetic: bool) -> Self {
        Self {
            flex_days,
            fallback_days,
            allow_synthetic,
        }
    }

    /// Same policy with synthesis disabled: only real fares are returned.
    pub fn observed_only(self) -> Self {
        Self {
            allow_synthetic: false,
            ..self
        }
    }
}

impl Default for FlexPolicy {
    fn default() -> Self {
        Self {
            flex_days: 1,
            fallback_days: 7,
            allow_synthetic: true,
        }
    }
}

/// A fare chosen for a leg together with the date it actually departs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFare {
    pub fare: FareOption,
    pub date: NaiveDate,
    pub source: FareSource,
}

/// Looks up the best fare for a route around a preferred date.
#[derive(Debug, Clone, Copy)]
pub struct FareResolver<'a> {
    table: &'a FareTable,
    pricing: &'a DefaultPricing,
    home: CityCode,
}

impl<'a> FareResolver<'a> {
    /// Create a resolver over `table`, estimating with `pricing` relative to `home`.
    pub fn new(table: &'a FareTable, pricing: &'a DefaultPricing, home: CityCode) -> Self {
        Self {
            table,
            pricing,
            home,
        }
    }

    /// Returns the best fare for the route departing on or after `preferred`.
    ///
    /// Tries `[preferred, preferred + flex_days]`, then
    /// `[preferred, preferred + fallback_days]` if that is wider, then an
    /// estimate on `preferred` if allowed. Among real candidates the cheapest
    /// wins, then the shortest, then the earliest.
    pub fn resolve(
        &self,
        origin: &CityCode,
        destination: &CityCode,
        preferred: NaiveDate,
        policy: &FlexPolicy,
    ) -> Option<ResolvedFare> {
        let observed = self
            .best_within(origin, destination, preferred, policy.flex_days)
            .or_else(|| {
                (policy.fallback_days > policy.flex_days)
                    .then(|| self.best_within(origin, destination, preferred, policy.fallback_days))
                    .flatten()
            });

        if let Some((fare, date)) = observed {
            return Some(ResolvedFare {
                fare: fare.clone(),
                date,
                source: FareSource::Observed,
            });
        }

        policy.allow_synthetic.then(|| ResolvedFare {
            fare: self.synthesize(origin, destination, preferred),
            date: preferred,
            source: FareSource::Estimated,
        })
    }

    /// Build an estimated nonstop fare for the route on `date`.
    ///
    /// Uses the route's median observed price if it has any history,
    /// otherwise the default pricing rules. Estimated fares carry no
    /// duration, carrier or booking link.
    pub fn synthesize(
        &self,
        origin: &CityCode,
        destination: &CityCode,
        date: NaiveDate,
    ) -> FareOption {
        let price = self
            .table
            .median_price(origin, destination)
            .unwrap_or_else(|| self.pricing.price_for(&self.home, origin, destination, date));

        FareOption::nonstop(*origin, *destination, date, price)
    }

    /// Best real fare departing within `days` after `preferred` (inclusive).
    fn best_within(
        &self,
        origin: &CityCode,
        destination: &CityCode,
        preferred: NaiveDate,
        days: u32,
    ) -> Option<(&'a FareOption, NaiveDate)> {
        let table = self.table;
        (0..=u64::from(days))
            .map(|offset| add_days(preferred, offset))
            .filter_map(|date| {
                table
                    .lookup_exact(origin, destination, date)
                    .map(|fare| (fare, date))
            })
            .min_by(|(a, a_date), (b, b_date)| compare_candidates(a, *a_date, b, *b_date))
    }
}

/// Order candidates by (price, duration, date) ascending.
fn compare_candidates(
    a: &FareOption,
    a_date: NaiveDate,
    b: &FareOption,
    b_date: NaiveDate,
) -> Ordering {
    a.price
        .total_cmp(&b.price)
        .then(a.duration_minutes.cmp(&b.duration_minutes))
        .then(a_date.cmp(&b_date))
}
