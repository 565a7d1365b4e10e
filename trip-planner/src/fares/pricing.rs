//! Default fare pricing.
//!
//! When the fare table has nothing for a route on or near a date, the
//! resolver can synthesize an estimated fare. Estimates come from the route's
//! observed median if there is one, otherwise from an ordered rule table.
//! Rules are data so new routes or seasons need no code changes.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::CityCode;

#[cfg(test)]
const NYC: CityCode = CityCode::known(b"NYC");
const TYO: CityCode = CityCode::known(b"TYO");
const HKG: CityCode = CityCode::known(b"HKG");
const TPE: CityCode = CityCode::known(b"TPE");
const SHA: CityCode = CityCode::known(b"SHA");

/// A calendar month in a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Returns true if `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Which routes a pricing rule applies to.
///
/// `None` filters match any city in the region (or any date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Home city to a region city
    Outbound {
        destination: Option<CityCode>,
        month: Option<YearMonth>,
    },
    /// Region city back to the home city
    Inbound {
        origin: Option<CityCode>,
        month: Option<YearMonth>,
    },
    /// Between two region cities
    IntraRegion {
        origin: Option<CityCode>,
        destination: Option<CityCode>,
    },
}

/// A default price applied when its condition matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRule {
    pub when: RuleCondition,
    pub price: f64,
}

impl PriceRule {
    /// Outbound rule for a specific destination (or any, if `None`).
    pub fn outbound(destination: Option<CityCode>, month: Option<YearMonth>, price: f64) -> Self {
        Self {
            when: RuleCondition::Outbound { destination, month },
            price,
        }
    }

    /// Inbound rule for a specific origin (or any, if `None`).
    pub fn inbound(origin: Option<CityCode>, month: Option<YearMonth>, price: f64) -> Self {
        Self {
            when: RuleCondition::Inbound { origin, month },
            price,
        }
    }

    /// Intra-region rule for an ordered pair (or any, if `None`).
    pub fn intra(origin: Option<CityCode>, destination: Option<CityCode>, price: f64) -> Self {
        Self {
            when: RuleCondition::IntraRegion {
                origin,
                destination,
            },
            price,
        }
    }
}

/// Prioritized default-price table. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPricing {
    /// Cities counted as the destination region
    pub region: BTreeSet<CityCode>,
    /// Rules evaluated in order
    pub rules: Vec<PriceRule>,
    /// Price when no rule matches
    pub fallback: f64,
}

impl DefaultPricing {
    /// Returns the default price for a route on a date.
    pub fn price_for(
        &self,
        home: &CityCode,
        origin: &CityCode,
        destination: &CityCode,
        date: NaiveDate,
    ) -> f64 {
        self.rules
            .iter()
            .find(|rule| self.matches(&rule.when, home, origin, destination, date))
            .map_or(self.fallback, |rule| rule.price)
    }

    fn matches(
        &self,
        condition: &RuleCondition,
        home: &CityCode,
        origin: &CityCode,
        destination: &CityCode,
        date: NaiveDate,
    ) -> bool {
        let city_ok = |filter: &Option<CityCode>, city: &CityCode| {
            filter.as_ref().is_none_or(|f| f == city)
        };
        let month_ok = |month: &Option<YearMonth>| month.is_none_or(|m| m.contains(date));

        match condition {
            RuleCondition::Outbound {
                destination: want,
                month,
            } => {
                origin == home
                    && self.region.contains(destination)
                    && city_ok(want, destination)
                    && month_ok(month)
            }
            RuleCondition::Inbound { origin: want, month } => {
                destination == home
                    && self.region.contains(origin)
                    && city_ok(want, origin)
                    && month_ok(month)
            }
            RuleCondition::IntraRegion {
                origin: want_from,
                destination: want_to,
            } => {
                self.region.contains(origin)
                    && self.region.contains(destination)
                    && city_ok(want_from, origin)
                    && city_ok(want_to, destination)
            }
        }
    }
}

impl Default for DefaultPricing {
    /// Estimates for NYC ↔ Asia travel over December 2025 / January 2026.
    fn default() -> Self {
        let dec = Some(YearMonth::new(2025, 12));
        let jan = Some(YearMonth::new(2026, 1));

        let rules = vec![
            PriceRule::outbound(Some(TYO), dec, 900.0),
            PriceRule::outbound(Some(HKG), dec, 1100.0),
            PriceRule::outbound(Some(TPE), dec, 950.0),
            PriceRule::outbound(Some(SHA), dec, 1200.0),
            PriceRule::outbound(None, dec, 1000.0),
            PriceRule::inbound(Some(TYO), jan, 570.0),
            PriceRule::inbound(Some(HKG), jan, 1070.0),
            PriceRule::inbound(Some(TPE), jan, 839.0),
            PriceRule::inbound(Some(SHA), jan, 1570.0),
            PriceRule::inbound(None, jan, 900.0),
            PriceRule::intra(Some(TYO), Some(HKG), 120.0),
            PriceRule::intra(Some(HKG), Some(TYO), 120.0),
            PriceRule::intra(Some(HKG), Some(TPE), 70.0),
            PriceRule::intra(Some(TPE), Some(HKG), 55.0),
            PriceRule::intra(Some(TPE), Some(SHA), 140.0),
            PriceRule::intra(Some(SHA), Some(TPE), 150.0),
            PriceRule::intra(None, None, 120.0),
        ];

        Self {
            region: BTreeSet::from([TYO, HKG, TPE, SHA]),
            rules,
            fallback: 1000.0,
        }
    }
}
