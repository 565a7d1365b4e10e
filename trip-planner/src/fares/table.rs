//! Indexed fare store.
//!
//! The table keeps the single best nonstop fare per (origin, destination,
//! date) and, separately, every observed price per route. The price history
//! feeds default pricing when a date has no fare of its own.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::trace;

use crate::domain::money::{median, round_cents};
use crate::domain::{CityCode, FareOption};

/// Exact lookup key: (origin, destination, date).
type FareKey = (CityCode, CityCode, NaiveDate);

/// Route key: (origin, destination).
type RouteKey = (CityCode, CityCode);

/// Read-only index of known nonstop fares.
#[derive(Debug, Default, Clone)]
pub struct FareTable {
    by_key: HashMap<FareKey, FareOption>,
    route_prices: HashMap<RouteKey, Vec<f64>>,
}

impl FareTable {
    /// Build the table from a set of fare records.
    ///
    /// Records with a non-zero stop count are dropped. For each key the
    /// cheapest fare wins, with equal prices broken by shorter duration; the
    /// first record seen wins an exact tie. Every kept record's price is
    /// added to its route history, duplicates included.
    pub fn build(records: impl IntoIterator<Item = FareOption>) -> Self {
        let mut table = Self::default();

        for fare in records {
            if !fare.is_nonstop() {
                trace!(
                    origin = %fare.origin,
                    destination = %fare.destination,
                    stops = fare.stops,
                    "dropping fare with stops"
                );
                continue;
            }

            table
                .route_prices
                .entry(fare.route())
                .or_default()
                .push(fare.price);

            let key = (fare.origin, fare.destination, fare.date);
            let replace = table
                .by_key
                .get(&key)
                .is_none_or(|existing| fare.beats(existing));
            if replace {
                table.by_key.insert(key, fare);
            }
        }

        table
    }

    /// Returns the best known fare for the exact route and date.
    pub fn lookup_exact(
        &self,
        origin: &CityCode,
        destination: &CityCode,
        date: NaiveDate,
    ) -> Option<&FareOption> {
        self.by_key.get(&(*origin, *destination, date))
    }

    /// Returns every observed price for the route, in input order.
    pub fn price_history(&self, origin: &CityCode, destination: &CityCode) -> &[f64] {
        self.route_prices
            .get(&(*origin, *destination))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Median observed price for the route, rounded to cents.
    pub fn median_price(&self, origin: &CityCode, destination: &CityCode) -> Option<f64> {
        median(self.price_history(origin, destination)).map(round_cents)
    }

    /// Number of distinct (origin, destination, date) keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns true if the table holds no fares.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Number of distinct routes with at least one observed price.
    pub fn route_count(&self) -> usize {
        self.route_prices.len()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn on(day: u32, price: u32, duration: u32) -> FareOption {
        FareOption::nonstop(
            CityCode::parse("NYC").unwrap(),
            CityCode::parse("TYO").unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, day).unwrap(),
            f64::from(price),
        )
        .with_duration(duration)
    }

    proptest! {
        /// The kept fare is the minimum by (price, duration) whatever the input order
        #[test]
        fn winner_is_order_independent(
            rows in prop::collection::vec((1u32..2000, 0u32..1000), 1..20)
        ) {
            let forward = FareTable::build(rows.iter().map(|&(p, d)| on(6, p, d)));
            let backward = FareTable::build(rows.iter().rev().map(|&(p, d)| on(6, p, d)));

            let expected = rows.iter().copied().min().unwrap();
            let key = (CityCode::parse("NYC").unwrap(), CityCode::parse("TYO").unwrap());
            let date = NaiveDate::from_ymd_opt(2025, 12, 6).unwrap();
            for table in [&forward, &backward] {
                let best = table.lookup_exact(&key.0, &key.1, date).unwrap();
                prop_assert_eq!(best.price, f64::from(expected.0));
                prop_assert_eq!(best.duration_minutes, expected.1);
            }
        }

        /// History length equals the number of nonstop input rows
        #[test]
        fn history_counts_all_rows(rows in prop::collection::vec((1u32..28, 1u32..2000), 0..30)) {
            let table = FareTable::build(rows.iter().map(|&(day, p)| on(day, p, 0)));
            let history = table.price_history(
                &CityCode::parse("NYC").unwrap(),
                &CityCode::parse("TYO").unwrap(),
            );
            prop_assert_eq!(history.len(), rows.len());
        }
    }
}
