//! Itinerary ranking for search results.

use std::cmp::Ordering;

use crate::domain::Itinerary;

/// Compare two itineraries by preference.
///
/// Itineraries are ranked by:
/// 1. Total price (cheaper is better)
/// 2. Total flight duration (shorter is better)
/// 3. Start date (earlier is better)
pub fn compare_itineraries(a: &Itinerary, b: &Itinerary) -> Ordering {
    a.total_price
        .total_cmp(&b.total_price)
        .then(a.total_duration_minutes.cmp(&b.total_duration_minutes))
        .then(a.start_date.cmp(&b.start_date))
}

/// Rank itineraries by preference.
///
/// The sort is stable: itineraries that compare equal keep the order they
/// were found in. Returns itineraries sorted best-first.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by(compare_itineraries);
    itineraries
}

/// Rank and keep the best `n`.
pub fn top_n(itineraries: Vec<Itinerary>, n: usize) -> Vec<Itinerary> {
    let mut ranked = rank_itineraries(itineraries);
    ranked.truncate(n);
    ranked
}


#[cfg(test)]
mod proptests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::domain::calendar::add_days;

    fn itinerary(price_cents: u32, duration: u32, offset: u64) -> Itinerary {
        let start = add_days(NaiveDate::from_ymd_opt(2025, 12, 6).unwrap(), offset);
        Itinerary {
            window: String::new(),
            includes_optional: false,
            order: Vec::new(),
            nights: BTreeMap::new(),
            legs: Vec::new(),
            total_price: f64::from(price_cents) / 100.0,
            total_duration_minutes: duration,
            start_date: start,
            end_date: start,
            anchor_arrival: start,
            anchor_departure: start,
        }
    }

    proptest! {
        /// Ranked output is sorted and keeps every input
        #[test]
        fn ranking_sorted_and_complete(
            rows in prop::collection::vec((0u32..500_000, 0u32..3000, 0u64..20), 0..40),
        ) {
            let input: Vec<_> = rows.iter().map(|&(p, d, o)| itinerary(p, d, o)).collect();
            let ranked = rank_itineraries(input.clone());

            prop_assert_eq!(ranked.len(), input.len());
            for pair in ranked.windows(2) {
                prop_assert_ne!(compare_itineraries(&pair[0], &pair[1]), Ordering::Greater);
            }
        }

        /// top_n returns a prefix of the full ranking
        #[test]
        fn top_n_is_prefix(
            rows in prop::collection::vec((0u32..500_000, 0u32..3000, 0u64..20), 0..40),
            n in 0usize..50,
        ) {
            let input: Vec<_> = rows.iter().map(|&(p, d, o)| itinerary(p, d, o)).collect();
            let ranked = rank_itineraries(input.clone());
            let best = top_n(input, n);

            prop_assert_eq!(best.len(), n.min(ranked.len()));
            prop_assert_eq!(&ranked[..best.len()], &best[..]);
        }
    }
}
