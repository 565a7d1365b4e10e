//! Unit tests for the itinerary search.

use std::collections::BTreeSet;

use super::*;
use crate::domain::{FareOption, FareSource};
use crate::planner::CityStay;

fn city(s: &str) -> CityCode {
    CityCode::parse(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dec(d: u32) -> NaiveDate {
    date(2025, 12, d)
}

fn jan(d: u32) -> NaiveDate {
    date(2026, 1, d)
}

/// The four sample fares from the CSV template.
fn template_fares() -> FareTable {
    FareTable::build(vec![
        FareOption::nonstop(city("NYC"), city("TYO"), dec(6), 780.0).with_duration(840),
        FareOption::nonstop(city("TYO"), city("HKG"), dec(12), 210.0).with_duration(300),
        FareOption::nonstop(city("HKG"), city("TPE"), dec(31), 150.0).with_duration(95),
        FareOption::nonstop(city("TPE"), city("NYC"), jan(10), 650.0).with_duration(920),
    ])
}

/// A config the template fares can satisfy: real fares only, a two-week
/// fallback window, HKG from 12-28 to 12-31 and a 30 to 40 day trip.
fn template_config() -> TripConfig {
    TripConfig {
        cities: vec![
            CityStay::new(city("TYO"), 5),
            CityStay::new(city("HKG"), 4),
            CityStay::new(city("TPE"), 4),
        ],
        optional_city: None,
        flex: FlexPolicy::new(1, 14, false),
        trip_length: TripLength::new(30, 40),
        anchor: AnchorConstraint {
            city: city("HKG"),
            arrive_by: dec(28),
            depart_not_before: dec(31),
        },
        windows: vec![DepartureWindow::new("early", dec(6), dec(10))],
        ..TripConfig::default()
    }
}

fn run(table: &FareTable, config: &TripConfig, top_k: usize) -> SearchResult {
    let mut request = config.request(false, config.windows.clone());
    request.top_k = top_k;
    Planner::new(table, config).search(&request).unwrap()
}

#[test]
fn template_fares_single_best() {
    let table = template_fares();
    let config = template_config();

    let result = run(&table, &config, 1);

    assert_eq!(result.itineraries.len(), 1);
    let best = result.best().unwrap();
    assert_eq!(best.total_price, 1790.0);
    assert_eq!(best.order, [city("TYO"), city("HKG"), city("TPE")]);
    assert_eq!(best.nights_in(&city("TYO")), 4);
    assert_eq!(best.nights_in(&city("HKG")), 4);
    assert_eq!(best.nights_in(&city("TPE")), 4);
    assert_eq!(best.window, "early");
    assert!(!best.includes_optional);
    assert!(!best.has_estimated_fares());
}

#[test]
fn template_fares_schedule() {
    let table = template_fares();
    let config = template_config();

    let result = run(&table, &config, 1);
    let best = result.best().unwrap();

    let dates: Vec<_> = best
        .legs
        .iter()
        .map(|leg| (leg.origin().as_str().to_string(), leg.departure(), leg.arrival()))
        .collect();
    assert_eq!(
        dates,
        [
            ("NYC".to_string(), dec(6), dec(7)),
            // Preferred 12-11, slipped to the next day's fare.
            ("TYO".to_string(), dec(12), dec(13)),
            // Only found through the fallback window.
            ("HKG".to_string(), dec(31), jan(1)),
            ("TPE".to_string(), jan(10), jan(11)),
        ]
    );

    assert_eq!(best.start_date, dec(6));
    assert_eq!(best.end_date, jan(11));
    assert_eq!(best.trip_days(), 37);
    assert_eq!(best.anchor_arrival, dec(13));
    assert_eq!(best.anchor_departure, dec(31));
    assert_eq!(best.total_duration_minutes, 840 + 300 + 95 + 920);
    assert_eq!(best.route().len(), 5);
}

#[test]
fn template_fares_all_feasible_combinations() {
    let table = template_fares();
    let config = template_config();

    let result = run(&table, &config, 10);

    // TYO 6 nights misses the only TYO→HKG fare; everything else fits.
    assert_eq!(result.itineraries.len(), 8);
    let combos: BTreeSet<_> = result
        .itineraries
        .iter()
        .map(|i| {
            (
                i.nights_in(&city("TYO")),
                i.nights_in(&city("HKG")),
                i.nights_in(&city("TPE")),
            )
        })
        .collect();
    assert_eq!(combos.len(), 8);
    assert!(combos.iter().all(|&(t, h, p)| t <= 5 && h <= 5 && p <= 5));

    for itinerary in &result.itineraries {
        assert_eq!(itinerary.total_price, 1790.0);
        assert_eq!(itinerary.order, [city("TYO"), city("HKG"), city("TPE")]);
        assert_eq!(itinerary.start_date, dec(6));
    }

    // Exact ties keep discovery order: shortest stays first.
    let first = &result.itineraries[0];
    let nights: Vec<_> = first.order.iter().map(|c| first.nights_in(c)).collect();
    assert_eq!(nights, [4, 4, 4]);
}

#[test]
fn candidate_accounting() {
    let table = template_fares();
    let config = template_config();

    let result = run(&table, &config, 10);

    // 5 dates × 6 orders × (3 × 2 × 2) night combinations
    assert_eq!(result.candidates_explored, 360);
    assert_eq!(
        result.rejections.total() + result.itineraries.len(),
        result.candidates_explored
    );
    assert_eq!(result.rejections.anchor_not_visited, 0);
    assert_eq!(result.rejections.anchor_uncovered, 0);
    assert_eq!(result.rejections.trip_length, 0);
}

#[test]
fn template_fares_fail_default_anchor_dates() {
    let table = template_fares();
    let config = TripConfig {
        anchor: AnchorConstraint {
            depart_not_before: jan(2),
            ..template_config().anchor
        },
        ..template_config()
    };

    let result = run(&table, &config, 10);

    // HKG→TPE on 12-31 leaves before the 01-02 resume date.
    assert!(result.itineraries.is_empty());
    assert_eq!(result.rejections.anchor_uncovered, 8);
}

#[test]
fn template_fares_too_long_for_default_trip_length() {
    let table = template_fares();
    let config = TripConfig {
        trip_length: TripLength::new(17, 25),
        ..template_config()
    };

    let result = run(&table, &config, 10);

    assert!(result.itineraries.is_empty());
    assert_eq!(result.rejections.trip_length, 8);
}

#[test]
fn anchor_arrival_day_after_cutoff_rejected() {
    let table = template_fares();

    // Arrival in HKG is 12-13 for every feasible candidate.
    let late = TripConfig {
        anchor: AnchorConstraint {
            arrive_by: dec(12),
            ..template_config().anchor
        },
        ..template_config()
    };
    let result = run(&table, &late, 10);
    assert!(result.itineraries.is_empty());
    assert_eq!(result.rejections.anchor_uncovered, 8);

    let on_cutoff = TripConfig {
        anchor: AnchorConstraint {
            arrive_by: dec(13),
            ..template_config().anchor
        },
        ..template_config()
    };
    assert_eq!(run(&table, &on_cutoff, 10).itineraries.len(), 8);
}

#[test]
fn anchor_city_not_in_route() {
    let table = template_fares();
    let config = TripConfig {
        anchor: AnchorConstraint {
            city: city("SHA"),
            ..template_config().anchor
        },
        ..template_config()
    };

    let result = run(&table, &config, 10);

    assert!(result.itineraries.is_empty());
    assert_eq!(result.rejections.anchor_not_visited, 8);
}

#[test]
fn empty_fares_priced_from_defaults() {
    let table = FareTable::default();
    let config = TripConfig::default();

    let result = run(&table, &config, 10);

    let best = result.best().unwrap();
    assert_eq!(best.total_price, 1695.0);
    assert_eq!(best.order, [city("TPE"), city("HKG"), city("TYO")]);
    assert_eq!(best.window, "late");
    assert!(best.legs.iter().all(|l| l.source() == FareSource::Estimated));
    assert!(best.legs.iter().all(|l| l.fare().carrier.is_none()));
    assert!(best.anchor_arrival <= dec(28));
    assert!(best.anchor_departure >= jan(2));
}

#[test]
fn itineraries_are_consistent() {
    let table = FareTable::default();
    let config = TripConfig::default();

    let mut request = config.request(true, config.windows.clone());
    request.top_k = 50;
    let result = Planner::new(&table, &config).search(&request).unwrap();
    assert!(!result.itineraries.is_empty());

    for it in &result.itineraries {
        assert_eq!(it.total_price, it.legs_total());
        assert_eq!(it.legs.len(), it.order.len() + 1);
        assert_eq!(it.home(), Some(city("NYC")));
        assert_eq!(it.legs.last().map(|l| l.destination()), Some(city("NYC")));
        assert_eq!(it.start_date, it.legs[0].departure());
        assert_eq!(it.end_date, it.legs[it.order.len()].arrival());
        assert!(config.trip_length.contains(it.trip_days()));
        assert!(config.anchor.is_covered_by(it.anchor_arrival, it.anchor_departure));

        for (i, pair) in it.legs.windows(2).enumerate() {
            assert_eq!(pair[0].destination(), pair[1].origin());
            assert_eq!(pair[0].destination(), it.order[i]);
            let earliest = add_days(pair[0].arrival(), u64::from(it.nights_in(&it.order[i])));
            assert!(pair[1].departure() >= earliest);
        }
    }

    let prices: Vec<_> = result.itineraries.iter().map(|i| i.total_price).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn anchor_as_last_city_departs_on_home_leg() {
    let table = FareTable::default();
    let config = TripConfig::default();
    let early = vec![config.window("early").unwrap().clone()];

    let request = config.request(true, early);
    let result = Planner::new(&table, &config).search(&request).unwrap();
    assert!(!result.itineraries.is_empty());

    for it in &result.itineraries {
        assert_eq!(it.order.last(), Some(&city("HKG")));
        let home_leg = it.legs.last().unwrap();
        assert_eq!(it.anchor_departure, home_leg.departure());
    }
}

#[test]
fn total_price_rounds_to_cents() {
    let table = FareTable::build(vec![
        FareOption::nonstop(city("NYC"), city("HKG"), dec(6), 100.105),
        FareOption::nonstop(city("HKG"), city("NYC"), dec(11), 200.2),
    ]);
    let config = TripConfig {
        cities: vec![CityStay::new(city("HKG"), 4)],
        optional_city: None,
        flex: FlexPolicy::new(0, 0, false),
        trip_length: TripLength::new(1, 30),
        anchor: AnchorConstraint {
            city: city("HKG"),
            arrive_by: dec(7),
            depart_not_before: dec(11),
        },
        windows: vec![DepartureWindow::new("one", dec(6), dec(6))],
        ..TripConfig::default()
    };

    let result = run(&table, &config, 1);
    let best = result.best().unwrap();
    assert_eq!(best.total_price, best.legs_total());
    assert_eq!(best.total_price, crate::domain::money::round_cents(100.105 + 200.2));
}

#[test]
fn no_windows_explores_nothing() {
    let table = template_fares();
    let config = template_config();
    let request = config.request(false, Vec::new());

    let result = Planner::new(&table, &config).search(&request).unwrap();

    assert_eq!(result, SearchResult::empty());
}

#[test]
fn zero_top_k_still_searches() {
    let table = template_fares();
    let config = template_config();

    let result = run(&table, &config, 0);

    assert!(result.itineraries.is_empty());
    assert_eq!(result.candidates_explored, 360);
}

fn valid_request() -> SearchRequest {
    let config = TripConfig::default();
    config.request(false, config.windows.clone())
}

#[test]
fn validate_accepts_default_request() {
    assert_eq!(valid_request().validate(), Ok(()));
}

#[test]
fn validate_empty_cities() {
    let request = SearchRequest {
        cities: Vec::new(),
        ..valid_request()
    };
    assert_eq!(request.validate(), Err(SearchError::NoCities));
}

#[test]
fn validate_duplicate_city() {
    let mut request = valid_request();
    request.cities.push(city("TYO"));
    assert_eq!(request.validate(), Err(SearchError::DuplicateCity(city("TYO"))));
}

#[test]
fn validate_missing_nights() {
    let mut request = valid_request();
    request.nights.remove(&city("TPE"));
    assert_eq!(request.validate(), Err(SearchError::MissingNights(city("TPE"))));
}

#[test]
fn validate_inverted_nights() {
    let mut request = valid_request();
    request.nights.insert(city("HKG"), NightsRange::new(5, 4));
    assert_eq!(
        request.validate(),
        Err(SearchError::InvertedNights {
            city: city("HKG"),
            min: 5,
            max: 4
        })
    );
}

#[test]
fn validate_inverted_window() {
    let mut request = valid_request();
    request
        .windows
        .push(DepartureWindow::new("backwards", dec(10), dec(6)));
    assert_eq!(
        request.validate(),
        Err(SearchError::InvertedWindow("backwards".to_string()))
    );
}

#[test]
fn validate_inverted_trip_length() {
    let request = SearchRequest {
        trip_length: TripLength::new(26, 25),
        ..valid_request()
    };
    assert_eq!(
        request.validate(),
        Err(SearchError::InvertedTripLength { min: 26, max: 25 })
    );
}

#[test]
fn search_rejects_invalid_request() {
    let table = template_fares();
    let config = template_config();
    let request = SearchRequest {
        cities: Vec::new(),
        ..config.request(false, config.windows.clone())
    };

    let err = Planner::new(&table, &config).search(&request).unwrap_err();
    assert_eq!(err, SearchError::NoCities);
    assert_eq!(err.to_string(), "no cities to visit");
}
