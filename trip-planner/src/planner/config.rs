//! Trip configuration for the itinerary planner.
//!
//! Everything the search needs to know about the trip lives here rather than
//! in process-wide constants: home city, destinations, stay lengths, anchor
//! dates, departure windows and default pricing. `Default` is the
//! December 2025 New York → Asia scenario.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::CityCode;
use crate::domain::calendar::each_day;
use crate::fares::{DefaultPricing, FlexPolicy};

use super::search::{SearchError, SearchRequest};

const NYC: CityCode = CityCode::known(b"NYC");
const TYO: CityCode = CityCode::known(b"TYO");
const HKG: CityCode = CityCode::known(b"HKG");
const TPE: CityCode = CityCode::known(b"TPE");
const SHA: CityCode = CityCode::known(b"SHA");

/// Error loading or validating a trip configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown departure window: {0}")]
    UnknownWindow(String),

    #[error(transparent)]
    Invalid(#[from] SearchError),
}

/// Target number of nights in one city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityStay {
    pub city: CityCode,
    pub nights: u32,
}

impl CityStay {
    pub fn new(city: CityCode, nights: u32) -> Self {
        Self { city, nights }
    }
}

/// Allowed nights in one city, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightsRange {
    pub min: u32,
    pub max: u32,
}

impl NightsRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// One night either side of `target`, with both ends raised to at least `floor`.
    ///
    /// ```
    /// use trip_planner::planner::NightsRange;
    ///
    /// assert_eq!(NightsRange::around(5, 4), NightsRange::new(4, 6));
    /// assert_eq!(NightsRange::around(3, 4), NightsRange::new(4, 4));
    /// ```
    pub fn around(target: u32, floor: u32) -> Self {
        Self {
            min: target.saturating_sub(1).max(floor),
            max: target.saturating_add(1).max(floor),
        }
    }

    /// Every allowed night count.
    pub fn counts(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }
}

/// A named range of eligible trip start dates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartureWindow {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DepartureWindow {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Every start date in the window, inclusive.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        each_day(self.start, self.end)
    }
}

/// Required continuous presence in one city.
///
/// The traveller must arrive on or before `arrive_by` and leave on or after
/// `depart_not_before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorConstraint {
    pub city: CityCode,
    pub arrive_by: NaiveDate,
    pub depart_not_before: NaiveDate,
}

impl AnchorConstraint {
    /// Returns true if a stay from `arrival` to `departure` covers the window.
    pub fn is_covered_by(&self, arrival: NaiveDate, departure: NaiveDate) -> bool {
        arrival <= self.arrive_by && departure >= self.depart_not_before
    }
}

/// Allowed total trip length in days, inclusive, counting start and end days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripLength {
    pub min_days: u32,
    pub max_days: u32,
}

impl TripLength {
    pub fn new(min_days: u32, max_days: u32) -> Self {
        Self { min_days, max_days }
    }

    pub fn contains(&self, days: u32) -> bool {
        (self.min_days..=self.max_days).contains(&days)
    }
}

/// Configuration parameters for itinerary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    /// City every itinerary starts and ends at.
    pub home: CityCode,

    /// Cities every itinerary visits, with target nights.
    pub cities: Vec<CityStay>,

    /// Extra city that scenarios may include or leave out.
    pub optional_city: Option<CityStay>,

    /// Lower bound on nights in any city after flexing the targets.
    pub min_nights: u32,

    /// Date flexibility for fare lookups.
    pub flex: FlexPolicy,

    /// Allowed total trip length.
    pub trip_length: TripLength,

    /// Required presence in one city.
    pub anchor: AnchorConstraint,

    /// Start-date windows, in display order.
    pub windows: Vec<DepartureWindow>,

    /// Maximum number of itineraries to return.
    pub max_results: usize,

    /// Default prices for routes without fare data.
    pub pricing: DefaultPricing,
}

impl TripConfig {
    /// Parse a configuration from JSON. Missing fields take default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check the configuration can produce a valid search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.request(true, self.windows.clone()).validate()?;
        Ok(())
    }

    /// Look up a departure window by name.
    pub fn window(&self, name: &str) -> Option<&DepartureWindow> {
        self.windows.iter().find(|w| w.name == name)
    }

    /// All windows, or just the named one.
    pub fn select_windows(&self, name: Option<&str>) -> Result<Vec<DepartureWindow>, ConfigError> {
        match name {
            None => Ok(self.windows.clone()),
            Some(name) => self
                .window(name)
                .cloned()
                .map(|w| vec![w])
                .ok_or_else(|| ConfigError::UnknownWindow(name.to_string())),
        }
    }

    /// Cities for a scenario, with or without the optional city.
    pub fn stays(&self, include_optional: bool) -> Vec<CityStay> {
        let extra = self.optional_city.filter(|_| include_optional);
        self.cities.iter().copied().chain(extra).collect()
    }

    /// Build a search request for a scenario over `windows`.
    pub fn request(&self, include_optional: bool, windows: Vec<DepartureWindow>) -> SearchRequest {
        let stays = self.stays(include_optional);
        let mut nights = BTreeMap::new();
        for stay in &stays {
            nights.insert(stay.city, NightsRange::around(stay.nights, self.min_nights));
        }

        SearchRequest {
            cities: stays.iter().map(|s| s.city).collect(),
            nights,
            windows,
            flex: self.flex,
            trip_length: self.trip_length,
            top_k: self.max_results,
            includes_optional: include_optional && self.optional_city.is_some(),
        }
    }

    /// Label for the optional city in tables.
    pub fn optional_label(&self) -> String {
        self.optional_city
            .map_or_else(|| "extra".to_string(), |s| s.city.to_string())
    }
}

fn dec(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, day).unwrap_or(NaiveDate::MIN)
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            home: NYC,
            cities: vec![
                CityStay::new(TYO, 5),
                // Four nights must still cover 12/28 to 01/01.
                CityStay::new(HKG, 4),
                CityStay::new(TPE, 4),
            ],
            optional_city: Some(CityStay::new(SHA, 3)),
            min_nights: 4,
            flex: FlexPolicy::default(),
            trip_length: TripLength::new(17, 25),
            anchor: AnchorConstraint {
                city: HKG,
                arrive_by: dec(28),
                depart_not_before: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap_or(NaiveDate::MIN),
            },
            windows: vec![
                DepartureWindow::new("early", dec(6), dec(10)),
                DepartureWindow::new("mid", dec(11), dec(17)),
                DepartureWindow::new("late", dec(18), dec(24)),
            ],
            max_results: 10,
            pricing: DefaultPricing::default(),
        }
    }
}
