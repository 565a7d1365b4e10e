//! Cross-scenario selection and the best-per-window summary matrix.
//!
//! A scenario is one city set: the required cities with or without the
//! optional extra city.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Itinerary;

use super::config::{DepartureWindow, TripConfig};
use super::rank::top_n;
use super::search::{Planner, SearchError};

/// Which scenarios to search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioFilter {
    /// With and without the optional city
    #[default]
    Both,
    /// Only with the optional city
    IncludeOnly,
    /// Only without the optional city
    ExcludeOnly,
}

impl ScenarioFilter {
    /// Include-flags to run, in order.
    pub fn scenarios(self) -> &'static [bool] {
        match self {
            ScenarioFilter::Both => &[true, false],
            ScenarioFilter::IncludeOnly => &[true],
            ScenarioFilter::ExcludeOnly => &[false],
        }
    }
}

/// Best `n` itineraries over the scenarios `filter` selects.
///
/// Each scenario is searched separately, then the results are merged and
/// ranked together. Without an optional city configured, only the required
/// set is searched, and `IncludeOnly` finds nothing.
pub fn top_across_scenarios(
    planner: &Planner<'_>,
    config: &TripConfig,
    filter: ScenarioFilter,
    windows: &[DepartureWindow],
    n: usize,
) -> Result<Vec<Itinerary>, SearchError> {
    let mut merged = Vec::new();

    for &include in filter.scenarios() {
        if include && config.optional_city.is_none() {
            continue;
        }
        let mut request = config.request(include, windows.to_vec());
        request.top_k = n;
        merged.extend(planner.search(&request)?.itineraries);
    }

    Ok(top_n(merged, n))
}

/// Cheapest itinerary per scenario for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub window: String,
    pub with_optional: Option<Itinerary>,
    pub without_optional: Option<Itinerary>,
}

impl SummaryRow {
    /// Both cells, "with" first, skipping empty ones.
    pub fn cells(&self) -> impl Iterator<Item = &Itinerary> {
        self.with_optional.iter().chain(self.without_optional.iter())
    }
}

/// Window × scenario grid of cheapest itineraries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryMatrix {
    pub rows: Vec<SummaryRow>,
}

impl SummaryMatrix {
    /// Every filled cell in row order, "with" before "without".
    pub fn selected(&self) -> Vec<&Itinerary> {
        self.rows.iter().flat_map(SummaryRow::cells).collect()
    }

    /// Row for a named window.
    pub fn row(&self, window: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.window == window)
    }

    /// Returns true if no cell has an itinerary.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.cells().next().is_none())
    }
}

/// Search one window with and without the optional city, keeping the best of each.
pub fn best_in_window(
    planner: &Planner<'_>,
    config: &TripConfig,
    window: &DepartureWindow,
) -> Result<SummaryRow, SearchError> {
    let best = |include: bool| -> Result<Option<Itinerary>, SearchError> {
        let mut request = config.request(include, vec![window.clone()]);
        request.top_k = 1;
        Ok(planner.search(&request)?.itineraries.into_iter().next())
    };

    let with_optional = match config.optional_city {
        Some(_) => best(true)?,
        None => None,
    };
    let without_optional = best(false)?;

    debug!(
        window = %window.name,
        with = with_optional.as_ref().map(|i| i.total_price),
        without = without_optional.as_ref().map(|i| i.total_price),
        "summary row"
    );

    Ok(SummaryRow {
        window: window.name.clone(),
        with_optional,
        without_optional,
    })
}

/// Build the summary matrix, one row per window in the given order.
pub fn best_per_scenario(
    planner: &Planner<'_>,
    config: &TripConfig,
    windows: &[DepartureWindow],
) -> Result<SummaryMatrix, SearchError> {
    let rows = windows
        .iter()
        .map(|window| best_in_window(planner, config, window))
        .collect::<Result<_, _>>()?;
    Ok(SummaryMatrix { rows })
}
