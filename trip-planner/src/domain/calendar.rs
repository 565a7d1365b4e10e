//! Calendar-date helpers.
//!
//! Schedules are modelled at day granularity only. These helpers saturate at
//! the ends of the supported calendar instead of panicking, so date arithmetic
//! in the search never aborts a run.

use chrono::{Days, NaiveDate};

/// Days consumed by a flight: arrival is the day after departure.
pub const FLIGHT_DAYS: u64 = 1;

/// Add `days` to `date`, saturating at [`NaiveDate::MAX`].
pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

/// Number of calendar days from `start` to `end`, counting both ends.
///
/// Returns 0 if `end` is before `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let span = end.signed_duration_since(start).num_days();
    u32::try_from(span + 1).unwrap_or(0)
}

/// Iterate every date from `start` to `end` inclusive.
///
/// Yields nothing if `end` is before `start`.
pub fn each_day(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}
