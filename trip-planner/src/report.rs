//! Plain-text rendering of search results for the console.

use std::fmt;

use crate::domain::{CityCode, Itinerary};
use crate::planner::SummaryMatrix;

/// Message shown when a search finds nothing.
pub const NO_ITINERARIES: &str = "No valid itineraries found with current data and constraints.";

const CELL_WIDTH: usize = 11;

fn dollars(price: f64) -> String {
    format!("${price:.0}")
}

/// Numbered itinerary blocks, one per result.
pub struct ItineraryList<'a> {
    pub itineraries: &'a [Itinerary],
    pub home: CityCode,
}

impl fmt::Display for ItineraryList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.itineraries.is_empty() {
            return writeln!(f, "{NO_ITINERARIES}");
        }

        for (idx, it) in self.itineraries.iter().enumerate() {
            let route = std::iter::once(self.home)
                .chain(it.order.iter().copied())
                .chain(std::iter::once(self.home))
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            let nights = it
                .order
                .iter()
                .map(|c| format!("{c}:{}n", it.nights_in(c)))
                .collect::<Vec<_>>()
                .join(", ");

            writeln!(
                f,
                "[{}] {} | window={} | include_extra={}",
                idx + 1,
                dollars(it.total_price),
                it.window,
                it.includes_optional
            )?;
            writeln!(f, "    Route: {route}")?;
            writeln!(f, "    Nights: {nights}")?;
            writeln!(
                f,
                "    Start: {}  End: {}  ({} days)",
                it.start_date,
                it.end_date,
                it.trip_days()
            )?;
            writeln!(
                f,
                "    Anchor: arrive {}  depart {}",
                it.anchor_arrival, it.anchor_departure
            )?;
            writeln!(f, "    Segments:")?;
            for leg in &it.legs {
                let fare = leg.fare();
                write!(
                    f,
                    "      {}->{}  depart {} arrive {} {}",
                    leg.origin(),
                    leg.destination(),
                    leg.departure(),
                    leg.arrival(),
                    dollars(leg.price())
                )?;
                if leg.source().is_estimated() {
                    write!(f, " (est.)")?;
                }
                if let Some(carrier) = &fare.carrier {
                    write!(f, "  airline={carrier}")?;
                }
                if let Some(link) = &fare.booking_link {
                    write!(f, "  link={link}")?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Render itineraries as numbered text blocks.
pub fn render_itineraries(itineraries: &[Itinerary], home: CityCode) -> String {
    ItineraryList { itineraries, home }.to_string()
}

/// Fixed-width window × scenario price table.
pub struct SummaryTable<'a> {
    pub matrix: &'a SummaryMatrix,
    pub extra_label: &'a str,
}

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_label = "Window";
        let with_label = format!("with_{}", self.extra_label);
        let without_label = format!("without_{}", self.extra_label);

        let row_w = self
            .matrix
            .rows
            .iter()
            .map(|r| r.window.len())
            .chain(std::iter::once(row_label.len()))
            .max()
            .unwrap_or(row_label.len());
        let col_w = CELL_WIDTH.max(without_label.len());

        let header = format!("{row_label:<row_w$} | {with_label:<col_w$} | {without_label:<col_w$}");
        writeln!(f, "Summary price table (USD):")?;
        writeln!(f, "{header}")?;
        writeln!(f, "{}", "-".repeat(header.len()))?;

        let cell = |it: &Option<Itinerary>| {
            it.as_ref()
                .map_or_else(|| "-".to_string(), |i| dollars(i.total_price))
        };
        for row in &self.matrix.rows {
            let with = cell(&row.with_optional);
            let without = cell(&row.without_optional);
            writeln!(
                f,
                "{:<row_w$} | {with:<col_w$} | {without:<col_w$}",
                row.window
            )?;
        }
        Ok(())
    }
}

/// Render the summary matrix as a table.
pub fn render_summary_table(matrix: &SummaryMatrix, extra_label: &str) -> String {
    SummaryTable {
        matrix,
        extra_label,
    }
    .to_string()
}
