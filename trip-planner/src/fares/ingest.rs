//! CSV fare ingestion and template writing.
//!
//! The expected file has one row per route per date:
//!
//! ```text
//! origin_city,destination_city,date,price,stops,duration_minutes,airline,booking_link
//! NYC,TYO,2025-12-06,780,0,840,JL,https://example.com/nyc-tyo-2025-12-06
//! ```
//!
//! A bad row is never an error. Rows missing a required field, with an
//! unparseable date or number, an empty stop count, or any stops at all are
//! skipped. Only I/O failures and an unreadable header are reported.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{CityCode, FareOption};

/// Column names, in template order.
pub const CSV_FIELDS: [&str; 8] = [
    "origin_city",
    "destination_city",
    "date",
    "price",
    "stops",
    "duration_minutes",
    "airline",
    "booking_link",
];

/// Error reading or writing fare CSV files.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One raw CSV row. A column missing from the file reads as empty.
#[derive(Debug)]
struct FareRow<'r> {
    origin_city: &'r str,
    destination_city: &'r str,
    date: &'r str,
    price: &'r str,
    stops: &'r str,
    duration_minutes: &'r str,
    airline: &'r str,
    booking_link: &'r str,
}

impl FareRow<'_> {
    /// Convert to a nonstop fare, or `None` if the row is unusable.
    fn into_fare(self) -> Option<FareOption> {
        let origin = CityCode::parse_normalized(self.origin_city).ok()?;
        let destination = CityCode::parse_normalized(self.destination_city).ok()?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()?;

        let price: f64 = self.price.trim().parse().ok()?;
        if !price.is_finite() || price < 0.0 {
            return None;
        }

        let stops: u32 = self.stops.trim().parse().ok()?;
        if stops != 0 {
            return None;
        }

        let duration = match self.duration_minutes.trim() {
            "" => 0,
            s => s.parse().ok()?,
        };

        let mut fare = FareOption::nonstop(origin, destination, date, price)
            .with_stops(stops)
            .with_duration(duration);
        fare.carrier = non_empty(self.airline);
        fare.booking_link = non_empty(self.booking_link);
        Some(fare)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Position of each [`CSV_FIELDS`] column in the header, if present.
struct Columns([Option<usize>; CSV_FIELDS.len()]);

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        Self(CSV_FIELDS.map(|name| headers.iter().position(|h| h.trim() == name)))
    }

    /// Read a record by header name. Short records leave trailing fields empty.
    fn row<'r>(&self, record: &'r csv::StringRecord) -> FareRow<'r> {
        let field = |i: usize| self.0[i].and_then(|idx| record.get(idx)).unwrap_or("");
        FareRow {
            origin_city: field(0),
            destination_city: field(1),
            date: field(2),
            price: field(3),
            stops: field(4),
            duration_minutes: field(5),
            airline: field(6),
            booking_link: field(7),
        }
    }
}

/// Parse nonstop fares from CSV with a header row.
pub fn parse_fares<R: Read>(reader: R) -> Result<Vec<FareOption>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::from_headers(reader.headers()?);

    let mut fares = Vec::new();
    let mut skipped = 0usize;

    for (idx, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        match record {
            Ok(record) => match columns.row(&record).into_fare() {
                Some(fare) => fares.push(fare),
                None => {
                    skipped += 1;
                    debug!(line, "skipping unusable fare row");
                }
            },
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                skipped += 1;
                debug!(line, error = %e, "skipping malformed fare row");
            }
        }
    }

    info!(kept = fares.len(), skipped, "parsed fare rows");
    Ok(fares)
}

/// Load nonstop fares from a CSV file.
pub fn load_fares(path: impl AsRef<Path>) -> Result<Vec<FareOption>, IngestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;
    parse_fares(file)
}

/// One template row, serialized in [`CSV_FIELDS`] order.
#[derive(Debug, Serialize)]
struct TemplateRow {
    origin_city: &'static str,
    destination_city: &'static str,
    date: &'static str,
    price: &'static str,
    stops: &'static str,
    duration_minutes: &'static str,
    airline: &'static str,
    booking_link: &'static str,
}

const TEMPLATE_ROWS: [TemplateRow; 4] = [
    TemplateRow {
        origin_city: "NYC",
        destination_city: "TYO",
        date: "2025-12-06",
        price: "780",
        stops: "0",
        duration_minutes: "840",
        airline: "JL",
        booking_link: "https://example.com/nyc-tyo-2025-12-06",
    },
    TemplateRow {
        origin_city: "TYO",
        destination_city: "HKG",
        date: "2025-12-12",
        price: "210",
        stops: "0",
        duration_minutes: "300",
        airline: "CX",
        booking_link: "https://example.com/tyo-hkg-2025-12-12",
    },
    TemplateRow {
        origin_city: "HKG",
        destination_city: "TPE",
        date: "2025-12-31",
        price: "150",
        stops: "0",
        duration_minutes: "95",
        airline: "BR",
        booking_link: "https://example.com/hkg-tpe-2025-12-31",
    },
    TemplateRow {
        origin_city: "TPE",
        destination_city: "NYC",
        date: "2026-01-10",
        price: "650",
        stops: "0",
        duration_minutes: "920",
        airline: "CI",
        booking_link: "https://example.com/tpe-nyc-2026-01-10",
    },
];

/// Write a CSV template with the header and a few sample rows.
pub fn write_template<W: Write>(writer: W) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in &TEMPLATE_ROWS {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the CSV template to a file, replacing it if it exists.
pub fn write_template_file(path: impl AsRef<Path>) -> Result<(), IngestError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;
    write_template(file)
}
