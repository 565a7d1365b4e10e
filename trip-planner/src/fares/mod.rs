//! Fare data: ingestion, indexing, default pricing and resolution.
//!
//! Fares flow from a CSV file through [`parse_fares`] into a read-only
//! [`FareTable`]. The itinerary search asks a [`FareResolver`] for the best
//! fare per leg; the resolver consults the table and, when allowed, prices
//! missing routes from [`DefaultPricing`].

mod ingest;
mod pricing;
mod resolver;
mod table;

pub use ingest::{
    CSV_FIELDS, IngestError, load_fares, parse_fares, write_template, write_template_file,
};
pub use pricing::{DefaultPricing, PriceRule, RuleCondition, YearMonth};
pub use resolver::{FareResolver, FlexPolicy, ResolvedFare};
pub use table::FareTable;
