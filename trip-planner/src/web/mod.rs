//! Web layer for the trip planner.
//!
//! Provides HTTP endpoints for searching itineraries and viewing the
//! per-window summary.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
