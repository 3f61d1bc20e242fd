//! Tally Server - REST API for the sales report catalog
//!
//! This crate exposes each report from `tally-core` as one HTTP GET endpoint
//! returning the raw result rows as a JSON array:
//!
//! - **Grouping reports**: totals per category, orders per day, monthly
//!   revenue, repeat customers, average order value
//! - **Top reports**: most used payment method, highest-spending customer
//! - **Joins**: sales flattened with customer details, per-order summaries
//! - **Selection**: raw sales filtered by payment method
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
