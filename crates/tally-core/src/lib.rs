//! Tally Core - report catalog and aggregation contract
//!
//! This crate defines everything the sales analytics service knows about its
//! data, independent of any database driver:
//!
//! - **Models**: the `Sale`, `Customer` and `Product` records as stored
//! - **Pipeline**: a declarative description of an aggregation (match, group,
//!   sort, lookup, projection stages)
//! - **Catalog**: the fixed set of reports the service exposes, each encoded
//!   as one pipeline
//! - **Memory store**: an in-memory interpreter of the same pipeline contract,
//!   used to test the catalog without a live database

pub mod catalog;
pub mod error;
pub mod memory;
pub mod models;
pub mod pipeline;
pub mod traits;

pub use error::AppError;
pub use memory::MemoryStore;
pub use models::{Customer, Product, Sale};
pub use pipeline::Pipeline;
pub use traits::SalesStore;
