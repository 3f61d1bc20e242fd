//! Tally DB - MongoDB repository layer
//!
//! Executes the report pipelines from `tally-core` against live MongoDB
//! collections. The pipeline descriptions are rendered to BSON aggregation
//! documents by [`translate`] and run through [`SalesRepository`], which
//! implements the same `SalesStore` contract the in-memory test store does.

mod repository;
pub mod translate;

pub use repository::SalesRepository;
