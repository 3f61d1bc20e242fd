//! Trait definitions for the data-store collaborator.
//!
//! Handlers and tests talk to the store through [`SalesStore`] only, so the
//! same report catalog runs unchanged against MongoDB in production and
//! against [`crate::MemoryStore`] in tests.

use std::future::Future;

use serde_json::Value;

use crate::error::AppError;
use crate::pipeline::Pipeline;

/// Read-only aggregation contract over the sales collections.
///
/// One method is all the service needs: execute a pipeline, hand back the raw
/// result rows. The rows are returned as JSON values untouched, because every
/// endpoint serves the store's output verbatim.
pub trait SalesStore: Send + Sync + Clone {
    /// Executes an aggregation pipeline against its source collection.
    fn aggregate(
        &self,
        pipeline: &Pipeline,
    ) -> impl Future<Output = Result<Vec<Value>, AppError>> + Send;
}
