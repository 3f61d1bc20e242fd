//! MongoDB repository for the sales collections.

use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use tracing::debug;

use tally_core::catalog::{CUSTOMERS_COLLECTION, PRODUCTS_COLLECTION, SALES_COLLECTION};
use tally_core::{AppError, Pipeline, SalesStore};

use crate::translate::to_documents;

/// Repository over the sales database.
///
/// Holds one handle per collection on a shared client; cloning is cheap and
/// every clone reuses the same underlying connection pool.
#[derive(Clone)]
pub struct SalesRepository {
    database: Database,
    sales: Collection<Document>,
    customers: Collection<Document>,
    products: Collection<Document>,
}

impl SalesRepository {
    /// Creates a repository over the named database.
    pub fn new(client: &Client, database_name: &str) -> Self {
        let database = client.database(database_name);
        let sales = database.collection(SALES_COLLECTION);
        let customers = database.collection(CUSTOMERS_COLLECTION);
        let products = database.collection(PRODUCTS_COLLECTION);

        Self {
            database,
            sales,
            customers,
            products,
        }
    }

    /// Connectivity probe, used once at startup. The client connects lazily,
    /// so a failure here is advisory: later queries retry on their own.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(store_error)?;
        Ok(())
    }

    fn collection(&self, name: &str) -> &Collection<Document> {
        match name {
            CUSTOMERS_COLLECTION => &self.customers,
            PRODUCTS_COLLECTION => &self.products,
            _ => &self.sales,
        }
    }
}

impl SalesStore for SalesRepository {
    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Value>, AppError> {
        let stages = to_documents(pipeline);
        debug!(
            collection = pipeline.collection,
            stages = stages.len(),
            "running aggregation"
        );

        let mut cursor = self
            .collection(pipeline.collection)
            .aggregate(stages)
            .await
            .map_err(store_error)?;

        let mut rows = Vec::new();
        while cursor.advance().await.map_err(store_error)? {
            let document = cursor.deserialize_current().map_err(store_error)?;
            rows.push(Bson::Document(document).into_relaxed_extjson());
        }

        Ok(rows)
    }
}

fn store_error(err: mongodb::error::Error) -> AppError {
    match *err.kind {
        mongodb::error::ErrorKind::ServerSelection { .. } => {
            AppError::StoreUnavailable(err.to_string())
        }
        _ => AppError::StoreError(err.to_string()),
    }
}
