use tally_core::SalesStore;

/// Shared application state for all handlers.
///
/// Generic over the store so the same router serves the MongoDB repository in
/// production and the in-memory store in tests. Axum clones this per request;
/// the store's clone is a cheap handle copy.
#[derive(Clone)]
pub struct AppState<S: SalesStore> {
    /// Store executing the report pipelines
    pub store: S,
}

impl<S: SalesStore> AppState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}
