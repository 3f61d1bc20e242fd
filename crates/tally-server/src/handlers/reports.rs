//! Report endpoints, one per catalog entry.
//!
//! Every handler runs one fixed pipeline and returns the store's result rows
//! verbatim as a JSON array. All endpoints are read-only and stateless.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use tally_core::{catalog, Pipeline, SalesStore};

use crate::error::ApiError;
use crate::state::AppState;

async fn run<S: SalesStore>(
    state: &AppState<S>,
    pipeline: Pipeline,
) -> Result<Json<Vec<Value>>, ApiError> {
    let rows = state
        .store
        .aggregate(&pipeline)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(rows))
}

/// Total revenue per product category.
#[utoipa::path(
    get,
    path = "/total-sales-per-category",
    responses(
        (status = 200, description = "One row per category: {_id, totalSales}"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn total_sales_per_category<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::total_sales_per_category()).await
}

/// The single most used payment method.
#[utoipa::path(
    get,
    path = "/popular-payment-method",
    responses(
        (status = 200, description = "At most one row: {_id, totalUsers}"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn popular_payment_method<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::popular_payment_method()).await
}

/// The customer with the highest total spend.
#[utoipa::path(
    get,
    path = "/top-customers",
    responses(
        (status = 200, description = "At most one row: {_id, totalAmount}"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn top_customers<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::top_customers()).await
}

/// Order count per calendar day.
#[utoipa::path(
    get,
    path = "/orders-per-day",
    responses(
        (status = 200, description = "One row per day: {_id, count}"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn orders_per_day<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::orders_per_day()).await
}

/// Raw sale records with the given payment method.
///
/// The path segment is used verbatim as the equality value: matching is
/// case-sensitive and an unknown method yields an empty array, not an error.
#[utoipa::path(
    get,
    path = "/filter-by-payment/{method}",
    params(
        ("method" = String, Path, description = "Payment method, matched exactly")
    ),
    responses(
        (status = 200, description = "Matching sale records, unfiltered fields"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn filter_by_payment<S: SalesStore>(
    State(state): State<AppState<S>>,
    Path(method): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::filter_by_payment(&method)).await
}

/// Sales flattened with their customer details.
///
/// Inner join: sales whose customer id has no customer record are dropped.
#[utoipa::path(
    get,
    path = "/sales-with-customers",
    responses(
        (status = 200, description = "Flattened order + customer rows"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn sales_with_customers<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::sales_with_customers()).await
}

/// All categories ranked by revenue, highest first.
#[utoipa::path(
    get,
    path = "/top-category",
    responses(
        (status = 200, description = "All categories, sorted descending by totalSales"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn top_category<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::top_category()).await
}

/// Revenue per month, ascending by month key.
#[utoipa::path(
    get,
    path = "/monthly-sales",
    responses(
        (status = 200, description = "One row per month: {month, totalRevenue}"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn monthly_sales<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::monthly_sales()).await
}

/// Customers with more than one order.
#[utoipa::path(
    get,
    path = "/repeat-customers",
    responses(
        (status = 200, description = "One row per repeat customer: {customer, totalOrders}"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn repeat_customers<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::repeat_customers()).await
}

/// Per-order summary with customer location and a derived 10% tax.
#[utoipa::path(
    get,
    path = "/order-summary",
    responses(
        (status = 200, description = "One row per joined order: {customer, location, totalAmount, tax, status}"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn order_summary<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::order_summary()).await
}

/// Average order value per category.
#[utoipa::path(
    get,
    path = "/avg-order-value",
    responses(
        (status = 200, description = "One row per category: {category, totalSales, totalOrders, avgOrderValue}"),
        (status = 500, description = "Query failed"),
        (status = 503, description = "Data store unavailable"),
    ),
    tag = "reports"
)]
pub async fn avg_order_value<S: SalesStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    run(&state, catalog::avg_order_value()).await
}
