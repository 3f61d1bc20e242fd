//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::handlers::{health, reports};

/// OpenAPI documentation for the Tally API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tally API",
        version = "1.0.0",
        description = "Read-only analytics reports over the sales dataset.

Each endpoint runs one fixed aggregation (grouping, joining, filtering) and
returns the raw result rows as a JSON array. There is no write path and no
authentication.
",
    ),
    paths(
        health::liveness,
        reports::total_sales_per_category,
        reports::popular_payment_method,
        reports::top_customers,
        reports::orders_per_day,
        reports::filter_by_payment,
        reports::sales_with_customers,
        reports::top_category,
        reports::monthly_sales,
        reports::repeat_customers,
        reports::order_summary,
        reports::avg_order_value,
    ),
    tags(
        (name = "reports", description = "Fixed aggregation reports over the sales data"),
        (name = "system", description = "Liveness"),
    )
)]
pub struct ApiDoc;
