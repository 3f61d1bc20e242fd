//! Router configuration and route composition.

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Json, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use tally_core::SalesStore;

use crate::config::ServerConfig;
use crate::handlers::{health, reports};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// Every report route is a GET with no request body; the paths mirror the
/// report catalog one to one.
pub fn create_router<S: SalesStore + 'static>(state: AppState<S>, config: &ServerConfig) -> Router {
    let report_routes = Router::new()
        .route("/", get(health::liveness))
        .route(
            "/total-sales-per-category",
            get(reports::total_sales_per_category::<S>),
        )
        .route(
            "/popular-payment-method",
            get(reports::popular_payment_method::<S>),
        )
        .route("/top-customers", get(reports::top_customers::<S>))
        .route("/orders-per-day", get(reports::orders_per_day::<S>))
        .route(
            "/filter-by-payment/:method",
            get(reports::filter_by_payment::<S>),
        )
        .route(
            "/sales-with-customers",
            get(reports::sales_with_customers::<S>),
        )
        .route("/top-category", get(reports::top_category::<S>))
        .route("/monthly-sales", get(reports::monthly_sales::<S>))
        .route("/repeat-customers", get(reports::repeat_customers::<S>))
        .route("/order-summary", get(reports::order_summary::<S>))
        .route("/avg-order-value", get(reports::avg_order_value::<S>));

    let cors_layer = build_cors_layer(&config.cors_origins);

    Router::new()
        .merge(report_routes)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        // Middleware layers (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configuration.
///
/// If `origins` is "*", allows any origin (for development).
/// Otherwise, parses comma-separated origins.
fn build_cors_layer(origins: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600));

    if origins == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(allowed)
    }
}
