//! Liveness endpoint.

/// Plain-text liveness probe.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is alive", body = String),
    ),
    tag = "system"
)]
pub async fn liveness() -> &'static str {
    "hello, world"
}
