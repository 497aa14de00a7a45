use crate::app::repository::StoreStatus;
use crate::transport::http::types::{ApiResponse, AppState, HealthStatus};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; `store` tells whether reads hit the database or fixtures", body = ApiResponse),
        (status = 503, description = "Store unreachable and fixture fallback disabled", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.repository.store_status().await;
    let fallback = state.repository.fixture_fallback();

    let (code, source) = match (store, fallback) {
        (StoreStatus::Connected, _) => (StatusCode::OK, "store"),
        (StoreStatus::Unavailable, true) => (StatusCode::OK, "fixtures"),
        (StoreStatus::Unavailable, false) => (StatusCode::SERVICE_UNAVAILABLE, "none"),
    };

    let health = HealthStatus {
        status: if code.is_success() { "ok" } else { "unhealthy" }.to_string(),
        store: store.as_str().to_string(),
        source: source.to_string(),
    };

    let body = match ApiResponse::success(&health) {
        Ok(mut body) => {
            body.success = code.is_success();
            if !body.success {
                body.error = Some("Snippet store unreachable".to_string());
            }
            body
        }
        Err(e) => ApiResponse::failure(format!("Failed to encode health status: {}", e)),
    };

    (code, Json(body))
}
