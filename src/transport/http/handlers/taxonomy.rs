//! Distinct category and language listings.

use crate::transport::http::error::ApiError;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Distinct categories, sorted ascending", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse>, ApiError> {
    const CONTEXT: &str = "Failed to fetch categories";

    let categories = state
        .repository
        .list_distinct_categories()
        .await
        .map_err(|e| ApiError::new(CONTEXT, e))?;
    let body = ApiResponse::success(&categories).map_err(|e| ApiError::unexpected(CONTEXT, e))?;
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/languages",
    responses(
        (status = 200, description = "Distinct languages, sorted ascending", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_languages_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse>, ApiError> {
    const CONTEXT: &str = "Failed to fetch languages";

    let languages = state
        .repository
        .list_distinct_languages()
        .await
        .map_err(|e| ApiError::new(CONTEXT, e))?;
    let body = ApiResponse::success(&languages).map_err(|e| ApiError::unexpected(CONTEXT, e))?;
    Ok(Json(body))
}
