use crate::domain::error::SnippetError;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{ApiResponse, AppState, ListSnippetsParams};
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/api/snippets",
    params(ListSnippetsParams),
    responses(
        (status = 200, description = "Matching snippets, newest first (possibly empty)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_snippets_handler(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    const CONTEXT: &str = "Failed to fetch snippets";

    // An undecodable query string filters nothing.
    let pairs = match pairs {
        Ok(Query(pairs)) => pairs,
        Err(e) => {
            debug!("Ignoring query string: {}", e);
            Vec::new()
        }
    };
    let criteria = ListSnippetsParams::from_pairs(pairs).into_criteria();

    let snippets = match state.repository.list_snippets(&criteria).await {
        Ok(snippets) => snippets,
        Err(e) => return ApiError::new(CONTEXT, e).into_response(),
    };

    match ApiResponse::success(&snippets) {
        Ok(body) => Json(body).into_response(),
        Err(e) => ApiError::unexpected(CONTEXT, e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/snippets/{id}",
    params(
        ("id" = String, Path, description = "Snippet id (UUID for stored snippets)")
    ),
    responses(
        (status = 200, description = "The snippet", body = ApiResponse),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "No snippet with this id", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_snippet_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    const CONTEXT: &str = "Failed to fetch snippet";

    let Path(id) = id.map_err(|e| {
        ApiError::new(CONTEXT, SnippetError::MalformedIdentifier(e.body_text()))
    })?;

    let snippet = state
        .repository
        .get_snippet_by_id(&id)
        .await
        .map_err(|e| ApiError::new(CONTEXT, e))?;

    let body = ApiResponse::success(&snippet).map_err(|e| ApiError::unexpected(CONTEXT, e))?;
    Ok(Json(body))
}
