use crate::domain::snippet::Snippet;
use crate::transport::http::handlers::{health, snippets, taxonomy};
use crate::transport::http::types::{ApiResponse, AppState, HealthStatus};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        snippets::list_snippets_handler,
        snippets::get_snippet_handler,
        taxonomy::list_categories_handler,
        taxonomy::list_languages_handler
    ),
    components(schemas(ApiResponse, HealthStatus, Snippet))
)]
pub struct ApiDoc;

/// Read-only routes. `GET` routes answer `HEAD` as well.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/snippets", get(snippets::list_snippets_handler))
        .route("/api/snippets/:id", get(snippets::get_snippet_handler))
        .route("/api/categories", get(taxonomy::list_categories_handler))
        .route("/api/languages", get(taxonomy::list_languages_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
