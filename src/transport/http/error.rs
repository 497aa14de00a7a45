use crate::domain::error::SnippetError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

/// A repository error on its way out of a handler.
///
/// `context` is the generic message shown for failures the caller cannot act on;
/// the underlying detail only goes to the log.
#[derive(Debug)]
pub struct ApiError {
    context: &'static str,
    source: SnippetError,
}

impl ApiError {
    pub fn new(context: &'static str, source: SnippetError) -> Self {
        Self { context, source }
    }

    pub fn unexpected(context: &'static str, err: impl Into<anyhow::Error>) -> Self {
        Self::new(context, SnippetError::UnexpectedFailure(err.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self.source {
            SnippetError::MalformedIdentifier(_) => StatusCode::BAD_REQUEST,
            SnippetError::NotFound(_) => StatusCode::NOT_FOUND,
            SnippetError::StoreUnavailable(_) | SnippetError::UnexpectedFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> &'static str {
        match self.source {
            SnippetError::MalformedIdentifier(_) => "Invalid snippet ID",
            SnippetError::NotFound(_) => "Snippet not found",
            SnippetError::StoreUnavailable(_) | SnippetError::UnexpectedFailure(_) => self.context,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.source, "{}", self.context);
        }
        (status, Json(ApiResponse::failure(self.message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::StoreError;

    #[test]
    fn statuses_follow_the_error_kind() {
        let cases = [
            (SnippetError::MalformedIdentifier("x".into()), StatusCode::BAD_REQUEST),
            (SnippetError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                SnippetError::StoreUnavailable(StoreError::NotConfigured),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SnippetError::UnexpectedFailure(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::new("Failed to fetch snippet", err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn server_errors_hide_the_underlying_detail() {
        let err = ApiError::new(
            "Failed to fetch snippets",
            SnippetError::UnexpectedFailure(anyhow::anyhow!("password authentication failed")),
        );
        assert_eq!(err.message(), "Failed to fetch snippets");
    }
}
