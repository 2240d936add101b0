//! Error-to-response mapping for the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ratehub_rates::RateError;
use serde::Serialize;
use utoipa::ToSchema;

/// Result alias for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON error body, `{"detail": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

/// Wrapper turning a [`RateError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub RateError);

impl From<RateError> for ApiError {
    fn from(err: RateError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RateError::ServiceUnavailable { .. } | RateError::Transport { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            RateError::InvalidRequest(_)
            | RateError::UnknownProvider(_)
            | RateError::InvalidDate(_)
            | RateError::RateUnavailable { .. }
            | RateError::UpstreamRejected { .. }
            | RateError::EmptyRequest => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            tracing::warn!("request failed: {}", self.0);
        }

        (
            status,
            Json(ErrorBody {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = ApiError(RateError::EmptyRequest).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError(RateError::ServiceUnavailable {
            message: "down".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
