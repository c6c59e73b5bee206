//! # API Error Types
//!
//! Unified error handling for the HTTP layer. Every failure is rendered as
//! `{"error": {"message", "code"}}` with a matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dash_analytics::AnalyticsError;
use thiserror::Error;

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Dashboard not loaded: {dashboard}")]
    DashboardUnavailable { dashboard: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::DashboardUnavailable { .. } => StatusCode::NOT_FOUND,
            Self::InvalidInput(_)
            | Self::Analytics(AnalyticsError::InvalidParameter(_) | AnalyticsError::UnknownColumn { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Analytics(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DashboardUnavailable { .. } => "NOT_FOUND",
            Self::InvalidInput(_) | Self::Analytics(AnalyticsError::InvalidParameter(_)) => "INVALID_INPUT",
            Self::Analytics(AnalyticsError::UnknownColumn { .. }) => "UNKNOWN_COLUMN",
            Self::Analytics(_) => "ANALYTICS_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "code": self.error_code(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(AnalyticsError::InvalidParameter("year 1999".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = ApiError::from(AnalyticsError::Query("boom".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::DashboardUnavailable { dashboard: "airline" };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Dashboard not loaded: airline");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::InvalidInput("bad year".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert_eq!(body["error"]["message"], "Invalid input: bad year");
    }
}
