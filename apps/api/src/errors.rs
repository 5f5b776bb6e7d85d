use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::extraction::ExtractError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Pipeline errors are converted here — handlers never leak raw parser or
/// transport errors to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document unreadable: {0}")]
    DocumentUnreadable(#[from] ExtractError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::DocumentUnreadable(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNREADABLE_DOCUMENT",
                // User-recoverable: a different file may parse fine.
                format!("Could not read the uploaded document as a PDF: {e}"),
            ),
            AppError::Analysis(AnalysisError::EmptyInput) => (
                StatusCode::BAD_REQUEST,
                "EMPTY_INPUT",
                "No text to analyze. The document may contain only images.".to_string(),
            ),
            AppError::Analysis(e @ AnalysisError::Timeout { .. }) => {
                tracing::error!("Analysis timeout: {e}");
                (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT", e.to_string())
            }
            AppError::Analysis(e @ AnalysisError::Malformed(_)) => {
                tracing::error!("Malformed inference response: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_UPSTREAM_RESPONSE",
                    "The analysis service returned an unexpected response format".to_string(),
                )
            }
            AppError::Analysis(e) => {
                tracing::error!("Analysis error: {e}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_maps_to_bad_request() {
        let response = AppError::Analysis(AnalysisError::EmptyInput).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unreadable_document_maps_to_unprocessable_entity() {
        let err = AppError::DocumentUnreadable(ExtractError::Unreadable("bad xref".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = AppError::Analysis(AnalysisError::Timeout { attempts: 3 });
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_malformed_response_maps_to_bad_gateway() {
        let err = AppError::Analysis(AnalysisError::Malformed("nope".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
