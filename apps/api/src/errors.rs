use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures signalled by render collaborators. The engine never catches these;
/// they travel unchanged from the collaborator to the caller of `compose`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Malformed date range '{input}': {reason}")]
    MalformedDateRange { input: String, reason: String },

    #[error("Custom section '{section_id}' failed to render: {reason}")]
    CustomSection { section_id: String, reason: String },
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Render(e) => {
                tracing::warn!("Render error: {e}");
                (StatusCode::UNPROCESSABLE_ENTITY, "RENDER_ERROR", e.to_string())
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
    fn test_render_error_maps_to_422() {
        let err = AppError::from(RenderError::MalformedDateRange {
            input: "2020 - 2021 - 2022".to_string(),
            reason: "too many parts".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_custom_section_error_maps_to_422() {
        let err = AppError::from(RenderError::CustomSection {
            section_id: "talks".to_string(),
            reason: "unsupported layout".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = AppError::Validation("label cannot be empty".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_hides_details() {
        let err = AppError::from(anyhow::anyhow!("socket closed"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
