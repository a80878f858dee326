use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-pipeline failures, split by who caused them.
///
/// Variants are translated to a transport status only at the boundary
/// (`IntoResponse`); the pipeline itself passes them around as values. The
/// JSON endpoint never lets them reach the transport at all and reports
/// `{success: false, error}` instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid file type: {0}; use JPEG or PNG")]
    InvalidContentType(String),
    #[error("confidence must be a number between 0.0 and 1.0, got {0}")]
    InvalidConfidence(String),
    #[error("failed to decode image: {0}")]
    ImageDecode(String),
    #[error("bad upload: {0}")]
    BadUpload(String),
    #[error("detection model is not ready")]
    ModelNotReady,
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("failed to render annotated image: {0}")]
    Render(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidContentType(_)
            | ServiceError::InvalidConfidence(_)
            | ServiceError::ImageDecode(_)
            | ServiceError::BadUpload(_) => StatusCode::BAD_REQUEST,
            ServiceError::ModelNotReady => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Inference(_) | ServiceError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::debug!(error = %self, "request rejected");
        } else {
            tracing::warn!(error = %self, "request failed");
        }
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(
            ServiceError::InvalidContentType("image/gif".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ImageDecode("truncated".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert!(ServiceError::InvalidConfidence("1.5".into()).is_client_error());
    }

    #[test]
    fn server_errors_map_to_5xx() {
        assert_eq!(
            ServiceError::Inference("shape mismatch".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::ModelNotReady.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert!(!ServiceError::Render("png".into()).is_client_error());
    }
}
