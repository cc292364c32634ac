//! Error types for iuranweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use iuranweb_core::{CoreError, ErrorCode, ErrorDetails};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(err) => match err.code() {
                ErrorCode::ResidentNotFound => StatusCode::NOT_FOUND,
                ErrorCode::ValidationError | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client: the core error's details, when there are any
    fn details(&self) -> Option<ErrorDetails> {
        match self {
            ApiError::Core(err) => Some(err.to_details()),
            ApiError::Internal { .. } => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        let body = match self.details() {
            Some(details) => serde_json::json!({
                "error": self.to_string(),
                "code": details.code,
                "details": details.details,
                "suggestions": details.suggestions,
            }),
            None => serde_json::json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_core_error_status() {
        let err: ApiError = CoreError::ResidentNotFound { id: 9 }.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains('9'));

        let err: ApiError = CoreError::ValidationError { message: "bad".to_string() }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = CoreError::DuplicateEntry { entry: "resident id 1".to_string() }.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_not_found_body_carries_details() {
        let response = ApiError::from(CoreError::ResidentNotFound { id: 42 }).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Resident not found: 42");
        assert_eq!(body["code"], "RESIDENT_NOT_FOUND");
        assert!(body["suggestions"][0].as_str().unwrap().contains("/api/residents"));
    }

    #[tokio::test]
    async fn test_internal_body() {
        let response = ApiError::Internal { message: "boom".to_string() }.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error: boom");
        assert!(body.get("code").is_none());
    }
}
