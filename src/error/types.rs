//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::services::{TranslateError, TranslationMergeError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// Request body does not match the song schema
    #[error("{message}")]
    SchemaViolation {
        message: String,
        schema: serde_json::Value,
    },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Translation(#[from] TranslateError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TranslationMergeError> for ApiError {
    fn from(err: TranslationMergeError) -> Self {
        match err {
            TranslationMergeError::NotFound(_) => ApiError::NotFound("song not found".to_string()),
            TranslationMergeError::Store(e) => ApiError::Store(e),
            TranslationMergeError::Translate(e) => ApiError::Translation(e),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::SchemaViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Translation(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) | ApiError::SchemaViolation { .. } => "invalid_request_error",
            ApiError::NotFound(_) => "not_found_error",
            ApiError::Store(_) => "store_error",
            ApiError::Translation(_) => "translation_error",
            ApiError::Internal(_) => "api_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are returned verbatim
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let error_type = self.error_type();
        let message = self.to_string();
        let schema = match self {
            ApiError::SchemaViolation { schema, .. } => Some(schema),
            _ => None,
        };

        let body = Json(ErrorResponse {
            type_: "error".to_string(),
            error: ErrorDetail {
                type_: error_type.to_string(),
                message,
            },
            schema,
        });

        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub type_: String,
    pub error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub type_: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Store(StoreError::DynamoDb("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(TranslationMergeError::NotFound(3)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(TranslationMergeError::Translate(TranslateError::Service("x".into())))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_error_body_carries_raw_message() {
        let response = ApiError::Store(StoreError::DynamoDb("ResourceNotFoundException".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["type"], "error");
        assert_eq!(body["error"]["type"], "store_error");
        assert_eq!(body["error"]["message"], "DynamoDB error: ResourceNotFoundException");
        assert!(body.get("schema").is_none());
    }

    #[tokio::test]
    async fn test_schema_violation_includes_schema() {
        let response = ApiError::SchemaViolation {
            message: "Incorrect type. Must match Song schema".into(),
            schema: serde_json::json!({"type": "object"}),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["schema"]["type"], "object");
    }
}
