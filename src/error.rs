use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Access denied")]
    AccessDenied,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Validation failed")]
    ValidationFields(HashMap<String, String>),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let err_code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if err_code == "2067" || err_code == "23505" {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({
                                "success": false,
                                "error": "Resource already exists (duplicate entry)",
                                "error_code": "CONFLICT",
                            })),
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR", "Internal server error".to_string())
            }
            AppError::NotFound(resource) => (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{} not found", resource)),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized".to_string()),
            AppError::AccessDenied => (StatusCode::FORBIDDEN, "ACCESS_DENIED", "Access denied".to_string()),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, "CONFLICT", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ValidationFields(fields) => {
                let body = Json(json!({
                    "success": false,
                    "error": "Validation failed",
                    "error_code": "VALIDATION_ERROR",
                    "field_errors": fields,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Internal => {
                error!("Unhandled internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "error_code": code,
        }));

        (status, body).into_response()
    }
}
