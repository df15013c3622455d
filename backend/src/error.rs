//! Error handling for the Warehouse Inventory Management Platform
//!
//! Provides consistent JSON error responses across the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Missing required fields")]
    MissingFields,

    #[error("Branch is required for this transaction type")]
    BranchRequired,

    #[error("Item tracking ID is required for transfer transactions")]
    TrackingIdRequired,

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Serial number {serial} already exists on item {item_name}")]
    DuplicateSerial { serial: String, item_name: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business rule violations
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Original transfer not found")]
    OriginalTransferNotFound,

    // External service errors
    #[error("Invoice extraction error: {0}")]
    ExtractionError(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid email or password".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message: "Invalid token".to_string(),
                    field: None,
                },
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "INSUFFICIENT_PERMISSIONS".to_string(),
                    message: "You do not have permission to perform this action".to_string(),
                    field: None,
                },
            ),
            AppError::MissingFields => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "MISSING_FIELDS".to_string(),
                    message: "Missing required fields".to_string(),
                    field: None,
                },
            ),
            AppError::BranchRequired => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "BRANCH_REQUIRED".to_string(),
                    message: "Branch is required for out, return and transfer transactions"
                        .to_string(),
                    field: Some("branch".to_string()),
                },
            ),
            AppError::TrackingIdRequired => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "TRACKING_ID_REQUIRED".to_string(),
                    message: "Item tracking ID is required for transfer transactions".to_string(),
                    field: Some("item_tracking_id".to_string()),
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateSerial { serial, item_name } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_SERIAL".to_string(),
                    message: format!(
                        "Serial number {} already exists on item {}",
                        serial, item_name
                    ),
                    field: Some("serial_number".to_string()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::InsufficientStock(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::OriginalTransferNotFound => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "ORIGINAL_TRANSFER_NOT_FOUND".to_string(),
                    message: "Original transfer not found for this return".to_string(),
                    field: None,
                },
            ),
            AppError::ExtractionError(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTRACTION_ERROR".to_string(),
                    message: format!("Invoice extraction error: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
