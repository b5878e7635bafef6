// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse};

use crate::database::StoreError;

/// Request failures, each rendered as a status code and a plain-text body
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    InvalidJson,

    // 405 Method Not Allowed
    MethodNotAllowed,

    // 500 Internal Server Error
    SchemaInitialization(String),
    Persistence(String),
    Retrieval(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::SchemaInitialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Retrieval(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Response body text
    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidJson => "Invalid JSON body".to_string(),
            ApiError::MethodNotAllowed => "Method not allowed".to_string(),
            ApiError::SchemaInitialization(msg) => format!("Error creating table: {}", msg),
            ApiError::Persistence(msg) => format!("Error inserting data: {}", msg),
            ApiError::Retrieval(msg) => format!("Error retrieving data: {}", msg),
        }
    }
}

// Store failures are attributed to the step that hit them
impl ApiError {
    pub fn schema_initialization(err: StoreError) -> Self {
        tracing::error!("Table creation failed: {}", err);
        ApiError::SchemaInitialization(err.to_string())
    }

    pub fn persistence(err: StoreError) -> Self {
        tracing::error!("Insert failed: {}", err);
        ApiError::Persistence(err.to_string())
    }

    pub fn retrieval(err: StoreError) -> Self {
        tracing::error!("Select failed: {}", err);
        ApiError::Retrieval(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), self.message()).into_response()
    }
}
