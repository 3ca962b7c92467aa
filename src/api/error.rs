use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::catalog::CatalogError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("invalid request parameters: {0}")]
    InvalidParams(String),
    #[error("payload too large: limit is {0} bytes")]
    PayloadTooLarge(usize),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Only a missing resource is reported as such; every other failure,
    /// bad input included, is a generic 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients. Never carries internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "Not Found",
            _ => "Internal Error Occurred",
        }
    }
}

/// Internal failure detail carried on an error response.
///
/// Only the error middleware reads it; it never reaches the client.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.public_message(),
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorReport {
            status,
            detail: self.to_string(),
        });
        response
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidBody(value.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        ApiError::InvalidParams(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        ApiError::InvalidParams(value.body_text())
    }
}
