//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// SQLSTATE for unique_violation.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for check_violation.
const PG_CHECK_VIOLATION: &str = "23514";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Failures reported by a record store. Constraint violations are kept apart
/// from I/O failures so they can surface as the same kinds the pre-checks use.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("check constraint violated: {0}")]
    CheckViolation(String),
    #[error(transparent)]
    Backend(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            let constraint = db.constraint().unwrap_or_default().to_string();
            match db.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => return StoreError::UniqueViolation(constraint),
                Some(PG_CHECK_VIOLATION) => return StoreError::CheckViolation(constraint),
                _ => {}
            }
        }
        StoreError::Backend(e)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("no fields to update provided")]
    NoFields,
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("store failure: {0}")]
    Store(StoreError),
}

impl AppError {
    /// Machine-readable kind, used as the `code` of the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::NoFields => "no_fields",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::Store(_) => "store_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::NoFields => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn duplicate_title() -> Self {
        AppError::Conflict("item with this title already exists".into())
    }

    pub fn item_not_found() -> Self {
        AppError::NotFound("item not found".into())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            // The store's unique index on the title is the final arbiter when two
            // writers both pass the existence pre-check.
            StoreError::UniqueViolation(_) => AppError::duplicate_title(),
            StoreError::CheckViolation(c) => {
                AppError::Validation(format!("value out of range ({})", c))
            }
            other => AppError::Store(other),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::from(e).into()
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Store(e) = &self {
            tracing::error!(error = %e, "store failure");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
