use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;

/// Application error taxonomy. Every pipeline failure aborts the enclosing
/// transaction; the variants here are what surfaces to the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient inventory: {0}")]
    InsufficientInventory(String),

    #[error("Promo code usage limit exceeded")]
    UsageLimitExceeded,

    #[error("A promo code is already applied to this order")]
    PromoAlreadyApplied,

    #[error("Promo code is not applicable to any items in the order")]
    PromoNotApplicable,

    #[error("Promo code has expired")]
    PromoExpired,

    #[error("Promo code is not valid yet")]
    PromoNotYetValid,

    #[error("Cannot cancel order with checked-in tickets")]
    HasCheckedInTickets,

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0} already exists")]
    Duplicate(String),

    /// The storage engine aborted the transaction to preserve serializable
    /// ordering. Retryable, not a business failure.
    #[error("Transaction conflict, retry the request")]
    SerializationConflict,

    #[error("Database error")]
    Database(sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidState(_)
            | AppError::InsufficientInventory(_)
            | AppError::UsageLimitExceeded
            | AppError::PromoAlreadyApplied
            | AppError::PromoNotApplicable
            | AppError::PromoExpired
            | AppError::PromoNotYetValid
            | AppError::HasCheckedInTickets => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::SerializationConflict => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::InsufficientInventory(_) => "INSUFFICIENT_INVENTORY",
            AppError::UsageLimitExceeded => "PROMO_USAGE_LIMIT_EXCEEDED",
            AppError::PromoAlreadyApplied => "PROMO_ALREADY_APPLIED",
            AppError::PromoNotApplicable => "PROMO_NOT_APPLICABLE",
            AppError::PromoExpired => "PROMO_EXPIRED",
            AppError::PromoNotYetValid => "PROMO_NOT_YET_VALID",
            AppError::HasCheckedInTickets => "HAS_CHECKED_IN_TICKETS",
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Duplicate(_) => "DUPLICATE_RESOURCE",
            AppError::SerializationConflict => "SERIALIZATION_CONFLICT",
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::Database(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::SerializationConflict => {
                warn!("Serializable transaction aborted, caller should retry");
            }
            other => {
                warn!(code = other.code(), message = %other, "Request rejected");
            }
        }
    }
}

/// Serialization failures (SQLSTATE 40001) are mapped to a retryable
/// conflict instead of an internal error.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.code().as_deref() == Some("40001") {
                return AppError::SerializationConflict;
            }
        }
        AppError::Database(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Do not expose internal details in the API response
        let public_message = match &self {
            AppError::Database(_) => "A database error occurred".to_string(),
            other => other.to_string(),
        };

        error_response(code, public_message, None, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_map_to_bad_request() {
        for err in [
            AppError::Validation("quantity must be positive".into()),
            AppError::InvalidState("order is not pending".into()),
            AppError::InsufficientInventory("VIP".into()),
            AppError::UsageLimitExceeded,
            AppError::PromoAlreadyApplied,
            AppError::PromoNotApplicable,
            AppError::PromoExpired,
            AppError::PromoNotYetValid,
            AppError::HasCheckedInTickets,
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", err.code());
        }
    }

    #[test]
    fn serialization_conflict_is_retryable_conflict() {
        let err = AppError::SerializationConflict;
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "SERIALIZATION_CONFLICT");
    }

    #[test]
    fn row_not_found_is_an_internal_error_not_a_404() {
        // Missing rows are signalled explicitly by repositories via Option;
        // a stray RowNotFound is a bug, not a client error.
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
