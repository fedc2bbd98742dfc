use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::users::repo::StoreError;

pub const TERMS_NOT_ACCEPTED: &str = "You must accept the terms and conditions.";
pub const WEAK_PASSWORD: &str =
    "Password must be at least 8 characters long and contain an uppercase letter and a number.";
pub const EMAIL_TAKEN: &str = "Email is already registered.";
pub const MISSING_FIELD: &str = "Both email and password are required.";
pub const NO_FIELDS: &str = "At least one of email or password must be provided.";
pub const INVALID_BODY: &str = "Request body must be a JSON object with the expected fields.";

/// Failure of an account operation. Every variant is terminal for the request.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Business rule violation: terms or password strength.
    #[error("{0}")]
    Policy(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    /// Required input missing.
    #[error("{0}")]
    Validation(&'static str),
    #[error("User not found.")]
    NotFound,
    /// Same error for unknown email and wrong password.
    #[error("Invalid email or password.")]
    Auth,
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AccountError {
    pub fn status(&self) -> StatusCode {
        match self {
            AccountError::Policy(_) | AccountError::Conflict(_) | AccountError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AccountError::NotFound => StatusCode::NOT_FOUND,
            AccountError::Auth => StatusCode::UNAUTHORIZED,
            AccountError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation => AccountError::Conflict(EMAIL_TAKEN),
            StoreError::Database(e) => AccountError::Internal(anyhow::Error::new(e).context("user store")),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AccountError::Internal(e) => {
                error!(error = ?e, "request failed");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}
