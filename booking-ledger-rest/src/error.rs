use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use booking_ledger::{types::ArgumentError, BookingLedgerError};
use booking_ledger_client::LedgerClientError;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RestApiError {
    // Request errors
    #[error("Invalid request format")]
    InvalidRequestFormat,
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    // Ledger errors
    #[error("Error {action}: failed to submit transaction: {error}")]
    Submit {
        action: &'static str,
        error: LedgerClientError,
    },
    #[error("Error {action}: failed to evaluate transaction: {error}")]
    Evaluate {
        action: &'static str,
        error: LedgerClientError,
    },
    #[error("Error connecting to the ledger: {0}")]
    Unreachable(LedgerClientError),

    // Wrapped errors
    #[error(transparent)]
    BookingLedger(#[from] BookingLedgerError),
    #[error("Could not access {1}: {0}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    Hyper(#[from] hyper::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    LedgerClient(#[from] LedgerClientError),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let status = match self {
            RestApiError::InvalidRequestFormat | RestApiError::Argument(_) => {
                StatusCode::BAD_REQUEST
            }
            RestApiError::Submit { .. }
            | RestApiError::Evaluate { .. }
            | RestApiError::Unreachable(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // Errors that the client should not see
            RestApiError::BookingLedger(_)
            | RestApiError::FileIo(..)
            | RestApiError::Hyper(_)
            | RestApiError::Io(_)
            | RestApiError::LedgerClient(_)
            | RestApiError::Toml(_) => {
                error!("{}", self);
                let body = json!({ "error": "Internal server error" });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
