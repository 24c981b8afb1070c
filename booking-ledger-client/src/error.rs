use booking_ledger::{rpc::TxValidationCode, BookingLedgerError};
use std::path::PathBuf;
use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, LedgerClientError>;

#[derive(Debug, Error)]
pub enum LedgerClientError {
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
    #[error("This peer requires TLS client authentication.")]
    ClientAuthMissing,
    #[error("Private key was not provided.")]
    PrivateKeyMissing,

    /// The contract rejected the transaction. Carries the contract's message.
    #[error("{0}")]
    Contract(String),
    #[error("Transaction {tx_id} failed to commit with status code {code:?}")]
    TransactionInvalid {
        tx_id: String,
        code: TxValidationCode,
    },
    #[error("{0} request timed out")]
    Timeout(&'static str),

    // Wrapped errors
    #[error(transparent)]
    BookingLedger(BookingLedgerError),
    #[error("Could not access {1}: {0}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    InvalidUri(#[from] http::uri::InvalidUri),
    #[error(transparent)]
    Rustls(#[from] rustls::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    TonicStatus(Status),
    #[error(transparent)]
    WebPki(#[from] tokio_rustls::webpki::Error),
}

// Convert `tonic::Status` errors to a more useful error type
impl From<Status> for LedgerClientError {
    fn from(status: Status) -> Self {
        match (status.code(), status.message()) {
            (Code::Aborted, message) => Self::Contract(message.to_string()),
            (Code::Unknown, "connection error: received fatal alert: CertificateRequired") => {
                Self::ClientAuthMissing
            }
            _ => Self::TonicStatus(status),
        }
    }
}

// Ensure that wrapped `tonic::Status` errors are properly converted
impl From<BookingLedgerError> for LedgerClientError {
    fn from(error: BookingLedgerError) -> Self {
        match error {
            BookingLedgerError::TonicStatus(status) => status.into(),
            _ => Self::BookingLedger(error),
        }
    }
}
