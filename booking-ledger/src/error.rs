use std::path::PathBuf;
use thiserror::Error;
use tonic::Status;

use crate::{crypto::CryptoError, types::booking::ArgumentError};

#[derive(Debug, Error)]
pub enum BookingLedgerError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    // PEM errors
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid certificate")]
    InvalidCertificate,
    #[error("No certificate found in {0}")]
    MissingCertificate(PathBuf),
    #[error("No private key found in key store {0}")]
    EmptyKeyStore(PathBuf),

    // Protocol errors
    #[error("Message is missing required field: {0}")]
    MissingField(&'static str),

    // Logging errors
    #[error("Invalid log file path: {0}")]
    InvalidLogFilePath(PathBuf),

    // Wrapped errors
    #[error("Could not access {1}: {0}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    InvalidUri(#[from] http::uri::InvalidUri),
    #[error(transparent)]
    ProstDecode(#[from] prost::DecodeError),
    #[error(transparent)]
    Rustls(#[from] rustls::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    TonicStatus(#[from] tonic::Status),
    #[error(transparent)]
    WebPki(#[from] tokio_rustls::webpki::Error),
}

impl From<BookingLedgerError> for Status {
    fn from(error: BookingLedgerError) -> Self {
        match error {
            // Errors that are safe to return to the client
            BookingLedgerError::Argument(_)
            | BookingLedgerError::MissingField(_)
            | BookingLedgerError::ProstDecode(_) => Status::invalid_argument(error.to_string()),
            BookingLedgerError::Crypto(_) => Status::permission_denied(error.to_string()),
            BookingLedgerError::TonicStatus(status) => status,

            // Errors that the client should not see
            BookingLedgerError::InvalidPrivateKey
            | BookingLedgerError::InvalidCertificate
            | BookingLedgerError::MissingCertificate(_)
            | BookingLedgerError::EmptyKeyStore(_)
            | BookingLedgerError::InvalidLogFilePath(_)
            | BookingLedgerError::FileIo(..)
            | BookingLedgerError::Io(_)
            | BookingLedgerError::InvalidUri(_)
            | BookingLedgerError::Rustls(_)
            | BookingLedgerError::SerdeJson(_)
            | BookingLedgerError::Toml(_)
            | BookingLedgerError::WebPki(_) => Status::internal("Internal server error"),
        }
    }
}
