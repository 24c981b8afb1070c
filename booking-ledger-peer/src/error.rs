use booking_ledger::{crypto::CryptoError, BookingLedgerError};
use std::path::PathBuf;
use thiserror::Error;
use tonic::Status;

use crate::{chaincode::ChaincodeError, server::state::StateStoreError};

#[derive(Debug, Error)]
pub enum LedgerPeerError {
    #[error("Private key was not provided.")]
    PrivateKeyMissing,
    #[error("No CA certificate found for {0}")]
    MissingCaCertificate(String),

    // Protocol errors
    #[error("Channel {0} is not served by this peer")]
    UnknownChannel(String),
    #[error("Chaincode {0} is not installed on channel {1}")]
    UnknownChaincode(String, String),
    #[error("Transaction {0} was already committed")]
    DuplicateTransaction(String),
    #[error("Transaction {0} was not committed in time")]
    CommitStatusTimeout(String),
    #[error("Prepared transaction is missing its endorsement")]
    MissingEndorsement,
    #[error("Endorsement by a member of {0} is not from this peer")]
    UntrustedEndorser(String),

    #[error(transparent)]
    Chaincode(#[from] ChaincodeError),
    #[error("World state error: {0}")]
    State(#[from] StateStoreError),

    // Wrapped errors
    #[error(transparent)]
    BookingLedger(#[from] BookingLedgerError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("Could not access {1}: {0}")]
    FileIo(std::io::Error, PathBuf),
    #[error(transparent)]
    Hyper(#[from] hyper::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Rustls(#[from] rustls::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    TonicStatus(#[from] tonic::Status),
    #[error(transparent)]
    WebPki(#[from] tokio_rustls::webpki::Error),
}

impl From<LedgerPeerError> for Status {
    fn from(error: LedgerPeerError) -> Status {
        match error {
            LedgerPeerError::Chaincode(ChaincodeError::State(_)) => {
                Status::internal("Internal server error")
            }
            // Errors that are safe to return to the client
            LedgerPeerError::Chaincode(_) => Status::aborted(error.to_string()),
            LedgerPeerError::UnknownChannel(_) | LedgerPeerError::UnknownChaincode(..) => {
                Status::not_found(error.to_string())
            }
            LedgerPeerError::DuplicateTransaction(_) => Status::already_exists(error.to_string()),
            LedgerPeerError::CommitStatusTimeout(_) => {
                Status::deadline_exceeded(error.to_string())
            }
            LedgerPeerError::MissingEndorsement => Status::invalid_argument(error.to_string()),
            LedgerPeerError::Crypto(_) | LedgerPeerError::UntrustedEndorser(_) => {
                Status::permission_denied(error.to_string())
            }
            LedgerPeerError::TonicStatus(status) => status,
            // These errors are sanitized in the `BookingLedgerError` module
            LedgerPeerError::BookingLedger(err) => err.into(),

            // Errors that the client should not see
            LedgerPeerError::PrivateKeyMissing
            | LedgerPeerError::MissingCaCertificate(_)
            | LedgerPeerError::State(_)
            | LedgerPeerError::FileIo(..)
            | LedgerPeerError::Hyper(_)
            | LedgerPeerError::Io(_)
            | LedgerPeerError::Rustls(_)
            | LedgerPeerError::Toml(_)
            | LedgerPeerError::WebPki(_) => Status::internal("Internal server error"),
        }
    }
}
