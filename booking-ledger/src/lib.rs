//! Shared types, cryptography and protocol definitions used by the peer, the
//! gateway client, and the REST facade of the booking ledger.
//!
//! ⚠️ __Usage__: This crate is designed as a dependency for other crates in
//! the workspace, including `booking-ledger-peer` and `booking-ledger-client`.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod infrastructure;
pub mod types;

pub use error::BookingLedgerError;

#[allow(clippy::all)]
pub mod rpc {
    tonic::include_proto!("booking_ledger_rpc");
}
