//! This crate is an implementation of a ledger peer hosting the booking
//! contract. It authenticates signed proposals against the configured
//! organisations, simulates and endorses transactions, and commits them to an
//! append-only block log over a pluggable world state.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod chaincode;
pub mod config;
pub mod error;
pub mod operations;
pub mod server;

pub use config::Config;
pub use error::LedgerPeerError;
