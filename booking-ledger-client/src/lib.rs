//! This crate is an implementation of a gateway client to a booking ledger
//! peer. It signs proposals with an X.509 identity and drives the evaluate
//! and endorse/submit/commit flows.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;

pub use api::{Commit, CommitStatus, Contract, Network, Transaction};
pub use client::Gateway;
pub use config::Config;
pub use error::{LedgerClientError, Result};
