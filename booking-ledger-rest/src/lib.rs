//! JSON-over-HTTP facade of the booking ledger. Requests are forwarded to a
//! ledger peer as evaluated or submitted transactions.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod ledger;
pub mod server;

pub use config::Config;
pub use error::RestApiError;
pub use ledger::Ledger;
