//! Harness for the end-to-end tests of the booking ledger. A [`TestPeer`]
//! serves the gateway service in process on an ephemeral port, and hands out
//! clients for the organisations under `dev/test-certs`.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod harness;
pub mod utils;

pub use fixtures::{Org, PeerOptions};
pub use harness::TestPeer;
