//! This crate is an in-memory implementation of the world state for a ledger
//! peer. State does not survive a restart of the peer.
#![warn(unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod api;

pub use api::MemoryStateStore;
