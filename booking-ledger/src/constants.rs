//! Constants that are shared between other crates in this workspace.
//! Crate-specific constants should go in their respective crates.

pub const LOCAL_PEER_URI: &str = "https://localhost:7051";

/// Channel used when neither the config nor `CHANNEL_NAME` names one.
pub const DEFAULT_CHANNEL_NAME: &str = "mychannel";
/// Chaincode used when neither the config nor `CHAINCODE_NAME` names one.
pub const DEFAULT_CHAINCODE_NAME: &str = "basic";

pub mod env {
    pub const CHANNEL_NAME: &str = "CHANNEL_NAME";
    pub const CHAINCODE_NAME: &str = "CHAINCODE_NAME";
}

/// Length in bytes of the random nonce carried by every proposal.
pub const NONCE_LENGTH: usize = 24;
