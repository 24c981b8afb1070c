//! Public API of the gateway client: channel and contract handles.
//!
//! ```text
//! let gateway = Gateway::connect(config)?;
//! let contract = gateway.network("mychannel").contract("basic");
//! let booking = contract.evaluate_transaction("ReadAsset", &["asset1".into()]).await?;
//! ```

mod evaluate;
mod submit;

pub use submit::{Commit, CommitStatus, Transaction};

use crate::Gateway;
use booking_ledger::rpc::{Proposal, SignedProposal};

/// A channel served by the peer.
#[derive(Clone, Debug)]
pub struct Network {
    gateway: Gateway,
    channel: String,
}

impl Network {
    pub(crate) fn new(gateway: Gateway, channel: String) -> Self {
        Self { gateway, channel }
    }

    pub fn name(&self) -> &str {
        &self.channel
    }

    /// A handle to a chaincode installed on this channel.
    pub fn contract(&self, chaincode: impl Into<String>) -> Contract {
        Contract {
            gateway: self.gateway.clone(),
            channel: self.channel.clone(),
            chaincode: chaincode.into(),
        }
    }
}

/// A chaincode on a channel. Transactions are evaluated or submitted against
/// it with positional string arguments.
#[derive(Clone, Debug)]
pub struct Contract {
    gateway: Gateway,
    channel: String,
    chaincode: String,
}

impl Contract {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn chaincode(&self) -> &str {
        &self.chaincode
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Build a proposal with a fresh nonce and sign it as the gateway
    /// identity.
    pub(crate) async fn signed_proposal(
        &self,
        transaction_name: &str,
        args: &[String],
    ) -> (String, SignedProposal) {
        let proposal = {
            let mut rng = self.gateway.rng.lock().await;
            Proposal::create(
                &mut *rng,
                self.gateway.identity(),
                &self.channel,
                &self.chaincode,
                transaction_name,
                args,
            )
        };
        let signed = proposal.sign(self.gateway.signer());
        (proposal.tx_id, signed)
    }
}
