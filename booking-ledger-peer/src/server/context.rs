use booking_ledger::{
    crypto::{compute_transaction_id, CryptoError, X509Identity},
    infrastructure::logging,
    rpc::{
        Endorsement, PreparedTransaction, Proposal, ReadWriteSet, SerializedIdentity,
        SignedProposal,
    },
};
use prost::Message;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use crate::{
    chaincode::{Chaincode, TransactionContext},
    config::Config,
    server::{
        ledger::Ledger,
        msp::Msp,
        state::{Namespace, StateStore},
    },
    LedgerPeerError,
};

/// A channel served by this peer: its block log and installed chaincodes.
pub(crate) struct Channel<S: StateStore> {
    pub ledger: Arc<Ledger<S>>,
    pub chaincodes: HashMap<String, Arc<dyn Chaincode>>,
}

impl<S: StateStore> Channel<S> {
    pub(crate) fn chaincode(&self, name: &str) -> Result<Arc<dyn Chaincode>, LedgerPeerError> {
        self.chaincodes.get(name).cloned().ok_or_else(|| {
            LedgerPeerError::UnknownChaincode(name.to_string(), self.ledger.channel().to_string())
        })
    }
}

pub(crate) struct Context<S: StateStore> {
    pub config: Arc<Config>,
    pub state: Arc<S>,
    pub msp: Arc<Msp>,
    pub channels: Arc<HashMap<String, Channel<S>>>,
}

/// A proposal whose creator and signature have been checked.
pub(crate) struct VerifiedProposal {
    pub proposal: Proposal,
    pub creator: X509Identity,
    pub chaincode: Arc<dyn Chaincode>,
}

/// Result of running a proposal against the current world state.
pub(crate) struct Simulation {
    pub payload: Vec<u8>,
    pub rw_set: ReadWriteSet,
}

impl<S: StateStore> Context<S> {
    pub(crate) fn channel(&self, name: &str) -> Result<&Channel<S>, LedgerPeerError> {
        self.channels
            .get(name)
            .ok_or_else(|| LedgerPeerError::UnknownChannel(name.to_string()))
    }

    /// Run every check a proposal must pass before it is simulated:
    /// 1. The channel is served and the chaincode installed on it
    /// 2. The creator belongs to a known organisation and signed the proposal
    /// 3. The transaction ID is derived from the nonce and the creator
    /// 4. The transaction ID has not been committed yet
    pub(crate) async fn verify_proposal(
        &self,
        signed: &SignedProposal,
    ) -> Result<VerifiedProposal, LedgerPeerError> {
        let proposal = signed.proposal()?;
        logging::record_field("tx_id", &proposal.tx_id);

        let channel = self.channel(&proposal.channel_id)?;
        let chaincode = channel.chaincode(&proposal.chaincode_id)?;

        let creator = proposal.creator()?;
        let creator_identity =
            self.msp
                .verify_signed(creator, &signed.proposal_bytes, &signed.signature)?;

        let expected_tx_id = compute_transaction_id(&proposal.nonce, &creator.encode_to_vec());
        if proposal.tx_id != expected_tx_id {
            return Err(CryptoError::TransactionIdMismatch.into());
        }

        if channel.ledger.is_committed(&proposal.tx_id).await {
            return Err(LedgerPeerError::DuplicateTransaction(proposal.tx_id));
        }
        debug!("Proposal verified.");

        Ok(VerifiedProposal {
            proposal,
            creator: creator_identity,
            chaincode,
        })
    }

    pub(crate) async fn simulate(
        &self,
        verified: &VerifiedProposal,
    ) -> Result<Simulation, LedgerPeerError> {
        let proposal = &verified.proposal;
        let state: Arc<dyn StateStore> = self.state.clone();
        let namespace = Namespace::new(&proposal.channel_id, &proposal.chaincode_id);
        let mut ctx =
            TransactionContext::new(state, namespace, &proposal.tx_id, verified.creator.clone());

        let payload = verified
            .chaincode
            .invoke(&mut ctx, &proposal.transaction_name, &proposal.args)
            .await?;

        Ok(Simulation {
            payload,
            rw_set: ctx.into_read_write_set(),
        })
    }

    /// Sign a transaction action as this peer.
    pub(crate) fn endorse(&self, action_bytes: &[u8]) -> Endorsement {
        Endorsement {
            endorser: Some((&self.config.identity).into()),
            signature: self.config.signer.sign(action_bytes),
        }
    }

    /// Check that the endorsement of a prepared transaction was made by this
    /// peer and covers the transaction action.
    pub(crate) fn verify_endorsement(
        &self,
        prepared: &PreparedTransaction,
    ) -> Result<(), LedgerPeerError> {
        let endorsement = prepared
            .endorsement
            .as_ref()
            .ok_or(LedgerPeerError::MissingEndorsement)?;
        let endorser = endorsement
            .endorser
            .as_ref()
            .ok_or(LedgerPeerError::MissingEndorsement)?;
        if *endorser != SerializedIdentity::from(&self.config.identity) {
            return Err(LedgerPeerError::UntrustedEndorser(endorser.msp_id.clone()));
        }

        let _ = self
            .msp
            .verify_signed(endorser, &prepared.action_bytes, &endorsement.signature)?;
        Ok(())
    }
}
