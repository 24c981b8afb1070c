//! Constructors and signing helpers for the messages that make up a
//! transaction flow: proposal, prepared transaction and commit status request.

use prost::Message;
use rand::{CryptoRng, RngCore};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use time::OffsetDateTime;

use crate::{
    crypto::{compute_transaction_id, generate_nonce, Signer, X509Identity},
    rpc::{
        CommitStatusRequest, PreparedTransaction, Proposal, SerializedIdentity,
        SignedCommitStatusRequest, SignedEnvelope, SignedProposal, TransactionAction,
    },
    BookingLedgerError,
};

/// Transactions understood by the booking contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum TransactionName {
    CreateAsset,
    CreateInvoice,
    ReadAsset,
    GetAllAssets,
    AssetExists,
}

impl Proposal {
    /// Create a proposal with a fresh nonce. The transaction ID is derived
    /// from the nonce and the serialized creator.
    pub fn create(
        rng: &mut (impl CryptoRng + RngCore),
        creator: &X509Identity,
        channel_id: &str,
        chaincode_id: &str,
        transaction_name: &str,
        args: &[String],
    ) -> Self {
        let creator = SerializedIdentity::from(creator);
        let nonce = generate_nonce(rng);
        let tx_id = compute_transaction_id(&nonce, &creator.encode_to_vec());

        Proposal {
            tx_id,
            channel_id: channel_id.to_string(),
            chaincode_id: chaincode_id.to_string(),
            transaction_name: transaction_name.to_string(),
            args: args.to_vec(),
            creator: Some(creator),
            nonce,
            timestamp: OffsetDateTime::now_utc().unix_timestamp(),
        }
    }

    pub fn sign(&self, signer: &Signer) -> SignedProposal {
        let proposal_bytes = self.encode_to_vec();
        let signature = signer.sign(&proposal_bytes);
        SignedProposal {
            proposal_bytes,
            signature,
        }
    }

    pub fn creator(&self) -> Result<&SerializedIdentity, BookingLedgerError> {
        self.creator
            .as_ref()
            .ok_or(BookingLedgerError::MissingField("creator"))
    }
}

impl SignedProposal {
    pub fn proposal(&self) -> Result<Proposal, BookingLedgerError> {
        Ok(Proposal::decode(self.proposal_bytes.as_slice())?)
    }
}

impl TransactionAction {
    pub fn creator(&self) -> Result<&SerializedIdentity, BookingLedgerError> {
        self.creator
            .as_ref()
            .ok_or(BookingLedgerError::MissingField("creator"))
    }
}

impl PreparedTransaction {
    pub fn action(&self) -> Result<TransactionAction, BookingLedgerError> {
        Ok(TransactionAction::decode(self.action_bytes.as_slice())?)
    }

    /// Sign the prepared transaction as the submitting client.
    pub fn sign(&self, signer: &Signer) -> SignedEnvelope {
        let payload = self.encode_to_vec();
        let signature = signer.sign(&payload);
        SignedEnvelope { payload, signature }
    }
}

impl SignedEnvelope {
    pub fn prepared_transaction(&self) -> Result<PreparedTransaction, BookingLedgerError> {
        Ok(PreparedTransaction::decode(self.payload.as_slice())?)
    }
}

impl CommitStatusRequest {
    pub fn create(tx_id: &str, channel_id: &str, identity: &X509Identity) -> Self {
        CommitStatusRequest {
            tx_id: tx_id.to_string(),
            channel_id: channel_id.to_string(),
            identity: Some(identity.into()),
        }
    }

    pub fn sign(&self, signer: &Signer) -> SignedCommitStatusRequest {
        let request = self.encode_to_vec();
        let signature = signer.sign(&request);
        SignedCommitStatusRequest { request, signature }
    }

    pub fn identity(&self) -> Result<&SerializedIdentity, BookingLedgerError> {
        self.identity
            .as_ref()
            .ok_or(BookingLedgerError::MissingField("identity"))
    }
}

impl SignedCommitStatusRequest {
    pub fn commit_status_request(&self) -> Result<CommitStatusRequest, BookingLedgerError> {
        Ok(CommitStatusRequest::decode(self.request.as_slice())?)
    }
}
