//! Identities, signatures and hashing used on both sides of the gateway.
//!
//! Signatures are ECDSA over curve P-256 with SHA-256, DER encoded.
//! Certificates are X.509 and always travel PEM encoded inside
//! [`SerializedIdentity`](crate::rpc::SerializedIdentity) messages.

use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::constants::NONCE_LENGTH;

mod identity;
mod signer;

pub use identity::{verify_certificate_chain, verify_signature, X509Identity};
pub use signer::Signer;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Signature verification failed")]
    InvalidSignature,
    #[error("Creator certificate is not valid: {0}")]
    InvalidCertificate(String),
    #[error("Certificate was not issued by the CA of {0}")]
    UntrustedCertificate(String),
    #[error("Unknown MSP ID: {0}")]
    UnknownMsp(String),
    #[error("Transaction ID does not match nonce and creator")]
    TransactionIdMismatch,
    #[error("Invalid signing key")]
    InvalidSigningKey,
    #[error("System clock is set before the Unix epoch")]
    InvalidSystemTime,
}

/// SHA-256 digest of the given bytes.
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// Generate a fresh random nonce for a proposal.
pub fn generate_nonce(rng: &mut (impl CryptoRng + RngCore)) -> Vec<u8> {
    let mut nonce = vec![0; NONCE_LENGTH];
    rng.fill_bytes(&mut nonce);
    nonce
}

/// Transaction IDs bind a proposal to its nonce and its creator:
/// `hex(sha256(nonce || creator))`.
pub fn compute_transaction_id(nonce: &[u8], creator: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn transaction_id_depends_on_nonce_and_creator() {
        let mut rng = StdRng::from_entropy();
        let nonce = generate_nonce(&mut rng);
        assert_eq!(nonce.len(), NONCE_LENGTH);

        let tx_id = compute_transaction_id(&nonce, b"creator");
        assert_eq!(tx_id.len(), 64);
        assert_eq!(tx_id, compute_transaction_id(&nonce, b"creator"));
        assert_ne!(tx_id, compute_transaction_id(&nonce, b"someone else"));

        let other_nonce = generate_nonce(&mut rng);
        assert_ne!(tx_id, compute_transaction_id(&other_nonce, b"creator"));
    }

    #[test]
    fn transaction_id_is_digest_of_concatenation() {
        let expected = hex::encode(sha256(b"noncecreator"));
        assert_eq!(compute_transaction_id(b"nonce", b"creator"), expected);
    }
}
