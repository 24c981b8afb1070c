use std::path::Path;

use p256::{
    ecdsa::{signature::Signer as _, Signature, SigningKey, VerifyingKey},
    pkcs8::DecodePrivateKey,
};
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::{crypto::CryptoError, infrastructure::pem_utils, BookingLedgerError};

/// Produces ECDSA P-256 signatures over SHA-256 for proposals, transactions
/// and commit status requests.
#[derive(Clone)]
pub struct Signer {
    key: SigningKey,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").field("key", &"[REDACTED]").finish()
    }
}

impl Signer {
    /// Build a signer from a PEM encoded PKCS#8 private key.
    pub fn from_pem(pem: &[u8]) -> Result<Self, BookingLedgerError> {
        let der = pem_utils::read_private_key_from_bytes(pem)?;
        let key = SigningKey::from_pkcs8_der(&der.0).map_err(|_| CryptoError::InvalidSigningKey)?;
        Ok(Self { key })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BookingLedgerError> {
        let key = pem_utils::read_private_key_from_file(path)?;
        let key = SigningKey::from_pkcs8_der(&key.0).map_err(|_| CryptoError::InvalidSigningKey)?;
        Ok(Self { key })
    }

    /// Load the private key from a key store directory. The key store holds a
    /// single key file whose name is not known in advance, so the first file
    /// in name order is used.
    pub fn from_key_store(dir: impl AsRef<Path>) -> Result<Self, BookingLedgerError> {
        let dir = dir.as_ref();
        let mut files = std::fs::read_dir(dir)
            .map_err(|e| BookingLedgerError::FileIo(e, dir.to_path_buf()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect::<Vec<_>>();
        files.sort();

        let key_path = files
            .into_iter()
            .next()
            .ok_or_else(|| BookingLedgerError::EmptyKeyStore(dir.to_path_buf()))?;
        debug!("Loading private key from {}", key_path.display());

        Self::from_file(key_path)
    }

    /// Generate a new random signing key.
    pub fn generate(rng: &mut (impl CryptoRng + RngCore)) -> Self {
        Self {
            key: SigningKey::random(rng),
        }
    }

    /// Sign the message and return the DER encoding of the signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.key.sign(message);
        signature.to_der().as_bytes().to_vec()
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.key.verifying_key()
    }
}
