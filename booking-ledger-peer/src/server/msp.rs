//! Membership checks for the organisations a peer trusts.

use booking_ledger::{
    crypto::{verify_certificate_chain, verify_signature, CryptoError, X509Identity},
    rpc::SerializedIdentity,
    BookingLedgerError,
};
use std::collections::HashMap;
use tracing::instrument;

use crate::{config::Organization, LedgerPeerError};

/// Maps MSP IDs to the CA certificate of that organisation.
#[derive(Debug, Clone)]
pub struct Msp {
    organizations: HashMap<String, Vec<u8>>,
}

impl Msp {
    pub fn new(organizations: &[Organization]) -> Self {
        Self {
            organizations: organizations
                .iter()
                .map(|org| (org.msp_id.clone(), org.ca_certificate.clone()))
                .collect(),
        }
    }

    /// Check that the identity belongs to a known organisation and that its
    /// certificate was issued by that organisation's CA.
    #[instrument(skip_all, err(Debug), fields(msp_id = %identity.msp_id))]
    pub fn validate_identity(
        &self,
        identity: &SerializedIdentity,
    ) -> Result<X509Identity, LedgerPeerError> {
        let ca_certificate = self
            .organizations
            .get(&identity.msp_id)
            .ok_or_else(|| CryptoError::UnknownMsp(identity.msp_id.clone()))?;

        let identity = X509Identity::try_from(identity.clone()).map_err(|e| match e {
            BookingLedgerError::InvalidCertificate => {
                CryptoError::InvalidCertificate("no certificate in identity".to_string()).into()
            }
            other => LedgerPeerError::from(other),
        })?;
        let certificate = identity.certificate_der()?;
        verify_certificate_chain(identity.msp_id(), &certificate, ca_certificate)?;

        Ok(identity)
    }

    /// Validate the identity and check its signature over `message`.
    pub fn verify_signed(
        &self,
        identity: &SerializedIdentity,
        message: &[u8],
        signature: &[u8],
    ) -> Result<X509Identity, LedgerPeerError> {
        let identity = self.validate_identity(identity)?;
        verify_signature(&identity.certificate_der()?, message, signature)?;
        Ok(identity)
    }
}
