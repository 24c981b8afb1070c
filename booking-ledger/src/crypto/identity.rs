use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use tokio_rustls::webpki::{self, EndEntityCert, TlsClientTrustAnchors, TrustAnchor};

use crate::{
    crypto::CryptoError,
    infrastructure::pem_utils,
    rpc::SerializedIdentity,
    BookingLedgerError,
};

static SUPPORTED_ALGORITHMS: &[&webpki::SignatureAlgorithm] = &[
    &webpki::ECDSA_P256_SHA256,
    &webpki::ECDSA_P384_SHA384,
];

/// A member identity: the MSP the member belongs to and its PEM encoded X.509
/// certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X509Identity {
    msp_id: String,
    certificate: Vec<u8>,
}

impl X509Identity {
    pub fn new(
        msp_id: impl Into<String>,
        certificate_pem: Vec<u8>,
    ) -> Result<Self, BookingLedgerError> {
        // Reject anything that does not hold at least one certificate.
        let _ = pem_utils::first_certificate_from_pem(&certificate_pem)?;

        Ok(Self {
            msp_id: msp_id.into(),
            certificate: certificate_pem,
        })
    }

    pub fn from_file(
        msp_id: impl Into<String>,
        certificate_path: impl AsRef<Path>,
    ) -> Result<Self, BookingLedgerError> {
        let path = certificate_path.as_ref();
        let pem = pem_utils::read_file(path)?;
        if pem_utils::certificates_from_pem(&pem)?.is_empty() {
            return Err(BookingLedgerError::MissingCertificate(path.to_path_buf()));
        }

        Self::new(msp_id, pem)
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    pub fn certificate_pem(&self) -> &[u8] {
        &self.certificate
    }

    pub fn certificate_der(&self) -> Result<Vec<u8>, BookingLedgerError> {
        pem_utils::first_certificate_from_pem(&self.certificate)
    }
}

impl From<&X509Identity> for SerializedIdentity {
    fn from(identity: &X509Identity) -> Self {
        SerializedIdentity {
            msp_id: identity.msp_id.clone(),
            id_bytes: identity.certificate.clone(),
        }
    }
}

impl TryFrom<SerializedIdentity> for X509Identity {
    type Error = BookingLedgerError;

    fn try_from(identity: SerializedIdentity) -> Result<Self, Self::Error> {
        Self::new(identity.msp_id, identity.id_bytes)
    }
}

/// Verify a DER encoded ECDSA signature over `message` with the public key of
/// the given DER encoded certificate.
pub fn verify_signature(
    certificate_der: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let certificate = EndEntityCert::try_from(certificate_der)
        .map_err(|e| CryptoError::InvalidCertificate(e.to_string()))?;

    certificate
        .verify_signature(&webpki::ECDSA_P256_SHA256, message, signature)
        .map_err(|_| CryptoError::InvalidSignature)
}

/// Verify that the DER encoded certificate was issued by the given CA
/// certificate and is currently valid.
pub fn verify_certificate_chain(
    msp_id: &str,
    certificate_der: &[u8],
    ca_certificate_der: &[u8],
) -> Result<(), CryptoError> {
    let certificate = EndEntityCert::try_from(certificate_der)
        .map_err(|e| CryptoError::InvalidCertificate(e.to_string()))?;
    let anchor = TrustAnchor::try_from_cert_der(ca_certificate_der)
        .map_err(|e| CryptoError::InvalidCertificate(e.to_string()))?;
    let anchors = [anchor];

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| CryptoError::InvalidSystemTime)?;
    let time = webpki::Time::from_seconds_since_unix_epoch(now.as_secs());

    certificate
        .verify_is_valid_tls_client_cert(
            SUPPORTED_ALGORITHMS,
            &TlsClientTrustAnchors(&anchors),
            &[],
            time,
        )
        .map_err(|_| CryptoError::UntrustedCertificate(msp_id.to_string()))
}
