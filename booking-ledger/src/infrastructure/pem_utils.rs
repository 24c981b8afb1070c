//! Convenience functions for dealing with PEM files.

use std::{io::BufReader, path::Path};

use rustls::{Certificate, PrivateKey};
use zeroize::Zeroizing;

use crate::BookingLedgerError;

/// Returns all certificates in the pemfile at the given path
pub fn read_certificates(path: impl AsRef<Path>) -> Result<Vec<Certificate>, BookingLedgerError> {
    let bytes = read_file(path.as_ref())?;
    let certs = certificates_from_pem(&bytes)?
        .into_iter()
        .map(Certificate)
        .collect();

    Ok(certs)
}

/// Returns the DER bytes of every certificate found in the given PEM data.
pub fn certificates_from_pem(pem: &[u8]) -> Result<Vec<Vec<u8>>, BookingLedgerError> {
    let mut buf = BufReader::new(pem);
    Ok(rustls_pemfile::certs(&mut buf)?)
}

/// Returns the DER bytes of the first certificate found in the given PEM data.
pub fn first_certificate_from_pem(pem: &[u8]) -> Result<Vec<u8>, BookingLedgerError> {
    certificates_from_pem(pem)?
        .into_iter()
        .next()
        .ok_or(BookingLedgerError::InvalidCertificate)
}

/// Returns the first private key found in the pemfile at the given path
pub fn read_private_key_from_file(
    path: impl AsRef<Path>,
) -> Result<PrivateKey, BookingLedgerError> {
    let bytes = Zeroizing::new(read_file(path.as_ref())?);
    read_private_key_from_bytes(&bytes)
}

/// Returns the first private key found in the given PEM data
pub fn read_private_key_from_bytes(bytes: &[u8]) -> Result<PrivateKey, BookingLedgerError> {
    let mut buf = BufReader::new(bytes);
    let key = rustls_pemfile::pkcs8_private_keys(&mut buf)?
        .into_iter()
        .next()
        .map(PrivateKey)
        .ok_or(BookingLedgerError::InvalidPrivateKey)?;

    Ok(key)
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, BookingLedgerError> {
    std::fs::read(path).map_err(|e| BookingLedgerError::FileIo(e, path.to_path_buf()))
}
