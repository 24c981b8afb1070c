//! Paths to the PEM fixtures under `dev/test-certs`.

use std::path::PathBuf;

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../dev/test-certs")
}

pub fn org1_ca_certificate() -> PathBuf {
    root().join("org1/ca/ca.crt")
}

pub fn org2_ca_certificate() -> PathBuf {
    root().join("org2/ca/ca.crt")
}

pub fn org1_peer_tls_chain() -> PathBuf {
    root().join("org1/peers/peer0/tls/server-chain.crt")
}

pub fn org1_peer_tls_key() -> PathBuf {
    root().join("org1/peers/peer0/tls/server.key")
}

pub fn org1_user_certificate() -> PathBuf {
    root().join("org1/users/User1/msp/signcerts/cert.pem")
}

pub fn org1_user_key_store() -> PathBuf {
    root().join("org1/users/User1/msp/keystore")
}

pub fn org2_user_certificate() -> PathBuf {
    root().join("org2/users/User1/msp/signcerts/cert.pem")
}

pub fn org2_user_key_store() -> PathBuf {
    root().join("org2/users/User1/msp/keystore")
}
