pub mod logging;
pub mod pem_utils;

#[cfg(test)]
pub(crate) mod test_certs;
