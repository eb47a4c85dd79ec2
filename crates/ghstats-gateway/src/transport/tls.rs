//! Server-side TLS configuration for `scheme: https`.
//!
//! Certificates and the private key are read once from PEM files at startup.
//! The ring provider is selected explicitly so the process never depends on a
//! globally installed rustls provider.

use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;

use ghstats_core::error::{GhStatsError, Result};

pub fn load_server_config(cert_file: &str, key_file: &str) -> Result<RustlsConfig> {
    let certs = CertificateDer::pem_file_iter(cert_file)
        .and_then(|it| it.collect::<std::result::Result<Vec<_>, _>>())
        .map_err(|e| GhStatsError::Config(format!("read cert_file failed ({cert_file}): {e}")))?;
    if certs.is_empty() {
        return Err(GhStatsError::Config(format!(
            "cert_file contains no certificates: {cert_file}"
        )));
    }

    let key = PrivateKeyDer::from_pem_file(key_file)
        .map_err(|e| GhStatsError::Config(format!("read key_file failed ({key_file}): {e}")))?;

    let mut config =
        ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(|e| GhStatsError::Config(format!("tls protocol setup failed: {e}")))?
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| GhStatsError::Config(format!("invalid certificate/key pair: {e}")))?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    tracing::debug!(cert_file, "tls: server certificate loaded");
    Ok(RustlsConfig::from_config(Arc::new(config)))
}
