//! Ephemeral TLS identity for the QUIC listener
//!
//! A fresh self-signed certificate is generated at every start. This is a
//! development-grade identity: clients must either trust the certificate
//! explicitly or skip verification.

use std::sync::Arc;

use anyhow::{Context, Result};
use quinn::crypto::rustls::QuicServerConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};

use sasp_core::config::ServerConfig;

/// Maximum streams a peer may open: one media plus one control
const MAX_STREAMS_PER_CONNECTION: u32 = 2;

/// Self-signed certificate and its private key
pub struct TlsIdentity {
    certificate: CertificateDer<'static>,
    key_der: Vec<u8>,
}

impl TlsIdentity {
    /// Generate a new self-signed identity for the given DNS names
    pub fn generate_self_signed(names: &[String]) -> Result<Self> {
        let certified = rcgen::generate_simple_self_signed(names.to_vec())
            .context("Failed to generate self-signed certificate")?;

        tracing::debug!("Generated self-signed certificate for {:?}", names);

        Ok(Self {
            certificate: certified.cert.der().clone(),
            key_der: certified.key_pair.serialize_der(),
        })
    }

    /// DER-encoded certificate, for clients that want to trust it
    pub fn certificate(&self) -> &CertificateDer<'static> {
        &self.certificate
    }

    fn private_key(&self) -> PrivateKeyDer<'static> {
        PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(self.key_der.clone()))
    }

    /// Build the quinn server configuration for this identity
    ///
    /// TLS 1.3 only, a single ALPN identifier, and at most two peer-initiated
    /// bidirectional streams per connection.
    pub fn quic_server_config(&self, config: &ServerConfig) -> Result<quinn::ServerConfig> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());

        let mut tls = rustls::ServerConfig::builder_with_provider(provider)
            .with_protocol_versions(&[&rustls::version::TLS13])
            .context("TLS 1.3 not supported by crypto provider")?
            .with_no_client_auth()
            .with_single_cert(vec![self.certificate.clone()], self.private_key())
            .context("Invalid certificate or key")?;
        tls.alpn_protocols = config.alpn_protocols();

        let crypto = QuicServerConfig::try_from(tls).context("TLS config unusable for QUIC")?;
        let mut server_config = quinn::ServerConfig::with_crypto(Arc::new(crypto));

        let mut transport = quinn::TransportConfig::default();
        transport.max_concurrent_bidi_streams(MAX_STREAMS_PER_CONNECTION.into());
        transport.max_concurrent_uni_streams(0u32.into());
        if !config.idle_timeout.is_zero() {
            let idle = quinn::IdleTimeout::try_from(config.idle_timeout)
                .context("idle_timeout out of range")?;
            transport.max_idle_timeout(Some(idle));
        }
        server_config.transport_config(Arc::new(transport));

        Ok(server_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_identity() {
        let identity = TlsIdentity::generate_self_signed(&["localhost".to_string()]).unwrap();
        assert!(!identity.certificate().is_empty());
    }

    #[test]
    fn test_each_identity_is_fresh() {
        let names = vec!["localhost".to_string()];
        let first = TlsIdentity::generate_self_signed(&names).unwrap();
        let second = TlsIdentity::generate_self_signed(&names).unwrap();
        assert_ne!(first.certificate(), second.certificate());
    }

    #[test]
    fn test_quic_server_config_builds() {
        let identity = TlsIdentity::generate_self_signed(&["localhost".to_string()]).unwrap();
        assert!(identity
            .quic_server_config(&ServerConfig::default())
            .is_ok());
    }
}
