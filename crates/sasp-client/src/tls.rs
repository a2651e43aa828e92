//! TLS trust configuration for the client
//!
//! The server presents a fresh self-signed certificate on every start, so
//! there is no CA to validate against. A caller either pins the exact
//! certificate or opts out of verification entirely.

use std::sync::Arc;

use quinn::crypto::rustls::QuicClientConfig;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, RootCertStore, SignatureScheme};

use crate::error::ClientError;

/// How the client decides to trust the server certificate
#[derive(Debug, Clone)]
pub enum TrustPolicy {
    /// Trust only this certificate
    Certificate(CertificateDer<'static>),
    /// Accept any certificate; the connection is encrypted but not authenticated
    Insecure,
}

impl TrustPolicy {
    /// Build the quinn client configuration for this policy
    pub fn quic_client_config(&self, alpn: &str) -> Result<quinn::ClientConfig, ClientError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());

        let builder = rustls::ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_protocol_versions(&[&rustls::version::TLS13])
            .map_err(|e| ClientError::Tls(e.to_string()))?;

        let mut tls = match self {
            TrustPolicy::Certificate(certificate) => {
                let mut roots = RootCertStore::empty();
                roots
                    .add(certificate.clone())
                    .map_err(|e| ClientError::Tls(e.to_string()))?;
                builder.with_root_certificates(roots).with_no_client_auth()
            }
            TrustPolicy::Insecure => {
                tracing::warn!("Server certificate verification is disabled");
                builder
                    .dangerous()
                    .with_custom_certificate_verifier(Arc::new(SkipServerVerification(provider)))
                    .with_no_client_auth()
            }
        };
        tls.alpn_protocols = vec![alpn.as_bytes().to_vec()];

        let crypto =
            QuicClientConfig::try_from(tls).map_err(|e| ClientError::Tls(e.to_string()))?;
        Ok(quinn::ClientConfig::new(Arc::new(crypto)))
    }
}

/// Accepts any server certificate, still checking handshake signatures
#[derive(Debug)]
struct SkipServerVerification(Arc<CryptoProvider>);

impl ServerCertVerifier for SkipServerVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}
