//! Trust-all TLS support.
//!
//! Builds a rustls client configuration whose certificate verifier accepts
//! any chain and any server name, so that connections to endpoints with
//! self-signed or otherwise unverifiable certificates succeed. Handshakes
//! are otherwise normal: cipher suites and signature schemes come from the
//! ring provider.
//!
//! This removes all certificate-based and hostname-based protection against
//! man-in-the-middle attacks. Callers opting into an `https` URL through
//! this client accept that risk explicitly.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::ring;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};

/// Certificate verifier that unconditionally accepts every presented chain
/// and every server name.
///
/// Stateless; a single instance is shared across all requests.
#[derive(Debug)]
pub struct NoVerification;

impl ServerCertVerifier for NoVerification {
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
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

static TRUST_ALL: Lazy<Arc<ClientConfig>> = Lazy::new(|| {
    let config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoVerification))
        .with_no_client_auth();
    Arc::new(config)
});

/// Shared client configuration with certificate and hostname checks disabled.
pub fn trust_all_config() -> Arc<ClientConfig> {
    TRUST_ALL.clone()
}
