// SPDX-License-Identifier: PMPL-1.0-or-later
//! TLS Certificate Fetcher — retrieves the peer certificate chain of an endpoint.
//!
//! The client accepts whatever certificate the peer presents: no chain trust,
//! hostname, or handshake-signature verification is performed. Only the raw
//! DER chain is returned for structural analysis.
//!
//! Each fetch owns its socket for the duration of the call; the socket is
//! shut down and dropped before `fetch_chain` returns on every path.

use crate::error::ConnectionError;
use rustls::client::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier, WebPkiVerifier,
};
use rustls::{
    Certificate, ClientConfig, ClientConnection, DigitallySignedStruct, ServerName,
    SignatureScheme, StreamOwned,
};
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Source of peer certificate chains, one call per endpoint.
pub trait CertificateFetcher {
    /// DER certificates presented by `host:port`, leaf first.
    fn fetch_chain(
        &self,
        host: &str,
        port: &str,
        timeout: Duration,
    ) -> Result<Vec<Vec<u8>>, ConnectionError>;
}

/// Accepts any server certificate and handshake signature.
struct AcceptAnyServerCert;

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &Certificate,
        _intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: SystemTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &Certificate,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &Certificate,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        let mut schemes = WebPkiVerifier::verification_schemes();
        // Advertised so P-521 servers can complete the handshake.
        schemes.push(SignatureScheme::ECDSA_NISTP521_SHA512);
        schemes
    }
}

/// Blocking rustls client that records the presented chain.
#[derive(Clone)]
pub struct TlsCertificateFetcher {
    config: Arc<ClientConfig>,
}

impl TlsCertificateFetcher {
    pub fn new() -> Self {
        let config = ClientConfig::builder()
            .with_safe_defaults()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert))
            .with_no_client_auth();
        Self {
            config: Arc::new(config),
        }
    }

    fn connect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<TcpStream, ConnectionError> {
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| ConnectionError::Resolve {
                host: host.to_string(),
                source,
            })?
            .collect();

        let mut last_error = None;
        for addr in &addrs {
            debug!(%addr, "Connecting");
            match TcpStream::connect_timeout(addr, timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(timeout))
                        .and_then(|()| stream.set_write_timeout(Some(timeout)))
                        .map_err(|source| ConnectionError::Connect {
                            addr: addr.to_string(),
                            source,
                        })?;
                    return Ok(stream);
                }
                Err(e) if is_timeout(&e) => last_error = Some(ConnectionError::Timeout(timeout)),
                Err(source) => {
                    last_error = Some(ConnectionError::Connect {
                        addr: addr.to_string(),
                        source,
                    })
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ConnectionError::NoAddress(host.to_string())))
    }
}

impl Default for TlsCertificateFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateFetcher for TlsCertificateFetcher {
    fn fetch_chain(
        &self,
        host: &str,
        port: &str,
        timeout: Duration,
    ) -> Result<Vec<Vec<u8>>, ConnectionError> {
        let port_num: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConnectionError::InvalidPort(port.to_string()))?;

        let server_name = ServerName::try_from(host)
            .map_err(|_| ConnectionError::InvalidServerName(host.to_string()))?;

        let stream = self.connect(host, port_num, timeout)?;
        let conn = ClientConnection::new(Arc::clone(&self.config), server_name)?;
        let mut tls = StreamOwned::new(conn, stream);

        let handshake = complete_handshake(&mut tls, timeout);

        let chain: Vec<Vec<u8>> = tls
            .conn
            .peer_certificates()
            .map(|certs| certs.iter().map(|cert| cert.0.clone()).collect())
            .unwrap_or_default();

        if handshake.is_ok() {
            tls.conn.send_close_notify();
            // Best effort; the peer may already have gone away.
            let _ = tls.conn.complete_io(&mut tls.sock);
        }
        let _ = tls.sock.shutdown(Shutdown::Both);

        handshake?;
        debug!(host, port, certificates = chain.len(), "Fetched peer chain");
        Ok(chain)
    }
}

fn complete_handshake(
    tls: &mut StreamOwned<ClientConnection, TcpStream>,
    timeout: Duration,
) -> Result<(), ConnectionError> {
    while tls.conn.is_handshaking() {
        tls.conn.complete_io(&mut tls.sock).map_err(|e| {
            if is_timeout(&e) {
                ConnectionError::Timeout(timeout)
            } else {
                ConnectionError::Handshake(e)
            }
        })?;
    }
    Ok(())
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock)
}
