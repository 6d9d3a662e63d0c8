// Shared transport configuration for building reqwest::Client instances.
//
// The management interface lives on HTTPS port 443 with a self-signed
// certificate out of the box, so certificate verification is off by
// default and must be opted into.

use std::path::PathBuf;
use std::time::Duration;

use tokio::net::TcpStream;

use crate::error::Error;

/// Port the RESTCONF interface listens on.
pub const RESTCONF_PORT: u16 = 443;

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (devices ship self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("ponctl/0.1.0");

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Probe whether the device accepts TCP connections on the management
/// port within `timeout` (typically ~1 s).
///
/// This is the only reachability gate; per-request timeouts are handled
/// by the HTTP client itself.
pub async fn probe_reachable(host: &str, timeout: Duration) -> Result<(), Error> {
    let addr = format!("{host}:{RESTCONF_PORT}");
    match tokio::time::timeout(timeout, TcpStream::connect(&addr)).await {
        Ok(Ok(_)) => Ok(()),
        _ => Err(Error::Unreachable {
            host: host.to_owned(),
            port: RESTCONF_PORT,
        }),
    }
}
