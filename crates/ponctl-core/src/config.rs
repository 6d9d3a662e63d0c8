// ── Session configuration ──

use std::time::Duration;

use secrecy::SecretString;

use ponctl_api::TlsMode;

/// Everything needed to open an [`OltSession`](crate::OltSession).
///
/// The cookie is the device's static session value, sent verbatim as
/// the `Cookie` header on every request.
#[derive(Debug, Clone)]
pub struct OltConfig {
    /// IP address or hostname of the OLT.
    pub host: String,
    /// Static session cookie value.
    pub cookie: SecretString,
    /// TLS verification mode. Devices ship self-signed certificates,
    /// so accepting them is the default (documented constraint).
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
    /// TCP reachability probe budget.
    pub probe_timeout: Duration,
}

impl OltConfig {
    pub fn new(host: impl Into<String>, cookie: SecretString) -> Self {
        Self {
            host: host.into(),
            cookie,
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(1),
        }
    }
}
