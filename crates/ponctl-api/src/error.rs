use thiserror::Error;

/// Top-level error type for the `ponctl-api` crate.
///
/// Covers transport failures, the reachability probe, and non-success
/// device responses. `ponctl-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The TCP probe against the management port failed.
    #[error("host {host} not reachable on port {port}")]
    Unreachable { host: String, port: u16 },

    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The device answered with a non-success HTTP status.
    ///
    /// The RESTCONF interface signals rejection purely through the
    /// status line; the body (if any) is carried for diagnostics.
    #[error("device returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error is a non-success device status.
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// Returns `true` if this is a connection-level failure (the host
    /// may be down rather than rejecting the request).
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Unreachable { .. } => true,
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
