// ── Core error types ──
//
// Domain-level errors from ponctl-core. Input validation fails before
// any remote call; remote-call errors propagate unchanged; batch
// operations catch per-item errors, log them, and continue.

use ponctl_api::codec::VlanBitmapError;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection ───────────────────────────────────────────────────
    /// The reachability probe against the device failed.
    #[error("host {host} is not reachable")]
    HostUnreachable { host: String },

    // ── Workflow ─────────────────────────────────────────────────────
    /// The serial number is not on the authorized list (registry).
    #[error("serial number {serial} is not on the authorized list")]
    NotAuthorized { serial: String },

    /// Malformed user or file input; raised before any remote call.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Lookup miss.
    #[error("{what} not found: {identifier}")]
    NotFound {
        what: &'static str,
        identifier: String,
    },

    /// Duplicate create.
    #[error("{what} already exists: {identifier}")]
    AlreadyExists {
        what: &'static str,
        identifier: String,
    },

    /// Delete blocked by an active reference on the device.
    #[error("profile {name} is in use and cannot be deleted")]
    ProfileInUse { name: String },

    /// The device answered a write with a non-success status. The local
    /// registry is left untouched when this is returned.
    #[error("device rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The subinterface pool under a port is exhausted (slots 1–128).
    #[error("no free subinterface under port {port} (1-128 all in use)")]
    NoCapacity { port: String },

    // ── Wrapped layers ───────────────────────────────────────────────
    /// VLAN bitmap codec failure.
    #[error(transparent)]
    Codec(#[from] VlanBitmapError),

    /// Transport-layer error propagated unchanged.
    #[error("API error: {0}")]
    Api(ponctl_api::Error),

    /// Local file I/O (batch list files). The only failure allowed to
    /// abort a whole batch operation.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ponctl_api::Error> for CoreError {
    fn from(err: ponctl_api::Error) -> Self {
        match err {
            ponctl_api::Error::Unreachable { host, .. } => Self::HostUnreachable { host },
            ponctl_api::Error::Status { status, message } => Self::Rejected { status, message },
            other => Self::Api(other),
        }
    }
}
