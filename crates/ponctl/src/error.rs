//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use ponctl_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("OLT {host} is not reachable")]
    #[diagnostic(
        code(ponctl::unreachable),
        help(
            "Check that the device is powered and the management interface\n\
             answers on port 443. Host: {host}"
        )
    )]
    Unreachable { host: String },

    // ── Authorization ────────────────────────────────────────────────
    #[error("Serial number {serial} is not on the authorized list")]
    #[diagnostic(
        code(ponctl::not_authorized),
        help(
            "Add it to an allow-list file and load it with: ponctl onu auth-file <path>\n\
             Or check the registry with: ponctl onu list"
        )
    )]
    NotAuthorized { serial: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(ponctl::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(ponctl::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("Profile '{name}' is in use")]
    #[diagnostic(
        code(ponctl::in_use),
        help("Unbind it from every ONU interface before deleting it.")
    )]
    InUse { name: String },

    #[error("No free subinterface under port {port}")]
    #[diagnostic(
        code(ponctl::no_capacity),
        help("All 128 subinterface slots are occupied. Free one with:\n\
              ponctl onu deauthorize <serial>")
    )]
    NoCapacity { port: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(ponctl::rejected))]
    Rejected { status: u16, message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(ponctl::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid input: {reason}")]
    #[diagnostic(code(ponctl::validation))]
    Validation { reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No OLT host configured")]
    #[diagnostic(
        code(ponctl::no_config),
        help(
            "Pass --host, set PONCTL_HOST, or create a profile with:\n\
             ponctl config init --host <address>\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ponctl::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(ponctl::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(ponctl::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unreachable { .. } => exit_code::CONNECTION,
            Self::NotAuthorized { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } | Self::InUse { .. } | Self::NoCapacity { .. } => {
                exit_code::CONFLICT
            }
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::HostUnreachable { host } => Self::Unreachable { host },

            CoreError::NotAuthorized { serial } => Self::NotAuthorized { serial },

            CoreError::InvalidInput { message } => Self::Validation { reason: message },

            CoreError::NotFound { what, identifier } => Self::NotFound {
                resource_type: what.to_owned(),
                identifier,
            },

            CoreError::AlreadyExists { what, identifier } => Self::Conflict {
                resource_type: what.to_owned(),
                identifier,
            },

            CoreError::ProfileInUse { name } => Self::InUse { name },

            CoreError::Rejected { status, message } => Self::Rejected { status, message },

            CoreError::NoCapacity { port } => Self::NoCapacity { port },

            CoreError::Codec(err) => Self::Validation {
                reason: err.to_string(),
            },

            CoreError::Api(err) => Self::ApiError {
                message: err.to_string(),
            },

            CoreError::Io(err) => Self::Io(err),
        }
    }
}
