//! Domain layer for ponctl: the ONU registry, interface allocation,
//! reconciliation, and the authorize/deauthorize workflow.
//!
//! - **[`OltSession`]** — one session per device, owning the RESTCONF
//!   client and the registry. [`connect()`](OltSession::connect) runs
//!   the reachability probe; [`sync()`](OltSession::sync) reconciles
//!   against the device tables; authorize/deauthorize issue the remote
//!   write first and mutate local state only on success.
//!
//! - **[`OnuRegistry`]** — authoritative in-memory record of known
//!   ONUs (serial → interface → services). Single-writer by
//!   construction: mutation needs `&mut`, sessions are never shared.
//!
//! - **[`alloc`]** — first-fit subinterface allocation over the
//!   per-port pool [1,128] with explicit saturation detection.
//!
//! - **[`allowlist`]** — tolerant parsing of line-oriented allow/deny
//!   batch files.
//!
//! - **Profile surface** — generic list/get/create/delete over any
//!   named profile table (see `OltSession::profiles` and friends).

pub mod alloc;
pub mod allowlist;
pub mod config;
pub mod error;
pub mod model;
pub mod profiles;
pub mod provision;
pub mod registry;
pub mod session;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::OltConfig;
pub use error::CoreError;
pub use model::{InterfacePath, OltPort, OnuRegistration, SerialNumber, VENDOR_CODE};
pub use registry::OnuRegistry;
pub use session::OltSession;
pub use sync::SyncReport;

// Re-export the wire layer callers handle directly.
pub use ponctl_api::TlsMode;
pub use ponctl_api::codec;
pub use ponctl_api::restconf::models::{
    BlacklistEntry, MibEntry, NamedEntry, OnuConfigEntry, OnuInfoEntry, ServicePortEntry,
    ServiceProfileEntry, VlanProfileEntry,
};
