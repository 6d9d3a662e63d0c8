//! Async client for the RESTCONF-style HTTPS interface of Iskratel
//! Lumia-series MSAN/OLT devices.
//!
//! The device exposes its configuration as MIB tables under a fixed
//! RESTCONF root; reads return whole tables as JSON, writes address a
//! single entry by key. This crate owns the transport mechanics:
//!
//! - **[`RestconfClient`]** — URL construction, session-cookie auth,
//!   table GETs and entry POST/PATCH/DELETE with `%2F`-encoded
//!   interface keys.
//! - **[`TransportConfig`]** — TLS mode (self-signed device
//!   certificates are the norm), request timeout, and the short TCP
//!   probe that gates reachability.
//! - **Wire models** ([`restconf::models`]) — typed entries for the
//!   MIB tables involved in the ONU lifecycle.
//! - **[`codec`]** — the VLAN membership bitmap codec used by
//!   VLAN-bearing profile tables.

pub mod codec;
pub mod error;
pub mod restconf;
pub mod transport;

pub use error::Error;
pub use restconf::client::RestconfClient;
pub use transport::{TlsMode, TransportConfig, probe_reachable};
