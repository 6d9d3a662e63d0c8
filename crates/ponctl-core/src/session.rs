// ── OLT session ──
//
// One session owns the RESTCONF client and the ONU registry for a
// single device. Every device interaction is a sequential awaited
// call; every registry mutation goes through `&mut self`. No state is
// shared across sessions.

use tracing::debug;

use ponctl_api::restconf::models::{BlacklistEntry, OnuInfoEntry};
use ponctl_api::{RestconfClient, TransportConfig, probe_reachable};

use crate::config::OltConfig;
use crate::error::CoreError;
use crate::registry::OnuRegistry;

/// A provisioning session against one OLT.
///
/// Created with [`connect`](Self::connect), which runs the short TCP
/// reachability probe before anything else. The registry starts empty;
/// populate it from an allow-list, a [`sync`](Self::sync) pass, or
/// both.
pub struct OltSession {
    pub(crate) client: RestconfClient,
    pub(crate) registry: OnuRegistry,
    pub(crate) host: String,
}

impl OltSession {
    /// Probe the device and open a session.
    pub async fn connect(config: OltConfig) -> Result<Self, CoreError> {
        probe_reachable(&config.host, config.probe_timeout).await?;
        debug!(host = %config.host, "device reachable, opening session");

        let transport = TransportConfig {
            tls: config.tls.clone(),
            timeout: config.timeout,
        };
        let client = RestconfClient::new(&config.host, config.cookie.clone(), &transport)?;
        Ok(Self::with_client(client))
    }

    /// Build a session around an existing client, skipping the probe.
    /// Used by tests and by callers that manage their own transport.
    pub fn with_client(client: RestconfClient) -> Self {
        let host = client
            .base_url()
            .host_str()
            .unwrap_or_default()
            .to_owned();
        Self {
            client,
            registry: OnuRegistry::new(),
            host,
        }
    }

    /// The device this session talks to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Read-only view of the registry.
    pub fn registry(&self) -> &OnuRegistry {
        &self.registry
    }

    // ── Read-only device tables ──────────────────────────────────────

    /// Fetch the blacklist: devices that attempted to connect but are
    /// not yet authorized.
    pub async fn blacklist(&self) -> Result<Vec<BlacklistEntry>, CoreError> {
        Ok(self.client.get_table().await?)
    }

    /// Fetch the operational ONU info table.
    pub async fn onu_info(&self) -> Result<Vec<OnuInfoEntry>, CoreError> {
        Ok(self.client.get_table().await?)
    }
}
