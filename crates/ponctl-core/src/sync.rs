// ── Reconciliation ──
//
// Pulls the ONU configuration table and the service-port binding table
// and merges them into the registry. The merge happens on a working
// copy that is committed in one assignment; a failed pass leaves the
// registry exactly as it was.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use ponctl_api::restconf::models::{OnuConfigEntry, ServicePortEntry};

use crate::error::CoreError;
use crate::model::{InterfacePath, SerialNumber};
use crate::session::OltSession;

/// Counters from one [`OltSession::sync`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Registrations discovered on the device and added locally.
    pub discovered: usize,
    /// Registrations already known whose interface/services were refreshed.
    pub updated: usize,
    /// Pending registrations dropped for still having no interface.
    pub pruned: usize,
}

impl OltSession {
    /// Reconcile the registry against the device.
    ///
    /// Two sequential reads (configuration table, then service-port
    /// bindings), merged device-authoritatively: unknown serials are
    /// added with their interface and services; known serials have both
    /// refreshed in place. Entries still lacking an interface after the
    /// merge are pruned — local cleanup only, no remote effect.
    ///
    /// The two reads are not transactional. A device-side change
    /// between them can yield a momentarily stale view; the next pass
    /// self-corrects. With no device-side change, repeated passes are
    /// idempotent.
    pub async fn sync(&mut self) -> Result<SyncReport, CoreError> {
        let configs: Vec<OnuConfigEntry> = self.client.get_table().await?;
        let bindings: Vec<ServicePortEntry> = self.client.get_table().await?;

        // interface -> bound service profile names, in table order
        let mut services_by_interface: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for binding in bindings {
            services_by_interface
                .entry(binding.if_name)
                .or_default()
                .push(binding.service_profile_name);
        }

        let mut next = self.registry.clone();
        let mut report = SyncReport::default();

        for entry in configs {
            // Blanked slots (deauthorized ONUs) stay in the table with
            // an empty serial; they are not registrations.
            if !entry.is_provisioned() {
                continue;
            }
            let serial = match SerialNumber::parse(&entry.serial_number) {
                Ok(serial) => serial,
                Err(err) => {
                    warn!(raw = %entry.serial_number, %err, "skipping unparseable device serial");
                    continue;
                }
            };
            let interface = match InterfacePath::parse(&entry.if_name) {
                Ok(interface) => interface,
                Err(err) => {
                    warn!(raw = %entry.if_name, %err, "skipping unparseable device interface");
                    continue;
                }
            };

            if next.contains(&serial) {
                report.updated += 1;
            } else {
                next.add_pending(serial.clone())?;
                report.discovered += 1;
            }
            let services = services_by_interface
                .get(&entry.if_name)
                .cloned()
                .unwrap_or_default();
            next.replace_services(&serial, services)?;
            next.set_interface_unchecked(&serial, interface)?;
        }

        report.pruned = next.prune_pending();
        debug!(
            discovered = report.discovered,
            updated = report.updated,
            pruned = report.pruned,
            total = next.len(),
            "registry reconciled"
        );

        self.registry = next;
        Ok(report)
    }
}
