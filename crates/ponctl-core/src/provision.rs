// ── Authorize / deauthorize workflow ──
//
// All writes follow the same discipline: validate locally first, issue
// the remote write, and only mutate the registry after the device
// accepted. A rejected write leaves local state untouched.

use std::io::BufRead;

use tracing::{debug, info, warn};

use ponctl_api::restconf::models::{OnuConfigEntry, ServicePortEntry, ServiceProfileEntry};

use crate::alloc;
use crate::allowlist::{self, AllowListEntry};
use crate::error::CoreError;
use crate::model::{InterfacePath, OltPort, SerialNumber};
use crate::session::OltSession;

impl OltSession {
    /// Authorize a serial number.
    ///
    /// The serial must already be on the registry (allow-list or a
    /// previous sync) — otherwise `NotAuthorized`, with no remote call
    /// issued. A registration without an interface gets the first free
    /// subinterface under `port_hint`. The provisioning write goes out
    /// before any local change; a rejected write leaves the registry
    /// untouched.
    pub async fn authorize(
        &mut self,
        serial: &SerialNumber,
        port_hint: Option<OltPort>,
    ) -> Result<InterfacePath, CoreError> {
        let Some(registration) = self.registry.find_by_serial(serial) else {
            return Err(CoreError::NotAuthorized {
                serial: serial.to_string(),
            });
        };

        let interface = match registration.interface {
            Some(interface) => interface,
            None => {
                let port = port_hint.ok_or_else(|| CoreError::InvalidInput {
                    message: format!(
                        "{serial} has no interface assigned and no port was given to allocate under"
                    ),
                })?;
                alloc::next_available(&self.registry, port)?
            }
        };

        let entry = OnuConfigEntry::provision(serial.as_str(), &interface.to_string());
        self.client
            .patch_entry(&interface.to_string(), &entry)
            .await?;

        self.registry.assign_interface(serial, interface)?;
        info!(%serial, %interface, "ONU authorized");
        Ok(interface)
    }

    /// Force-provision a serial on an explicit interface, skipping the
    /// allow-list check and the registry. The next [`sync`](Self::sync)
    /// picks the registration up from the device.
    pub async fn authorize_override(
        &self,
        serial: &SerialNumber,
        interface: InterfacePath,
    ) -> Result<(), CoreError> {
        let entry = OnuConfigEntry::provision(serial.as_str(), &interface.to_string());
        self.client
            .patch_entry(&interface.to_string(), &entry)
            .await?;
        info!(%serial, %interface, "ONU force-authorized");
        Ok(())
    }

    /// Deauthorize a serial number.
    ///
    /// The device write blanks the serial on the ONU's interface — the
    /// config slot remains, inactive. The registration is removed
    /// locally only after the device accepted the write. A pending
    /// registration (no interface) has nothing on the device and is
    /// removed locally right away.
    pub async fn deauthorize(&mut self, serial: &SerialNumber) -> Result<(), CoreError> {
        let Some(registration) = self.registry.find_by_serial(serial) else {
            return Err(CoreError::NotFound {
                what: "registration",
                identifier: serial.to_string(),
            });
        };

        if let Some(interface) = registration.interface {
            let entry = OnuConfigEntry::blank(&interface.to_string());
            self.client
                .patch_entry(&interface.to_string(), &entry)
                .await?;
        }

        self.registry.remove(serial)?;
        info!(%serial, "ONU deauthorized");
        Ok(())
    }

    /// Deauthorize a batch of serials, strictly sequentially.
    ///
    /// Per-item failures are logged and skipped; the batch never
    /// aborts. Returns the number of successful deauthorizations.
    pub async fn deauthorize_many(&mut self, serials: &[SerialNumber]) -> usize {
        let mut success = 0;
        for serial in serials {
            match self.deauthorize(serial).await {
                Ok(()) => success += 1,
                Err(err) => warn!(%serial, %err, "deauthorize failed, continuing batch"),
            }
        }
        info!("{success}/{} ONUs deauthorized", serials.len());
        success
    }

    /// Add a single serial number to the allow-list (a pending
    /// registration with no interface).
    pub fn allow(&mut self, serial: SerialNumber) -> Result<(), CoreError> {
        self.registry.add_pending(serial)
    }

    /// Load an allow-list into the registry as pending registrations.
    ///
    /// Returns the number of lines applied. A duplicate serial updates
    /// the existing entry's services instead of erroring.
    pub fn load_allow_list<R: BufRead>(&mut self, reader: R) -> Result<usize, CoreError> {
        let entries = allowlist::parse_allow_list(reader)?;
        let count = entries.len();
        for AllowListEntry { serial, services } in entries {
            if self.registry.contains(&serial) {
                debug!(%serial, "allow-list serial already known, refreshing services");
            } else {
                self.registry.add_pending(serial.clone())?;
            }
            if !services.is_empty() {
                self.registry.replace_services(&serial, services)?;
            }
        }
        Ok(count)
    }

    /// Bind service profiles to an authorized ONU, in order.
    ///
    /// Each profile name is checked against the device's service
    /// profile table before the first bind; binding stops at the first
    /// rejected write. Successful binds are appended to the local
    /// registration.
    pub async fn add_services(
        &mut self,
        serial: &SerialNumber,
        profiles: &[String],
    ) -> Result<(), CoreError> {
        let Some(registration) = self.registry.find_by_serial(serial) else {
            return Err(CoreError::NotFound {
                what: "registration",
                identifier: serial.to_string(),
            });
        };
        let Some(interface) = registration.interface else {
            return Err(CoreError::InvalidInput {
                message: format!("{serial} is not provisioned on an interface yet"),
            });
        };

        let known: Vec<ServiceProfileEntry> = self.client.get_table().await?;
        for profile in profiles {
            if !known.iter().any(|entry| entry.name == *profile) {
                return Err(CoreError::NotFound {
                    what: "service profile",
                    identifier: profile.clone(),
                });
            }
        }

        for profile in profiles {
            let binding = ServicePortEntry::new(&interface.to_string(), profile);
            self.client
                .post_entry(&interface.to_string(), &binding)
                .await?;
            debug!(%serial, %interface, profile, "service bound");
        }

        let mut services = self
            .registry
            .find_by_serial(serial)
            .map(|reg| reg.services.clone())
            .unwrap_or_default();
        for profile in profiles {
            if !services.contains(profile) {
                services.push(profile.clone());
            }
        }
        self.registry.replace_services(serial, services)?;
        Ok(())
    }

    /// Unbind one service profile from an ONU interface. The ONU stays
    /// registered; other bindings remain in effect.
    pub async fn remove_service(
        &mut self,
        interface: InterfacePath,
        profile: &str,
    ) -> Result<(), CoreError> {
        // Composite key: percent-encoded interface, comma, profile name.
        let key = format!("{interface},{profile}");
        self.client.delete_entry::<ServicePortEntry>(&key).await?;

        if let Some(serial) = self
            .registry
            .find_by_interface(interface)
            .map(|reg| reg.serial.clone())
        {
            let services: Vec<String> = self
                .registry
                .find_by_serial(&serial)
                .map(|reg| {
                    reg.services
                        .iter()
                        .filter(|s| s.as_str() != profile)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            self.registry.replace_services(&serial, services)?;
        }
        Ok(())
    }
}
