// ── ONU registry ──
//
// In-memory authoritative record of known ONUs, keyed by serial number.
// Owned exclusively by one OltSession; every mutation goes through
// `&mut self`, so single-writer discipline is enforced by the borrow
// checker rather than a lock.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::CoreError;
use crate::model::{InterfacePath, OltPort, OnuRegistration, SerialNumber};

/// Registry of known ONUs: serial number → registration.
///
/// Invariants: serial numbers are unique (map key); an interface, once
/// assigned, is held by at most one registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnuRegistry {
    entries: BTreeMap<SerialNumber, OnuRegistration>,
}

impl OnuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a pre-authorized registration with no interface yet.
    pub fn add_pending(&mut self, serial: SerialNumber) -> Result<(), CoreError> {
        if self.entries.contains_key(&serial) {
            return Err(CoreError::AlreadyExists {
                what: "registration",
                identifier: serial.to_string(),
            });
        }
        self.entries
            .insert(serial.clone(), OnuRegistration::pending(serial));
        Ok(())
    }

    /// Remove a registration, returning it.
    pub fn remove(&mut self, serial: &SerialNumber) -> Result<OnuRegistration, CoreError> {
        self.entries
            .remove(serial)
            .ok_or_else(|| CoreError::NotFound {
                what: "registration",
                identifier: serial.to_string(),
            })
    }

    pub fn contains(&self, serial: &SerialNumber) -> bool {
        self.entries.contains_key(serial)
    }

    pub fn find_by_serial(&self, serial: &SerialNumber) -> Option<&OnuRegistration> {
        self.entries.get(serial)
    }

    pub fn find_by_interface(&self, interface: InterfacePath) -> Option<&OnuRegistration> {
        self.entries
            .values()
            .find(|reg| reg.interface == Some(interface))
    }

    /// All registrations under one PON port, in serial order.
    ///
    /// Matching is on the typed port, so "0/1" never picks up "0/10/5".
    pub fn list_by_port(&self, port: OltPort) -> Vec<&OnuRegistration> {
        self.entries
            .values()
            .filter(|reg| reg.interface.is_some_and(|intf| intf.port() == port))
            .collect()
    }

    /// Replace the service list of a registration.
    pub fn replace_services(
        &mut self,
        serial: &SerialNumber,
        services: Vec<String>,
    ) -> Result<(), CoreError> {
        self.entry_mut(serial)?.services = services;
        Ok(())
    }

    /// Assign an interface to a registration, enforcing interface
    /// uniqueness across the registry. Re-assigning the interface a
    /// registration already holds is a no-op.
    pub fn assign_interface(
        &mut self,
        serial: &SerialNumber,
        interface: InterfacePath,
    ) -> Result<(), CoreError> {
        if let Some(holder) = self.find_by_interface(interface) {
            if holder.serial != *serial {
                return Err(CoreError::AlreadyExists {
                    what: "interface",
                    identifier: interface.to_string(),
                });
            }
        }
        self.entry_mut(serial)?.interface = Some(interface);
        Ok(())
    }

    /// Ordered view of all registrations (serial order, deterministic).
    pub fn snapshot(&self) -> Vec<OnuRegistration> {
        self.entries.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OnuRegistration> {
        self.entries.values()
    }

    // ── Reconcile support (crate-internal) ──────────────────────────

    /// Set an interface without the uniqueness check. Only the
    /// reconciler uses this: during a merge the device tables are
    /// authoritative and stale local assignments must not block them.
    pub(crate) fn set_interface_unchecked(
        &mut self,
        serial: &SerialNumber,
        interface: InterfacePath,
    ) -> Result<(), CoreError> {
        self.entry_mut(serial)?.interface = Some(interface);
        Ok(())
    }

    /// Drop every registration that still has no interface. Returns the
    /// number removed.
    pub(crate) fn prune_pending(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|serial, reg| {
            let keep = reg.interface.is_some();
            if !keep {
                debug!(%serial, "pruning registration without an interface");
            }
            keep
        });
        before - self.entries.len()
    }

    fn entry_mut(&mut self, serial: &SerialNumber) -> Result<&mut OnuRegistration, CoreError> {
        self.entries
            .get_mut(serial)
            .ok_or_else(|| CoreError::NotFound {
                what: "registration",
                identifier: serial.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sn(raw: &str) -> SerialNumber {
        SerialNumber::parse(raw).unwrap()
    }

    fn intf(raw: &str) -> InterfacePath {
        InterfacePath::parse(raw).unwrap()
    }

    #[test]
    fn add_pending_twice_is_a_duplicate() {
        let mut reg = OnuRegistry::new();
        reg.add_pending(sn("ISKT00000001")).unwrap();
        let err = reg.add_pending(sn("ISKT00000001")).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyExists { .. }));
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut reg = OnuRegistry::new();
        let err = reg.remove(&sn("ISKT00000001")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn find_by_interface_after_assignment() {
        let mut reg = OnuRegistry::new();
        reg.add_pending(sn("ISKT00000001")).unwrap();
        reg.assign_interface(&sn("ISKT00000001"), intf("0/2/7")).unwrap();

        let found = reg.find_by_interface(intf("0/2/7")).unwrap();
        assert_eq!(found.serial, sn("ISKT00000001"));
        assert!(reg.find_by_interface(intf("0/2/8")).is_none());
    }

    #[test]
    fn interfaces_are_unique_across_registrations() {
        let mut reg = OnuRegistry::new();
        reg.add_pending(sn("ISKT00000001")).unwrap();
        reg.add_pending(sn("ISKT00000002")).unwrap();
        reg.assign_interface(&sn("ISKT00000001"), intf("0/2/7")).unwrap();

        let err = reg
            .assign_interface(&sn("ISKT00000002"), intf("0/2/7"))
            .unwrap_err();
        assert!(matches!(err, CoreError::AlreadyExists { .. }));

        // Re-assigning the same interface to its holder is fine.
        reg.assign_interface(&sn("ISKT00000001"), intf("0/2/7")).unwrap();
    }

    #[test]
    fn list_by_port_is_delimiter_safe() {
        let mut reg = OnuRegistry::new();
        reg.add_pending(sn("ISKT00000001")).unwrap();
        reg.add_pending(sn("ISKT00000002")).unwrap();
        reg.assign_interface(&sn("ISKT00000001"), intf("0/1/5")).unwrap();
        reg.assign_interface(&sn("ISKT00000002"), intf("0/10/5")).unwrap();

        let on_port = reg.list_by_port(OltPort::parse("0/1").unwrap());
        assert_eq!(on_port.len(), 1);
        assert_eq!(on_port[0].serial, sn("ISKT00000001"));
    }

    #[test]
    fn list_by_port_is_ordered() {
        let mut reg = OnuRegistry::new();
        for (serial, path) in [
            ("ISKT00000003", "0/1/3"),
            ("ISKT00000001", "0/1/1"),
            ("ISKT00000002", "0/1/2"),
        ] {
            reg.add_pending(sn(serial)).unwrap();
            reg.assign_interface(&sn(serial), intf(path)).unwrap();
        }

        let serials: Vec<_> = reg
            .list_by_port(OltPort::parse("0/1").unwrap())
            .iter()
            .map(|r| r.serial.to_string())
            .collect();
        assert_eq!(serials, ["ISKT00000001", "ISKT00000002", "ISKT00000003"]);
    }

    #[test]
    fn prune_pending_drops_interfaceless_entries() {
        let mut reg = OnuRegistry::new();
        reg.add_pending(sn("ISKT00000001")).unwrap();
        reg.add_pending(sn("ISKT00000002")).unwrap();
        reg.assign_interface(&sn("ISKT00000002"), intf("0/1/1")).unwrap();

        assert_eq!(reg.prune_pending(), 1);
        assert!(!reg.contains(&sn("ISKT00000001")));
        assert!(reg.contains(&sn("ISKT00000002")));
    }

    #[test]
    fn replace_services_overwrites() {
        let mut reg = OnuRegistry::new();
        reg.add_pending(sn("ISKT00000001")).unwrap();
        reg.replace_services(&sn("ISKT00000001"), vec!["HSI".into(), "IPTV".into()])
            .unwrap();
        reg.replace_services(&sn("ISKT00000001"), vec!["HSI".into()])
            .unwrap();

        assert_eq!(
            reg.find_by_serial(&sn("ISKT00000001")).unwrap().services,
            vec!["HSI".to_owned()]
        );
    }
}
