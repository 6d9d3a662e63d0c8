// Wire models for the MSAN MIB tables involved in the ONU lifecycle.
//
// Field names follow the device's `msan*` JSON keys exactly. Each type
// carries its table/entry addressing as associated constants, so
// endpoint naming lives with the data it describes instead of in a
// shared lookup table.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec::{self, VlanBitmapError};

/// A typed entry of one MSAN MIB table.
///
/// `TABLE` and `ENTRY` are the fixed node names used in RESTCONF URLs
/// and in the response envelope; `KIND` is the human label used in
/// diagnostics.
pub trait MibEntry: DeserializeOwned {
    const TABLE: &'static str;
    const ENTRY: &'static str;
    const KIND: &'static str;
}

/// A MIB entry addressed by a profile name.
pub trait NamedEntry: MibEntry + Serialize {
    fn name(&self) -> &str;

    /// Whether the device reports the entry as referenced by active
    /// configuration (such entries refuse deletion).
    fn in_use(&self) -> bool {
        false
    }
}

// ── ONU configuration ───────────────────────────────────────────────

/// One row of the ONU configuration table (`msanOnuCfgTable`).
///
/// The provisioning write and the deauthorize "blanking" write are both
/// PATCHes of this entry against the ONU's interface key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnuConfigEntry {
    #[serde(rename = "msanOnuCfgIfName")]
    pub if_name: String,
    #[serde(rename = "msanOnuCfgPassword", default)]
    pub password: String,
    #[serde(rename = "msanOnuCfgEnablePm", default)]
    pub enable_pm: i32,
    #[serde(rename = "msanOnuCfgSerialNumber", default)]
    pub serial_number: String,
    #[serde(rename = "msanOnuCfgAdminState", default)]
    pub admin_state: i32,
    #[serde(rename = "msanOnuCfgOnuDhcpMode", default)]
    pub dhcp_mode: i32,
    #[serde(rename = "msanOnuCfgOnuIpAddress", default)]
    pub ip_address: String,
    #[serde(rename = "msanOnuCfgOnuIPMask", default)]
    pub ip_mask: String,
    #[serde(rename = "msanOnuCfgOnuDefaultGateway", default)]
    pub default_gateway: String,
    #[serde(rename = "msanOnuCfgOnuReset", default)]
    pub reset: i32,
    #[serde(rename = "msanOnuCfgOnuResetBackupImage", default)]
    pub reset_backup_image: i32,
    #[serde(rename = "msanOnuCfgDefaultConfigFile", default)]
    pub default_config_file: String,
    #[serde(rename = "msanOnuCfgSendConfig", default)]
    pub send_config: i32,
    #[serde(rename = "msanOnuCfgSendConfigStatus", default)]
    pub send_config_status: i32,
    #[serde(rename = "msanOnuCfgOnuResync", default)]
    pub resync: i32,
    #[serde(rename = "msanOnuCfgOnuResetFactoryDefault", default)]
    pub reset_factory_default: i32,
}

impl OnuConfigEntry {
    /// Provisioning write for `serial` on `interface`, carrying the
    /// device's administrative defaults: admin up, DHCP mode on, zeroed
    /// addressing, PM disabled.
    pub fn provision(serial: &str, interface: &str) -> Self {
        Self {
            if_name: interface.to_owned(),
            password: String::new(),
            enable_pm: 0,
            serial_number: serial.to_owned(),
            admin_state: 1,
            dhcp_mode: 1,
            ip_address: "0.0.0.0".to_owned(),
            ip_mask: "0.0.0.0".to_owned(),
            default_gateway: "0.0.0.0".to_owned(),
            reset: 0,
            reset_backup_image: 0,
            default_config_file: String::new(),
            send_config: 2,
            send_config_status: 6,
            resync: 2,
            reset_factory_default: 2,
        }
    }

    /// Deauthorize write: the serial number is cleared on the interface
    /// while the config slot itself remains (blanking, not deletion).
    pub fn blank(interface: &str) -> Self {
        Self {
            if_name: interface.to_owned(),
            password: String::new(),
            enable_pm: 2,
            serial_number: String::new(),
            admin_state: 1,
            dhcp_mode: 0,
            ip_address: String::new(),
            ip_mask: String::new(),
            default_gateway: String::new(),
            reset: 0,
            reset_backup_image: 0,
            default_config_file: String::new(),
            send_config: 0,
            send_config_status: 0,
            resync: 0,
            reset_factory_default: 0,
        }
    }

    /// Whether this row has an ONU bound to it.
    pub fn is_provisioned(&self) -> bool {
        !self.serial_number.is_empty()
    }
}

impl MibEntry for OnuConfigEntry {
    const TABLE: &'static str = "msanOnuCfgTable";
    const ENTRY: &'static str = "msanOnuCfgEntry";
    const KIND: &'static str = "ONU config";
}

// ── Blacklist ───────────────────────────────────────────────────────

/// One row of the ONU blacklist table (`msanOnuBlackListTable`):
/// a device that attempted to connect but is not yet authorized.
/// Read-only on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    #[serde(rename = "msanOnuBlackListIfName")]
    pub if_name: String,
    #[serde(rename = "msanOnuBlackListSerialNumber")]
    pub serial_number: String,
    #[serde(rename = "msanOnuBlackListPassword", default)]
    pub password: String,
    #[serde(rename = "msanOnuBlackListCause", default)]
    pub cause: i32,
}

impl BlacklistEntry {
    /// Human label for the numeric blacklist cause code.
    pub fn cause_label(&self) -> &'static str {
        match self.cause {
            1 => "Invalid",
            2 => "SN Not Known",
            3 => "Password Mismatch",
            6 => "PON Link Mismatch",
            _ => "Unknown",
        }
    }
}

impl MibEntry for BlacklistEntry {
    const TABLE: &'static str = "msanOnuBlackListTable";
    const ENTRY: &'static str = "msanOnuBlackListEntry";
    const KIND: &'static str = "blacklist entry";
}

// ── Service-port bindings ───────────────────────────────────────────

/// One row of the service-port binding table
/// (`msanServicePortProfileTable`): a service profile applied to an
/// ONU interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePortEntry {
    #[serde(rename = "ifName")]
    pub if_name: String,
    #[serde(rename = "msanServiceProfileName")]
    pub service_profile_name: String,
}

impl ServicePortEntry {
    pub fn new(interface: &str, service_profile: &str) -> Self {
        Self {
            if_name: interface.to_owned(),
            service_profile_name: service_profile.to_owned(),
        }
    }
}

impl MibEntry for ServicePortEntry {
    const TABLE: &'static str = "msanServicePortProfileTable";
    const ENTRY: &'static str = "msanServicePortProfileEntry";
    const KIND: &'static str = "service-port binding";
}

// ── Service profiles ────────────────────────────────────────────────

/// One row of the service profile table (`msanServiceProfileTable`):
/// the named bundle of sub-profile references applied to an ONU
/// interface to enable a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProfileEntry {
    #[serde(rename = "msanServiceProfileName")]
    pub name: String,
    #[serde(rename = "msanServiceProfileServiceFlowProfileName", default)]
    pub flow_profile_name: String,
    #[serde(rename = "msanServiceProfileVlanProfileName", default)]
    pub vlan_profile_name: String,
    #[serde(rename = "msanServiceProfileMulticastProfileName", default)]
    pub multicast_profile_name: String,
    #[serde(rename = "msanServiceProfileSecurityProfileName", default)]
    pub security_profile_name: String,
    #[serde(rename = "msanServiceProfileOnuFlowProfileName", default)]
    pub onu_flow_profile_name: String,
    #[serde(rename = "msanServiceProfileOnuVlanProfileName", default)]
    pub onu_vlan_profile_name: String,
    #[serde(rename = "msanServiceProfileOnuTcontProfileName", default)]
    pub onu_tcont_profile_name: String,
    #[serde(rename = "msanServiceProfileOnuVirtGemPortId", default)]
    pub onu_virt_gem_port_id: i32,
    #[serde(rename = "msanServiceProfileOnuTpType", default)]
    pub onu_tp_type: i32,
    #[serde(rename = "msanServiceProfileUsage", default)]
    pub usage: i32,
}

impl MibEntry for ServiceProfileEntry {
    const TABLE: &'static str = "msanServiceProfileTable";
    const ENTRY: &'static str = "msanServiceProfileEntry";
    const KIND: &'static str = "service profile";
}

impl NamedEntry for ServiceProfileEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn in_use(&self) -> bool {
        self.usage == 1
    }
}

// ── VLAN profiles ───────────────────────────────────────────────────

/// One row of the VLAN profile table (`msanVlanProfileTable`).
///
/// The customer VLAN membership (`c_vid`) travels as a bitmap string;
/// use [`VlanProfileEntry::c_vids`] / [`VlanProfileEntry::set_c_vids`]
/// for the decoded view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanProfileEntry {
    #[serde(rename = "msanVlanProfileName")]
    pub name: String,
    #[serde(rename = "msanVlanProfileCVid", default)]
    pub c_vid: String,
    #[serde(rename = "msanVlanProfileCVidNative", default)]
    pub c_vid_native: i32,
    #[serde(rename = "msanVlanProfileCVidRemark", default)]
    pub c_vid_remark: i32,
    #[serde(rename = "msanVlanProfileSVid", default)]
    pub s_vid: i32,
    #[serde(rename = "msanVlanProfileSEtherType", default)]
    pub s_ether_type: i32,
    #[serde(rename = "msanVlanProfileNetworkPortCTag", default)]
    pub network_port_c_tag: i32,
    #[serde(rename = "msanVlanProfileUsage", default)]
    pub usage: i32,
}

impl VlanProfileEntry {
    /// A fresh profile with the device's defaults and an empty C-VID
    /// membership.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            c_vid: codec::empty_bitmap(),
            c_vid_native: -1,
            c_vid_remark: -1,
            s_vid: -1,
            s_ether_type: 34984,
            network_port_c_tag: 1,
            usage: 0,
        }
    }

    /// Decode the C-VID membership bitmap.
    pub fn c_vids(&self) -> Result<BTreeSet<u16>, VlanBitmapError> {
        codec::decode_vlan_set(&self.c_vid)
    }

    /// Replace the C-VID membership from a VLAN id set.
    pub fn set_c_vids(&mut self, vlans: &BTreeSet<u16>) -> Result<(), VlanBitmapError> {
        self.c_vid = codec::encode_vlan_set(vlans)?;
        Ok(())
    }
}

impl MibEntry for VlanProfileEntry {
    const TABLE: &'static str = "msanVlanProfileTable";
    const ENTRY: &'static str = "msanVlanProfileEntry";
    const KIND: &'static str = "VLAN profile";
}

impl NamedEntry for VlanProfileEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn in_use(&self) -> bool {
        self.usage == 1
    }
}

// ── ONU operational info ────────────────────────────────────────────

/// Operational subset of the ONU info table (`msanOnuInfoTable`).
/// Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnuInfoEntry {
    #[serde(rename = "msanOnuInfoIfName")]
    pub if_name: String,
    #[serde(rename = "msanOnuInfoSerialNumber", default)]
    pub serial_number: String,
    #[serde(rename = "msanOnuInfoVendorId", default)]
    pub vendor_id: String,
    #[serde(rename = "msanOnuInfoVersion", default)]
    pub version: String,
    #[serde(rename = "msanOnuInfoOperState", default)]
    pub oper_state: i32,
    #[serde(rename = "msanOnuInfoSysUpTime", default)]
    pub sys_up_time: i64,
    #[serde(rename = "msanOnuInfoRxPower", default)]
    pub rx_power: i32,
    #[serde(rename = "msanOnuInfoTxPower", default)]
    pub tx_power: i32,
    #[serde(rename = "msanOnuInfoOltRxPower", default)]
    pub olt_rx_power: i32,
}

impl OnuInfoEntry {
    pub fn is_up(&self) -> bool {
        self.oper_state == 1
    }
}

impl MibEntry for OnuInfoEntry {
    const TABLE: &'static str = "msanOnuInfoTable";
    const ENTRY: &'static str = "msanOnuInfoEntry";
    const KIND: &'static str = "ONU info";
}
