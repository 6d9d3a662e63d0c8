// ── Core identity types ──
//
// SerialNumber, OltPort, and InterfacePath carry the registry's
// invariants in the type system instead of bare strings.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Fixed vendor code prefixed to 8-character short-form serials.
pub const VENDOR_CODE: &str = "ISKT";

/// Full length of an ONU serial number.
pub const SERIAL_LEN: usize = 12;

const SHORT_SERIAL_LEN: usize = 8;

// ── SerialNumber ────────────────────────────────────────────────────

/// A 12-character ONU serial number.
///
/// Accepts the native 12-character form, or the 8-character short form
/// which is normalized by prefixing the vendor code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// Parse and normalize a raw serial number.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        match trimmed.len() {
            SERIAL_LEN => Ok(Self(trimmed.to_owned())),
            SHORT_SERIAL_LEN => Ok(Self(format!("{VENDOR_CODE}{trimmed}"))),
            _ => Err(CoreError::InvalidInput {
                message: format!(
                    "serial number {trimmed:?} must be {SERIAL_LEN} characters \
                     ({SHORT_SERIAL_LEN} with the {VENDOR_CODE} vendor code implied)"
                ),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SerialNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── OltPort ─────────────────────────────────────────────────────────

/// A PON port on the OLT, addressed as "shelf/slot" (e.g. `0/3`).
/// The allocation pool for ONU subinterfaces is per-port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OltPort {
    pub shelf: u16,
    pub slot: u16,
}

impl OltPort {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut parts = raw.trim().split('/');
        let (Some(shelf), Some(slot), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(bad_path(raw, "shelf/slot"));
        };
        Ok(Self {
            shelf: parse_segment(shelf, raw, "shelf/slot")?,
            slot: parse_segment(slot, raw, "shelf/slot")?,
        })
    }
}

impl fmt::Display for OltPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.shelf, self.slot)
    }
}

impl FromStr for OltPort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── InterfacePath ───────────────────────────────────────────────────

/// A logical ONU subinterface, addressed as "shelf/slot/port"
/// (e.g. `0/3/12`). The third segment is the per-port subinterface
/// slot handed out by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfacePath {
    shelf: u16,
    slot: u16,
    sub: u16,
}

impl InterfacePath {
    pub fn new(port: OltPort, sub: u16) -> Self {
        Self {
            shelf: port.shelf,
            slot: port.slot,
            sub,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut parts = raw.trim().split('/');
        let (Some(shelf), Some(slot), Some(sub), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(bad_path(raw, "shelf/slot/port"));
        };
        Ok(Self {
            shelf: parse_segment(shelf, raw, "shelf/slot/port")?,
            slot: parse_segment(slot, raw, "shelf/slot/port")?,
            sub: parse_segment(sub, raw, "shelf/slot/port")?,
        })
    }

    /// The PON port this subinterface hangs off.
    pub fn port(&self) -> OltPort {
        OltPort {
            shelf: self.shelf,
            slot: self.slot,
        }
    }

    /// The per-port subinterface slot (third segment).
    pub fn subinterface(&self) -> u16 {
        self.sub
    }
}

impl fmt::Display for InterfacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.shelf, self.slot, self.sub)
    }
}

impl FromStr for InterfacePath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for InterfacePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_segment(segment: &str, raw: &str, shape: &str) -> Result<u16, CoreError> {
    segment.parse().map_err(|_| bad_path(raw, shape))
}

fn bad_path(raw: &str, shape: &str) -> CoreError {
    CoreError::InvalidInput {
        message: format!("interface path {raw:?} is not of the form {shape}"),
    }
}

// ── OnuRegistration ─────────────────────────────────────────────────

/// One known ONU: its serial number, the subinterface it is provisioned
/// on (absent while pending), and the service profiles bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnuRegistration {
    pub serial: SerialNumber,
    pub interface: Option<InterfacePath>,
    pub services: Vec<String>,
}

impl OnuRegistration {
    /// A pre-authorized registration with no interface yet.
    pub fn pending(serial: SerialNumber) -> Self {
        Self {
            serial,
            interface: None,
            services: Vec::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.interface.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serial_accepts_native_form() {
        let sn = SerialNumber::parse("ISKT3C9A5F21").unwrap();
        assert_eq!(sn.as_str(), "ISKT3C9A5F21");
    }

    #[test]
    fn serial_normalizes_short_form() {
        let sn = SerialNumber::parse("3C9A5F21").unwrap();
        assert_eq!(sn.as_str(), "ISKT3C9A5F21");
    }

    #[test]
    fn serial_rejects_other_lengths() {
        assert!(SerialNumber::parse("SHORT").is_err());
        assert!(SerialNumber::parse("WAYTOOLONGSERIAL").is_err());
        assert!(SerialNumber::parse("").is_err());
    }

    #[test]
    fn interface_path_round_trips() {
        let path = InterfacePath::parse("0/3/12").unwrap();
        assert_eq!(path.to_string(), "0/3/12");
        assert_eq!(path.port().to_string(), "0/3");
        assert_eq!(path.subinterface(), 12);
    }

    #[test]
    fn interface_path_rejects_malformed_input() {
        assert!(InterfacePath::parse("0/3").is_err());
        assert!(InterfacePath::parse("0/3/12/9").is_err());
        assert!(InterfacePath::parse("0/x/12").is_err());
        assert!(InterfacePath::parse("").is_err());
    }

    #[test]
    fn port_parse_rejects_full_paths() {
        assert!(OltPort::parse("0/3/12").is_err());
        assert_eq!(OltPort::parse("0/3").unwrap().to_string(), "0/3");
    }
}
