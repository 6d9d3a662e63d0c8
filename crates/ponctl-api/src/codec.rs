//! VLAN membership bitmap codec.
//!
//! VLAN-bearing profile tables carry VLAN sets as a base64-encoded
//! 512-byte vector: 4096 bits where bit *i* set means VLAN *i* is a
//! member. Only ids 1–4095 are valid members; bit 0 is an unused
//! sentinel. Within a byte the device counts bits from the most
//! significant end, so VLAN *i* lives at bit `7 - (i % 8)` of byte
//! `i / 8`.

use std::collections::BTreeSet;

use base64::Engine;
use thiserror::Error;

/// Length of the decoded bitmap in bytes.
pub const BITMAP_LEN: usize = 512;

/// Lowest valid VLAN id.
pub const VLAN_MIN: u16 = 1;
/// Highest valid VLAN id.
pub const VLAN_MAX: u16 = 4095;

const ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// Errors from the bitmap codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VlanBitmapError {
    /// A VLAN id outside the valid range was supplied.
    #[error("VLAN id {0} outside {VLAN_MIN}..={VLAN_MAX}")]
    OutOfRange(u32),

    /// A token could not be read as a VLAN id at all.
    #[error("not a VLAN id: {0:?}")]
    NotANumber(String),

    /// The wire value is not a well-formed bitmap. Never silently
    /// truncated: a wrong-length vector is an error, not a partial set.
    #[error("malformed VLAN bitmap: {0}")]
    Decode(String),
}

/// The canonical all-zero bitmap, used as the wire default for fields
/// with no VLAN membership.
pub fn empty_bitmap() -> String {
    ENGINE.encode([0u8; BITMAP_LEN])
}

/// Encode a VLAN id set into its base64 wire form.
///
/// Order-independent by construction. The empty set encodes to
/// [`empty_bitmap`].
pub fn encode_vlan_set(vlans: &BTreeSet<u16>) -> Result<String, VlanBitmapError> {
    let mut bytes = [0u8; BITMAP_LEN];
    for &id in vlans {
        if !(VLAN_MIN..=VLAN_MAX).contains(&id) {
            return Err(VlanBitmapError::OutOfRange(u32::from(id)));
        }
        let byte = usize::from(id / 8);
        let bit = 7 - (id % 8);
        bytes[byte] |= 1 << bit;
    }
    Ok(ENGINE.encode(bytes))
}

/// Decode a base64 wire bitmap back into the VLAN id set it represents.
pub fn decode_vlan_set(encoded: &str) -> Result<BTreeSet<u16>, VlanBitmapError> {
    let bytes = ENGINE
        .decode(encoded.trim())
        .map_err(|e| VlanBitmapError::Decode(e.to_string()))?;
    if bytes.len() != BITMAP_LEN {
        return Err(VlanBitmapError::Decode(format!(
            "expected {BITMAP_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    let mut found = BTreeSet::new();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte == 0 {
            continue;
        }
        for bit in 0..8u16 {
            if byte & (1 << (7 - bit)) != 0 {
                #[allow(clippy::cast_possible_truncation)]
                found.insert(index as u16 * 8 + bit);
            }
        }
    }
    Ok(found)
}

/// Parse user input (space/tab/comma separated ids, e.g. `"100 101,200"`)
/// into a VLAN id set, rejecting anything outside the valid range before
/// an encode is attempted.
pub fn parse_vlan_list(input: &str) -> Result<BTreeSet<u16>, VlanBitmapError> {
    let mut set = BTreeSet::new();
    for token in input.split([' ', '\t', ',']).filter(|t| !t.is_empty()) {
        let id: u32 = token
            .parse()
            .map_err(|_| VlanBitmapError::NotANumber(token.to_owned()))?;
        if !(u32::from(VLAN_MIN)..=u32::from(VLAN_MAX)).contains(&id) {
            return Err(VlanBitmapError::OutOfRange(id));
        }
        #[allow(clippy::cast_possible_truncation)]
        set.insert(id as u16);
    }
    Ok(set)
}
