// ── Subinterface allocation ──
//
// First-fit over the per-port slot pool [1,128]. Saturation is detected
// explicitly: a full pool is `NoCapacity`, never a slot past the end of
// the range.

use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::model::{InterfacePath, OltPort};
use crate::registry::OnuRegistry;

/// Lowest valid subinterface slot.
pub const SLOT_MIN: u16 = 1;
/// Highest valid subinterface slot.
pub const SLOT_MAX: u16 = 128;

/// The subinterface slots already in use under `port`, sorted.
pub fn used_slots(registry: &OnuRegistry, port: OltPort) -> BTreeSet<u16> {
    registry
        .list_by_port(port)
        .iter()
        .filter_map(|reg| reg.interface.map(|intf| intf.subinterface()))
        .collect()
}

/// The next free subinterface under `port`: the numerically smallest
/// slot in [`SLOT_MIN`], [`SLOT_MAX`] not currently used. Deallocation
/// order never matters — the answer depends only on the used set.
pub fn next_available(registry: &OnuRegistry, port: OltPort) -> Result<InterfacePath, CoreError> {
    let used = used_slots(registry, port);
    (SLOT_MIN..=SLOT_MAX)
        .find(|slot| !used.contains(slot))
        .map(|slot| InterfacePath::new(port, slot))
        .ok_or_else(|| CoreError::NoCapacity {
            port: port.to_string(),
        })
}
