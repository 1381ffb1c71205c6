//! Slot availability for a ship chassis. Combined slots are declared as
//! data: a slot type may draw from other types' pools, consuming one unit of
//! each when filled instead of a unit of its own declared count.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::card::UpgradeCard;

/// Declarative slot-pool table. Ordinary types have no entry and draw from
/// their own pool; a combined type lists the pools it draws from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotPools {
    #[serde(default)]
    draws_from: BTreeMap<String, Vec<String>>,
}

impl SlotPools {
    /// The shipped rules: one combined weapons-team/offensive-retro slot.
    pub fn builtin() -> Self {
        SlotPools::default().with_pool(
            "weapons-team-offensive-retro",
            &["weapons-team", "offensive-retro"],
        )
    }

    pub fn with_pool(mut self, combined: &str, draws_from: &[&str]) -> Self {
        self.draws_from.insert(
            combined.to_string(),
            draws_from.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Pools a filled slot of this type consumes from. Empty for ordinary
    /// types (they consume their own declared count).
    pub fn pools_for(&self, slot_type: &str) -> &[String] {
        self.draws_from
            .get(slot_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_combined(&self, slot_type: &str) -> bool {
        self.draws_from.contains_key(slot_type)
    }
}

/// Declared physical slots per type, from the chassis inventory.
pub fn declared_counts(inventory: &[String]) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();
    for token in inventory {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

/// Units consumed per pool by the assigned upgrades. An ordinary upgrade
/// consumes one unit of its own type; a combined upgrade consumes one unit
/// of every pool it draws from.
pub fn used_counts(assigned: &[UpgradeCard], pools: &SlotPools) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();
    for card in assigned {
        let drawn = pools.pools_for(&card.slot_type);
        if drawn.is_empty() {
            *counts.entry(card.slot_type.clone()).or_insert(0) += 1;
        } else {
            for pool in drawn {
                *counts.entry(pool.clone()).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Remaining availability per slot type the inventory exposes.
///
/// Ordinary type: declared minus consumed. Combined type: the minimum of its
/// drawn-from pools' availability, further capped by its own unfilled
/// instances; a combined instance is only usable while every underlying pool
/// still has room.
pub fn availability(
    inventory: &[String],
    assigned: &[UpgradeCard],
    pools: &SlotPools,
) -> BTreeMap<String, i64> {
    let declared = declared_counts(inventory);
    let used = used_counts(assigned, pools);

    let mut available = BTreeMap::new();
    for (slot_type, count) in &declared {
        if pools.is_combined(slot_type) {
            continue;
        }
        let remaining = count - used.get(slot_type).copied().unwrap_or(0);
        available.insert(slot_type.clone(), remaining);
    }
    for (slot_type, count) in &declared {
        if !pools.is_combined(slot_type) {
            continue;
        }
        let direct_fills = assigned
            .iter()
            .filter(|card| card.slot_type == *slot_type)
            .count() as i64;
        let own_remaining = count - direct_fills;
        let pool_remaining = pools
            .pools_for(slot_type)
            .iter()
            .map(|pool| available.get(pool).copied().unwrap_or(0))
            .min()
            .unwrap_or(0);
        available.insert(slot_type.clone(), own_remaining.min(pool_remaining).max(0));
    }
    available
}

/// Whether one physical slot instance can still take a card. Instances of a
/// type are indexed by occurrence order in the inventory; the first N are
/// considered filled, N = units consumed from that type's pool.
pub fn is_fillable(
    inventory: &[String],
    assigned: &[UpgradeCard],
    pools: &SlotPools,
    slot_type: &str,
    instance_index: usize,
) -> bool {
    let declared = declared_counts(inventory)
        .get(slot_type)
        .copied()
        .unwrap_or(0);
    if instance_index as i64 >= declared {
        return false;
    }

    if pools.is_combined(slot_type) {
        let direct_fills = assigned
            .iter()
            .filter(|card| card.slot_type == slot_type)
            .count() as i64;
        if (instance_index as i64) < direct_fills {
            return false;
        }
        let available = availability(inventory, assigned, pools);
        pools
            .pools_for(slot_type)
            .iter()
            .all(|pool| available.get(pool).copied().unwrap_or(0) > 0)
    } else {
        let used = used_counts(assigned, pools)
            .get(slot_type)
            .copied()
            .unwrap_or(0);
        instance_index as i64 >= used
    }
}
