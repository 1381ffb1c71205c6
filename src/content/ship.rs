//! Ship chassis records: size, traits and the ordered slot inventory.

use serde::{Deserialize, Serialize};

use crate::content::errata::{self, SourcedCard};
use crate::content::card::qualify_id;

/// Normalized ship chassis. `slots` is an ordered multiset of slot-type
/// tokens; duplicate tokens are independent physical slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipRecord {
    pub id: String,
    #[serde(default)]
    pub base_id: String,
    pub name: String,
    #[serde(default)]
    pub faction: String,
    pub size: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub point_cost: u32,
    #[serde(default)]
    pub slots: Vec<String>,
    #[serde(default)]
    pub source: String,
}

impl ShipRecord {
    pub fn is_flotilla(&self) -> bool {
        self.traits.iter().any(|t| t == "flotilla")
    }
}

impl SourcedCard for ShipRecord {
    fn card_id(&self) -> &str {
        &self.id
    }
    fn card_source(&self) -> &str {
        &self.source
    }
}

/// Raw per-source ship record, lenient like the upgrade side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawShipRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default, alias = "keywords")]
    pub traits: Option<Vec<String>>,
    #[serde(default, alias = "points", alias = "cost")]
    pub point_cost: Option<u32>,
    #[serde(default, alias = "upgradeSlots", alias = "slotTypes")]
    pub slots: Option<Vec<String>>,
}

impl RawShipRecord {
    pub fn normalize(self, raw_id: &str, source: &str) -> ShipRecord {
        let id = qualify_id(raw_id, source);
        let base_id = errata::base_id(&id);
        let name = self.name.unwrap_or_else(|| base_id.clone());
        ShipRecord {
            id,
            base_id,
            name,
            faction: self.faction.unwrap_or_default(),
            size: self.size.unwrap_or_default(),
            traits: self.traits.unwrap_or_default(),
            point_cost: self.point_cost.unwrap_or(0),
            slots: self.slots.unwrap_or_default(),
            source: source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_defaults_and_flotilla_trait() {
        let raw: RawShipRecord = serde_json::from_str(
            r#"{"name":"Gozanti Cruisers","size":"small","keywords":["flotilla"],"points":23}"#,
        )
        .unwrap();
        let ship = raw.normalize("gozanti-cruisers", "base");
        assert!(ship.is_flotilla());
        assert_eq!(ship.point_cost, 23);
        assert!(ship.slots.is_empty());
    }
}
