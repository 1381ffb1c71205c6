//! Squadron records: keywords drive leader-upgrade gating, aces count
//! against gamemode limits.

use serde::{Deserialize, Serialize};

use crate::content::errata::{self, SourcedCard};
use crate::content::card::qualify_id;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SquadronRecord {
    pub id: String,
    #[serde(default)]
    pub base_id: String,
    pub name: String,
    #[serde(default)]
    pub faction: String,
    #[serde(default)]
    pub point_cost: u32,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub unique_classes: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub is_ace: bool,
    #[serde(default)]
    pub source: String,
}

impl SourcedCard for SquadronRecord {
    fn card_id(&self) -> &str {
        &self.id
    }
    fn card_source(&self) -> &str {
        &self.source
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSquadronRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default, alias = "points", alias = "cost")]
    pub point_cost: Option<u32>,
    #[serde(default, alias = "unique")]
    pub is_unique: Option<bool>,
    #[serde(default, alias = "uniqueClass", alias = "unique_class")]
    pub unique_classes: Option<Vec<String>>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default, alias = "ace")]
    pub is_ace: Option<bool>,
}

impl RawSquadronRecord {
    pub fn normalize(self, raw_id: &str, source: &str) -> SquadronRecord {
        let id = qualify_id(raw_id, source);
        let base_id = errata::base_id(&id);
        let name = self.name.unwrap_or_else(|| base_id.clone());
        SquadronRecord {
            id,
            base_id,
            name,
            faction: self.faction.unwrap_or_default(),
            point_cost: self.point_cost.unwrap_or(0),
            is_unique: self.is_unique.unwrap_or(false),
            unique_classes: self.unique_classes.unwrap_or_default(),
            keywords: self.keywords.unwrap_or_default(),
            is_ace: self.is_ace.unwrap_or(false),
            source: source.to_string(),
        }
    }
}
