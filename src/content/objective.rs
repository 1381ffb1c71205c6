//! Objective cards. Gamemodes that require objectives need one of each
//! category in the fleet.

use serde::{Deserialize, Serialize};

use crate::content::errata::{self, SourcedCard};
use crate::content::card::qualify_id;

pub const OBJECTIVE_CATEGORIES: &[&str] = &["assault", "defense", "navigation"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveRecord {
    pub id: String,
    #[serde(default)]
    pub base_id: String,
    pub name: String,
    /// One of assault | defense | navigation.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub source: String,
}

impl SourcedCard for ObjectiveRecord {
    fn card_id(&self) -> &str {
        &self.id
    }
    fn card_source(&self) -> &str {
        &self.source
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObjectiveRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "type")]
    pub category: Option<String>,
}

impl RawObjectiveRecord {
    pub fn normalize(self, raw_id: &str, source: &str) -> ObjectiveRecord {
        let id = qualify_id(raw_id, source);
        let base_id = errata::base_id(&id);
        let name = self.name.unwrap_or_else(|| base_id.clone());
        ObjectiveRecord {
            id,
            base_id,
            name,
            category: self.category.unwrap_or_default(),
            source: source.to_string(),
        }
    }
}
