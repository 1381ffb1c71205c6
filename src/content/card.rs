//! Upgrade card records: the canonical shape plus lenient normalization of
//! raw per-source records. Every optional restriction field defaults to an
//! empty collection or false so downstream logic never sees "missing".

use serde::{Deserialize, Serialize};

use crate::content::errata::{self, SourcedCard};
use crate::content::source::{AMG_SOURCE, BASE_SOURCE};

/// Slot-type tokens a chassis can expose and a card can fill.
pub const SLOT_TYPES: &[&str] = &[
    "commander",
    "officer",
    "weapons-team",
    "support-team",
    "offensive-retro",
    "defensive-retro",
    "ordnance",
    "ion-cannon",
    "turbolaser",
    "super-weapon",
    "fleet-command",
    "fleet-support",
    "experimental-retro",
    "boarding-team",
    "title",
    "weapons-team-offensive-retro",
];

pub const SIZES: &[&str] = &["small", "medium", "large", "huge", "super-huge"];

/// Canonical, errata-resolved upgrade card. Immutable once resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeCard {
    /// Source-qualified id (`legacyBeta-ackbar-errata-x`).
    pub id: String,
    /// Identity shared by all printings: id minus source prefix and errata suffix.
    pub base_id: String,
    pub name: String,
    pub slot_type: String,
    /// Empty means faction-agnostic.
    #[serde(default)]
    pub factions: Vec<String>,
    #[serde(default)]
    pub point_cost: u32,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub unique_classes: Vec<String>,
    #[serde(default)]
    pub is_modification: bool,
    /// Exact-chassis binding. Title/super-weapon cards interpret this via the
    /// traits-based compatibility check instead of the generic one.
    #[serde(default)]
    pub bound_ship_type: Option<String>,
    #[serde(default)]
    pub restrictions: UpgradeRestrictions,
    /// Provenance tag.
    pub source: String,
    /// Derived lowercase blob for free-text search. Never load-bearing.
    #[serde(default)]
    pub search_index: String,
}

impl SourcedCard for UpgradeCard {
    fn card_id(&self) -> &str {
        &self.id
    }
    fn card_source(&self) -> &str {
        &self.source
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeRestrictions {
    /// Ship must exhibit at least one of these traits.
    #[serde(default)]
    pub traits: Vec<String>,
    /// Ship size must be one of these.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Slot types this card cannot share a ship with.
    #[serde(default)]
    pub disqualifies_types: Vec<String>,
    #[serde(default)]
    pub disables_types: Vec<String>,
    /// Slot types this card adds to the ship while equipped.
    #[serde(default)]
    pub enables_types: Vec<String>,
    /// Each listed type must still have an unfilled slot on the ship.
    #[serde(default)]
    pub grey_requires_types: Vec<String>,
    /// Squadron-leader keyword gating.
    #[serde(default)]
    pub required_keywords: Vec<String>,
    #[serde(default)]
    pub disallowed_keywords: Vec<String>,
    #[serde(default)]
    pub requires_flagship_commander: bool,
    #[serde(default)]
    pub disqualify_if: DisqualifyIf,
}

/// Conditional disqualification: blocked when the ship's size is listed and
/// it carries (or merely exposes a slot of) one of the listed types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisqualifyIf {
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub co_occurs_with_types: Vec<String>,
}

/// One faction or a list; upstream sources are inconsistent.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FactionField {
    One(String),
    Many(Vec<String>),
}

impl FactionField {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(faction) if faction.trim().is_empty() => Vec::new(),
            Self::One(faction) => vec![faction],
            Self::Many(factions) => factions,
        }
    }
}

/// Raw per-source upgrade record, tolerant of the field spellings the
/// various community datasets use. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUpgradeRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "type", alias = "upgradeType", alias = "slot")]
    pub slot_type: Option<String>,
    #[serde(default, alias = "faction")]
    pub factions: Option<FactionField>,
    #[serde(default, alias = "points", alias = "cost")]
    pub point_cost: Option<u32>,
    #[serde(default, alias = "unique")]
    pub is_unique: Option<bool>,
    #[serde(default, alias = "uniqueClass", alias = "unique_class")]
    pub unique_classes: Option<Vec<String>>,
    #[serde(default, alias = "modification")]
    pub is_modification: Option<bool>,
    #[serde(default, alias = "shipType", alias = "boundShipType")]
    pub bound_ship_type: Option<String>,
    #[serde(default)]
    pub restrictions: Option<RawRestrictions>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRestrictions {
    #[serde(default)]
    pub traits: Option<Vec<String>>,
    #[serde(default, alias = "size")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, alias = "disqualifies")]
    pub disqualifies_types: Option<Vec<String>>,
    #[serde(default, alias = "disables")]
    pub disables_types: Option<Vec<String>>,
    #[serde(default, alias = "enables")]
    pub enables_types: Option<Vec<String>>,
    #[serde(default, alias = "greyRequires", alias = "grey_requires")]
    pub grey_requires_types: Option<Vec<String>>,
    #[serde(default, alias = "requiredKeywords")]
    pub required_keywords: Option<Vec<String>>,
    #[serde(default, alias = "disallowedKeywords")]
    pub disallowed_keywords: Option<Vec<String>>,
    #[serde(default, alias = "flagship")]
    pub requires_flagship_commander: Option<bool>,
    #[serde(default, alias = "disqualifyIf")]
    pub disqualify_if: Option<RawDisqualifyIf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDisqualifyIf {
    #[serde(default)]
    pub sizes: Option<Vec<String>>,
    #[serde(default, alias = "coOccursWithTypes", alias = "types")]
    pub co_occurs_with_types: Option<Vec<String>>,
}

impl RawUpgradeRecord {
    /// Normalize into the canonical shape. `raw_id` is the dictionary key;
    /// community records get their source tag prefixed unless already present.
    pub fn normalize(self, raw_id: &str, source: &str) -> UpgradeCard {
        let id = qualify_id(raw_id, source);
        let base_id = errata::base_id(&id);
        let name = self.name.unwrap_or_else(|| base_id.clone());
        let slot_type = self.slot_type.unwrap_or_default();
        let factions = self.factions.map(FactionField::into_vec).unwrap_or_default();
        let restrictions = self.restrictions.unwrap_or_default().normalize();
        let search_index = build_search_index(
            &name,
            &slot_type,
            &factions,
            &restrictions.traits,
            self.text.as_deref().unwrap_or(""),
        );

        UpgradeCard {
            id,
            base_id,
            name,
            slot_type,
            factions,
            point_cost: self.point_cost.unwrap_or(0),
            is_unique: self.is_unique.unwrap_or(false),
            unique_classes: self.unique_classes.unwrap_or_default(),
            is_modification: self.is_modification.unwrap_or(false),
            bound_ship_type: self.bound_ship_type.filter(|ship| !ship.trim().is_empty()),
            restrictions,
            source: source.to_string(),
            search_index,
        }
    }
}

impl RawRestrictions {
    fn normalize(self) -> UpgradeRestrictions {
        let disqualify_if = self.disqualify_if.unwrap_or_default();
        UpgradeRestrictions {
            traits: self.traits.unwrap_or_default(),
            sizes: self.sizes.unwrap_or_default(),
            disqualifies_types: self.disqualifies_types.unwrap_or_default(),
            disables_types: self.disables_types.unwrap_or_default(),
            enables_types: self.enables_types.unwrap_or_default(),
            grey_requires_types: self.grey_requires_types.unwrap_or_default(),
            required_keywords: self.required_keywords.unwrap_or_default(),
            disallowed_keywords: self.disallowed_keywords.unwrap_or_default(),
            requires_flagship_commander: self.requires_flagship_commander.unwrap_or(false),
            disqualify_if: DisqualifyIf {
                sizes: disqualify_if.sizes.unwrap_or_default(),
                co_occurs_with_types: disqualify_if.co_occurs_with_types.unwrap_or_default(),
            },
        }
    }
}

/// Canonical id: community records carry their source tag as a prefix.
pub fn qualify_id(raw_id: &str, source: &str) -> String {
    if source == BASE_SOURCE || source == AMG_SOURCE || raw_id.starts_with(&format!("{source}-")) {
        raw_id.to_string()
    } else {
        format!("{source}-{raw_id}")
    }
}

fn build_search_index(
    name: &str,
    slot_type: &str,
    factions: &[String],
    traits: &[String],
    text: &str,
) -> String {
    let mut parts: Vec<&str> = vec![name, slot_type];
    parts.extend(factions.iter().map(String::as_str));
    parts.extend(traits.iter().map(String::as_str));
    parts.push(text);
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
