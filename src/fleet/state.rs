//! Fleet selection state. Fleet-wide aggregates (unique classes in use,
//! commander count, point totals) are derived from the assembled state on
//! demand so they can never drift from the assigned cards.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::card::UpgradeCard;
use crate::content::catalog::Catalog;
use crate::content::objective::ObjectiveRecord;
use crate::content::ship::ShipRecord;
use crate::content::squadron::SquadronRecord;
use crate::fleet::eligibility::COMMANDER_SLOT;

/// One ship in the fleet: chassis plus its ordered assigned upgrades.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShipBuild {
    pub chassis: ShipRecord,
    pub assigned: Vec<UpgradeCard>,
}

impl ShipBuild {
    pub fn points(&self) -> u32 {
        self.chassis.point_cost
            + self
                .assigned
                .iter()
                .map(|card| card.point_cost)
                .sum::<u32>()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SquadronSelection {
    pub squadron: SquadronRecord,
    pub count: u32,
}

impl SquadronSelection {
    pub fn points(&self) -> u32 {
        self.squadron.point_cost * self.count
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectiveSelection {
    pub assault: Option<ObjectiveRecord>,
    pub defense: Option<ObjectiveRecord>,
    pub navigation: Option<ObjectiveRecord>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FleetState {
    pub name: String,
    pub faction: String,
    pub ships: Vec<ShipBuild>,
    pub squadrons: Vec<SquadronSelection>,
    pub objectives: ObjectiveSelection,
}

impl FleetState {
    /// Union of unique-class tags across every assigned upgrade and every
    /// selected squadron. Derived, never stored.
    pub fn unique_classes_in_use(&self) -> BTreeSet<String> {
        self.unique_classes_excluding(usize::MAX, "")
    }

    /// Same, minus the contribution of one specific card on one specific
    /// ship. Used when re-evaluating a card already assigned there.
    pub fn unique_classes_excluding(&self, ship_index: usize, card_id: &str) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        for (index, ship) in self.ships.iter().enumerate() {
            for card in &ship.assigned {
                if index == ship_index && card.id == card_id {
                    continue;
                }
                tags.extend(
                    card.unique_classes
                        .iter()
                        .filter(|tag| !tag.is_empty())
                        .cloned(),
                );
            }
        }
        for selection in &self.squadrons {
            tags.extend(
                selection
                    .squadron
                    .unique_classes
                    .iter()
                    .filter(|tag| !tag.is_empty())
                    .cloned(),
            );
        }
        tags
    }

    /// Names of unique cards and squadrons already in the fleet.
    pub fn unique_names_in_use(&self) -> BTreeSet<String> {
        self.unique_names_excluding(usize::MAX, "")
    }

    pub fn unique_names_excluding(&self, ship_index: usize, card_id: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for (index, ship) in self.ships.iter().enumerate() {
            for card in &ship.assigned {
                if index == ship_index && card.id == card_id {
                    continue;
                }
                if card.is_unique {
                    names.insert(card.name.clone());
                }
            }
        }
        for selection in &self.squadrons {
            if selection.squadron.is_unique {
                names.insert(selection.squadron.name.clone());
            }
        }
        names
    }

    pub fn commander_count(&self) -> u32 {
        self.ships
            .iter()
            .flat_map(|ship| &ship.assigned)
            .filter(|card| card.slot_type == COMMANDER_SLOT)
            .count() as u32
    }

    pub fn ship_points(&self) -> u32 {
        self.ships.iter().map(ShipBuild::points).sum()
    }

    pub fn squadron_points(&self) -> u32 {
        self.squadrons.iter().map(SquadronSelection::points).sum()
    }

    pub fn total_points(&self) -> u32 {
        self.ship_points() + self.squadron_points()
    }

    pub fn totals(&self) -> FleetTotals {
        FleetTotals {
            fleet_points: self.total_points(),
            squadron_points: self.squadron_points(),
            flotilla_count: self
                .ships
                .iter()
                .filter(|ship| ship.chassis.is_flotilla())
                .count() as u32,
            ace_count: self
                .squadrons
                .iter()
                .filter(|selection| selection.squadron.is_ace)
                .map(|selection| selection.count)
                .sum(),
            commander_count: self.commander_count(),
            has_assault: self.objectives.assault.is_some(),
            has_defense: self.objectives.defense.is_some(),
            has_navigation: self.objectives.navigation.is_some(),
        }
    }
}

/// Aggregated fleet numbers the gamemode validator compares against limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetTotals {
    pub fleet_points: u32,
    pub squadron_points: u32,
    pub flotilla_count: u32,
    pub ace_count: u32,
    pub commander_count: u32,
    pub has_assault: bool,
    pub has_defense: bool,
    pub has_navigation: bool,
}

/// Wire format for a saved fleet: everything referenced by id, resolved
/// against the catalog at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetDoc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub faction: String,
    #[serde(default)]
    pub gamemode: Option<String>,
    #[serde(default)]
    pub ships: Vec<ShipDoc>,
    #[serde(default)]
    pub squadrons: Vec<SquadronDoc>,
    #[serde(default)]
    pub objectives: ObjectiveDoc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipDoc {
    pub chassis: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SquadronDoc {
    pub id: String,
    #[serde(default = "default_squadron_count")]
    pub count: u32,
}

fn default_squadron_count() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectiveDoc {
    #[serde(default)]
    pub assault: Option<String>,
    #[serde(default)]
    pub defense: Option<String>,
    #[serde(default)]
    pub navigation: Option<String>,
}

/// Ids in a fleet doc the catalog could not resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrateError {
    pub unknown: Vec<UnknownRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRef {
    pub kind: &'static str,
    pub id: String,
}

impl fmt::Display for HydrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let refs: Vec<String> = self
            .unknown
            .iter()
            .map(|r| format!("{} '{}'", r.kind, r.id))
            .collect();
        write!(f, "unknown references: {}", refs.join(", "))
    }
}

impl std::error::Error for HydrateError {}

/// Resolve a fleet doc against the catalog. Unknown ids are collected and
/// reported together rather than failing on the first.
pub fn hydrate(doc: &FleetDoc, catalog: &Catalog) -> Result<FleetState, HydrateError> {
    let mut unknown = Vec::new();
    let mut ships = Vec::new();

    for ship_doc in &doc.ships {
        let Some(chassis) = catalog.ship(&ship_doc.chassis) else {
            unknown.push(UnknownRef {
                kind: "ship",
                id: ship_doc.chassis.clone(),
            });
            continue;
        };
        let mut assigned = Vec::new();
        for upgrade_id in &ship_doc.upgrades {
            match catalog.upgrade(upgrade_id) {
                Some(card) => assigned.push(card.clone()),
                None => unknown.push(UnknownRef {
                    kind: "upgrade",
                    id: upgrade_id.clone(),
                }),
            }
        }
        ships.push(ShipBuild {
            chassis: chassis.clone(),
            assigned,
        });
    }

    let mut squadrons = Vec::new();
    for squadron_doc in &doc.squadrons {
        match catalog.squadron(&squadron_doc.id) {
            Some(squadron) => squadrons.push(SquadronSelection {
                squadron: squadron.clone(),
                count: squadron_doc.count,
            }),
            None => unknown.push(UnknownRef {
                kind: "squadron",
                id: squadron_doc.id.clone(),
            }),
        }
    }

    let mut objective = |slot: &Option<String>, kind| match slot {
        Some(id) => match catalog.objective(id) {
            Some(record) => Some(record.clone()),
            None => {
                unknown.push(UnknownRef {
                    kind,
                    id: id.clone(),
                });
                None
            }
        },
        None => None,
    };
    let objectives = ObjectiveSelection {
        assault: objective(&doc.objectives.assault, "objective"),
        defense: objective(&doc.objectives.defense, "objective"),
        navigation: objective(&doc.objectives.navigation, "objective"),
    };

    if !unknown.is_empty() {
        return Err(HydrateError { unknown });
    }

    Ok(FleetState {
        name: doc.name.clone(),
        faction: doc.faction.clone(),
        ships,
        squadrons,
        objectives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_card(name: &str, class: &str) -> UpgradeCard {
        UpgradeCard {
            id: name.to_string(),
            base_id: name.to_string(),
            name: name.to_string(),
            slot_type: "officer".to_string(),
            is_unique: true,
            unique_classes: vec![class.to_string()],
            ..UpgradeCard::default()
        }
    }

    #[test]
    fn unique_classes_are_derived_from_all_ships_and_squadrons() {
        let mut fleet = FleetState::default();
        fleet.ships.push(ShipBuild {
            assigned: vec![unique_card("Raymus Antilles", "antilles")],
            ..ShipBuild::default()
        });
        fleet.squadrons.push(SquadronSelection {
            squadron: SquadronRecord {
                is_unique: true,
                name: "Luke Skywalker".to_string(),
                unique_classes: vec!["skywalker".to_string()],
                ..SquadronRecord::default()
            },
            count: 1,
        });

        let classes = fleet.unique_classes_in_use();
        assert!(classes.contains("antilles"));
        assert!(classes.contains("skywalker"));
    }

    #[test]
    fn excluding_a_cards_own_selection_releases_its_classes() {
        let mut fleet = FleetState::default();
        fleet.ships.push(ShipBuild {
            assigned: vec![unique_card("Raymus Antilles", "antilles")],
            ..ShipBuild::default()
        });

        assert!(fleet.unique_classes_in_use().contains("antilles"));
        assert!(!fleet
            .unique_classes_excluding(0, "Raymus Antilles")
            .contains("antilles"));
    }

    #[test]
    fn totals_count_flotillas_aces_and_objectives() {
        let mut fleet = FleetState::default();
        fleet.ships.push(ShipBuild {
            chassis: ShipRecord {
                point_cost: 23,
                traits: vec!["flotilla".to_string()],
                ..ShipRecord::default()
            },
            assigned: Vec::new(),
        });
        fleet.squadrons.push(SquadronSelection {
            squadron: SquadronRecord {
                point_cost: 12,
                is_ace: true,
                ..SquadronRecord::default()
            },
            count: 2,
        });
        fleet.objectives.assault = Some(ObjectiveRecord::default());

        let totals = fleet.totals();
        assert_eq!(totals.fleet_points, 23 + 24);
        assert_eq!(totals.squadron_points, 24);
        assert_eq!(totals.flotilla_count, 1);
        assert_eq!(totals.ace_count, 2);
        assert!(totals.has_assault);
        assert!(!totals.has_navigation);
    }
}
