//! Upgrade eligibility: every applicable rule is evaluated and every failed
//! rule contributes its own reason string, in a fixed order, so the host can
//! show the full explanation at once. Violations are data, never errors.

use std::collections::BTreeSet;

use crate::content::card::UpgradeCard;
use crate::fleet::gamemode::GamemodeProfile;
use crate::fleet::slots::{self, SlotPools};
use crate::fleet::state::{FleetState, ShipBuild};

pub const COMMANDER_SLOT: &str = "commander";
pub const TITLE_SLOT: &str = "title";
pub const SUPER_WEAPON_SLOT: &str = "super-weapon";

/// Hull sizes that can never host slot-enabling upgrades.
const HUGE_SIZES: &[&str] = &["huge", "super-huge"];

/// The candidate's target ship, read-only.
#[derive(Debug, Clone, Copy)]
pub struct ShipContext<'a> {
    pub ship_type: &'a str,
    pub size: &'a str,
    pub traits: &'a [String],
    pub inventory: &'a [String],
    pub assigned: &'a [UpgradeCard],
}

impl<'a> ShipContext<'a> {
    pub fn from_build(build: &'a ShipBuild) -> Self {
        ShipContext {
            ship_type: &build.chassis.base_id,
            size: &build.chassis.size,
            traits: &build.chassis.traits,
            inventory: &build.chassis.slots,
            assigned: &build.assigned,
        }
    }
}

/// Fleet-wide contention state, derived from the assembled fleet.
#[derive(Debug, Clone, Default)]
pub struct FleetContext {
    pub unique_classes_in_use: BTreeSet<String>,
    pub unique_names_in_use: BTreeSet<String>,
}

impl FleetContext {
    pub fn from_state(fleet: &FleetState) -> Self {
        FleetContext {
            unique_classes_in_use: fleet.unique_classes_in_use(),
            unique_names_in_use: fleet.unique_names_in_use(),
        }
    }

    /// Context for re-evaluating a card already assigned to a ship: its own
    /// prior selection must not block it.
    pub fn excluding(fleet: &FleetState, ship_index: usize, card_id: &str) -> Self {
        FleetContext {
            unique_classes_in_use: fleet.unique_classes_excluding(ship_index, card_id),
            unique_names_in_use: fleet.unique_names_excluding(ship_index, card_id),
        }
    }
}

fn is_huge(size: &str) -> bool {
    HUGE_SIZES.contains(&size)
}

fn overlaps(wanted: &[String], actual: &[String]) -> bool {
    wanted.iter().any(|item| actual.contains(item))
}

/// Evaluate one candidate card against a ship and the fleet. Empty result
/// means the card may be attached. `squadron_keywords` is Some only when
/// evaluating a squadron-leader style upgrade.
pub fn evaluate(
    card: &UpgradeCard,
    ship: &ShipContext<'_>,
    fleet: &FleetContext,
    profile: &GamemodeProfile,
    squadron_keywords: Option<&[String]>,
    pools: &SlotPools,
) -> Vec<String> {
    let mut violations = Vec::new();
    let is_title_like = card.slot_type == TITLE_SLOT || card.slot_type == SUPER_WEAPON_SLOT;

    // 1. Gamemode commander allow/deny lists.
    if card.slot_type == COMMANDER_SLOT {
        if profile.disallowed_commanders.contains(&card.name) {
            violations.push(format!(
                "Commander {} is not allowed in {}",
                card.name, profile.name
            ));
        }
        if !profile.allowed_commanders.is_empty()
            && !profile.allowed_commanders.contains(&card.name)
        {
            violations.push(format!(
                "Commander {} is not on the allowed list for {}",
                card.name, profile.name
            ));
        }
    }

    // 2. Gamemode unique-class allow/deny lists.
    for tag in card.unique_classes.iter().filter(|tag| !tag.is_empty()) {
        if profile.disallowed_upgrade_unique_classes.contains(tag) {
            violations.push(format!(
                "Unique class {} is not allowed in {}",
                tag, profile.name
            ));
        }
        if !profile.allowed_upgrade_unique_classes.is_empty()
            && !profile.allowed_upgrade_unique_classes.contains(tag)
        {
            violations.push(format!(
                "Unique class {} is not on the allowed list for {}",
                tag, profile.name
            ));
        }
    }

    // 3. Fleet-wide unique-class contention.
    for tag in card.unique_classes.iter().filter(|tag| !tag.is_empty()) {
        if fleet.unique_classes_in_use.contains(tag) {
            violations.push(format!("Unique class {tag} is already in use in this fleet"));
        }
    }

    // 4. Exact-chassis binding (title/super-weapon use check 5 instead).
    if !is_title_like {
        if let Some(bound) = &card.bound_ship_type {
            if bound != ship.ship_type {
                violations.push(format!("Can only be equipped on {bound}"));
            }
        }
    }

    // 5. Title/super-weapon compatibility: chassis when bound, traits when declared.
    if is_title_like {
        if let Some(bound) = &card.bound_ship_type {
            if bound != ship.ship_type {
                violations.push(format!("Can only be equipped on {bound}"));
            }
        }
        if !card.restrictions.traits.is_empty()
            && !overlaps(&card.restrictions.traits, ship.traits)
        {
            violations.push(format!(
                "Requires a ship with one of these traits: {}",
                card.restrictions.traits.join(", ")
            ));
        }
    }

    // 6. Uniqueness by name, fleet-wide or on this very ship.
    if card.is_unique {
        let on_this_ship = ship.assigned.iter().any(|other| other.name == card.name);
        if on_this_ship || fleet.unique_names_in_use.contains(&card.name) {
            violations.push(format!("{} is unique and already in use", card.name));
        }
    }

    // 7. One modification per ship.
    if card.is_modification && ship.assigned.iter().any(|other| other.is_modification) {
        violations.push("Only one modification can be equipped per ship".to_string());
    }

    // 8. Disqualified/disabled pairings, both directions.
    let blocked_by_candidate: Vec<&String> = card
        .restrictions
        .disqualifies_types
        .iter()
        .chain(&card.restrictions.disables_types)
        .collect();
    for other in ship.assigned {
        if blocked_by_candidate.contains(&&other.slot_type) {
            violations.push(format!(
                "Cannot be equipped together with a {} upgrade",
                other.slot_type
            ));
        }
    }
    for other in ship.assigned {
        let blocks_candidate = other
            .restrictions
            .disqualifies_types
            .iter()
            .chain(&other.restrictions.disables_types)
            .any(|blocked| *blocked == card.slot_type);
        if blocks_candidate {
            violations.push(format!("{} prevents equipping this card", other.name));
        }
    }

    // 9. Size restriction.
    if !card.restrictions.sizes.is_empty()
        && !card.restrictions.sizes.iter().any(|size| size == ship.size)
    {
        violations.push(format!(
            "Requires a {} ship",
            card.restrictions.sizes.join(" or ")
        ));
    }

    // 10. Trait restriction (title/super-weapon already handled in check 5).
    if !is_title_like
        && !card.restrictions.traits.is_empty()
        && !overlaps(&card.restrictions.traits, ship.traits)
    {
        violations.push(format!(
            "Requires a ship with one of these traits: {}",
            card.restrictions.traits.join(", ")
        ));
    }

    // 11. Squadron-leader keyword gating.
    if let Some(keywords) = squadron_keywords {
        if !card.restrictions.required_keywords.is_empty()
            && !card
                .restrictions
                .required_keywords
                .iter()
                .any(|keyword| keywords.contains(keyword))
        {
            violations.push(format!(
                "Requires a squadron with one of these keywords: {}",
                card.restrictions.required_keywords.join(", ")
            ));
        }
        for keyword in &card.restrictions.disallowed_keywords {
            if keywords.contains(keyword) {
                violations.push(format!(
                    "Cannot be equipped by squadrons with the {keyword} keyword"
                ));
            }
        }
    }

    // 12. Flagship requirement.
    if card.restrictions.requires_flagship_commander
        && !ship
            .assigned
            .iter()
            .any(|other| other.slot_type == COMMANDER_SLOT)
    {
        violations.push("Requires the fleet commander to be aboard this ship".to_string());
    }

    // 13. Conditional disqualification: size matches and the co-occurring
    // type is assigned or merely present in the inventory.
    let disqualify_if = &card.restrictions.disqualify_if;
    if disqualify_if.sizes.iter().any(|size| size == ship.size) {
        for blocked in &disqualify_if.co_occurs_with_types {
            let assigned = ship.assigned.iter().any(|other| other.slot_type == *blocked);
            let in_inventory = ship.inventory.contains(blocked);
            if assigned || in_inventory {
                violations.push(format!(
                    "Cannot be equipped on {} ships with a {} slot",
                    ship.size, blocked
                ));
            }
        }
    }

    // 14. Grey-slot gating: each listed type needs an unfilled slot.
    if !card.restrictions.grey_requires_types.is_empty() {
        let available = slots::availability(ship.inventory, ship.assigned, pools);
        for required in &card.restrictions.grey_requires_types {
            if available.get(required).copied().unwrap_or(0) <= 0 {
                violations.push(format!("Requires an open {required} slot"));
            }
        }
    }

    // 15. Huge hulls cannot host slot-enabling upgrades.
    if is_huge(ship.size) && !card.restrictions.enables_types.is_empty() {
        violations
            .push("Huge ships cannot equip upgrades that grant additional slots".to_string());
    }

    violations
}

/// Whether the card is currently unselectable purely from fleet-wide
/// contention or the gamemode's lists, independent of any one ship's local
/// state. A greyed card becomes selectable again by freeing the conflicting
/// resource elsewhere in the fleet.
pub fn is_greyed_out(card: &UpgradeCard, fleet: &FleetContext, profile: &GamemodeProfile) -> bool {
    let class_contested = card
        .unique_classes
        .iter()
        .any(|tag| !tag.is_empty() && fleet.unique_classes_in_use.contains(tag));
    if class_contested {
        return true;
    }

    if card.slot_type == COMMANDER_SLOT {
        if profile.disallowed_commanders.contains(&card.name) {
            return true;
        }
        if !profile.allowed_commanders.is_empty()
            && !profile.allowed_commanders.contains(&card.name)
        {
            return true;
        }
    }

    card.unique_classes.iter().any(|tag| {
        !tag.is_empty()
            && (profile.disallowed_upgrade_unique_classes.contains(tag)
                || (!profile.allowed_upgrade_unique_classes.is_empty()
                    && !profile.allowed_upgrade_unique_classes.contains(tag)))
    })
}
