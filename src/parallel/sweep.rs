//! Whole-catalog eligibility sweep: evaluate every upgrade card against one
//! ship in parallel. The evaluator mutates nothing, so candidates can be
//! checked concurrently without coordination.

use rayon::prelude::*;
use serde::Serialize;

use crate::content::catalog::Catalog;
use crate::fleet::eligibility::{self, FleetContext, ShipContext};
use crate::fleet::gamemode::GamemodeProfile;
use crate::fleet::slots::SlotPools;
use crate::fleet::state::FleetState;
use crate::parallel::pool::WorkerPool;

/// One candidate's verdict from a sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepEntry {
    pub card_id: String,
    pub eligible: bool,
    pub greyed_out: bool,
    pub violations: Vec<String>,
}

/// Evaluate the full catalog for the ship at `ship_index`, optionally
/// narrowed to one slot type. Results keep catalog order.
pub fn sweep_catalog(
    catalog: &Catalog,
    fleet: &FleetState,
    ship_index: usize,
    profile: &GamemodeProfile,
    slot_type: Option<&str>,
    pools: &SlotPools,
    pool: &WorkerPool,
) -> Vec<SweepEntry> {
    let Some(build) = fleet.ships.get(ship_index) else {
        return Vec::new();
    };
    let ship = ShipContext::from_build(build);
    let fleet_ctx = FleetContext::from_state(fleet);

    pool.install(|| {
        catalog
            .upgrades
            .par_iter()
            .filter(|card| slot_type.map_or(true, |slot| card.slot_type == slot))
            .map(|card| {
                let violations =
                    eligibility::evaluate(card, &ship, &fleet_ctx, profile, None, pools);
                SweepEntry {
                    card_id: card.id.clone(),
                    eligible: violations.is_empty(),
                    greyed_out: eligibility::is_greyed_out(card, &fleet_ctx, profile),
                    violations,
                }
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::card::UpgradeCard;
    use crate::content::ship::ShipRecord;
    use crate::fleet::state::ShipBuild;

    fn catalog_with(cards: Vec<UpgradeCard>) -> Catalog {
        Catalog {
            upgrades: cards,
            ..Catalog::default()
        }
    }

    fn officer(id: &str) -> UpgradeCard {
        UpgradeCard {
            id: id.to_string(),
            base_id: id.to_string(),
            name: id.to_string(),
            slot_type: "officer".to_string(),
            ..UpgradeCard::default()
        }
    }

    fn one_ship_fleet() -> FleetState {
        FleetState {
            ships: vec![ShipBuild {
                chassis: ShipRecord {
                    id: "cr90".to_string(),
                    base_id: "cr90".to_string(),
                    size: "small".to_string(),
                    slots: vec!["officer".to_string()],
                    ..ShipRecord::default()
                },
                assigned: Vec::new(),
            }],
            ..FleetState::default()
        }
    }

    #[test]
    fn sweep_keeps_catalog_order_and_flags_contention() {
        let mut contested = officer("leia");
        contested.is_unique = true;
        contested.unique_classes = vec!["organa".to_string()];
        let catalog = catalog_with(vec![officer("a"), contested, officer("b")]);

        let mut fleet = one_ship_fleet();
        let mut in_play = officer("leia-other");
        in_play.unique_classes = vec!["organa".to_string()];
        fleet.ships[0].assigned.push(in_play);

        let entries = sweep_catalog(
            &catalog,
            &fleet,
            0,
            &GamemodeProfile::unrestricted(),
            None,
            &SlotPools::builtin(),
            &WorkerPool::default_workers(),
        );

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].card_id, "a");
        assert!(entries[0].eligible);
        assert_eq!(entries[1].card_id, "leia");
        assert!(!entries[1].eligible);
        assert!(entries[1].greyed_out);
        assert_eq!(entries[2].card_id, "b");
    }

    #[test]
    fn missing_ship_index_yields_empty_sweep() {
        let catalog = catalog_with(vec![officer("a")]);
        let entries = sweep_catalog(
            &catalog,
            &FleetState::default(),
            0,
            &GamemodeProfile::unrestricted(),
            None,
            &SlotPools::builtin(),
            &WorkerPool::default_workers(),
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn slot_filter_narrows_the_sweep() {
        let mut title = officer("defiance");
        title.slot_type = "title".to_string();
        let catalog = catalog_with(vec![officer("a"), title]);

        let entries = sweep_catalog(
            &catalog,
            &one_ship_fleet(),
            0,
            &GamemodeProfile::unrestricted(),
            Some("title"),
            &SlotPools::builtin(),
            &WorkerPool::default_workers(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].card_id, "defiance");
    }
}
