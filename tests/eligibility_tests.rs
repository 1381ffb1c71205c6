use std::path::PathBuf;

use flagship::content::catalog::Catalog;
use flagship::content::errata::load_errata_registry;
use flagship::content::loader;
use flagship::content::resolver::resolve;
use flagship::content::source::EnabledSources;
use flagship::fleet::eligibility::{evaluate, is_greyed_out, FleetContext, ShipContext};
use flagship::fleet::gamemode::GamemodeProfile;
use flagship::fleet::slots::SlotPools;
use flagship::fleet::state::{hydrate, FleetDoc};

fn shipped_catalog() -> Catalog {
    let data_dir = PathBuf::from("data");
    let enabled = EnabledSources::none();
    let raw = loader::load_raw_content(&data_dir, &enabled);
    let registry =
        load_errata_registry(data_dir.join("errata.json")).expect("shipped registry should load");
    resolve(&raw, &enabled, &registry)
}

fn fleet_doc(json: &str) -> FleetDoc {
    serde_json::from_str(json).expect("fleet doc fixture should parse")
}

#[test]
fn unique_class_contention_greys_the_card_until_the_holder_is_removed() {
    let catalog = shipped_catalog();
    let doc = fleet_doc(
        r#"{
            "name": "Home One's escorts",
            "faction": "rebels",
            "ships": [
                {"chassis": "mc80-command", "upgrades": ["raymus-antilles"]},
                {"chassis": "cr90-corvette", "upgrades": []}
            ]
        }"#,
    );
    let fleet = hydrate(&doc, &catalog).expect("fleet should hydrate");
    let antilles = catalog
        .upgrade("raymus-antilles")
        .expect("card should exist");

    // Candidate for ship 2 while ship 1 holds the class.
    let fleet_ctx = FleetContext::from_state(&fleet);
    let profile = GamemodeProfile::unrestricted();
    assert!(is_greyed_out(antilles, &fleet_ctx, &profile));

    let ship = ShipContext::from_build(&fleet.ships[1]);
    let violations = evaluate(
        antilles,
        &ship,
        &fleet_ctx,
        &profile,
        None,
        &SlotPools::builtin(),
    );
    assert!(violations
        .iter()
        .any(|v| v == "Unique class antilles is already in use in this fleet"));

    // Remove the holder; the card is free again.
    let mut without_holder = fleet;
    without_holder.ships[0].assigned.clear();
    let fleet_ctx = FleetContext::from_state(&without_holder);
    assert!(!is_greyed_out(antilles, &fleet_ctx, &profile));
    let ship = ShipContext::from_build(&without_holder.ships[1]);
    assert!(evaluate(
        antilles,
        &ship,
        &fleet_ctx,
        &profile,
        None,
        &SlotPools::builtin(),
    )
    .is_empty());
}

#[test]
fn re_evaluating_an_assigned_card_does_not_conflict_with_itself() {
    let catalog = shipped_catalog();
    let doc = fleet_doc(
        r#"{
            "ships": [{"chassis": "mc80-command", "upgrades": ["raymus-antilles"]}]
        }"#,
    );
    let fleet = hydrate(&doc, &catalog).expect("fleet should hydrate");
    let antilles = catalog
        .upgrade("raymus-antilles")
        .expect("card should exist");
    let profile = GamemodeProfile::unrestricted();

    // Plain context sees the class as taken.
    let taken = FleetContext::from_state(&fleet);
    assert!(is_greyed_out(antilles, &taken, &profile));

    // Excluding its own selection, the card stays legal on its ship. The
    // on-ship copy also must not trip the by-name uniqueness check, so the
    // ship context drops it too.
    let own = FleetContext::excluding(&fleet, 0, &antilles.id);
    let remaining: Vec<_> = fleet.ships[0]
        .assigned
        .iter()
        .filter(|card| card.id != antilles.id)
        .cloned()
        .collect();
    let chassis = &fleet.ships[0].chassis;
    let ship = ShipContext {
        ship_type: &chassis.base_id,
        size: &chassis.size,
        traits: &chassis.traits,
        inventory: &chassis.slots,
        assigned: &remaining,
    };
    assert!(evaluate(antilles, &ship, &own, &profile, None, &SlotPools::builtin()).is_empty());
}

#[test]
fn title_binding_and_trait_gate_work_through_the_catalog() {
    let catalog = shipped_catalog();
    let doc = fleet_doc(
        r#"{
            "ships": [
                {"chassis": "cr90-corvette", "upgrades": []},
                {"chassis": "mc80-command", "upgrades": []}
            ]
        }"#,
    );
    let fleet = hydrate(&doc, &catalog).expect("fleet should hydrate");
    let fleet_ctx = FleetContext::from_state(&fleet);
    let profile = GamemodeProfile::unrestricted();
    let pools = SlotPools::builtin();

    // Defiance is bound to the MC80: rejected on the corvette, fine on the MC80.
    let defiance = catalog.upgrade("defiance").expect("card should exist");
    let corvette = ShipContext::from_build(&fleet.ships[0]);
    let violations = evaluate(defiance, &corvette, &fleet_ctx, &profile, None, &pools);
    assert_eq!(violations, vec!["Can only be equipped on mc80-command".to_string()]);
    let mc80 = ShipContext::from_build(&fleet.ships[1]);
    assert!(evaluate(defiance, &mc80, &fleet_ctx, &profile, None, &pools).is_empty());

    // Jaina's Light needs the corvette trait: fine on the corvette, rejected
    // on the MC80.
    let jainas = catalog.upgrade("jainas-light").expect("card should exist");
    assert!(evaluate(jainas, &corvette, &fleet_ctx, &profile, None, &pools).is_empty());
    let violations = evaluate(jainas, &mc80, &fleet_ctx, &profile, None, &pools);
    assert_eq!(
        violations,
        vec!["Requires a ship with one of these traits: corvette".to_string()]
    );
}

#[test]
fn size_restriction_reads_the_ships_size_category() {
    let catalog = shipped_catalog();
    let doc = fleet_doc(
        r#"{
            "ships": [
                {"chassis": "cr90-corvette", "upgrades": []},
                {"chassis": "mc80-command", "upgrades": []}
            ]
        }"#,
    );
    let fleet = hydrate(&doc, &catalog).expect("fleet should hydrate");
    let fleet_ctx = FleetContext::from_state(&fleet);
    let profile = GamemodeProfile::unrestricted();
    let pools = SlotPools::builtin();

    let quad_lasers = catalog
        .upgrade("quad-laser-turrets")
        .expect("card should exist");
    let corvette = ShipContext::from_build(&fleet.ships[0]);
    assert!(evaluate(quad_lasers, &corvette, &fleet_ctx, &profile, None, &pools).is_empty());

    let mc80 = ShipContext::from_build(&fleet.ships[1]);
    let violations = evaluate(quad_lasers, &mc80, &fleet_ctx, &profile, None, &pools);
    assert_eq!(violations, vec!["Requires a small ship".to_string()]);
}

#[test]
fn huge_hull_rejects_slot_enabling_upgrade_and_conditional_disqualifier() {
    let catalog = shipped_catalog();
    let doc = fleet_doc(
        r#"{
            "ships": [{"chassis": "executor-dreadnought", "upgrades": []}]
        }"#,
    );
    let fleet = hydrate(&doc, &catalog).expect("fleet should hydrate");
    let fleet_ctx = FleetContext::from_state(&fleet);
    let profile = GamemodeProfile::unrestricted();
    let pools = SlotPools::builtin();
    let executor = ShipContext::from_build(&fleet.ships[0]);

    let hangar = catalog
        .upgrade("expanded-hangar-bay")
        .expect("card should exist");
    let violations = evaluate(hangar, &executor, &fleet_ctx, &profile, None, &pools);
    assert_eq!(
        violations,
        vec!["Huge ships cannot equip upgrades that grant additional slots".to_string()]
    );
}

#[test]
fn gamemode_commander_deny_list_blocks_and_greys_the_commander() {
    let catalog = shipped_catalog();
    let doc = fleet_doc(
        r#"{
            "ships": [{"chassis": "imperial-ii-star-destroyer", "upgrades": []}]
        }"#,
    );
    let fleet = hydrate(&doc, &catalog).expect("fleet should hydrate");
    let fleet_ctx = FleetContext::from_state(&fleet);
    let pools = SlotPools::builtin();

    let mut profile = GamemodeProfile::standard();
    profile
        .disallowed_commanders
        .push("Grand Moff Tarkin".to_string());

    let tarkin = catalog
        .upgrade("grand-moff-tarkin")
        .expect("card should exist");
    assert!(is_greyed_out(tarkin, &fleet_ctx, &profile));

    let ship = ShipContext::from_build(&fleet.ships[0]);
    let violations = evaluate(tarkin, &ship, &fleet_ctx, &profile, None, &pools);
    assert_eq!(
        violations,
        vec!["Commander Grand Moff Tarkin is not allowed in Standard".to_string()]
    );
}
