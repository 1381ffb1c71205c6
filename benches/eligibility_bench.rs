//! Evaluator throughput benchmarks: single-card checks and whole-catalog
//! sweeps.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use flagship::content::card::{UpgradeCard, UpgradeRestrictions};
use flagship::content::catalog::Catalog;
use flagship::content::ship::ShipRecord;
use flagship::fleet::eligibility::{evaluate, FleetContext, ShipContext};
use flagship::fleet::gamemode::GamemodeProfile;
use flagship::fleet::slots::SlotPools;
use flagship::fleet::state::{FleetState, ShipBuild};
use flagship::parallel::{sweep_catalog, WorkerPool};

fn synthetic_card(index: usize) -> UpgradeCard {
    let slot = ["officer", "weapons-team", "turbolaser", "defensive-retro"][index % 4];
    UpgradeCard {
        id: format!("card-{index}"),
        base_id: format!("card-{index}"),
        name: format!("Card {index}"),
        slot_type: slot.to_string(),
        point_cost: (index % 12) as u32,
        is_unique: index % 5 == 0,
        unique_classes: if index % 5 == 0 {
            vec![format!("class-{}", index % 40)]
        } else {
            Vec::new()
        },
        restrictions: UpgradeRestrictions {
            sizes: if index % 7 == 0 {
                vec!["large".to_string()]
            } else {
                Vec::new()
            },
            grey_requires_types: if index % 11 == 0 {
                vec!["weapons-team".to_string()]
            } else {
                Vec::new()
            },
            ..UpgradeRestrictions::default()
        },
        ..UpgradeCard::default()
    }
}

fn synthetic_catalog(cards: usize) -> Catalog {
    Catalog {
        upgrades: (0..cards).map(synthetic_card).collect(),
        ..Catalog::default()
    }
}

fn benched_fleet() -> FleetState {
    let chassis = ShipRecord {
        id: "mc80-command".to_string(),
        base_id: "mc80-command".to_string(),
        name: "MC80 Command Cruiser".to_string(),
        size: "large".to_string(),
        point_cost: 106,
        slots: vec![
            "commander".to_string(),
            "officer".to_string(),
            "officer".to_string(),
            "weapons-team".to_string(),
            "offensive-retro".to_string(),
            "defensive-retro".to_string(),
            "title".to_string(),
        ],
        ..ShipRecord::default()
    };
    FleetState {
        ships: vec![ShipBuild {
            chassis,
            assigned: vec![synthetic_card(0), synthetic_card(1)],
        }],
        ..FleetState::default()
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let fleet = benched_fleet();
    let fleet_ctx = FleetContext::from_state(&fleet);
    let ship = ShipContext::from_build(&fleet.ships[0]);
    let profile = GamemodeProfile::standard();
    let pools = SlotPools::builtin();
    let card = synthetic_card(42);

    let mut group = c.benchmark_group("evaluate");
    group.throughput(Throughput::Elements(1));
    group.bench_function("single_card", |b| {
        b.iter(|| {
            black_box(evaluate(
                black_box(&card),
                &ship,
                &fleet_ctx,
                &profile,
                None,
                &pools,
            ))
        })
    });
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let fleet = benched_fleet();
    let profile = GamemodeProfile::standard();
    let pools = SlotPools::builtin();

    let mut group = c.benchmark_group("sweep");
    for cards in [100usize, 1000] {
        let catalog = synthetic_catalog(cards);
        group.throughput(Throughput::Elements(cards as u64));
        group.bench_with_input(format!("catalog_{cards}"), &catalog, |b, catalog| {
            b.iter(|| {
                black_box(sweep_catalog(
                    catalog,
                    &fleet,
                    0,
                    &profile,
                    None,
                    &pools,
                    &WorkerPool::default_workers(),
                ))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_sweep);
criterion_main!(benches);
