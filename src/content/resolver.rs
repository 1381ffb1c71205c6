//! Content Resolver: merge raw per-source dictionaries into one canonical,
//! errata-resolved catalog. Pure function of its inputs; identical inputs
//! always yield an identical catalog.

use std::collections::HashSet;

use crate::content::card::{RawUpgradeRecord, UpgradeCard};
use crate::content::catalog::Catalog;
use crate::content::errata::{self, ErrataRegistry};
use crate::content::loader::RawBySource;
use crate::content::objective::{ObjectiveRecord, RawObjectiveRecord};
use crate::content::ship::{RawShipRecord, ShipRecord};
use crate::content::source::EnabledSources;
use crate::content::squadron::{RawSquadronRecord, SquadronRecord};

pub fn resolve(
    raw: &RawBySource,
    enabled: &EnabledSources,
    registry: &ErrataRegistry,
) -> Catalog {
    let mut upgrades: Vec<UpgradeCard> = Vec::new();
    let mut ships: Vec<ShipRecord> = Vec::new();
    let mut squadrons: Vec<SquadronRecord> = Vec::new();
    let mut objectives: Vec<ObjectiveRecord> = Vec::new();

    for (tag, source) in raw {
        for (raw_id, value) in &source.upgrades {
            match serde_json::from_value::<RawUpgradeRecord>(value.clone()) {
                Ok(record) => upgrades.push(record.normalize(raw_id, tag)),
                Err(err) => drop_record("upgrade", raw_id, tag, &err),
            }
        }
        for (raw_id, value) in &source.ships {
            match serde_json::from_value::<RawShipRecord>(value.clone()) {
                Ok(record) => ships.push(record.normalize(raw_id, tag)),
                Err(err) => drop_record("ship", raw_id, tag, &err),
            }
        }
        for (raw_id, value) in &source.squadrons {
            match serde_json::from_value::<RawSquadronRecord>(value.clone()) {
                Ok(record) => squadrons.push(record.normalize(raw_id, tag)),
                Err(err) => drop_record("squadron", raw_id, tag, &err),
            }
        }
        for (raw_id, value) in &source.objectives {
            match serde_json::from_value::<RawObjectiveRecord>(value.clone()) {
                Ok(record) => objectives.push(record.normalize(raw_id, tag)),
                Err(err) => drop_record("objective", raw_id, tag, &err),
            }
        }
    }

    Catalog {
        upgrades: errata::resolve_groups(upgrades, enabled, &ids(&registry.upgrades)),
        ships: errata::resolve_groups(ships, enabled, &ids(&registry.ships)),
        squadrons: errata::resolve_groups(squadrons, enabled, &ids(&registry.squadrons)),
        objectives: errata::resolve_groups(objectives, enabled, &ids(&registry.objectives)),
    }
}

fn ids(listed: &[String]) -> HashSet<&str> {
    listed.iter().map(String::as_str).collect()
}

fn drop_record(kind: &str, raw_id: &str, tag: &str, err: &serde_json::Error) {
    eprintln!("resolver: dropping unparseable {kind} '{raw_id}' from '{tag}': {err}");
}
