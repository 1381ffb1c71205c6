use std::env;
use std::fs;
use std::path::PathBuf;

use crate::content::catalog::{Catalog, ContentState};
use crate::content::errata;
use crate::content::loader::{self, DEFAULT_DATA_DIR};
use crate::content::resolver;
use crate::content::source::ContentToggles;
use crate::content::validate::validate_source_file;
use crate::fleet::eligibility::{self, FleetContext, ShipContext};
use crate::fleet::gamemode::{self, DEFAULT_GAMEMODES_PATH, STANDARD_GAMEMODE};
use crate::fleet::slots::SlotPools;
use crate::fleet::state::{self, FleetDoc};
use crate::fleet::validator;
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Resolve,
    Check,
    Validate,
    Audit,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("resolve") => Some(Command::Resolve),
        Some("check") => Some(Command::Check),
        Some("validate") => Some(Command::Validate),
        Some("audit") => Some(Command::Audit),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Resolve) => handle_resolve(args),
        Some(Command::Check) => handle_check(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Audit) => handle_audit(args),
        None => {
            eprintln!("usage: flagship <serve|resolve|check|validate|audit>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("FLAGSHIP_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn data_dir() -> PathBuf {
    env::var("FLAGSHIP_DATA_DIR")
        .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
        .into()
}

/// Toggles from FLAGSHIP_SOURCES plus an optional comma list argument.
fn toggles_from(extra_sources: Option<&String>) -> ContentToggles {
    let mut toggles = ContentToggles::default();
    let mut enable_list = |list: &str| {
        for tag in list.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
            toggles.set(tag, true);
        }
    };
    if let Ok(sources) = env::var("FLAGSHIP_SOURCES") {
        enable_list(&sources);
    }
    if let Some(sources) = extra_sources {
        enable_list(sources);
    }
    toggles
}

fn load_catalog(toggles: &ContentToggles) -> (Catalog, String) {
    let data_dir = data_dir();
    let enabled = toggles.enabled_sources();
    let raw = loader::load_raw_content(&data_dir, &enabled);
    let registry =
        errata::load_errata_registry(data_dir.join(errata::ERRATA_REGISTRY_FILE))
            .unwrap_or_default();
    let fingerprint = ContentState::from_loaded(enabled.clone(), &raw, &registry).fingerprint();
    (resolver::resolve(&raw, &enabled, &registry), fingerprint)
}

fn handle_resolve(args: &[String]) -> i32 {
    let sources = args.get(2).filter(|arg| !arg.starts_with("--"));
    let as_table = args.iter().any(|arg| arg == "--table");
    let (catalog, fingerprint) = load_catalog(&toggles_from(sources));

    if as_table {
        println!("upgrades\tships\tsquadrons\tobjectives\tfingerprint");
        println!(
            "{}\t{}\t{}\t{}\t{}",
            catalog.upgrades.len(),
            catalog.ships.len(),
            catalog.squadrons.len(),
            catalog.objectives.len(),
            fingerprint
        );
        return 0;
    }

    let summary = serde_json::json!({
        "fingerprint": fingerprint,
        "upgrades": catalog.upgrades.len(),
        "ships": catalog.ships.len(),
        "squadrons": catalog.squadrons.len(),
        "objectives": catalog.objectives.len(),
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize catalog summary: {err}");
            1
        }
    }
}

fn read_fleet_doc(path: &str) -> Result<FleetDoc, String> {
    let raw =
        fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    serde_json::from_str(&raw).map_err(|err| format!("unable to parse fleet '{path}': {err}"))
}

fn handle_check(args: &[String]) -> i32 {
    let (Some(fleet_path), Some(ship_index), Some(card_id)) =
        (args.get(2), args.get(3), args.get(4))
    else {
        eprintln!("usage: flagship check <fleet.json> <ship-index> <card-id>");
        return 2;
    };
    let Ok(ship_index) = ship_index.parse::<usize>() else {
        eprintln!("invalid ship index '{ship_index}'");
        return 2;
    };

    let doc = match read_fleet_doc(fleet_path) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let (catalog, _) = load_catalog(&toggles_from(None));
    let fleet = match state::hydrate(&doc, &catalog) {
        Ok(fleet) => fleet,
        Err(err) => {
            eprintln!("fleet does not resolve: {err}");
            return 1;
        }
    };
    let Some(build) = fleet.ships.get(ship_index) else {
        eprintln!(
            "fleet has {} ships, index {ship_index} is out of range",
            fleet.ships.len()
        );
        return 1;
    };
    let Some(card) = catalog.upgrade(card_id).cloned() else {
        eprintln!("unknown upgrade '{card_id}'");
        return 1;
    };
    let profile_id = doc.gamemode.as_deref().unwrap_or(STANDARD_GAMEMODE);
    let Some(profile) = gamemode::find_profile(profile_id, DEFAULT_GAMEMODES_PATH) else {
        eprintln!("unknown gamemode '{profile_id}'");
        return 1;
    };

    let ship = ShipContext::from_build(build);
    let fleet_ctx = FleetContext::excluding(&fleet, ship_index, &card.id);
    let pools = SlotPools::builtin();
    let violations = eligibility::evaluate(&card, &ship, &fleet_ctx, &profile, None, &pools);
    let result = serde_json::json!({
        "card_id": card.id,
        "gamemode": profile.id,
        "eligible": violations.is_empty(),
        "greyed_out": eligibility::is_greyed_out(&card, &fleet_ctx, &profile),
        "violations": violations,
    });
    match serde_json::to_string_pretty(&result) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize check result: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(fleet_path) = args.get(2) else {
        eprintln!("usage: flagship validate <fleet.json> [gamemode]");
        return 2;
    };

    let doc = match read_fleet_doc(fleet_path) {
        Ok(doc) => doc,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let profile_id = args
        .get(3)
        .map(String::as_str)
        .or(doc.gamemode.as_deref())
        .unwrap_or(STANDARD_GAMEMODE);
    let Some(profile) = gamemode::find_profile(profile_id, DEFAULT_GAMEMODES_PATH) else {
        eprintln!("unknown gamemode '{profile_id}'");
        return 1;
    };

    let (catalog, _) = load_catalog(&toggles_from(None));
    let fleet = match state::hydrate(&doc, &catalog) {
        Ok(fleet) => fleet,
        Err(err) => {
            eprintln!("fleet does not resolve: {err}");
            return 1;
        }
    };

    let violations = validator::validate_fleet(&profile, &fleet.totals());
    if violations.is_empty() {
        println!(
            "validation passed: '{}' is legal for {}",
            fleet.name, profile.name
        );
        0
    } else {
        eprintln!("validation failed: {} violation(s)", violations.len());
        for violation in violations {
            eprintln!("- {violation}");
        }
        1
    }
}

fn handle_audit(args: &[String]) -> i32 {
    let path = args
        .get(2)
        .map(String::as_str)
        .unwrap_or("data/sources/base.json");

    match validate_source_file(path) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!(
                    "[{}] {}: {}",
                    diagnostic.severity, diagnostic.context, diagnostic.message
                );
            }
            if report.has_errors() {
                eprintln!("audit failed: {path}");
                1
            } else {
                println!("audit passed: {path}");
                0
            }
        }
        Err(err) => {
            eprintln!("audit failed: {err}");
            1
        }
    }
}
