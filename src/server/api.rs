//! JSON payload builders for the API routes. Rule violations ride back as
//! data with a 200; only malformed requests and unknown references produce
//! the 400 validation schema.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fleet::eligibility::{self, FleetContext, ShipContext};
use crate::fleet::gamemode::{self, GamemodeProfile, DEFAULT_GAMEMODES_PATH, STANDARD_GAMEMODE};
use crate::fleet::slots::SlotPools;
use crate::fleet::state::{self, FleetDoc, FleetState, FleetTotals};
use crate::fleet::validator;
use crate::parallel::{sweep_catalog, SweepEntry, WorkerPool};
use crate::server::sync;

const MAX_SWEEP_WORKERS: usize = 64;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationErrorResponse {
    fn new(errors: Vec<ValidationIssue>) -> Self {
        ValidationErrorResponse {
            status: "error",
            message: "Validation failed",
            errors,
        }
    }
}

#[derive(Debug)]
pub enum RequestError {
    Parse(serde_json::Error),
    Validation(ValidationErrorResponse),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(_) => write!(f, "invalid request"),
        }
    }
}

impl std::error::Error for RequestError {}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "flagship-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Parse one query-string parameter out of a request path.
fn query_param(path: &str, name: &str) -> Option<String> {
    let query = path.split('?').nth(1)?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == name && !value.is_empty() {
            Some(value.replace('+', " "))
        } else {
            None
        }
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeListItem {
    pub id: String,
    pub base_id: String,
    pub name: String,
    pub slot_type: String,
    pub factions: Vec<String>,
    pub point_cost: u32,
    pub is_unique: bool,
    pub source: String,
}

/// GET /api/upgrades with optional slot/faction/search filters.
pub fn upgrades_payload(path: &str) -> Result<String, serde_json::Error> {
    let catalog = sync::current_catalog();
    let slot = query_param(path, "slot");
    let faction = query_param(path, "faction");
    let search = query_param(path, "search").unwrap_or_default();

    let list: Vec<UpgradeListItem> = catalog
        .search_upgrades(&search)
        .into_iter()
        .filter(|card| slot.as_ref().map_or(true, |slot| card.slot_type == *slot))
        .filter(|card| {
            faction.as_ref().map_or(true, |faction| {
                card.factions.is_empty() || card.factions.contains(faction)
            })
        })
        .map(|card| UpgradeListItem {
            id: card.id.clone(),
            base_id: card.base_id.clone(),
            name: card.name.clone(),
            slot_type: card.slot_type.clone(),
            factions: card.factions.clone(),
            point_cost: card.point_cost,
            is_unique: card.is_unique,
            source: card.source.clone(),
        })
        .collect();

    serde_json::to_string_pretty(&serde_json::json!({
        "count": list.len(),
        "upgrades": list,
    }))
}

pub fn ships_payload() -> Result<String, serde_json::Error> {
    let catalog = sync::current_catalog();
    serde_json::to_string_pretty(&serde_json::json!({
        "count": catalog.ships.len(),
        "ships": catalog.ships,
    }))
}

pub fn squadrons_payload() -> Result<String, serde_json::Error> {
    let catalog = sync::current_catalog();
    serde_json::to_string_pretty(&serde_json::json!({
        "count": catalog.squadrons.len(),
        "squadrons": catalog.squadrons,
    }))
}

pub fn objectives_payload() -> Result<String, serde_json::Error> {
    let catalog = sync::current_catalog();
    serde_json::to_string_pretty(&serde_json::json!({
        "count": catalog.objectives.len(),
        "objectives": catalog.objectives,
    }))
}

/// GET /api/gamemodes: file-defined profiles plus the built-ins.
pub fn gamemodes_payload() -> Result<String, serde_json::Error> {
    let mut profiles = gamemode::load_gamemodes(DEFAULT_GAMEMODES_PATH);
    for builtin in [
        GamemodeProfile::standard(),
        GamemodeProfile::task_force(),
        GamemodeProfile::sector_fleet(),
        GamemodeProfile::unrestricted(),
    ] {
        if !profiles.iter().any(|profile| profile.id == builtin.id) {
            profiles.push(builtin);
        }
    }
    serde_json::to_string_pretty(&serde_json::json!({
        "count": profiles.len(),
        "gamemodes": profiles,
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityRequest {
    pub fleet: FleetDoc,
    #[serde(default)]
    pub ship_index: usize,
    pub card_id: String,
    #[serde(default)]
    pub gamemode: Option<String>,
    #[serde(default)]
    pub squadron_keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibilityResponse {
    pub status: &'static str,
    pub card_id: String,
    pub gamemode: String,
    pub eligible: bool,
    pub greyed_out: bool,
    pub violations: Vec<String>,
}

/// POST /api/eligibility: one candidate card against one ship of a fleet doc.
pub fn eligibility_payload(body: &str) -> Result<String, RequestError> {
    let request: EligibilityRequest =
        serde_json::from_str(body).map_err(RequestError::Parse)?;
    let catalog = sync::current_catalog();

    let mut errors = Vec::new();
    let profile = resolve_profile(
        request.gamemode.as_deref(),
        request.fleet.gamemode.as_deref(),
        &mut errors,
    );
    let fleet = hydrate_fleet(&request.fleet, &catalog, &mut errors);

    let card = catalog.upgrade(&request.card_id).cloned();
    if card.is_none() {
        errors.push(ValidationIssue {
            field: "card_id",
            messages: vec![format!("unknown upgrade '{}'", request.card_id)],
        });
    }
    if let Some(fleet) = &fleet {
        if fleet.ships.get(request.ship_index).is_none() {
            errors.push(ValidationIssue {
                field: "ship_index",
                messages: vec![format!(
                    "fleet has {} ships, index {} is out of range",
                    fleet.ships.len(),
                    request.ship_index
                )],
            });
        }
    }
    if !errors.is_empty() {
        return Err(RequestError::Validation(ValidationErrorResponse::new(errors)));
    }

    let (profile, fleet, card) = (profile.unwrap_or_default(), fleet.unwrap_or_default(), card.unwrap_or_default());
    let build = &fleet.ships[request.ship_index];
    let ship = ShipContext::from_build(build);
    // Exclude the candidate's own prior selection so re-checking an assigned
    // card does not report it as its own conflict.
    let fleet_ctx = FleetContext::excluding(&fleet, request.ship_index, &card.id);
    let pools = SlotPools::builtin();

    let violations = eligibility::evaluate(
        &card,
        &ship,
        &fleet_ctx,
        &profile,
        request.squadron_keywords.as_deref(),
        &pools,
    );
    let response = EligibilityResponse {
        status: "ok",
        card_id: card.id.clone(),
        gamemode: profile.id.clone(),
        eligible: violations.is_empty(),
        greyed_out: eligibility::is_greyed_out(&card, &fleet_ctx, &profile),
        violations,
    };
    serde_json::to_string_pretty(&response).map_err(RequestError::Parse)
}

#[derive(Debug, Clone, Deserialize)]
pub struct FleetValidateRequest {
    pub fleet: FleetDoc,
    #[serde(default)]
    pub gamemode: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetValidateResponse {
    pub status: &'static str,
    pub gamemode: String,
    pub valid: bool,
    pub violations: Vec<String>,
    pub totals: FleetTotals,
}

/// POST /api/fleet/validate: gamemode rule validation over a fleet doc.
pub fn fleet_validate_payload(body: &str) -> Result<String, RequestError> {
    let request: FleetValidateRequest =
        serde_json::from_str(body).map_err(RequestError::Parse)?;
    let catalog = sync::current_catalog();

    let mut errors = Vec::new();
    let profile = resolve_profile(
        request.gamemode.as_deref(),
        request.fleet.gamemode.as_deref(),
        &mut errors,
    );
    let fleet = hydrate_fleet(&request.fleet, &catalog, &mut errors);
    if !errors.is_empty() {
        return Err(RequestError::Validation(ValidationErrorResponse::new(errors)));
    }

    let (profile, fleet) = (profile.unwrap_or_default(), fleet.unwrap_or_default());
    let totals = fleet.totals();
    let violations = validator::validate_fleet(&profile, &totals);
    let response = FleetValidateResponse {
        status: "ok",
        gamemode: profile.id.clone(),
        valid: violations.is_empty(),
        violations,
        totals,
    };
    serde_json::to_string_pretty(&response).map_err(RequestError::Parse)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SweepRequest {
    pub fleet: FleetDoc,
    #[serde(default)]
    pub ship_index: usize,
    #[serde(default)]
    pub gamemode: Option<String>,
    #[serde(default)]
    pub slot_type: Option<String>,
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub status: &'static str,
    pub gamemode: String,
    pub count: usize,
    pub entries: Vec<SweepEntry>,
}

/// POST /api/sweep: evaluate the whole catalog for one ship in parallel.
pub fn sweep_payload(body: &str) -> Result<String, RequestError> {
    let request: SweepRequest = serde_json::from_str(body).map_err(RequestError::Parse)?;
    let catalog = sync::current_catalog();

    let mut errors = Vec::new();
    let profile = resolve_profile(
        request.gamemode.as_deref(),
        request.fleet.gamemode.as_deref(),
        &mut errors,
    );
    let fleet = hydrate_fleet(&request.fleet, &catalog, &mut errors);
    if let Some(fleet) = &fleet {
        if fleet.ships.get(request.ship_index).is_none() {
            errors.push(ValidationIssue {
                field: "ship_index",
                messages: vec![format!(
                    "fleet has {} ships, index {} is out of range",
                    fleet.ships.len(),
                    request.ship_index
                )],
            });
        }
    }
    if request.workers.map_or(false, |workers| workers > MAX_SWEEP_WORKERS) {
        errors.push(ValidationIssue {
            field: "workers",
            messages: vec![format!("workers must be at most {MAX_SWEEP_WORKERS}")],
        });
    }
    if !errors.is_empty() {
        return Err(RequestError::Validation(ValidationErrorResponse::new(errors)));
    }

    let (profile, fleet) = (profile.unwrap_or_default(), fleet.unwrap_or_default());
    let pool = request
        .workers
        .map(WorkerPool::with_workers)
        .unwrap_or_default();
    let entries = sweep_catalog(
        &catalog,
        &fleet,
        request.ship_index,
        &profile,
        request.slot_type.as_deref(),
        &SlotPools::builtin(),
        &pool,
    );
    let response = SweepResponse {
        status: "ok",
        gamemode: profile.id.clone(),
        count: entries.len(),
        entries,
    };
    serde_json::to_string_pretty(&response).map_err(RequestError::Parse)
}

/// Resolve the requested gamemode (request field wins over the fleet doc's
/// own), defaulting to standard. Unknown ids become a validation issue.
fn resolve_profile(
    requested: Option<&str>,
    from_doc: Option<&str>,
    errors: &mut Vec<ValidationIssue>,
) -> Option<GamemodeProfile> {
    let id = requested.or(from_doc).unwrap_or(STANDARD_GAMEMODE);
    let profile = gamemode::find_profile(id, DEFAULT_GAMEMODES_PATH);
    if profile.is_none() {
        errors.push(ValidationIssue {
            field: "gamemode",
            messages: vec![format!("unknown gamemode '{id}'")],
        });
    }
    profile
}

fn hydrate_fleet(
    doc: &FleetDoc,
    catalog: &crate::content::catalog::Catalog,
    errors: &mut Vec<ValidationIssue>,
) -> Option<FleetState> {
    match state::hydrate(doc, catalog) {
        Ok(fleet) => Some(fleet),
        Err(err) => {
            errors.push(ValidationIssue {
                field: "fleet",
                messages: err
                    .unknown
                    .iter()
                    .map(|r| format!("unknown {} '{}'", r.kind, r.id))
                    .collect(),
            });
            None
        }
    }
}
