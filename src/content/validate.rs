//! Dataset audit for per-source card dictionaries: structural problems are
//! errors, suspicious-but-loadable content is a warning.

use std::collections::HashSet;
use std::fmt;
use std::fs;

use serde_json::{Map, Value};

use crate::content::card::{SIZES, SLOT_TYPES};
use crate::content::objective::OBJECTIVE_CATEGORIES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Factions the shipped datasets use. Unknown factions load fine (the
/// evaluator treats them as opaque tokens) but are worth flagging.
const FACTION_ENUM: &[&str] = &["rebels", "empire", "republic", "separatists"];

/// Audit one per-source dictionary file.
pub fn validate_source_file(path: &str) -> Result<ValidationReport, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|err| format!("unable to parse json '{path}': {err}"))?;

    let Some(root) = payload.as_object() else {
        return Err("expected top-level JSON object".to_string());
    };

    let mut report = ValidationReport::default();

    if let Some(upgrades) = root.get("upgrades").and_then(Value::as_object) {
        validate_upgrades(&mut report, upgrades);
    }
    if let Some(ships) = root.get("ships").and_then(Value::as_object) {
        validate_ships(&mut report, ships);
    }
    if let Some(objectives) = root.get("objectives").and_then(Value::as_object) {
        validate_objectives(&mut report, objectives);
    }

    Ok(report)
}

fn validate_upgrades(report: &mut ValidationReport, upgrades: &Map<String, Value>) {
    let mut seen_names = HashSet::new();

    for (id, entry) in upgrades {
        let context = format!("upgrades['{id}']");
        if id.trim().is_empty() {
            report.push(ValidationSeverity::Error, context, "empty id key");
            continue;
        }
        let Some(object) = entry.as_object() else {
            report.push(ValidationSeverity::Error, context, "entry is not an object");
            continue;
        };

        match object.get("name").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => {
                if !seen_names.insert(name.to_string()) {
                    report.push(
                        ValidationSeverity::Warning,
                        format!("{context}.name"),
                        format!("duplicate card name '{name}' within one source"),
                    );
                }
            }
            _ => report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                "missing non-empty 'name'",
            ),
        }

        match slot_of(object) {
            Some(slot) if SLOT_TYPES.contains(&slot) => {}
            Some(slot) => report.push(
                ValidationSeverity::Error,
                format!("{context}.slot"),
                format!("unknown slot type '{slot}'"),
            ),
            None => report.push(
                ValidationSeverity::Error,
                format!("{context}.slot"),
                "missing non-empty slot type",
            ),
        }

        if let Some(points) = object.get("points").or_else(|| object.get("point_cost")) {
            match points.as_u64() {
                Some(_) => {}
                None => report.push(
                    ValidationSeverity::Error,
                    format!("{context}.points"),
                    "point cost must be a non-negative integer",
                ),
            }
        }

        for faction in factions_of(object) {
            if !FACTION_ENUM.contains(&faction.as_str()) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context}.faction"),
                    format!("unrecognized faction '{faction}'"),
                );
            }
        }

        if let Some(sizes) = object
            .get("restrictions")
            .and_then(|r| r.get("sizes"))
            .and_then(Value::as_array)
        {
            for size in sizes.iter().filter_map(Value::as_str) {
                if !SIZES.contains(&size) {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{context}.restrictions.sizes"),
                        format!("unknown ship size '{size}'"),
                    );
                }
            }
        }
    }
}

fn validate_ships(report: &mut ValidationReport, ships: &Map<String, Value>) {
    for (id, entry) in ships {
        let context = format!("ships['{id}']");
        let Some(object) = entry.as_object() else {
            report.push(ValidationSeverity::Error, context, "entry is not an object");
            continue;
        };

        match object.get("size").and_then(Value::as_str) {
            Some(size) if SIZES.contains(&size) => {}
            Some(size) => report.push(
                ValidationSeverity::Error,
                format!("{context}.size"),
                format!("unknown ship size '{size}'"),
            ),
            None => report.push(
                ValidationSeverity::Error,
                format!("{context}.size"),
                "missing non-empty 'size'",
            ),
        }

        if let Some(slots) = slots_of(object) {
            for slot in slots {
                if !SLOT_TYPES.contains(&slot.as_str()) {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{context}.slots"),
                        format!("unknown slot type '{slot}'"),
                    );
                }
            }
        } else {
            report.push(
                ValidationSeverity::Info,
                format!("{context}.slots"),
                "chassis declares no upgrade slots",
            );
        }
    }
}

fn validate_objectives(report: &mut ValidationReport, objectives: &Map<String, Value>) {
    for (id, entry) in objectives {
        let context = format!("objectives['{id}']");
        let category = entry
            .as_object()
            .and_then(|object| {
                object
                    .get("category")
                    .or_else(|| object.get("type"))
                    .and_then(Value::as_str)
            })
            .unwrap_or("");
        if !OBJECTIVE_CATEGORIES.contains(&category) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.category"),
                format!("objective category must be one of assault/defense/navigation, got '{category}'"),
            );
        }
    }
}

fn slot_of(object: &Map<String, Value>) -> Option<&str> {
    object
        .get("slot")
        .or_else(|| object.get("slot_type"))
        .or_else(|| object.get("type"))
        .and_then(Value::as_str)
        .filter(|slot| !slot.trim().is_empty())
}

fn factions_of(object: &Map<String, Value>) -> Vec<String> {
    match object.get("faction").or_else(|| object.get("factions")) {
        Some(Value::String(faction)) if !faction.trim().is_empty() => vec![faction.clone()],
        Some(Value::Array(factions)) => factions
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn slots_of(object: &Map<String, Value>) -> Option<Vec<String>> {
    let slots: Vec<String> = object
        .get("slots")
        .or_else(|| object.get("upgradeSlots"))
        .and_then(Value::as_array)?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    if slots.is_empty() {
        None
    } else {
        Some(slots)
    }
}
