//! Resolved catalog plus the content-state fingerprint and the reload-on-
//! change store. Re-resolving happens only when the fingerprint moves;
//! an unchanged fingerprint is a cheap no-op.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::content::card::UpgradeCard;
use crate::content::errata::{self, ErrataRegistry};
use crate::content::loader::{self, RawBySource};
use crate::content::objective::ObjectiveRecord;
use crate::content::resolver;
use crate::content::ship::ShipRecord;
use crate::content::source::{ContentToggles, EnabledSources};
use crate::content::squadron::SquadronRecord;

/// Canonical errata-resolved catalog: one active variant per base identity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub upgrades: Vec<UpgradeCard>,
    pub ships: Vec<ShipRecord>,
    pub squadrons: Vec<SquadronRecord>,
    pub objectives: Vec<ObjectiveRecord>,
}

impl Catalog {
    /// Look up by exact id, falling back to base identity so saved fleets
    /// survive errata swaps.
    pub fn upgrade(&self, id: &str) -> Option<&UpgradeCard> {
        self.upgrades
            .iter()
            .find(|card| card.id == id)
            .or_else(|| self.upgrades.iter().find(|card| card.base_id == id))
    }

    pub fn ship(&self, id: &str) -> Option<&ShipRecord> {
        self.ships
            .iter()
            .find(|ship| ship.id == id)
            .or_else(|| self.ships.iter().find(|ship| ship.base_id == id))
    }

    pub fn squadron(&self, id: &str) -> Option<&SquadronRecord> {
        self.squadrons
            .iter()
            .find(|squadron| squadron.id == id)
            .or_else(|| self.squadrons.iter().find(|squadron| squadron.base_id == id))
    }

    pub fn objective(&self, id: &str) -> Option<&ObjectiveRecord> {
        self.objectives
            .iter()
            .find(|objective| objective.id == id)
            .or_else(|| self.objectives.iter().find(|objective| objective.base_id == id))
    }

    /// Free-text filter over the derived search index.
    pub fn search_upgrades(&self, query: &str) -> Vec<&UpgradeCard> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.upgrades.iter().collect();
        }
        self.upgrades
            .iter()
            .filter(|card| card.search_index.contains(&needle))
            .collect()
    }
}

/// Everything the resolved catalog depends on: enabled sources, per-source
/// data versions and the errata registry version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentState {
    pub enabled: EnabledSources,
    pub data_versions: BTreeMap<String, String>,
    pub errata_version: Option<String>,
}

impl ContentState {
    pub fn from_loaded(
        enabled: EnabledSources,
        raw: &RawBySource,
        registry: &ErrataRegistry,
    ) -> Self {
        let data_versions = raw
            .iter()
            .map(|(tag, source)| {
                let version = source.data_version.clone().unwrap_or_default();
                (tag.clone(), version)
            })
            .collect();
        ContentState {
            enabled,
            data_versions,
            errata_version: registry.data_version.clone(),
        }
    }

    /// Deterministic fingerprint string. Equal states produce equal
    /// fingerprints; any change to enabled sources, a source's data version
    /// or the errata registry moves it.
    pub fn fingerprint(&self) -> String {
        let sources: Vec<&str> = self.enabled.iter().collect();
        let versions: Vec<String> = self
            .data_versions
            .iter()
            .map(|(tag, version)| format!("{tag}:{version}"))
            .collect();
        format!(
            "sources={};versions={};errata={}",
            sources.join("+"),
            versions.join(","),
            self.errata_version.as_deref().unwrap_or("-"),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Unchanged { revision: u64 },
    Reloaded { revision: u64 },
}

/// The currently loaded content: catalog behind an Arc so handlers can hold
/// it across a concurrent reload.
#[derive(Debug, Clone)]
pub struct LoadedContent {
    pub catalog: Arc<Catalog>,
    pub fingerprint: String,
    pub revision: u64,
    pub loaded_at: String,
}

/// Reload-on-change cache. Hosts call [ContentStore::reload_if_changed] on
/// their own invalidation signal; the store never polls.
#[derive(Debug, Default)]
pub struct ContentStore {
    inner: Mutex<Option<LoadedContent>>,
}

impl ContentStore {
    pub const fn new() -> Self {
        ContentStore {
            inner: Mutex::new(None),
        }
    }

    pub fn current(&self) -> Option<LoadedContent> {
        self.lock().clone()
    }

    /// Recompute the fingerprint from disk; reload and bump the revision only
    /// when it moved. The first call always loads (revision 1).
    pub fn reload_if_changed(&self, data_dir: &Path, toggles: &ContentToggles) -> ReloadOutcome {
        let enabled = toggles.enabled_sources();
        let raw = loader::load_raw_content(data_dir, &enabled);
        let registry =
            errata::load_errata_registry(data_dir.join(errata::ERRATA_REGISTRY_FILE))
                .unwrap_or_default();
        let fingerprint = ContentState::from_loaded(enabled.clone(), &raw, &registry).fingerprint();

        let mut guard = self.lock();
        if let Some(current) = guard.as_ref() {
            if current.fingerprint == fingerprint {
                return ReloadOutcome::Unchanged {
                    revision: current.revision,
                };
            }
        }

        let catalog = resolver::resolve(&raw, &enabled, &registry);
        let revision = guard.as_ref().map_or(1, |current| current.revision + 1);
        *guard = Some(LoadedContent {
            catalog: Arc::new(catalog),
            fingerprint,
            revision,
            loaded_at: chrono::Utc::now().to_rfc3339(),
        });
        ReloadOutcome::Reloaded { revision }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<LoadedContent>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
