//! Errata grouping: base identity for card variants and selection of the
//! single active variant per group.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::source::{EnabledSources, AMG_SOURCE, BASE_SOURCE, SOURCE_TAGS};

/// Generic errata marker. Official errata ids end with exactly this suffix;
/// community errata ids carry further qualifiers after it.
pub const ERRATA_SUFFIX: &str = "-errata";

/// Registry file name inside the data directory.
pub const ERRATA_REGISTRY_FILE: &str = "errata.json";

/// Registry of source-specific errata replacements, one id list per entity
/// kind. A listed id is the canonical variant of its group whenever its own
/// source is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrataRegistry {
    #[serde(default)]
    pub data_version: Option<String>,
    #[serde(default)]
    pub upgrades: Vec<String>,
    #[serde(default)]
    pub squadrons: Vec<String>,
    #[serde(default)]
    pub ships: Vec<String>,
    #[serde(default)]
    pub objectives: Vec<String>,
}

/// Load the errata registry. Returns None if the file is missing or invalid.
pub fn load_errata_registry(path: impl AsRef<Path>) -> Option<ErrataRegistry> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

/// The known source tag prefixing this id, if any.
pub fn source_prefix(id: &str) -> Option<&'static str> {
    SOURCE_TAGS
        .iter()
        .filter(|tag| **tag != BASE_SOURCE)
        .find(|tag| {
            id.len() > tag.len() && id.starts_with(*tag) && id.as_bytes()[tag.len()] == b'-'
        })
        .copied()
}

/// Identity shared by all printings of one card: the id with any source
/// prefix and any errata suffix stripped.
pub fn base_id(id: &str) -> String {
    let stripped = match source_prefix(id) {
        Some(tag) => &id[tag.len() + 1..],
        None => id,
    };
    match stripped.find(ERRATA_SUFFIX) {
        Some(pos) => stripped[..pos].to_string(),
        None => stripped.to_string(),
    }
}

/// Any errata printing, official or community.
pub fn is_errata_variant(id: &str) -> bool {
    let stripped = match source_prefix(id) {
        Some(tag) => &id[tag.len() + 1..],
        None => id,
    };
    stripped.contains(ERRATA_SUFFIX)
}

/// Official errata: unprefixed id ending with the bare suffix.
pub fn is_amg_errata(id: &str) -> bool {
    source_prefix(id).is_none() && id.ends_with(ERRATA_SUFFIX)
}

/// Anything with a qualified id and provenance can flow through the errata
/// machinery: upgrades, squadrons, ships, objectives.
pub trait SourcedCard {
    fn card_id(&self) -> &str;
    fn card_source(&self) -> &str;
}

/// Deterministic member ordering inside a group: base source first, official
/// errata source second, community sources alphabetically, id as tie-break.
/// The rule-(d) fallback picks the first member under this ordering, so input
/// iteration order never leaks into the resolved catalog.
fn source_rank(source: &str) -> u8 {
    match source {
        BASE_SOURCE => 0,
        AMG_SOURCE => 1,
        _ => 2,
    }
}

/// Collapse each base-identity group to its single active member.
///
/// Precedence, first match wins:
/// (a) official errata variant, only while the official source is enabled;
/// (b) registry-listed variant whose own source is enabled;
/// (c) non-errata variant from the base source or an enabled source;
/// (d) first member under the documented group ordering.
pub fn resolve_groups<T>(
    mut cards: Vec<T>,
    enabled: &EnabledSources,
    registry_ids: &HashSet<&str>,
) -> Vec<T>
where
    T: SourcedCard,
{
    cards.sort_by(|a, b| {
        (source_rank(a.card_source()), a.card_id()).cmp(&(source_rank(b.card_source()), b.card_id()))
    });

    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for card in cards {
        groups
            .entry(base_id(card.card_id()))
            .or_default()
            .push(card);
    }

    groups
        .into_values()
        .filter_map(|members| pick_active(members, enabled, registry_ids))
        .collect()
}

/// Apply the precedence rules to one group. Members must already be in the
/// documented group ordering.
fn pick_active<T>(
    members: Vec<T>,
    enabled: &EnabledSources,
    registry_ids: &HashSet<&str>,
) -> Option<T>
where
    T: SourcedCard,
{
    let mut winner = None;
    if enabled.contains(AMG_SOURCE) {
        winner = members.iter().position(|m| is_amg_errata(m.card_id()));
    }
    if winner.is_none() {
        winner = members
            .iter()
            .position(|m| registry_ids.contains(m.card_id()) && enabled.contains(m.card_source()));
    }
    if winner.is_none() {
        winner = members
            .iter()
            .position(|m| !is_errata_variant(m.card_id()) && enabled.contains(m.card_source()));
    }

    // Rule (d): first member under the group ordering.
    members.into_iter().nth(winner.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_id_strips_source_prefix_and_errata_suffix() {
        assert_eq!(base_id("ackbar"), "ackbar");
        assert_eq!(base_id("ackbar-errata"), "ackbar");
        assert_eq!(base_id("legacyBeta-ackbar-errata-x"), "ackbar");
        assert_eq!(base_id("legends-gunnery-team"), "gunnery-team");
    }

    #[test]
    fn amg_errata_is_unprefixed_bare_suffix() {
        assert!(is_amg_errata("ackbar-errata"));
        assert!(!is_amg_errata("legacyBeta-ackbar-errata-x"));
        assert!(!is_amg_errata("legacy-ackbar-errata"));
        assert!(!is_amg_errata("ackbar"));
    }

    #[test]
    fn errata_variant_detection_sees_through_prefixes() {
        assert!(is_errata_variant("ackbar-errata"));
        assert!(is_errata_variant("legacyBeta-ackbar-errata-x"));
        assert!(!is_errata_variant("legacyBeta-ackbar"));
    }

    #[derive(Debug, PartialEq)]
    struct Fake(&'static str, &'static str);

    impl SourcedCard for Fake {
        fn card_id(&self) -> &str {
            self.0
        }
        fn card_source(&self) -> &str {
            self.1
        }
    }

    fn ackbar_group() -> Vec<Fake> {
        vec![
            Fake("ackbar", "base"),
            Fake("ackbar-errata", "amg"),
            Fake("legacyBeta-ackbar-errata-x", "legacyBeta"),
        ]
    }

    #[test]
    fn registry_variant_wins_when_its_source_is_enabled_and_amg_is_not() {
        let enabled = EnabledSources::from_tags(["legacyBeta"]);
        let registry: HashSet<&str> = ["legacyBeta-ackbar-errata-x"].into();
        let active = resolve_groups(ackbar_group(), &enabled, &registry);
        assert_eq!(active, vec![Fake("legacyBeta-ackbar-errata-x", "legacyBeta")]);
    }

    #[test]
    fn amg_errata_wins_when_amg_is_enabled() {
        let enabled = EnabledSources::from_tags(["amg", "legacyBeta"]);
        let registry: HashSet<&str> = ["legacyBeta-ackbar-errata-x"].into();
        let active = resolve_groups(ackbar_group(), &enabled, &registry);
        assert_eq!(active, vec![Fake("ackbar-errata", "amg")]);
    }

    #[test]
    fn base_printing_wins_with_nothing_enabled() {
        let enabled = EnabledSources::none();
        let registry = HashSet::new();
        let active = resolve_groups(ackbar_group(), &enabled, &registry);
        assert_eq!(active, vec![Fake("ackbar", "base")]);
    }

    #[test]
    fn fallback_is_first_member_under_group_ordering() {
        // Only errata variants from disabled sources: no rule matches.
        let enabled = EnabledSources::none();
        let registry = HashSet::new();
        let group = vec![
            Fake("nexus-dodonna-errata-2", "nexus"),
            Fake("legacy-dodonna-errata-1", "legacy"),
        ];
        let active = resolve_groups(group, &enabled, &registry);
        assert_eq!(active, vec![Fake("legacy-dodonna-errata-1", "legacy")]);
    }
}
