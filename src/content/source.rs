//! Content sources and toggle state. Toggle persistence (cookies, local
//! storage) belongs to the host; the engine only sees explicit values.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The always-on core dataset. Never toggleable.
pub const BASE_SOURCE: &str = "base";

/// Official errata source. When enabled, generic `-errata` variants win.
pub const AMG_SOURCE: &str = "amg";

/// Every known source tag, base first. Card ids from community sources are
/// prefixed with their tag (`legacyBeta-ackbar-errata-x`).
pub const SOURCE_TAGS: &[&str] = &[
    BASE_SOURCE,
    AMG_SOURCE,
    "legacy",
    "legacyBeta",
    "legends",
    "nexus",
    "arc",
    "naboo",
];

/// Non-source preference toggles the host may persist alongside source flags.
pub const PROXY_TOGGLE: &str = "proxy";
pub const TOURNAMENT_TOGGLE: &str = "tournament";

/// User-facing toggle map: one flag per optional content source plus the
/// preference family (`proxy`, `tournament`). Absent keys read as false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentToggles {
    #[serde(default)]
    pub toggles: BTreeMap<String, bool>,
}

impl ContentToggles {
    pub fn is_enabled(&self, key: &str) -> bool {
        self.toggles.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.toggles.insert(key.into(), value);
    }

    /// Overlay a gamemode's forced values. Forced keys always win over the
    /// user's own setting while that profile is active.
    pub fn with_forced(&self, forced: &BTreeMap<String, bool>) -> ContentToggles {
        let mut toggles = self.toggles.clone();
        for (key, value) in forced {
            toggles.insert(key.clone(), *value);
        }
        ContentToggles { toggles }
    }

    /// The enabled-source set implied by these toggles. Preference toggles
    /// that are not source tags do not appear.
    pub fn enabled_sources(&self) -> EnabledSources {
        let tags = SOURCE_TAGS
            .iter()
            .filter(|tag| **tag != BASE_SOURCE && self.is_enabled(tag))
            .map(|tag| tag.to_string())
            .collect();
        EnabledSources { tags }
    }
}

/// Set of enabled optional sources. The base source is always considered
/// enabled and is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledSources {
    tags: BTreeSet<String>,
}

impl EnabledSources {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = tags
            .into_iter()
            .map(Into::into)
            .filter(|tag| tag != BASE_SOURCE)
            .collect();
        EnabledSources { tags }
    }

    pub fn contains(&self, tag: &str) -> bool {
        tag == BASE_SOURCE || self.tags.contains(tag)
    }

    /// Enabled optional tags in sorted order (base excluded).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_source_is_always_enabled() {
        let enabled = EnabledSources::none();
        assert!(enabled.contains(BASE_SOURCE));
        assert!(!enabled.contains("legacy"));
    }

    #[test]
    fn forced_toggles_win_over_user_values() {
        let mut user = ContentToggles::default();
        user.set(TOURNAMENT_TOGGLE, false);
        user.set("legacy", true);

        let mut forced = BTreeMap::new();
        forced.insert(TOURNAMENT_TOGGLE.to_string(), true);

        let effective = user.with_forced(&forced);
        assert!(effective.is_enabled(TOURNAMENT_TOGGLE));
        assert!(effective.is_enabled("legacy"));
    }

    #[test]
    fn enabled_sources_skips_preference_toggles() {
        let mut user = ContentToggles::default();
        user.set("legacy", true);
        user.set(PROXY_TOGGLE, true);

        let enabled = user.enabled_sources();
        assert!(enabled.contains("legacy"));
        assert!(!enabled.contains(PROXY_TOGGLE));
    }
}
