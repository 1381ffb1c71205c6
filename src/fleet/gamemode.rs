//! Named gamemode rulesets. Built-ins cover organized play; extra profiles
//! can be defined in data/gamemodes.yaml. Forced content toggles always win
//! over the user's own settings while the profile is selected.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::content::source::{ContentToggles, TOURNAMENT_TOGGLE};

pub const DEFAULT_GAMEMODES_PATH: &str = "data/gamemodes.yaml";

pub const STANDARD_GAMEMODE: &str = "standard";

/// Ruleset limits and requirements. An undefined limit performs no check at
/// all; it is not a zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GamemodeProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub points_limit: Option<u32>,
    #[serde(default)]
    pub squadron_points_limit: Option<u32>,
    #[serde(default)]
    pub flotilla_limit: Option<u32>,
    #[serde(default)]
    pub ace_limit: Option<u32>,
    #[serde(default)]
    pub require_objectives: bool,
    #[serde(default)]
    pub require_commander: bool,
    #[serde(default)]
    pub allowed_commanders: Vec<String>,
    #[serde(default)]
    pub disallowed_commanders: Vec<String>,
    #[serde(default)]
    pub allowed_upgrade_unique_classes: Vec<String>,
    #[serde(default)]
    pub disallowed_upgrade_unique_classes: Vec<String>,
    /// Toggle values this profile forces while active.
    #[serde(default)]
    pub forced_toggles: BTreeMap<String, bool>,
}

impl GamemodeProfile {
    /// Tournament standard: 400 points, 134 squadron points, two flotillas,
    /// four aces, objectives and a commander required.
    pub fn standard() -> Self {
        let mut forced_toggles = BTreeMap::new();
        forced_toggles.insert(TOURNAMENT_TOGGLE.to_string(), true);
        GamemodeProfile {
            id: STANDARD_GAMEMODE.to_string(),
            name: "Standard".to_string(),
            points_limit: Some(400),
            squadron_points_limit: Some(134),
            flotilla_limit: Some(2),
            ace_limit: Some(4),
            require_objectives: true,
            require_commander: true,
            forced_toggles,
            ..GamemodeProfile::default()
        }
    }

    /// Small-format play at half scale.
    pub fn task_force() -> Self {
        GamemodeProfile {
            id: "task-force".to_string(),
            name: "Task Force".to_string(),
            points_limit: Some(200),
            squadron_points_limit: Some(67),
            flotilla_limit: Some(1),
            ace_limit: Some(2),
            require_objectives: true,
            require_commander: true,
            ..GamemodeProfile::default()
        }
    }

    /// Double-scale games; huge hulls show up here.
    pub fn sector_fleet() -> Self {
        GamemodeProfile {
            id: "sector-fleet".to_string(),
            name: "Sector Fleet".to_string(),
            points_limit: Some(800),
            squadron_points_limit: Some(268),
            flotilla_limit: Some(4),
            ace_limit: Some(8),
            require_objectives: true,
            require_commander: true,
            ..GamemodeProfile::default()
        }
    }

    /// No limits, nothing required. The sandbox default.
    pub fn unrestricted() -> Self {
        GamemodeProfile {
            id: "unrestricted".to_string(),
            name: "Unrestricted".to_string(),
            ..GamemodeProfile::default()
        }
    }

    /// Campaign-week variant, stamped with the Monday of the week containing
    /// `date`. Standard limits at 500 points, no tournament toggle forced.
    pub fn campaign_week(date: NaiveDate) -> Self {
        let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        let stamp = monday.format("%Y-%m-%d");
        GamemodeProfile {
            id: format!("campaign-{stamp}"),
            name: format!("Campaign Week {stamp}"),
            points_limit: Some(500),
            squadron_points_limit: Some(167),
            flotilla_limit: Some(2),
            ace_limit: Some(4),
            require_objectives: false,
            require_commander: true,
            ..GamemodeProfile::default()
        }
    }

    /// Look up a built-in profile by id. Campaign ids carry their week date
    /// (`campaign-2026-08-03`).
    pub fn builtin(id: &str) -> Option<Self> {
        match id {
            STANDARD_GAMEMODE => Some(Self::standard()),
            "task-force" => Some(Self::task_force()),
            "sector-fleet" => Some(Self::sector_fleet()),
            "unrestricted" => Some(Self::unrestricted()),
            _ => {
                let stamp = id.strip_prefix("campaign-")?;
                let date = NaiveDate::parse_from_str(stamp, "%Y-%m-%d").ok()?;
                Some(Self::campaign_week(date))
            }
        }
    }

    /// The user's toggles with this profile's forced values applied on top.
    pub fn effective_toggles(&self, user: &ContentToggles) -> ContentToggles {
        user.with_forced(&self.forced_toggles)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GamemodeFile {
    #[serde(default)]
    gamemodes: Vec<GamemodeProfile>,
}

/// Profiles defined in the YAML file. Returns an empty list if the file is
/// missing; a file that exists but fails to parse is logged and skipped.
pub fn load_gamemodes(path: impl AsRef<Path>) -> Vec<GamemodeProfile> {
    let path = path.as_ref();
    let Ok(raw) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_yaml::from_str::<GamemodeFile>(&raw) {
        Ok(file) => file.gamemodes,
        Err(err) => {
            eprintln!("gamemode: skipping '{}': {err}", path.display());
            Vec::new()
        }
    }
}

/// Resolve a profile id: file-defined profiles first, built-ins second.
pub fn find_profile(id: &str, gamemodes_path: impl AsRef<Path>) -> Option<GamemodeProfile> {
    load_gamemodes(gamemodes_path)
        .into_iter()
        .find(|profile| profile.id == id)
        .or_else(|| GamemodeProfile::builtin(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_forces_tournament_toggle_over_user_value() {
        let mut user = ContentToggles::default();
        user.set(TOURNAMENT_TOGGLE, false);

        let effective = GamemodeProfile::standard().effective_toggles(&user);
        assert!(effective.is_enabled(TOURNAMENT_TOGGLE));
    }

    #[test]
    fn campaign_week_id_is_stamped_with_monday() {
        let thursday = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let profile = GamemodeProfile::campaign_week(thursday);
        assert_eq!(profile.id, "campaign-2026-08-03");
        assert_eq!(
            GamemodeProfile::builtin("campaign-2026-08-03").map(|p| p.id),
            Some("campaign-2026-08-03".to_string())
        );
    }

    #[test]
    fn unknown_profile_id_resolves_to_none() {
        assert_eq!(GamemodeProfile::builtin("grand-melee"), None);
        assert_eq!(GamemodeProfile::builtin("campaign-not-a-date"), None);
    }
}
