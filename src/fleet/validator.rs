//! Gamemode Rule Validator: compare an assembled fleet's totals against a
//! profile's limits. Every check runs unconditionally and independently; a
//! profile with an undefined limit skips that check entirely.

use crate::fleet::gamemode::GamemodeProfile;
use crate::fleet::state::FleetTotals;

pub fn validate_fleet(profile: &GamemodeProfile, totals: &FleetTotals) -> Vec<String> {
    let mut violations = Vec::new();

    if let Some(limit) = profile.points_limit {
        if totals.fleet_points > limit {
            violations.push(format!(
                "Fleet is {} points over the {limit} point limit",
                totals.fleet_points - limit
            ));
        }
    }

    if let Some(limit) = profile.squadron_points_limit {
        if totals.squadron_points > limit {
            violations.push(format!(
                "Squadrons are {} points over the {limit} point squadron limit",
                totals.squadron_points - limit
            ));
        }
    }

    if let Some(limit) = profile.flotilla_limit {
        if totals.flotilla_count > limit {
            violations.push(format!(
                "Too many flotillas: {} of {limit} allowed",
                totals.flotilla_count
            ));
        }
    }

    if let Some(limit) = profile.ace_limit {
        if totals.ace_count > limit {
            violations.push(format!(
                "Too many ace squadrons: {} of {limit} allowed",
                totals.ace_count
            ));
        }
    }

    if profile.require_objectives {
        if !totals.has_assault {
            violations.push("Missing an assault objective".to_string());
        }
        if !totals.has_defense {
            violations.push("Missing a defense objective".to_string());
        }
        if !totals.has_navigation {
            violations.push("Missing a navigation objective".to_string());
        }
    }

    if profile.require_commander && totals.commander_count != 1 {
        if totals.commander_count == 0 {
            violations.push("Fleet must include a commander".to_string());
        } else {
            violations.push(format!(
                "Fleet has {} commanders; exactly one is required",
                totals.commander_count
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legal_totals() -> FleetTotals {
        FleetTotals {
            fleet_points: 390,
            squadron_points: 120,
            flotilla_count: 1,
            ace_count: 2,
            commander_count: 1,
            has_assault: true,
            has_defense: true,
            has_navigation: true,
        }
    }

    #[test]
    fn legal_fleet_passes_standard() {
        let violations = validate_fleet(&GamemodeProfile::standard(), &legal_totals());
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn overspent_fleet_reports_exactly_one_points_violation() {
        let totals = FleetTotals {
            fleet_points: 410,
            ..legal_totals()
        };
        let violations = validate_fleet(&GamemodeProfile::standard(), &totals);
        assert_eq!(
            violations,
            vec!["Fleet is 10 points over the 400 point limit".to_string()]
        );
    }

    #[test]
    fn missing_navigation_objective_adds_an_independent_violation() {
        let totals = FleetTotals {
            fleet_points: 410,
            has_navigation: false,
            ..legal_totals()
        };
        let violations = validate_fleet(&GamemodeProfile::standard(), &totals);
        assert_eq!(
            violations,
            vec![
                "Fleet is 10 points over the 400 point limit".to_string(),
                "Missing a navigation objective".to_string(),
            ]
        );
    }

    #[test]
    fn undefined_limits_perform_no_checks() {
        let totals = FleetTotals {
            fleet_points: 10_000,
            squadron_points: 5_000,
            flotilla_count: 20,
            ace_count: 20,
            commander_count: 0,
            has_assault: false,
            has_defense: false,
            has_navigation: false,
        };
        let violations = validate_fleet(&GamemodeProfile::unrestricted(), &totals);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn two_commanders_violate_require_commander() {
        let totals = FleetTotals {
            commander_count: 2,
            ..legal_totals()
        };
        let violations = validate_fleet(&GamemodeProfile::standard(), &totals);
        assert_eq!(
            violations,
            vec!["Fleet has 2 commanders; exactly one is required".to_string()]
        );
    }
}
