//! Runs one rule set against a target map: match, then apply.

use std::collections::HashSet;

use rand::Rng;
use tilemap_core::{Map, Rect};

use crate::{apply_matches, find_matches, AutomapEdit, Issues, Match, MatchError, RuleSet};

/// Apply every rule of `rule_set` within `search_area`.
///
/// Rules are matched against the map as it was before the rule set ran, and
/// all matches are then applied in rule order. A rule with `MatchInOrder` set
/// instead sees the map as left by every earlier rule: pending matches are
/// applied first and its own matches are applied immediately.
///
/// Rules whose input layers are missing from `map` produce one warning per
/// rule scope and layer, and are skipped. Returns the number of applied matches.
pub fn apply_rule_set(
    rule_set: &RuleSet,
    map: &mut Map,
    search_area: Rect,
    edit: &mut AutomapEdit,
    issues: &mut Issues,
    rng: &mut impl Rng,
) -> usize {
    let mut pending: Vec<Match<'_>> = Vec::new();
    let mut reported: HashSet<(&str, String)> = HashSet::new();
    let mut applied = 0;

    for rule in &rule_set.rules {
        if rule.options.match_in_order && !pending.is_empty() {
            applied += apply_matches(&pending, map, edit, rng);
            pending.clear();
        }

        match find_matches(rule, map, search_area) {
            Ok(found) if rule.options.match_in_order => {
                applied += apply_matches(&found, map, edit, rng);
            }
            Ok(found) => pending.extend(found),
            Err(err) => {
                let MatchError::MissingTargetLayer(layer) = &err;
                if reported.insert((rule.name.as_str(), layer.clone())) {
                    issues.warning(format!("rule '{}': {err}", rule.name));
                }
            }
        }
    }

    applied += apply_matches(&pending, map, edit, rng);

    tracing::debug!(
        rule_set = %rule_set.name,
        rules = rule_set.rules.len(),
        applied,
        "applied rule set"
    );
    applied
}
