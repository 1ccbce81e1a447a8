//! Finds the target positions where a rule's input patterns hold.

use thiserror::Error;
use tilemap_core::{Map, Rect, TileLayer};

use crate::Rule;

/// A position where every input constraint of `rule` is satisfied.
///
/// `(x, y)` is where the top-left corner of the rule's input region lands on
/// the target map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'r> {
    pub rule: &'r Rule,
    pub x: i32,
    pub y: i32,
}

/// Why a rule could not be matched at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("no target layer named `{0}`")]
    MissingTargetLayer(String),
}

/// Resolved input layer: the target grid and the pattern index it serves.
struct BoundInput<'m> {
    layer: Option<&'m TileLayer>,
    pattern: usize,
}

/// Candidate origins whose input footprint touches `search_area`.
///
/// On finite maps the footprint must stay inside the map unless the rule
/// allows matching outside it.
pub fn candidate_origins(rule: &Rule, map: &Map, search_area: Rect) -> Rect {
    let (width, height) = rule.input_size();
    let origins = search_area.expanded_before(width - 1, height - 1);
    if map.infinite || rule.options.match_outside_map {
        return origins;
    }
    let map_rect = map.rect();
    let fitting = Rect::new(
        map_rect.x,
        map_rect.y,
        map_rect.width - width + 1,
        map_rect.height - height + 1,
    );
    origins.intersection(&fitting)
}

/// Scan `search_area` row-major for positions where `rule` matches.
///
/// An `input_` layer whose target layer does not exist makes the rule
/// unmatchable. A missing `inputnot_` target reads as all-empty and never
/// rejects a candidate.
pub fn find_matches<'r>(
    rule: &'r Rule,
    map: &Map,
    search_area: Rect,
) -> Result<Vec<Match<'r>>, MatchError> {
    let mut bound = Vec::with_capacity(rule.inputs.len());
    for (pattern, input) in rule.inputs.iter().enumerate() {
        let layer = map.tile_layer(&input.target);
        if layer.is_none() && !input.negated {
            return Err(MatchError::MissingTargetLayer(input.target.clone()));
        }
        bound.push(BoundInput { layer, pattern });
    }
    // Positive constraints reject most candidates, so check them first
    bound.sort_by_key(|b| rule.inputs[b.pattern].negated);

    let matches: Vec<Match<'r>> = candidate_origins(rule, map, search_area)
        .cells()
        .filter(|&(x, y)| matches_at(rule, &bound, x, y))
        .map(|(x, y)| Match { rule, x, y })
        .collect();

    tracing::trace!(rule = %rule.label(), matches = matches.len(), "matched rule");
    Ok(matches)
}

/// Test one candidate origin, short-circuiting on the first violation.
fn matches_at(rule: &Rule, bound: &[BoundInput<'_>], x: i32, y: i32) -> bool {
    bound.iter().all(|input| {
        let pattern = &rule.inputs[input.pattern];
        let cell_at = |dx: i32, dy: i32| input.layer.and_then(|l| l.cell(x + dx, y + dy));
        if pattern.negated {
            pattern
                .cells
                .iter()
                .all(|&(dx, dy, forbidden)| forbidden.is_none() || cell_at(dx, dy) != forbidden)
        } else {
            pattern
                .cells
                .iter()
                .all(|&(dx, dy, expected)| cell_at(dx, dy) == expected)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputPattern, RuleOptions};
    use tilemap_core::{Cell, Layer};
    use uuid::Uuid;

    fn cell(index: u32) -> Cell {
        Cell::new(Uuid::nil(), index)
    }

    fn target(width: u32, height: u32, cells: &[(i32, i32, u32)]) -> Map {
        let mut map = Map::new("target", width, height);
        map.add_layer(Layer::new_tile_layer("a", map.rect()));
        if let Some(layer) = map.tile_layer_mut("a") {
            for &(x, y, idx) in cells {
                layer.set_cell(x, y, Some(cell(idx)));
            }
        }
        map
    }

    fn rule(size: (i32, i32), inputs: Vec<InputPattern>) -> Rule {
        Rule {
            name: "r".to_string(),
            index: 0,
            input_region: Rect::new(0, 0, size.0, size.1),
            output_region: Rect::new(0, 0, size.0, size.1),
            inputs,
            outputs: Vec::new(),
            options: RuleOptions::default(),
        }
    }

    fn input(cells: Vec<(i32, i32, Option<Cell>)>) -> InputPattern {
        InputPattern {
            target: "a".to_string(),
            negated: false,
            cells,
        }
    }

    fn not_input(cells: Vec<(i32, i32, Option<Cell>)>) -> InputPattern {
        InputPattern {
            negated: true,
            ..input(cells)
        }
    }

    fn origins(matches: &[Match<'_>]) -> Vec<(i32, i32)> {
        matches.iter().map(|m| (m.x, m.y)).collect()
    }

    #[test]
    fn empty_input_matches_everywhere() {
        let map = target(3, 3, &[(1, 1, 5)]);
        let rule = rule((1, 1), vec![input(Vec::new())]);
        let matches = find_matches(&rule, &map, map.rect()).unwrap();
        assert_eq!(matches.len(), 9);
        assert_eq!(&origins(&matches)[..3], &[(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn exact_tile_is_required() {
        let map = target(3, 3, &[(1, 1, 5), (2, 2, 6)]);
        let rule = rule((1, 1), vec![input(vec![(0, 0, Some(cell(5)))])]);
        let matches = find_matches(&rule, &map, map.rect()).unwrap();
        assert_eq!(origins(&matches), vec![(1, 1)]);
    }

    #[test]
    fn flip_flags_must_match() {
        let mut map = target(2, 1, &[]);
        if let Some(layer) = map.tile_layer_mut("a") {
            layer.set_cell(0, 0, Some(cell(5).flipped(true, false, false)));
            layer.set_cell(1, 0, Some(cell(5)));
        }
        let rule = rule((1, 1), vec![input(vec![(0, 0, Some(cell(5)))])]);
        let matches = find_matches(&rule, &map, map.rect()).unwrap();
        assert_eq!(origins(&matches), vec![(1, 0)]);
    }

    #[test]
    fn not_input_rejects_equal_cells() {
        let map = target(3, 1, &[(0, 0, 5), (1, 0, 6)]);
        let rule = rule(
            (1, 1),
            vec![input(Vec::new()), not_input(vec![(0, 0, Some(cell(5)))])],
        );
        let matches = find_matches(&rule, &map, map.rect()).unwrap();
        assert_eq!(origins(&matches), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn no_match_violates_not_input() {
        let map = target(4, 4, &[(0, 0, 5), (1, 2, 5), (3, 3, 1), (2, 1, 5)]);
        let forbidden = (1, 0, Some(cell(5)));
        let rule = rule(
            (2, 1),
            vec![input(vec![(0, 0, Some(cell(5)))]), not_input(vec![forbidden])],
        );
        let matches = find_matches(&rule, &map, map.rect()).unwrap();
        assert!(!matches.is_empty());
        for m in &matches {
            assert_ne!(map.cell("a", m.x + 1, m.y), Some(cell(5)));
        }
    }

    #[test]
    fn strict_empty_requires_empty_target() {
        let map = target(2, 1, &[(0, 0, 5), (1, 0, 5)]);
        let rule = rule((1, 1), vec![input(vec![(0, 0, None)])]);
        assert!(find_matches(&rule, &map, map.rect()).unwrap().is_empty());
    }

    #[test]
    fn missing_target_layer_is_an_error() {
        let map = target(2, 2, &[]);
        let mut pattern = input(Vec::new());
        pattern.target = "walls".to_string();
        let rule = rule((1, 1), vec![pattern]);
        assert_eq!(
            find_matches(&rule, &map, map.rect()),
            Err(MatchError::MissingTargetLayer("walls".to_string()))
        );
    }

    #[test]
    fn missing_not_input_target_is_no_constraint() {
        let map = target(2, 1, &[]);
        let mut forbid = not_input(vec![(0, 0, Some(cell(1)))]);
        forbid.target = "walls".to_string();
        let rule = rule((1, 1), vec![input(Vec::new()), forbid]);
        assert_eq!(find_matches(&rule, &map, map.rect()).unwrap().len(), 2);
    }

    #[test]
    fn footprint_stays_inside_finite_map() {
        let map = target(3, 3, &[]);
        let rule = rule((2, 2), vec![input(Vec::new())]);
        let matches = find_matches(&rule, &map, map.rect()).unwrap();
        assert_eq!(origins(&matches), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn match_outside_map_reads_empty_cells() {
        let map = target(2, 1, &[]);
        let mut rule = rule((2, 1), vec![input(Vec::new())]);
        rule.options.match_outside_map = true;
        let matches = find_matches(&rule, &map, map.rect()).unwrap();
        assert_eq!(origins(&matches), vec![(-1, 0), (0, 0), (1, 0)]);
    }

    #[test]
    fn search_area_is_grown_by_pattern_size() {
        let map = target(6, 6, &[(2, 2, 5), (3, 2, 6)]);
        let rule = rule(
            (2, 1),
            vec![input(vec![(0, 0, Some(cell(5))), (1, 0, Some(cell(6)))])],
        );
        // Edit touched only (3, 2); the pattern starting at (2, 2) must still be found
        let matches = find_matches(&rule, &map, Rect::new(3, 2, 1, 1)).unwrap();
        assert_eq!(origins(&matches), vec![(2, 2)]);

        let far = find_matches(&rule, &map, Rect::new(5, 5, 1, 1)).unwrap();
        assert!(far.is_empty());
    }
}
