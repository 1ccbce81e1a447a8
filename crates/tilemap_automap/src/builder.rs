//! Turns a rule map into a [`RuleSet`].
//!
//! Layers are classified by name with [`classify_layer_name`], grouped per rule
//! scope (the top level of the map and each group layer), and every region
//! marked in a scope's `regions*` layers becomes one [`Rule`].

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;
use tilemap_core::{Layer, Map, Properties, Rect, TileLayer};

use crate::types::looks_like_rule_layer;
use crate::{
    classify_layer_name, InputPattern, Issues, LayerRole, OutputCandidate, OutputCell,
    OutputPattern, Rule, RuleOptions, RuleSet,
};

/// Input layer property: empty cells must match empty target cells.
const STRICT_EMPTY: &str = "StrictEmpty";

/// Fatal problems that make a whole rule map unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleMapError {
    #[error(
        "rule map '{map}': '{scope}' has no `regions` layer and no `regions_input`/`regions_output` pair"
    )]
    MissingRegions { map: String, scope: String },
}

/// Parse `rule_map` into a [`RuleSet`].
///
/// Recoverable problems (unknown properties, naming typos, ambiguous regions,
/// scopes without inputs or outputs) are reported to `issues` as warnings and
/// the offending layer or scope is skipped.
pub fn build_rule_set(rule_map: &Map, issues: &mut Issues) -> Result<RuleSet, RuleMapError> {
    let options = read_options(
        &rule_map.properties,
        RuleOptions::default(),
        &format!("map '{}'", rule_map.name),
        issues,
    );

    let mut rules = Vec::new();
    let found_rules = build_scope(
        rule_map,
        &rule_map.name,
        &rule_map.layers,
        options,
        &mut rules,
        issues,
    )?;

    if !found_rules {
        return Err(RuleMapError::MissingRegions {
            map: rule_map.name.clone(),
            scope: rule_map.name.clone(),
        });
    }

    tracing::debug!(rule_map = %rule_map.name, rules = rules.len(), "built rule set");
    Ok(RuleSet {
        name: rule_map.name.clone(),
        rules,
    })
}

/// An `input_`/`inputnot_` layer waiting to be cut into regions.
struct InputSource<'a> {
    target: String,
    tiles: &'a TileLayer,
    negated: bool,
    strict_empty: bool,
}

/// An `output_` layer and its position in the scope.
struct OutputSource<'a> {
    target: String,
    tiles: &'a TileLayer,
    order: usize,
}

/// Build the rules of one scope, then those of its groups.
///
/// Returns whether this scope or any nested one contained rule layers.
fn build_scope(
    rule_map: &Map,
    scope: &str,
    layers: &[Layer],
    options: RuleOptions,
    rules: &mut Vec<Rule>,
    issues: &mut Issues,
) -> Result<bool, RuleMapError> {
    let mut found = build_scope_rules(rule_map, scope, layers, options, rules, issues)?;

    for layer in layers {
        if let Some(children) = layer.children() {
            let group_options = read_options(
                &layer.properties,
                options,
                &format!("group '{}'", layer.name),
                issues,
            );
            found |= build_scope(rule_map, &layer.name, children, group_options, rules, issues)?;
        }
    }

    Ok(found)
}

/// Build the rules defined directly in one scope, ignoring its groups.
fn build_scope_rules(
    rule_map: &Map,
    scope: &str,
    layers: &[Layer],
    options: RuleOptions,
    rules: &mut Vec<Rule>,
    issues: &mut Issues,
) -> Result<bool, RuleMapError> {
    let mut has_rule_layers = false;

    let mut regions = None;
    let mut regions_input = None;
    let mut regions_output = None;
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    for (order, layer) in layers.iter().enumerate() {
        if layer.children().is_some() {
            continue;
        }

        let role = classify_layer_name(&layer.name);
        if role == LayerRole::Unrecognized {
            if looks_like_rule_layer(&layer.name) {
                issues.warning(format!(
                    "layer '{}' looks like a rule layer but its name is not `<role>_<target>`; skipped",
                    layer.name
                ));
            }
            continue;
        }

        let Some(tiles) = layer.as_tile_layer() else {
            issues.warning(format!(
                "rule layer '{}' is not a tile layer; skipped",
                layer.name
            ));
            continue;
        };
        has_rule_layers = true;

        let allowed: &[&str] = match role {
            LayerRole::Input(_) => &[STRICT_EMPTY],
            _ => &[],
        };
        warn_unknown_properties(
            &layer.properties,
            allowed,
            &format!("layer '{}'", layer.name),
            issues,
        );

        match role {
            LayerRole::Regions => regions = Some(tiles),
            LayerRole::RegionsInput => regions_input = Some(tiles),
            LayerRole::RegionsOutput => regions_output = Some(tiles),
            LayerRole::Input(target) => inputs.push(InputSource {
                target,
                tiles,
                negated: false,
                strict_empty: layer
                    .properties
                    .get(STRICT_EMPTY)
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
            }),
            LayerRole::NotInput(target) => inputs.push(InputSource {
                target,
                tiles,
                negated: true,
                strict_empty: false,
            }),
            LayerRole::Output(target) => outputs.push(OutputSource {
                target,
                tiles,
                order,
            }),
            LayerRole::Unrecognized => {}
        }
    }

    if !has_rule_layers {
        return Ok(false);
    }

    let region_pairs: Vec<(Rect, Rect)> = match (regions, regions_input, regions_output) {
        (Some(regions), other_input, other_output) => {
            if other_input.is_some() || other_output.is_some() {
                issues.warning(format!(
                    "'{scope}' has both `regions` and `regions_input`/`regions_output`; using `regions`"
                ));
            }
            marker_blobs(regions.iter_cells().map(|(x, y, _)| (x, y)))
                .iter()
                .map(|blob| {
                    let bounds = bounding_rect(blob.iter().copied());
                    (bounds, bounds)
                })
                .collect()
        }
        (None, Some(input), Some(output)) => paired_regions(input, output, scope, issues),
        _ => {
            return Err(RuleMapError::MissingRegions {
                map: rule_map.name.clone(),
                scope: scope.to_string(),
            })
        }
    };

    if !inputs.iter().any(|i| !i.negated) {
        issues.warning(format!("'{scope}' has no input layers; its rules are skipped"));
        return Ok(true);
    }
    if outputs.is_empty() {
        issues.warning(format!("'{scope}' has no output layers; its rules are skipped"));
        return Ok(true);
    }

    for (index, (input_region, output_region)) in region_pairs.into_iter().enumerate() {
        rules.push(Rule {
            name: scope.to_string(),
            index,
            input_region,
            output_region,
            inputs: inputs
                .iter()
                .map(|source| input_pattern(source, input_region))
                .collect(),
            outputs: output_patterns(rule_map, &outputs, input_region, output_region),
            options,
        });
    }

    Ok(true)
}

/// Apply recognised option properties on top of `options`, warning about the rest.
fn read_options(
    properties: &Properties,
    mut options: RuleOptions,
    owner: &str,
    issues: &mut Issues,
) -> RuleOptions {
    for (name, value) in properties {
        let slot = match name.as_str() {
            "MatchOutsideMap" => &mut options.match_outside_map,
            "NoOverlappingOutput" => &mut options.no_overlapping_output,
            "MatchInOrder" => &mut options.match_in_order,
            _ => {
                issues.warning(format!(
                    "ignoring unknown property '{name}' = '{value}' on {owner}"
                ));
                continue;
            }
        };
        match value.as_bool() {
            Some(flag) => *slot = flag,
            None => issues.warning(format!(
                "property '{name}' on {owner} expects a bool, got '{value}'; ignored"
            )),
        }
    }
    options
}

fn warn_unknown_properties(
    properties: &Properties,
    allowed: &[&str],
    owner: &str,
    issues: &mut Issues,
) {
    for (name, value) in properties {
        if !allowed.contains(&name.as_str()) {
            issues.warning(format!(
                "ignoring unknown property '{name}' = '{value}' on {owner}"
            ));
        }
    }
}

// ─── Regions ─────────────────────────────────────────────────────────────────

/// Split marker cells into 4-connected blobs, in row-major discovery order.
fn marker_blobs(markers: impl IntoIterator<Item = (i32, i32)>) -> Vec<Vec<(i32, i32)>> {
    let ordered: Vec<(i32, i32)> = markers.into_iter().collect();
    let remaining: HashSet<(i32, i32)> = ordered.iter().copied().collect();
    let mut visited = HashSet::with_capacity(remaining.len());
    let mut blobs = Vec::new();

    for &start in &ordered {
        if !visited.insert(start) {
            continue;
        }
        let mut blob = Vec::new();
        let mut stack = vec![start];
        while let Some((x, y)) = stack.pop() {
            blob.push((x, y));
            for next in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                if remaining.contains(&next) && visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        blobs.push(blob);
    }
    blobs
}

fn bounding_rect(cells: impl IntoIterator<Item = (i32, i32)>) -> Rect {
    cells
        .into_iter()
        .fold(Rect::default(), |acc, (x, y)| acc.union(&Rect::new(x, y, 1, 1)))
}

/// Regions from a `regions_input` + `regions_output` pair.
///
/// Blobs are found over the union of both layers, so an input marker and the
/// output marker touching it describe the same rule.
fn paired_regions(
    input: &TileLayer,
    output: &TileLayer,
    scope: &str,
    issues: &mut Issues,
) -> Vec<(Rect, Rect)> {
    let input_cells: HashSet<(i32, i32)> = input.iter_cells().map(|(x, y, _)| (x, y)).collect();
    let output_cells: HashSet<(i32, i32)> =
        output.iter_cells().map(|(x, y, _)| (x, y)).collect();

    // Row-major order over the union
    let union: BTreeSet<(i32, i32)> = input_cells
        .iter()
        .chain(output_cells.iter())
        .map(|&(x, y)| (y, x))
        .collect();

    let mut pairs = Vec::new();
    for blob in marker_blobs(union.into_iter().map(|(y, x)| (x, y))) {
        let input_region =
            bounding_rect(blob.iter().copied().filter(|c| input_cells.contains(c)));
        if input_region.is_empty() {
            let corner = bounding_rect(blob.iter().copied());
            issues.warning(format!(
                "'{scope}': region at ({}, {}) has no `regions_input` cells; skipped",
                corner.x, corner.y
            ));
            continue;
        }
        let output_region =
            bounding_rect(blob.iter().copied().filter(|c| output_cells.contains(c)));
        let output_region = if output_region.is_empty() {
            input_region
        } else {
            output_region
        };
        pairs.push((input_region, output_region));
    }
    pairs
}

// ─── Patterns ────────────────────────────────────────────────────────────────

fn input_pattern(source: &InputSource<'_>, region: Rect) -> InputPattern {
    let cells = region
        .cells()
        .filter_map(|(x, y)| {
            let offset = (x - region.x, y - region.y);
            match source.tiles.cell(x, y) {
                Some(cell) => Some((offset.0, offset.1, Some(cell))),
                None if source.strict_empty => Some((offset.0, offset.1, None)),
                None => None,
            }
        })
        .collect();

    InputPattern {
        target: source.target.clone(),
        negated: source.negated,
        cells,
    }
}

/// Collect stacked output candidates per target layer and position.
fn output_patterns(
    rule_map: &Map,
    sources: &[OutputSource<'_>],
    input_region: Rect,
    output_region: Rect,
) -> Vec<OutputPattern> {
    let mut patterns: Vec<OutputPattern> = Vec::new();

    for source in sources {
        let pos = match patterns.iter().position(|p| p.target == source.target) {
            Some(pos) => pos,
            None => {
                patterns.push(OutputPattern {
                    target: source.target.clone(),
                    layer_order: source.order,
                    cells: Vec::new(),
                });
                patterns.len() - 1
            }
        };
        let pattern = &mut patterns[pos];

        for (x, y) in output_region.cells() {
            let Some(cell) = source.tiles.cell(x, y) else {
                continue;
            };
            let candidate = OutputCandidate {
                value: (!rule_map.is_erase_tile(&cell)).then_some(cell),
                weight: rule_map.tile_probability(&cell),
            };
            let (dx, dy) = (x - input_region.x, y - input_region.y);
            match pattern.cells.iter_mut().find(|c| c.dx == dx && c.dy == dy) {
                Some(existing) => existing.candidates.push(candidate),
                None => pattern.cells.push(OutputCell {
                    dx,
                    dy,
                    candidates: vec![candidate],
                }),
            }
        }
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_core::{Cell, PropertyValue, TileProperties, Tileset};
    use uuid::Uuid;

    const TS: Uuid = Uuid::nil();

    fn cell(index: u32) -> Cell {
        Cell::new(TS, index)
    }

    fn tile_layer(name: &str, cells: &[(i32, i32, u32)]) -> Layer {
        let mut layer = Layer::new_tile_layer(name, Rect::new(0, 0, 8, 8));
        if let Some(tiles) = layer.as_tile_layer_mut() {
            for &(x, y, idx) in cells {
                tiles.set_cell(x, y, Some(cell(idx)));
            }
        }
        layer
    }

    fn rule_map(layers: Vec<Layer>) -> Map {
        let mut map = Map::new("rules", 8, 8);
        map.layers = layers;
        map
    }

    fn warnings(issues: Issues) -> Vec<String> {
        issues.into_vec().into_iter().map(|i| i.message).collect()
    }

    #[test]
    fn single_marker_builds_one_rule() {
        let map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(0, 0, 2)]),
        ]);
        let mut issues = Issues::new();
        let rule_set = build_rule_set(&map, &mut issues).unwrap();

        assert!(issues.is_empty());
        assert_eq!(rule_set.rules.len(), 1);
        let rule = &rule_set.rules[0];
        assert_eq!(rule.input_region, Rect::new(0, 0, 1, 1));
        assert_eq!(rule.output_region, rule.input_region);
        assert_eq!(rule.inputs[0].target, "a");
        assert_eq!(rule.inputs[0].cells, vec![(0, 0, Some(cell(1)))]);
        assert_eq!(rule.outputs[0].target, "a");
        assert_eq!(rule.outputs[0].cells[0].candidates[0].value, Some(cell(2)));
    }

    #[test]
    fn disjoint_markers_yield_independent_rules() {
        let map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99), (1, 0, 99), (4, 4, 99)]),
            tile_layer("input_a", &[(1, 0, 1), (4, 4, 3)]),
            tile_layer("output_a", &[(0, 0, 2), (4, 4, 4)]),
        ]);
        let rule_set = build_rule_set(&map, &mut Issues::new()).unwrap();

        assert_eq!(rule_set.rules.len(), 2);
        assert_eq!(rule_set.rules[0].input_region, Rect::new(0, 0, 2, 1));
        assert_eq!(rule_set.rules[0].inputs[0].cells, vec![(1, 0, Some(cell(1)))]);
        assert_eq!(rule_set.rules[1].input_region, Rect::new(4, 4, 1, 1));
        assert_eq!(rule_set.rules[1].inputs[0].cells, vec![(0, 0, Some(cell(3)))]);
        assert_eq!(rule_set.rules[1].index, 1);
    }

    #[test]
    fn diagonal_markers_are_separate_regions() {
        let blobs = marker_blobs([(0, 0), (1, 1)]);
        assert_eq!(blobs.len(), 2);
        let blobs = marker_blobs([(0, 0), (1, 0), (1, 1)]);
        assert_eq!(blobs.len(), 1);
    }

    #[test]
    fn paired_regions_shift_output() {
        let map = rule_map(vec![
            tile_layer("regions_input", &[(0, 0, 99), (1, 0, 99), (0, 1, 99), (1, 1, 99)]),
            tile_layer("regions_output", &[(2, 0, 99), (2, 1, 99), (1, 0, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(2, 1, 5)]),
        ]);
        let rule_set = build_rule_set(&map, &mut Issues::new()).unwrap();

        let rule = &rule_set.rules[0];
        assert_eq!(rule.input_region, Rect::new(0, 0, 2, 2));
        assert_eq!(rule.output_region, Rect::new(1, 0, 2, 2));
        assert_eq!(rule.outputs[0].cells[0].dx, 2);
        assert_eq!(rule.outputs[0].cells[0].dy, 1);
    }

    #[test]
    fn regions_without_input_markers_are_skipped() {
        let map = rule_map(vec![
            tile_layer("regions_input", &[(0, 0, 99)]),
            tile_layer("regions_output", &[(5, 5, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(0, 0, 2)]),
        ]);
        let mut issues = Issues::new();
        let rule_set = build_rule_set(&map, &mut issues).unwrap();

        assert_eq!(rule_set.rules.len(), 1);
        let messages = warnings(issues);
        assert!(messages[0].contains("(5, 5)"), "{messages:?}");
    }

    #[test]
    fn missing_regions_is_fatal() {
        let map = rule_map(vec![
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(0, 0, 2)]),
        ]);
        let err = build_rule_set(&map, &mut Issues::new()).unwrap_err();
        assert_eq!(
            err,
            RuleMapError::MissingRegions {
                map: "rules".to_string(),
                scope: "rules".to_string()
            }
        );
    }

    #[test]
    fn lone_regions_input_is_fatal() {
        let map = rule_map(vec![
            tile_layer("regions_input", &[(0, 0, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(0, 0, 2)]),
        ]);
        assert!(build_rule_set(&map, &mut Issues::new()).is_err());
    }

    #[test]
    fn map_without_rule_layers_is_fatal() {
        let map = rule_map(vec![tile_layer("ground", &[(0, 0, 1)])]);
        assert!(build_rule_set(&map, &mut Issues::new()).is_err());
    }

    #[test]
    fn regions_wins_over_regions_input_with_warning() {
        let map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99)]),
            tile_layer("regions_input", &[(3, 3, 99)]),
            tile_layer("regions_output", &[(3, 3, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(0, 0, 2)]),
        ]);
        let mut issues = Issues::new();
        let rule_set = build_rule_set(&map, &mut issues).unwrap();

        assert_eq!(rule_set.rules.len(), 1);
        assert_eq!(rule_set.rules[0].input_region, Rect::new(0, 0, 1, 1));
        assert!(warnings(issues)[0].contains("using `regions`"));
    }

    #[test]
    fn naming_typos_and_non_tile_layers_are_skipped() {
        let map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99)]),
            tile_layer("input", &[(0, 0, 1)]),
            Layer::new_object_layer("input_objects"),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(0, 0, 2)]),
            tile_layer("notes", &[(0, 0, 7)]),
        ]);
        let mut issues = Issues::new();
        let rule_set = build_rule_set(&map, &mut issues).unwrap();

        assert_eq!(rule_set.rules[0].inputs.len(), 1);
        let messages = warnings(issues);
        assert_eq!(messages.len(), 2, "{messages:?}");
        assert!(messages[0].contains("'input'"));
        assert!(messages[1].contains("'input_objects'"));
    }

    #[test]
    fn scope_without_outputs_is_skipped() {
        let map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
        ]);
        let mut issues = Issues::new();
        let rule_set = build_rule_set(&map, &mut issues).unwrap();

        assert!(rule_set.is_empty());
        assert!(warnings(issues)[0].contains("no output layers"));
    }

    #[test]
    fn unknown_properties_are_reported_and_ignored() {
        let mut map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(0, 0, 2)]),
        ]);
        map.properties
            .insert("Frobnicate".to_string(), PropertyValue::Int(3));
        map.properties
            .insert("NoOverlappingOutput".to_string(), PropertyValue::Bool(true));
        map.layers[2]
            .properties
            .insert("Color".to_string(), PropertyValue::from("red"));

        let mut issues = Issues::new();
        let rule_set = build_rule_set(&map, &mut issues).unwrap();

        assert!(rule_set.rules[0].options.no_overlapping_output);
        let messages = warnings(issues);
        assert_eq!(messages.len(), 2, "{messages:?}");
        assert!(messages[0].contains("'Frobnicate' = '3'"));
        assert!(messages[1].contains("'Color' = 'red'"));
    }

    #[test]
    fn strict_empty_keeps_empty_cells_as_constraints() {
        let mut input = tile_layer("input_a", &[(0, 0, 1)]);
        input
            .properties
            .insert(STRICT_EMPTY.to_string(), PropertyValue::Bool(true));
        let map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99), (1, 0, 99)]),
            input,
            tile_layer("output_a", &[(0, 0, 2)]),
        ]);
        let rule_set = build_rule_set(&map, &mut Issues::new()).unwrap();

        assert_eq!(
            rule_set.rules[0].inputs[0].cells,
            vec![(0, 0, Some(cell(1))), (1, 0, None)]
        );
    }

    #[test]
    fn stacked_outputs_become_weighted_candidates() {
        let mut map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output1_a", &[(0, 0, 2)]),
            tile_layer("output2_a", &[(0, 0, 3)]),
        ]);
        let mut tileset = Tileset::new("rules", 8);
        tileset.id = TS;
        tileset.set_tile_properties(3, TileProperties::new().with_probability(4.0));
        map.tilesets.push(tileset);

        let rule_set = build_rule_set(&map, &mut Issues::new()).unwrap();
        let outputs = &rule_set.rules[0].outputs;

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].layer_order, 2);
        let candidates = &outputs[0].cells[0].candidates;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].weight, 1.0);
        assert_eq!(candidates[1].weight, 4.0);
    }

    #[test]
    fn erase_tiles_become_empty_candidates() {
        let mut map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(0, 0, 7)]),
        ]);
        let mut tileset = Tileset::new("rules", 8);
        tileset.id = TS;
        tileset.set_tile_properties(7, TileProperties::new().with_erase(true));
        map.tilesets.push(tileset);

        let rule_set = build_rule_set(&map, &mut Issues::new()).unwrap();
        assert_eq!(rule_set.rules[0].outputs[0].cells[0].candidates[0].value, None);
    }

    #[test]
    fn group_layers_are_separate_scopes() {
        let mut group = Layer::new_group(
            "walls",
            vec![
                tile_layer("regions", &[(2, 2, 99)]),
                tile_layer("input_b", &[(2, 2, 1)]),
                tile_layer("output_b", &[(2, 2, 2)]),
            ],
        );
        group
            .properties
            .insert("MatchInOrder".to_string(), PropertyValue::Bool(true));
        let map = rule_map(vec![
            tile_layer("regions", &[(0, 0, 99)]),
            tile_layer("input_a", &[(0, 0, 1)]),
            tile_layer("output_a", &[(0, 0, 2)]),
            group,
        ]);
        let rule_set = build_rule_set(&map, &mut Issues::new()).unwrap();

        assert_eq!(rule_set.rules.len(), 2);
        assert_eq!(rule_set.rules[0].name, "rules");
        assert!(!rule_set.rules[0].options.match_in_order);
        assert_eq!(rule_set.rules[1].name, "walls");
        assert!(rule_set.rules[1].options.match_in_order);
        assert_eq!(rule_set.rules[1].input_region, Rect::new(2, 2, 1, 1));
    }
}
