//! Writes the outputs of accepted matches into the target map.

use std::collections::HashSet;

use rand::Rng;
use tilemap_core::{Cell, Layer, Map, Rect};

use crate::{AutomapEdit, Match, OutputCandidate, OutputPattern, Rule};

/// Apply `matches` to `map` in order, recording every write in `edit`.
///
/// Matches are expected grouped by rule in rule-set order, then in scan order,
/// which is what the matcher produces. Later writes overwrite earlier ones, so
/// the last rule to touch a cell decides its value. Returns how many matches
/// were applied (matches skipped by `NoOverlappingOutput` are not counted).
pub fn apply_matches(
    matches: &[Match<'_>],
    map: &mut Map,
    edit: &mut AutomapEdit,
    rng: &mut impl Rng,
) -> usize {
    let mut applied = 0;
    let mut current: Option<&Rule> = None;
    // (output index, x, y) written by the current rule
    let mut written: HashSet<(usize, i32, i32)> = HashSet::new();

    for m in matches {
        let rule = m.rule;
        if !current.is_some_and(|r| std::ptr::eq(r, rule)) {
            current = Some(rule);
            written.clear();
        }

        let no_overlap = rule.options.no_overlapping_output;
        if no_overlap && overlaps_written(rule, m.x, m.y, &written) {
            continue;
        }

        for (out_idx, output) in rule.outputs.iter().enumerate() {
            for out_cell in &output.cells {
                let (x, y) = (m.x + out_cell.dx, m.y + out_cell.dy);
                if !map.infinite && !map.rect().contains(x, y) {
                    continue;
                }
                let Some(candidate) = select_candidate(&out_cell.candidates, rng) else {
                    continue;
                };
                if write_cell(map, edit, output, x, y, candidate.value) && no_overlap {
                    written.insert((out_idx, x, y));
                }
            }
        }
        applied += 1;
    }

    applied
}

fn overlaps_written(rule: &Rule, x: i32, y: i32, written: &HashSet<(usize, i32, i32)>) -> bool {
    rule.outputs.iter().enumerate().any(|(out_idx, output)| {
        output
            .cells
            .iter()
            .any(|c| written.contains(&(out_idx, x + c.dx, y + c.dy)))
    })
}

/// Write one cell of an output layer, creating the target layer on first write.
///
/// Returns `false` if nothing was written (erasing in a layer that does not exist).
fn write_cell(
    map: &mut Map,
    edit: &mut AutomapEdit,
    output: &OutputPattern,
    x: i32,
    y: i32,
    value: Option<Cell>,
) -> bool {
    let path = match map.find_tile_layer_path(&output.target) {
        Some(path) => path,
        None => {
            if value.is_none() {
                return false;
            }
            let bounds = if map.infinite {
                Rect::default()
            } else {
                map.rect()
            };
            let layer = Layer::new_tile_layer(output.target.clone(), bounds);
            let index = map.insert_layer(output.layer_order, layer.clone());
            tracing::debug!(layer = %output.target, index, "created output layer");
            edit.record_created_layer(index, layer);
            vec![index]
        }
    };

    let Some(layer) = map.layer_at_path_mut(&path) else {
        return false;
    };
    let layer_id = layer.id;
    let Some(tiles) = layer.as_tile_layer_mut() else {
        return false;
    };
    let old = tiles.set_cell(x, y, value);
    edit.record(layer_id, &output.target, x, y, old, value);
    true
}

/// Weighted random choice among stacked output candidates.
///
/// Returns `None` if every weight is zero. A single candidate is returned
/// without drawing from `rng`.
pub fn select_candidate<'c>(
    candidates: &'c [OutputCandidate],
    rng: &mut impl Rng,
) -> Option<&'c OutputCandidate> {
    let weight = |c: &OutputCandidate| f64::from(c.weight.max(0.0));
    let total: f64 = candidates.iter().map(weight).sum();
    if total <= 0.0 {
        return None;
    }
    if candidates.len() == 1 {
        return candidates.first();
    }

    let mut pick = rng.gen::<f64>() * total;
    for candidate in candidates {
        let w = weight(candidate);
        if w <= 0.0 {
            continue;
        }
        if pick < w {
            return Some(candidate);
        }
        pick -= w;
    }

    // Rounding can leave `pick` just past the last bucket
    candidates.iter().rev().find(|c| weight(c) > 0.0)
}
