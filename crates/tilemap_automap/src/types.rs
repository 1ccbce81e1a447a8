//! Data types for the rule-map automapping engine.
//!
//! A [`RuleSet`] is built from a rule map by [`build_rule_set`](crate::build_rule_set)
//! and holds its [`Rule`]s in declaration order, which is also the order their
//! outputs are applied in.

use tilemap_core::{Cell, Rect};

/// Target-layer alias resolved at run time to the layer being edited.
pub const SELF_LAYER_ALIAS: &str = "self";

// ─── Layer classification ────────────────────────────────────────────────────

/// The role a rule-map layer plays, derived from its name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerRole {
    /// `regions`: marks input and output regions at once
    Regions,
    /// `regions_input`
    RegionsInput,
    /// `regions_output`
    RegionsOutput,
    /// `input_<name>` (or `input<N>_<name>`)
    Input(String),
    /// `inputnot_<name>` (or `inputnot<N>_<name>`)
    NotInput(String),
    /// `output_<name>` (or `output<N>_<name>`)
    Output(String),
    /// Anything else. Not part of any rule.
    Unrecognized,
}

/// Classify a rule-map layer name.
///
/// The prefix is the text before the first `_` and is matched case-sensitively.
/// Everything after that underscore is the target layer name, which may itself
/// contain underscores. Rule prefixes may carry a numeric suffix
/// (`output2_ground`) to stack several layers onto one target.
pub fn classify_layer_name(name: &str) -> LayerRole {
    match name {
        "regions" => return LayerRole::Regions,
        "regions_input" => return LayerRole::RegionsInput,
        "regions_output" => return LayerRole::RegionsOutput,
        _ => {}
    }

    let Some((prefix, target)) = name.split_once('_') else {
        return LayerRole::Unrecognized;
    };
    if target.is_empty() {
        return LayerRole::Unrecognized;
    }

    let target = target.to_string();
    if strip_stack_prefix(prefix, "inputnot") {
        LayerRole::NotInput(target)
    } else if strip_stack_prefix(prefix, "input") {
        LayerRole::Input(target)
    } else if strip_stack_prefix(prefix, "output") {
        LayerRole::Output(target)
    } else {
        LayerRole::Unrecognized
    }
}

fn strip_stack_prefix(prefix: &str, keyword: &str) -> bool {
    prefix
        .strip_prefix(keyword)
        .is_some_and(|suffix| suffix.chars().all(|c| c.is_ascii_digit()))
}

/// Whether an unrecognized name still looks like it was meant to be a rule layer.
pub(crate) fn looks_like_rule_layer(name: &str) -> bool {
    let prefix = name.split('_').next().unwrap_or(name);
    ["regions", "input", "output"]
        .iter()
        .any(|keyword| prefix.starts_with(keyword))
}

// ─── Options ─────────────────────────────────────────────────────────────────

/// Behaviour switches read from rule-map (or group layer) properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleOptions {
    /// Cells outside a finite target map read as empty instead of rejecting the candidate.
    pub match_outside_map: bool,
    /// A match whose output overlaps cells already written by the same rule is skipped.
    pub no_overlapping_output: bool,
    /// Match this rule against the map as left by all previous rules.
    pub match_in_order: bool,
}

// ─── Rule ─────────────────────────────────────────────────────────────────────

/// Constraints one `input_`/`inputnot_` layer places on a target layer.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPattern {
    /// Name of the target layer the constraints apply to
    pub target: String,
    /// `true` for `inputnot_` layers: listed cells must NOT be present
    pub negated: bool,
    /// `(dx, dy, expected)` relative to the input region origin. Wildcards are
    /// omitted; `None` only appears for layers with `StrictEmpty` set.
    pub cells: Vec<(i32, i32, Option<Cell>)>,
}

/// One possible value written to an output cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputCandidate {
    /// `None` erases the target cell
    pub value: Option<Cell>,
    /// Relative weight; `0` is never chosen
    pub weight: f32,
}

/// Stacked candidates for one output position.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputCell {
    /// Offset from the match origin
    pub dx: i32,
    pub dy: i32,
    pub candidates: Vec<OutputCandidate>,
}

/// All output cells a rule writes to one target layer.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPattern {
    pub target: String,
    /// Position of the first output layer for this target among the rule map's
    /// layers. Used when the target layer has to be created.
    pub layer_order: usize,
    pub cells: Vec<OutputCell>,
}

/// A single rule instance: one region of a rule scope.
///
/// Fires at target position `(x, y)` when every input pattern is satisfied with
/// the input region's top-left corner placed at `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Rule scope name: the group layer name, or the rule map name at top level
    pub name: String,
    /// Index of the region within its scope, in discovery order
    pub index: usize,
    pub input_region: Rect,
    pub output_region: Rect,
    pub inputs: Vec<InputPattern>,
    pub outputs: Vec<OutputPattern>,
    pub options: RuleOptions,
}

impl Rule {
    /// Human readable name for diagnostics, e.g. `walls#2`
    pub fn label(&self) -> String {
        format!("{}#{}", self.name, self.index + 1)
    }

    /// Size of the matched footprint
    pub fn input_size(&self) -> (i32, i32) {
        (self.input_region.width, self.input_region.height)
    }

    /// Output region relative to a match origin
    pub fn output_footprint(&self) -> Rect {
        self.output_region
            .translated(-self.input_region.x, -self.input_region.y)
    }

    /// Whether any input or input-not pattern reads `layer`
    pub fn reads_layer(&self, layer: &str) -> bool {
        self.inputs.iter().any(|input| input.target == layer)
    }
}

// ─── RuleSet ─────────────────────────────────────────────────────────────────

/// The rules of one rule map in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    /// Rule map name
    pub name: String,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule reads `layer` (directly or through the `self` alias)
    pub fn reads_layer(&self, layer: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.reads_layer(layer) || rule.reads_layer(SELF_LAYER_ALIAS))
    }

    /// Replace every `self` target with `layer`
    pub fn resolve_self_alias(&mut self, layer: &str) {
        for rule in &mut self.rules {
            for input in &mut rule.inputs {
                if input.target == SELF_LAYER_ALIAS {
                    input.target = layer.to_string();
                }
            }
            for output in &mut rule.outputs {
                if output.target == SELF_LAYER_ALIAS {
                    output.target = layer.to_string();
                }
            }
        }
    }
}
